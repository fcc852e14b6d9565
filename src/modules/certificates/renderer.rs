use std::io::Cursor;
use std::path::PathBuf;

use ab_glyph::{FontVec, PxScale};
use image::{imageops, DynamicImage, ImageFormat, Luma, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use qrcode::QrCode;
use thiserror::Error;
use time::macros::format_description;
use time::OffsetDateTime;

use crate::config::CertificateConfig;

use super::layout::{CertificateLayout, TextAlign, TextStyle};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to load certificate template: {0}")]
    Template(String),

    #[error("failed to load certificate font: {0}")]
    Font(String),

    #[error("failed to encode verification QR code: {0}")]
    Qr(String),

    #[error("failed to encode certificate image: {0}")]
    Encode(String),
}

/// Inputs for one certificate image. Everything the overlay shows comes
/// through here; the renderer adds no data of its own.
#[derive(Debug, Clone)]
pub struct RenderRequest<'a> {
    pub certificate_id: &'a str,
    pub participant_name: &'a str,
    pub event_title: &'a str,
    pub event_duration: &'a str,
    pub start_date: OffsetDateTime,
    pub end_date: OffsetDateTime,
    pub venue: &'a str,
    pub issued_date: OffsetDateTime,
}

pub struct CertificateRenderer {
    layout: CertificateLayout,
    template_path: PathBuf,
    font_path: PathBuf,
    frontend_url: String,
}

impl CertificateRenderer {
    pub fn new(layout: CertificateLayout, config: &CertificateConfig) -> Self {
        Self {
            layout,
            template_path: PathBuf::from(&config.template_path),
            font_path: PathBuf::from(&config.font_path),
            frontend_url: config.frontend_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &CertificateConfig) -> Self {
        Self::new(CertificateLayout::default(), config)
    }

    pub fn layout(&self) -> &CertificateLayout {
        &self.layout
    }

    /// Public URL a scanned QR code resolves to.
    pub fn verification_url(&self, certificate_id: &str) -> String {
        format!("{}/verify-certificate/{}", self.frontend_url, certificate_id)
    }

    /// Composites template + text overlay + QR code into a PNG buffer.
    /// Identical inputs make identical layout choices; only the external
    /// template and font bytes vary the pixels.
    pub fn render(&self, request: &RenderRequest<'_>) -> Result<Vec<u8>, RenderError> {
        let template_bytes = std::fs::read(&self.template_path)
            .map_err(|e| RenderError::Template(format!("{}: {e}", self.template_path.display())))?;
        let template = image::load_from_memory(&template_bytes)
            .map_err(|e| RenderError::Template(e.to_string()))?;

        let font_bytes = std::fs::read(&self.font_path)
            .map_err(|e| RenderError::Font(format!("{}: {e}", self.font_path.display())))?;
        let font = FontVec::try_from_vec(font_bytes).map_err(|e| RenderError::Font(e.to_string()))?;

        // Normalize to the layout's fixed dimensions so coordinates stay valid
        // even if the template asset was re-exported at another size.
        let mut canvas = imageops::resize(
            &template.to_rgba8(),
            self.layout.width,
            self.layout.height,
            imageops::FilterType::Lanczos3,
        );

        let date_range = format_date_range(request.start_date, request.end_date);
        let issued = format!("Issued: {}", format_long_date(request.issued_date));
        let cert_id = format!("ID: {}", request.certificate_id);

        draw_field(&mut canvas, &font, &self.layout.participant_name, request.participant_name);
        draw_field(&mut canvas, &font, &self.layout.event_title, request.event_title);
        draw_field(&mut canvas, &font, &self.layout.event_duration, request.event_duration);
        draw_field(&mut canvas, &font, &self.layout.event_dates, &date_range);
        draw_field(&mut canvas, &font, &self.layout.venue, request.venue);
        draw_field(&mut canvas, &font, &self.layout.issued_date, &issued);
        draw_field(&mut canvas, &font, &self.layout.certificate_id, &cert_id);

        let qr = render_qr(&self.verification_url(request.certificate_id), self.layout.qr.size)?;
        imageops::overlay(&mut canvas, &qr, self.layout.qr.x, self.layout.qr.y);

        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(canvas)
            .write_to(&mut buffer, ImageFormat::Png)
            .map_err(|e| RenderError::Encode(e.to_string()))?;

        Ok(buffer.into_inner())
    }
}

fn draw_field(canvas: &mut RgbaImage, font: &FontVec, style: &TextStyle, text: &str) {
    let scale = PxScale::from(style.scale);
    let (text_width, text_height) = text_size(scale, font, text);

    let x = match style.align {
        TextAlign::Left => style.x,
        TextAlign::Center => style.x - (text_width as i32) / 2,
        TextAlign::Right => style.x - text_width as i32,
    };
    // Anchor vertically on the middle of the glyph box, like the
    // template's original dominant-baseline setting.
    let y = style.y - (text_height as i32) / 2;

    let [r, g, b] = style.color;
    draw_text_mut(canvas, Rgba([r, g, b, 255]), x, y, scale, font, text);
}

fn render_qr(url: &str, size: u32) -> Result<RgbaImage, RenderError> {
    let code = QrCode::new(url.as_bytes()).map_err(|e| RenderError::Qr(e.to_string()))?;
    let modules = code
        .render::<Luma<u8>>()
        .max_dimensions(size, size)
        .build();
    // max_dimensions keeps modules square, which can undershoot the
    // target; scale up to the exact placement size.
    let exact = imageops::resize(&modules, size, size, imageops::FilterType::Nearest);
    Ok(DynamicImage::ImageLuma8(exact).to_rgba8())
}

/// Long-form calendar date, e.g. `August 6, 2026`.
pub fn format_long_date(date: OffsetDateTime) -> String {
    let format = format_description!("[month repr:long] [day padding:none], [year]");
    date.format(&format).unwrap_or_default()
}

/// Long-form range with same-day ranges collapsed to a single date.
pub fn format_date_range(start: OffsetDateTime, end: OffsetDateTime) -> String {
    let start_text = format_long_date(start);
    let end_text = format_long_date(end);
    if start_text == end_text {
        start_text
    } else {
        format!("{start_text} - {end_text}")
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use time::macros::datetime;

    use super::*;

    fn renderer_with(template_path: &str, font_path: &str) -> CertificateRenderer {
        CertificateRenderer::from_config(&CertificateConfig {
            template_path: template_path.to_string(),
            font_path: font_path.to_string(),
            frontend_url: "http://localhost:3000/".to_string(),
        })
    }

    fn sample_request() -> RenderRequest<'static> {
        RenderRequest {
            certificate_id: "CERT-1722470400000-A1B2C3D4E",
            participant_name: "Asha Verma",
            event_title: "Applied Cryptography Workshop",
            event_duration: "2 Days",
            start_date: datetime!(2026-03-09 09:00 UTC),
            end_date: datetime!(2026-03-10 17:00 UTC),
            venue: "Seminar Hall A",
            issued_date: datetime!(2026-03-12 10:00 UTC),
        }
    }

    #[test]
    fn long_dates_use_full_month_names() {
        assert_eq!(format_long_date(datetime!(2026-03-09 00:00 UTC)), "March 9, 2026");
        assert_eq!(format_long_date(datetime!(2025-12-25 23:59 UTC)), "December 25, 2025");
    }

    #[test]
    fn same_day_ranges_collapse_to_one_date() {
        let day = datetime!(2026-03-09 09:00 UTC);
        let later_same_day = datetime!(2026-03-09 17:00 UTC);
        assert_eq!(format_date_range(day, later_same_day), "March 9, 2026");
    }

    #[test]
    fn multi_day_ranges_keep_both_endpoints() {
        let range = format_date_range(
            datetime!(2026-03-09 09:00 UTC),
            datetime!(2026-03-10 17:00 UTC),
        );
        assert_eq!(range, "March 9, 2026 - March 10, 2026");
    }

    #[test]
    fn verification_url_embeds_certificate_id_without_double_slash() {
        let renderer = renderer_with("unused.png", "unused.ttf");
        assert_eq!(
            renderer.verification_url("CERT-1-ABCDEFGHI"),
            "http://localhost:3000/verify-certificate/CERT-1-ABCDEFGHI"
        );
    }

    #[test]
    fn qr_rendering_produces_exact_placement_size() {
        let qr = render_qr("http://localhost:3000/verify-certificate/CERT-1-ABCDEFGHI", 100)
            .unwrap();
        assert_eq!(qr.dimensions(), (100, 100));
    }

    #[test]
    fn missing_template_is_a_template_error() {
        let renderer = renderer_with("/nonexistent/template.png", "/nonexistent/font.ttf");
        let err = renderer.render(&sample_request()).unwrap_err();
        assert!(matches!(err, RenderError::Template(_)));
    }

    #[test]
    fn missing_font_is_a_font_error() {
        let dir = tempfile::tempdir().unwrap();
        let template_path = dir.path().join("template.png");
        let template = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            1200,
            900,
            Rgba([0xfd, 0xf6, 0xe3, 0xff]),
        ));
        template.save(&template_path).unwrap();

        let renderer = renderer_with(
            template_path.to_str().unwrap(),
            dir.path().join("missing.ttf").to_str().unwrap(),
        );
        let err = renderer.render(&sample_request()).unwrap_err();
        assert!(matches!(err, RenderError::Font(_)));
    }

    #[test]
    fn garbage_font_bytes_are_a_font_error() {
        let dir = tempfile::tempdir().unwrap();
        let template_path = dir.path().join("template.png");
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(100, 100, Rgba([255, 255, 255, 255])))
            .save(&template_path)
            .unwrap();
        let font_path = dir.path().join("font.ttf");
        let mut font_file = std::fs::File::create(&font_path).unwrap();
        font_file.write_all(b"not a font").unwrap();

        let renderer =
            renderer_with(template_path.to_str().unwrap(), font_path.to_str().unwrap());
        let err = renderer.render(&sample_request()).unwrap_err();
        assert!(matches!(err, RenderError::Font(_)));
    }
}
