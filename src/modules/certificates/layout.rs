/// Fixed geometry for the certificate template. Injected into the
/// renderer as an immutable value so rendering stays a pure function of
/// its inputs.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    pub x: i32,
    pub y: i32,
    pub scale: f32,
    pub color: [u8; 3],
    pub align: TextAlign,
}

#[derive(Debug, Clone, Copy)]
pub struct QrPlacement {
    pub x: i64,
    pub y: i64,
    pub size: u32,
}

#[derive(Debug, Clone)]
pub struct CertificateLayout {
    pub template_name: String,
    pub width: u32,
    pub height: u32,
    pub participant_name: TextStyle,
    pub event_title: TextStyle,
    pub event_duration: TextStyle,
    pub event_dates: TextStyle,
    pub venue: TextStyle,
    pub issued_date: TextStyle,
    pub certificate_id: TextStyle,
    pub qr: QrPlacement,
}

const DARK_SLATE: [u8; 3] = [0x2c, 0x3e, 0x50];
const SLATE: [u8; 3] = [0x34, 0x49, 0x5e];
const GREY: [u8; 3] = [0x7f, 0x8c, 0x8d];

impl Default for CertificateLayout {
    fn default() -> Self {
        Self {
            template_name: "cream-bordered-appreciation".to_string(),
            width: 1200,
            height: 900,
            participant_name: TextStyle {
                x: 600,
                y: 380,
                scale: 48.0,
                color: DARK_SLATE,
                align: TextAlign::Center,
            },
            event_title: TextStyle {
                x: 600,
                y: 480,
                scale: 32.0,
                color: SLATE,
                align: TextAlign::Center,
            },
            event_duration: TextStyle {
                x: 600,
                y: 530,
                scale: 24.0,
                color: GREY,
                align: TextAlign::Center,
            },
            event_dates: TextStyle {
                x: 600,
                y: 580,
                scale: 20.0,
                color: GREY,
                align: TextAlign::Center,
            },
            venue: TextStyle {
                x: 600,
                y: 620,
                scale: 18.0,
                color: GREY,
                align: TextAlign::Center,
            },
            issued_date: TextStyle {
                x: 200,
                y: 780,
                scale: 16.0,
                color: GREY,
                align: TextAlign::Left,
            },
            certificate_id: TextStyle {
                x: 1000,
                y: 780,
                scale: 16.0,
                color: GREY,
                align: TextAlign::Right,
            },
            qr: QrPlacement { x: 1050, y: 50, size: 100 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_matches_template_dimensions() {
        let layout = CertificateLayout::default();
        assert_eq!((layout.width, layout.height), (1200, 900));
        assert_eq!(layout.participant_name.align, TextAlign::Center);
        assert_eq!(layout.issued_date.align, TextAlign::Left);
        assert_eq!(layout.certificate_id.align, TextAlign::Right);
        // QR must sit fully inside the template
        assert!(layout.qr.x + layout.qr.size as i64 <= layout.width as i64);
        assert!(layout.qr.y + layout.qr.size as i64 <= layout.height as i64);
    }
}
