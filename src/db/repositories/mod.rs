mod certificate_repository;
mod enrollment_repository;
mod event_repository;
mod feedback_repository;
mod user_repository;

pub use certificate_repository::CertificateRepository;
pub use enrollment_repository::EnrollmentRepository;
pub use event_repository::EventRepository;
pub use feedback_repository::FeedbackRepository;
pub use user_repository::UserRepository;
