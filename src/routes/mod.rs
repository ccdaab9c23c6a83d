pub mod enrollments;

pub mod students;

pub use enrollments::configure_enrollment_routes;
pub use students::configure_student_routes;
