pub mod catalog;
pub mod class_assignments;
pub mod common;
pub mod enrollments;
pub mod payments;
pub mod users;

pub use common::{ApiResponse, ErrorCode, PaginatedResponse, PaginationInfo, PaginationQuery};
