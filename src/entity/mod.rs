//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行读写，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod class_assignment_entries;
pub mod class_assignments;
pub mod classes;
pub mod courses;
pub mod enrollment_requests;
pub mod payment_installments;
pub mod users;
