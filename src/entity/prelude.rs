//! 预导入模块，方便使用

pub use super::class_assignment_entries::{
    ActiveModel as ClassAssignmentEntryActiveModel, Entity as ClassAssignmentEntries,
    Model as ClassAssignmentEntryModel,
};
pub use super::class_assignments::{
    ActiveModel as ClassAssignmentActiveModel, Entity as ClassAssignments,
    Model as ClassAssignmentModel,
};
pub use super::classes::{ActiveModel as ClassActiveModel, Entity as Classes, Model as ClassModel};
pub use super::courses::{
    ActiveModel as CourseActiveModel, Entity as Courses, Model as CourseModel,
};
pub use super::enrollment_requests::{
    ActiveModel as EnrollmentRequestActiveModel, Entity as EnrollmentRequests,
    Model as EnrollmentRequestModel,
};
pub use super::payment_installments::{
    ActiveModel as PaymentInstallmentActiveModel, Entity as PaymentInstallments,
    Model as PaymentInstallmentModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
