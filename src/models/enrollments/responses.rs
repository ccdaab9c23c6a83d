use serde::Serialize;
use ts_rs::TS;

use super::entities::EnrollmentRequest;
use crate::models::{
    catalog::entities::{Class, Course},
    common::PaginationInfo,
    payments::entities::PaymentInstallment,
    users::entities::User,
};

// 申请列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct EnrollmentListResponse {
    pub pagination: PaginationInfo,
    pub items: Vec<EnrollmentRequest>,
}

// 申请详情（附带学生、课程、班级与分期信息）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct EnrollmentRequestDetail {
    pub request: EnrollmentRequest,
    pub student: Option<User>,
    pub course: Option<Course>,
    pub assigned_class: Option<Class>,
    pub installments: Vec<PaymentInstallment>,
}

// 删除回执
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct EnrollmentDeletionReceipt {
    pub id: i64,
    pub deleted_by: i64,
    pub deleted_at: chrono::DateTime<chrono::Utc>,
    // 级联释放的班级
    pub released_class_id: Option<i64>,
}
