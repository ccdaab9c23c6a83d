use serde::Deserialize;
use ts_rs::TS;

use super::entities::EnrollmentStatus;
use crate::models::common::{PaginationQuery, pagination::deserialize_optional_string_to_i64};

// 创建选课申请
//
// # student_id 字段说明
// - **学生提交**：可省略，默认使用当前登录学生；如填写必须等于自己的 ID
// - **管理员代提交**：必填
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct CreateEnrollmentRequest {
    pub student_id: Option<i64>,
    pub course_id: i64,
    pub preferred_level: Option<String>,
}

// 批准申请
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct ApproveEnrollmentRequest {
    pub class_id: i64,
    pub admin_notes: Option<String>,
}

// 拒绝申请
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct RejectEnrollmentRequest {
    pub admin_notes: Option<String>,
}

// 申请列表查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct EnrollmentQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<EnrollmentStatus>,
    #[serde(default, deserialize_with = "deserialize_optional_string_to_i64")]
    pub student_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_string_to_i64")]
    pub course_id: Option<i64>,
}

// 申请列表查询参数（用于存储层）
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct EnrollmentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub status: Option<EnrollmentStatus>,
    pub student_id: Option<i64>,
    pub course_id: Option<i64>,
}
