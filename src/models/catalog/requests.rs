use serde::Deserialize;
use ts_rs::TS;

use crate::models::payments::schedule::PaymentPlan;

// 创建课程请求（目录数据由外部维护，此处仅用于初始化与测试）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/catalog.ts")]
pub struct CreateCourseRequest {
    pub title: String,
    pub description: Option<String>,
    pub price: i64,
    pub currency: Option<String>,
    pub installment_count: i32,
    pub payment_plan: Option<PaymentPlan>,
}

// 创建班级请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/catalog.ts")]
pub struct CreateClassRequest {
    pub course_id: i64,
    pub class_name: String,
    pub teacher_name: Option<String>,
    pub schedule: Option<String>,
    pub capacity: i32,
    #[serde(default)]
    pub current_enrollment: i32,
}
