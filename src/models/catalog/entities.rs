use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::payments::schedule::PaymentPlan;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/catalog.ts")]
pub struct Course {
    // 课程ID
    pub id: i64,
    // 课程名称
    pub title: String,
    // 课程描述
    pub description: Option<String>,
    // 课程价格（最小货币单位，如分）
    pub price: i64,
    // 货币代码
    pub currency: String,
    // 分期数
    pub installment_count: i32,
    // 自定义分期方案，为空时按分期数平均拆分
    pub payment_plan: Option<PaymentPlan>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Course {
    /// 生效的分期方案
    pub fn effective_payment_plan(&self) -> PaymentPlan {
        match &self.payment_plan {
            Some(plan) => plan.clone(),
            None => PaymentPlan::equal_split(self.installment_count),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/catalog.ts")]
pub struct Class {
    // 班级ID
    pub id: i64,
    // 所属课程ID
    pub course_id: i64,
    // 班级名称
    pub class_name: String,
    // 授课教师
    pub teacher_name: Option<String>,
    // 上课时间
    pub schedule: Option<String>,
    // 容量
    pub capacity: i32,
    // 当前已分配人数
    pub current_enrollment: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Class {
    pub fn remaining_seats(&self) -> i32 {
        (self.capacity - self.current_enrollment).max(0)
    }

    pub fn has_capacity(&self) -> bool {
        self.current_enrollment < self.capacity
    }
}
