//! 课程实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub price: i64,
    pub currency: String,
    pub installment_count: i32,
    // JSON 格式的分期方案
    pub payment_plan: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::classes::Entity")]
    Classes,
    #[sea_orm(has_many = "super::enrollment_requests::Entity")]
    EnrollmentRequests,
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Classes.def()
    }
}

impl Related<super::enrollment_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EnrollmentRequests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 转换为业务模型，分期方案 JSON 无法解析时返回序列化错误
    pub fn into_course(self) -> crate::errors::Result<crate::models::catalog::entities::Course> {
        use crate::models::catalog::entities::Course;
        use crate::models::payments::schedule::PaymentPlan;
        use chrono::{DateTime, Utc};

        let payment_plan = self
            .payment_plan
            .as_deref()
            .map(serde_json::from_str::<PaymentPlan>)
            .transpose()?;

        Ok(Course {
            id: self.id,
            title: self.title,
            description: self.description,
            price: self.price,
            currency: self.currency,
            installment_count: self.installment_count,
            payment_plan,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        })
    }
}
