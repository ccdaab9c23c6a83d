//! 分期付款实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payment_installments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub enrollment_request_id: i64,
    pub installment_no: i32,
    pub amount: i64,
    pub amount_type: String,
    pub percentage: Option<f64>,
    pub status: String,
    pub due_date: i64,
    pub paid_date: Option<i64>,
    pub refunded_at: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::enrollment_requests::Entity",
        from = "Column::EnrollmentRequestId",
        to = "super::enrollment_requests::Column::Id"
    )]
    EnrollmentRequest,
}

impl Related<super::enrollment_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EnrollmentRequest.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_installment(self) -> crate::models::payments::entities::PaymentInstallment {
        use crate::models::payments::entities::{
            AmountType, InstallmentStatus, PaymentInstallment,
        };
        use chrono::{DateTime, Utc};

        let ts = |secs: i64| DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or_default();

        PaymentInstallment {
            id: self.id,
            enrollment_request_id: self.enrollment_request_id,
            installment_no: self.installment_no,
            amount: self.amount,
            amount_type: self
                .amount_type
                .parse::<AmountType>()
                .unwrap_or(AmountType::Fixed),
            percentage: self.percentage,
            status: self
                .status
                .parse::<InstallmentStatus>()
                .unwrap_or(InstallmentStatus::Unpaid),
            due_date: ts(self.due_date),
            paid_date: self.paid_date.map(ts),
            refunded_at: self.refunded_at.map(ts),
            created_at: ts(self.created_at),
        }
    }
}
