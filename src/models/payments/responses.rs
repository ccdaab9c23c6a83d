use serde::Serialize;
use ts_rs::TS;

use super::entities::{InstallmentStatus, PaymentInstallment};

// 分期列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct InstallmentListResponse {
    pub enrollment_request_id: i64,
    pub total_amount: i64,
    pub paid_amount: i64,
    pub outstanding_amount: i64,
    pub items: Vec<PaymentInstallment>,
}

impl InstallmentListResponse {
    pub fn new(enrollment_request_id: i64, items: Vec<PaymentInstallment>) -> Self {
        let total_amount = items.iter().map(|i| i.amount).sum();
        let paid_amount = items
            .iter()
            .filter(|i| i.status == InstallmentStatus::Paid)
            .map(|i| i.amount)
            .sum();
        let outstanding_amount = items
            .iter()
            .filter(|i| i.status.is_outstanding())
            .map(|i| i.amount)
            .sum();

        Self {
            enrollment_request_id,
            total_amount,
            paid_amount,
            outstanding_amount,
            items,
        }
    }
}
