use serde::Deserialize;
use ts_rs::TS;

// 记录付款请求
//
// 传入 installment_no 时作为幂等键：该期已支付则直接返回，不会重复记账
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct RecordPaymentRequest {
    pub installment_no: Option<i32>,
}
