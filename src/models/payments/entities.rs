use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 分期金额类型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub enum AmountType {
    Fixed,
    Percentage,
}

impl std::fmt::Display for AmountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AmountType::Fixed => write!(f, "fixed"),
            AmountType::Percentage => write!(f, "percentage"),
        }
    }
}

impl std::str::FromStr for AmountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fixed" => Ok(AmountType::Fixed),
            "percentage" => Ok(AmountType::Percentage),
            _ => Err(format!("Invalid amount type: {s}")),
        }
    }
}

// 分期状态
//
// pending（未到期） -> unpaid（已到期未付） -> paid -> refunded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub enum InstallmentStatus {
    Pending,
    Unpaid,
    Paid,
    Refunded,
}

impl InstallmentStatus {
    pub const PENDING: &'static str = "pending";
    pub const UNPAID: &'static str = "unpaid";
    pub const PAID: &'static str = "paid";
    pub const REFUNDED: &'static str = "refunded";

    /// 仍待支付
    pub fn is_outstanding(&self) -> bool {
        matches!(self, InstallmentStatus::Pending | InstallmentStatus::Unpaid)
    }

    pub fn can_transition_to(&self, next: &InstallmentStatus) -> bool {
        matches!(
            (self, next),
            (InstallmentStatus::Pending, InstallmentStatus::Unpaid)
                | (InstallmentStatus::Pending, InstallmentStatus::Paid)
                | (InstallmentStatus::Unpaid, InstallmentStatus::Paid)
                | (InstallmentStatus::Paid, InstallmentStatus::Refunded)
        )
    }

    pub fn outstanding_values() -> [&'static str; 2] {
        [Self::PENDING, Self::UNPAID]
    }
}

impl std::fmt::Display for InstallmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstallmentStatus::Pending => write!(f, "{}", InstallmentStatus::PENDING),
            InstallmentStatus::Unpaid => write!(f, "{}", InstallmentStatus::UNPAID),
            InstallmentStatus::Paid => write!(f, "{}", InstallmentStatus::PAID),
            InstallmentStatus::Refunded => write!(f, "{}", InstallmentStatus::REFUNDED),
        }
    }
}

impl std::str::FromStr for InstallmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            InstallmentStatus::PENDING => Ok(InstallmentStatus::Pending),
            InstallmentStatus::UNPAID => Ok(InstallmentStatus::Unpaid),
            InstallmentStatus::PAID => Ok(InstallmentStatus::Paid),
            InstallmentStatus::REFUNDED => Ok(InstallmentStatus::Refunded),
            _ => Err(format!("Invalid installment status: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub struct PaymentInstallment {
    pub id: i64,
    pub enrollment_request_id: i64,
    // 期数（从 1 开始，按插入顺序）
    pub installment_no: i32,
    // 金额（最小货币单位）
    pub amount: i64,
    pub amount_type: AmountType,
    // 百分比方案下的份额
    pub percentage: Option<f64>,
    pub status: InstallmentStatus,
    pub due_date: chrono::DateTime<chrono::Utc>,
    pub paid_date: Option<chrono::DateTime<chrono::Utc>>,
    pub refunded_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
