use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::{EnrollmentError, Result};

// 选课申请状态
//
// pending 为初始状态；approved / rejected 为管理员的决定；
// unassigned 表示已批准的申请被管理员移出班级，属于终态，不会回到 pending。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub enum EnrollmentStatus {
    Pending,
    Approved,
    Rejected,
    Unassigned,
}

/// 合法状态迁移表，状态只能在存储层的唯一写入点按此表变更
const TRANSITIONS: &[(EnrollmentStatus, EnrollmentStatus)] = &[
    (EnrollmentStatus::Pending, EnrollmentStatus::Approved),
    (EnrollmentStatus::Pending, EnrollmentStatus::Rejected),
    (EnrollmentStatus::Approved, EnrollmentStatus::Unassigned),
];

impl EnrollmentStatus {
    pub const PENDING: &'static str = "pending";
    pub const APPROVED: &'static str = "approved";
    pub const REJECTED: &'static str = "rejected";
    pub const UNASSIGNED: &'static str = "unassigned";

    pub fn can_transition_to(self, next: EnrollmentStatus) -> bool {
        TRANSITIONS.contains(&(self, next))
    }

    /// 校验迁移是否合法
    pub fn ensure_transition(self, next: EnrollmentStatus) -> Result<()> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(EnrollmentError::invalid_state(format!(
                "Enrollment request cannot move from {self} to {next}"
            )))
        }
    }
}

impl std::fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnrollmentStatus::Pending => write!(f, "{}", EnrollmentStatus::PENDING),
            EnrollmentStatus::Approved => write!(f, "{}", EnrollmentStatus::APPROVED),
            EnrollmentStatus::Rejected => write!(f, "{}", EnrollmentStatus::REJECTED),
            EnrollmentStatus::Unassigned => write!(f, "{}", EnrollmentStatus::UNASSIGNED),
        }
    }
}

impl std::str::FromStr for EnrollmentStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            EnrollmentStatus::PENDING => Ok(EnrollmentStatus::Pending),
            EnrollmentStatus::APPROVED => Ok(EnrollmentStatus::Approved),
            EnrollmentStatus::REJECTED => Ok(EnrollmentStatus::Rejected),
            EnrollmentStatus::UNASSIGNED => Ok(EnrollmentStatus::Unassigned),
            _ => Err(format!("Invalid enrollment status: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct EnrollmentRequest {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub preferred_level: Option<String>,
    pub status: EnrollmentStatus,
    pub request_date: chrono::DateTime<chrono::Utc>,
    pub approval_date: Option<chrono::DateTime<chrono::Utc>>,
    pub assigned_class_id: Option<i64>,
    pub admin_notes: Option<String>,
    pub registration_fee_paid: bool,
    pub payment_date: Option<chrono::DateTime<chrono::Utc>>,
    pub unassigned_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl EnrollmentRequest {
    /// approved ⇔ 已分配班级 ⇔ 有批准时间
    pub fn is_consistent(&self) -> bool {
        let approved = self.status == EnrollmentStatus::Approved;
        approved == self.assigned_class_id.is_some() && approved == self.approval_date.is_some()
    }
}
