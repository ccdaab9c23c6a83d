//! 分期付款方案与排期计算
//!
//! 金额一律使用最小货币单位（i64）。百分比在内部换算为百万分之一的整数份额，
//! 保证舍入规则稳定且各期金额之和与课程价格严格相等。

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::{AmountType, InstallmentStatus};
use crate::errors::{EnrollmentError, Result};

/// 最大分期数
pub const MAX_INSTALLMENTS: usize = 12;

/// 100% 对应的百万分之一份额
const WHOLE_SHARE: i64 = 1_000_000;

/// 课程分期方案
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "amount_type", rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/payment.ts")]
pub enum PaymentPlan {
    /// 固定金额，总和必须等于课程价格
    Fixed { amounts: Vec<i64> },
    /// 百分比（最多四位小数），总和必须为 100
    Percentage { percentages: Vec<f64> },
}

/// 待写入的分期记录
#[derive(Debug, Clone, PartialEq)]
pub struct InstallmentDraft {
    pub installment_no: i32,
    pub amount: i64,
    pub amount_type: AmountType,
    pub percentage: Option<f64>,
    pub due_date: DateTime<Utc>,
    pub status: InstallmentStatus,
}

impl PaymentPlan {
    /// 按分期数平均拆分的百分比方案，余数计入最后一期
    ///
    /// 分期数超出 1..=12 时返回空方案，由 `validate` 拒绝。
    pub fn equal_split(count: i32) -> Self {
        let count = i64::from(count);
        if count < 1 || count > MAX_INSTALLMENTS as i64 {
            return PaymentPlan::Percentage {
                percentages: vec![],
            };
        }

        let share = WHOLE_SHARE / count;
        let last = WHOLE_SHARE - share * (count - 1);
        let percentages = (0..count)
            .map(|i| {
                let millionths = if i == count - 1 { last } else { share };
                millionths as f64 / 10_000.0
            })
            .collect();

        PaymentPlan::Percentage { percentages }
    }

    pub fn amount_type(&self) -> AmountType {
        match self {
            PaymentPlan::Fixed { .. } => AmountType::Fixed,
            PaymentPlan::Percentage { .. } => AmountType::Percentage,
        }
    }

    pub fn installment_count(&self) -> usize {
        match self {
            PaymentPlan::Fixed { amounts } => amounts.len(),
            PaymentPlan::Percentage { percentages } => percentages.len(),
        }
    }

    /// 校验方案是否适用于给定价格
    pub fn validate(&self, price: i64) -> Result<()> {
        if price < 0 {
            return Err(EnrollmentError::validation("Course price must not be negative"));
        }

        let count = self.installment_count();
        if count == 0 || count > MAX_INSTALLMENTS {
            return Err(EnrollmentError::validation(format!(
                "Installment count must be between 1 and {MAX_INSTALLMENTS}, got {count}"
            )));
        }

        match self {
            PaymentPlan::Fixed { amounts } => {
                if amounts.iter().any(|amount| *amount < 0) {
                    return Err(EnrollmentError::validation(
                        "Fixed installment amounts must not be negative",
                    ));
                }
                let total = checked_sum(amounts).ok_or_else(|| {
                    EnrollmentError::validation("Fixed installment amounts overflow")
                })?;
                if total != price {
                    return Err(EnrollmentError::validation(format!(
                        "Fixed installment amounts sum to {total}, expected course price {price}"
                    )));
                }
            }
            PaymentPlan::Percentage { percentages } => {
                if percentages
                    .iter()
                    .any(|p| !p.is_finite() || *p < 0.0 || *p > 100.0)
                {
                    return Err(EnrollmentError::validation(
                        "Installment percentages must be numbers between 0 and 100",
                    ));
                }
                let total = checked_sum(&to_millionths(percentages)).ok_or_else(|| {
                    EnrollmentError::validation("Installment percentages overflow")
                })?;
                if total != WHOLE_SHARE {
                    return Err(EnrollmentError::validation(format!(
                        "Installment percentages sum to {}, expected 100",
                        total as f64 / 10_000.0
                    )));
                }
            }
        }

        Ok(())
    }

    /// 生成分期排期
    ///
    /// 第一期在 `start` 到期（状态为 unpaid），之后每隔 `interval_months` 个月一期。
    pub fn build_schedule(
        &self,
        price: i64,
        start: DateTime<Utc>,
        interval_months: u32,
    ) -> Result<Vec<InstallmentDraft>> {
        self.validate(price)?;

        let amounts = match self {
            PaymentPlan::Fixed { amounts } => amounts.clone(),
            PaymentPlan::Percentage { percentages } => {
                split_by_shares(price, &to_millionths(percentages))
            }
        };
        let percentages: Vec<Option<f64>> = match self {
            PaymentPlan::Fixed { amounts } => vec![None; amounts.len()],
            PaymentPlan::Percentage { percentages } => {
                percentages.iter().map(|p| Some(*p)).collect()
            }
        };

        let amount_type = self.amount_type();
        let drafts = amounts
            .into_iter()
            .zip(percentages)
            .enumerate()
            .map(|(index, (amount, percentage))| {
                let offset = interval_months.saturating_mul(index as u32);
                let due_date = start
                    .checked_add_months(Months::new(offset))
                    .unwrap_or(start);
                let status = if due_date <= start {
                    InstallmentStatus::Unpaid
                } else {
                    InstallmentStatus::Pending
                };

                InstallmentDraft {
                    installment_no: index as i32 + 1,
                    amount,
                    amount_type: amount_type.clone(),
                    percentage,
                    due_date,
                    status,
                }
            })
            .collect();

        Ok(drafts)
    }
}

fn checked_sum(values: &[i64]) -> Option<i64> {
    values.iter().try_fold(0i64, |acc, v| acc.checked_add(*v))
}

/// 百分比换算为百万分之一份额（保留四位小数）
fn to_millionths(percentages: &[f64]) -> Vec<i64> {
    percentages
        .iter()
        .map(|p| (p * 10_000.0).round() as i64)
        .collect()
}

/// 四舍五入（round-half-up）计算 `price * share / 1_000_000`
fn round_half_up(price: i64, share: i64) -> i64 {
    let numerator = price as i128 * share as i128 + (WHOLE_SHARE / 2) as i128;
    (numerator / WHOLE_SHARE as i128) as i64
}

/// 按份额拆分金额：每期独立舍入，累计不超过总价，余数计入最后一期
fn split_by_shares(price: i64, shares: &[i64]) -> Vec<i64> {
    let last = shares.len().saturating_sub(1);
    let mut allocated = 0i64;

    shares
        .iter()
        .enumerate()
        .map(|(index, share)| {
            let amount = if index == last {
                price - allocated
            } else {
                round_half_up(price, *share).min(price - allocated)
            };
            allocated += amount;
            amount
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_735_689_600, 0).unwrap() // 2025-01-01
    }

    #[test]
    fn test_equal_split_three_installments() {
        let plan = PaymentPlan::equal_split(3);
        let drafts = plan.build_schedule(30_000, start(), 1).unwrap();

        let amounts: Vec<i64> = drafts.iter().map(|d| d.amount).collect();
        assert_eq!(amounts, vec![10_000, 10_000, 10_000]);
        assert!(drafts.iter().all(|d| d.amount_type == AmountType::Percentage));
    }

    #[test]
    fn test_sum_matches_price_for_all_counts() {
        let prices = [0, 1, 7, 99, 100, 101, 12_345, 30_000, 99_999, 1_000_001];
        for count in 1..=12 {
            let plan = PaymentPlan::equal_split(count);
            for price in prices {
                let drafts = plan.build_schedule(price, start(), 1).unwrap();
                assert_eq!(drafts.len(), count as usize);
                assert_eq!(
                    drafts.iter().map(|d| d.amount).sum::<i64>(),
                    price,
                    "count={count} price={price}"
                );
                assert!(drafts.iter().all(|d| d.amount >= 0));
            }
        }
    }

    #[test]
    fn test_rounding_remainder_goes_to_last_installment() {
        let plan = PaymentPlan::Percentage {
            percentages: vec![33.3333, 33.3333, 33.3334],
        };
        let drafts = plan.build_schedule(10_000, start(), 1).unwrap();
        let amounts: Vec<i64> = drafts.iter().map(|d| d.amount).collect();
        assert_eq!(amounts, vec![3_333, 3_333, 3_334]);
    }

    #[test]
    fn test_round_half_up() {
        // 12.5% * 100 = 12.5 -> 13
        assert_eq!(round_half_up(100, 125_000), 13);
        // 12.4% * 100 = 12.4 -> 12
        assert_eq!(round_half_up(100, 124_000), 12);
    }

    #[test]
    fn test_fixed_plan_must_match_price() {
        let plan = PaymentPlan::Fixed {
            amounts: vec![100, 200],
        };
        assert!(plan.validate(300).is_ok());

        let err = plan.validate(301).unwrap_err();
        assert_eq!(err.code(), "E006");
    }

    #[test]
    fn test_percentage_plan_must_sum_to_hundred() {
        let plan = PaymentPlan::Percentage {
            percentages: vec![50.0, 40.0],
        };
        assert!(plan.validate(1_000).is_err());
    }

    #[test]
    fn test_installment_count_bounds() {
        assert!(PaymentPlan::equal_split(0).validate(100).is_err());
        assert!(PaymentPlan::equal_split(13).validate(100).is_err());
        assert!(PaymentPlan::equal_split(12).validate(100).is_ok());
    }

    #[test]
    fn test_oversized_plans_are_rejected() {
        let fixed = PaymentPlan::Fixed {
            amounts: vec![i64::MAX, 1],
        };
        assert_eq!(fixed.validate(100).unwrap_err().code(), "E006");

        let percentage = PaymentPlan::Percentage {
            percentages: vec![1e300, 1e300],
        };
        assert_eq!(percentage.validate(100).unwrap_err().code(), "E006");

        assert_eq!(PaymentPlan::equal_split(i32::MAX).installment_count(), 0);
        assert_eq!(PaymentPlan::equal_split(i32::MIN).installment_count(), 0);
    }

    #[test]
    fn test_due_dates_and_initial_status() {
        let plan = PaymentPlan::Fixed {
            amounts: vec![100, 100, 100],
        };
        let drafts = plan.build_schedule(300, start(), 1).unwrap();

        assert_eq!(drafts[0].status, InstallmentStatus::Unpaid);
        assert_eq!(drafts[0].due_date, start());
        assert_eq!(drafts[1].status, InstallmentStatus::Pending);
        assert_eq!(
            drafts[1].due_date,
            start().checked_add_months(Months::new(1)).unwrap()
        );
        assert_eq!(drafts[2].installment_no, 3);
        assert!(drafts.iter().all(|d| d.percentage.is_none()));
    }
}
