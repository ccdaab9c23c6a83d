//! 分期付款存储操作

use super::{SeaOrmStorage, enrollments::require_active_request};
use crate::entity::payment_installments::{
    Column, Entity as PaymentInstallments, Model as InstallmentModel,
};
use crate::errors::{EnrollmentError, Result};
use crate::models::{
    enrollments::entities::EnrollmentStatus,
    payments::entities::{InstallmentStatus, PaymentInstallment},
};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

/// 将已到期的 pending 分期提升为 unpaid
async fn promote_due_installments<C: ConnectionTrait>(
    db: &C,
    request_id: i64,
    now: i64,
) -> Result<u64> {
    let result = PaymentInstallments::update_many()
        .col_expr(Column::Status, Expr::value(InstallmentStatus::UNPAID))
        .filter(Column::EnrollmentRequestId.eq(request_id))
        .filter(Column::Status.eq(InstallmentStatus::PENDING))
        .filter(Column::DueDate.lte(now))
        .exec(db)
        .await
        .map_err(|e| EnrollmentError::database_operation(format!("更新分期状态失败: {e}")))?;

    Ok(result.rows_affected)
}

/// 按到期时间、期数排序读取分期
async fn load_installments<C: ConnectionTrait>(
    db: &C,
    request_id: i64,
) -> Result<Vec<InstallmentModel>> {
    PaymentInstallments::find()
        .filter(Column::EnrollmentRequestId.eq(request_id))
        .order_by_asc(Column::DueDate)
        .order_by_asc(Column::InstallmentNo)
        .all(db)
        .await
        .map_err(|e| EnrollmentError::database_operation(format!("查询分期失败: {e}")))
}

fn parse_installment_status(model: &InstallmentModel) -> Result<InstallmentStatus> {
    model.status.parse::<InstallmentStatus>().map_err(|e| {
        EnrollmentError::database_operation(format!("分期 {} 状态无效: {e}", model.id))
    })
}

impl SeaOrmStorage {
    /// 列出分期（按到期时间、期数排序）
    pub async fn list_installments_impl(&self, request_id: i64) -> Result<Vec<PaymentInstallment>> {
        require_active_request(&self.db, request_id).await?;

        let now = chrono::Utc::now().timestamp();
        promote_due_installments(&self.db, request_id, now).await?;

        Ok(load_installments(&self.db, request_id)
            .await?
            .into_iter()
            .map(|m| m.into_installment())
            .collect())
    }

    /// 记录付款
    ///
    /// 推进最早到期的未付分期为 paid。传入 `installment_no` 时作为幂等键：
    /// 该期已支付则原样返回，不是下一期待付时返回校验错误。
    pub async fn record_payment_impl(
        &self,
        request_id: i64,
        installment_no: Option<i32>,
    ) -> Result<PaymentInstallment> {
        let txn = self.begin_write().await?;

        let request = require_active_request(&txn, request_id).await?;
        if request.status != EnrollmentStatus::APPROVED {
            return Err(EnrollmentError::invalid_state(format!(
                "Enrollment request {request_id} is {}, payments require an approved request",
                request.status
            )));
        }

        let now = chrono::Utc::now().timestamp();
        promote_due_installments(&txn, request_id, now).await?;
        let installments = load_installments(&txn, request_id).await?;

        if let Some(no) = installment_no {
            let target = installments
                .iter()
                .find(|i| i.installment_no == no)
                .ok_or_else(|| {
                    EnrollmentError::validation(format!(
                        "Installment {no} does not exist for request {request_id}"
                    ))
                })?;
            if parse_installment_status(target)? == InstallmentStatus::Paid {
                return Ok(target.clone().into_installment());
            }
        }

        let mut next = None;
        for installment in &installments {
            if parse_installment_status(installment)?.is_outstanding() {
                next = Some(installment);
                break;
            }
        }
        let next = next.ok_or_else(|| {
            EnrollmentError::already_satisfied(format!(
                "All installments of request {request_id} are settled"
            ))
        })?;

        if let Some(no) = installment_no
            && next.installment_no != no
        {
            return Err(EnrollmentError::validation(format!(
                "Installment {no} is not the next outstanding installment (expected {})",
                next.installment_no
            )));
        }

        let updated = PaymentInstallments::update_many()
            .col_expr(Column::Status, Expr::value(InstallmentStatus::PAID))
            .col_expr(Column::PaidDate, Expr::value(now))
            .filter(Column::Id.eq(next.id))
            .filter(Column::Status.is_in(InstallmentStatus::outstanding_values()))
            .exec(&txn)
            .await
            .map_err(|e| EnrollmentError::database_operation(format!("记录付款失败: {e}")))?;
        if updated.rows_affected == 0 {
            return Err(EnrollmentError::invalid_state(format!(
                "Installment {} was settled concurrently",
                next.installment_no
            )));
        }

        let paid = PaymentInstallments::find_by_id(next.id)
            .one(&txn)
            .await
            .map_err(|e| EnrollmentError::database_operation(format!("查询分期失败: {e}")))?
            .ok_or_else(|| {
                EnrollmentError::not_found(format!("Installment {} not found", next.installment_no))
            })?;

        txn.commit()
            .await
            .map_err(|e| EnrollmentError::database_operation(format!("提交事务失败: {e}")))?;

        tracing::info!(
            "Recorded payment for installment {} of request {}",
            paid.installment_no,
            request_id
        );

        Ok(paid.into_installment())
    }

    /// 退款（paid -> refunded）
    pub async fn refund_installment_impl(
        &self,
        request_id: i64,
        installment_no: i32,
    ) -> Result<PaymentInstallment> {
        let txn = self.begin_write().await?;

        require_active_request(&txn, request_id).await?;

        let installment = PaymentInstallments::find()
            .filter(Column::EnrollmentRequestId.eq(request_id))
            .filter(Column::InstallmentNo.eq(installment_no))
            .one(&txn)
            .await
            .map_err(|e| EnrollmentError::database_operation(format!("查询分期失败: {e}")))?
            .ok_or_else(|| {
                EnrollmentError::not_found(format!(
                    "Installment {installment_no} not found for request {request_id}"
                ))
            })?;

        let status = parse_installment_status(&installment)?;
        if !status.can_transition_to(&InstallmentStatus::Refunded) {
            return Err(EnrollmentError::invalid_state(format!(
                "Installment {installment_no} is {status}, only paid installments can be refunded"
            )));
        }

        let now = chrono::Utc::now().timestamp();
        let updated = PaymentInstallments::update_many()
            .col_expr(Column::Status, Expr::value(InstallmentStatus::REFUNDED))
            .col_expr(Column::RefundedAt, Expr::value(now))
            .filter(Column::Id.eq(installment.id))
            .filter(Column::Status.eq(InstallmentStatus::PAID))
            .exec(&txn)
            .await
            .map_err(|e| EnrollmentError::database_operation(format!("退款失败: {e}")))?;
        if updated.rows_affected == 0 {
            return Err(EnrollmentError::invalid_state(format!(
                "Installment {installment_no} is no longer paid"
            )));
        }

        let refunded = PaymentInstallments::find_by_id(installment.id)
            .one(&txn)
            .await
            .map_err(|e| EnrollmentError::database_operation(format!("查询分期失败: {e}")))?
            .ok_or_else(|| {
                EnrollmentError::not_found(format!("Installment {installment_no} not found"))
            })?;

        txn.commit()
            .await
            .map_err(|e| EnrollmentError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(refunded.into_installment())
    }
}
