//! 班级名额计数器
//!
//! `current_enrollment` 只能通过这里的条件更新变更：
//! 占用要求 `current_enrollment < capacity`，释放要求 `current_enrollment > 0`。

use crate::entity::classes::{Column, Entity as Classes};
use crate::errors::{EnrollmentError, Result};
use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::{Condition, ConnectionTrait, EntityTrait, QueryFilter};

/// 占用一个名额，班级已满时返回 false
pub(super) async fn claim_seat<C: ConnectionTrait>(db: &C, class_id: i64, now: i64) -> Result<bool> {
    let result = Classes::update_many()
        .col_expr(
            Column::CurrentEnrollment,
            Expr::col(Column::CurrentEnrollment).add(1),
        )
        .col_expr(Column::UpdatedAt, Expr::value(now))
        .filter(Expr::col(Column::Id).eq(class_id))
        .filter(Expr::col(Column::CurrentEnrollment).lt(Expr::col(Column::Capacity)))
        .exec(db)
        .await
        .map_err(|e| EnrollmentError::database_operation(format!("占用班级名额失败: {e}")))?;

    Ok(result.rows_affected > 0)
}

/// 释放一个名额，计数器已为 0 时不做任何修改
pub(super) async fn release_seat<C: ConnectionTrait>(
    db: &C,
    class_id: i64,
    now: i64,
) -> Result<bool> {
    let result = Classes::update_many()
        .col_expr(
            Column::CurrentEnrollment,
            Expr::col(Column::CurrentEnrollment).sub(1),
        )
        .col_expr(Column::UpdatedAt, Expr::value(now))
        .filter(Expr::col(Column::Id).eq(class_id))
        .filter(Expr::col(Column::CurrentEnrollment).gt(0))
        .exec(db)
        .await
        .map_err(|e| EnrollmentError::database_operation(format!("释放班级名额失败: {e}")))?;

    if result.rows_affected == 0 {
        tracing::warn!("Class {} seat counter already at zero, release skipped", class_id);
    }

    Ok(result.rows_affected > 0)
}

/// 名额未满的条件表达式，供只读查询使用
pub(super) fn has_free_seat() -> Condition {
    Condition::all().add(Expr::col(Column::CurrentEnrollment).lt(Expr::col(Column::Capacity)))
}
