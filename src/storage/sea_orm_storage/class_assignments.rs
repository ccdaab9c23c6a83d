//! 分班存储操作

use std::collections::{HashMap, HashSet};

use super::{
    SeaOrmStorage,
    enrollments::{parse_status, remove_assignment_entry},
    seats,
};
use crate::entity::class_assignment_entries::{
    Column as EntryColumn, Entity as ClassAssignmentEntries, Model as EntryModel,
};
use crate::entity::class_assignments::{Column as AssignmentColumn, Entity as ClassAssignments};
use crate::entity::classes::{Column as ClassColumn, Entity as Classes};
use crate::entity::courses::{Column as CourseColumn, Entity as Courses};
use crate::entity::enrollment_requests::{Column as RequestColumn, Entity as EnrollmentRequests};
use crate::errors::{EnrollmentError, Result};
use crate::models::{
    catalog::entities::Class,
    class_assignments::{entities::ClassAssignment, responses::AssignedClass},
    enrollments::entities::EnrollmentStatus,
};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};

/// 按分配时间读取学生的分班条目
async fn load_entries<C: ConnectionTrait>(db: &C, student_id: i64) -> Result<Vec<EntryModel>> {
    ClassAssignmentEntries::find()
        .filter(EntryColumn::StudentId.eq(student_id))
        .order_by_asc(EntryColumn::AssignedAt)
        .order_by_asc(EntryColumn::Id)
        .all(db)
        .await
        .map_err(|e| EnrollmentError::database_operation(format!("查询分班条目失败: {e}")))
}

/// 读取学生的分班文档
async fn load_assignment<C: ConnectionTrait>(
    db: &C,
    student_id: i64,
) -> Result<Option<ClassAssignment>> {
    let Some(document) = ClassAssignments::find()
        .filter(AssignmentColumn::StudentId.eq(student_id))
        .one(db)
        .await
        .map_err(|e| EnrollmentError::database_operation(format!("查询分班记录失败: {e}")))?
    else {
        return Ok(None);
    };

    let class_ids = load_entries(db, student_id)
        .await?
        .into_iter()
        .map(|entry| entry.class_id)
        .collect();

    Ok(Some(ClassAssignment {
        student_id,
        class_ids,
        updated_at: DateTime::<Utc>::from_timestamp(document.updated_at, 0),
    }))
}

/// 指向被移除班级的申请迁移为 unassigned
async fn unassign_requests<C: ConnectionTrait>(
    db: &C,
    student_id: i64,
    class_id: i64,
    now: i64,
) -> Result<u64> {
    let requests = EnrollmentRequests::find()
        .filter(RequestColumn::StudentId.eq(student_id))
        .filter(RequestColumn::AssignedClassId.eq(class_id))
        .filter(RequestColumn::DeletedAt.is_null())
        .all(db)
        .await
        .map_err(|e| EnrollmentError::database_operation(format!("查询选课申请失败: {e}")))?;

    let mut unassigned = 0;
    for request in requests {
        let from = parse_status(&request)?;
        from.ensure_transition(EnrollmentStatus::Unassigned)?;

        let updated = EnrollmentRequests::update_many()
            .col_expr(RequestColumn::Status, Expr::value(EnrollmentStatus::UNASSIGNED))
            .col_expr(RequestColumn::AssignedClassId, Expr::value(Option::<i64>::None))
            .col_expr(RequestColumn::ApprovalDate, Expr::value(Option::<i64>::None))
            .col_expr(RequestColumn::UnassignedAt, Expr::value(now))
            .col_expr(RequestColumn::UpdatedAt, Expr::value(now))
            .filter(RequestColumn::Id.eq(request.id))
            .filter(RequestColumn::Status.eq(from.to_string()))
            .filter(RequestColumn::DeletedAt.is_null())
            .exec(db)
            .await
            .map_err(|e| EnrollmentError::database_operation(format!("更新申请状态失败: {e}")))?;
        if updated.rows_affected == 0 {
            return Err(EnrollmentError::invalid_state(format!(
                "Enrollment request {} changed concurrently",
                request.id
            )));
        }
        unassigned += updated.rows_affected;
    }

    Ok(unassigned)
}

impl SeaOrmStorage {
    /// 获取学生的分班记录
    pub async fn get_class_assignment_impl(
        &self,
        student_id: i64,
    ) -> Result<Option<ClassAssignment>> {
        load_assignment(&self.db, student_id).await
    }

    /// 学生可选的班级
    ///
    /// 范围：学生已获批课程下、尚未分配且仍有名额的班级。
    pub async fn get_available_classes_impl(&self, student_id: i64) -> Result<Vec<Class>> {
        let course_ids: HashSet<i64> = EnrollmentRequests::find()
            .filter(RequestColumn::StudentId.eq(student_id))
            .filter(RequestColumn::Status.eq(EnrollmentStatus::APPROVED))
            .filter(RequestColumn::DeletedAt.is_null())
            .all(&self.db)
            .await
            .map_err(|e| EnrollmentError::database_operation(format!("查询选课申请失败: {e}")))?
            .into_iter()
            .map(|request| request.course_id)
            .collect();
        if course_ids.is_empty() {
            return Ok(Vec::new());
        }

        let assigned: Vec<i64> = load_entries(&self.db, student_id)
            .await?
            .into_iter()
            .map(|entry| entry.class_id)
            .collect();

        let mut select = Classes::find()
            .filter(ClassColumn::CourseId.is_in(course_ids))
            .filter(seats::has_free_seat());
        if !assigned.is_empty() {
            select = select.filter(ClassColumn::Id.is_not_in(assigned));
        }

        let classes = select
            .order_by_asc(ClassColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| EnrollmentError::database_operation(format!("查询可选班级失败: {e}")))?;

        Ok(classes.into_iter().map(|m| m.into_class()).collect())
    }

    /// 已分配班级数量，无记录时为 0
    pub async fn count_assigned_classes_impl(&self, student_id: i64) -> Result<i64> {
        let count = ClassAssignmentEntries::find()
            .filter(EntryColumn::StudentId.eq(student_id))
            .count(&self.db)
            .await
            .map_err(|e| EnrollmentError::database_operation(format!("统计分班数量失败: {e}")))?;

        Ok(count as i64)
    }

    /// 已分配班级列表（按分配时间排序）
    pub async fn get_student_assigned_classes_impl(
        &self,
        student_id: i64,
    ) -> Result<Vec<AssignedClass>> {
        let rows = ClassAssignmentEntries::find()
            .filter(EntryColumn::StudentId.eq(student_id))
            .order_by_asc(EntryColumn::AssignedAt)
            .order_by_asc(EntryColumn::Id)
            .find_also_related(Classes)
            .all(&self.db)
            .await
            .map_err(|e| EnrollmentError::database_operation(format!("查询已分配班级失败: {e}")))?;

        let course_ids: HashSet<i64> = rows
            .iter()
            .filter_map(|(_, class)| class.as_ref().map(|c| c.course_id))
            .collect();
        let course_titles: HashMap<i64, String> = if course_ids.is_empty() {
            HashMap::new()
        } else {
            Courses::find()
                .filter(CourseColumn::Id.is_in(course_ids))
                .all(&self.db)
                .await
                .map_err(|e| EnrollmentError::database_operation(format!("查询课程失败: {e}")))?
                .into_iter()
                .map(|course| (course.id, course.title))
                .collect()
        };

        Ok(rows
            .into_iter()
            .filter_map(|(entry, class)| {
                let class = class?.into_class();
                Some(AssignedClass {
                    course_title: course_titles.get(&class.course_id).cloned(),
                    class,
                    assigned_at: DateTime::<Utc>::from_timestamp(entry.assigned_at, 0)
                        .unwrap_or_default(),
                })
            })
            .collect())
    }

    /// 移除学生的班级
    ///
    /// `class_ids` 为空时移除全部；不在集合中的 ID 会被忽略。每个被移除的班级都会释放名额，
    /// 指向该班级的已批准申请迁移为 unassigned。
    pub async fn remove_classes_impl(
        &self,
        student_id: i64,
        class_ids: Vec<i64>,
    ) -> Result<ClassAssignment> {
        let txn = self.begin_write().await?;

        let Some(current) = load_assignment(&txn, student_id).await? else {
            if class_ids.is_empty() {
                return Ok(ClassAssignment::empty(student_id));
            }
            return Err(EnrollmentError::not_found(format!(
                "Student {student_id} has no class assignments"
            )));
        };

        let targets: Vec<i64> = if class_ids.is_empty() {
            current.class_ids.clone()
        } else {
            let requested: HashSet<i64> = class_ids.into_iter().collect();
            current
                .class_ids
                .iter()
                .copied()
                .filter(|id| requested.contains(id))
                .collect()
        };

        let now = Utc::now().timestamp();
        let mut removed = Vec::with_capacity(targets.len());
        for class_id in targets {
            // 条目已被并发请求删除时跳过，名额不重复释放
            if !remove_assignment_entry(&txn, student_id, class_id, now).await? {
                continue;
            }
            seats::release_seat(&txn, class_id, now).await?;
            let unassigned = unassign_requests(&txn, student_id, class_id, now).await?;

            tracing::debug!(
                "Removed class {} from student {}, {} request(s) unassigned",
                class_id,
                student_id,
                unassigned
            );
            removed.push(class_id);
        }

        let remaining = load_assignment(&txn, student_id)
            .await?
            .unwrap_or_else(|| ClassAssignment::empty(student_id));

        txn.commit()
            .await
            .map_err(|e| EnrollmentError::database_operation(format!("提交事务失败: {e}")))?;

        if !removed.is_empty() {
            tracing::info!(
                "Removed {} class(es) from student {}",
                removed.len(),
                student_id
            );
        }

        Ok(remaining)
    }
}
