//! 选课申请存储操作
//!
//! 状态只在这里变更。每次迁移都是带 `status = <from>` 条件的更新，
//! 影响行数为 0 说明并发请求已抢先改变了状态。

use super::{SeaOrmStorage, seats};
use crate::entity::class_assignment_entries::{
    ActiveModel as EntryActiveModel, Column as EntryColumn, Entity as ClassAssignmentEntries,
};
use crate::entity::class_assignments::{
    ActiveModel as AssignmentActiveModel, Column as AssignmentColumn, Entity as ClassAssignments,
};
use crate::entity::classes::Entity as Classes;
use crate::entity::courses::Entity as Courses;
use crate::entity::enrollment_requests::{
    ActiveModel, Column, Entity as EnrollmentRequests, Model as EnrollmentRequestModel,
};
use crate::entity::payment_installments::{
    ActiveModel as InstallmentActiveModel, Column as InstallmentColumn,
    Entity as PaymentInstallments,
};
use crate::entity::users::Entity as Users;
use crate::errors::{EnrollmentError, Result};
use crate::models::{
    PaginationInfo,
    enrollments::{
        entities::{EnrollmentRequest, EnrollmentStatus},
        requests::EnrollmentListQuery,
        responses::{EnrollmentDeletionReceipt, EnrollmentListResponse, EnrollmentRequestDetail},
    },
};
use crate::utils::validate::{validate_admin_notes, validate_preferred_level};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

/// 查找未被软删除的申请
pub(super) async fn find_active_request<C: ConnectionTrait>(
    db: &C,
    id: i64,
) -> Result<Option<EnrollmentRequestModel>> {
    EnrollmentRequests::find_by_id(id)
        .filter(Column::DeletedAt.is_null())
        .one(db)
        .await
        .map_err(|e| EnrollmentError::database_operation(format!("查询选课申请失败: {e}")))
}

/// 查找申请，不存在时返回 NotFound
pub(super) async fn require_active_request<C: ConnectionTrait>(
    db: &C,
    id: i64,
) -> Result<EnrollmentRequestModel> {
    find_active_request(db, id)
        .await?
        .ok_or_else(|| EnrollmentError::not_found(format!("Enrollment request {id} not found")))
}

pub(super) fn parse_status(model: &EnrollmentRequestModel) -> Result<EnrollmentStatus> {
    model.status.parse::<EnrollmentStatus>().map_err(|e| {
        EnrollmentError::database_operation(format!("申请 {} 状态无效: {e}", model.id))
    })
}

/// 从分班文档中移除一个班级条目并刷新文档时间戳
pub(super) async fn remove_assignment_entry<C: ConnectionTrait>(
    db: &C,
    student_id: i64,
    class_id: i64,
    now: i64,
) -> Result<bool> {
    let result = ClassAssignmentEntries::delete_many()
        .filter(EntryColumn::StudentId.eq(student_id))
        .filter(EntryColumn::ClassId.eq(class_id))
        .exec(db)
        .await
        .map_err(|e| EnrollmentError::database_operation(format!("移除分班条目失败: {e}")))?;

    ClassAssignments::update_many()
        .col_expr(AssignmentColumn::UpdatedAt, Expr::value(now))
        .filter(AssignmentColumn::StudentId.eq(student_id))
        .exec(db)
        .await
        .map_err(|e| EnrollmentError::database_operation(format!("更新分班记录失败: {e}")))?;

    Ok(result.rows_affected > 0)
}

impl SeaOrmStorage {
    /// 提交选课申请
    ///
    /// 重复检查与插入在同一事务内完成。
    pub async fn create_enrollment_request_impl(
        &self,
        student_id: i64,
        course_id: i64,
        preferred_level: Option<String>,
    ) -> Result<EnrollmentRequest> {
        if student_id <= 0 {
            return Err(EnrollmentError::validation("Student id must be positive"));
        }
        if course_id <= 0 {
            return Err(EnrollmentError::validation("Course id must be positive"));
        }
        let preferred_level =
            validate_preferred_level(preferred_level.as_deref()).map_err(EnrollmentError::validation)?;

        let txn = self.begin_write().await?;

        let student = Users::find_by_id(student_id)
            .one(&txn)
            .await
            .map_err(|e| EnrollmentError::database_operation(format!("查询学生失败: {e}")))?;
        if student.is_none() {
            return Err(EnrollmentError::validation(format!(
                "Student {student_id} does not exist"
            )));
        }

        let course = Courses::find_by_id(course_id)
            .one(&txn)
            .await
            .map_err(|e| EnrollmentError::database_operation(format!("查询课程失败: {e}")))?;
        if course.is_none() {
            return Err(EnrollmentError::validation(format!(
                "Course {course_id} does not exist"
            )));
        }

        let pending = EnrollmentRequests::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::Status.eq(EnrollmentStatus::PENDING))
            .filter(Column::DeletedAt.is_null())
            .count(&txn)
            .await
            .map_err(|e| EnrollmentError::database_operation(format!("查询重复申请失败: {e}")))?;
        if pending > 0 {
            return Err(EnrollmentError::duplicate_request(format!(
                "Student {student_id} already has a pending request for course {course_id}"
            )));
        }

        let now = chrono::Utc::now().timestamp();
        let model = ActiveModel {
            student_id: Set(student_id),
            course_id: Set(course_id),
            preferred_level: Set(preferred_level),
            status: Set(EnrollmentStatus::Pending.to_string()),
            request_date: Set(now),
            approval_date: Set(None),
            assigned_class_id: Set(None),
            admin_notes: Set(None),
            registration_fee_paid: Set(false),
            payment_date: Set(None),
            unassigned_at: Set(None),
            deleted_at: Set(None),
            deleted_by: Set(None),
            updated_at: Set(now),
            ..Default::default()
        };

        let inserted = model
            .insert(&txn)
            .await
            .map_err(|e| EnrollmentError::database_operation(format!("创建选课申请失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| EnrollmentError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(inserted.into_enrollment_request())
    }

    /// 通过 ID 获取申请
    pub async fn get_enrollment_request_by_id_impl(
        &self,
        id: i64,
    ) -> Result<Option<EnrollmentRequest>> {
        Ok(find_active_request(&self.db, id)
            .await?
            .map(|m| m.into_enrollment_request()))
    }

    /// 获取申请详情
    pub async fn get_enrollment_request_detail_impl(
        &self,
        id: i64,
    ) -> Result<Option<EnrollmentRequestDetail>> {
        let Some(model) = find_active_request(&self.db, id).await? else {
            return Ok(None);
        };

        let student = self.get_user_by_id_impl(model.student_id).await?;
        let course = self.get_course_by_id_impl(model.course_id).await?;
        let assigned_class = match model.assigned_class_id {
            Some(class_id) => self.get_class_by_id_impl(class_id).await?,
            None => None,
        };

        let installments = PaymentInstallments::find()
            .filter(InstallmentColumn::EnrollmentRequestId.eq(id))
            .order_by_asc(InstallmentColumn::DueDate)
            .order_by_asc(InstallmentColumn::InstallmentNo)
            .all(&self.db)
            .await
            .map_err(|e| EnrollmentError::database_operation(format!("查询分期失败: {e}")))?
            .into_iter()
            .map(|m| m.into_installment())
            .collect();

        Ok(Some(EnrollmentRequestDetail {
            request: model.into_enrollment_request(),
            student,
            course,
            assigned_class,
            installments,
        }))
    }

    /// 分页列出申请
    pub async fn list_enrollment_requests_with_pagination_impl(
        &self,
        query: EnrollmentListQuery,
    ) -> Result<EnrollmentListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = EnrollmentRequests::find().filter(Column::DeletedAt.is_null());

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(course_id) = query.course_id {
            select = select.filter(Column::CourseId.eq(course_id));
        }

        // 排序
        select = select
            .order_by_desc(Column::RequestDate)
            .order_by_desc(Column::Id);

        // 分页查询
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| EnrollmentError::database_operation(format!("查询申请总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| EnrollmentError::database_operation(format!("查询申请页数失败: {e}")))?;

        let requests = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| EnrollmentError::database_operation(format!("查询申请列表失败: {e}")))?;

        Ok(EnrollmentListResponse {
            items: requests
                .into_iter()
                .map(|m| m.into_enrollment_request())
                .collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 批准申请并分配班级
    ///
    /// 在一个事务内依次完成：状态迁移、名额占用、分班记录写入、分期排期生成。
    /// 任一步失败时事务被丢弃，所有修改一并回滚。
    pub async fn approve_enrollment_request_impl(
        &self,
        id: i64,
        class_id: i64,
        admin_notes: Option<String>,
    ) -> Result<EnrollmentRequest> {
        let admin_notes =
            validate_admin_notes(admin_notes.as_deref()).map_err(EnrollmentError::validation)?;

        let txn = self.begin_write().await?;

        let request = require_active_request(&txn, id).await?;
        parse_status(&request)?.ensure_transition(EnrollmentStatus::Approved)?;

        let class = Classes::find_by_id(class_id)
            .one(&txn)
            .await
            .map_err(|e| EnrollmentError::database_operation(format!("查询班级失败: {e}")))?
            .ok_or_else(|| EnrollmentError::not_found(format!("Class {class_id} not found")))?;
        if class.course_id != request.course_id {
            return Err(EnrollmentError::validation(format!(
                "Class {class_id} does not belong to course {}",
                request.course_id
            )));
        }

        let already_assigned = ClassAssignmentEntries::find()
            .filter(EntryColumn::StudentId.eq(request.student_id))
            .filter(EntryColumn::ClassId.eq(class_id))
            .count(&txn)
            .await
            .map_err(|e| EnrollmentError::database_operation(format!("查询分班条目失败: {e}")))?;
        if already_assigned > 0 {
            return Err(EnrollmentError::validation(format!(
                "Student {} is already assigned to class {class_id}",
                request.student_id
            )));
        }

        let course = Courses::find_by_id(request.course_id)
            .one(&txn)
            .await
            .map_err(|e| EnrollmentError::database_operation(format!("查询课程失败: {e}")))?
            .ok_or_else(|| {
                EnrollmentError::not_found(format!("Course {} not found", request.course_id))
            })?
            .into_course()
            .map_err(|e| {
                EnrollmentError::validation(format!("Course payment plan is invalid: {}", e.message()))
            })?;

        let approved_at = chrono::Utc::now();
        let now = approved_at.timestamp();
        let drafts = course.effective_payment_plan().build_schedule(
            course.price,
            approved_at,
            self.installment_interval_months,
        )?;

        // 状态迁移（CAS）
        let updated = EnrollmentRequests::update_many()
            .col_expr(Column::Status, Expr::value(EnrollmentStatus::APPROVED))
            .col_expr(Column::AssignedClassId, Expr::value(class_id))
            .col_expr(Column::ApprovalDate, Expr::value(now))
            .col_expr(Column::AdminNotes, Expr::value(admin_notes))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(EnrollmentStatus::PENDING))
            .filter(Column::DeletedAt.is_null())
            .exec(&txn)
            .await
            .map_err(|e| EnrollmentError::database_operation(format!("更新申请状态失败: {e}")))?;
        if updated.rows_affected == 0 {
            return Err(EnrollmentError::invalid_state(format!(
                "Enrollment request {id} is no longer pending"
            )));
        }

        // 名额占用
        if !seats::claim_seat(&txn, class_id, now).await? {
            return Err(EnrollmentError::capacity(format!(
                "Class {class_id} is full ({}/{})",
                class.current_enrollment, class.capacity
            )));
        }

        // 分班记录
        let assignment = ClassAssignments::find()
            .filter(AssignmentColumn::StudentId.eq(request.student_id))
            .one(&txn)
            .await
            .map_err(|e| EnrollmentError::database_operation(format!("查询分班记录失败: {e}")))?;
        match assignment {
            Some(existing) => {
                let mut active: AssignmentActiveModel = existing.into();
                active.updated_at = Set(now);
                active.update(&txn).await.map_err(|e| {
                    EnrollmentError::database_operation(format!("更新分班记录失败: {e}"))
                })?;
            }
            None => {
                AssignmentActiveModel {
                    student_id: Set(request.student_id),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await
                .map_err(|e| {
                    EnrollmentError::database_operation(format!("创建分班记录失败: {e}"))
                })?;
            }
        }

        EntryActiveModel {
            student_id: Set(request.student_id),
            class_id: Set(class_id),
            assigned_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| EnrollmentError::database_operation(format!("写入分班条目失败: {e}")))?;

        // 分期排期
        let installments: Vec<InstallmentActiveModel> = drafts
            .into_iter()
            .map(|draft| InstallmentActiveModel {
                enrollment_request_id: Set(id),
                installment_no: Set(draft.installment_no),
                amount: Set(draft.amount),
                amount_type: Set(draft.amount_type.to_string()),
                percentage: Set(draft.percentage),
                status: Set(draft.status.to_string()),
                due_date: Set(draft.due_date.timestamp()),
                paid_date: Set(None),
                refunded_at: Set(None),
                created_at: Set(now),
                ..Default::default()
            })
            .collect();
        PaymentInstallments::insert_many(installments)
            .exec(&txn)
            .await
            .map_err(|e| EnrollmentError::database_operation(format!("生成分期失败: {e}")))?;

        let approved = require_active_request(&txn, id).await?;

        txn.commit()
            .await
            .map_err(|e| EnrollmentError::database_operation(format!("提交事务失败: {e}")))?;

        tracing::info!(
            "Enrollment request {} approved into class {} for student {}",
            id,
            class_id,
            request.student_id
        );

        Ok(approved.into_enrollment_request())
    }

    /// 拒绝申请
    pub async fn reject_enrollment_request_impl(
        &self,
        id: i64,
        admin_notes: Option<String>,
    ) -> Result<EnrollmentRequest> {
        let admin_notes =
            validate_admin_notes(admin_notes.as_deref()).map_err(EnrollmentError::validation)?;

        let txn = self.begin_write().await?;

        let request = require_active_request(&txn, id).await?;
        parse_status(&request)?.ensure_transition(EnrollmentStatus::Rejected)?;

        let now = chrono::Utc::now().timestamp();
        let updated = EnrollmentRequests::update_many()
            .col_expr(Column::Status, Expr::value(EnrollmentStatus::REJECTED))
            .col_expr(Column::AdminNotes, Expr::value(admin_notes))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(EnrollmentStatus::PENDING))
            .filter(Column::DeletedAt.is_null())
            .exec(&txn)
            .await
            .map_err(|e| EnrollmentError::database_operation(format!("更新申请状态失败: {e}")))?;
        if updated.rows_affected == 0 {
            return Err(EnrollmentError::invalid_state(format!(
                "Enrollment request {id} is no longer pending"
            )));
        }

        let rejected = require_active_request(&txn, id).await?;

        txn.commit()
            .await
            .map_err(|e| EnrollmentError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(rejected.into_enrollment_request())
    }

    /// 删除申请（软删除）
    ///
    /// 已批准的申请会先移除分班条目、释放名额，再标记删除。各步骤都是条件更新或按键删除，
    /// 重复执行不会产生额外影响。
    pub async fn delete_enrollment_request_impl(
        &self,
        id: i64,
        deleted_by: i64,
    ) -> Result<EnrollmentDeletionReceipt> {
        let txn = self.begin_write().await?;

        let request = require_active_request(&txn, id).await?;
        let deleted_at = chrono::Utc::now();
        let now = deleted_at.timestamp();

        // 先删条目：只有真正删掉条目的事务才释放名额
        let mut released_class_id = None;
        if parse_status(&request)? == EnrollmentStatus::Approved
            && let Some(class_id) = request.assigned_class_id
            && remove_assignment_entry(&txn, request.student_id, class_id, now).await?
        {
            seats::release_seat(&txn, class_id, now).await?;
            released_class_id = Some(class_id);
        }

        let updated = EnrollmentRequests::update_many()
            .col_expr(Column::DeletedAt, Expr::value(now))
            .col_expr(Column::DeletedBy, Expr::value(deleted_by))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::DeletedAt.is_null())
            .exec(&txn)
            .await
            .map_err(|e| EnrollmentError::database_operation(format!("删除选课申请失败: {e}")))?;
        if updated.rows_affected == 0 {
            return Err(EnrollmentError::not_found(format!(
                "Enrollment request {id} not found"
            )));
        }

        txn.commit()
            .await
            .map_err(|e| EnrollmentError::database_operation(format!("提交事务失败: {e}")))?;

        tracing::info!(
            "Enrollment request {} deleted by {}, released class {:?}",
            id,
            deleted_by,
            released_class_id
        );

        Ok(EnrollmentDeletionReceipt {
            id,
            deleted_by,
            deleted_at: chrono::DateTime::from_timestamp(now, 0).unwrap_or(deleted_at),
            released_class_id,
        })
    }

    /// 标记注册费已缴（幂等）
    pub async fn mark_registration_fee_paid_impl(&self, id: i64) -> Result<EnrollmentRequest> {
        let request = require_active_request(&self.db, id).await?;
        if parse_status(&request)? == EnrollmentStatus::Rejected {
            return Err(EnrollmentError::invalid_state(format!(
                "Enrollment request {id} was rejected"
            )));
        }
        if request.registration_fee_paid {
            return Ok(request.into_enrollment_request());
        }

        let now = chrono::Utc::now().timestamp();
        EnrollmentRequests::update_many()
            .col_expr(Column::RegistrationFeePaid, Expr::value(true))
            .col_expr(Column::PaymentDate, Expr::value(now))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::RegistrationFeePaid.eq(false))
            .filter(Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(|e| EnrollmentError::database_operation(format!("更新注册费状态失败: {e}")))?;

        Ok(require_active_request(&self.db, id)
            .await?
            .into_enrollment_request())
    }
}
