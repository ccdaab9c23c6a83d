//! 选课申请实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "enrollment_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub preferred_level: Option<String>,
    pub status: String,
    pub request_date: i64,
    pub approval_date: Option<i64>,
    pub assigned_class_id: Option<i64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub admin_notes: Option<String>,
    pub registration_fee_paid: bool,
    pub payment_date: Option<i64>,
    pub unassigned_at: Option<i64>,
    // 软删除审计字段
    pub deleted_at: Option<i64>,
    pub deleted_by: Option<i64>,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::StudentId",
        to = "super::users::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Course,
    #[sea_orm(
        belongs_to = "super::classes::Entity",
        from = "Column::AssignedClassId",
        to = "super::classes::Column::Id"
    )]
    AssignedClass,
    #[sea_orm(has_many = "super::payment_installments::Entity")]
    Installments,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssignedClass.def()
    }
}

impl Related<super::payment_installments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Installments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_enrollment_request(
        self,
    ) -> crate::models::enrollments::entities::EnrollmentRequest {
        use crate::models::enrollments::entities::{EnrollmentRequest, EnrollmentStatus};
        use chrono::{DateTime, Utc};

        let ts = |secs: i64| DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or_default();

        EnrollmentRequest {
            id: self.id,
            student_id: self.student_id,
            course_id: self.course_id,
            preferred_level: self.preferred_level,
            status: self
                .status
                .parse::<EnrollmentStatus>()
                .unwrap_or(EnrollmentStatus::Pending),
            request_date: ts(self.request_date),
            approval_date: self.approval_date.map(ts),
            assigned_class_id: self.assigned_class_id,
            admin_notes: self.admin_notes,
            registration_fee_paid: self.registration_fee_paid,
            payment_date: self.payment_date.map(ts),
            unassigned_at: self.unassigned_at.map(ts),
            updated_at: ts(self.updated_at),
        }
    }
}
