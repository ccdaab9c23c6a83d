//! 班级实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "classes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub class_name: String,
    pub teacher_name: Option<String>,
    pub schedule: Option<String>,
    pub capacity: i32,
    pub current_enrollment: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Course,
    #[sea_orm(has_many = "super::class_assignment_entries::Entity")]
    AssignmentEntries,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::class_assignment_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssignmentEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_class(self) -> crate::models::catalog::entities::Class {
        use crate::models::catalog::entities::Class;
        use chrono::{DateTime, Utc};

        Class {
            id: self.id,
            course_id: self.course_id,
            class_name: self.class_name,
            teacher_name: self.teacher_name,
            schedule: self.schedule,
            capacity: self.capacity,
            current_enrollment: self.current_enrollment,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
