//! 用户实体（身份数据的只读镜像）

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub username: String,
    pub email: Option<String>,
    pub role: String,
    pub display_name: Option<String>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::enrollment_requests::Entity")]
    EnrollmentRequests,
    #[sea_orm(has_one = "super::class_assignments::Entity")]
    ClassAssignment,
}

impl Related<super::enrollment_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EnrollmentRequests.def()
    }
}

impl Related<super::class_assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClassAssignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_user(self) -> crate::models::users::entities::User {
        use crate::models::users::entities::{User, UserRole};
        use chrono::{DateTime, Utc};

        User {
            id: self.id,
            username: self.username,
            email: self.email,
            role: self.role.parse::<UserRole>().unwrap_or(UserRole::Student),
            display_name: self.display_name,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        }
    }
}
