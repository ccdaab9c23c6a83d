use super::SeaOrmStorage;
use crate::entity::users::{ActiveModel, Entity as Users};
use crate::errors::{EnrollmentError, Result};
use crate::models::users::{entities::User, requests::CreateUserRequest};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let username = req.username.trim().to_string();
        if username.is_empty() {
            return Err(EnrollmentError::validation("Username must not be empty"));
        }

        let model = ActiveModel {
            username: Set(username),
            email: Set(req.email),
            role: Set(req.role.to_string()),
            display_name: Set(req.display_name),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EnrollmentError::database_operation(format!("创建用户失败: {e}")))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EnrollmentError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }
}
