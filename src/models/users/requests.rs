use serde::Deserialize;
use ts_rs::TS;

use super::entities::UserRole;

// 创建用户请求（用于身份同步与测试数据）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct CreateUserRequest {
    pub username: String,
    pub email: Option<String>,
    pub role: UserRole,
    pub display_name: Option<String>,
}
