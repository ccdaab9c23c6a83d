//! 访问令牌校验
//!
//! 令牌由外部身份网关签发（HS256），本服务只做校验并从中解析调用者身份。

use crate::config::AppConfig;
use crate::models::users::entities::{Identity, UserRole};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

pub const ACCESS_TOKEN_TYPE: &str = "access";

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // Subject (user ID)
    pub role: String,       // 用户角色
    pub token_type: String, // token类型，只接受 "access"
    pub exp: usize,         // Expiration time (时间戳)
    pub iat: usize,         // Issued at (签发时间)
}

impl Claims {
    /// 解析为调用者身份
    pub fn identity(&self) -> Result<Identity, jsonwebtoken::errors::Error> {
        let user_id = self
            .sub
            .parse::<i64>()
            .map_err(|_| jsonwebtoken::errors::ErrorKind::InvalidSubject)?;
        let role = self
            .role
            .parse::<UserRole>()
            .map_err(|_| jsonwebtoken::errors::ErrorKind::InvalidToken)?;

        Ok(Identity { user_id, role })
    }
}

pub struct JwtUtils;

impl JwtUtils {
    // 使用指定密钥校验访问令牌
    pub fn verify_with_secret(
        token: &str,
        secret: &str,
        leeway: u64,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let decoding_key = DecodingKey::from_secret(secret.as_ref());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway;

        let claims =
            decode::<Claims>(token, &decoding_key, &validation).map(|token_data| token_data.claims)?;
        if claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidToken,
            ));
        }
        Ok(claims)
    }

    // 使用全局配置的密钥校验访问令牌
    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let config = AppConfig::get();
        Self::verify_with_secret(token, &config.jwt.secret, config.jwt.leeway)
    }
}
