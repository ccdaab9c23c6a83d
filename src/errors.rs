//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码、类型名称以及到 HTTP 状态码的映射。

use std::fmt;

use actix_web::http::StatusCode;

use crate::models::ErrorCode;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - status_code() 方法 - 返回对应的 HTTP 状态码
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_enrollment_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal, $status:expr)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum EnrollmentError {
            $($variant(String),)*
        }

        impl EnrollmentError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(EnrollmentError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(EnrollmentError::$variant(_) => $type_name,)*
                }
            }

            /// 获取对应的 HTTP 状态码
            pub fn status_code(&self) -> StatusCode {
                match self {
                    $(EnrollmentError::$variant(_) => $status,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(EnrollmentError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl EnrollmentError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        EnrollmentError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_enrollment_errors! {
    DatabaseConfig("E001", "Database Configuration Error", StatusCode::INTERNAL_SERVER_ERROR),
    DatabaseConnection("E002", "Database Connection Error", StatusCode::INTERNAL_SERVER_ERROR),
    DatabaseOperation("E003", "Database Operation Error", StatusCode::INTERNAL_SERVER_ERROR),
    Serialization("E004", "Serialization Error", StatusCode::INTERNAL_SERVER_ERROR),
    DateParse("E005", "Date Parse Error", StatusCode::BAD_REQUEST),
    Validation("E006", "Validation Error", StatusCode::BAD_REQUEST),
    NotFound("E007", "Resource Not Found", StatusCode::NOT_FOUND),
    InvalidState("E008", "Invalid State Error", StatusCode::CONFLICT),
    Capacity("E009", "Capacity Error", StatusCode::CONFLICT),
    DuplicateRequest("E010", "Duplicate Request Error", StatusCode::CONFLICT),
    AlreadySatisfied("E011", "Already Satisfied Error", StatusCode::CONFLICT),
    Authentication("E012", "Authentication Error", StatusCode::UNAUTHORIZED),
    Authorization("E013", "Authorization Error", StatusCode::FORBIDDEN),
}

impl EnrollmentError {
    /// 对应的 API 业务错误码
    pub fn api_code(&self) -> ErrorCode {
        match self {
            EnrollmentError::Validation(_) | EnrollmentError::DateParse(_) => {
                ErrorCode::BadRequest
            }
            EnrollmentError::NotFound(_) => ErrorCode::NotFound,
            EnrollmentError::InvalidState(_) => ErrorCode::EnrollmentInvalidState,
            EnrollmentError::Capacity(_) => ErrorCode::ClassCapacityExceeded,
            EnrollmentError::DuplicateRequest(_) => ErrorCode::EnrollmentDuplicateRequest,
            EnrollmentError::AlreadySatisfied(_) => ErrorCode::InstallmentAlreadySatisfied,
            EnrollmentError::Authentication(_) => ErrorCode::Unauthorized,
            EnrollmentError::Authorization(_) => ErrorCode::Forbidden,
            _ => ErrorCode::InternalServerError,
        }
    }

    /// 是否为调用方错误（4xx）
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for EnrollmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for EnrollmentError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for EnrollmentError {
    fn from(err: sea_orm::DbErr) -> Self {
        EnrollmentError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for EnrollmentError {
    fn from(err: serde_json::Error) -> Self {
        EnrollmentError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for EnrollmentError {
    fn from(err: chrono::ParseError) -> Self {
        EnrollmentError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EnrollmentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(EnrollmentError::database_config("test").code(), "E001");
        assert_eq!(EnrollmentError::validation("test").code(), "E006");
        assert_eq!(EnrollmentError::capacity("test").code(), "E009");
        assert_eq!(EnrollmentError::authorization("test").code(), "E013");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            EnrollmentError::invalid_state("test").error_type(),
            "Invalid State Error"
        );
        assert_eq!(
            EnrollmentError::already_satisfied("test").error_type(),
            "Already Satisfied Error"
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            EnrollmentError::validation("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            EnrollmentError::not_found("x").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            EnrollmentError::duplicate_request("x").status_code(),
            StatusCode::CONFLICT
        );
        assert!(!EnrollmentError::database_operation("x").is_client_error());
        assert!(EnrollmentError::capacity("x").is_client_error());
    }

    #[test]
    fn test_api_code_distinguishes_conflicts() {
        assert_eq!(
            EnrollmentError::capacity("full").api_code(),
            ErrorCode::ClassCapacityExceeded
        );
        assert_eq!(
            EnrollmentError::invalid_state("decided").api_code(),
            ErrorCode::EnrollmentInvalidState
        );
        assert_eq!(
            EnrollmentError::database_connection("down").api_code(),
            ErrorCode::InternalServerError
        );
    }

    #[test]
    fn test_format_simple() {
        let err = EnrollmentError::validation("Invalid course id");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Invalid course id"));
    }
}
