#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use jsonwebtoken::{EncodingKey, Header, encode};
use rust_enrollsys_next::config::{AppConfig, DatabaseConfig, EnrollmentConfig};
use rust_enrollsys_next::models::catalog::entities::{Class, Course};
use rust_enrollsys_next::models::catalog::requests::{CreateClassRequest, CreateCourseRequest};
use rust_enrollsys_next::models::payments::schedule::PaymentPlan;
use rust_enrollsys_next::models::users::entities::{User, UserRole};
use rust_enrollsys_next::models::users::requests::CreateUserRequest;
use rust_enrollsys_next::storage::Storage;
use rust_enrollsys_next::storage::sea_orm_storage::SeaOrmStorage;
use rust_enrollsys_next::utils::jwt::Claims;

/// 每个测试独立的内存数据库
pub async fn memory_storage() -> Arc<dyn Storage> {
    let database = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        pool_size: 1,
        timeout: 5,
    };
    let storage = SeaOrmStorage::connect(&database, &EnrollmentConfig::default())
        .await
        .expect("in-memory storage");
    Arc::new(storage)
}

static FILE_DB_SEQ: AtomicUsize = AtomicUsize::new(0);

/// 临时文件数据库，drop 时删除数据库及 WAL 文件
pub struct FileDatabase {
    pub storage: Arc<dyn Storage>,
    path: PathBuf,
}

impl Drop for FileDatabase {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut file = self.path.clone().into_os_string();
            file.push(suffix);
            let _ = std::fs::remove_file(file);
        }
    }
}

/// 多连接的文件数据库，事务之间会真实并发
pub async fn file_storage(pool_size: u32) -> FileDatabase {
    let path = std::env::temp_dir().join(format!(
        "enrollsys-test-{}-{}-{}.db",
        std::process::id(),
        FILE_DB_SEQ.fetch_add(1, Ordering::SeqCst),
        chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
    ));
    let database = DatabaseConfig {
        url: path.to_string_lossy().into_owned(),
        pool_size,
        timeout: 10,
    };
    let storage = SeaOrmStorage::connect(&database, &EnrollmentConfig::default())
        .await
        .expect("file storage");

    FileDatabase {
        storage: Arc::new(storage),
        path,
    }
}

pub async fn seed_user(storage: &Arc<dyn Storage>, username: &str, role: UserRole) -> User {
    storage
        .create_user(CreateUserRequest {
            username: username.to_string(),
            email: Some(format!("{username}@example.com")),
            role,
            display_name: Some(username.to_uppercase()),
        })
        .await
        .expect("seed user")
}

pub async fn seed_student(storage: &Arc<dyn Storage>, username: &str) -> User {
    seed_user(storage, username, UserRole::Student).await
}

pub async fn seed_course(
    storage: &Arc<dyn Storage>,
    title: &str,
    price: i64,
    installment_count: i32,
) -> Course {
    seed_course_with_plan(storage, title, price, installment_count, None).await
}

pub async fn seed_course_with_plan(
    storage: &Arc<dyn Storage>,
    title: &str,
    price: i64,
    installment_count: i32,
    payment_plan: Option<PaymentPlan>,
) -> Course {
    storage
        .create_course(CreateCourseRequest {
            title: title.to_string(),
            description: None,
            price,
            currency: None,
            installment_count,
            payment_plan,
        })
        .await
        .expect("seed course")
}

pub async fn seed_class(
    storage: &Arc<dyn Storage>,
    course_id: i64,
    name: &str,
    capacity: i32,
    current_enrollment: i32,
) -> Class {
    storage
        .create_class(CreateClassRequest {
            course_id,
            class_name: name.to_string(),
            teacher_name: Some("Ms. Rivera".to_string()),
            schedule: Some("Mon/Wed 18:00".to_string()),
            capacity,
            current_enrollment,
        })
        .await
        .expect("seed class")
}

pub async fn class_enrollment(storage: &Arc<dyn Storage>, class_id: i64) -> i32 {
    storage
        .get_class_by_id(class_id)
        .await
        .expect("load class")
        .expect("class exists")
        .current_enrollment
}

/// 使用配置中的密钥签发访问令牌
pub fn access_token(user_id: i64, role: &str) -> String {
    let now = chrono::Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: user_id.to_string(),
        role: role.to_string(),
        token_type: "access".to_string(),
        exp: now + 3600,
        iat: now,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(AppConfig::get().jwt.secret.as_bytes()),
    )
    .expect("sign token")
}

pub fn bearer(user_id: i64, role: &str) -> (String, String) {
    (
        "Authorization".to_string(),
        format!("Bearer {}", access_token(user_id, role)),
    )
}
