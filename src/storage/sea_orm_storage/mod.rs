//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。
//! 所有跨表写操作都在单个事务内完成，事务在提前返回时随 drop 回滚。

mod catalog;
mod class_assignments;
mod enrollments;
mod payments;
mod seats;
mod users;

use crate::config::{AppConfig, DatabaseConfig, EnrollmentConfig};
use crate::errors::{EnrollmentError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DatabaseTransaction, DbBackend,
    TransactionTrait,
};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
    // 分期间隔（月）
    pub(crate) installment_interval_months: u32,
    // 课程未指定货币时使用
    pub(crate) default_currency: String,
}

impl SeaOrmStorage {
    /// 使用全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect(&config.database, &config.enrollment).await
    }

    /// 按给定配置连接数据库并运行迁移
    pub async fn connect(database: &DatabaseConfig, enrollment: &EnrollmentConfig) -> Result<Self> {
        let db_url = Self::build_database_url(&database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, database).await?
        } else {
            Self::connect_generic(&db_url, database).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| EnrollmentError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self {
            db,
            installment_interval_months: enrollment.installment_interval_months.max(1),
            default_currency: enrollment.default_currency.clone(),
        })
    }

    /// 开启写事务
    ///
    /// SQLite 的延迟事务先读后写时，写锁升级失败会直接返回 SQLITE_BUSY 而不等待 busy_timeout。
    /// 这里先执行一条不影响任何行的更新，让事务从第一条语句起就持有写锁，
    /// 并发写者在 busy_timeout 内排队，随后读到的是已提交的最新状态。
    pub(crate) async fn begin_write(&self) -> Result<DatabaseTransaction> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EnrollmentError::database_operation(format!("开启事务失败: {e}")))?;

        if self.db.get_database_backend() == DbBackend::Sqlite {
            txn.execute_unprepared("UPDATE enrollment_requests SET id = id WHERE id < 0")
                .await
                .map_err(|e| EnrollmentError::database_operation(format!("获取写锁失败: {e}")))?;
        }

        Ok(txn)
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    ///
    /// 内存数据库只使用一个常驻连接，否则每个连接都会看到各自独立的空库。
    async fn connect_sqlite(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let in_memory = url.contains(":memory:") || url.contains("mode=memory");

        let mut opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| EnrollmentError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        if !in_memory {
            opt = opt
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .pragma("mmap_size", "536870912")
                .pragma("wal_autocheckpoint", "1000");
        }

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
                .max_connections(config.pool_size.max(1))
                .min_connections(1)
                .idle_timeout(Duration::from_secs(300))
        };

        let pool = pool_options
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.timeout))
            .connect_with(opt)
            .await
            .map_err(|e| EnrollmentError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.timeout))
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| EnrollmentError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(EnrollmentError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite:, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    catalog::{
        entities::{Class, Course},
        requests::{CreateClassRequest, CreateCourseRequest},
    },
    class_assignments::{entities::ClassAssignment, responses::AssignedClass},
    enrollments::{
        entities::EnrollmentRequest,
        requests::EnrollmentListQuery,
        responses::{EnrollmentDeletionReceipt, EnrollmentListResponse, EnrollmentRequestDetail},
    },
    payments::entities::PaymentInstallment,
    users::{entities::User, requests::CreateUserRequest},
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    // 课程目录模块
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course> {
        self.create_course_impl(course).await
    }

    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(course_id).await
    }

    async fn create_class(&self, class: CreateClassRequest) -> Result<Class> {
        self.create_class_impl(class).await
    }

    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>> {
        self.get_class_by_id_impl(class_id).await
    }

    // 选课申请模块
    async fn create_enrollment_request(
        &self,
        student_id: i64,
        course_id: i64,
        preferred_level: Option<String>,
    ) -> Result<EnrollmentRequest> {
        self.create_enrollment_request_impl(student_id, course_id, preferred_level)
            .await
    }

    async fn get_enrollment_request_by_id(&self, id: i64) -> Result<Option<EnrollmentRequest>> {
        self.get_enrollment_request_by_id_impl(id).await
    }

    async fn get_enrollment_request_detail(
        &self,
        id: i64,
    ) -> Result<Option<EnrollmentRequestDetail>> {
        self.get_enrollment_request_detail_impl(id).await
    }

    async fn list_enrollment_requests_with_pagination(
        &self,
        query: EnrollmentListQuery,
    ) -> Result<EnrollmentListResponse> {
        self.list_enrollment_requests_with_pagination_impl(query)
            .await
    }

    async fn approve_enrollment_request(
        &self,
        id: i64,
        class_id: i64,
        admin_notes: Option<String>,
    ) -> Result<EnrollmentRequest> {
        self.approve_enrollment_request_impl(id, class_id, admin_notes)
            .await
    }

    async fn reject_enrollment_request(
        &self,
        id: i64,
        admin_notes: Option<String>,
    ) -> Result<EnrollmentRequest> {
        self.reject_enrollment_request_impl(id, admin_notes).await
    }

    async fn delete_enrollment_request(
        &self,
        id: i64,
        deleted_by: i64,
    ) -> Result<EnrollmentDeletionReceipt> {
        self.delete_enrollment_request_impl(id, deleted_by).await
    }

    async fn mark_registration_fee_paid(&self, id: i64) -> Result<EnrollmentRequest> {
        self.mark_registration_fee_paid_impl(id).await
    }

    // 分班模块
    async fn get_class_assignment(&self, student_id: i64) -> Result<Option<ClassAssignment>> {
        self.get_class_assignment_impl(student_id).await
    }

    async fn get_available_classes(&self, student_id: i64) -> Result<Vec<Class>> {
        self.get_available_classes_impl(student_id).await
    }

    async fn count_assigned_classes(&self, student_id: i64) -> Result<i64> {
        self.count_assigned_classes_impl(student_id).await
    }

    async fn get_student_assigned_classes(&self, student_id: i64) -> Result<Vec<AssignedClass>> {
        self.get_student_assigned_classes_impl(student_id).await
    }

    async fn remove_classes(
        &self,
        student_id: i64,
        class_ids: Vec<i64>,
    ) -> Result<ClassAssignment> {
        self.remove_classes_impl(student_id, class_ids).await
    }

    // 分期付款模块
    async fn list_installments(&self, request_id: i64) -> Result<Vec<PaymentInstallment>> {
        self.list_installments_impl(request_id).await
    }

    async fn record_payment(
        &self,
        request_id: i64,
        installment_no: Option<i32>,
    ) -> Result<PaymentInstallment> {
        self.record_payment_impl(request_id, installment_no).await
    }

    async fn refund_installment(
        &self,
        request_id: i64,
        installment_no: i32,
    ) -> Result<PaymentInstallment> {
        self.refund_installment_impl(request_id, installment_no)
            .await
    }
}
