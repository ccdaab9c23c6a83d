use crate::config::AppConfig;
use crate::storage::Storage;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
}

/// 准备服务器启动的上下文
/// 连接数据库并执行迁移
pub async fn prepare_server_startup() -> StartupContext {
    let config = AppConfig::get();
    debug!(
        "Enrollment settings: interval {} month(s), currency {}, create limit {}/{}s",
        config.enrollment.installment_interval_months,
        config.enrollment.default_currency,
        config.enrollment.create_rate_limit,
        config.enrollment.create_rate_window_secs
    );

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    StartupContext { storage }
}
