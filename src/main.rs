use std::time::{Duration, Instant};

use actix_cors::Cors;
use actix_web::http::Method;
use actix_web::middleware::{Compress, DefaultHeaders};
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use human_panic::setup_panic;
use tracing::{info, warn};

use rust_enrollsys_next::config::{AppConfig, CorsConfig};
use rust_enrollsys_next::routes;
use rust_enrollsys_next::runtime::lifetime;
use rust_enrollsys_next::utils::{json_error_handler, query_error_handler};

/// 按配置构建 CORS 策略，`*` 表示不限制
fn build_cors(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default().max_age(config.max_age);

    if config.allowed_origins.iter().any(|o| o == "*") {
        cors = cors.allow_any_origin();
    } else {
        for origin in &config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors = cors.allowed_methods(
        config
            .allowed_methods
            .iter()
            .filter(|m| Method::from_bytes(m.as_bytes()).is_ok())
            .map(String::as_str),
    );

    if config.allowed_headers.iter().any(|h| h == "*") {
        cors.allow_any_header()
    } else {
        cors.allowed_headers(config.allowed_headers.iter().map(String::as_str))
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let started = Instant::now();
    dotenv().ok();
    setup_panic!();

    AppConfig::init().map_err(std::io::Error::other)?;
    let config = AppConfig::get();
    let _log_guard = lifetime::logging::init_tracing(config);

    warn!(
        "Starting {} v{} ({})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        config.app.environment
    );

    let startup = lifetime::startup::prepare_server_startup().await;
    let storage = web::Data::new(startup.storage);

    info!(
        "Startup completed in {} ms, {} worker(s)",
        started.elapsed().as_millis(),
        config.server.workers
    );

    let server = HttpServer::new(move || {
        App::new()
            .wrap(build_cors(&config.cors))
            .wrap(Compress::default())
            .wrap(DefaultHeaders::new().add(("Cache-Control", "no-store")))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::PayloadConfig::new(config.server.limits.max_payload_size))
            .app_data(storage.clone())
            .configure(routes::configure_enrollment_routes)
            .configure(routes::configure_student_routes)
    })
    .keep_alive(Duration::from_secs(config.server.timeouts.keep_alive))
    .client_request_timeout(Duration::from_millis(config.server.timeouts.client_request))
    .client_disconnect_timeout(Duration::from_millis(config.server.timeouts.client_disconnect))
    .workers(config.server.workers);

    #[cfg(unix)]
    let server = match config.unix_socket_path() {
        Some(socket_path) => {
            if std::path::Path::new(socket_path).exists() {
                std::fs::remove_file(socket_path)?;
            }
            warn!("Listening on unix socket {}", socket_path);
            server.bind_uds(socket_path)?
        }
        None => {
            warn!("Listening on http://{}", config.server_bind_address());
            server.bind(config.server_bind_address())?
        }
    };

    #[cfg(not(unix))]
    let server = {
        warn!("Listening on http://{}", config.server_bind_address());
        server.bind(config.server_bind_address())?
    };

    tokio::select! {
        res = server.run() => res?,
        _ = lifetime::shutdown::listen_for_shutdown() => {
            warn!("Shutdown complete");
        }
    }

    Ok(())
}
