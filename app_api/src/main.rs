use actix_web::middleware::Logger;
use actix_web::{App, HttpServer};
use anyhow::Context;
use app_api::handlers;
use app_api::middleware::AuthMiddleware;
use biz_service::biz_services;
use common::config::{AppConfig, ServerRes};
use log::{LevelFilter, warn};
use std::str::FromStr;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // config file from the first argument, env vars (APP_*) on top
    let config_file = std::env::args().nth(1).unwrap_or_else(|| "api-config.toml".to_string());
    AppConfig::init(&config_file)?;
    let app_cfg = AppConfig::get();
    init_log(&app_cfg)?;

    let db_res = ServerRes::build(&app_cfg)?;
    let upload = app_cfg.get_upload();
    let server = app_cfg.get_server();
    let address_and_port = format!("{}:{}", server.host, server.port);
    warn!("Starting server on {}", address_and_port);
    HttpServer::new(move || {
        App::new()
            .wrap(AuthMiddleware)
            .wrap(Logger::default())
            // services
            .configure(|cfg| biz_services::configure(cfg, db_res.clone(), &upload))
            // handlers
            .configure(handlers::configure)
    })
    .keep_alive(actix_web::http::KeepAlive::Timeout(std::time::Duration::from_secs(600)))
    .bind(&address_and_port)
    .with_context(|| format!("bind {address_and_port}"))?
    .run()
    .await?;
    Ok(())
}

pub fn init_log(config: &AppConfig) -> anyhow::Result<()> {
    let log_level = &config.get_sys().log_level;
    let level = LevelFilter::from_str(log_level).with_context(|| format!("invalid sys.log_level {log_level}"))?;
    env_logger::Builder::new().filter(None, level).try_init()?;
    Ok(())
}
