// src/main.rs
mod clipboard;
mod config;
mod handlers;
mod models;
mod notify;
mod poller;
mod utils;
mod widget;

use std::sync::Arc;
use actix_web::{ web, App, HttpServer };
use env_logger::Env;
use log::{ error, info };
use crate::clipboard::{ ClipboardCopyHelper, SystemClipboard };
use crate::config::Config;
use crate::notify::ToastFeed;
use crate::poller::fetcher::HttpStatusFetcher;
use crate::poller::StatusPoller;
use crate::widget::StatusWidget;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_env();

    let fetcher = match HttpStatusFetcher::new(config.request_timeout()) {
        Ok(fetcher) => Arc::new(fetcher),
        Err(e) => {
            error!("Failed to build status client: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
        }
    };

    let toasts = Arc::new(ToastFeed::new(config.toast_capacity));
    let poller = Arc::new(StatusPoller::new(&config, fetcher, toasts.clone()));
    let clipboard = ClipboardCopyHelper::new(
        config.server.clone(),
        Arc::new(SystemClipboard),
        toasts.clone(),
        config.copied_flag_window(),
    );

    let widget = web::Data::new(StatusWidget::new(&config, poller, clipboard, toasts));
    widget.mount();

    let bind = config.bind();
    info!(
        "Serving status widget for {} on {} ({} endpoints, refresh every {}s)",
        config.server.full_address(),
        bind,
        config.endpoints.len(),
        config.refresh_interval_secs
    );

    let app_widget = widget.clone();
    let result = HttpServer::new(move || {
        App::new()
            .app_data(app_widget.clone())
            .route("/", web::get().to(handlers::index::index))
            .route("/status", web::get().to(handlers::status::get_status))
            .route("/status/refresh", web::post().to(handlers::status::refresh_status))
            .route("/copy/{field}", web::post().to(handlers::clipboard::copy_field))
            .route("/toasts", web::get().to(handlers::toasts::drain_toasts))
    })
        .bind(&bind)?
        .run().await;

    widget.unmount();
    result
}
