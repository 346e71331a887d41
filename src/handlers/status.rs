// src/handlers/status.rs
use actix_web::{web, HttpResponse};
use log::debug;
use crate::utils::StatusError;
use crate::widget::StatusWidget;

pub async fn get_status(widget: web::Data<StatusWidget>) -> HttpResponse {
    HttpResponse::Ok().json(widget.view())
}

pub async fn refresh_status(
    widget: web::Data<StatusWidget>,
) -> Result<HttpResponse, StatusError> {
    debug!("Manual refresh requested");
    let record = widget.refresh().await?;
    Ok(HttpResponse::Ok().json(record))
}
