// src/handlers/index.rs
use actix_web::{web, HttpResponse};
use serde_json::json;
use crate::widget::StatusWidget;

pub async fn index(widget: web::Data<StatusWidget>) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok", "mounted": widget.is_mounted() }))
}
