// src/handlers/clipboard.rs
use actix_web::{web, HttpResponse};
use serde_json::json;
use crate::clipboard::CopyField;
use crate::utils::StatusError;
use crate::widget::StatusWidget;

pub async fn copy_field(
    widget: web::Data<StatusWidget>,
    field: web::Path<String>,
) -> Result<HttpResponse, StatusError> {
    let field: CopyField = field.parse()?;
    // arboard can block while handing the selection to the clipboard manager.
    let copied = web::block(move || widget.copy(field))
        .await
        .map_err(|e| StatusError::ClipboardDenied(e.to_string()))??;
    Ok(HttpResponse::Ok().json(json!({ "field": field, "copied": copied })))
}
