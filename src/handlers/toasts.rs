// src/handlers/toasts.rs
use actix_web::{web, HttpResponse};
use crate::widget::StatusWidget;

pub async fn drain_toasts(widget: web::Data<StatusWidget>) -> HttpResponse {
    HttpResponse::Ok().json(widget.drain_toasts())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use actix_web::{test, web, App};
    use serde_json::{json, Value};
    use crate::clipboard::CopyField;
    use crate::poller::tests::ScriptedFetcher;
    use crate::widget::tests::test_widget;
    use super::*;

    #[actix_web::test]
    async fn test_drain_then_empty() {
        let widget = web::Data::new(test_widget(Arc::new(ScriptedFetcher::new(vec![]))));
        let app = test::init_service(
            App::new()
                .app_data(widget.clone())
                .route("/toasts", web::get().to(drain_toasts)),
        )
        .await;

        widget.refresh().await.unwrap();
        widget.copy(CopyField::Port).unwrap();

        let req = test::TestRequest::get().uri("/toasts").to_request();
        let toasts: Value = test::call_and_read_body_json(&app, req).await;
        let toasts = toasts.as_array().unwrap();
        assert_eq!(toasts.len(), 2);
        assert_eq!(toasts[0]["title"], json!("Connection failed"));
        assert_eq!(toasts[0]["severity"], json!("destructive"));
        assert_eq!(toasts[1]["title"], json!("Server Address Copied!"));
        assert_eq!(toasts[1]["severity"], json!("success"));
        assert!(toasts[0]["id"].as_str().is_some());

        let req = test::TestRequest::get().uri("/toasts").to_request();
        let toasts: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(toasts, json!([]));
    }
}
