use actix_web::{web, HttpResponse, Scope};
use tracing::info;

use crate::handlers::{
    health::{detailed_health_check, health_check, liveness_check, readiness_check},
    status::{api_status, api_version, system_info},
    whatsapp,
};

/// Configure all application routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health_routes())
        .service(api_v1_routes())
        .route("/", web::get().to(root_handler));
}

fn health_routes() -> Scope {
    web::scope("/health")
        .route("", web::get().to(health_check))
        .route("/", web::get().to(health_check))
        .route("/detailed", web::get().to(detailed_health_check))
        .route("/ready", web::get().to(readiness_check))
        .route("/live", web::get().to(liveness_check))
}

fn api_v1_routes() -> Scope {
    web::scope("/api/v1")
        .route("/status", web::get().to(api_status))
        .route("/info", web::get().to(system_info))
        .route("/version", web::get().to(api_version))
        .service(configure_whatsapp_routes())
}

/// WhatsApp Cloud API webhook ingress — the only externally-triggered
/// surface this gateway exposes. Outbound sends are driven by the
/// outgoing processor and campaign scheduler, not by a public endpoint.
fn configure_whatsapp_routes() -> Scope {
    web::scope("/whatsapp")
        .route("/webhook", web::get().to(whatsapp::verify_webhook))
        .route("/webhook", web::post().to(whatsapp::process_webhook))
}

async fn root_handler() -> HttpResponse {
    info!("root endpoint accessed");

    HttpResponse::Ok().json(serde_json::json!({
        "service": "wa-api",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "WhatsApp Business messaging gateway",
        "api_version": "v1",
        "endpoints": {
            "health": "/health",
            "detailed_health": "/health/detailed",
            "readiness": "/health/ready",
            "liveness": "/health/live",
            "api_status": "/api/v1/status",
            "system_info": "/api/v1/info",
            "version": "/api/v1/version",
            "whatsapp_webhook": "/api/v1/whatsapp/webhook"
        },
        "timestamp": chrono::Utc::now()
    }))
}

#[cfg(debug_assertions)]
pub fn configure_dev_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/dev")
            .route("/ping", web::get().to(dev_ping_handler))
            .route("/echo", web::post().to(dev_echo_handler)),
    );
}

#[cfg(debug_assertions)]
async fn dev_ping_handler() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "pong",
        "timestamp": chrono::Utc::now()
    }))
}

#[cfg(debug_assertions)]
async fn dev_echo_handler(body: web::Json<serde_json::Value>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "echo": body.into_inner(),
        "timestamp": chrono::Utc::now()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn test_root_handler() {
        let app = test::init_service(App::new().route("/", web::get().to(root_handler))).await;

        let req = test::TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["service"], "wa-api");
        assert_eq!(body["api_version"], "v1");
    }

    #[cfg(debug_assertions)]
    #[actix_web::test]
    async fn test_dev_ping_handler() {
        let app = test::init_service(App::new().route("/ping", web::get().to(dev_ping_handler))).await;

        let req = test::TestRequest::get().uri("/ping").to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "pong");
    }
}
