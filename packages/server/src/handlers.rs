//! HTTP handler functions for the report API.

use actix_web::{HttpRequest, HttpResponse, web};
use geo_report_models::{
    ApiHealth, ReportAck, ReportSubmission, clean_message, parse_lat_lon, sanitize_phone,
};
use geo_report_notify::ReportNotification;

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `POST /api/report`
///
/// Re-validates the submission from scratch; client-side validation is
/// never trusted. Malformed JSON yields a 400 envelope; everything else
/// is accepted, with invalid location/phone values treated as absent.
/// When a webhook is configured the formatted notification is relayed
/// fire-and-forget: a delivery failure is logged and the client still
/// sees success.
pub async fn report(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Bytes,
) -> HttpResponse {
    let submission: ReportSubmission = match serde_json::from_slice(&body) {
        Ok(submission) => submission,
        Err(e) => {
            log::error!("Invalid report payload: {e}");
            return HttpResponse::BadRequest().json(ReportAck::rejected("Invalid payload"));
        }
    };

    let coordinate = submission.location.as_deref().and_then(parse_lat_lon);
    let phone = submission.phone.as_deref().and_then(sanitize_phone);
    let message = submission.message.as_deref().and_then(clean_message);

    // Peer address, or the forwarded-for header when a reverse proxy is
    // in front. Trusting that header is a deployment assumption.
    let source_ip = req
        .connection_info()
        .realip_remote_addr()
        .map_or_else(|| "unknown".to_string(), ToString::to_string);

    if let Some(webhook_url) = state.webhook_url.as_deref() {
        let notification = ReportNotification {
            coordinate,
            accuracy: submission.accuracy,
            phone,
            message,
            source_ip,
            user_agent: submission.user_agent.clone(),
        };
        if let Err(e) = geo_report_notify::send(&state.http, webhook_url, &notification).await {
            log::warn!("Failed to deliver report notification: {e}");
        }
    }

    HttpResponse::Ok().json(ReportAck::ok())
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test};

    use super::*;

    fn test_state() -> web::Data<AppState> {
        web::Data::new(AppState {
            webhook_url: None,
            http: reqwest::Client::new(),
        })
    }

    async fn call_report(body: &'static str) -> (StatusCode, serde_json::Value) {
        let app = test::init_service(
            App::new()
                .app_data(test_state())
                .route("/api/report", web::post().to(report)),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/api/report")
            .insert_header(("content-type", "application/json"))
            .set_payload(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let json: serde_json::Value = test::read_body_json(resp).await;
        (status, json)
    }

    #[actix_web::test]
    async fn accepts_valid_payload_without_webhook() {
        let (status, json) =
            call_report(r#"{"location":"10,20","phone":"+123456789","message":"hi"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert!(json.get("error").is_none());
    }

    #[actix_web::test]
    async fn accepts_empty_object() {
        let (status, json) = call_report("{}").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
    }

    #[actix_web::test]
    async fn rejects_malformed_json() {
        let (status, json) = call_report("not json at all").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Invalid payload");
    }

    #[actix_web::test]
    async fn tolerates_invalid_location_and_phone() {
        // Out-of-range coordinates and a too-short phone are treated as
        // absent, not as errors.
        let (status, json) = call_report(r#"{"location":"91,0","phone":"123"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
    }

    #[actix_web::test]
    async fn health_reports_healthy() {
        let app = test::init_service(
            App::new().route("/api/health", web::get().to(health)),
        )
        .await;
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let json: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(json["healthy"], true);
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }
}
