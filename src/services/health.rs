use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use serde::Serialize;
use ts_rs::TS;

use crate::models::{ApiResponse, AppStartTime};

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/health.ts")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// 未注入启动时间时为 None
    pub uptime_seconds: Option<i64>,
}

pub struct HealthService;

impl HealthService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub async fn check(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let uptime_seconds = request.app_data::<web::Data<AppStartTime>>().map(|start| {
            chrono::Utc::now()
                .signed_duration_since(start.start_datetime)
                .num_seconds()
        });

        Ok(HttpResponse::Ok().json(ApiResponse::success(
            HealthResponse {
                status: "ok".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                uptime_seconds,
            },
            "Service is healthy",
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_reports_uptime_when_start_time_known() {
        let req = TestRequest::default()
            .app_data(web::Data::new(AppStartTime {
                start_datetime: chrono::Utc::now() - chrono::Duration::seconds(90),
            }))
            .to_http_request();
        let resp = HealthService::new_lazy().check(&req).await.unwrap();
        assert_eq!(resp.status(), 200);

        let body = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["data"]["status"], "ok");
        assert!(json["data"]["uptime_seconds"].as_i64().unwrap() >= 90);
    }
}
