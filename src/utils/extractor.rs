//! 路径参数提取器：只接受正整数 ID，非法值直接返回 400

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn parse_positive_id(req: &HttpRequest, name: &str) -> Result<i64, actix_web::Error> {
    req.match_info()
        .get(name)
        .and_then(|raw| raw.parse::<i64>().ok())
        .filter(|id| *id > 0)
        .ok_or_else(|| {
            let message = format!("Invalid path parameter '{name}'");
            InternalError::from_response(
                message.clone(),
                HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::BadRequest,
                    message,
                )),
            )
            .into()
        })
}

/// 为指定路径参数生成安全提取器
macro_rules! define_safe_i64_extractor {
    ($($name:ident => $param:literal),+ $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy, PartialEq, Eq)]
            pub struct $name(pub i64);

            impl FromRequest for $name {
                type Error = actix_web::Error;
                type Future = Ready<Result<Self, Self::Error>>;

                fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                    ready(parse_positive_id(req, $param).map($name))
                }
            }
        )+
    };
}

define_safe_i64_extractor! {
    SafeIDI64 => "id",
    SafeCourseId => "course_id",
    SafeUserId => "user_id",
    SafeSessionId => "session_id",
    SafeAssessmentId => "assessment_id",
    SafeSubmissionId => "submission_id",
    SafeExamId => "exam_id",
    SafeQuestionId => "question_id",
    SafeAttemptId => "attempt_id",
    SafeThreadId => "thread_id",
    SafeMessageId => "message_id",
    SafeEventId => "event_id",
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_extracts_positive_id() {
        let (req, mut payload) = TestRequest::default()
            .param("course_id", "12")
            .to_http_parts();
        let id = SafeCourseId::from_request(&req, &mut payload).await.unwrap();
        assert_eq!(id, SafeCourseId(12));
    }

    #[actix_web::test]
    async fn test_rejects_invalid_ids() {
        for raw in ["0", "-3", "abc"] {
            let (req, mut payload) = TestRequest::default().param("exam_id", raw).to_http_parts();
            let err = SafeExamId::from_request(&req, &mut payload)
                .await
                .unwrap_err();
            assert_eq!(
                err.error_response().status(),
                actix_web::http::StatusCode::BAD_REQUEST
            );
        }
    }

    #[actix_web::test]
    async fn test_missing_param_is_rejected() {
        let (req, mut payload) = TestRequest::default().to_http_parts();
        assert!(SafeThreadId::from_request(&req, &mut payload).await.is_err());
    }
}
