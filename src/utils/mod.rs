pub mod extractor;
pub mod jwt;
pub mod parameter_error_handler;
pub mod password;
pub mod sql;
pub mod token;
pub mod validate;

pub use extractor::{
    SafeAssessmentId, SafeAttemptId, SafeCourseId, SafeEventId, SafeExamId, SafeIDI64,
    SafeMessageId, SafeQuestionId, SafeSessionId, SafeSubmissionId, SafeThreadId, SafeUserId,
};
pub use parameter_error_handler::json_error_handler;
pub use parameter_error_handler::query_error_handler;
pub use sql::{escape_like_pattern, like_contains};
