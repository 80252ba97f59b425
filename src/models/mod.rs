pub mod assessments;
pub mod auth;
pub mod common;
pub mod course_members;
pub mod courses;
pub mod exams;
pub mod forum;
pub mod grades;
pub mod schedule;
pub mod sessions;
pub mod users;

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码，随 [`ApiResponse`] 的 `code` 字段返回
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Success = 0,

    // 通用
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    // 认证
    AuthFailed = 2000,
    RegisterFailed = 2001,
    RefreshTokenMissing = 2002,
    RefreshTokenInvalid = 2003,
    RefreshTokenExpired = 2004,
    PasswordPolicyViolation = 2005,
    PasswordIncorrect = 2006,

    // 用户
    UserNotFound = 3000,
    UserAlreadyExists = 3001,
    UserNameInvalid = 3002,
    UserEmailInvalid = 3003,
    UserCreationFailed = 3004,
    UserUpdateFailed = 3005,
    UserDeleteFailed = 3006,
    CanNotDeleteCurrentUser = 3007,

    // 课程与成员
    CourseNotFound = 4000,
    CourseAlreadyExists = 4001,
    CourseInvalid = 4002,
    CoursePermissionDenied = 4003,
    MemberNotFound = 4010,
    MemberAlreadyExists = 4011,
    MemberRoleInvalid = 4012,

    // 课次与考勤
    SessionNotFound = 5000,
    SessionAlreadyExists = 5001,
    SessionInvalid = 5002,
    AttendanceNotAllowed = 5010,
    AttendanceTargetInvalid = 5011,

    // 评估与提交
    AssessmentNotFound = 6000,
    AssessmentInvalid = 6001,
    AssessmentNotAvailable = 6002,
    SubmissionNotFound = 6010,
    SubmissionLimitReached = 6011,
    SubmissionInvalid = 6012,

    // 考试
    ExamNotFound = 7000,
    ExamInvalid = 7001,
    ExamNotAvailable = 7002,
    QuestionNotFound = 7010,
    QuestionInvalid = 7011,
    AttemptNotFound = 7020,
    AttemptInProgress = 7021,
    AttemptLimitReached = 7022,
    ExamAttemptExpired = 7023,
    AttemptAlreadySubmitted = 7024,

    // 论坛
    ThreadNotFound = 8000,
    ThreadClosed = 8001,
    ThreadInvalid = 8002,
    MessageNotFound = 8010,
    MessageInvalid = 8011,

    // 成绩
    GradeNotFound = 9000,
    GradeInvalid = 9001,

    // 日程
    EventNotFound = 9500,
    EventInvalid = 9501,
}

/// 定义以字符串形式存储的枚举
///
/// 自动生成：
/// - 带 serde / ts-rs 派生的 enum，每个变体按给定字符串序列化
/// - as_str() / values()
/// - Display、FromStr 以及带提示信息的 Deserialize
#[macro_export]
macro_rules! define_string_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident => $value:literal),+ $(,)?
        }
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, ts_rs::TS)]
        $(#[$meta])*
        $vis enum $name {
            $(
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }

            pub fn values() -> &'static [&'static str] {
                &[$($value,)+]
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    _ => Err(format!("Invalid {}: {s}", stringify!($name))),
                }
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = <String as serde::Deserialize>::deserialize(deserializer)?;
                s.parse::<$name>().map_err(|_| {
                    serde::de::Error::custom(format!(
                        "无效的取值: '{s}'. 支持: {}",
                        $name::values().join(", ")
                    ))
                })
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    define_string_enum! {
        pub enum Sample {
            First => "first",
            SecondValue => "second_value",
        }
    }

    #[test]
    fn test_string_enum_roundtrip() {
        assert_eq!("second_value".parse::<Sample>(), Ok(Sample::SecondValue));
        assert_eq!(Sample::First.to_string(), "first");
        assert_eq!(
            serde_json::to_string(&Sample::SecondValue).unwrap(),
            "\"second_value\""
        );
    }

    #[test]
    fn test_string_enum_rejects_unknown() {
        let err = serde_json::from_str::<Sample>("\"third\"").unwrap_err();
        assert!(err.to_string().contains("first, second_value"));
    }

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::RefreshTokenExpired as i32, 2004);
        assert_eq!(ErrorCode::ExamAttemptExpired as i32, 7023);
    }
}
