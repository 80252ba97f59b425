//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod assessments;
mod course_members;
mod courses;
mod exams;
mod forum;
mod grades;
mod refresh_tokens;
mod schedule;
mod sessions;
mod users;

use crate::config::AppConfig;
use crate::errors::{LmsError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

const SQLITE_MEMORY_URL: &str = "sqlite::memory:";

/// 秒级时间戳转换为 UTC 时间
pub(crate) fn from_timestamp(ts: i64) -> chrono::DateTime<chrono::Utc> {
    chrono::DateTime::<chrono::Utc>::from_timestamp(ts, 0).unwrap_or_default()
}

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 按全局配置创建存储实例并运行迁移
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect(
            &config.database.url,
            config.database.pool_size,
            config.database.timeout,
        )
        .await
    }

    /// 使用显式参数连接数据库并运行迁移
    pub async fn connect(url: &str, pool_size: u32, timeout: u64) -> Result<Self> {
        let db_url = Self::build_database_url(url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, pool_size, timeout).await?
        } else {
            Self::connect_generic(&db_url, pool_size, timeout).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| LmsError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM storage initialized, database: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    ///
    /// 内存数据库只对单个连接可见，因此固定为一个长期存活的连接。
    async fn connect_sqlite(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let in_memory = url == SQLITE_MEMORY_URL;

        let mut opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| LmsError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        let pool = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            opt = opt
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .pragma("cache_size", "-64000")
                .pragma("temp_store", "memory")
                .pragma("mmap_size", "536870912")
                .pragma("wal_autocheckpoint", "1000");

            SqlitePoolOptions::new()
                .max_connections(pool_size.max(1))
                .min_connections(1)
                .test_before_acquire(true)
                .idle_timeout(Duration::from_secs(300))
        };

        let pool = pool
            .acquire_timeout(Duration::from_secs(timeout))
            .connect_with(opt)
            .await
            .map_err(|e| LmsError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(pool_size)
            .min_connections(pool_size.min(5))
            .connect_timeout(Duration::from_secs(timeout))
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| LmsError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url == ":memory:" || url == SQLITE_MEMORY_URL {
            Ok(SQLITE_MEMORY_URL.to_string())
        } else if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(LmsError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }

    /// 测试用的内存数据库
    #[cfg(test)]
    pub(crate) async fn in_memory() -> Self {
        Self::connect(":memory:", 1, 5)
            .await
            .expect("in-memory sqlite should connect")
    }
}

// Storage trait 实现
use crate::models::{
    assessments::{
        entities::{Assessment, Submission},
        requests::{AssessmentListQuery, CreateAssessmentRequest, UpdateAssessmentRequest},
        responses::AssessmentListResponse,
    },
    auth::entities::RefreshToken,
    course_members::{
        entities::{CourseMember, CourseRole},
        requests::{AddMemberRequest, MemberListQuery, UpdateMemberRequest},
        responses::CourseMemberListResponse,
    },
    courses::{
        entities::Course,
        requests::{CourseListQuery, CreateCourseRequest, UpdateCourseRequest},
        responses::CourseListResponse,
    },
    exams::{
        entities::{AttemptStatus, Exam, ExamAnswer, ExamAttempt, ExamQuestion},
        requests::{
            CreateExamRequest, CreateQuestionRequest, UpdateExamRequest, UpdateQuestionRequest,
        },
    },
    forum::{
        entities::{ForumMessage, ForumThread},
        requests::{CreateMessageRequest, CreateThreadRequest, ThreadListQuery, UpdateThreadRequest},
        responses::ThreadListResponse,
    },
    grades::{
        entities::{Grade, GradedScore},
        requests::GradeUpsert,
    },
    schedule::{
        entities::ScheduleEvent,
        requests::{CreateEventRequest, UpdateEventRequest},
    },
    sessions::{
        entities::{Attendance, CourseSession},
        requests::{AttendanceUpsert, CreateSessionRequest, UpdateSessionRequest},
    },
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 刷新令牌模块
    async fn create_refresh_token(
        &self,
        user_id: i64,
        token_hash: &str,
        remember_me: bool,
        expires_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<RefreshToken> {
        self.create_refresh_token_impl(user_id, token_hash, remember_me, expires_at)
            .await
    }

    async fn get_refresh_token_by_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>> {
        self.get_refresh_token_by_hash_impl(token_hash).await
    }

    async fn delete_refresh_token_by_hash(&self, token_hash: &str) -> Result<bool> {
        self.delete_refresh_token_by_hash_impl(token_hash).await
    }

    async fn delete_user_refresh_tokens(&self, user_id: i64) -> Result<u64> {
        self.delete_user_refresh_tokens_impl(user_id).await
    }

    async fn delete_expired_refresh_tokens(
        &self,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<u64> {
        self.delete_expired_refresh_tokens_impl(now).await
    }

    // 课程模块
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course> {
        self.create_course_impl(course).await
    }

    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(course_id).await
    }

    async fn get_course_by_code(&self, code: &str) -> Result<Option<Course>> {
        self.get_course_by_code_impl(code).await
    }

    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        self.list_courses_with_pagination_impl(query).await
    }

    async fn list_member_courses(&self, user_id: i64) -> Result<Vec<Course>> {
        self.list_member_courses_impl(user_id).await
    }

    async fn update_course(
        &self,
        course_id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        self.update_course_impl(course_id, update).await
    }

    async fn delete_course(&self, course_id: i64) -> Result<bool> {
        self.delete_course_impl(course_id).await
    }

    // 课程成员模块
    async fn add_course_member(
        &self,
        course_id: i64,
        member: AddMemberRequest,
    ) -> Result<CourseMember> {
        self.add_course_member_impl(course_id, member).await
    }

    async fn get_course_member(
        &self,
        course_id: i64,
        user_id: i64,
    ) -> Result<Option<CourseMember>> {
        self.get_course_member_impl(course_id, user_id).await
    }

    async fn list_course_members_with_pagination(
        &self,
        course_id: i64,
        query: MemberListQuery,
    ) -> Result<CourseMemberListResponse> {
        self.list_course_members_with_pagination_impl(course_id, query)
            .await
    }

    async fn list_course_member_ids(&self, course_id: i64, role: CourseRole) -> Result<Vec<i64>> {
        self.list_course_member_ids_impl(course_id, role).await
    }

    async fn list_user_course_ids(&self, user_id: i64) -> Result<Vec<i64>> {
        self.list_user_course_ids_impl(user_id).await
    }

    async fn update_course_member(
        &self,
        course_id: i64,
        user_id: i64,
        update: UpdateMemberRequest,
    ) -> Result<Option<CourseMember>> {
        self.update_course_member_impl(course_id, user_id, update)
            .await
    }

    async fn remove_course_member(&self, course_id: i64, user_id: i64) -> Result<bool> {
        self.remove_course_member_impl(course_id, user_id).await
    }

    // 课次与考勤模块
    async fn create_session(
        &self,
        course_id: i64,
        session: CreateSessionRequest,
    ) -> Result<CourseSession> {
        self.create_session_impl(course_id, session).await
    }

    async fn get_session(
        &self,
        course_id: i64,
        session_id: i64,
    ) -> Result<Option<CourseSession>> {
        self.get_session_impl(course_id, session_id).await
    }

    async fn list_sessions(&self, course_id: i64) -> Result<Vec<CourseSession>> {
        self.list_sessions_impl(course_id).await
    }

    async fn update_session(
        &self,
        course_id: i64,
        session_id: i64,
        update: UpdateSessionRequest,
    ) -> Result<Option<CourseSession>> {
        self.update_session_impl(course_id, session_id, update)
            .await
    }

    async fn delete_session(&self, course_id: i64, session_id: i64) -> Result<bool> {
        self.delete_session_impl(course_id, session_id).await
    }

    async fn upsert_attendance(&self, record: AttendanceUpsert) -> Result<Attendance> {
        self.upsert_attendance_impl(record).await
    }

    async fn get_attendance(&self, session_id: i64, user_id: i64) -> Result<Option<Attendance>> {
        self.get_attendance_impl(session_id, user_id).await
    }

    async fn list_session_attendance(&self, session_id: i64) -> Result<Vec<Attendance>> {
        self.list_session_attendance_impl(session_id).await
    }

    async fn list_user_course_attendance(
        &self,
        course_id: i64,
        user_id: i64,
    ) -> Result<Vec<Attendance>> {
        self.list_user_course_attendance_impl(course_id, user_id)
            .await
    }

    // 考核项与提交模块
    async fn create_assessment(
        &self,
        course_id: i64,
        created_by: i64,
        assessment: CreateAssessmentRequest,
    ) -> Result<Assessment> {
        self.create_assessment_impl(course_id, created_by, assessment)
            .await
    }

    async fn get_assessment(
        &self,
        course_id: i64,
        assessment_id: i64,
    ) -> Result<Option<Assessment>> {
        self.get_assessment_impl(course_id, assessment_id).await
    }

    async fn list_assessments_with_pagination(
        &self,
        course_id: i64,
        query: AssessmentListQuery,
    ) -> Result<AssessmentListResponse> {
        self.list_assessments_with_pagination_impl(course_id, query)
            .await
    }

    async fn update_assessment(
        &self,
        course_id: i64,
        assessment_id: i64,
        update: UpdateAssessmentRequest,
    ) -> Result<Option<Assessment>> {
        self.update_assessment_impl(course_id, assessment_id, update)
            .await
    }

    async fn delete_assessment(&self, course_id: i64, assessment_id: i64) -> Result<bool> {
        self.delete_assessment_impl(course_id, assessment_id).await
    }

    async fn count_assessments(&self, course_id: i64) -> Result<u64> {
        self.count_assessments_impl(course_id).await
    }

    async fn create_submission(
        &self,
        assessment_id: i64,
        user_id: i64,
        attempt_number: i32,
        content: String,
        is_late: bool,
    ) -> Result<Submission> {
        self.create_submission_impl(assessment_id, user_id, attempt_number, content, is_late)
            .await
    }

    async fn get_submission(
        &self,
        assessment_id: i64,
        submission_id: i64,
    ) -> Result<Option<Submission>> {
        self.get_submission_impl(assessment_id, submission_id)
            .await
    }

    async fn list_submissions(&self, assessment_id: i64) -> Result<Vec<Submission>> {
        self.list_submissions_impl(assessment_id).await
    }

    async fn list_user_submissions(
        &self,
        assessment_id: i64,
        user_id: i64,
    ) -> Result<Vec<Submission>> {
        self.list_user_submissions_impl(assessment_id, user_id)
            .await
    }

    async fn count_user_submissions(&self, assessment_id: i64, user_id: i64) -> Result<u64> {
        self.count_user_submissions_impl(assessment_id, user_id)
            .await
    }

    async fn grade_submission(
        &self,
        submission_id: i64,
        score: f64,
        feedback: Option<String>,
        graded_by: i64,
    ) -> Result<Option<Submission>> {
        self.grade_submission_impl(submission_id, score, feedback, graded_by)
            .await
    }

    // 考试模块
    async fn create_exam(
        &self,
        course_id: i64,
        created_by: i64,
        exam: CreateExamRequest,
    ) -> Result<Exam> {
        self.create_exam_impl(course_id, created_by, exam).await
    }

    async fn get_exam(&self, course_id: i64, exam_id: i64) -> Result<Option<Exam>> {
        self.get_exam_impl(course_id, exam_id).await
    }

    async fn list_exams(&self, course_id: i64, published_only: bool) -> Result<Vec<Exam>> {
        self.list_exams_impl(course_id, published_only).await
    }

    async fn update_exam(
        &self,
        course_id: i64,
        exam_id: i64,
        update: UpdateExamRequest,
    ) -> Result<Option<Exam>> {
        self.update_exam_impl(course_id, exam_id, update).await
    }

    async fn delete_exam(&self, course_id: i64, exam_id: i64) -> Result<bool> {
        self.delete_exam_impl(course_id, exam_id).await
    }

    async fn create_question(
        &self,
        exam_id: i64,
        question: CreateQuestionRequest,
    ) -> Result<ExamQuestion> {
        self.create_question_impl(exam_id, question).await
    }

    async fn get_question(
        &self,
        exam_id: i64,
        question_id: i64,
    ) -> Result<Option<ExamQuestion>> {
        self.get_question_impl(exam_id, question_id).await
    }

    async fn list_questions(&self, exam_id: i64) -> Result<Vec<ExamQuestion>> {
        self.list_questions_impl(exam_id).await
    }

    async fn update_question(
        &self,
        exam_id: i64,
        question_id: i64,
        update: UpdateQuestionRequest,
    ) -> Result<Option<ExamQuestion>> {
        self.update_question_impl(exam_id, question_id, update)
            .await
    }

    async fn delete_question(&self, exam_id: i64, question_id: i64) -> Result<bool> {
        self.delete_question_impl(exam_id, question_id).await
    }

    async fn create_attempt(
        &self,
        exam_id: i64,
        user_id: i64,
        attempt_number: i32,
    ) -> Result<ExamAttempt> {
        self.create_attempt_impl(exam_id, user_id, attempt_number)
            .await
    }

    async fn get_attempt(&self, exam_id: i64, attempt_id: i64) -> Result<Option<ExamAttempt>> {
        self.get_attempt_impl(exam_id, attempt_id).await
    }

    async fn list_attempts(&self, exam_id: i64) -> Result<Vec<ExamAttempt>> {
        self.list_attempts_impl(exam_id).await
    }

    async fn list_user_attempts(&self, exam_id: i64, user_id: i64) -> Result<Vec<ExamAttempt>> {
        self.list_user_attempts_impl(exam_id, user_id).await
    }

    async fn count_user_attempts(&self, exam_id: i64, user_id: i64) -> Result<u64> {
        self.count_user_attempts_impl(exam_id, user_id).await
    }

    async fn find_unfinished_attempt(
        &self,
        exam_id: i64,
        user_id: i64,
    ) -> Result<Option<ExamAttempt>> {
        self.find_unfinished_attempt_impl(exam_id, user_id).await
    }

    async fn finish_attempt(
        &self,
        attempt_id: i64,
        status: AttemptStatus,
        score: f64,
        answers: Vec<ExamAnswer>,
    ) -> Result<Option<(ExamAttempt, Vec<ExamAnswer>)>> {
        self.finish_attempt_impl(attempt_id, status, score, answers)
            .await
    }

    async fn list_attempt_answers(&self, attempt_id: i64) -> Result<Vec<ExamAnswer>> {
        self.list_attempt_answers_impl(attempt_id).await
    }

    // 论坛模块
    async fn create_thread(
        &self,
        course_id: i64,
        user_id: i64,
        thread: CreateThreadRequest,
    ) -> Result<ForumThread> {
        self.create_thread_impl(course_id, user_id, thread).await
    }

    async fn get_thread(&self, course_id: i64, thread_id: i64) -> Result<Option<ForumThread>> {
        self.get_thread_impl(course_id, thread_id).await
    }

    async fn list_threads_with_pagination(
        &self,
        course_id: i64,
        query: ThreadListQuery,
    ) -> Result<ThreadListResponse> {
        self.list_threads_with_pagination_impl(course_id, query)
            .await
    }

    async fn update_thread(
        &self,
        course_id: i64,
        thread_id: i64,
        update: UpdateThreadRequest,
    ) -> Result<Option<ForumThread>> {
        self.update_thread_impl(course_id, thread_id, update).await
    }

    async fn delete_thread(&self, course_id: i64, thread_id: i64) -> Result<bool> {
        self.delete_thread_impl(course_id, thread_id).await
    }

    async fn increment_thread_views(&self, thread_id: i64) -> Result<Option<ForumThread>> {
        self.increment_thread_views_impl(thread_id).await
    }

    async fn create_message(
        &self,
        thread_id: i64,
        user_id: i64,
        message: CreateMessageRequest,
    ) -> Result<ForumMessage> {
        self.create_message_impl(thread_id, user_id, message).await
    }

    async fn get_message(
        &self,
        thread_id: i64,
        message_id: i64,
    ) -> Result<Option<ForumMessage>> {
        self.get_message_impl(thread_id, message_id).await
    }

    async fn list_messages(&self, thread_id: i64) -> Result<Vec<ForumMessage>> {
        self.list_messages_impl(thread_id).await
    }

    async fn update_message(
        &self,
        thread_id: i64,
        message_id: i64,
        content: String,
    ) -> Result<Option<ForumMessage>> {
        self.update_message_impl(thread_id, message_id, content)
            .await
    }

    async fn delete_message(&self, thread_id: i64, message_id: i64) -> Result<bool> {
        self.delete_message_impl(thread_id, message_id).await
    }

    // 成绩模块
    async fn upsert_grade(&self, grade: GradeUpsert) -> Result<Grade> {
        self.upsert_grade_impl(grade).await
    }

    async fn get_grade(&self, course_id: i64, user_id: i64) -> Result<Option<Grade>> {
        self.get_grade_impl(course_id, user_id).await
    }

    async fn list_course_grades(&self, course_id: i64) -> Result<Vec<Grade>> {
        self.list_course_grades_impl(course_id).await
    }

    async fn list_user_grades(&self, user_id: i64) -> Result<Vec<Grade>> {
        self.list_user_grades_impl(user_id).await
    }

    async fn delete_grade(&self, course_id: i64, user_id: i64) -> Result<bool> {
        self.delete_grade_impl(course_id, user_id).await
    }

    async fn list_graded_scores(&self, course_id: i64) -> Result<Vec<GradedScore>> {
        self.list_graded_scores_impl(course_id).await
    }

    // 日程模块
    async fn create_event(
        &self,
        owner_id: i64,
        event: CreateEventRequest,
    ) -> Result<ScheduleEvent> {
        self.create_event_impl(owner_id, event).await
    }

    async fn get_event(&self, event_id: i64) -> Result<Option<ScheduleEvent>> {
        self.get_event_impl(event_id).await
    }

    async fn update_event(
        &self,
        event_id: i64,
        update: UpdateEventRequest,
    ) -> Result<Option<ScheduleEvent>> {
        self.update_event_impl(event_id, update).await
    }

    async fn delete_event(&self, event_id: i64) -> Result<bool> {
        self.delete_event_impl(event_id).await
    }

    async fn list_events_in_range(
        &self,
        from: chrono::DateTime<chrono::Utc>,
        to: chrono::DateTime<chrono::Utc>,
        course_ids: Option<Vec<i64>>,
        owner_id: i64,
    ) -> Result<Vec<ScheduleEvent>> {
        self.list_events_in_range_impl(from, to, course_ids, owner_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("lms.db").unwrap(),
            "sqlite://lms.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url(":memory:").unwrap(),
            "sqlite::memory:"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("postgres://u:p@localhost/lms").unwrap(),
            "postgres://u:p@localhost/lms"
        );
        assert!(SeaOrmStorage::build_database_url("oracle://x").is_err());
    }

    #[tokio::test]
    async fn test_in_memory_storage_runs_migrations() {
        let storage = SeaOrmStorage::in_memory().await;
        assert_eq!(storage.count_users_impl().await.unwrap(), 0);
    }
}
