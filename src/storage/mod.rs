use std::sync::Arc;

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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户，password 字段须已是哈希
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 删除用户
    async fn delete_user(&self, id: i64) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;

    /// 刷新令牌方法
    async fn create_refresh_token(
        &self,
        user_id: i64,
        token_hash: &str,
        remember_me: bool,
        expires_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<RefreshToken>;
    async fn get_refresh_token_by_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>>;
    // 返回是否真的删除了记录
    async fn delete_refresh_token_by_hash(&self, token_hash: &str) -> Result<bool>;
    async fn delete_user_refresh_tokens(&self, user_id: i64) -> Result<u64>;
    async fn delete_expired_refresh_tokens(&self, now: chrono::DateTime<chrono::Utc>)
    -> Result<u64>;

    /// 课程管理方法
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course>;
    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>>;
    async fn get_course_by_code(&self, code: &str) -> Result<Option<Course>>;
    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse>;
    // 列出用户所在的课程
    async fn list_member_courses(&self, user_id: i64) -> Result<Vec<Course>>;
    async fn update_course(
        &self,
        course_id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>>;
    async fn delete_course(&self, course_id: i64) -> Result<bool>;

    /// 课程成员方法
    async fn add_course_member(
        &self,
        course_id: i64,
        member: AddMemberRequest,
    ) -> Result<CourseMember>;
    async fn get_course_member(&self, course_id: i64, user_id: i64)
    -> Result<Option<CourseMember>>;
    async fn list_course_members_with_pagination(
        &self,
        course_id: i64,
        query: MemberListQuery,
    ) -> Result<CourseMemberListResponse>;
    // 列出课程中指定角色成员的用户ID
    async fn list_course_member_ids(&self, course_id: i64, role: CourseRole) -> Result<Vec<i64>>;
    // 列出用户所在课程的ID
    async fn list_user_course_ids(&self, user_id: i64) -> Result<Vec<i64>>;
    async fn update_course_member(
        &self,
        course_id: i64,
        user_id: i64,
        update: UpdateMemberRequest,
    ) -> Result<Option<CourseMember>>;
    async fn remove_course_member(&self, course_id: i64, user_id: i64) -> Result<bool>;

    /// 课次方法
    async fn create_session(
        &self,
        course_id: i64,
        session: CreateSessionRequest,
    ) -> Result<CourseSession>;
    async fn get_session(&self, course_id: i64, session_id: i64)
    -> Result<Option<CourseSession>>;
    async fn list_sessions(&self, course_id: i64) -> Result<Vec<CourseSession>>;
    async fn update_session(
        &self,
        course_id: i64,
        session_id: i64,
        update: UpdateSessionRequest,
    ) -> Result<Option<CourseSession>>;
    async fn delete_session(&self, course_id: i64, session_id: i64) -> Result<bool>;

    /// 考勤方法
    async fn upsert_attendance(&self, record: AttendanceUpsert) -> Result<Attendance>;
    async fn get_attendance(&self, session_id: i64, user_id: i64) -> Result<Option<Attendance>>;
    async fn list_session_attendance(&self, session_id: i64) -> Result<Vec<Attendance>>;
    async fn list_user_course_attendance(
        &self,
        course_id: i64,
        user_id: i64,
    ) -> Result<Vec<Attendance>>;

    /// 考核项方法
    async fn create_assessment(
        &self,
        course_id: i64,
        created_by: i64,
        assessment: CreateAssessmentRequest,
    ) -> Result<Assessment>;
    async fn get_assessment(
        &self,
        course_id: i64,
        assessment_id: i64,
    ) -> Result<Option<Assessment>>;
    async fn list_assessments_with_pagination(
        &self,
        course_id: i64,
        query: AssessmentListQuery,
    ) -> Result<AssessmentListResponse>;
    async fn update_assessment(
        &self,
        course_id: i64,
        assessment_id: i64,
        update: UpdateAssessmentRequest,
    ) -> Result<Option<Assessment>>;
    async fn delete_assessment(&self, course_id: i64, assessment_id: i64) -> Result<bool>;
    async fn count_assessments(&self, course_id: i64) -> Result<u64>;

    /// 提交方法
    async fn create_submission(
        &self,
        assessment_id: i64,
        user_id: i64,
        attempt_number: i32,
        content: String,
        is_late: bool,
    ) -> Result<Submission>;
    async fn get_submission(
        &self,
        assessment_id: i64,
        submission_id: i64,
    ) -> Result<Option<Submission>>;
    async fn list_submissions(&self, assessment_id: i64) -> Result<Vec<Submission>>;
    async fn list_user_submissions(
        &self,
        assessment_id: i64,
        user_id: i64,
    ) -> Result<Vec<Submission>>;
    async fn count_user_submissions(&self, assessment_id: i64, user_id: i64) -> Result<u64>;
    async fn grade_submission(
        &self,
        submission_id: i64,
        score: f64,
        feedback: Option<String>,
        graded_by: i64,
    ) -> Result<Option<Submission>>;

    /// 考试方法
    async fn create_exam(
        &self,
        course_id: i64,
        created_by: i64,
        exam: CreateExamRequest,
    ) -> Result<Exam>;
    async fn get_exam(&self, course_id: i64, exam_id: i64) -> Result<Option<Exam>>;
    async fn list_exams(&self, course_id: i64, published_only: bool) -> Result<Vec<Exam>>;
    async fn update_exam(
        &self,
        course_id: i64,
        exam_id: i64,
        update: UpdateExamRequest,
    ) -> Result<Option<Exam>>;
    async fn delete_exam(&self, course_id: i64, exam_id: i64) -> Result<bool>;

    /// 试题方法
    async fn create_question(
        &self,
        exam_id: i64,
        question: CreateQuestionRequest,
    ) -> Result<ExamQuestion>;
    async fn get_question(&self, exam_id: i64, question_id: i64)
    -> Result<Option<ExamQuestion>>;
    async fn list_questions(&self, exam_id: i64) -> Result<Vec<ExamQuestion>>;
    async fn update_question(
        &self,
        exam_id: i64,
        question_id: i64,
        update: UpdateQuestionRequest,
    ) -> Result<Option<ExamQuestion>>;
    async fn delete_question(&self, exam_id: i64, question_id: i64) -> Result<bool>;

    /// 作答方法
    async fn create_attempt(
        &self,
        exam_id: i64,
        user_id: i64,
        attempt_number: i32,
    ) -> Result<ExamAttempt>;
    async fn get_attempt(&self, exam_id: i64, attempt_id: i64) -> Result<Option<ExamAttempt>>;
    async fn list_attempts(&self, exam_id: i64) -> Result<Vec<ExamAttempt>>;
    async fn list_user_attempts(&self, exam_id: i64, user_id: i64) -> Result<Vec<ExamAttempt>>;
    async fn count_user_attempts(&self, exam_id: i64, user_id: i64) -> Result<u64>;
    async fn find_unfinished_attempt(
        &self,
        exam_id: i64,
        user_id: i64,
    ) -> Result<Option<ExamAttempt>>;
    // 在一个事务中结束作答并写入答题记录；作答已结束时返回 None
    async fn finish_attempt(
        &self,
        attempt_id: i64,
        status: AttemptStatus,
        score: f64,
        answers: Vec<ExamAnswer>,
    ) -> Result<Option<(ExamAttempt, Vec<ExamAnswer>)>>;
    async fn list_attempt_answers(&self, attempt_id: i64) -> Result<Vec<ExamAnswer>>;

    /// 论坛方法
    async fn create_thread(
        &self,
        course_id: i64,
        user_id: i64,
        thread: CreateThreadRequest,
    ) -> Result<ForumThread>;
    async fn get_thread(&self, course_id: i64, thread_id: i64) -> Result<Option<ForumThread>>;
    async fn list_threads_with_pagination(
        &self,
        course_id: i64,
        query: ThreadListQuery,
    ) -> Result<ThreadListResponse>;
    async fn update_thread(
        &self,
        course_id: i64,
        thread_id: i64,
        update: UpdateThreadRequest,
    ) -> Result<Option<ForumThread>>;
    async fn delete_thread(&self, course_id: i64, thread_id: i64) -> Result<bool>;
    async fn increment_thread_views(&self, thread_id: i64) -> Result<Option<ForumThread>>;
    async fn create_message(
        &self,
        thread_id: i64,
        user_id: i64,
        message: CreateMessageRequest,
    ) -> Result<ForumMessage>;
    async fn get_message(&self, thread_id: i64, message_id: i64)
    -> Result<Option<ForumMessage>>;
    async fn list_messages(&self, thread_id: i64) -> Result<Vec<ForumMessage>>;
    async fn update_message(
        &self,
        thread_id: i64,
        message_id: i64,
        content: String,
    ) -> Result<Option<ForumMessage>>;
    async fn delete_message(&self, thread_id: i64, message_id: i64) -> Result<bool>;

    /// 成绩方法
    async fn upsert_grade(&self, grade: GradeUpsert) -> Result<Grade>;
    async fn get_grade(&self, course_id: i64, user_id: i64) -> Result<Option<Grade>>;
    async fn list_course_grades(&self, course_id: i64) -> Result<Vec<Grade>>;
    async fn list_user_grades(&self, user_id: i64) -> Result<Vec<Grade>>;
    async fn delete_grade(&self, course_id: i64, user_id: i64) -> Result<bool>;
    // 课程内所有已评分提交的分数及所属考核项权重
    async fn list_graded_scores(&self, course_id: i64) -> Result<Vec<GradedScore>>;

    /// 日程方法
    async fn create_event(&self, owner_id: i64, event: CreateEventRequest)
    -> Result<ScheduleEvent>;
    async fn get_event(&self, event_id: i64) -> Result<Option<ScheduleEvent>>;
    async fn update_event(
        &self,
        event_id: i64,
        update: UpdateEventRequest,
    ) -> Result<Option<ScheduleEvent>>;
    async fn delete_event(&self, event_id: i64) -> Result<bool>;
    // 区间内可见事件：course_ids 为 None 时包含全部课程事件，另加 owner 的个人事件
    async fn list_events_in_range(
        &self,
        from: chrono::DateTime<chrono::Utc>,
        to: chrono::DateTime<chrono::Utc>,
        course_ids: Option<Vec<i64>>,
        owner_id: i64,
    ) -> Result<Vec<ScheduleEvent>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
