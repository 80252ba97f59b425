//! 预导入模块，方便使用

pub use super::assessments::{
    ActiveModel as AssessmentActiveModel, Entity as Assessments, Model as AssessmentModel,
};
pub use super::attendances::{
    ActiveModel as AttendanceActiveModel, Entity as Attendances, Model as AttendanceModel,
};
pub use super::course_members::{
    ActiveModel as CourseMemberActiveModel, Entity as CourseMembers, Model as CourseMemberModel,
};
pub use super::course_sessions::{
    ActiveModel as CourseSessionActiveModel, Entity as CourseSessions,
    Model as CourseSessionModel,
};
pub use super::courses::{ActiveModel as CourseActiveModel, Entity as Courses, Model as CourseModel};
pub use super::exam_answers::{
    ActiveModel as ExamAnswerActiveModel, Entity as ExamAnswers, Model as ExamAnswerModel,
};
pub use super::exam_attempts::{
    ActiveModel as ExamAttemptActiveModel, Entity as ExamAttempts, Model as ExamAttemptModel,
};
pub use super::exam_questions::{
    ActiveModel as ExamQuestionActiveModel, Entity as ExamQuestions, Model as ExamQuestionModel,
};
pub use super::exams::{ActiveModel as ExamActiveModel, Entity as Exams, Model as ExamModel};
pub use super::forum_messages::{
    ActiveModel as ForumMessageActiveModel, Entity as ForumMessages, Model as ForumMessageModel,
};
pub use super::forum_threads::{
    ActiveModel as ForumThreadActiveModel, Entity as ForumThreads, Model as ForumThreadModel,
};
pub use super::grades::{ActiveModel as GradeActiveModel, Entity as Grades, Model as GradeModel};
pub use super::refresh_tokens::{
    ActiveModel as RefreshTokenActiveModel, Entity as RefreshTokens, Model as RefreshTokenModel,
};
pub use super::schedule_events::{
    ActiveModel as ScheduleEventActiveModel, Entity as ScheduleEvents,
    Model as ScheduleEventModel,
};
pub use super::submissions::{
    ActiveModel as SubmissionActiveModel, Entity as Submissions, Model as SubmissionModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
