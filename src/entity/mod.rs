//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod assessments;
pub mod attendances;
pub mod course_members;
pub mod course_sessions;
pub mod courses;
pub mod exam_answers;
pub mod exam_attempts;
pub mod exam_questions;
pub mod exams;
pub mod forum_messages;
pub mod forum_threads;
pub mod grades;
pub mod refresh_tokens;
pub mod schedule_events;
pub mod submissions;
pub mod users;
