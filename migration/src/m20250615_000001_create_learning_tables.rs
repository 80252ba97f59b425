use sea_orm_migration::prelude::*;

use super::m20250601_000001_create_tables::{Courses, Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建评估表
        manager
            .create_table(
                Table::create()
                    .table(Assessments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Assessments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Assessments::CourseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Assessments::Kind).string().not_null())
                    .col(ColumnDef::new(Assessments::Title).string().not_null())
                    .col(ColumnDef::new(Assessments::Description).text().null())
                    .col(ColumnDef::new(Assessments::Weight).double().not_null())
                    .col(ColumnDef::new(Assessments::DueDate).big_integer().null())
                    .col(
                        ColumnDef::new(Assessments::AvailableFrom)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Assessments::AvailableTo)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(Assessments::Status).string().not_null())
                    .col(
                        ColumnDef::new(Assessments::MaxAttempts)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Assessments::PassingScore).double().null())
                    .col(
                        ColumnDef::new(Assessments::CreatedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assessments::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assessments::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Assessments::Table, Assessments::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建提交表
        manager
            .create_table(
                Table::create()
                    .table(Submissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Submissions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Submissions::AssessmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Submissions::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Submissions::AttemptNumber)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Submissions::Content).text().not_null())
                    .col(
                        ColumnDef::new(Submissions::IsLate)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Submissions::Score).double().null())
                    .col(ColumnDef::new(Submissions::Feedback).text().null())
                    .col(ColumnDef::new(Submissions::GradedBy).big_integer().null())
                    .col(ColumnDef::new(Submissions::GradedAt).big_integer().null())
                    .col(
                        ColumnDef::new(Submissions::SubmittedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Submissions::Table, Submissions::AssessmentId)
                            .to(Assessments::Table, Assessments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Submissions::Table, Submissions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建考试表
        manager
            .create_table(
                Table::create()
                    .table(Exams::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Exams::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Exams::CourseId).big_integer().not_null())
                    .col(ColumnDef::new(Exams::Title).string().not_null())
                    .col(ColumnDef::new(Exams::Description).text().null())
                    .col(
                        ColumnDef::new(Exams::DurationMinutes)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Exams::AvailableFrom).big_integer().null())
                    .col(ColumnDef::new(Exams::AvailableTo).big_integer().null())
                    .col(
                        ColumnDef::new(Exams::MaxAttempts)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Exams::PassingScore).double().null())
                    .col(ColumnDef::new(Exams::Status).string().not_null())
                    .col(ColumnDef::new(Exams::CreatedBy).big_integer().not_null())
                    .col(ColumnDef::new(Exams::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Exams::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Exams::Table, Exams::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建考试题目表，选项以 JSON 数组保存
        manager
            .create_table(
                Table::create()
                    .table(ExamQuestions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExamQuestions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ExamQuestions::ExamId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ExamQuestions::Question).text().not_null())
                    .col(ColumnDef::new(ExamQuestions::Options).text().not_null())
                    .col(
                        ColumnDef::new(ExamQuestions::CorrectAnswer)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ExamQuestions::Points).double().not_null())
                    .col(ColumnDef::new(ExamQuestions::Position).integer().not_null())
                    .col(
                        ColumnDef::new(ExamQuestions::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExamQuestions::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExamQuestions::Table, ExamQuestions::ExamId)
                            .to(Exams::Table, Exams::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建考试作答记录表
        manager
            .create_table(
                Table::create()
                    .table(ExamAttempts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExamAttempts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ExamAttempts::ExamId).big_integer().not_null())
                    .col(ColumnDef::new(ExamAttempts::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(ExamAttempts::AttemptNumber)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ExamAttempts::Status).string().not_null())
                    .col(ColumnDef::new(ExamAttempts::Score).double().null())
                    .col(
                        ColumnDef::new(ExamAttempts::StartedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExamAttempts::FinishedAt)
                            .big_integer()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExamAttempts::Table, ExamAttempts::ExamId)
                            .to(Exams::Table, Exams::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExamAttempts::Table, ExamAttempts::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建考试答案表
        manager
            .create_table(
                Table::create()
                    .table(ExamAnswers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExamAnswers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ExamAnswers::AttemptId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExamAnswers::QuestionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ExamAnswers::Answer).text().not_null())
                    .col(ColumnDef::new(ExamAnswers::IsCorrect).boolean().not_null())
                    .col(
                        ColumnDef::new(ExamAnswers::PointsAwarded)
                            .double()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExamAnswers::Table, ExamAnswers::AttemptId)
                            .to(ExamAttempts::Table, ExamAttempts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExamAnswers::Table, ExamAnswers::QuestionId)
                            .to(ExamQuestions::Table, ExamQuestions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建论坛主题表
        manager
            .create_table(
                Table::create()
                    .table(ForumThreads::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ForumThreads::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ForumThreads::CourseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ForumThreads::UserId).big_integer().not_null())
                    .col(ColumnDef::new(ForumThreads::Title).string().not_null())
                    .col(ColumnDef::new(ForumThreads::Content).text().not_null())
                    .col(ColumnDef::new(ForumThreads::Kind).string().not_null())
                    .col(ColumnDef::new(ForumThreads::Status).string().not_null())
                    .col(
                        ColumnDef::new(ForumThreads::Pinned)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ForumThreads::Views)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ForumThreads::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ForumThreads::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ForumThreads::Table, ForumThreads::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ForumThreads::Table, ForumThreads::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建论坛消息表
        manager
            .create_table(
                Table::create()
                    .table(ForumMessages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ForumMessages::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ForumMessages::ThreadId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ForumMessages::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ForumMessages::ParentId).big_integer().null())
                    .col(ColumnDef::new(ForumMessages::Content).text().not_null())
                    .col(
                        ColumnDef::new(ForumMessages::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ForumMessages::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ForumMessages::Table, ForumMessages::ThreadId)
                            .to(ForumThreads::Table, ForumThreads::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ForumMessages::Table, ForumMessages::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建课程成绩表
        manager
            .create_table(
                Table::create()
                    .table(Grades::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Grades::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Grades::CourseId).big_integer().not_null())
                    .col(ColumnDef::new(Grades::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Grades::Score).double().not_null())
                    .col(ColumnDef::new(Grades::LetterGrade).string().not_null())
                    .col(ColumnDef::new(Grades::Remarks).text().null())
                    .col(
                        ColumnDef::new(Grades::IsOverride)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Grades::UpdatedBy).big_integer().null())
                    .col(ColumnDef::new(Grades::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Grades::Table, Grades::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Grades::Table, Grades::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建日程事件表，course_id 为空表示个人日程
        manager
            .create_table(
                Table::create()
                    .table(ScheduleEvents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScheduleEvents::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ScheduleEvents::CourseId).big_integer().null())
                    .col(
                        ColumnDef::new(ScheduleEvents::OwnerId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ScheduleEvents::Kind).string().not_null())
                    .col(ColumnDef::new(ScheduleEvents::Title).string().not_null())
                    .col(ColumnDef::new(ScheduleEvents::Description).text().null())
                    .col(ColumnDef::new(ScheduleEvents::Location).string().null())
                    .col(
                        ColumnDef::new(ScheduleEvents::StartsAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleEvents::EndsAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleEvents::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleEvents::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ScheduleEvents::Table, ScheduleEvents::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ScheduleEvents::Table, ScheduleEvents::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_assessments_course_id")
                    .table(Assessments::Table)
                    .col(Assessments::CourseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .unique()
                    .name("idx_submissions_assessment_user_attempt")
                    .table(Submissions::Table)
                    .col(Submissions::AssessmentId)
                    .col(Submissions::UserId)
                    .col(Submissions::AttemptNumber)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_exam_questions_exam_id")
                    .table(ExamQuestions::Table)
                    .col(ExamQuestions::ExamId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .unique()
                    .name("idx_exam_attempts_exam_user_attempt")
                    .table(ExamAttempts::Table)
                    .col(ExamAttempts::ExamId)
                    .col(ExamAttempts::UserId)
                    .col(ExamAttempts::AttemptNumber)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_forum_threads_course_id")
                    .table(ForumThreads::Table)
                    .col(ForumThreads::CourseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_forum_messages_thread_id")
                    .table(ForumMessages::Table)
                    .col(ForumMessages::ThreadId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .unique()
                    .name("idx_grades_course_user")
                    .table(Grades::Table)
                    .col(Grades::CourseId)
                    .col(Grades::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_schedule_events_starts_at")
                    .table(ScheduleEvents::Table)
                    .col(ScheduleEvents::StartsAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ScheduleEvents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Grades::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ForumMessages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ForumThreads::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExamAnswers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExamAttempts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExamQuestions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Exams::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Submissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Assessments::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Assessments {
    #[sea_orm(iden = "assessments")]
    Table,
    Id,
    CourseId,
    Kind,
    Title,
    Description,
    Weight,
    DueDate,
    AvailableFrom,
    AvailableTo,
    Status,
    MaxAttempts,
    PassingScore,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Submissions {
    #[sea_orm(iden = "submissions")]
    Table,
    Id,
    AssessmentId,
    UserId,
    AttemptNumber,
    Content,
    IsLate,
    Score,
    Feedback,
    GradedBy,
    GradedAt,
    SubmittedAt,
}

#[derive(DeriveIden)]
enum Exams {
    #[sea_orm(iden = "exams")]
    Table,
    Id,
    CourseId,
    Title,
    Description,
    DurationMinutes,
    AvailableFrom,
    AvailableTo,
    MaxAttempts,
    PassingScore,
    Status,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ExamQuestions {
    #[sea_orm(iden = "exam_questions")]
    Table,
    Id,
    ExamId,
    Question,
    Options,
    CorrectAnswer,
    Points,
    Position,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ExamAttempts {
    #[sea_orm(iden = "exam_attempts")]
    Table,
    Id,
    ExamId,
    UserId,
    AttemptNumber,
    Status,
    Score,
    StartedAt,
    FinishedAt,
}

#[derive(DeriveIden)]
enum ExamAnswers {
    #[sea_orm(iden = "exam_answers")]
    Table,
    Id,
    AttemptId,
    QuestionId,
    Answer,
    IsCorrect,
    PointsAwarded,
}

#[derive(DeriveIden)]
enum ForumThreads {
    #[sea_orm(iden = "forum_threads")]
    Table,
    Id,
    CourseId,
    UserId,
    Title,
    Content,
    Kind,
    Status,
    Pinned,
    Views,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ForumMessages {
    #[sea_orm(iden = "forum_messages")]
    Table,
    Id,
    ThreadId,
    UserId,
    ParentId,
    Content,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Grades {
    #[sea_orm(iden = "grades")]
    Table,
    Id,
    CourseId,
    UserId,
    Score,
    LetterGrade,
    Remarks,
    IsOverride,
    UpdatedBy,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ScheduleEvents {
    #[sea_orm(iden = "schedule_events")]
    Table,
    Id,
    CourseId,
    OwnerId,
    Kind,
    Title,
    Description,
    Location,
    StartsAt,
    EndsAt,
    CreatedAt,
    UpdatedAt,
}
