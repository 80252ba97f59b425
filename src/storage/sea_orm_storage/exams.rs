//! 考试、试题与作答存储操作

use super::SeaOrmStorage;
use crate::entity::exam_answers::{
    ActiveModel as AnswerActiveModel, Column as AnswerColumn, Entity as ExamAnswers,
};
use crate::entity::exam_attempts::{
    ActiveModel as AttemptActiveModel, Column as AttemptColumn, Entity as ExamAttempts,
};
use crate::entity::exam_questions::{
    ActiveModel as QuestionActiveModel, Column as QuestionColumn, Entity as ExamQuestions,
};
use crate::entity::exams::{ActiveModel, Column, Entity as Exams};
use crate::errors::{LmsError, Result};
use crate::models::{
    assessments::entities::PublishStatus,
    exams::{
        entities::{AttemptStatus, Exam, ExamAnswer, ExamAttempt, ExamQuestion},
        requests::{
            CreateExamRequest, CreateQuestionRequest, UpdateExamRequest, UpdateQuestionRequest,
        },
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait, sea_query::Expr,
};

impl SeaOrmStorage {
    pub async fn create_exam_impl(
        &self,
        course_id: i64,
        created_by: i64,
        req: CreateExamRequest,
    ) -> Result<Exam> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            course_id: Set(course_id),
            title: Set(req.title.trim().to_string()),
            description: Set(req.description),
            duration_minutes: Set(req.duration_minutes),
            available_from: Set(req.available_from.map(|t| t.timestamp())),
            available_to: Set(req.available_to.map(|t| t.timestamp())),
            max_attempts: Set(req.max_attempts),
            passing_score: Set(req.passing_score),
            status: Set(req.status.unwrap_or(PublishStatus::Draft).to_string()),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("创建考试失败: {e}")))?;

        Ok(result.into_exam())
    }

    pub async fn get_exam_impl(&self, course_id: i64, exam_id: i64) -> Result<Option<Exam>> {
        let result = Exams::find_by_id(exam_id)
            .filter(Column::CourseId.eq(course_id))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询考试失败: {e}")))?;

        Ok(result.map(|m| m.into_exam()))
    }

    pub async fn list_exams_impl(&self, course_id: i64, published_only: bool) -> Result<Vec<Exam>> {
        let mut select = Exams::find().filter(Column::CourseId.eq(course_id));
        if published_only {
            select = select.filter(Column::Status.eq(PublishStatus::Published.to_string()));
        }

        let exams = select
            .order_by_asc(Column::AvailableFrom)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询考试列表失败: {e}")))?;

        Ok(exams.into_iter().map(|m| m.into_exam()).collect())
    }

    pub async fn update_exam_impl(
        &self,
        course_id: i64,
        exam_id: i64,
        update: UpdateExamRequest,
    ) -> Result<Option<Exam>> {
        let Some(existing) = Exams::find_by_id(exam_id)
            .filter(Column::CourseId.eq(course_id))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询考试失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model = existing.into_active_model();
        model.updated_at = Set(chrono::Utc::now().timestamp());

        if let Some(title) = update.title {
            model.title = Set(title.trim().to_string());
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(duration) = update.duration_minutes {
            model.duration_minutes = Set(duration);
        }
        if let Some(from) = update.available_from {
            model.available_from = Set(Some(from.timestamp()));
        }
        if let Some(to) = update.available_to {
            model.available_to = Set(Some(to.timestamp()));
        }
        if let Some(max_attempts) = update.max_attempts {
            model.max_attempts = Set(max_attempts);
        }
        if let Some(passing_score) = update.passing_score {
            model.passing_score = Set(Some(passing_score));
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新考试失败: {e}")))?;

        Ok(Some(result.into_exam()))
    }

    pub async fn delete_exam_impl(&self, course_id: i64, exam_id: i64) -> Result<bool> {
        let result = Exams::delete_many()
            .filter(Column::Id.eq(exam_id))
            .filter(Column::CourseId.eq(course_id))
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除考试失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn create_question_impl(
        &self,
        exam_id: i64,
        req: CreateQuestionRequest,
    ) -> Result<ExamQuestion> {
        let now = chrono::Utc::now().timestamp();
        let options = serde_json::to_string(&req.options)?;

        let model = QuestionActiveModel {
            exam_id: Set(exam_id),
            question: Set(req.question.trim().to_string()),
            options: Set(options),
            correct_answer: Set(req.correct_answer),
            points: Set(req.points),
            position: Set(req.position),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("创建试题失败: {e}")))?;

        Ok(result.into_question())
    }

    pub async fn get_question_impl(
        &self,
        exam_id: i64,
        question_id: i64,
    ) -> Result<Option<ExamQuestion>> {
        let result = ExamQuestions::find_by_id(question_id)
            .filter(QuestionColumn::ExamId.eq(exam_id))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询试题失败: {e}")))?;

        Ok(result.map(|m| m.into_question()))
    }

    pub async fn list_questions_impl(&self, exam_id: i64) -> Result<Vec<ExamQuestion>> {
        let questions = ExamQuestions::find()
            .filter(QuestionColumn::ExamId.eq(exam_id))
            .order_by_asc(QuestionColumn::Position)
            .order_by_asc(QuestionColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询试题列表失败: {e}")))?;

        Ok(questions.into_iter().map(|m| m.into_question()).collect())
    }

    pub async fn update_question_impl(
        &self,
        exam_id: i64,
        question_id: i64,
        update: UpdateQuestionRequest,
    ) -> Result<Option<ExamQuestion>> {
        let Some(existing) = ExamQuestions::find_by_id(question_id)
            .filter(QuestionColumn::ExamId.eq(exam_id))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询试题失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model = existing.into_active_model();
        model.updated_at = Set(chrono::Utc::now().timestamp());

        if let Some(question) = update.question {
            model.question = Set(question.trim().to_string());
        }
        if let Some(options) = update.options {
            model.options = Set(serde_json::to_string(&options)?);
        }
        if let Some(answer) = update.correct_answer {
            model.correct_answer = Set(answer);
        }
        if let Some(points) = update.points {
            model.points = Set(points);
        }
        if let Some(position) = update.position {
            model.position = Set(position);
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新试题失败: {e}")))?;

        Ok(Some(result.into_question()))
    }

    pub async fn delete_question_impl(&self, exam_id: i64, question_id: i64) -> Result<bool> {
        let result = ExamQuestions::delete_many()
            .filter(QuestionColumn::Id.eq(question_id))
            .filter(QuestionColumn::ExamId.eq(exam_id))
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除试题失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 开始作答；(exam, user, attempt_number) 唯一，并发开始返回 Conflict
    pub async fn create_attempt_impl(
        &self,
        exam_id: i64,
        user_id: i64,
        attempt_number: i32,
    ) -> Result<ExamAttempt> {
        let model = AttemptActiveModel {
            exam_id: Set(exam_id),
            user_id: Set(user_id),
            attempt_number: Set(attempt_number),
            status: Set(AttemptStatus::InProgress.to_string()),
            score: Set(None),
            started_at: Set(chrono::Utc::now().timestamp()),
            finished_at: Set(None),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::from_db("开始作答失败", e))?;

        Ok(result.into_attempt())
    }

    pub async fn get_attempt_impl(
        &self,
        exam_id: i64,
        attempt_id: i64,
    ) -> Result<Option<ExamAttempt>> {
        let result = ExamAttempts::find_by_id(attempt_id)
            .filter(AttemptColumn::ExamId.eq(exam_id))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作答失败: {e}")))?;

        Ok(result.map(|m| m.into_attempt()))
    }

    pub async fn list_attempts_impl(&self, exam_id: i64) -> Result<Vec<ExamAttempt>> {
        let attempts = ExamAttempts::find()
            .filter(AttemptColumn::ExamId.eq(exam_id))
            .order_by_desc(AttemptColumn::StartedAt)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作答列表失败: {e}")))?;

        Ok(attempts.into_iter().map(|m| m.into_attempt()).collect())
    }

    pub async fn list_user_attempts_impl(
        &self,
        exam_id: i64,
        user_id: i64,
    ) -> Result<Vec<ExamAttempt>> {
        let attempts = ExamAttempts::find()
            .filter(AttemptColumn::ExamId.eq(exam_id))
            .filter(AttemptColumn::UserId.eq(user_id))
            .order_by_asc(AttemptColumn::StartedAt)
            .order_by_asc(AttemptColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作答列表失败: {e}")))?;

        Ok(attempts.into_iter().map(|m| m.into_attempt()).collect())
    }

    pub async fn count_user_attempts_impl(&self, exam_id: i64, user_id: i64) -> Result<u64> {
        ExamAttempts::find()
            .filter(AttemptColumn::ExamId.eq(exam_id))
            .filter(AttemptColumn::UserId.eq(user_id))
            .count(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("统计作答次数失败: {e}")))
    }

    pub async fn find_unfinished_attempt_impl(
        &self,
        exam_id: i64,
        user_id: i64,
    ) -> Result<Option<ExamAttempt>> {
        let result = ExamAttempts::find()
            .filter(AttemptColumn::ExamId.eq(exam_id))
            .filter(AttemptColumn::UserId.eq(user_id))
            .filter(AttemptColumn::Status.eq(AttemptStatus::InProgress.to_string()))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作答失败: {e}")))?;

        Ok(result.map(|m| m.into_attempt()))
    }

    /// 结束作答并写入答题记录（单个事务）
    ///
    /// 只有仍处于 in_progress 的作答会被更新；否则返回 None 且不写入任何数据。
    pub async fn finish_attempt_impl(
        &self,
        attempt_id: i64,
        status: AttemptStatus,
        score: f64,
        answers: Vec<ExamAnswer>,
    ) -> Result<Option<(ExamAttempt, Vec<ExamAnswer>)>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        let updated = ExamAttempts::update_many()
            .col_expr(AttemptColumn::Status, Expr::value(status.to_string()))
            .col_expr(AttemptColumn::Score, Expr::value(score))
            .col_expr(
                AttemptColumn::FinishedAt,
                Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(AttemptColumn::Id.eq(attempt_id))
            .filter(AttemptColumn::Status.eq(AttemptStatus::InProgress.to_string()))
            .exec(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新作答失败: {e}")))?;

        if updated.rows_affected == 0 {
            return Ok(None);
        }

        let Some(attempt) = ExamAttempts::find_by_id(attempt_id)
            .one(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作答失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut stored = Vec::with_capacity(answers.len());
        for answer in answers {
            let inserted = AnswerActiveModel {
                attempt_id: Set(attempt_id),
                question_id: Set(answer.question_id),
                answer: Set(answer.answer),
                is_correct: Set(answer.is_correct),
                points_awarded: Set(answer.points_awarded),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("保存答题记录失败: {e}")))?;
            stored.push(inserted.into_answer());
        }

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some((attempt.into_attempt(), stored)))
    }

    /// 某次作答的答题记录
    pub async fn list_attempt_answers_impl(&self, attempt_id: i64) -> Result<Vec<ExamAnswer>> {
        let answers = ExamAnswers::find()
            .filter(AnswerColumn::AttemptId.eq(attempt_id))
            .order_by_asc(AnswerColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询答题记录失败: {e}")))?;

        Ok(answers.into_iter().map(|m| m.into_answer()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::courses::tests::seed_course;
    use crate::storage::sea_orm_storage::users::tests::seed_user;

    async fn seed_exam(storage: &SeaOrmStorage) -> (Exam, i64) {
        let course = seed_course(storage, "EX101").await;
        let student = seed_user(storage, "examinee", UserRole::Student).await;
        let exam = storage
            .create_exam_impl(
                course.id,
                1,
                CreateExamRequest {
                    title: "Midterm".into(),
                    description: None,
                    duration_minutes: 30,
                    available_from: None,
                    available_to: None,
                    max_attempts: 2,
                    passing_score: Some(50.0),
                    status: Some(PublishStatus::Published),
                },
            )
            .await
            .unwrap();
        (exam, student.id)
    }

    #[tokio::test]
    async fn test_questions_keep_options_and_order() {
        let storage = SeaOrmStorage::in_memory().await;
        let (exam, _) = seed_exam(&storage).await;
        for (position, text) in [(2, "second"), (1, "first")] {
            storage
                .create_question_impl(
                    exam.id,
                    CreateQuestionRequest {
                        question: text.into(),
                        options: vec!["A".into(), "B".into()],
                        correct_answer: "A".into(),
                        points: 1.0,
                        position,
                    },
                )
                .await
                .unwrap();
        }

        let questions = storage.list_questions_impl(exam.id).await.unwrap();
        assert_eq!(questions[0].question, "first");
        assert_eq!(questions[0].options, vec!["A".to_string(), "B".to_string()]);
    }

    #[tokio::test]
    async fn test_duplicate_attempt_number_is_conflict() {
        let storage = SeaOrmStorage::in_memory().await;
        let (exam, student_id) = seed_exam(&storage).await;
        storage.create_attempt_impl(exam.id, student_id, 1).await.unwrap();

        let err = storage
            .create_attempt_impl(exam.id, student_id, 1)
            .await
            .unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(storage.count_user_attempts_impl(exam.id, student_id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_finish_attempt_only_once() {
        let storage = SeaOrmStorage::in_memory().await;
        let (exam, student_id) = seed_exam(&storage).await;
        let question = storage
            .create_question_impl(
                exam.id,
                CreateQuestionRequest {
                    question: "1 + 1?".into(),
                    options: vec![],
                    correct_answer: "2".into(),
                    points: 2.0,
                    position: 1,
                },
            )
            .await
            .unwrap();
        let attempt = storage.create_attempt_impl(exam.id, student_id, 1).await.unwrap();
        assert_eq!(
            storage
                .find_unfinished_attempt_impl(exam.id, student_id)
                .await
                .unwrap()
                .map(|a| a.id),
            Some(attempt.id)
        );

        let answer = ExamAnswer {
            id: 0,
            attempt_id: 0,
            question_id: question.id,
            answer: "2".into(),
            is_correct: true,
            points_awarded: 2.0,
        };
        let (finished, answers) = storage
            .finish_attempt_impl(attempt.id, AttemptStatus::Submitted, 100.0, vec![answer.clone()])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(finished.status, AttemptStatus::Submitted);
        assert_eq!(finished.score, Some(100.0));
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].attempt_id, attempt.id);

        let again = storage
            .finish_attempt_impl(attempt.id, AttemptStatus::Submitted, 0.0, vec![answer])
            .await
            .unwrap();
        assert!(again.is_none());
        assert_eq!(storage.list_attempt_answers_impl(attempt.id).await.unwrap().len(), 1);
        assert!(
            storage
                .find_unfinished_attempt_impl(exam.id, student_id)
                .await
                .unwrap()
                .is_none()
        );
    }
}
