//! 考核项与提交存储操作

use super::SeaOrmStorage;
use crate::entity::assessments::{ActiveModel, Column, Entity as Assessments};
use crate::entity::submissions::{
    ActiveModel as SubmissionActiveModel, Column as SubmissionColumn, Entity as Submissions,
};
use crate::errors::{LmsError, Result};
use crate::models::{
    PaginationInfo, PaginationQuery,
    assessments::{
        entities::{Assessment, PublishStatus, Submission},
        requests::{AssessmentListQuery, CreateAssessmentRequest, UpdateAssessmentRequest},
        responses::AssessmentListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_assessment_impl(
        &self,
        course_id: i64,
        created_by: i64,
        req: CreateAssessmentRequest,
    ) -> Result<Assessment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            course_id: Set(course_id),
            kind: Set(req.kind.to_string()),
            title: Set(req.title.trim().to_string()),
            description: Set(req.description),
            weight: Set(req.weight),
            due_date: Set(req.due_date.map(|t| t.timestamp())),
            available_from: Set(req.available_from.map(|t| t.timestamp())),
            available_to: Set(req.available_to.map(|t| t.timestamp())),
            status: Set(req.status.unwrap_or(PublishStatus::Draft).to_string()),
            max_attempts: Set(req.max_attempts),
            passing_score: Set(req.passing_score),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("创建考核项失败: {e}")))?;

        Ok(result.into_assessment())
    }

    pub async fn get_assessment_impl(
        &self,
        course_id: i64,
        assessment_id: i64,
    ) -> Result<Option<Assessment>> {
        let result = Assessments::find_by_id(assessment_id)
            .filter(Column::CourseId.eq(course_id))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询考核项失败: {e}")))?;

        Ok(result.map(|m| m.into_assessment()))
    }

    pub async fn list_assessments_with_pagination_impl(
        &self,
        course_id: i64,
        query: AssessmentListQuery,
    ) -> Result<AssessmentListResponse> {
        let (page, size) = PaginationQuery::normalize(query.page, query.size);

        let mut select = Assessments::find().filter(Column::CourseId.eq(course_id));
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        let paginator = select
            .order_by_asc(Column::DueDate)
            .order_by_asc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| LmsError::database_operation(format!("查询考核项总数失败: {e}")))?;

        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询考核项列表失败: {e}")))?;

        Ok(AssessmentListResponse {
            items: items.into_iter().map(|m| m.into_assessment()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    pub async fn update_assessment_impl(
        &self,
        course_id: i64,
        assessment_id: i64,
        update: UpdateAssessmentRequest,
    ) -> Result<Option<Assessment>> {
        let Some(existing) = Assessments::find_by_id(assessment_id)
            .filter(Column::CourseId.eq(course_id))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询考核项失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model = existing.into_active_model();
        model.updated_at = Set(chrono::Utc::now().timestamp());

        if let Some(kind) = update.kind {
            model.kind = Set(kind.to_string());
        }
        if let Some(title) = update.title {
            model.title = Set(title.trim().to_string());
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(weight) = update.weight {
            model.weight = Set(weight);
        }
        if let Some(due_date) = update.due_date {
            model.due_date = Set(Some(due_date.timestamp()));
        }
        if let Some(from) = update.available_from {
            model.available_from = Set(Some(from.timestamp()));
        }
        if let Some(to) = update.available_to {
            model.available_to = Set(Some(to.timestamp()));
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }
        if let Some(max_attempts) = update.max_attempts {
            model.max_attempts = Set(max_attempts);
        }
        if let Some(passing_score) = update.passing_score {
            model.passing_score = Set(Some(passing_score));
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新考核项失败: {e}")))?;

        Ok(Some(result.into_assessment()))
    }

    pub async fn delete_assessment_impl(&self, course_id: i64, assessment_id: i64) -> Result<bool> {
        let result = Assessments::delete_many()
            .filter(Column::Id.eq(assessment_id))
            .filter(Column::CourseId.eq(course_id))
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除考核项失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_assessments_impl(&self, course_id: i64) -> Result<u64> {
        Assessments::find()
            .filter(Column::CourseId.eq(course_id))
            .count(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("统计考核项数量失败: {e}")))
    }

    /// 创建提交；(assessment, user, attempt_number) 唯一，并发重复提交返回 Conflict
    pub async fn create_submission_impl(
        &self,
        assessment_id: i64,
        user_id: i64,
        attempt_number: i32,
        content: String,
        is_late: bool,
    ) -> Result<Submission> {
        let model = SubmissionActiveModel {
            assessment_id: Set(assessment_id),
            user_id: Set(user_id),
            attempt_number: Set(attempt_number),
            content: Set(content),
            is_late: Set(is_late),
            submitted_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::from_db("创建提交失败", e))?;

        Ok(result.into_submission())
    }

    pub async fn get_submission_impl(
        &self,
        assessment_id: i64,
        submission_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(submission_id)
            .filter(SubmissionColumn::AssessmentId.eq(assessment_id))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    pub async fn list_submissions_impl(&self, assessment_id: i64) -> Result<Vec<Submission>> {
        let items = Submissions::find()
            .filter(SubmissionColumn::AssessmentId.eq(assessment_id))
            .order_by_asc(SubmissionColumn::UserId)
            .order_by_asc(SubmissionColumn::AttemptNumber)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询提交列表失败: {e}")))?;

        Ok(items.into_iter().map(|m| m.into_submission()).collect())
    }

    pub async fn list_user_submissions_impl(
        &self,
        assessment_id: i64,
        user_id: i64,
    ) -> Result<Vec<Submission>> {
        let items = Submissions::find()
            .filter(SubmissionColumn::AssessmentId.eq(assessment_id))
            .filter(SubmissionColumn::UserId.eq(user_id))
            .order_by_asc(SubmissionColumn::AttemptNumber)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询提交列表失败: {e}")))?;

        Ok(items.into_iter().map(|m| m.into_submission()).collect())
    }

    pub async fn count_user_submissions_impl(&self, assessment_id: i64, user_id: i64) -> Result<u64> {
        Submissions::find()
            .filter(SubmissionColumn::AssessmentId.eq(assessment_id))
            .filter(SubmissionColumn::UserId.eq(user_id))
            .count(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("统计提交次数失败: {e}")))
    }

    pub async fn grade_submission_impl(
        &self,
        submission_id: i64,
        score: f64,
        feedback: Option<String>,
        graded_by: i64,
    ) -> Result<Option<Submission>> {
        let Some(existing) = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询提交失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model = existing.into_active_model();
        model.score = Set(Some(score));
        model.feedback = Set(feedback);
        model.graded_by = Set(Some(graded_by));
        model.graded_at = Set(Some(chrono::Utc::now().timestamp()));

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("评分失败: {e}")))?;

        Ok(Some(result.into_submission()))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::assessments::entities::AssessmentKind;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::courses::tests::seed_course;
    use crate::storage::sea_orm_storage::users::tests::seed_user;

    pub(crate) fn assessment_request(weight: f64, status: PublishStatus) -> CreateAssessmentRequest {
        CreateAssessmentRequest {
            kind: AssessmentKind::Assignment,
            title: "Homework".into(),
            description: None,
            weight,
            due_date: None,
            available_from: None,
            available_to: None,
            status: Some(status),
            max_attempts: 0,
            passing_score: None,
        }
    }

    #[tokio::test]
    async fn test_status_filter_and_course_scope() {
        let storage = SeaOrmStorage::in_memory().await;
        let course = seed_course(&storage, "BI101").await;
        let other = seed_course(&storage, "BI102").await;
        let draft = storage
            .create_assessment_impl(course.id, 1, assessment_request(10.0, PublishStatus::Draft))
            .await
            .unwrap();
        storage
            .create_assessment_impl(course.id, 1, assessment_request(20.0, PublishStatus::Published))
            .await
            .unwrap();

        let published = storage
            .list_assessments_with_pagination_impl(
                course.id,
                AssessmentListQuery {
                    status: Some(PublishStatus::Published),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(published.pagination.total, 1);
        assert_eq!(storage.count_assessments_impl(course.id).await.unwrap(), 2);
        assert!(storage.get_assessment_impl(other.id, draft.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_submission_attempts_and_grading() {
        let storage = SeaOrmStorage::in_memory().await;
        let course = seed_course(&storage, "BI201").await;
        let student = seed_user(&storage, "submitter", UserRole::Student).await;
        let assessment = storage
            .create_assessment_impl(course.id, 1, assessment_request(50.0, PublishStatus::Published))
            .await
            .unwrap();

        let first = storage
            .create_submission_impl(assessment.id, student.id, 1, "v1".into(), false)
            .await
            .unwrap();
        let duplicate = storage
            .create_submission_impl(assessment.id, student.id, 1, "v1 again".into(), false)
            .await
            .unwrap_err();
        assert!(duplicate.is_conflict());
        storage
            .create_submission_impl(assessment.id, student.id, 2, "v2".into(), true)
            .await
            .unwrap();

        assert_eq!(
            storage
                .count_user_submissions_impl(assessment.id, student.id)
                .await
                .unwrap(),
            2
        );

        let graded = storage
            .grade_submission_impl(first.id, 88.5, Some("good".into()), 7)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(graded.score, Some(88.5));
        assert_eq!(graded.graded_by, Some(7));
        assert!(graded.graded_at.is_some());
    }
}
