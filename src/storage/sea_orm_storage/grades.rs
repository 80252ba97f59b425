//! 课程总评存储操作

use super::SeaOrmStorage;
use crate::entity::assessments::{Column as AssessmentColumn, Entity as Assessments};
use crate::entity::grades::{ActiveModel, Column, Entity as Grades};
use crate::entity::submissions::{Column as SubmissionColumn, Entity as Submissions};
use crate::errors::{LmsError, Result};
use crate::models::grades::{
    entities::{Grade, GradedScore},
    requests::GradeUpsert,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set,
};
use std::collections::HashMap;

impl SeaOrmStorage {
    /// 按 (course_id, user_id) 写入总评，已存在则覆盖
    pub async fn upsert_grade_impl(&self, grade: GradeUpsert) -> Result<Grade> {
        let now = chrono::Utc::now().timestamp();

        let existing = Grades::find()
            .filter(Column::CourseId.eq(grade.course_id))
            .filter(Column::UserId.eq(grade.user_id))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询成绩失败: {e}")))?;

        let result = match existing {
            Some(existing) => {
                let mut model = existing.into_active_model();
                model.score = Set(grade.score);
                model.letter_grade = Set(grade.letter_grade);
                model.remarks = Set(grade.remarks);
                model.is_override = Set(grade.is_override);
                model.updated_by = Set(grade.updated_by);
                model.updated_at = Set(now);
                model
                    .update(&self.db)
                    .await
                    .map_err(|e| LmsError::database_operation(format!("更新成绩失败: {e}")))?
            }
            None => ActiveModel {
                course_id: Set(grade.course_id),
                user_id: Set(grade.user_id),
                score: Set(grade.score),
                letter_grade: Set(grade.letter_grade),
                remarks: Set(grade.remarks),
                is_override: Set(grade.is_override),
                updated_by: Set(grade.updated_by),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::from_db("创建成绩失败", e))?,
        };

        Ok(result.into_grade())
    }

    pub async fn get_grade_impl(&self, course_id: i64, user_id: i64) -> Result<Option<Grade>> {
        let result = Grades::find()
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询成绩失败: {e}")))?;

        Ok(result.map(|m| m.into_grade()))
    }

    pub async fn list_course_grades_impl(&self, course_id: i64) -> Result<Vec<Grade>> {
        let grades = Grades::find()
            .filter(Column::CourseId.eq(course_id))
            .order_by_asc(Column::UserId)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询成绩列表失败: {e}")))?;

        Ok(grades.into_iter().map(|m| m.into_grade()).collect())
    }

    pub async fn list_user_grades_impl(&self, user_id: i64) -> Result<Vec<Grade>> {
        let grades = Grades::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_asc(Column::CourseId)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询成绩列表失败: {e}")))?;

        Ok(grades.into_iter().map(|m| m.into_grade()).collect())
    }

    pub async fn delete_grade_impl(&self, course_id: i64, user_id: i64) -> Result<bool> {
        let result = Grades::delete_many()
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除成绩失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 课程内所有已评分提交，附带所属考核项的权重
    pub async fn list_graded_scores_impl(&self, course_id: i64) -> Result<Vec<GradedScore>> {
        let weights: HashMap<i64, f64> = Assessments::find()
            .filter(AssessmentColumn::CourseId.eq(course_id))
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询考核项失败: {e}")))?
            .into_iter()
            .map(|a| (a.id, a.weight))
            .collect();

        if weights.is_empty() {
            return Ok(Vec::new());
        }

        let submissions = Submissions::find()
            .filter(SubmissionColumn::AssessmentId.is_in(weights.keys().copied()))
            .filter(SubmissionColumn::Score.is_not_null())
            .order_by_asc(SubmissionColumn::UserId)
            .order_by_asc(SubmissionColumn::AssessmentId)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询已评分提交失败: {e}")))?;

        Ok(submissions
            .into_iter()
            .filter_map(|s| {
                Some(GradedScore {
                    user_id: s.user_id,
                    assessment_id: s.assessment_id,
                    weight: *weights.get(&s.assessment_id)?,
                    score: s.score?,
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assessments::entities::PublishStatus;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::assessments::tests::assessment_request;
    use crate::storage::sea_orm_storage::courses::tests::seed_course;
    use crate::storage::sea_orm_storage::users::tests::seed_user;

    fn upsert(course_id: i64, user_id: i64, score: f64, is_override: bool) -> GradeUpsert {
        GradeUpsert {
            course_id,
            user_id,
            score,
            letter_grade: crate::models::grades::entities::letter_grade(score).to_string(),
            remarks: None,
            is_override,
            updated_by: None,
        }
    }

    #[tokio::test]
    async fn test_upsert_overwrites_single_row() {
        let storage = SeaOrmStorage::in_memory().await;
        let course = seed_course(&storage, "GR101").await;
        let student = seed_user(&storage, "graded", UserRole::Student).await;

        storage
            .upsert_grade_impl(upsert(course.id, student.id, 70.0, false))
            .await
            .unwrap();
        let updated = storage
            .upsert_grade_impl(upsert(course.id, student.id, 92.0, true))
            .await
            .unwrap();

        assert!(updated.is_override);
        let grades = storage.list_course_grades_impl(course.id).await.unwrap();
        assert_eq!(grades.len(), 1);
        assert_eq!(grades[0].score, 92.0);
        assert_eq!(grades[0].letter_grade, updated.letter_grade);
    }

    #[tokio::test]
    async fn test_graded_scores_skip_ungraded_submissions() {
        let storage = SeaOrmStorage::in_memory().await;
        let course = seed_course(&storage, "GR102").await;
        let student = seed_user(&storage, "scored", UserRole::Student).await;
        let assessment = storage
            .create_assessment_impl(course.id, 1, assessment_request(40.0, PublishStatus::Published))
            .await
            .unwrap();

        let graded = storage
            .create_submission_impl(assessment.id, student.id, 1, "a".into(), false)
            .await
            .unwrap();
        storage
            .create_submission_impl(assessment.id, student.id, 2, "b".into(), false)
            .await
            .unwrap();
        storage
            .grade_submission_impl(graded.id, 88.0, None, 1)
            .await
            .unwrap();

        let scores = storage.list_graded_scores_impl(course.id).await.unwrap();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].weight, 40.0);
        assert_eq!(scores[0].score, 88.0);
    }
}
