//! 课次与考勤存储操作

use super::SeaOrmStorage;
use crate::entity::attendances::{
    ActiveModel as AttendanceActiveModel, Column as AttendanceColumn, Entity as Attendances,
};
use crate::entity::course_sessions::{ActiveModel, Column, Entity as CourseSessions};
use crate::errors::{LmsError, Result};
use crate::models::sessions::{
    entities::{Attendance, CourseSession},
    requests::{AttendanceUpsert, CreateSessionRequest, UpdateSessionRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};

impl SeaOrmStorage {
    pub async fn create_session_impl(
        &self,
        course_id: i64,
        req: CreateSessionRequest,
    ) -> Result<CourseSession> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            course_id: Set(course_id),
            number: Set(req.number),
            title: Set(req.title.trim().to_string()),
            description: Set(req.description),
            starts_at: Set(req.starts_at.timestamp()),
            ends_at: Set(req.ends_at.timestamp()),
            delivery_mode: Set(req.delivery_mode.to_string()),
            location: Set(req.location),
            meeting_link: Set(req.meeting_link),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::from_db("创建课次失败", e))?;

        Ok(result.into_session())
    }

    pub async fn get_session_impl(
        &self,
        course_id: i64,
        session_id: i64,
    ) -> Result<Option<CourseSession>> {
        let result = CourseSessions::find_by_id(session_id)
            .filter(Column::CourseId.eq(course_id))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课次失败: {e}")))?;

        Ok(result.map(|m| m.into_session()))
    }

    pub async fn list_sessions_impl(&self, course_id: i64) -> Result<Vec<CourseSession>> {
        let sessions = CourseSessions::find()
            .filter(Column::CourseId.eq(course_id))
            .order_by_asc(Column::Number)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课次列表失败: {e}")))?;

        Ok(sessions.into_iter().map(|m| m.into_session()).collect())
    }

    /// 更新课次；调用方负责校验合并后的时间区间
    pub async fn update_session_impl(
        &self,
        course_id: i64,
        session_id: i64,
        update: UpdateSessionRequest,
    ) -> Result<Option<CourseSession>> {
        let Some(existing) = CourseSessions::find_by_id(session_id)
            .filter(Column::CourseId.eq(course_id))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课次失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model = existing.into_active_model();
        model.updated_at = Set(chrono::Utc::now().timestamp());

        if let Some(number) = update.number {
            model.number = Set(number);
        }
        if let Some(title) = update.title {
            model.title = Set(title.trim().to_string());
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(starts_at) = update.starts_at {
            model.starts_at = Set(starts_at.timestamp());
        }
        if let Some(ends_at) = update.ends_at {
            model.ends_at = Set(ends_at.timestamp());
        }
        if let Some(mode) = update.delivery_mode {
            model.delivery_mode = Set(mode.to_string());
        }
        if let Some(location) = update.location {
            model.location = Set(Some(location));
        }
        if let Some(link) = update.meeting_link {
            model.meeting_link = Set(Some(link));
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::from_db("更新课次失败", e))?;

        Ok(Some(result.into_session()))
    }

    pub async fn delete_session_impl(&self, course_id: i64, session_id: i64) -> Result<bool> {
        let result = CourseSessions::delete_many()
            .filter(Column::Id.eq(session_id))
            .filter(Column::CourseId.eq(course_id))
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除课次失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 写入考勤，已存在时覆盖状态与备注
    pub async fn upsert_attendance_impl(&self, record: AttendanceUpsert) -> Result<Attendance> {
        let now = chrono::Utc::now().timestamp();

        let existing = Attendances::find()
            .filter(AttendanceColumn::SessionId.eq(record.session_id))
            .filter(AttendanceColumn::UserId.eq(record.user_id))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询考勤失败: {e}")))?;

        let result = match existing {
            Some(existing) => {
                let mut model = existing.into_active_model();
                model.status = Set(record.status.to_string());
                model.comment = Set(record.comment);
                if let Some(checked_in_at) = record.checked_in_at {
                    model.checked_in_at = Set(Some(checked_in_at.timestamp()));
                }
                model.marked_by = Set(record.marked_by);
                model.updated_at = Set(now);
                model
                    .update(&self.db)
                    .await
                    .map_err(|e| LmsError::database_operation(format!("更新考勤失败: {e}")))?
            }
            None => AttendanceActiveModel {
                session_id: Set(record.session_id),
                user_id: Set(record.user_id),
                status: Set(record.status.to_string()),
                comment: Set(record.comment),
                checked_in_at: Set(record.checked_in_at.map(|t| t.timestamp())),
                marked_by: Set(record.marked_by),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::from_db("记录考勤失败", e))?,
        };

        Ok(result.into_attendance())
    }

    pub async fn get_attendance_impl(
        &self,
        session_id: i64,
        user_id: i64,
    ) -> Result<Option<Attendance>> {
        let result = Attendances::find()
            .filter(AttendanceColumn::SessionId.eq(session_id))
            .filter(AttendanceColumn::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询考勤失败: {e}")))?;

        Ok(result.map(|m| m.into_attendance()))
    }

    pub async fn list_session_attendance_impl(&self, session_id: i64) -> Result<Vec<Attendance>> {
        let records = Attendances::find()
            .filter(AttendanceColumn::SessionId.eq(session_id))
            .order_by_asc(AttendanceColumn::UserId)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询考勤列表失败: {e}")))?;

        Ok(records.into_iter().map(|m| m.into_attendance()).collect())
    }

    /// 用户在某课程所有课次的考勤
    pub async fn list_user_course_attendance_impl(
        &self,
        course_id: i64,
        user_id: i64,
    ) -> Result<Vec<Attendance>> {
        let records = Attendances::find()
            .join(
                JoinType::InnerJoin,
                crate::entity::attendances::Relation::Session.def(),
            )
            .filter(Column::CourseId.eq(course_id))
            .filter(AttendanceColumn::UserId.eq(user_id))
            .order_by_asc(Column::Number)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询用户考勤失败: {e}")))?;

        Ok(records.into_iter().map(|m| m.into_attendance()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sessions::entities::{AttendanceStatus, DeliveryMode};
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::courses::tests::seed_course;
    use crate::storage::sea_orm_storage::users::tests::seed_user;
    use chrono::{Duration, Utc};

    fn session_request(number: i32) -> CreateSessionRequest {
        let starts_at = Utc::now();
        CreateSessionRequest {
            number,
            title: format!("Week {number}"),
            description: None,
            starts_at,
            ends_at: starts_at + Duration::hours(2),
            delivery_mode: DeliveryMode::Online,
            location: None,
            meeting_link: Some("https://meet.example.com/abc".into()),
        }
    }

    #[tokio::test]
    async fn test_session_number_unique_per_course() {
        let storage = SeaOrmStorage::in_memory().await;
        let course = seed_course(&storage, "PH101").await;
        storage.create_session_impl(course.id, session_request(1)).await.unwrap();
        let err = storage
            .create_session_impl(course.id, session_request(1))
            .await
            .unwrap_err();
        assert!(err.is_conflict());

        let other = seed_course(&storage, "PH102").await;
        assert!(storage.create_session_impl(other.id, session_request(1)).await.is_ok());
        assert!(storage.get_session_impl(other.id, 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_attendance_upsert_overwrites() {
        let storage = SeaOrmStorage::in_memory().await;
        let course = seed_course(&storage, "PH201").await;
        let student = seed_user(&storage, "attendee", UserRole::Student).await;
        let session = storage.create_session_impl(course.id, session_request(1)).await.unwrap();

        let first = storage
            .upsert_attendance_impl(AttendanceUpsert {
                session_id: session.id,
                user_id: student.id,
                status: AttendanceStatus::Present,
                comment: None,
                checked_in_at: Some(Utc::now()),
                marked_by: None,
            })
            .await
            .unwrap();
        let second = storage
            .upsert_attendance_impl(AttendanceUpsert {
                session_id: session.id,
                user_id: student.id,
                status: AttendanceStatus::Excused,
                comment: Some("doctor's note".into()),
                checked_in_at: None,
                marked_by: Some(1),
            })
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.status, AttendanceStatus::Excused);
        assert!(second.checked_in_at.is_some());

        let mine = storage
            .list_user_course_attendance_impl(course.id, student.id)
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(
            storage.list_session_attendance_impl(session.id).await.unwrap().len(),
            1
        );
    }
}
