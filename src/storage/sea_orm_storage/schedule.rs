//! 日程事件存储操作

use super::SeaOrmStorage;
use crate::entity::schedule_events::{ActiveModel, Column, Entity as ScheduleEvents};
use crate::errors::{LmsError, Result};
use crate::models::schedule::{
    entities::ScheduleEvent,
    requests::{CreateEventRequest, UpdateEventRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_event_impl(
        &self,
        owner_id: i64,
        req: CreateEventRequest,
    ) -> Result<ScheduleEvent> {
        let now = chrono::Utc::now().timestamp();
        let kind = req.resolved_kind();

        let model = ActiveModel {
            course_id: Set(req.course_id),
            owner_id: Set(owner_id),
            kind: Set(kind.to_string()),
            title: Set(req.title.trim().to_string()),
            description: Set(req.description),
            location: Set(req.location),
            starts_at: Set(req.starts_at.timestamp()),
            ends_at: Set(req.ends_at.timestamp()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("创建日程失败: {e}")))?;

        Ok(result.into_event())
    }

    pub async fn get_event_impl(&self, event_id: i64) -> Result<Option<ScheduleEvent>> {
        let result = ScheduleEvents::find_by_id(event_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询日程失败: {e}")))?;

        Ok(result.map(|m| m.into_event()))
    }

    pub async fn update_event_impl(
        &self,
        event_id: i64,
        update: UpdateEventRequest,
    ) -> Result<Option<ScheduleEvent>> {
        let Some(existing) = ScheduleEvents::find_by_id(event_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询日程失败: {e}")))?
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
        if let Some(location) = update.location {
            model.location = Set(Some(location));
        }
        if let Some(starts_at) = update.starts_at {
            model.starts_at = Set(starts_at.timestamp());
        }
        if let Some(ends_at) = update.ends_at {
            model.ends_at = Set(ends_at.timestamp());
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新日程失败: {e}")))?;

        Ok(Some(result.into_event()))
    }

    pub async fn delete_event_impl(&self, event_id: i64) -> Result<bool> {
        let result = ScheduleEvents::delete_by_id(event_id)
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除日程失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 查询与 [from, to] 有交集的事件
    ///
    /// `course_ids` 为 None 时包含所有课程事件，否则只包含指定课程；
    /// 调用者自己的个人事件始终包含在内。
    pub async fn list_events_in_range_impl(
        &self,
        from: chrono::DateTime<chrono::Utc>,
        to: chrono::DateTime<chrono::Utc>,
        course_ids: Option<Vec<i64>>,
        owner_id: i64,
    ) -> Result<Vec<ScheduleEvent>> {
        let course_events = match course_ids {
            Some(ids) => Condition::all().add(Column::CourseId.is_in(ids)),
            None => Condition::all().add(Column::CourseId.is_not_null()),
        };
        let personal_events = Condition::all()
            .add(Column::CourseId.is_null())
            .add(Column::OwnerId.eq(owner_id));

        let events = ScheduleEvents::find()
            .filter(Column::StartsAt.lte(to.timestamp()))
            .filter(Column::EndsAt.gte(from.timestamp()))
            .filter(Condition::any().add(course_events).add(personal_events))
            .order_by_asc(Column::StartsAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询日程列表失败: {e}")))?;

        Ok(events.into_iter().map(|m| m.into_event()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schedule::entities::EventKind;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::courses::tests::seed_course;
    use crate::storage::sea_orm_storage::users::tests::seed_user;
    use chrono::{Duration, TimeZone, Utc};

    fn event(course_id: Option<i64>, title: &str, day: u32) -> CreateEventRequest {
        let starts_at = Utc.with_ymd_and_hms(2025, 3, day, 9, 0, 0).unwrap();
        CreateEventRequest {
            course_id,
            kind: None,
            title: title.into(),
            description: None,
            location: None,
            starts_at,
            ends_at: starts_at + Duration::hours(2),
        }
    }

    #[tokio::test]
    async fn test_range_includes_course_and_own_personal_events() {
        let storage = SeaOrmStorage::in_memory().await;
        let course = seed_course(&storage, "SC101").await;
        let other_course = seed_course(&storage, "SC102").await;
        let me = seed_user(&storage, "planner", UserRole::Student).await;
        let someone = seed_user(&storage, "stranger", UserRole::Student).await;

        let lecture = storage
            .create_event_impl(1, event(Some(course.id), "lecture", 10))
            .await
            .unwrap();
        assert_eq!(lecture.kind, EventKind::Event);
        storage
            .create_event_impl(1, event(Some(other_course.id), "elsewhere", 10))
            .await
            .unwrap();
        let mine = storage
            .create_event_impl(me.id, event(None, "dentist", 11))
            .await
            .unwrap();
        assert_eq!(mine.kind, EventKind::Personal);
        storage
            .create_event_impl(someone.id, event(None, "private", 11))
            .await
            .unwrap();
        storage
            .create_event_impl(me.id, event(None, "too late", 28))
            .await
            .unwrap();

        let from = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2025, 3, 15, 0, 0, 0).unwrap();
        let events = storage
            .list_events_in_range_impl(from, to, Some(vec![course.id]), me.id)
            .await
            .unwrap();
        let titles: Vec<_> = events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["lecture", "dentist"]);

        let all = storage
            .list_events_in_range_impl(from, to, None, me.id)
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_range_matches_overlapping_events() {
        let storage = SeaOrmStorage::in_memory().await;
        let me = seed_user(&storage, "overlap", UserRole::Student).await;
        let created = storage
            .create_event_impl(me.id, event(None, "spanning", 10))
            .await
            .unwrap();

        let from = created.starts_at + Duration::minutes(30);
        let to = from + Duration::minutes(10);
        let events = storage
            .list_events_in_range_impl(from, to, Some(vec![]), me.id)
            .await
            .unwrap();
        assert_eq!(events.len(), 1);
    }
}
