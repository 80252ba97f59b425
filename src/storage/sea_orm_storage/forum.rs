//! 课程论坛存储操作

use super::SeaOrmStorage;
use crate::entity::forum_messages::{
    ActiveModel as MessageActiveModel, Column as MessageColumn, Entity as ForumMessages,
};
use crate::entity::forum_threads::{ActiveModel, Column, Entity as ForumThreads};
use crate::errors::{LmsError, Result};
use crate::models::{
    PaginationInfo, PaginationQuery,
    forum::{
        entities::{ForumMessage, ForumThread, ThreadKind, ThreadStatus},
        requests::{CreateMessageRequest, CreateThreadRequest, ThreadListQuery, UpdateThreadRequest},
        responses::ThreadListResponse,
    },
};
use crate::utils::like_contains;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_thread_impl(
        &self,
        course_id: i64,
        user_id: i64,
        req: CreateThreadRequest,
    ) -> Result<ForumThread> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            course_id: Set(course_id),
            user_id: Set(user_id),
            title: Set(req.title.trim().to_string()),
            content: Set(req.content),
            kind: Set(req.kind.unwrap_or(ThreadKind::Discussion).to_string()),
            status: Set(ThreadStatus::Open.to_string()),
            pinned: Set(false),
            views: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("创建主题失败: {e}")))?;

        Ok(result.into_thread())
    }

    pub async fn get_thread_impl(
        &self,
        course_id: i64,
        thread_id: i64,
    ) -> Result<Option<ForumThread>> {
        let result = ForumThreads::find_by_id(thread_id)
            .filter(Column::CourseId.eq(course_id))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询主题失败: {e}")))?;

        Ok(result.map(|m| m.into_thread()))
    }

    /// 分页列出主题，置顶优先，其余按最近活动排序
    pub async fn list_threads_with_pagination_impl(
        &self,
        course_id: i64,
        query: ThreadListQuery,
    ) -> Result<ThreadListResponse> {
        let (page, size) = PaginationQuery::normalize(query.page, query.size);

        let mut select = ForumThreads::find().filter(Column::CourseId.eq(course_id));

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let search = search.trim();
            select = select.filter(
                Condition::any()
                    .add(Column::Title.like(like_contains(search)))
                    .add(Column::Content.like(like_contains(search))),
            );
        }

        let paginator = select
            .order_by_desc(Column::Pinned)
            .order_by_desc(Column::UpdatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| LmsError::database_operation(format!("查询主题总数失败: {e}")))?;

        let threads = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询主题列表失败: {e}")))?;

        Ok(ThreadListResponse {
            items: threads.into_iter().map(|m| m.into_thread()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    pub async fn update_thread_impl(
        &self,
        course_id: i64,
        thread_id: i64,
        update: UpdateThreadRequest,
    ) -> Result<Option<ForumThread>> {
        let Some(existing) = ForumThreads::find_by_id(thread_id)
            .filter(Column::CourseId.eq(course_id))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询主题失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model = existing.into_active_model();
        model.updated_at = Set(chrono::Utc::now().timestamp());

        if let Some(title) = update.title {
            model.title = Set(title.trim().to_string());
        }
        if let Some(content) = update.content {
            model.content = Set(content);
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }
        if let Some(pinned) = update.pinned {
            model.pinned = Set(pinned);
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新主题失败: {e}")))?;

        Ok(Some(result.into_thread()))
    }

    pub async fn delete_thread_impl(&self, course_id: i64, thread_id: i64) -> Result<bool> {
        let result = ForumThreads::delete_many()
            .filter(Column::Id.eq(thread_id))
            .filter(Column::CourseId.eq(course_id))
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除主题失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 浏览数加一，不影响 updated_at
    pub async fn increment_thread_views_impl(&self, thread_id: i64) -> Result<Option<ForumThread>> {
        let Some(existing) = ForumThreads::find_by_id(thread_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询主题失败: {e}")))?
        else {
            return Ok(None);
        };

        let views = existing.views;
        let mut model = existing.into_active_model();
        model.views = Set(views + 1);

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新浏览数失败: {e}")))?;

        Ok(Some(result.into_thread()))
    }

    /// 发表回复，同时刷新主题的活动时间
    pub async fn create_message_impl(
        &self,
        thread_id: i64,
        user_id: i64,
        req: CreateMessageRequest,
    ) -> Result<ForumMessage> {
        let now = chrono::Utc::now().timestamp();

        let model = MessageActiveModel {
            thread_id: Set(thread_id),
            user_id: Set(user_id),
            parent_id: Set(req.parent_id),
            content: Set(req.content),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("创建回复失败: {e}")))?;

        ForumThreads::update_many()
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(thread_id))
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新主题活动时间失败: {e}")))?;

        Ok(result.into_message())
    }

    pub async fn get_message_impl(
        &self,
        thread_id: i64,
        message_id: i64,
    ) -> Result<Option<ForumMessage>> {
        let result = ForumMessages::find_by_id(message_id)
            .filter(MessageColumn::ThreadId.eq(thread_id))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询回复失败: {e}")))?;

        Ok(result.map(|m| m.into_message()))
    }

    pub async fn list_messages_impl(&self, thread_id: i64) -> Result<Vec<ForumMessage>> {
        let messages = ForumMessages::find()
            .filter(MessageColumn::ThreadId.eq(thread_id))
            .order_by_asc(MessageColumn::CreatedAt)
            .order_by_asc(MessageColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询回复列表失败: {e}")))?;

        Ok(messages.into_iter().map(|m| m.into_message()).collect())
    }

    pub async fn update_message_impl(
        &self,
        thread_id: i64,
        message_id: i64,
        content: String,
    ) -> Result<Option<ForumMessage>> {
        let Some(existing) = ForumMessages::find_by_id(message_id)
            .filter(MessageColumn::ThreadId.eq(thread_id))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询回复失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model = existing.into_active_model();
        model.content = Set(content);
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新回复失败: {e}")))?;

        Ok(Some(result.into_message()))
    }

    pub async fn delete_message_impl(&self, thread_id: i64, message_id: i64) -> Result<bool> {
        let result = ForumMessages::delete_many()
            .filter(MessageColumn::Id.eq(message_id))
            .filter(MessageColumn::ThreadId.eq(thread_id))
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除回复失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::courses::tests::seed_course;
    use crate::storage::sea_orm_storage::users::tests::seed_user;

    fn thread(title: &str) -> CreateThreadRequest {
        CreateThreadRequest {
            title: title.into(),
            content: "body".into(),
            kind: None,
        }
    }

    #[tokio::test]
    async fn test_pinned_threads_listed_first() {
        let storage = SeaOrmStorage::in_memory().await;
        let course = seed_course(&storage, "FO101").await;
        let user = seed_user(&storage, "poster", UserRole::Student).await;

        let first = storage
            .create_thread_impl(course.id, user.id, thread("first"))
            .await
            .unwrap();
        storage
            .create_thread_impl(course.id, user.id, thread("second"))
            .await
            .unwrap();
        storage
            .update_thread_impl(
                course.id,
                first.id,
                UpdateThreadRequest {
                    pinned: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let list = storage
            .list_threads_with_pagination_impl(course.id, ThreadListQuery::default())
            .await
            .unwrap();
        assert_eq!(list.pagination.total, 2);
        assert_eq!(list.items[0].id, first.id);
        assert_eq!(list.items[0].kind, ThreadKind::Discussion);
    }

    #[tokio::test]
    async fn test_views_and_messages() {
        let storage = SeaOrmStorage::in_memory().await;
        let course = seed_course(&storage, "FO102").await;
        let user = seed_user(&storage, "replier", UserRole::Student).await;
        let created = storage
            .create_thread_impl(course.id, user.id, thread("hello"))
            .await
            .unwrap();

        let viewed = storage
            .increment_thread_views_impl(created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(viewed.views, 1);

        let root = storage
            .create_message_impl(
                created.id,
                user.id,
                CreateMessageRequest {
                    content: "root".into(),
                    parent_id: None,
                },
            )
            .await
            .unwrap();
        storage
            .create_message_impl(
                created.id,
                user.id,
                CreateMessageRequest {
                    content: "reply".into(),
                    parent_id: Some(root.id),
                },
            )
            .await
            .unwrap();

        let messages = storage.list_messages_impl(created.id).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].parent_id, Some(root.id));

        assert!(storage.delete_thread_impl(course.id, created.id).await.unwrap());
        assert!(storage.list_messages_impl(created.id).await.unwrap().is_empty());
    }
}
