//! 课程存储操作

use super::SeaOrmStorage;
use crate::entity::course_members::Column as MemberColumn;
use crate::entity::courses::{ActiveModel, Column, Entity as Courses};
use crate::errors::{LmsError, Result};
use crate::models::{
    PaginationInfo, PaginationQuery,
    courses::{
        entities::Course,
        requests::{CourseListQuery, CreateCourseRequest, UpdateCourseRequest},
        responses::CourseListResponse,
    },
};
use crate::utils::like_contains;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, IntoActiveModel, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};

impl SeaOrmStorage {
    /// 创建课程
    pub async fn create_course_impl(&self, req: CreateCourseRequest) -> Result<Course> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            code: Set(req.code.trim().to_string()),
            title: Set(req.title.trim().to_string()),
            category: Set(req.category),
            description: Set(req.description),
            semester: Set(req.semester.trim().to_string()),
            year: Set(req.year),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::from_db("创建课程失败", e))?;

        Ok(result.into_course())
    }

    pub async fn get_course_by_id_impl(&self, course_id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(course_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    pub async fn get_course_by_code_impl(&self, code: &str) -> Result<Option<Course>> {
        let result = Courses::find()
            .filter(Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    /// 分页列出课程目录
    pub async fn list_courses_with_pagination_impl(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        let (page, size) = PaginationQuery::normalize(query.page, query.size);

        let mut select = Courses::find();

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let search = search.trim();
            select = select.filter(
                Condition::any()
                    .add(Column::Code.like(like_contains(search)))
                    .add(Column::Title.like(like_contains(search)))
                    .add(Column::Category.like(like_contains(search))),
            );
        }

        if let Some(ref semester) = query.semester
            && !semester.trim().is_empty()
        {
            select = select.filter(Column::Semester.eq(semester.trim()));
        }

        if let Some(year) = query.year {
            select = select.filter(Column::Year.eq(year));
        }

        select = select
            .order_by_desc(Column::Year)
            .order_by_asc(Column::Code);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课程总数失败: {e}")))?;

        let courses = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课程列表失败: {e}")))?;

        Ok(CourseListResponse {
            items: courses.into_iter().map(|m| m.into_course()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 列出用户作为成员加入的课程
    pub async fn list_member_courses_impl(&self, user_id: i64) -> Result<Vec<Course>> {
        let courses = Courses::find()
            .join(
                JoinType::InnerJoin,
                crate::entity::courses::Relation::CourseMembers.def(),
            )
            .filter(MemberColumn::UserId.eq(user_id))
            .order_by_desc(Column::Year)
            .order_by_asc(Column::Code)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询用户课程失败: {e}")))?;

        Ok(courses.into_iter().map(|m| m.into_course()).collect())
    }

    pub async fn update_course_impl(
        &self,
        course_id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        let Some(existing) = Courses::find_by_id(course_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课程失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model = existing.into_active_model();
        model.updated_at = Set(chrono::Utc::now().timestamp());

        if let Some(code) = update.code {
            model.code = Set(code.trim().to_string());
        }
        if let Some(title) = update.title {
            model.title = Set(title.trim().to_string());
        }
        if let Some(category) = update.category {
            model.category = Set(Some(category));
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(semester) = update.semester {
            model.semester = Set(semester.trim().to_string());
        }
        if let Some(year) = update.year {
            model.year = Set(year);
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::from_db("更新课程失败", e))?;

        Ok(Some(result.into_course()))
    }

    /// 删除课程，成员、课次等数据随外键级联删除
    pub async fn delete_course_impl(&self, course_id: i64) -> Result<bool> {
        let result = Courses::delete_by_id(course_id)
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除课程失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) async fn seed_course(storage: &SeaOrmStorage, code: &str) -> Course {
        storage
            .create_course_impl(CreateCourseRequest {
                code: code.to_string(),
                title: format!("Course {code}"),
                category: Some("Computer Science".into()),
                description: None,
                semester: "fall".into(),
                year: 2025,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_course_code_is_unique() {
        let storage = SeaOrmStorage::in_memory().await;
        seed_course(&storage, "CS101").await;
        let err = storage
            .create_course_impl(CreateCourseRequest {
                code: "CS101".into(),
                title: "Duplicate".into(),
                category: None,
                description: None,
                semester: "spring".into(),
                year: 2026,
            })
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_catalog_filters() {
        let storage = SeaOrmStorage::in_memory().await;
        seed_course(&storage, "CS101").await;
        seed_course(&storage, "MA201").await;
        storage
            .create_course_impl(CreateCourseRequest {
                code: "CS102".into(),
                title: "Data Structures".into(),
                category: None,
                description: None,
                semester: "spring".into(),
                year: 2026,
            })
            .await
            .unwrap();

        let by_search = storage
            .list_courses_with_pagination_impl(CourseListQuery {
                search: Some("cs".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_search.pagination.total, 2);

        let by_year = storage
            .list_courses_with_pagination_impl(CourseListQuery {
                semester: Some("fall".into()),
                year: Some(2025),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_year.pagination.total, 2);
        assert_eq!(by_year.items[0].code, "CS101");
    }
}
