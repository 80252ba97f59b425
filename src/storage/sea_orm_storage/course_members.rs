//! 课程成员存储操作

use super::SeaOrmStorage;
use crate::entity::course_members::{ActiveModel, Column, Entity as CourseMembers};
use crate::entity::users::Entity as Users;
use crate::errors::{LmsError, Result};
use crate::models::{
    PaginationInfo, PaginationQuery,
    course_members::{
        entities::{CourseMember, CourseMemberDetail, CourseRole},
        requests::{AddMemberRequest, MemberListQuery, UpdateMemberRequest},
        responses::CourseMemberListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 添加成员；同一课程重复添加同一用户返回 Conflict
    pub async fn add_course_member_impl(
        &self,
        course_id: i64,
        req: AddMemberRequest,
    ) -> Result<CourseMember> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            course_id: Set(course_id),
            user_id: Set(req.user_id),
            role: Set(req.role.to_string()),
            is_main: Set(req.is_main),
            joined_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::from_db("添加课程成员失败", e))?;

        Ok(result.into_course_member())
    }

    pub async fn get_course_member_impl(
        &self,
        course_id: i64,
        user_id: i64,
    ) -> Result<Option<CourseMember>> {
        let result = CourseMembers::find()
            .filter(
                Condition::all()
                    .add(Column::CourseId.eq(course_id))
                    .add(Column::UserId.eq(user_id)),
            )
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课程成员失败: {e}")))?;

        Ok(result.map(|m| m.into_course_member()))
    }

    /// 分页列出课程成员（附带用户信息），教师在前
    pub async fn list_course_members_with_pagination_impl(
        &self,
        course_id: i64,
        query: MemberListQuery,
    ) -> Result<CourseMemberListResponse> {
        let (page, size) = PaginationQuery::normalize(query.page, query.size);

        let mut select = CourseMembers::find().filter(Column::CourseId.eq(course_id));
        if let Some(role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        let paginator = select
            .order_by_asc(Column::Role)
            .order_by_desc(Column::IsMain)
            .order_by_asc(Column::JoinedAt)
            .find_also_related(Users)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课程成员总数失败: {e}")))?;

        let rows = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课程成员列表失败: {e}")))?;

        let items = rows
            .into_iter()
            .filter_map(|(member, user)| {
                let user = user?;
                Some(CourseMemberDetail {
                    member: member.into_course_member(),
                    username: user.username,
                    email: user.email,
                    full_name: user.full_name,
                })
            })
            .collect();

        Ok(CourseMemberListResponse {
            items,
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    pub async fn list_course_member_ids_impl(
        &self,
        course_id: i64,
        role: CourseRole,
    ) -> Result<Vec<i64>> {
        CourseMembers::find()
            .select_only()
            .column(Column::UserId)
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::Role.eq(role.to_string()))
            .order_by_asc(Column::UserId)
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课程成员失败: {e}")))
    }

    pub async fn list_user_course_ids_impl(&self, user_id: i64) -> Result<Vec<i64>> {
        CourseMembers::find()
            .select_only()
            .column(Column::CourseId)
            .filter(Column::UserId.eq(user_id))
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询用户课程失败: {e}")))
    }

    pub async fn update_course_member_impl(
        &self,
        course_id: i64,
        user_id: i64,
        update: UpdateMemberRequest,
    ) -> Result<Option<CourseMember>> {
        let Some(existing) = CourseMembers::find()
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课程成员失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model = existing.into_active_model();
        model.updated_at = Set(chrono::Utc::now().timestamp());
        if let Some(role) = update.role {
            model.role = Set(role.to_string());
        }
        if let Some(is_main) = update.is_main {
            model.is_main = Set(is_main);
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新课程成员失败: {e}")))?;

        Ok(Some(result.into_course_member()))
    }

    pub async fn remove_course_member_impl(&self, course_id: i64, user_id: i64) -> Result<bool> {
        let result = CourseMembers::delete_many()
            .filter(
                Condition::all()
                    .add(Column::CourseId.eq(course_id))
                    .add(Column::UserId.eq(user_id)),
            )
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("移除课程成员失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::courses::tests::seed_course;
    use crate::storage::sea_orm_storage::users::tests::seed_user;

    pub(crate) async fn enroll(
        storage: &SeaOrmStorage,
        course_id: i64,
        user_id: i64,
        role: CourseRole,
    ) -> CourseMember {
        storage
            .add_course_member_impl(
                course_id,
                AddMemberRequest {
                    user_id,
                    role,
                    is_main: false,
                },
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_membership_conflicts() {
        let storage = SeaOrmStorage::in_memory().await;
        let course = seed_course(&storage, "CS201").await;
        let user = seed_user(&storage, "member1", UserRole::Student).await;
        enroll(&storage, course.id, user.id, CourseRole::Student).await;

        let err = storage
            .add_course_member_impl(
                course.id,
                AddMemberRequest {
                    user_id: user.id,
                    role: CourseRole::Student,
                    is_main: false,
                },
            )
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_member_listing_and_course_ids() {
        let storage = SeaOrmStorage::in_memory().await;
        let course = seed_course(&storage, "CS202").await;
        let lecturer = seed_user(&storage, "lecturer1", UserRole::Instructor).await;
        let student = seed_user(&storage, "student1", UserRole::Student).await;
        enroll(&storage, course.id, lecturer.id, CourseRole::Instructor).await;
        enroll(&storage, course.id, student.id, CourseRole::Student).await;

        let listed = storage
            .list_course_members_with_pagination_impl(course.id, MemberListQuery::default())
            .await
            .unwrap();
        assert_eq!(listed.pagination.total, 2);
        assert_eq!(listed.items[0].username, "lecturer1");

        let students = storage
            .list_course_member_ids_impl(course.id, CourseRole::Student)
            .await
            .unwrap();
        assert_eq!(students, vec![student.id]);

        assert_eq!(
            storage.list_user_course_ids_impl(lecturer.id).await.unwrap(),
            vec![course.id]
        );
        assert_eq!(
            storage.list_member_courses_impl(student.id).await.unwrap()[0].code,
            "CS202"
        );

        assert!(storage.remove_course_member_impl(course.id, student.id).await.unwrap());
        assert!(storage.get_course_member_impl(course.id, student.id).await.unwrap().is_none());
    }
}
