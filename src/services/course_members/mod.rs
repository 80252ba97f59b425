pub mod add;
pub mod list;
pub mod remove;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::CourseAccess;
use crate::models::course_members::requests::{
    AddMemberRequest, MemberListParams, UpdateMemberRequest,
};
use crate::services::define_service;

define_service!(CourseMemberService);

impl CourseMemberService {
    pub async fn list_members(
        &self,
        course_id: i64,
        query: MemberListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_members(self, course_id, query, request).await
    }

    // 添加成员：管理员可添加任意角色，课程讲师只能添加学生
    pub async fn add_member(
        &self,
        course_id: i64,
        access: &CourseAccess,
        member_data: AddMemberRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        add::add_member(self, course_id, access, member_data, request).await
    }

    pub async fn update_member(
        &self,
        course_id: i64,
        user_id: i64,
        update_data: UpdateMemberRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_member(self, course_id, user_id, update_data, request).await
    }

    pub async fn remove_member(
        &self,
        course_id: i64,
        user_id: i64,
        access: &CourseAccess,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        remove::remove_member(self, course_id, user_id, access, request).await
    }
}
