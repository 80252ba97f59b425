/*!
 * 课程角色访问控制中间件，必须放在 RequireJWT 之后
 *
 * 从路径参数 `course_id` 读取课程，管理员直接放行；
 * 其他用户必须是课程成员且角色满足要求，成员信息会写入请求扩展。
 *
 * ```rust,ignore
 * web::resource("/{course_id}/sessions")
 *     .route(web::get().to(list_sessions).wrap(RequireCourseRole::new_any(CourseRole::all_roles())))
 *     .route(web::post().to(create_session).wrap(RequireCourseRole::new(&CourseRole::Instructor)))
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest,
    body::EitherBody,
    dev::{Payload, ServiceRequest, ServiceResponse},
    error::InternalError,
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, error};

use crate::{
    models::{
        ErrorCode,
        course_members::entities::{CourseMember, CourseRole},
        users::entities::User,
    },
    storage::Storage,
};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireCourseRole {
    required_roles: Vec<CourseRole>,
}

impl RequireCourseRole {
    pub fn new(role: &CourseRole) -> Self {
        Self {
            required_roles: vec![*role],
        }
    }

    pub fn new_any(roles: &[&CourseRole]) -> Self {
        Self {
            required_roles: roles.iter().map(|r| **r).collect(),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireCourseRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireCourseRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireCourseRoleMiddleware {
            service: Rc::new(service),
            required_roles: self.required_roles.clone(),
        }))
    }
}

pub struct RequireCourseRoleMiddleware<S> {
    service: Rc<S>,
    required_roles: Vec<CourseRole>,
}

impl<S, B> Service<ServiceRequest> for RequireCourseRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let required_roles = self.required_roles.clone();

        Box::pin(async move {
            let user = req.extensions().get::<User>().cloned();
            let Some(user) = user else {
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::UNAUTHORIZED,
                        ErrorCode::Unauthorized,
                        "Authentication required",
                    )
                    .map_into_right_body(),
                ));
            };

            let Some(course_id) = req
                .match_info()
                .get("course_id")
                .and_then(|s| s.parse::<i64>().ok())
                .filter(|id| *id > 0)
            else {
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::BAD_REQUEST,
                        ErrorCode::BadRequest,
                        "Missing or invalid course_id",
                    )
                    .map_into_right_body(),
                ));
            };

            if user.is_admin() {
                return Ok(srv.call(req).await?.map_into_left_body());
            }

            let Some(storage) = req
                .app_data::<web::Data<Arc<dyn Storage>>>()
                .map(|data| data.get_ref().clone())
            else {
                error!("Storage missing from app data");
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorCode::InternalServerError,
                        "Storage is not configured",
                    )
                    .map_into_right_body(),
                ));
            };

            let member = match storage.get_course_member(course_id, user.id).await {
                Ok(member) => member,
                Err(e) => {
                    error!("Failed to load course membership: {}", e);
                    return Ok(req.into_response(
                        create_error_response(
                            StatusCode::INTERNAL_SERVER_ERROR,
                            ErrorCode::InternalServerError,
                            "Failed to check course membership",
                        )
                        .map_into_right_body(),
                    ));
                }
            };

            match member {
                Some(member) if required_roles.contains(&member.role) => {
                    debug!(
                        "User {} passes course {} check as {}",
                        user.id, course_id, member.role
                    );
                    req.extensions_mut().insert(member);
                    Ok(srv.call(req).await?.map_into_left_body())
                }
                Some(_) => Ok(req.into_response(
                    create_error_response(
                        StatusCode::FORBIDDEN,
                        ErrorCode::CoursePermissionDenied,
                        "Access denied for this course role",
                    )
                    .map_into_right_body(),
                )),
                None => Ok(req.into_response(
                    create_error_response(
                        StatusCode::FORBIDDEN,
                        ErrorCode::CoursePermissionDenied,
                        "Not a member of this course",
                    )
                    .map_into_right_body(),
                )),
            }
        })
    }
}

/// 当前用户在课程中的身份，由 RequireJWT 与 RequireCourseRole 写入的扩展组合而成
#[derive(Debug, Clone)]
pub struct CourseAccess {
    pub user: User,
    /// 管理员访问时为 None
    pub member: Option<CourseMember>,
}

impl CourseAccess {
    pub fn user_id(&self) -> i64 {
        self.user.id
    }

    /// 管理员或课程讲师
    pub fn is_instructor(&self) -> bool {
        self.user.is_admin()
            || self
                .member
                .as_ref()
                .is_some_and(|m| m.role == CourseRole::Instructor)
    }

    pub fn is_student(&self) -> bool {
        self.member
            .as_ref()
            .is_some_and(|m| m.role == CourseRole::Student)
    }
}

impl FromRequest for CourseAccess {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let access = req.extensions().get::<User>().cloned().map(|user| CourseAccess {
            user,
            member: req.extensions().get::<CourseMember>().cloned(),
        });

        ready(access.ok_or_else(|| {
            InternalError::from_response(
                "missing user",
                create_error_response(
                    StatusCode::UNAUTHORIZED,
                    ErrorCode::Unauthorized,
                    "Authentication required",
                ),
            )
            .into()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{UserProfile, UserRole, UserStatus};

    fn user(role: UserRole) -> User {
        User {
            id: 7,
            username: "someone".into(),
            email: "someone@example.com".into(),
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            profile: UserProfile::default(),
            last_login: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn member(role: CourseRole) -> CourseMember {
        CourseMember {
            id: 1,
            course_id: 1,
            user_id: 7,
            role,
            is_main: false,
            joined_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_course_access_roles() {
        let admin = CourseAccess {
            user: user(UserRole::Admin),
            member: None,
        };
        assert!(admin.is_instructor());
        assert!(!admin.is_student());

        let student = CourseAccess {
            user: user(UserRole::Student),
            member: Some(member(CourseRole::Student)),
        };
        assert!(student.is_student());
        assert!(!student.is_instructor());

        let instructor = CourseAccess {
            user: user(UserRole::Instructor),
            member: Some(member(CourseRole::Instructor)),
        };
        assert!(instructor.is_instructor());
    }
}
