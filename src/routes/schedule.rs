use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, CurrentUser};
use crate::models::schedule::requests::{CreateEventRequest, ScheduleQuery, UpdateEventRequest};
use crate::services::ScheduleService;
use crate::utils::SafeEventId;

static SCHEDULE_SERVICE: Lazy<ScheduleService> = Lazy::new(ScheduleService::new_lazy);

pub async fn list_events(
    req: HttpRequest,
    CurrentUser(user): CurrentUser,
    query: web::Query<ScheduleQuery>,
) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE
        .list_events(&user, query.into_inner(), &req)
        .await
}

pub async fn create_event(
    req: HttpRequest,
    CurrentUser(user): CurrentUser,
    event_data: web::Json<CreateEventRequest>,
) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE
        .create_event(&user, event_data.into_inner(), &req)
        .await
}

pub async fn get_event(
    req: HttpRequest,
    CurrentUser(user): CurrentUser,
    event_id: SafeEventId,
) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE.get_event(&user, event_id.0, &req).await
}

pub async fn update_event(
    req: HttpRequest,
    CurrentUser(user): CurrentUser,
    event_id: SafeEventId,
    update_data: web::Json<UpdateEventRequest>,
) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE
        .update_event(&user, event_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_event(
    req: HttpRequest,
    CurrentUser(user): CurrentUser,
    event_id: SafeEventId,
) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE.delete_event(&user, event_id.0, &req).await
}

pub fn configure_schedule_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/schedule")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_events))
                    .route(web::post().to(create_event)),
            )
            .service(
                web::resource("/{event_id}")
                    .route(web::get().to(get_event))
                    .route(web::put().to(update_event))
                    .route(web::delete().to(delete_event)),
            ),
    );
}
