//! Axum Handlers for the REST API
//!
//! This module contains the logic for handling HTTP requests for lessons.
//! It uses `utoipa` doc comments to generate OpenAPI documentation.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::instrument;
use tutor_core::progression::LessonError;

use crate::{
    models::{
        CourseListing, CourseQuery, ErrorResponse, StartLessonResponse, SubmitAnswerPayload,
        SubmitAnswerResponse,
    },
    state::AppState,
};

/// A lesson request the engine refused.
///
/// Existing clients read errors from the body of a normal response, so these
/// are sent with `200 OK` rather than a failure status.
pub struct ApiError(LessonError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = self.0.to_string();
        (StatusCode::OK, Json(ErrorResponse { error })).into_response()
    }
}

impl From<LessonError> for ApiError {
    fn from(err: LessonError) -> Self {
        Self(err)
    }
}

/// List every course in the catalog.
#[utoipa::path(
    get,
    path = "/courses",
    responses(
        (status = 200, description = "Courses in catalog order", body = [CourseListing])
    )
)]
pub async fn list_courses(State(state): State<Arc<AppState>>) -> Json<Vec<CourseListing>> {
    let courses = state
        .engine
        .catalog()
        .list_courses()
        .into_iter()
        .map(CourseListing::from)
        .collect();
    Json(courses)
}

/// Start a course by explaining its first module.
#[utoipa::path(
    get,
    path = "/start_lesson_multi",
    responses(
        (status = 200, description = "The opening explanation, or `{\"error\": \"Invalid course ID.\"}`", body = StartLessonResponse)
    )
)]
#[instrument(skip_all, fields(course_id = ?query.course_id))]
pub async fn start_lesson_multi(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CourseQuery>,
) -> Result<Json<StartLessonResponse>, ApiError> {
    let course_id = query.course_id.ok_or(LessonError::InvalidCourse)?;
    start(&state, &course_id).await
}

/// Submit an answer for the current module and receive feedback and the next step.
#[utoipa::path(
    post,
    path = "/submit_answer_multi",
    request_body = SubmitAnswerPayload,
    responses(
        (status = 200, description = "Feedback and next step, or `{\"error\": ...}` for an unknown course or module", body = SubmitAnswerResponse)
    )
)]
#[instrument(skip_all, fields(course_id = ?query.course_id, module_id = payload.module_id))]
pub async fn submit_answer_multi(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CourseQuery>,
    Json(payload): Json<SubmitAnswerPayload>,
) -> Result<Json<SubmitAnswerResponse>, ApiError> {
    let course_id = query.course_id.ok_or(LessonError::InvalidCourse)?;
    submit(&state, &course_id, payload).await
}

/// Start the default course.
#[utoipa::path(
    get,
    path = "/start_lesson",
    responses(
        (status = 200, description = "The opening explanation of the default course", body = StartLessonResponse)
    )
)]
#[instrument(skip_all)]
pub async fn start_lesson(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StartLessonResponse>, ApiError> {
    start(&state, &state.default_course_id).await
}

/// Submit an answer within the default course.
#[utoipa::path(
    post,
    path = "/submit_answer",
    request_body = SubmitAnswerPayload,
    responses(
        (status = 200, description = "Feedback and next step, or `{\"error\": \"Invalid module ID.\"}`", body = SubmitAnswerResponse)
    )
)]
#[instrument(skip_all, fields(module_id = payload.module_id))]
pub async fn submit_answer(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SubmitAnswerPayload>,
) -> Result<Json<SubmitAnswerResponse>, ApiError> {
    submit(&state, &state.default_course_id, payload).await
}

async fn start(state: &AppState, course_id: &str) -> Result<Json<StartLessonResponse>, ApiError> {
    let start = state.engine.start_lesson(course_id).await?;
    Ok(Json(start.into()))
}

async fn submit(
    state: &AppState,
    course_id: &str,
    payload: SubmitAnswerPayload,
) -> Result<Json<SubmitAnswerResponse>, ApiError> {
    let outcome = state
        .engine
        .submit_answer(course_id, payload.module_id, &payload.answer)
        .await?;
    Ok(Json(outcome.into()))
}
