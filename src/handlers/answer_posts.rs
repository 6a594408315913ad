// handlers/answer_posts.rs - answer post endpoints scoped under a course
//
// POST   /api/courses/:course_id/answer-posts
// PUT    /api/courses/:course_id/answer-posts
// GET    /api/courses/:course_id/answer-posts/:answer_post_id
// DELETE /api/courses/:course_id/answer-posts/:answer_post_id

use axum::{
    extract::{Extension, Path, State},
    http::header,
    response::IntoResponse,
    Json,
};

use crate::database::models::AnswerPost;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::server::AppState;

/// POST /api/courses/:course_id/answer-posts - Create a new answer post
///
/// Responds 201 with the stored answer and its location, or 400 when the
/// answer already has an id, posts are disabled or the parent post belongs
/// to another course.
pub async fn create(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(course_id): Path<i64>,
    Json(answer_post): Json<AnswerPost>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .answer_posts
        .create_answer_post(course_id, answer_post, &user)
        .await?;

    let id = result
        .id
        .ok_or_else(|| ApiError::internal_server_error("Stored answer post has no id"))?;
    let location = format!("/api/courses/{}/answer-posts/{}", course_id, id);

    Ok(([(header::LOCATION, location)], ApiResponse::created(result)))
}

/// PUT /api/courses/:course_id/answer-posts - Update content (and approval, for instructors)
pub async fn update(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(course_id): Path<i64>,
    Json(answer_post): Json<AnswerPost>,
) -> ApiResult<AnswerPost> {
    let result = state
        .answer_posts
        .update_answer_post(course_id, answer_post, &user)
        .await?;

    Ok(ApiResponse::success(result))
}

/// GET /api/courses/:course_id/answer-posts/:answer_post_id
pub async fn get(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path((course_id, answer_post_id)): Path<(i64, i64)>,
) -> ApiResult<AnswerPost> {
    let result = state
        .answer_posts
        .get_answer_post(course_id, answer_post_id, &user)
        .await?;

    Ok(ApiResponse::success(result))
}

/// DELETE /api/courses/:course_id/answer-posts/:answer_post_id
pub async fn delete(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path((course_id, answer_post_id)): Path<(i64, i64)>,
) -> ApiResult<()> {
    state
        .answer_posts
        .delete_answer_post(course_id, answer_post_id, &user)
        .await?;

    Ok(ApiResponse::success(()))
}
