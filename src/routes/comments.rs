use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use rusqlite::named_params;
use serde::Deserialize;

use crate::db::models::{Comment, Scalar};
use crate::error::AppResult;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentInput {
    pub comment_user: Option<Scalar>,
    pub comment_user_email: Option<Scalar>,
    pub comment_user_message: Option<Scalar>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub comments: CommentInput,
    pub comment_date: Option<Scalar>,
    pub post_id: Option<Scalar>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/addComment", post(add_comment))
        .route("/getComment/{id}", get(get_comments))
}

/// POST /addComment: anonymous, free-text
async fn add_comment(
    State(state): State<AppState>,
    Json(req): Json<NewComment>,
) -> AppResult<Json<&'static str>> {
    let conn = state.db.get()?;
    conn.execute(
        "INSERT INTO comments (commentUser, commentUserEmail, commentUserMessage, commentDate, postId) \
         VALUES (:user, :email, :message, :date, :post_id)",
        named_params! {
            ":user": req.comments.comment_user,
            ":email": req.comments.comment_user_email,
            ":message": req.comments.comment_user_message,
            ":date": req.comment_date,
            ":post_id": req.post_id,
        },
    )?;
    Ok(Json("comment has been added"))
}

/// GET /getComment/{id}
async fn get_comments(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> AppResult<Json<Vec<Comment>>> {
    let conn = state.db.get()?;
    // No ORDER BY: rows come back in storage order.
    let mut stmt = conn.prepare(
        "SELECT c.commentUser, c.commentUserEmail, c.commentUserMessage, c.commentDate \
         FROM comments c JOIN posts p ON c.postId = p.id WHERE p.id = :post_id",
    )?;
    let comments = stmt
        .query_map(named_params! { ":post_id": post_id }, Comment::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(comments))
}
