use std::path::{Component, Path as FsPath, PathBuf};

use axum::extract::{Path, Query, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use rusqlite::{named_params, Connection, OptionalExtension, ToSql};
use serde::{Deserialize, Serialize};

use crate::db::models::{Post, PostDetail, PostSummary, Scalar};
use crate::error::{AppError, AppResult};
use crate::extractors::MaybeUser;
use crate::state::AppState;

const HOME_LIMIT: u32 = 6;
const HERO_COUNT: u32 = 3;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub title: Option<Scalar>,
    pub short_desc: Option<Scalar>,
    pub description: Option<Scalar>,
    pub image: Option<Scalar>,
    pub category: Option<Scalar>,
    pub date: Option<Scalar>,
    pub user_id: Option<Scalar>,
    pub status: Option<Scalar>,
}

/// Editable fields. Owner and date are fixed at creation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostUpdate {
    pub title: Option<Scalar>,
    pub description: Option<Scalar>,
    pub image: Option<Scalar>,
    pub category: Option<Scalar>,
    pub short_desc: Option<Scalar>,
    pub status: Option<Scalar>,
}

#[derive(Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

impl CategoryQuery {
    /// An empty `?category=` means no filter.
    fn filter(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }
}

#[derive(Serialize)]
pub struct MessageBody {
    pub message: &'static str,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/addPost", post(add_post))
        .route("/getPosts", get(get_posts))
        .route("/getHomePosts", get(get_home_posts))
        .route("/getHeroBanner", get(get_hero_banner))
        .route("/getUserPosts/{id}", get(get_user_posts))
        .route("/getSinglePost/{id}", get(get_single_post))
        .route("/deletePost/{id}", get(delete_post))
        .route("/updatePost/{id}", put(update_post))
}

fn query_summaries(
    conn: &Connection,
    sql: &str,
    params: &[(&str, &dyn ToSql)],
) -> rusqlite::Result<Vec<PostSummary>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, PostSummary::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// POST /addPost
///
/// The access token is read but not required.
async fn add_post(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Json(req): Json<NewPost>,
) -> AppResult<Json<&'static str>> {
    match user {
        Some(u) => tracing::debug!("addPost with token for user {}", u.id),
        None => tracing::debug!("addPost without a valid token"),
    }

    let conn = state.db.get()?;
    conn.execute(
        "INSERT INTO posts (title, shortDesc, description, image, category, date, userId, status) \
         VALUES (:title, :short_desc, :description, :image, :category, :date, :user_id, :status)",
        named_params! {
            ":title": req.title,
            ":short_desc": req.short_desc,
            ":description": req.description,
            ":image": req.image,
            ":category": req.category,
            ":date": req.date,
            ":user_id": req.user_id,
            ":status": req.status,
        },
    )?;

    Ok(Json("post has been created"))
}

/// GET /getPosts[?category=]
async fn get_posts(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> AppResult<Json<Vec<PostSummary>>> {
    let conn = state.db.get()?;
    let posts = match query.filter() {
        Some(category) => query_summaries(
            &conn,
            &format!("{} WHERE p.category = :category", PostSummary::SELECT),
            named_params! { ":category": category },
        )?,
        None => query_summaries(&conn, PostSummary::SELECT, named_params! {})?,
    };
    Ok(Json(posts))
}

/// GET /getHomePosts[?category=]: capped only when unfiltered
async fn get_home_posts(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> AppResult<Json<Vec<PostSummary>>> {
    let conn = state.db.get()?;
    let posts = match query.filter() {
        Some(category) => query_summaries(
            &conn,
            &format!("{} WHERE p.category = :category", PostSummary::SELECT),
            named_params! { ":category": category },
        )?,
        None => query_summaries(
            &conn,
            &format!("{} LIMIT :limit", PostSummary::SELECT),
            named_params! { ":limit": HOME_LIMIT },
        )?,
    };
    Ok(Json(posts))
}

/// GET /getHeroBanner: a fresh random pick on every call
async fn get_hero_banner(State(state): State<AppState>) -> AppResult<Json<Vec<PostSummary>>> {
    let conn = state.db.get()?;
    let posts = query_summaries(
        &conn,
        &format!("{} ORDER BY RANDOM() LIMIT :limit", PostSummary::SELECT),
        named_params! { ":limit": HERO_COUNT },
    )?;
    Ok(Json(posts))
}

/// GET /getUserPosts/{id}: full rows for an author's dashboard
async fn get_user_posts(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<Post>>> {
    let conn = state.db.get()?;
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM posts WHERE userId = :user_id",
        Post::COLUMNS
    ))?;
    let posts = stmt
        .query_map(named_params! { ":user_id": user_id }, Post::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(posts))
}

/// GET /getSinglePost/{id}: zero or one element
async fn get_single_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<PostDetail>>> {
    let conn = state.db.get()?;
    let mut stmt = conn.prepare(&format!("{} WHERE p.id = :id", PostDetail::SELECT))?;
    let posts = stmt
        .query_map(named_params! { ":id": id }, PostDetail::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(posts))
}

/// GET /deletePost/{id}
///
/// The stored image is removed after the row; failing to remove it is only logged.
async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageBody>> {
    let conn = state.db.get()?;

    let image: Option<Option<String>> = conn
        .query_row(
            "SELECT image FROM posts WHERE id = :id",
            named_params! { ":id": id },
            |row| row.get(0),
        )
        .optional()?;

    let Some(image) = image else {
        return Err(AppError::RecordNotFound("Post not found".into()));
    };

    conn.execute("DELETE FROM posts WHERE id = :id", named_params! { ":id": id })?;
    drop(conn);

    if let Some(path) = image
        .as_deref()
        .and_then(|image| image_path(&state.config.public_path(), image))
    {
        if let Err(e) = tokio::fs::remove_file(&path).await {
            tracing::warn!("Could not remove image {}: {}", path.display(), e);
        }
    }

    Ok(Json(MessageBody {
        message: "Post deleted successfully",
    }))
}

/// PUT /updatePost/{id}
async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<PostUpdate>,
) -> AppResult<Json<&'static str>> {
    let conn = state.db.get()?;
    conn.execute(
        "UPDATE posts SET title = :title, description = :description, image = :image, \
         category = :category, shortDesc = :short_desc, status = :status WHERE id = :id",
        named_params! {
            ":title": req.title,
            ":description": req.description,
            ":image": req.image,
            ":category": req.category,
            ":short_desc": req.short_desc,
            ":status": req.status,
            ":id": id,
        },
    )?;
    Ok(Json("post has been updated"))
}

/// Resolve a stored image name (`/uploads/x.png`) under the public root.
/// Names that would escape the root resolve to nothing.
fn image_path(public_root: &FsPath, image: &str) -> Option<PathBuf> {
    let relative = FsPath::new(image.trim_start_matches('/'));
    if relative.as_os_str().is_empty()
        || !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
    {
        return None;
    }
    Some(public_root.join(relative))
}
