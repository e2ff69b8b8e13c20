use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use portfolio_core::content::Post;
use portfolio_core::document::Stored;
use portfolio_core::mutation::{list, DeleteTarget, SaveOutcome};
use serde_json::{Map, Value};

use super::{message, saved};
use crate::error::ApiResult;
use crate::middleware::admin::AdminSession;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(create))
        .route("/{id}", get(show).put(update).delete(destroy))
}

async fn index(State(state): State<AppState>) -> ApiResult<Json<Vec<Stored<Post>>>> {
    Ok(Json(list::all(state.store()).await?))
}

async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Stored<Post>>> {
    let id = list::parse_id::<Post>(&id)?;
    Ok(Json(list::get(state.store(), id).await?))
}

async fn create(
    State(state): State<AppState>,
    _admin: AdminSession,
    payload: Result<Json<Post>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(post) = payload?;
    let post = list::create(state.store(), post).await?;
    saved("Post created", "post", SaveOutcome::Created(post))
}

async fn update(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let id = list::parse_id::<Post>(&id)?;
    let Json(patch) = payload?;
    let post = list::update::<Post>(state.store(), state.media(), id, patch).await?;
    saved("Post updated", "post", SaveOutcome::Updated(post))
}

async fn destroy(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = list::parse_id::<Post>(&id)?;
    list::delete::<Post>(state.store(), state.media(), DeleteTarget::ById(id)).await?;
    Ok(message("Post deleted"))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use portfolio_core::document::{Collection, DocumentId};
    use portfolio_core::store::DocumentStore;
    use serde_json::{json, Value};

    use crate::routes::test_support::TestApp;

    async fn create(app: &TestApp, body: Value) -> Value {
        let (status, body) = app.admin(Method::POST, "/api/posts", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        body["post"].clone()
    }

    #[tokio::test]
    async fn create_defaults_category_and_lists_newest_first() {
        let app = TestApp::new();
        let first = create(&app, json!({ "title": "First", "date": "2024-01-01" })).await;
        let second = create(
            &app,
            json!({ "title": "Second", "date": "2024-02-01", "category": "Lyrics" }),
        )
        .await;
        assert_eq!(first["category"], "Blog");

        let (status, posts) = app.get("/api/posts").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(posts[0]["_id"], second["_id"]);
        assert_eq!(posts[1]["_id"], first["_id"]);
    }

    #[tokio::test]
    async fn unknown_or_malformed_id_is_not_found() {
        let app = TestApp::new();
        let missing = DocumentId::new();

        let (status, body) = app.get(&format!("/api/posts/{missing}")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["message"], "Post not found");

        let (status, _) = app.get("/api/posts/not-an-id").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app
            .admin(Method::PUT, "/api/posts/not-an-id", Some(json!({ "title": "x" })))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_merges_supplied_fields() {
        let app = TestApp::new();
        let post = create(
            &app,
            json!({ "title": "Rain", "date": "2024-05-01", "preview": "Drops" }),
        )
        .await;
        let uri = format!("/api/posts/{}", post["_id"].as_str().unwrap());

        let (status, body) = app
            .admin(Method::PUT, &uri, Some(json!({ "title": "Rainfall" })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["post"]["title"], "Rainfall");
        assert_eq!(body["post"]["preview"], "Drops");

        let (_, fetched) = app.get(&uri).await;
        assert_eq!(fetched["title"], "Rainfall");
    }

    #[tokio::test]
    async fn missing_date_is_bad_request() {
        let app = TestApp::new();
        let (status, _) = app
            .admin(Method::POST, "/api/posts", Some(json!({ "title": "No date" })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn delete_derives_asset_from_image_url() {
        let app = TestApp::new();
        let post = create(
            &app,
            json!({
                "title": "Rain",
                "date": "2024-05-01",
                "image": "https://res.cloudinary.com/demo/image/upload/v1712345678/lyrics/rain.jpg",
            }),
        )
        .await;
        create(&app, json!({ "title": "Other", "date": "2024-05-02" })).await;

        let uri = format!("/api/posts/{}", post["_id"].as_str().unwrap());
        let (status, body) = app.admin(Method::DELETE, &uri, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Post deleted");
        assert_eq!(app.media.destroyed().await, vec!["lyrics/rain".to_string()]);
        assert_eq!(app.store.count(Collection::Posts).await.unwrap(), 1);

        let (status, _) = app.admin(Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
