//! HTTP handlers for the books module.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value;

use lectern_http::error::ApiError;
use lectern_store::BookStore;

use super::{
    models::Book,
    pagination::{CursorPage, CursorParams},
    schema,
};

type Store = Arc<dyn BookStore>;

/// Build the module router with the injected store.
pub fn router(store: Store) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/{id}", get(get_book).delete(delete_book))
        .with_state(store)
}

/// `GET /api/books` — cursor-paginated listing, newest (highest id) first.
async fn list_books(
    State(store): State<Store>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<CursorPage<Book>>, ApiError> {
    let params = CursorParams::from_query(&query)?;
    let rows = store.list_desc(params.cursor, params.fetch_limit()).await?;
    let page = params.paginate(rows, |record| record.id);
    Ok(Json(page.map(Book::from_record)))
}

/// `GET /api/books/{id}`
async fn get_book(
    State(store): State<Store>,
    Path(id): Path<i64>,
) -> Result<Json<Book>, ApiError> {
    let record = store
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Book not found"))?;
    Ok(Json(Book::from_record(record)))
}

/// `POST /api/books`
async fn create_book(
    State(store): State<Store>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Book>), ApiError> {
    let input = schema::validate_book(&body)?;
    let record = store.insert(input.into()).await?;
    tracing::info!(id = record.id, "book created");
    Ok((StatusCode::CREATED, Json(Book::from_record(record))))
}

/// `DELETE /api/books/{id}`
async fn delete_book(
    State(store): State<Store>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if store.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Book not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request},
    };
    use lectern_store::{memory::sample_catalog, MemoryStore, NewBook};
    use serde_json::json;
    use tower::ServiceExt;

    async fn seeded_router(count: usize) -> Router {
        let store = Arc::new(MemoryStore::new());
        for (index, mut book) in sample_catalog().into_iter().cycle().enumerate() {
            if index >= count {
                break;
            }
            book.title = format!("{} #{}", book.title, index + 1);
            store.insert(book).await.unwrap();
        }
        router(store)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_request(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap()
    }

    fn delete_request(uri: &str) -> Request<Body> {
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn item_ids(body: &Value) -> Vec<i64> {
        body["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["id"].as_i64().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn create_after_seed_assigns_id_six() {
        let router = seeded_router(5).await;
        let (status, body) = send(
            router,
            post_request(
                "/",
                &json!({"title": "Dune", "author": "Frank Herbert", "year": 1965}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 6);
        assert_eq!(body["title"], "Dune");
        assert_eq!(body["author"], "Frank Herbert");
        assert_eq!(body["year"], 1965);
        assert!(body["created_at"].is_string());
        assert!(body["updated_at"].is_string());
    }

    #[tokio::test]
    async fn create_with_empty_title_reports_field_errors() {
        let router = seeded_router(0).await;
        let (status, body) = send(
            router,
            post_request("/", &json!({"title": "", "author": "X", "year": 1965})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"error": {"title": ["Length must be between 1 and 200."]}})
        );
    }

    #[tokio::test]
    async fn create_collects_every_violation() {
        let router = seeded_router(0).await;
        let (status, body) = send(router, post_request("/", &json!({"year": 999}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let errors = body["error"].as_object().unwrap();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors["year"][0], json!(
            "Must be greater than or equal to 1000 and less than or equal to 2024."
        ));
    }

    #[tokio::test]
    async fn first_cursor_page_over_three_records() {
        let router = seeded_router(3).await;
        let (status, body) = send(router, get_request("/?per_page=2")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(item_ids(&body), vec![3, 2]);
        assert_eq!(body["next_cursor"], 2);
        assert_eq!(body["has_more"], true);
    }

    #[tokio::test]
    async fn following_cursors_yields_every_record_once() {
        let router = seeded_router(5).await;

        let mut seen = Vec::new();
        let mut uri = "/?per_page=2".to_string();
        loop {
            let (status, body) = send(router.clone(), get_request(&uri)).await;
            assert_eq!(status, StatusCode::OK);
            seen.extend(item_ids(&body));
            if body["has_more"] == json!(false) {
                break;
            }
            uri = format!("/?per_page=2&cursor={}", body["next_cursor"]);
        }

        assert_eq!(seen, vec![5, 4, 3, 2, 1]);
    }

    #[tokio::test]
    async fn listing_empty_store_returns_null_cursor() {
        let router = seeded_router(0).await;
        let (status, body) = send(router, get_request("/")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"items": [], "next_cursor": null, "has_more": false}));
    }

    #[tokio::test]
    async fn out_of_bounds_per_page_is_rejected() {
        for uri in ["/?per_page=0", "/?per_page=101"] {
            let router = seeded_router(1).await;
            let (status, body) = send(router, get_request(uri)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "Items per page must be between 1 and 100");
        }
    }

    #[tokio::test]
    async fn invalid_per_page_never_touches_the_store() {
        struct UnreachableStore;

        #[async_trait::async_trait]
        impl BookStore for UnreachableStore {
            async fn insert(&self, _book: NewBook) -> anyhow::Result<lectern_store::BookRecord> {
                panic!("store must not be called");
            }

            async fn get(&self, _id: i64) -> anyhow::Result<Option<lectern_store::BookRecord>> {
                panic!("store must not be called");
            }

            async fn delete(&self, _id: i64) -> anyhow::Result<bool> {
                panic!("store must not be called");
            }

            async fn list_desc(
                &self,
                _before: Option<i64>,
                _limit: i64,
            ) -> anyhow::Result<Vec<lectern_store::BookRecord>> {
                panic!("store must not be called");
            }

            async fn count(&self) -> anyhow::Result<u64> {
                panic!("store must not be called");
            }
        }

        let router = router(Arc::new(UnreachableStore));
        let (status, _) = send(router, get_request("/?per_page=101")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn undecodable_per_page_falls_back_to_default() {
        let router = seeded_router(3).await;
        let (status, body) = send(router, get_request("/?per_page=lots")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(item_ids(&body).len(), 3);
    }

    #[tokio::test]
    async fn get_returns_known_book() {
        let router = seeded_router(2).await;
        let (status, body) = send(router, get_request("/2")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 2);
        assert!(body["created_at"].is_string());
    }

    #[tokio::test]
    async fn get_of_unknown_id_is_404() {
        let router = seeded_router(2).await;
        let (status, body) = send(router, get_request("/42")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Book not found"}));
    }

    #[tokio::test]
    async fn delete_removes_the_book() {
        let router = seeded_router(2).await;

        let (status, body) = send(router.clone(), delete_request("/2")).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (status, _) = send(router, get_request("/2")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_of_unknown_id_leaves_collection_unchanged() {
        let router = seeded_router(3).await;

        let (status, _) = send(router.clone(), delete_request("/42")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = send(router, get_request("/")).await;
        assert_eq!(item_ids(&body), vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn ids_keep_increasing_after_deletion() {
        let store = Arc::new(MemoryStore::new());
        for book in sample_catalog() {
            store.insert(book).await.unwrap();
        }
        let router = router(store);

        let (status, _) = send(router.clone(), delete_request("/5")).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(
            router,
            post_request(
                "/",
                &json!({"title": "Dune", "author": "Frank Herbert", "year": 1965}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 6);
    }
}
