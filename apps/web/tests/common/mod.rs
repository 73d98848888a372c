//! # 統合テスト用のフェイク CMS
//!
//! `127.0.0.1:0` で axum サーバーを起動し、CMS の REST API を最小限に再現する。
//! 受け取ったリクエストはすべて記録する。
//!
//! ## 固定データ
//!
//! | documentId | タイトル | カテゴリ | 作者 |
//! |------------|---------|---------|------|
//! | `bali-beaches` | Bali Beaches | Beach | ayu（id 7） |
//! | `kyoto-temples` | Kyoto Temples | Culture | ken（id 8） |
//! | `sunset-in-bali` | Sunset in Bali | Beach | なし |
//!
//! トークン `jwt-ayu` / `jwt-ken` がそれぞれのユーザーとして認証される。

#![allow(dead_code)]

use std::{
   collections::HashMap,
   sync::{Arc, Mutex},
};

use axum::{
   Json,
   Router,
   body::{Body, to_bytes},
   extract::{Path, Query, Request, State},
   http::{HeaderMap, Method, StatusCode, header},
   middleware::{Next, from_fn_with_state},
   response::{IntoResponse, Response},
   routing::{get, post},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub const AYU_TOKEN: &str = "jwt-ayu";
pub const KEN_TOKEN: &str = "jwt-ken";
pub const AYU_PASSWORD: &str = "Secret123";
const CREATED_AT: &str = "2025-03-01T10:00:00.000Z";

/// 記録したリクエスト
#[derive(Debug, Clone)]
pub struct RecordedRequest {
   pub method:        Method,
   pub path:          String,
   pub query:         Option<String>,
   pub authorization: Option<String>,
   pub request_id:    Option<String>,
   pub body:          Option<Value>,
}

#[derive(Clone)]
struct FakeState {
   recorded:        Arc<Mutex<Vec<RecordedRequest>>>,
   omit_pagination: bool,
}

/// 起動済みのフェイク CMS
pub struct FakeCms {
   pub base_url: String,
   recorded:     Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeCms {
   pub async fn start() -> Self {
      Self::spawn(false).await
   }

   /// 一覧で `meta.pagination` を返さない CMS
   pub async fn start_without_pagination() -> Self {
      Self::spawn(true).await
   }

   async fn spawn(omit_pagination: bool) -> Self {
      let recorded = Arc::new(Mutex::new(Vec::new()));
      let state = FakeState {
         recorded: recorded.clone(),
         omit_pagination,
      };
      let app = router(state);

      let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
      let addr = listener.local_addr().unwrap();
      tokio::spawn(async move {
         axum::serve(listener, app).await.unwrap();
      });

      Self {
         base_url: format!("http://{addr}"),
         recorded,
      }
   }

   pub fn requests(&self) -> Vec<RecordedRequest> {
      self.recorded.lock().unwrap().clone()
   }

   /// 指定パスへのリクエストだけを返す
   pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
      self
         .requests()
         .into_iter()
         .filter(|r| r.path == path)
         .collect()
   }
}

/// 接続を受け付けないアドレス
pub async fn unreachable_base_url() -> String {
   let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
   let addr = listener.local_addr().unwrap();
   drop(listener);
   format!("http://{addr}")
}

fn router(state: FakeState) -> Router {
   Router::new()
      .route("/api/articles", get(list_articles).post(create_article))
      .route(
         "/api/articles/{document_id}",
         get(get_article).put(update_article).delete(delete_article),
      )
      .route("/api/comments", post(create_comment))
      .route("/api/comments/{document_id}", get(get_comment))
      .route("/api/categories", get(list_categories).post(create_category))
      .route("/api/users/me", get(current_user))
      .route("/api/auth/local", post(login))
      .route("/api/auth/local/register", post(register))
      .layer(from_fn_with_state(state.clone(), record))
      .with_state(state)
}

async fn record(State(state): State<FakeState>, request: Request, next: Next) -> Response {
   let (parts, body) = request.into_parts();
   let bytes = to_bytes(body, usize::MAX).await.unwrap_or_default();
   let header = |name: &str| {
      parts
         .headers
         .get(name)
         .and_then(|v| v.to_str().ok())
         .map(str::to_string)
   };

   state.recorded.lock().unwrap().push(RecordedRequest {
      method:        parts.method.clone(),
      path:          parts.uri.path().to_string(),
      query:         parts.uri.query().map(str::to_string),
      authorization: header("authorization"),
      request_id:    header("x-request-id"),
      body:          serde_json::from_slice(&bytes).ok(),
   });

   next.run(Request::from_parts(parts, Body::from(bytes))).await
}

// --- 固定データ ---

fn ayu() -> Value {
   json!({"id": 7, "documentId": "user-ayu", "username": "ayu", "email": "ayu@example.com"})
}

fn ken() -> Value {
   json!({"id": 8, "documentId": "user-ken", "username": "ken", "email": "ken@example.com"})
}

fn category(id: i64, name: &str) -> Value {
   json!({"id": id, "documentId": format!("cat-{id}"), "name": name, "description": null})
}

fn articles() -> Vec<Value> {
   vec![
      json!({
         "id": 1,
         "documentId": "bali-beaches",
         "title": "Bali Beaches",
         "description": "White sand and warm water.",
         "cover_image_url": "https://img.example.com/bali.jpg",
         "createdAt": CREATED_AT,
         "user": ayu(),
         "category": category(1, "Beach"),
      }),
      json!({
         "id": 2,
         "documentId": "kyoto-temples",
         "title": "Kyoto Temples",
         "description": "Quiet mornings at old gates.",
         "cover_image_url": "",
         "createdAt": CREATED_AT,
         "user": ken(),
         "category": category(2, "Culture"),
      }),
      json!({
         "id": 3,
         "documentId": "sunset-in-bali",
         "title": "Sunset in Bali",
         "description": "Golden hour on the cliffs.",
         "cover_image_url": null,
         "createdAt": CREATED_AT,
         "user": null,
         "category": category(1, "Beach"),
      }),
   ]
}

fn error_body(status: StatusCode, message: &str) -> Response {
   (
      status,
      Json(json!({
         "data": null,
         "error": {"status": status.as_u16(), "name": "ApplicationError", "message": message},
      })),
   )
      .into_response()
}

fn bearer_user(headers: &HeaderMap) -> Option<Value> {
   let token = headers
      .get(header::AUTHORIZATION)?
      .to_str()
      .ok()?
      .strip_prefix("Bearer ")?;
   match token {
      AYU_TOKEN => Some(ayu()),
      KEN_TOKEN => Some(ken()),
      _ => None,
   }
}

fn field<'a>(article: &'a Value, path: &[&str]) -> Option<&'a str> {
   path.iter()
      .try_fold(article, |value, key| value.get(key))
      .and_then(Value::as_str)
}

// --- ハンドラ ---

async fn list_articles(
   State(state): State<FakeState>,
   Query(params): Query<HashMap<String, String>>,
) -> Response {
   let category = params.get("filters[category][name][$eqi]");
   let search = params.get("filters[title][$containsi]");
   let matched: Vec<Value> = articles()
      .into_iter()
      .filter(|a| {
         category.is_none_or(|c| {
            field(a, &["category", "name"]).is_some_and(|n| n.eq_ignore_ascii_case(c))
         })
      })
      .filter(|a| {
         search.is_none_or(|q| {
            field(a, &["title"]).is_some_and(|t| t.to_lowercase().contains(&q.to_lowercase()))
         })
      })
      .collect();

   let page: usize = params
      .get("pagination[page]")
      .and_then(|v| v.parse().ok())
      .unwrap_or(1);
   let page_size: usize = params
      .get("pagination[pageSize]")
      .and_then(|v| v.parse().ok())
      .unwrap_or(25);
   let total = matched.len();
   let rows: Vec<Value> = matched
      .into_iter()
      .skip((page - 1) * page_size)
      .take(page_size)
      .collect();

   if state.omit_pagination {
      return Json(json!({"data": rows})).into_response();
   }
   Json(json!({
      "data": rows,
      "meta": {"pagination": {
         "page": page,
         "pageSize": page_size,
         "pageCount": total.div_ceil(page_size).max(1),
         "total": total,
      }},
   }))
   .into_response()
}

async fn get_article(Path(document_id): Path<String>) -> Response {
   match document_id.as_str() {
      "broken" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
      "bali-beaches" => {
         let mut article = articles().remove(0);
         article["comments"] = json!([
            {"id": 11, "documentId": "comment-1", "content": "So blue!", "createdAt": CREATED_AT,
             "user": {"username": "ken", "email": "ken@example.com"}},
            {"id": 12, "documentId": "comment-2", "content": "Adding to my list.", "createdAt": CREATED_AT},
         ]);
         Json(json!({"data": article})).into_response()
      }
      other => match articles()
         .into_iter()
         .find(|a| field(a, &["documentId"]) == Some(other))
      {
         Some(article) => Json(json!({"data": article})).into_response(),
         None => error_body(StatusCode::NOT_FOUND, "Not Found"),
      },
   }
}

async fn create_article(headers: HeaderMap, Json(body): Json<Value>) -> Response {
   let Some(user) = bearer_user(&headers) else {
      return error_body(StatusCode::UNAUTHORIZED, "Missing or invalid credentials");
   };
   let data = &body["data"];
   Json(json!({"data": {
      "id": 10,
      "documentId": "new-article",
      "title": data["title"],
      "description": data["description"],
      "cover_image_url": data["cover_image_url"],
      "createdAt": CREATED_AT,
      "user": user,
   }}))
   .into_response()
}

async fn update_article(
   headers: HeaderMap,
   Path(document_id): Path<String>,
   Json(body): Json<Value>,
) -> Response {
   let Some(user) = bearer_user(&headers) else {
      return error_body(StatusCode::UNAUTHORIZED, "Missing or invalid credentials");
   };
   let data = &body["data"];
   Json(json!({"data": {
      "id": 1,
      "documentId": document_id,
      "title": data["title"],
      "description": data["description"],
      "createdAt": CREATED_AT,
      "user": user,
   }}))
   .into_response()
}

async fn delete_article(headers: HeaderMap) -> Response {
   if bearer_user(&headers).is_none() {
      return error_body(StatusCode::UNAUTHORIZED, "Missing or invalid credentials");
   }
   StatusCode::NO_CONTENT.into_response()
}

async fn get_comment(Path(document_id): Path<String>) -> Response {
   if document_id != "comment-2" {
      return error_body(StatusCode::NOT_FOUND, "Not Found");
   }
   Json(json!({"data": {
      "id": 12,
      "documentId": "comment-2",
      "content": "Adding to my list.",
      "createdAt": CREATED_AT,
      "user": {"username": "mika", "email": "mika@example.com"},
   }}))
   .into_response()
}

async fn create_comment(headers: HeaderMap, Json(body): Json<Value>) -> Response {
   let Some(user) = bearer_user(&headers) else {
      return error_body(StatusCode::UNAUTHORIZED, "Missing or invalid credentials");
   };
   Json(json!({"data": {
      "id": 20,
      "documentId": "comment-new",
      "content": body["data"]["content"],
      "createdAt": CREATED_AT,
      "user": user,
   }}))
   .into_response()
}

async fn list_categories() -> Json<Value> {
   Json(json!({"data": [category(1, "Beach"), category(2, "Culture")]}))
}

async fn create_category(headers: HeaderMap, Json(body): Json<Value>) -> Response {
   if bearer_user(&headers).is_none() {
      return error_body(StatusCode::UNAUTHORIZED, "Missing or invalid credentials");
   }
   Json(json!({"data": {
      "id": 3,
      "documentId": "cat-3",
      "name": body["data"]["name"],
      "description": body["data"]["description"],
   }}))
   .into_response()
}

async fn current_user(headers: HeaderMap) -> Response {
   match bearer_user(&headers) {
      Some(user) => Json(user).into_response(),
      None => error_body(StatusCode::UNAUTHORIZED, "Missing or invalid credentials"),
   }
}

async fn login(Json(body): Json<Value>) -> Response {
   let identifier = body["identifier"].as_str().unwrap_or_default();
   let password = body["password"].as_str().unwrap_or_default();
   if identifier == "ayu@example.com" && password == AYU_PASSWORD {
      return Json(json!({"jwt": AYU_TOKEN, "user": ayu()})).into_response();
   }
   error_body(StatusCode::BAD_REQUEST, "Invalid identifier or password")
}

async fn register(Json(body): Json<Value>) -> Response {
   match body["email"].as_str().unwrap_or_default() {
      "taken@example.com" => {
         error_body(StatusCode::BAD_REQUEST, "Email or Username are already taken")
      }
      "gateway@example.com" => (
         StatusCode::BAD_GATEWAY,
         [(header::CONTENT_TYPE, "text/html")],
         "<html>Bad Gateway</html>",
      )
         .into_response(),
      email => Json(json!({
         "jwt": "jwt-new",
         "user": {"id": 30, "documentId": "user-new", "username": body["username"], "email": email},
      }))
      .into_response(),
   }
}
