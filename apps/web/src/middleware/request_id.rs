//! # Request ID 伝播ミドルウェア
//!
//! 受け付けたリクエストの Request ID を、CMS への呼び出しに引き継ぐ。
//!
//! 1. [`store_request_id`] が `SetRequestIdLayer` の付けた
//!    [`RequestId`](tower_http::request_id::RequestId) を task-local に保存する
//! 2. CMS クライアントは [`inject_request_id`] で `X-Request-Id` ヘッダーを付与する
//!
//! task-local スコープ外（バッチ的な呼び出しやテスト）ではヘッダーを付けない。

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use tower_http::request_id::RequestId;
use travelhub_shared::observability::REQUEST_ID_HEADER;

tokio::task_local! {
   static REQUEST_ID: String;
}

/// 現在のリクエストの Request ID
pub fn current_request_id() -> Option<String> {
   REQUEST_ID.try_with(Clone::clone).ok()
}

/// Request ID を task-local に保存するミドルウェア
///
/// extensions に `RequestId` がない場合は `-` を保存する。
pub async fn store_request_id(request: Request<Body>, next: Next) -> Response {
   let request_id = request
      .extensions()
      .get::<RequestId>()
      .and_then(|id| id.header_value().to_str().ok())
      .unwrap_or("-")
      .to_string();

   REQUEST_ID.scope(request_id, next.run(request)).await
}

/// CMS へのリクエストに `X-Request-Id` を付与する
pub fn inject_request_id(builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
   match current_request_id() {
      Some(id) => builder.header(REQUEST_ID_HEADER, id),
      None => builder,
   }
}
