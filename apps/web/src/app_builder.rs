//! # Web アプリケーション構築
//!
//! DI（クライアント・State）の初期化とルーター構築を担当する。
//! `main.rs` は設定読み込みとサーバー起動に集中する。

use std::sync::Arc;

use axum::{
   Router,
   middleware::from_fn,
   routing::{get, post},
};
use tower_http::{
   request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
   trace::TraceLayer,
};
use travelhub_shared::observability::{MakeRequestUuidV7, make_request_span};

use crate::{
   client::{CmsClient, CmsClientImpl},
   config::WebConfig,
   handler::{
      ArticleState,
      CategoryState,
      CommentState,
      SessionState,
      clear_session,
      create_article,
      create_category,
      create_comment,
      delete_article,
      featured_articles,
      get_article,
      health_check,
      list_articles,
      list_categories,
      set_session,
      update_article,
   },
   middleware::{request_id::store_request_id, require_session_cookie},
};

/// 設定から CMS クライアントを作り、ルーターを組み立てる
pub fn build_app(config: &WebConfig) -> Router {
   let cms_client = Arc::new(CmsClientImpl::new(&config.cms_url));
   build_router(cms_client, config.secure_cookies)
}

/// CMS クライアントを受け取り、State → Router の順に組み立てる
///
/// クライアントは具象型で受け取り、各 State には必要なサブトレイトだけを渡す。
pub fn build_router<C>(cms_client: Arc<C>, secure_cookies: bool) -> Router
where
   C: CmsClient + 'static,
{
   let session_state = Arc::new(SessionState { secure_cookies });

   // 更新・削除の作者確認に CmsUserClient も必要
   let article_state = Arc::new(ArticleState {
      article_client: cms_client.clone(),
      user_client:    cms_client.clone(),
   });

   let category_state = Arc::new(CategoryState {
      cms_client: cms_client.clone(),
   });

   let comment_state = Arc::new(CommentState { cms_client });

   // ルーター構築
   // レイヤーは下に書いたものが外側
   // 1. SetRequestIdLayer（最外）: UUID v7 を生成（クライアント提供値があればそれを使う）
   // 2. TraceLayer: request_id 入りのスパンを作る
   // 3. PropagateRequestIdLayer: レスポンスに X-Request-Id をコピー
   // 4. store_request_id: task-local に保存し、CMS へのリクエストに引き継ぐ
   // 5. require_session_cookie（最内）: ログイン必須パスのリダイレクト
   Router::new()
      .route("/health", get(health_check))
      .route("/api/auth/session", post(set_session).delete(clear_session))
      .with_state(session_state)
      .route("/api/articles", get(list_articles).post(create_article))
      .route("/api/articles/featured", get(featured_articles))
      .route(
         "/api/articles/{document_id}",
         get(get_article).put(update_article).delete(delete_article),
      )
      .with_state(article_state)
      .route(
         "/api/categories",
         get(list_categories).post(create_category),
      )
      .with_state(category_state)
      .route("/api/comments", post(create_comment))
      .with_state(comment_state)
      .layer(from_fn(require_session_cookie))
      .layer(from_fn(store_request_id))
      .layer(PropagateRequestIdLayer::x_request_id())
      .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
      .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
