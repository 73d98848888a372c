//! # 記事 API ハンドラ
//!
//! ## エンドポイント
//!
//! - `GET /api/articles` - 記事一覧（`page` / `pageSize` / `category` / `q`）
//! - `GET /api/articles/featured` - 最近の記事からランダムに選んだおすすめ記事
//! - `GET /api/articles/{document_id}` - 記事詳細
//! - `POST /api/articles` - 記事作成（要ログイン）
//! - `PUT /api/articles/{document_id}` - 記事更新（要ログイン・作者のみ）
//! - `DELETE /api/articles/{document_id}` - 記事削除（要ログイン・作者のみ）

use std::sync::Arc;

use axum::{
   Json,
   extract::{Path, Query, State},
   http::StatusCode,
   response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use travelhub_domain::{
   DomainError,
   article::{ArticleDraft, ArticleForm, DocumentId},
   explorer::{CategoryFilter, ListQuery},
   featured::{FEATURED_COUNT, FEATURED_POOL_SIZE, pick_random_items},
   pagination::DEFAULT_PAGE_SIZE,
   user::AccessToken,
};
use travelhub_shared::{ApiResponse, event_log::event, log_business_event};

use crate::{
   client::{CmsArticleClient, CmsError, CmsUserClient},
   error::{
      domain_error_response,
      log_and_convert_cms_error,
      require_session,
      session_token,
      unauthorized_response,
   },
};

const SIGN_IN_TO_CREATE: &str = "Please sign in before creating a new article.";
const SIGN_IN_TO_UPDATE: &str = "Please sign in to update this article.";

/// 記事 API の共有状態
pub struct ArticleState {
   pub article_client: Arc<dyn CmsArticleClient>,
   pub user_client:    Arc<dyn CmsUserClient>,
}

// --- リクエスト型 ---

/// 記事一覧のクエリパラメータ
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListArticlesParams {
   pub page:      Option<u32>,
   pub page_size: Option<u32>,
   pub category:  Option<String>,
   pub q:         Option<String>,
}

impl ListArticlesParams {
   fn into_list_query(self) -> ListQuery {
      ListQuery {
         page:      self.page.unwrap_or(1).max(1),
         page_size: self.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1),
         category:  CategoryFilter::from_label(self.category.as_deref().unwrap_or_default()),
         search:    self.q.as_deref().unwrap_or_default().trim().to_string(),
      }
   }
}

/// おすすめ記事のクエリパラメータ
#[derive(Debug, Default, Deserialize)]
pub struct FeaturedParams {
   pub count: Option<usize>,
}

/// 記事の作成・更新リクエスト
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArticleRequest {
   pub title:           String,
   pub description:     String,
   pub cover_image_url: Option<String>,
   pub category_id:     Option<i64>,
}

impl ArticleRequest {
   fn as_form(&self) -> ArticleForm<'_> {
      ArticleForm {
         title:           &self.title,
         description:     &self.description,
         cover_image_url: self.cover_image_url.as_deref().unwrap_or_default(),
         category_id:     self.category_id,
      }
   }
}

// --- ハンドラ ---

/// GET /api/articles
///
/// 条件に合う記事を新しい順で返す。
pub async fn list_articles(
   State(state): State<Arc<ArticleState>>,
   Query(params): Query<ListArticlesParams>,
   jar: CookieJar,
) -> Response {
   let query = params.into_list_query();
   let token = session_token(&jar);

   match state
      .article_client
      .fetch_articles_list(&query, token.as_ref())
      .await
   {
      Ok(page) => Json(ApiResponse::new(page)).into_response(),
      Err(e) => log_and_convert_cms_error("記事一覧取得", e),
   }
}

/// GET /api/articles/featured
///
/// 最近の記事からランダムに選ぶ。CMS に問い合わせられない場合は空の一覧を返す。
pub async fn featured_articles(
   State(state): State<Arc<ArticleState>>,
   Query(params): Query<FeaturedParams>,
   jar: CookieJar,
) -> Response {
   let count = params.count.unwrap_or(FEATURED_COUNT);
   let token = session_token(&jar);

   let pool = match state
      .article_client
      .get_articles_list(Some(1), Some(FEATURED_POOL_SIZE), token.as_ref())
      .await
   {
      Ok(items) => items,
      Err(e) => {
         tracing::warn!("おすすめ記事の取得に失敗しました: {}", e);
         Vec::new()
      }
   };

   let picked = pick_random_items(pool, count, &mut rand::rng());
   Json(ApiResponse::new(picked)).into_response()
}

/// GET /api/articles/{document_id}
pub async fn get_article(
   State(state): State<Arc<ArticleState>>,
   Path(raw_id): Path<String>,
   jar: CookieJar,
) -> Response {
   let Ok(document_id) = DocumentId::new(raw_id.as_str()) else {
      return article_not_found_response(&raw_id);
   };
   let token = session_token(&jar);

   match state
      .article_client
      .get_article_by_document_id(&document_id, token.as_ref())
      .await
   {
      Ok(article) => Json(ApiResponse::new(article)).into_response(),
      Err(CmsError::NotFound) => article_not_found_response(document_id.as_str()),
      Err(e) => log_and_convert_cms_error("記事取得", e),
   }
}

/// POST /api/articles
pub async fn create_article(
   State(state): State<Arc<ArticleState>>,
   jar: CookieJar,
   Json(req): Json<ArticleRequest>,
) -> Response {
   let token = match require_session(&jar, SIGN_IN_TO_CREATE) {
      Ok(token) => token,
      Err(response) => return response,
   };
   let draft = match ArticleDraft::for_create(req.as_form()) {
      Ok(draft) => draft,
      Err(e) => return domain_error_response(e),
   };

   match state.article_client.create_article(&draft, &token).await {
      Ok(article) => {
         log_business_event!(
            event.category = event::category::ARTICLE,
            event.action = event::action::ARTICLE_CREATED,
            event.entity_type = event::entity_type::ARTICLE,
            event.entity_id = %article.document_id,
            event.result = event::result::SUCCESS,
            "記事を作成しました"
         );
         (StatusCode::CREATED, Json(ApiResponse::new(article))).into_response()
      }
      Err(e) => log_and_convert_cms_error("記事作成", e),
   }
}

/// PUT /api/articles/{document_id}
///
/// 作者本人のみ更新できる。
pub async fn update_article(
   State(state): State<Arc<ArticleState>>,
   Path(raw_id): Path<String>,
   jar: CookieJar,
   Json(req): Json<ArticleRequest>,
) -> Response {
   let token = match require_session(&jar, SIGN_IN_TO_UPDATE) {
      Ok(token) => token,
      Err(response) => return response,
   };
   let Ok(document_id) = DocumentId::new(raw_id.as_str()) else {
      return article_not_found_response(&raw_id);
   };
   if let Err(response) = authorize_author(&state, &document_id, &token).await {
      return response;
   }
   let draft = match ArticleDraft::for_update(req.as_form()) {
      Ok(draft) => draft,
      Err(e) => return domain_error_response(e),
   };

   match state
      .article_client
      .update_article(&document_id, &draft, &token)
      .await
   {
      Ok(article) => {
         log_business_event!(
            event.category = event::category::ARTICLE,
            event.action = event::action::ARTICLE_UPDATED,
            event.entity_type = event::entity_type::ARTICLE,
            event.entity_id = %document_id,
            event.result = event::result::SUCCESS,
            "記事を更新しました"
         );
         Json(ApiResponse::new(article)).into_response()
      }
      Err(CmsError::NotFound) => article_not_found_response(document_id.as_str()),
      Err(e) => log_and_convert_cms_error("記事更新", e),
   }
}

/// DELETE /api/articles/{document_id}
///
/// 作者本人のみ削除できる。
pub async fn delete_article(
   State(state): State<Arc<ArticleState>>,
   Path(raw_id): Path<String>,
   jar: CookieJar,
) -> Response {
   let token = match require_session(&jar, SIGN_IN_TO_UPDATE) {
      Ok(token) => token,
      Err(response) => return response,
   };
   let Ok(document_id) = DocumentId::new(raw_id.as_str()) else {
      return article_not_found_response(&raw_id);
   };
   if let Err(response) = authorize_author(&state, &document_id, &token).await {
      return response;
   }

   match state
      .article_client
      .delete_article(&document_id, &token)
      .await
   {
      Ok(()) => {
         log_business_event!(
            event.category = event::category::ARTICLE,
            event.action = event::action::ARTICLE_DELETED,
            event.entity_type = event::entity_type::ARTICLE,
            event.entity_id = %document_id,
            event.result = event::result::SUCCESS,
            "記事を削除しました"
         );
         StatusCode::NO_CONTENT.into_response()
      }
      Err(CmsError::NotFound) => article_not_found_response(document_id.as_str()),
      Err(e) => log_and_convert_cms_error("記事削除", e),
   }
}

// --- ヘルパー ---

/// トークンの持ち主が記事の作者であることを確認する
async fn authorize_author(
   state: &ArticleState,
   document_id: &DocumentId,
   token: &AccessToken,
) -> Result<(), Response> {
   let (article, user) = tokio::join!(
      state
         .article_client
         .get_article_by_document_id(document_id, Some(token)),
      state.user_client.get_current_user(token),
   );

   let user = match user {
      Ok(user) => user,
      Err(e) if e.is_auth_rejected() => return Err(unauthorized_response(SIGN_IN_TO_UPDATE)),
      Err(e) => return Err(log_and_convert_cms_error("ログインユーザー取得", e)),
   };
   let article = match article {
      Ok(article) => article,
      Err(CmsError::NotFound) => return Err(article_not_found_response(document_id.as_str())),
      Err(e) => return Err(log_and_convert_cms_error("記事取得", e)),
   };

   article
      .summary
      .ensure_authored_by(&user)
      .map_err(domain_error_response)
}

fn article_not_found_response(document_id: &str) -> Response {
   domain_error_response(DomainError::NotFound {
      entity_type: "Article",
      id:          document_id.to_string(),
   })
}
