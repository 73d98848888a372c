//! # カテゴリ API ハンドラ
//!
//! ## エンドポイント
//!
//! - `GET /api/categories` - カテゴリ一覧
//! - `POST /api/categories` - カテゴリ作成（要ログイン）

use std::sync::Arc;

use axum::{
   Json,
   extract::State,
   http::StatusCode,
   response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use travelhub_domain::category::NewCategory;
use travelhub_shared::{ApiResponse, event_log::event, log_business_event};

use crate::{
   client::CmsCategoryClient,
   error::{domain_error_response, log_and_convert_cms_error, require_session, session_token},
};

/// カテゴリ API の共有状態
pub struct CategoryState {
   pub cms_client: Arc<dyn CmsCategoryClient>,
}

/// カテゴリ作成リクエスト
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
   #[serde(default)]
   pub name:        String,
   pub description: Option<String>,
}

/// GET /api/categories
pub async fn list_categories(State(state): State<Arc<CategoryState>>, jar: CookieJar) -> Response {
   let token = session_token(&jar);

   match state.cms_client.get_categories_list(token.as_ref()).await {
      Ok(categories) => Json(ApiResponse::new(categories)).into_response(),
      Err(e) => log_and_convert_cms_error("カテゴリ一覧取得", e),
   }
}

/// POST /api/categories
pub async fn create_category(
   State(state): State<Arc<CategoryState>>,
   jar: CookieJar,
   Json(req): Json<CreateCategoryRequest>,
) -> Response {
   let token = match require_session(&jar, "Please sign in to add a category.") {
      Ok(token) => token,
      Err(response) => return response,
   };
   let category = match NewCategory::new(req.name, req.description) {
      Ok(category) => category,
      Err(e) => return domain_error_response(e),
   };

   match state.cms_client.create_category(&category, &token).await {
      Ok(created) => {
         log_business_event!(
            event.category = event::category::ARTICLE,
            event.action = event::action::CATEGORY_CREATED,
            event.entity_type = event::entity_type::CATEGORY,
            event.entity_id = %created.document_id,
            event.result = event::result::SUCCESS,
            "カテゴリを作成しました"
         );
         (StatusCode::CREATED, Json(ApiResponse::new(created))).into_response()
      }
      Err(e) => log_and_convert_cms_error("カテゴリ作成", e),
   }
}
