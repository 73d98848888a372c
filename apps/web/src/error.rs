//! # Web エラーハンドリング
//!
//! HTTP API のエラー定義と、axum レスポンスへの変換。
//!
//! 各ハンドラが共通で使うヘルパー関数を集約する。エラーボディは
//! RFC 9457 形式の [`ErrorResponse`]。

use axum::{
   Json,
   http::StatusCode,
   response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use travelhub_domain::{DomainError, user::AccessToken};
use travelhub_shared::{
   ErrorResponse,
   event_log::error::{category as error_category, kind as error_kind},
};

use crate::client::CmsError;

/// セッション Cookie 名
pub const SESSION_COOKIE_NAME: &str = "travelhub_token";

// --- 共通ヘルパー関数 ---

/// Cookie からセッショントークンを取得する
pub fn session_token(jar: &CookieJar) -> Option<AccessToken> {
   jar.get(SESSION_COOKIE_NAME)
      .and_then(|cookie| AccessToken::new(cookie.value()))
}

/// セッショントークンを必須とする
///
/// Cookie がなければ `detail` を載せた 401 を返す。
pub fn require_session(jar: &CookieJar, detail: &str) -> Result<AccessToken, Response> {
   session_token(jar).ok_or_else(|| unauthorized_response(detail))
}

// --- IntoResponse for CmsError ---

impl IntoResponse for CmsError {
   fn into_response(self) -> Response {
      match self {
         CmsError::NotFound => {
            (StatusCode::NOT_FOUND, Json(ErrorResponse::not_found("Resource not found."))).into_response()
         }
         CmsError::Api { status: 400, message } => validation_error_response(&message),
         CmsError::Api { status: 401, message } => unauthorized_response(&message),
         CmsError::Api { status: 403, message } => forbidden_response(&message),
         err @ CmsError::Api { .. } => bad_gateway_response(&err.to_string()),
         CmsError::Network(_) | CmsError::Decode(_) => {
            bad_gateway_response("Unable to reach the content service.")
         }
      }
   }
}

/// CMS エラーをログ付きでレスポンスに変換する
///
/// 4xx 以外（5xx・通信エラー・不正なボディ）はコンテキスト付きで `tracing::error!` を出力する。
pub fn log_and_convert_cms_error(context: &str, err: CmsError) -> Response {
   let is_client_error = err.status().is_some_and(|s| (400..500).contains(&s));
   if !is_client_error {
      tracing::error!(
         error.category = error_category::EXTERNAL_SERVICE,
         error.kind = error_kind::CMS_REQUEST,
         "{}で CMS エラー: {}",
         context,
         err
      );
   }
   err.into_response()
}

/// ドメインエラーをレスポンスに変換する
pub fn domain_error_response(err: DomainError) -> Response {
   let detail = err.user_message();
   match err {
      DomainError::Validation(_) => validation_error_response(&detail),
      DomainError::NotFound { entity_type, .. } => not_found_response(
         &format!("{}-not-found", entity_type.to_lowercase()),
         &format!("{entity_type} Not Found"),
         &detail,
      ),
      DomainError::Forbidden(_) => forbidden_response(&detail),
   }
}

// --- レスポンスヘルパー ---

/// 未認証レスポンス
pub fn unauthorized_response(detail: &str) -> Response {
   (
      StatusCode::UNAUTHORIZED,
      Json(ErrorResponse::unauthorized(detail)),
   )
      .into_response()
}

/// 403 Forbidden レスポンス
pub fn forbidden_response(detail: &str) -> Response {
   (StatusCode::FORBIDDEN, Json(ErrorResponse::forbidden(detail))).into_response()
}

/// 404 Not Found レスポンス
pub fn not_found_response(error_type_suffix: &str, title: &str, detail: &str) -> Response {
   (
      StatusCode::NOT_FOUND,
      Json(ErrorResponse::new(error_type_suffix, title, 404, detail)),
   )
      .into_response()
}

/// バリデーションエラーレスポンス
pub fn validation_error_response(detail: &str) -> Response {
   (
      StatusCode::BAD_REQUEST,
      Json(ErrorResponse::validation_error(detail)),
   )
      .into_response()
}

/// 502 Bad Gateway レスポンス
pub fn bad_gateway_response(detail: &str) -> Response {
   (StatusCode::BAD_GATEWAY, Json(ErrorResponse::bad_gateway(detail))).into_response()
}
