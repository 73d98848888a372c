//! # セッションハンドラ
//!
//! ログイン済みトークンを HTTP-only Cookie に写すエンドポイント。
//!
//! ## エンドポイント
//!
//! - `POST /api/auth/session` - `{token, remember?}` を受け取り Cookie を設定
//! - `DELETE /api/auth/session` - Cookie を削除

use std::sync::Arc;

use axum::{
   Json,
   extract::{State, rejection::JsonRejection},
   http::StatusCode,
   response::{IntoResponse, Response},
};
use axum_extra::extract::{
   CookieJar,
   cookie::{Cookie, SameSite},
};
use serde::Deserialize;
use travelhub_domain::user::AccessToken;
use travelhub_shared::{event_log::event, log_business_event};

use crate::error::{SESSION_COOKIE_NAME, validation_error_response};

/// 「ログインしたままにする」場合の Cookie 有効期限（秒）
const SESSION_MAX_AGE: i64 = 60 * 60 * 24 * 30; // 30日

/// セッションハンドラの共有状態
pub struct SessionState {
   /// Cookie に Secure 属性を付けるか
   pub secure_cookies: bool,
}

/// セッション設定リクエスト
#[derive(Debug, Default, Deserialize)]
pub struct SetSessionRequest {
   #[serde(default)]
   pub token:    Option<String>,
   #[serde(default)]
   pub remember: Option<bool>,
}

/// セッション Cookie を構築する
///
/// `remember == false` のときは Max-Age を付けずブラウザセッション限りにする。
fn build_session_cookie(token: &AccessToken, remember: bool, secure: bool) -> Cookie<'static> {
   let mut builder = Cookie::build((SESSION_COOKIE_NAME, token.as_str().to_string()))
      .path("/")
      .http_only(true)
      .same_site(SameSite::Lax)
      .secure(secure);

   if remember {
      builder = builder.max_age(time::Duration::seconds(SESSION_MAX_AGE));
   }

   builder.build()
}

/// Cookie をクリアするための Cookie を構築する
fn build_clear_cookie(secure: bool) -> Cookie<'static> {
   Cookie::build((SESSION_COOKIE_NAME, ""))
      .path("/")
      .max_age(time::Duration::seconds(0))
      .http_only(true)
      .same_site(SameSite::Lax)
      .secure(secure)
      .build()
}

/// POST /api/auth/session
///
/// ボディが JSON として読めない場合もトークンなしとして扱う。
pub async fn set_session(
   State(state): State<Arc<SessionState>>,
   jar: CookieJar,
   body: Result<Json<SetSessionRequest>, JsonRejection>,
) -> Response {
   let request = body.map(|Json(req)| req).unwrap_or_default();

   let Some(token) = request.token.and_then(AccessToken::new) else {
      return validation_error_response("Token is required");
   };
   let remember = request.remember != Some(false);

   log_business_event!(
      event.category = event::category::AUTH,
      event.action = event::action::SESSION_SET,
      event.entity_type = event::entity_type::SESSION,
      event.result = event::result::SUCCESS,
      remember,
      "セッション Cookie を設定しました"
   );

   let jar = jar.add(build_session_cookie(&token, remember, state.secure_cookies));
   (jar, StatusCode::NO_CONTENT).into_response()
}

/// DELETE /api/auth/session
pub async fn clear_session(State(state): State<Arc<SessionState>>, jar: CookieJar) -> Response {
   log_business_event!(
      event.category = event::category::AUTH,
      event.action = event::action::SESSION_CLEARED,
      event.entity_type = event::entity_type::SESSION,
      event.result = event::result::SUCCESS,
      "セッション Cookie を削除しました"
   );

   let jar = jar.add(build_clear_cookie(state.secure_cookies));
   (jar, StatusCode::NO_CONTENT).into_response()
}

#[cfg(test)]
mod tests {
   use axum::{
      Router,
      body::{Body, to_bytes},
      http::{Method, Request, header},
      routing::post,
   };
   use pretty_assertions::assert_eq;
   use rstest::rstest;
   use tower::ServiceExt;
   use travelhub_shared::ErrorResponse;

   use super::*;

   fn create_test_app(secure_cookies: bool) -> Router {
      Router::new()
         .route("/api/auth/session", post(set_session).delete(clear_session))
         .with_state(Arc::new(SessionState { secure_cookies }))
   }

   fn post_session(body: &str) -> Request<Body> {
      Request::builder()
         .method(Method::POST)
         .uri("/api/auth/session")
         .header(header::CONTENT_TYPE, "application/json")
         .body(Body::from(body.to_string()))
         .unwrap()
   }

   fn set_cookie_header(response: &axum::response::Response) -> String {
      response
         .headers()
         .get(header::SET_COOKIE)
         .expect("Set-Cookie ヘッダーが存在すること")
         .to_str()
         .unwrap()
         .to_string()
   }

   #[tokio::test]
   async fn test_トークンを受け取ると30日有効のcookieを設定する() {
      let sut = create_test_app(false);

      let response = sut
         .oneshot(post_session(r#"{"token": "jwt-value"}"#))
         .await
         .unwrap();

      assert_eq!(response.status(), StatusCode::NO_CONTENT);
      let cookie = set_cookie_header(&response);
      assert!(cookie.starts_with("travelhub_token=jwt-value"));
      assert!(cookie.contains("HttpOnly"));
      assert!(cookie.contains("SameSite=Lax"));
      assert!(cookie.contains("Path=/"));
      assert!(cookie.contains("Max-Age=2592000"));
      assert!(!cookie.contains("Secure"));
   }

   #[tokio::test]
   async fn test_remember_falseならセッションcookieになる() {
      let sut = create_test_app(false);

      let response = sut
         .oneshot(post_session(r#"{"token": "jwt-value", "remember": false}"#))
         .await
         .unwrap();

      let cookie = set_cookie_header(&response);
      assert!(!cookie.contains("Max-Age"));
   }

   #[tokio::test]
   async fn test_本番環境ではsecure属性を付ける() {
      let sut = create_test_app(true);

      let response = sut
         .oneshot(post_session(r#"{"token": "jwt-value"}"#))
         .await
         .unwrap();

      assert!(set_cookie_header(&response).contains("Secure"));
   }

   #[rstest]
   #[case::トークンなし(r#"{}"#)]
   #[case::空白のみ(r#"{"token": "   "}"#)]
   #[case::jsonでない("not json")]
   #[tokio::test]
   async fn test_トークンがなければ400(#[case] body: &str) {
      let sut = create_test_app(false);

      let response = sut.oneshot(post_session(body)).await.unwrap();

      assert_eq!(response.status(), StatusCode::BAD_REQUEST);
      assert!(response.headers().get(header::SET_COOKIE).is_none());
      let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
      let error: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
      assert_eq!(error.detail, "Token is required");
   }

   #[tokio::test]
   async fn test_deleteでcookieを削除する() {
      let sut = create_test_app(false);

      let response = sut
         .oneshot(
            Request::builder()
               .method(Method::DELETE)
               .uri("/api/auth/session")
               .body(Body::empty())
               .unwrap(),
         )
         .await
         .unwrap();

      assert_eq!(response.status(), StatusCode::NO_CONTENT);
      let cookie = set_cookie_header(&response);
      assert!(cookie.starts_with("travelhub_token="));
      assert!(cookie.contains("Max-Age=0"));
   }
}
