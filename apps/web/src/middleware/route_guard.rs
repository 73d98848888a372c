//! # ルートガード
//!
//! ログインが必要な画面パスへのアクセスを、セッション Cookie がなければ
//! ログイン画面へリダイレクトする。戻り先は `redirect` クエリで渡す。

use axum::{
   extract::Request,
   middleware::Next,
   response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;

use crate::error::session_token;

/// ログインが必要なパスの接頭辞
pub const PROTECTED_PATHS: &[&str] = &["/articles/create"];

/// パスがログイン必須か
pub fn is_protected(path: &str) -> bool {
   PROTECTED_PATHS.iter().any(|prefix| path.starts_with(prefix))
}

/// ログイン画面へのリダイレクト先 URL
pub fn login_redirect_location(path: &str) -> String {
   format!("/login?redirect={}", urlencoding::encode(path))
}

/// ログイン必須パスでセッション Cookie を要求するミドルウェア
pub async fn require_session_cookie(jar: CookieJar, request: Request, next: Next) -> Response {
   let path = request.uri().path();
   if is_protected(path) && session_token(&jar).is_none() {
      tracing::debug!(path, "未ログインのためログイン画面へリダイレクト");
      return Redirect::temporary(&login_redirect_location(path)).into_response();
   }

   next.run(request).await
}
