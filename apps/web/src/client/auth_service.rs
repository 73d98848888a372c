//! # 認証クライアント
//!
//! TravelHub Web から CMS の認証エンドポイントへの通信を担当する。
//!
//! ## エンドポイント
//!
//! - `POST /api/auth/local` - ログイン（`{identifier, password}`）
//! - `POST /api/auth/local/register` - 会員登録（`{username, email, password}`）
//!
//! どちらも成功時は `{ jwt, user }` を返す。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use travelhub_domain::{
   auth::{LoginCredentials, Registration},
   user::{AccessToken, SessionUser},
};
use travelhub_shared::event_log::error::{category as error_category, kind as error_kind};

use super::cms::UserEntity;
use crate::middleware::request_id::inject_request_id;

/// 認証サービスに到達できないときのメッセージ
pub const AUTH_UNAVAILABLE_MESSAGE: &str = "Unable to reach the authentication service.";

/// 認証クライアントエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthServiceError {
   /// CMS が拒否した（メッセージはそのままフォームに表示する）
   #[error("{message}")]
   Rejected { status: u16, message: String },

   /// 到達できない、または応答を解釈できない
   #[error("Unable to reach the authentication service.")]
   Unavailable,
}

impl From<reqwest::Error> for AuthServiceError {
   fn from(err: reqwest::Error) -> Self {
      tracing::warn!(
         error.category = error_category::EXTERNAL_SERVICE,
         error.kind = error_kind::CMS_AUTH,
         "認証リクエストが失敗しました: {}",
         err
      );
      AuthServiceError::Unavailable
   }
}

// --- レスポンス型 ---

/// 認証成功レスポンス
#[derive(Debug, Deserialize)]
struct AuthSuccessResponse {
   jwt:  String,
   user: UserEntity,
}

/// 認証エラーレスポンス
///
/// `error.message`、なければトップレベルの `message` を使う。
#[derive(Debug, Deserialize)]
struct AuthErrorResponse {
   #[serde(default)]
   error:   Option<AuthErrorDetail>,
   #[serde(default)]
   message: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct AuthErrorDetail {
   #[serde(default)]
   message: Option<String>,
}

/// 認証済みセッション
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
   pub token: AccessToken,
   pub user:  SessionUser,
}

/// 失敗レスポンスのボディからユーザー向けメッセージを取り出す
///
/// JSON でなければ `None`。
fn rejection_message(status: u16, body: &str) -> Option<String> {
   let parsed: AuthErrorResponse = serde_json::from_str(body).ok()?;
   let message = parsed
      .error
      .and_then(|e| e.message)
      .or_else(|| parsed.message.and_then(|m| m.as_str().map(str::to_string)))
      .unwrap_or_else(|| format!("Request failed with status {status}"));
   Some(message)
}

/// 認証クライアントトレイト
///
/// テスト時にスタブを使用できるようトレイトで定義。
#[async_trait]
pub trait AuthServiceClient: Send + Sync {
   /// ログインする（`POST /api/auth/local`）
   async fn login(&self, credentials: &LoginCredentials) -> Result<AuthSession, AuthServiceError>;

   /// 会員登録する（`POST /api/auth/local/register`）
   async fn register(&self, registration: &Registration) -> Result<AuthSession, AuthServiceError>;
}

/// 認証クライアント実装
#[derive(Clone)]
pub struct AuthServiceClientImpl {
   base_url: String,
   client:   reqwest::Client,
}

impl AuthServiceClientImpl {
   /// 新しい AuthServiceClient を作成する
   ///
   /// # 引数
   ///
   /// - `base_url`: CMS のベース URL（例: `http://localhost:1337`）
   pub fn new(base_url: &str) -> Self {
      Self {
         base_url: base_url.trim_end_matches('/').to_string(),
         client:   reqwest::Client::new(),
      }
   }

   async fn post_auth<B: Serialize + Sync>(
      &self,
      path: &str,
      body: &B,
   ) -> Result<AuthSession, AuthServiceError> {
      let url = format!("{}{}", self.base_url, path);

      let response = inject_request_id(self.client.post(&url).json(body))
         .send()
         .await?;
      let status = response.status();
      let text = response.text().await?;

      if !status.is_success() {
         return Err(match rejection_message(status.as_u16(), &text) {
            Some(message) => AuthServiceError::Rejected {
               status: status.as_u16(),
               message,
            },
            None => AuthServiceError::Unavailable,
         });
      }

      let success: AuthSuccessResponse =
         serde_json::from_str(&text).map_err(|_| AuthServiceError::Unavailable)?;
      let token = AccessToken::new(success.jwt).ok_or(AuthServiceError::Unavailable)?;

      Ok(AuthSession {
         token,
         user: success.user.into(),
      })
   }
}

#[async_trait]
impl AuthServiceClient for AuthServiceClientImpl {
   #[tracing::instrument(skip_all, level = "debug")]
   async fn login(&self, credentials: &LoginCredentials) -> Result<AuthSession, AuthServiceError> {
      self.post_auth("/api/auth/local", credentials).await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(username = registration.username()))]
   async fn register(&self, registration: &Registration) -> Result<AuthSession, AuthServiceError> {
      self.post_auth("/api/auth/local/register", registration).await
   }
}
