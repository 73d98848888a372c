//! # 認証ヘルパー
//!
//! ログイン・会員登録の呼び出しと、セッションストアへのトークン / ユーザー保存を担当する。
//!
//! ## セッションの二重化
//!
//! ログインに成功したトークンは [`SessionStore`] に保存し、同時に
//! Web サーバーのセッションエンドポイント（`POST /api/auth/session`）へ送って
//! HTTP-only Cookie にも写す。Cookie への反映に失敗してもログイン自体は成功とする。
//!
//! ## トークンの有効期限
//!
//! [`AuthHelper::has_stored_token`] は JWT の `exp` を確認し、期限切れのトークンは
//! 保存されていないものとして扱う。

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use travelhub_domain::{
   DomainError,
   auth::{LoginCredentials, Registration, RegistrationForm},
   clock::{Clock, SystemClock},
   user::{AccessToken, SessionUser},
};
use travelhub_infra::{InfraError, SessionStore};
use travelhub_shared::{
   event_log::{
      error::{category as error_category, kind as error_kind},
      event,
   },
   log_business_event,
};

use crate::{
   client::{AuthServiceClient, AuthServiceError, AuthSession},
   middleware::request_id::inject_request_id,
};

/// 認証ヘルパーのエラー
#[derive(Debug, Error)]
pub enum AuthError {
   /// 送信前の入力検証エラー
   #[error(transparent)]
   Validation(#[from] DomainError),

   /// CMS の認証エンドポイントのエラー
   #[error(transparent)]
   Service(#[from] AuthServiceError),

   /// セッションストアのエラー
   #[error("セッションストアの操作に失敗しました: {0}")]
   Store(#[from] InfraError),
}

impl AuthError {
   /// フォームに表示するメッセージ
   pub fn user_message(&self) -> String {
      match self {
         AuthError::Validation(e) => e.user_message(),
         AuthError::Service(e) => e.to_string(),
         AuthError::Store(_) => "Unable to save your session. Please try again.".to_string(),
      }
   }
}

// --- セッションミラー ---

/// セッションミラーのエラー
#[derive(Debug, Error)]
#[error("セッションエンドポイントへの反映に失敗しました: {0}")]
pub struct SessionMirrorError(String);

impl From<reqwest::Error> for SessionMirrorError {
   fn from(err: reqwest::Error) -> Self {
      SessionMirrorError(err.to_string())
   }
}

/// トークンを HTTP-only Cookie に写すための抽象
#[async_trait]
pub trait SessionMirror: Send + Sync {
   /// Cookie にトークンを設定する
   async fn set_session(
      &self,
      token: &AccessToken,
      remember: bool,
   ) -> Result<(), SessionMirrorError>;

   /// Cookie を削除する
   async fn clear_session(&self) -> Result<(), SessionMirrorError>;
}

#[derive(Serialize)]
struct SetSessionBody<'a> {
   token:    &'a str,
   remember: bool,
}

/// セッションエンドポイントを HTTP で呼び出す実装
#[derive(Clone)]
pub struct HttpSessionMirror {
   endpoint: String,
   client:   reqwest::Client,
}

impl HttpSessionMirror {
   /// 新しい HttpSessionMirror を作成する
   ///
   /// # 引数
   ///
   /// - `web_base_url`: TravelHub Web のベース URL（例: `http://localhost:13000`）
   pub fn new(web_base_url: &str) -> Self {
      Self::with_client(web_base_url, reqwest::Client::new())
   }

   /// Cookie を保持するクライアントなど、任意の reqwest クライアントで作成する
   pub fn with_client(web_base_url: &str, client: reqwest::Client) -> Self {
      Self {
         endpoint: format!("{}/api/auth/session", web_base_url.trim_end_matches('/')),
         client,
      }
   }
}

#[async_trait]
impl SessionMirror for HttpSessionMirror {
   async fn set_session(
      &self,
      token: &AccessToken,
      remember: bool,
   ) -> Result<(), SessionMirrorError> {
      let body = SetSessionBody {
         token: token.as_str(),
         remember,
      };
      let response = inject_request_id(self.client.post(&self.endpoint).json(&body))
         .send()
         .await?;
      response.error_for_status()?;
      Ok(())
   }

   async fn clear_session(&self) -> Result<(), SessionMirrorError> {
      let response = inject_request_id(self.client.delete(&self.endpoint))
         .send()
         .await?;
      response.error_for_status()?;
      Ok(())
   }
}

// --- 認証ヘルパー ---

/// 認証ヘルパー
pub struct AuthHelper {
   client: Arc<dyn AuthServiceClient>,
   store:  Arc<dyn SessionStore>,
   mirror: Arc<dyn SessionMirror>,
   clock:  Arc<dyn Clock>,
}

impl AuthHelper {
   pub fn new(
      client: Arc<dyn AuthServiceClient>,
      store: Arc<dyn SessionStore>,
      mirror: Arc<dyn SessionMirror>,
   ) -> Self {
      Self {
         client,
         store,
         mirror,
         clock: Arc::new(SystemClock),
      }
   }

   /// トークン期限判定に使う時計を差し替える
   pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
      self.clock = clock;
      self
   }

   /// ログインする
   ///
   /// 成功したらトークンとユーザーをストアに保存し、Cookie にも写す。
   /// `remember == false` の場合 Cookie はブラウザセッション限りになる。
   pub async fn login_user(
      &self,
      identifier: &str,
      password: &str,
      remember: bool,
   ) -> Result<AuthSession, AuthError> {
      let credentials = LoginCredentials::new(identifier, password)?;

      let session = match self.client.login(&credentials).await {
         Ok(session) => session,
         Err(e) => {
            log_business_event!(
               event.category = event::category::AUTH,
               event.action = event::action::LOGIN_FAILURE,
               event.result = event::result::FAILURE,
               reason = %e,
               "ログインに失敗しました"
            );
            return Err(e.into());
         }
      };

      self.store.save(&session.token, &session.user).await?;

      if let Err(e) = self.mirror.set_session(&session.token, remember).await {
         tracing::warn!(
            error.category = error_category::EXTERNAL_SERVICE,
            error.kind = error_kind::SESSION_MIRROR,
            "{}",
            e
         );
      }

      log_business_event!(
         event.category = event::category::AUTH,
         event.action = event::action::LOGIN_SUCCESS,
         event.entity_type = event::entity_type::USER,
         event.entity_id = session.user.id,
         event.result = event::result::SUCCESS,
         "ログインしました"
      );

      Ok(session)
   }

   /// 会員登録する
   ///
   /// 登録後に自動ではログインしない。
   pub async fn register_user(&self, form: RegistrationForm<'_>) -> Result<SessionUser, AuthError> {
      let registration = Registration::new(form)?;
      let session = self.client.register(&registration).await?;

      log_business_event!(
         event.category = event::category::AUTH,
         event.action = event::action::REGISTERED,
         event.entity_type = event::entity_type::USER,
         event.entity_id = session.user.id,
         event.result = event::result::SUCCESS,
         "会員登録しました"
      );

      Ok(session.user)
   }

   /// 有効なトークンが保存されているか
   ///
   /// ストアの読み取りに失敗した場合と、トークンが期限切れの場合は `false`。
   pub async fn has_stored_token(&self) -> bool {
      self.stored_token().await.is_some()
   }

   /// 保存されたトークンを取得する（期限切れは `None`）
   pub async fn stored_token(&self) -> Option<AccessToken> {
      match self.store.token().await {
         Ok(token) => token.filter(|t| !t.is_expired_at(self.clock.now())),
         Err(e) => {
            tracing::error!(
               error.category = error_category::INFRASTRUCTURE,
               error.kind = error_kind::SESSION,
               "トークンの読み取りに失敗しました: {}",
               e
            );
            None
         }
      }
   }

   /// 保存されたユーザーを取得する
   pub async fn get_stored_user(&self) -> Option<SessionUser> {
      match self.store.user().await {
         Ok(user) => user,
         Err(e) => {
            tracing::error!(
               error.category = error_category::INFRASTRUCTURE,
               error.kind = error_kind::SESSION,
               "ユーザー情報の読み取りに失敗しました: {}",
               e
            );
            None
         }
      }
   }

   /// 保存されたトークンとユーザーを消し、Cookie も削除する
   pub async fn clear_stored_user(&self) -> Result<(), AuthError> {
      self.store.clear().await?;

      if let Err(e) = self.mirror.clear_session().await {
         tracing::warn!(
            error.category = error_category::EXTERNAL_SERVICE,
            error.kind = error_kind::SESSION_MIRROR,
            "{}",
            e
         );
      }

      log_business_event!(
         event.category = event::category::AUTH,
         event.action = event::action::SESSION_CLEARED,
         event.entity_type = event::entity_type::SESSION,
         event.result = event::result::SUCCESS,
         "セッションを破棄しました"
      );

      Ok(())
   }
}
