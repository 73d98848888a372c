//! ユーザー関連の CMS クライアント

use async_trait::async_trait;
use reqwest::Method;
use travelhub_domain::user::{AccessToken, SessionUser};

use super::{
   client_impl::CmsClientImpl,
   error::CmsError,
   response::handle_response,
   types::UserEntity,
};

/// ユーザー関連の CMS クライアントトレイト
#[async_trait]
pub trait CmsUserClient: Send + Sync {
   /// トークンの持ち主を取得する
   ///
   /// CMS の `GET /api/users/me` を呼び出す。レスポンスは `data` で包まれない。
   async fn get_current_user(&self, token: &AccessToken) -> Result<SessionUser, CmsError>;
}

#[async_trait]
impl CmsUserClient for CmsClientImpl {
   #[tracing::instrument(skip_all, level = "debug")]
   async fn get_current_user(&self, token: &AccessToken) -> Result<SessionUser, CmsError> {
      let response = self
         .request(Method::GET, "/api/users/me", Some(token))
         .send()
         .await?;
      let user: UserEntity = handle_response(response).await?;

      Ok(user.into())
   }
}
