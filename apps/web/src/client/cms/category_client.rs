//! カテゴリ関連の CMS クライアント

use async_trait::async_trait;
use reqwest::Method;
use travelhub_domain::{
   category::{CategoryOption, NewCategory},
   user::AccessToken,
};

use super::{
   client_impl::CmsClientImpl,
   error::CmsError,
   response::handle_response,
   types::{CategoryEntity, CategoryPayload, CmsListResponse, CmsSingleResponse},
};

/// カテゴリ関連の CMS クライアントトレイト
#[async_trait]
pub trait CmsCategoryClient: Send + Sync {
   /// カテゴリ一覧を取得する（`GET /api/categories`）
   async fn get_categories_list(
      &self,
      token: Option<&AccessToken>,
   ) -> Result<Vec<CategoryOption>, CmsError>;

   /// カテゴリを作成する（`POST /api/categories`）
   async fn create_category(
      &self,
      category: &NewCategory,
      token: &AccessToken,
   ) -> Result<CategoryOption, CmsError>;
}

#[async_trait]
impl CmsCategoryClient for CmsClientImpl {
   #[tracing::instrument(skip_all, level = "debug")]
   async fn get_categories_list(
      &self,
      token: Option<&AccessToken>,
   ) -> Result<Vec<CategoryOption>, CmsError> {
      let response = self
         .request(Method::GET, "/api/categories", token)
         .send()
         .await?;
      let body: CmsListResponse<CategoryEntity> = handle_response(response).await?;

      Ok(body.data.into_iter().map(CategoryOption::from).collect())
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn create_category(
      &self,
      category: &NewCategory,
      token: &AccessToken,
   ) -> Result<CategoryOption, CmsError> {
      let response = self
         .request(Method::POST, "/api/categories", Some(token))
         .json(&CategoryPayload::wrap(category))
         .send()
         .await?;
      let body: CmsSingleResponse<CategoryEntity> = handle_response(response).await?;

      Ok(body.into_found()?.into())
   }
}
