//! CMS レスポンスの共通ハンドリング

use serde::de::DeserializeOwned;

use super::error::CmsError;

/// CMS レスポンスの共通ハンドリング
///
/// 成功時はボディを `T` にデシリアライズし、失敗時はステータスに応じた
/// `CmsError` を返す。404 は常に `NotFound`。
pub(super) async fn handle_response<T: DeserializeOwned>(
   response: reqwest::Response,
) -> Result<T, CmsError> {
   let response = check_status(response).await?;
   let body = response.text().await?;
   Ok(serde_json::from_str(&body)?)
}

/// ボディを使わないレスポンスの成否だけを判定する
pub(super) async fn handle_empty_response(response: reqwest::Response) -> Result<(), CmsError> {
   check_status(response).await.map(|_| ())
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, CmsError> {
   let status = response.status();

   if status.is_success() {
      return Ok(response);
   }

   if status == reqwest::StatusCode::NOT_FOUND {
      return Err(CmsError::NotFound);
   }

   let body = response.text().await.unwrap_or_default();
   let message = if body.trim().is_empty() {
      status.canonical_reason().unwrap_or_default().to_string()
   } else {
      body
   };

   Err(CmsError::Api {
      status: status.as_u16(),
      message,
   })
}
