//! CMS クライアントのエラー型

use thiserror::Error;

/// CMS クライアントエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CmsError {
   /// リソースが存在しない（404 または `data: null`）
   #[error("Resource not found")]
   NotFound,

   /// 2xx 以外のレスポンス
   #[error("API request failed ({status}): {message}")]
   Api { status: u16, message: String },

   /// ネットワークエラー
   #[error("Network error: {0}")]
   Network(String),

   /// 成功レスポンスのボディを解釈できない
   #[error("Unexpected response body: {0}")]
   Decode(String),
}

impl CmsError {
   /// CMS が返した HTTP ステータス（通信エラー時は `None`）
   pub fn status(&self) -> Option<u16> {
      match self {
         CmsError::NotFound => Some(404),
         CmsError::Api { status, .. } => Some(*status),
         CmsError::Network(_) | CmsError::Decode(_) => None,
      }
   }

   /// トークンが拒否されたか（401 / 403）
   pub fn is_auth_rejected(&self) -> bool {
      matches!(self.status(), Some(401 | 403))
   }
}

impl From<reqwest::Error> for CmsError {
   fn from(err: reqwest::Error) -> Self {
      if err.is_decode() {
         CmsError::Decode(err.to_string())
      } else {
         CmsError::Network(err.to_string())
      }
   }
}

impl From<serde_json::Error> for CmsError {
   fn from(err: serde_json::Error) -> Self {
      CmsError::Decode(err.to_string())
   }
}
