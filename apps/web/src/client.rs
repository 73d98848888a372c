//! # 外部 API クライアント
//!
//! CMS の REST API（コンテンツ・認証）との通信を担当する。

pub mod auth_service;
pub mod cms;

pub use auth_service::{
   AUTH_UNAVAILABLE_MESSAGE,
   AuthServiceClient,
   AuthServiceClientImpl,
   AuthServiceError,
   AuthSession,
};
pub use cms::{
   CmsArticleClient,
   CmsCategoryClient,
   CmsClient,
   CmsClientImpl,
   CmsCommentClient,
   CmsError,
   CmsUserClient,
};
