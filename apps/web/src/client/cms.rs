//! # CMS クライアント
//!
//! TravelHub Web から CMS の REST API への通信を担当する。
//!
//! ## エンドポイント
//!
//! - `GET /api/articles` - 記事一覧（`populate` / `sort` / `pagination[...]` / `filters[...]`）
//! - `GET|PUT|DELETE /api/articles/{documentId}` - 記事の取得・更新・削除
//! - `POST /api/articles` - 記事作成
//! - `GET|POST /api/categories` - カテゴリ一覧・作成
//! - `POST /api/comments` - コメント投稿
//! - `GET /api/comments/{documentId}?populate=user` - コメント作者の取得
//! - `GET /api/users/me` - トークンの持ち主
//!
//! 認証エンドポイント（`/api/auth/local*`）は [`crate::client::auth_service`] が担当する。

mod article_client;
mod category_client;
mod client_impl;
mod comment_client;
mod error;
mod response;
mod types;
mod user_client;

pub use article_client::CmsArticleClient;
pub use category_client::CmsCategoryClient;
pub use client_impl::{CmsClient, CmsClientImpl};
pub use comment_client::CmsCommentClient;
pub use error::CmsError;
pub use types::{ArticleEntity, CategoryEntity, CommentEntity, UserEntity};
pub use user_client::CmsUserClient;
