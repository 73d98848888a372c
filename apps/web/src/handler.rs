//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュールで re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、検証はドメイン層、永続化は CMS に委譲
//!
//! ## ハンドラ一覧
//!
//! - `health`: ヘルスチェック
//! - `session`: セッション Cookie の設定・削除
//! - `article`: 記事の一覧・詳細・作成・更新・削除
//! - `category`: カテゴリの一覧・作成
//! - `comment`: コメント投稿

pub mod article;
pub mod category;
pub mod comment;
pub mod health;
pub mod session;

pub use article::{
   ArticleState,
   create_article,
   delete_article,
   featured_articles,
   get_article,
   list_articles,
   update_article,
};
pub use category::{CategoryState, create_category, list_categories};
pub use comment::{CommentState, create_comment};
pub use health::health_check;
pub use session::{SessionState, clear_session, set_session};
