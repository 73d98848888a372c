//! # TravelHub インフラ層
//!
//! ログイン状態を保持するセッションストアを提供する。
//!
//! ## 設計方針
//!
//! セッションストアは認証ヘルパーに明示的に注入する。
//! グローバルな保存領域は持たず、用途に応じて実装を差し替える。
//!
//! | 実装 | 用途 |
//! |------|------|
//! | [`InMemorySessionStore`] | テスト、プロセス内で完結する利用 |
//! | [`FileSessionStore`] | CLI などプロセスをまたいでログイン状態を残す利用 |
//!
//! ## 依存関係
//!
//! ```text
//! web → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`error`] - インフラ層エラー定義
//! - [`session`] - セッションストア
//!
//! ## 使用例
//!
//! ```rust
//! use travelhub_infra::{InMemorySessionStore, SessionStore};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = InMemorySessionStore::new();
//! assert!(store.token().await.unwrap().is_none());
//! # }
//! ```

pub mod error;
pub mod session;

pub use error::InfraError;
pub use session::{FileSessionStore, InMemorySessionStore, SessionStore, TOKEN_KEY, USER_KEY};
