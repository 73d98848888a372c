//! # ドメイン層エラー定義
//!
//! 送信前バリデーションの失敗や、存在しないエンティティ・権限不足を表現する。
//!
//! ## エラーの種類と HTTP ステータスの対応
//!
//! | エラー種別 | HTTP ステータス | 用途 |
//! |-----------|----------------|------|
//! | `Validation` | 400 Bad Request | 入力値の検証失敗 |
//! | `NotFound` | 404 Not Found | エンティティが存在しない |
//! | `Forbidden` | 403 Forbidden | 他人の記事の編集・削除 |
//!
//! `Validation` と `Forbidden` のメッセージは画面にそのまま表示されるため英語で書く。
//!
//! ## 使用例
//!
//! ```rust
//! use travelhub_domain::DomainError;
//!
//! fn validate_title(title: &str) -> Result<(), DomainError> {
//!     if title.trim().is_empty() {
//!         return Err(DomainError::Validation("Title is required".to_string()));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_title("  ").is_err());
//! ```

use thiserror::Error;

/// ドメイン層で発生するエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// # 例
    ///
    /// - 必須フィールドが未入力
    /// - 文字数制限の超過
    /// - パスワードポリシー違反、確認入力の不一致
    #[error("{0}")]
    Validation(String),

    /// エンティティが見つからない
    #[error("{entity_type} が見つかりません: {id}")]
    NotFound {
        /// エンティティの種類（"Article", "Category" など）
        entity_type: &'static str,
        /// 検索に使用した識別子
        id:          String,
    },

    /// 権限エラー
    ///
    /// ログイン済みだが、記事の作者ではない場合に使用する。
    #[error("{0}")]
    Forbidden(String),
}

impl DomainError {
    /// 画面に表示するメッセージを返す
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) | Self::Forbidden(msg) => msg.clone(),
            Self::NotFound { entity_type, .. } => {
                format!("{entity_type} not found.")
            }
        }
    }
}
