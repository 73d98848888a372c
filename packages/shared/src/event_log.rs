//! # ビジネスイベントログとエラーコンテキストの構造化ヘルパー
//!
//! `jq` で調査しやすいよう、ログフィールドの命名規約とヘルパーマクロを提供する。
//!
//! ## ビジネスイベント
//!
//! [`log_business_event!`] マクロで出力する。`event.kind = "business_event"` マーカーが
//! 自動付与され、`jq 'select(.["event.kind"] == "business_event")'` でフィルタできる。
//!
//! ## エラーコンテキスト
//!
//! `tracing::error!` に `error.category` + `error.kind` フィールドを直接追加する。
//! 定数は [`error`] モジュールで提供。

/// ビジネスイベントを構造化ログとして出力する。
///
/// `event.kind = "business_event"` マーカーを自動付与し、
/// `tracing::info!` レベルで出力する。
///
/// ## 必須フィールド（慣例）
///
/// - `event.category`: イベントカテゴリ（[`event::category`] の定数を使用）
/// - `event.action`: アクション名（[`event::action`] の定数を使用）
/// - `event.result`: 結果（[`event::result`] の定数を使用）
#[macro_export]
macro_rules! log_business_event {
    ($($args:tt)*) => {
        ::tracing::info!(
            event.kind = "business_event",
            $($args)*
        )
    };
}

/// イベントフィールドの定数
pub mod event {
    /// イベントカテゴリ
    pub mod category {
        pub const ARTICLE: &str = "article";
        pub const AUTH: &str = "auth";
        pub const COMMUNITY: &str = "community";
    }

    /// イベントアクション
    pub mod action {
        // 記事
        pub const ARTICLE_CREATED: &str = "article.created";
        pub const ARTICLE_UPDATED: &str = "article.updated";
        pub const ARTICLE_DELETED: &str = "article.deleted";
        pub const CATEGORY_CREATED: &str = "category.created";

        // 認証
        pub const LOGIN_SUCCESS: &str = "auth.login_success";
        pub const LOGIN_FAILURE: &str = "auth.login_failure";
        pub const REGISTERED: &str = "auth.registered";
        pub const SESSION_SET: &str = "auth.session_set";
        pub const SESSION_CLEARED: &str = "auth.session_cleared";

        // コメント
        pub const COMMENT_POSTED: &str = "comment.posted";
    }

    /// エンティティ種別
    pub mod entity_type {
        pub const ARTICLE: &str = "article";
        pub const CATEGORY: &str = "category";
        pub const COMMENT: &str = "comment";
        pub const USER: &str = "user";
        pub const SESSION: &str = "session";
    }

    /// イベント結果
    pub mod result {
        pub const SUCCESS: &str = "success";
        pub const FAILURE: &str = "failure";
    }
}

/// エラーコンテキストフィールドの定数
pub mod error {
    /// エラーカテゴリ
    pub mod category {
        /// インフラストラクチャ（セッションストア）
        pub const INFRASTRUCTURE: &str = "infrastructure";
        /// 外部サービス呼び出し（CMS）
        pub const EXTERNAL_SERVICE: &str = "external_service";
    }

    /// エラー種別
    pub mod kind {
        pub const SESSION: &str = "session";
        pub const SESSION_MIRROR: &str = "session_mirror";
        pub const CMS_REQUEST: &str = "cms_request";
        pub const CMS_AUTH: &str = "cms_auth";
        pub const COMMENT_AUTHOR_LOOKUP: &str = "comment_author_lookup";
    }
}
