//! # 記事
//!
//! 旅行記事の一覧・詳細ビュー モデルと、作成・更新フォームの入力値を定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 用途 |
//! |---|------------|------|
//! | [`DocumentId`] | ドキュメント ID | URL に使う安定した外部キー |
//! | [`ArticleListItem`] | 記事一覧項目 | 一覧・カードに表示する記事 |
//! | [`ArticleDetail`] | 記事詳細 | 本文とコメントを含む記事 |
//! | [`ArticlePage`] | 記事ページ | 一覧 1 ページ分とページネーション |
//! | [`ArticleDraft`] | 記事下書き | 作成・更新フォームの検証済み入力値 |
//!
//! ## 設計方針
//!
//! - **documentId が正**: 記事の識別は documentId で行い、数値 ID は
//!   コメントのリレーション設定など CMS が要求する場面でのみ使う
//! - **欠損値は既定値で埋める**: カテゴリ未設定は `"General"`、作者不明は
//!   `"Anonymous"`。カバー画像は `None` のまま保持し、表示時に
//!   [`crate::media::get_valid_image_url`] で置き換える

use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::{DomainError, comment::CommentView, pagination::Pagination, user::SessionUser};

/// カテゴリ未設定の記事に表示するカテゴリ名
pub const DEFAULT_CATEGORY_NAME: &str = "General";

/// 作者不明の記事に表示する作者名
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// 抜粋の最大文字数
pub const EXCERPT_MAX_CHARS: usize = 220;

/// 作者以外が編集・削除しようとしたときのメッセージ
pub const NOT_THE_AUTHOR_MESSAGE: &str = "You are not authorized to edit this article.";

/// ドキュメント ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(transparent)]
#[display("{_0}")]
pub struct DocumentId(String);

impl DocumentId {
    /// ドキュメント ID を作成する
    ///
    /// パスセグメントとして使うため、空文字列と `/` を含む値は受け付けない。
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into().trim().to_string();
        if value.is_empty() || value.contains('/') {
            return Err(DomainError::Validation(
                "Article identifier is invalid".to_string(),
            ));
        }
        Ok(Self(value))
    }

    /// 文字列参照を取得する
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 記事一覧項目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleListItem {
    pub id: i64,
    pub document_id: String,
    pub title: String,
    pub description: String,
    pub cover_image_url: Option<String>,
    pub category_name: String,
    pub author_name: String,
    pub author_id: Option<i64>,
    pub author_document_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ArticleListItem {
    /// 公開日の表示用文字列（例: `Mar 5, 2025`）
    pub fn published_label(&self) -> String {
        self.created_at.format("%b %-d, %Y").to_string()
    }

    /// 一覧カード用の抜粋
    ///
    /// [`EXCERPT_MAX_CHARS`] 文字を超える場合は末尾を `...` にして切り詰める。
    pub fn excerpt(&self) -> String {
        let text = self.description.trim();
        if text.chars().count() <= EXCERPT_MAX_CHARS {
            return text.to_string();
        }
        let head: String = text.chars().take(EXCERPT_MAX_CHARS - 3).collect();
        format!("{head}...")
    }

    /// ユーザーがこの記事の作者か
    pub fn is_authored_by(&self, user: &SessionUser) -> bool {
        user.owns(self.author_id, self.author_document_id.as_deref())
    }

    /// 作者でなければ `Forbidden` を返す
    pub fn ensure_authored_by(&self, user: &SessionUser) -> Result<(), DomainError> {
        if self.is_authored_by(user) {
            Ok(())
        } else {
            Err(DomainError::Forbidden(NOT_THE_AUTHOR_MESSAGE.to_string()))
        }
    }
}

/// 記事詳細
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDetail {
    #[serde(flatten)]
    pub summary:  ArticleListItem,
    pub body:     String,
    pub comments: Vec<CommentView>,
}

impl ArticleDetail {
    /// 本文を段落に分割する
    ///
    /// 空行で区切り、空の段落は除く。
    pub fn paragraphs(&self) -> Vec<&str> {
        self.body
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    }
}

/// 記事一覧の 1 ページ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticlePage {
    pub articles:   Vec<ArticleListItem>,
    pub pagination: Option<Pagination>,
}

define_validated_string! {
    /// 記事タイトル
    pub struct ArticleTitle {
        label: "Title",
        max_length: 200,
    }
}

define_validated_string! {
    /// 記事本文（CMS 上は description）
    pub struct ArticleStory {
        label: "Story",
        max_length: 20000,
    }
}

/// 記事フォームの入力値
#[derive(Debug, Clone, Copy, Default)]
pub struct ArticleForm<'a> {
    pub title:           &'a str,
    pub description:     &'a str,
    pub cover_image_url: &'a str,
    pub category_id:     Option<i64>,
}

/// 検証済みの記事入力値
///
/// 作成・更新どちらにも使う。カバー画像 URL は trim して空なら `None`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleDraft {
    pub title:           ArticleTitle,
    pub description:     ArticleStory,
    pub cover_image_url: Option<String>,
    pub category_id:     Option<i64>,
}

impl ArticleDraft {
    /// 新規作成フォームを検証する
    pub fn for_create(form: ArticleForm<'_>) -> Result<Self, DomainError> {
        Self::validate(
            form,
            "Please provide a title and description for your article.",
        )
    }

    /// 編集フォームを検証する
    pub fn for_update(form: ArticleForm<'_>) -> Result<Self, DomainError> {
        Self::validate(
            form,
            "Please provide both a title and a story for your article.",
        )
    }

    fn validate(form: ArticleForm<'_>, missing_message: &str) -> Result<Self, DomainError> {
        if form.title.trim().is_empty() || form.description.trim().is_empty() {
            return Err(DomainError::Validation(missing_message.to_string()));
        }

        let cover_image_url = Some(form.cover_image_url.trim())
            .filter(|url| !url.is_empty())
            .map(str::to_string);

        Ok(Self {
            title: ArticleTitle::new(form.title)?,
            description: ArticleStory::new(form.description)?,
            cover_image_url,
            category_id: form.category_id.filter(|id| *id > 0),
        })
    }
}
