//! # コメント
//!
//! 記事に付くコメントの表示モデルと投稿内容を定義する。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::DomainError;

/// 作者名を特定できないコメントの表示名
pub const FALLBACK_COMMENT_AUTHOR: &str = "Community Member";

/// コメントの作者
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentAuthor {
    pub username: Option<String>,
    pub email:    Option<String>,
}

impl CommentAuthor {
    /// 表示名を返す
    ///
    /// ユーザー名、メールアドレスのローカル部の順に採用する。
    pub fn display_name(&self) -> Option<&str> {
        self.username
            .as_deref()
            .filter(|name| !name.is_empty())
            .or_else(|| {
                self.email
                    .as_deref()
                    .and_then(|email| email.split('@').next())
                    .filter(|local| !local.is_empty())
            })
    }
}

/// 記事詳細に表示するコメント
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id:          i64,
    pub document_id: String,
    pub content:     String,
    pub created_at:  DateTime<Utc>,
    pub author:      Option<CommentAuthor>,
    pub author_name: String,
}

impl CommentView {
    pub fn new(
        id: i64,
        document_id: String,
        content: String,
        created_at: DateTime<Utc>,
        author: Option<CommentAuthor>,
    ) -> Self {
        let author_name = display_author(author.as_ref());
        Self {
            id,
            document_id,
            content,
            created_at,
            author,
            author_name,
        }
    }

    /// 作者が埋め込まれていないコメントか
    pub fn is_missing_author(&self) -> bool {
        self.author.is_none()
    }

    /// 後から取得した作者で置き換える
    pub fn with_author(self, author: CommentAuthor) -> Self {
        Self::new(
            self.id,
            self.document_id,
            self.content,
            self.created_at,
            Some(author),
        )
    }
}

/// コメントの作者表示名
pub fn display_author(author: Option<&CommentAuthor>) -> String {
    author
        .and_then(CommentAuthor::display_name)
        .unwrap_or(FALLBACK_COMMENT_AUTHOR)
        .to_string()
}

define_validated_string! {
    /// コメント本文
    pub struct CommentContent {
        label: "Comment",
        max_length: 2000,
    }
}

/// 新規コメント
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    /// 対象記事の数値 ID（CMS のリレーションは数値 ID で張る）
    pub article_id: i64,
    pub content:    CommentContent,
}

impl NewComment {
    pub fn new(article_id: i64, content: impl Into<String>) -> Result<Self, DomainError> {
        Ok(Self {
            article_id,
            content: CommentContent::new(content)?,
        })
    }
}
