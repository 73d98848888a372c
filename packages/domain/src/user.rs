//! # ユーザー
//!
//! ログイン中のユーザーと、CMS が発行したアクセストークンを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 用途 |
//! |---|------------|------|
//! | [`SessionUser`] | セッションユーザー | セッションストアに保存するユーザー情報 |
//! | [`AccessToken`] | アクセストークン | CMS へのリクエストに付与する Bearer トークン（JWT） |
//!
//! ## 設計方針
//!
//! - **トークンはログに出さない**: `AccessToken` の Debug 出力はマスクする
//! - **期限切れは未ログイン扱い**: JWT の `exp` クレームが過去なら
//!   トークンは存在しないものとして扱う。署名検証は CMS の責務

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// セッションユーザー
///
/// ログイン成功時に CMS から返されたユーザー情報。
/// セッションストアに JSON として保存される（キー: `travelhub_user`）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id:          i64,
    #[serde(default)]
    pub document_id: Option<String>,
    pub username:    String,
    pub email:       String,
}

impl SessionUser {
    /// 記事の作者かどうかを判定する
    ///
    /// documentId が両方に存在すれば documentId で、そうでなければ数値 ID で比較する。
    /// どちらかが一致すれば作者とみなす。
    pub fn owns(&self, author_id: Option<i64>, author_document_id: Option<&str>) -> bool {
        let by_document_id = matches!(
            (self.document_id.as_deref(), author_document_id),
            (Some(mine), Some(theirs)) if mine == theirs
        );
        by_document_id || author_id == Some(self.id)
    }
}

/// アクセストークン（JWT）
///
/// # セキュリティ
///
/// Debug 出力ではトークンの値をマスクする。
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AccessToken").field(&crate::REDACTED).finish()
    }
}

#[derive(Deserialize)]
struct Claims {
    exp: Option<i64>,
}

impl AccessToken {
    /// トークンを作成する
    ///
    /// 前後の空白を除いて空になる場合は `None` を返す。
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into().trim().to_string();
        if value.is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    /// 文字列参照を取得する
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// JWT ペイロードの `exp` クレームを取得する
    ///
    /// JWT 形式でない、または `exp` を持たない場合は `None`。
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let payload = self.0.split('.').nth(1)?;
        let decoded = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
        let claims: Claims = serde_json::from_slice(&decoded).ok()?;
        DateTime::from_timestamp(claims.exp?, 0)
    }

    /// 指定時刻の時点で期限切れかどうか
    ///
    /// 有効期限が読み取れないトークンは期限切れとみなさない。
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|exp| exp <= now)
    }
}
