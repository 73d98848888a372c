//! # セッションストア
//!
//! ログイン中のアクセストークンとユーザー情報を保持する。
//!
//! ## キー設計
//!
//! | キー | 値 |
//! |-----|-----|
//! | `travelhub_token` | アクセストークン（文字列） |
//! | `travelhub_user` | [`SessionUser`]（JSON 文字列） |
//!
//! 実装は文字列のキーバリュー操作（`get_item` / `set_item` / `remove_item`）だけを持ち、
//! トークンやユーザーの読み書きはトレイトの既定メソッドで共通化する。
//!
//! 有効期限の判定はこの層では行わない（認証ヘルパーの責務）。

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::Mutex,
};

use async_trait::async_trait;
use travelhub_domain::user::{AccessToken, SessionUser};

use crate::InfraError;

/// アクセストークンのキー
pub const TOKEN_KEY: &str = "travelhub_token";

/// ユーザー情報のキー
pub const USER_KEY: &str = "travelhub_user";

/// セッションストアトレイト
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// 値を取得する
    async fn get_item(&self, key: &str) -> Result<Option<String>, InfraError>;

    /// 値を保存する
    async fn set_item(&self, key: &str, value: String) -> Result<(), InfraError>;

    /// 値を削除する
    ///
    /// 存在しないキーを削除しても成功とする。
    async fn remove_item(&self, key: &str) -> Result<(), InfraError>;

    /// 保存済みのアクセストークンを取得する
    async fn token(&self) -> Result<Option<AccessToken>, InfraError> {
        Ok(self.get_item(TOKEN_KEY).await?.and_then(AccessToken::new))
    }

    /// 保存済みのユーザーを取得する
    ///
    /// JSON として読めない値は未保存として扱う。
    async fn user(&self) -> Result<Option<SessionUser>, InfraError> {
        let Some(raw) = self.get_item(USER_KEY).await? else {
            return Ok(None);
        };
        match serde_json::from_str::<SessionUser>(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                tracing::warn!(error = %e, "保存済みユーザー情報を読み取れません");
                Ok(None)
            }
        }
    }

    /// トークンとユーザーを保存する
    async fn save(&self, token: &AccessToken, user: &SessionUser) -> Result<(), InfraError> {
        self.set_item(TOKEN_KEY, token.as_str().to_string()).await?;
        self.set_item(USER_KEY, serde_json::to_string(user)?).await
    }

    /// トークンとユーザーを削除する
    async fn clear(&self) -> Result<(), InfraError> {
        self.remove_item(TOKEN_KEY).await?;
        self.remove_item(USER_KEY).await
    }
}

/// プロセス内メモリに保持するセッションストア
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>, InfraError> {
        self.entries
            .lock()
            .map_err(|_| InfraError::unexpected("セッションストアのロックが破損しています"))
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, InfraError> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), InfraError> {
        self.lock()?.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), InfraError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// JSON ファイルに保存するセッションストア
///
/// ファイルはキーと値の JSON オブジェクト。存在しないか壊れていれば空として
/// 扱い、書き込み時に親ディレクトリごと作成する。書き込みは一時ファイルからの
/// リネームで行う。
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    /// 読み込みから書き込みまでを直列化する
    write_lock: tokio::sync::Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path:       path.into(),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 保存内容を読み込む
    ///
    /// JSON として読めないファイルは空として扱い、次の書き込みで上書きする。
    async fn read_entries(&self) -> Result<BTreeMap<String, String>, InfraError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(entries) => Ok(entries),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        path = %self.path.display(),
                        "セッションファイルを読み取れないため空として扱います"
                    );
                    Ok(BTreeMap::new())
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), InfraError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(entries)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, InfraError> {
        Ok(self.read_entries().await?.remove(key))
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), InfraError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_entries().await?;
        entries.insert(key.to_string(), value);
        self.write_entries(&entries).await
    }

    async fn remove_item(&self, key: &str) -> Result<(), InfraError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_entries().await?;
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.write_entries(&entries).await
    }
}
