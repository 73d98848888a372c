//! # Web サーバー設定
//!
//! 環境変数から TravelHub Web サーバーの設定を読み込む。

use std::env;

use thiserror::Error;

/// 設定読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
   #[error("{0} が設定されていません")]
   Missing(&'static str),

   #[error("{name} の値が不正です: {value}")]
   Invalid { name: &'static str, value: String },
}

/// Web サーバーの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebConfig {
   /// バインドアドレス
   pub host: String,
   /// ポート番号
   pub port: u16,
   /// CMS のベース URL（末尾の `/` は除去済み）
   pub cms_url: String,
   /// セッション Cookie に Secure 属性を付けるか（`ENV=production`）
   pub secure_cookies: bool,
}

impl WebConfig {
   /// 環境変数から設定を読み込む
   pub fn from_env() -> Result<Self, ConfigError> {
      Self::from_lookup(|name| env::var(name).ok())
   }

   /// 任意の参照関数から設定を読み込む
   ///
   /// テストでプロセスの環境変数を書き換えずに済むよう分離している。
   pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
      let host = lookup("WEB_HOST")
         .filter(|v| !v.trim().is_empty())
         .unwrap_or_else(|| "0.0.0.0".to_string());

      let port_raw = lookup("WEB_PORT").ok_or(ConfigError::Missing("WEB_PORT"))?;
      let port = port_raw.trim().parse().map_err(|_| ConfigError::Invalid {
         name:  "WEB_PORT",
         value: port_raw.clone(),
      })?;

      let cms_url = lookup("CMS_URL")
         .map(|v| v.trim().trim_end_matches('/').to_string())
         .filter(|v| !v.is_empty())
         .ok_or(ConfigError::Missing("CMS_URL"))?;

      let secure_cookies = lookup("ENV").is_some_and(|v| v == "production");

      Ok(Self {
         host,
         port,
         cms_url,
         secure_cookies,
      })
   }
}
