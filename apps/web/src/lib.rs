//! # TravelHub Web ライブラリ
//!
//! ## モジュール構成
//!
//! - `app_builder`: State とルーターの組み立て
//! - `auth`: ログイン・登録とセッションストアの管理
//! - `client`: CMS の REST API クライアント
//! - `config`: 環境変数からの設定読み込み
//! - `error`: エラーレスポンス変換
//! - `explorer`: CMS に問い合わせる記事一覧の駆動
//! - `handler`: HTTP ハンドラ
//! - `middleware`: Request ID 伝播・ルートガード

pub mod app_builder;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod explorer;
pub mod handler;
pub mod middleware;
