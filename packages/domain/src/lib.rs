//! # TravelHub ドメイン層
//!
//! 旅行記事サイトのビュー モデルと、画面の状態遷移ロジックを定義する。
//!
//! ## 設計方針
//!
//! - **CMS の形に引きずられない**: CMS のエンティティ形状は web クレートの
//!   クライアント層で吸収し、ここでは画面が必要とする形だけを持つ
//! - **送信前バリデーション**: 空の必須項目、パスワードポリシー、確認入力の不一致などは
//!   値オブジェクト生成時に弾く
//! - **I/O を持たない**: Explorer の状態遷移やリクエスト世代管理も純粋なロジックとして
//!   実装し、非同期の駆動は web クレートに任せる
//!
//! ## 依存関係の方向
//!
//! ```text
//! web → infra → domain
//!   ↘            ↗
//!      shared
//! ```
//!
//! ## モジュール構成
//!
//! - [`article`] - 記事一覧・詳細のビュー モデルと入力値
//! - [`auth`] - ログイン・会員登録フォームの検証
//! - [`category`] - カテゴリ
//! - [`clock`] - 時刻プロバイダ（トークン期限判定用）
//! - [`comment`] - コメント
//! - [`error`] - ドメインエラー
//! - [`explorer`] - 記事 Explorer（検索・カテゴリ絞り込み・ページ送り）
//! - [`featured`] - おすすめ記事のランダム抽出
//! - [`media`] - 画像 URL の正規化
//! - [`pagination`] - ページネーション計算
//! - [`password`] - パスワードとパスワードポリシー
//! - [`request_guard`] - 「最後に発行したリクエストだけを反映する」世代カウンタ
//! - [`user`] - セッションユーザーとアクセストークン
//!
//! ## 使用例
//!
//! ```rust
//! use travelhub_domain::media::get_valid_image_url;
//!
//! assert_eq!(get_valid_image_url(Some("/bali.jpg")), "/bali.jpg");
//! assert_eq!(get_valid_image_url(None), "/placeholder.png");
//! ```

#[macro_use]
mod macros;

pub mod article;
pub mod auth;
pub mod category;
pub mod clock;
pub mod comment;
pub mod error;
pub mod explorer;
pub mod featured;
pub mod media;
pub mod pagination;
pub mod password;
pub mod request_guard;
pub mod user;

pub use error::DomainError;

/// ログ出力で秘匿値を置き換える文字列
pub const REDACTED: &str = "[REDACTED]";
