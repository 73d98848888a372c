//! # TravelHub Web サーバー
//!
//! 旅行記コミュニティ TravelHub のブラウザ向け API サーバー。
//!
//! ## 役割
//!
//! - **セッション Cookie**: ログイン済みトークンを HTTP-only Cookie に写す
//! - **ルートガード**: 記事作成画面は未ログインならログイン画面へ誘導する
//! - **CMS プロキシ**: 記事・カテゴリ・コメントを CMS から取得・登録し、
//!   画面向けの形に変換して返す
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │   Browser    │────▶│  TravelHub   │────▶│     CMS      │
//! │              │     │     Web      │     │  (REST API)  │
//! └──────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `WEB_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `WEB_PORT` | **Yes** | ポート番号 |
//! | `CMS_URL` | **Yes** | CMS のベース URL |
//! | `ENV` | No | `production` でセッション Cookie に Secure を付ける |
//! | `LOG_FORMAT` | No | `json` / `pretty` |
//! | `RUST_LOG` | No | ログフィルタ |
//!
//! ## 起動方法
//!
//! ```bash
//! WEB_PORT=3000 CMS_URL=http://localhost:1337 cargo run -p travelhub-web
//! ```

use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::TcpListener;
use travelhub_shared::observability::{TracingConfig, init_tracing};
use travelhub_web::{app_builder::build_app, config::WebConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
   // .env ファイルを読み込む（存在する場合）
   dotenvy::dotenv().ok();

   init_tracing(TracingConfig::from_env("web"));
   let _tracing_guard = tracing::info_span!("app", service = "web").entered();

   let config = WebConfig::from_env().context("設定の読み込みに失敗しました")?;
   tracing::info!(cms_url = %config.cms_url, "Web サーバーを起動します: {}:{}", config.host, config.port);

   let app = build_app(&config);

   let addr: SocketAddr = format!("{}:{}", config.host, config.port)
      .parse()
      .context("アドレスのパースに失敗しました")?;

   let listener = TcpListener::bind(addr).await?;
   tracing::info!("Web サーバーが起動しました: {}", addr);

   axum::serve(listener, app).await?;

   Ok(())
}
