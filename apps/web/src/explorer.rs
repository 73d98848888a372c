//! # リモート版 Articles Explorer の駆動
//!
//! [`ExplorerState`] を非同期に駆動する。状態は `Mutex` で保護し、
//! ロックは await をまたがない。
//!
//! - 検索入力は [`SEARCH_DEBOUNCE`] だけ待ち、その間に次の入力があれば破棄する
//! - カテゴリ変更・ページ送りは即座に再読み込みする
//! - 応答は発行順に関係なく到着しうるが、最後に発行したリクエストの結果だけを反映する

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde::Serialize;
use travelhub_domain::{
   article::{ArticleListItem, ArticlePage},
   explorer::{ExplorerState, ListQuery, SEARCH_DEBOUNCE},
   pagination::Pagination,
   request_guard::LatestRequestGuard,
   user::AccessToken,
};

use crate::client::CmsArticleClient;

/// 記事一覧の取得元
///
/// 失敗時は画面に表示するメッセージを返す。
#[async_trait]
pub trait ArticleListSource: Send + Sync {
   async fn load(&self, query: &ListQuery) -> Result<ArticlePage, String>;
}

/// CMS から記事一覧を取得する取得元
pub struct CmsArticleSource {
   client: Arc<dyn CmsArticleClient>,
   token:  Option<AccessToken>,
}

impl CmsArticleSource {
   pub fn new(client: Arc<dyn CmsArticleClient>, token: Option<AccessToken>) -> Self {
      Self { client, token }
   }
}

#[async_trait]
impl ArticleListSource for CmsArticleSource {
   async fn load(&self, query: &ListQuery) -> Result<ArticlePage, String> {
      self
         .client
         .fetch_articles_list(query, self.token.as_ref())
         .await
         .map_err(|e| e.to_string())
   }
}

/// 画面描画用の状態のスナップショット
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplorerSnapshot {
   pub articles:         Vec<ArticleListItem>,
   pub pagination:       Option<Pagination>,
   pub error:            Option<String>,
   pub is_loading:       bool,
   pub search_input:     String,
   pub category:         String,
   pub active_page:      u32,
   pub total_pages:      u32,
   pub total_items:      u32,
   pub is_prev_disabled: bool,
   pub is_next_disabled: bool,
}

/// リモート版 Explorer
pub struct RemoteExplorer {
   source:   Arc<dyn ArticleListSource>,
   state:    Mutex<ExplorerState>,
   debounce: LatestRequestGuard,
}

impl RemoteExplorer {
   /// 初期表示のデータから作成する（初回は読み込まない）
   pub fn new(source: Arc<dyn ArticleListSource>, initial: ArticlePage) -> Self {
      Self::from_state(source, ExplorerState::new(initial))
   }

   pub fn from_state(source: Arc<dyn ArticleListSource>, state: ExplorerState) -> Self {
      Self {
         source,
         state: Mutex::new(state),
         debounce: LatestRequestGuard::new(),
      }
   }

   fn state(&self) -> MutexGuard<'_, ExplorerState> {
      self.state.lock().unwrap_or_else(PoisonError::into_inner)
   }

   /// 現在の条件で読み込み直す
   ///
   /// 結果を反映した場合は `true`。後から別のリクエストが発行されていれば
   /// 結果は捨てられ `false` になる。
   pub async fn reload(&self) -> bool {
      let (ticket, query) = self.state().begin_load();
      tracing::debug!(
         generation = ticket.generation(),
         page = query.page,
         category = query.category.label(),
         "記事一覧を読み込みます"
      );

      let result = self.source.load(&query).await;

      let applied = self.state().complete_load(ticket, result);
      if !applied {
         tracing::debug!(generation = ticket.generation(), "古い応答を破棄しました");
      }
      applied
   }

   /// 検索欄に入力する
   ///
   /// デバウンス時間内に次の入力があればこの入力では読み込まない。
   /// 確定した検索文字列が変わらなければ読み込まない。
   pub async fn input_search(&self, text: impl Into<String>) -> bool {
      let ticket = {
         let mut state = self.state();
         state.on_search_input(text);
         self.debounce.issue()
      };

      tokio::time::sleep(SEARCH_DEBOUNCE).await;

      if !self.debounce.is_latest(ticket) {
         return false;
      }
      let changed = self.state().settle_search();
      if !changed {
         return false;
      }
      self.reload().await
   }

   /// カテゴリを選択する
   pub async fn select_category(&self, label: &str) -> bool {
      let changed = self.state().select_category(label);
      if !changed {
         return false;
      }
      self.reload().await
   }

   /// 次のページへ進む
   pub async fn next_page(&self) -> bool {
      let moved = self.state().next_page();
      if !moved {
         return false;
      }
      self.reload().await
   }

   /// 前のページへ戻る
   pub async fn previous_page(&self) -> bool {
      let moved = self.state().previous_page();
      if !moved {
         return false;
      }
      self.reload().await
   }

   pub fn snapshot(&self) -> ExplorerSnapshot {
      let state = self.state();
      ExplorerSnapshot {
         articles:         state.articles().to_vec(),
         pagination:       state.pagination().copied(),
         error:            state.error().map(str::to_string),
         is_loading:       state.is_loading(),
         search_input:     state.search_input().to_string(),
         category:         state.category().label().to_string(),
         active_page:      state.active_page(),
         total_pages:      state.total_pages(),
         total_items:      state.total_items(),
         is_prev_disabled: state.is_prev_disabled(),
         is_next_disabled: state.is_next_disabled(),
      }
   }
}
