//! # 記事 Explorer
//!
//! 記事一覧画面の検索・カテゴリ絞り込み・ページ送りの状態遷移を定義する。
//!
//! ## 2 つの実装
//!
//! | 型 | 用途 |
//! |---|------|
//! | [`LocalExplorer`] | メモリ上の全件を絞り込んでページ単位に切り出す |
//! | [`ExplorerState`] | 条件が変わるたびに CMS へ問い合わせる（リモート） |
//!
//! ## 状態遷移の規則
//!
//! - 検索文字列またはカテゴリが変わったらページを 1 に戻し、エラーを消す
//! - 表示ページは `[1, 総ページ数]` に収める
//! - 前へ / 次へは端のページで無効。リモートでは読み込み中も無効
//! - リモートでは最後に発行したリクエストの結果だけを反映する
//!   （[`crate::request_guard::LatestRequestGuard`]）
//!
//! I/O は持たない。リモート版の非同期な駆動（デバウンス、CMS 呼び出し）は
//! web クレートが [`ExplorerState::begin_load`] / [`ExplorerState::complete_load`]
//! を呼んで行う。

use std::{collections::BTreeSet, time::Duration};

use crate::{
    article::{ArticleListItem, ArticlePage},
    pagination::{DEFAULT_PAGE_SIZE, Pagination, clamp_page, page_count},
    request_guard::{LatestRequestGuard, RequestTicket},
};

/// 全カテゴリを表す選択肢
pub const ALL_CATEGORIES: &str = "All";

/// 検索入力のデバウンス時間
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(400);

/// 読み込み失敗時にメッセージが得られなかった場合の表示
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load articles. Please try again.";

/// 検索・絞り込みの対象になる項目
pub trait Searchable {
    fn title(&self) -> &str;
    fn description(&self) -> &str;
    fn category_name(&self) -> &str;
}

impl Searchable for ArticleListItem {
    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn category_name(&self) -> &str {
        &self.category_name
    }
}

/// カテゴリ絞り込み条件
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    /// 選択肢のラベルから作成する
    ///
    /// `"All"` と空文字列は絞り込みなし。
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.is_empty() || label == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Named(label.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Named(name) => name,
        }
    }

    /// カテゴリ名が条件に一致するか（完全一致）
    pub fn matches(&self, category_name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => name == category_name,
        }
    }

    /// CMS へのクエリに使うカテゴリ名
    pub fn as_query(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Named(name) => Some(name),
        }
    }
}

/// カテゴリの選択肢を作る
///
/// 先頭に `"All"`、続けて重複を除いたカテゴリ名を大文字小文字を区別せずに並べる。
pub fn category_options<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let unique: BTreeSet<&str> = names
        .into_iter()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect();
    let mut sorted: Vec<&str> = unique.into_iter().collect();
    sorted.sort_by_key(|name| name.to_lowercase());

    std::iter::once(ALL_CATEGORIES.to_string())
        .chain(sorted.into_iter().map(str::to_string))
        .collect()
}

/// タイトルまたは説明に検索文字列を含むか（大文字小文字を区別しない）
///
/// 空の検索文字列はすべてに一致する。
pub fn matches_search<T: Searchable + ?Sized>(item: &T, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    item.title().to_lowercase().contains(&query)
        || item.description().to_lowercase().contains(&query)
}

/// 表示中の 1 ページ分
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView<'a, T> {
    pub items:            Vec<&'a T>,
    pub pagination:       Pagination,
    pub is_prev_disabled: bool,
    pub is_next_disabled: bool,
}

// =========================================================================
// ローカル版
// =========================================================================

/// メモリ上の全件を対象にする Explorer
#[derive(Debug, Clone)]
pub struct LocalExplorer<T> {
    items:        Vec<T>,
    page_size:    u32,
    search:       String,
    category:     CategoryFilter,
    current_page: u32,
}

impl<T: Searchable> LocalExplorer<T> {
    pub fn new(items: Vec<T>, page_size: u32) -> Self {
        Self {
            items,
            page_size: page_size.max(1),
            search: String::new(),
            category: CategoryFilter::All,
            current_page: 1,
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn category(&self) -> &CategoryFilter {
        &self.category
    }

    /// 検索文字列を変更する（ページは 1 に戻る）
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
        self.current_page = 1;
    }

    /// カテゴリを選択する（ページは 1 に戻る）
    pub fn select_category(&mut self, label: &str) {
        self.category = CategoryFilter::from_label(label);
        self.current_page = 1;
    }

    /// 検索とカテゴリをリセットする
    pub fn clear_filters(&mut self) {
        self.search.clear();
        self.category = CategoryFilter::All;
        self.current_page = 1;
    }

    /// 条件に一致する全件
    pub fn filtered(&self) -> Vec<&T> {
        self.items
            .iter()
            .filter(|item| self.category.matches(item.category_name()))
            .filter(|item| matches_search(*item, &self.search))
            .collect()
    }

    fn total_pages(&self) -> u32 {
        page_count(self.filtered_len(), self.page_size)
    }

    fn filtered_len(&self) -> u32 {
        u32::try_from(self.filtered().len()).unwrap_or(u32::MAX)
    }

    /// 表示中のページ（総ページ数でクランプ済み）
    pub fn current_page(&self) -> u32 {
        clamp_page(self.current_page, self.total_pages())
    }

    /// 指定ページへ移動する
    pub fn go_to_page(&mut self, page: u32) {
        self.current_page = clamp_page(page, self.total_pages());
    }

    pub fn next_page(&mut self) {
        self.go_to_page(self.current_page().saturating_add(1));
    }

    pub fn previous_page(&mut self) {
        self.go_to_page(self.current_page().saturating_sub(1));
    }

    /// 表示中のページを切り出す
    pub fn view(&self) -> PageView<'_, T> {
        let filtered = self.filtered();
        let total = u32::try_from(filtered.len()).unwrap_or(u32::MAX);
        let pagination = Pagination::from_total(self.current_page, self.page_size, total);

        let start = ((pagination.page - 1) * pagination.page_size) as usize;
        let items: Vec<&T> = filtered
            .into_iter()
            .skip(start)
            .take(pagination.page_size as usize)
            .collect();

        PageView {
            items,
            is_prev_disabled: !pagination.has_previous(),
            is_next_disabled: !pagination.has_next(),
            pagination,
        }
    }
}

// =========================================================================
// リモート版
// =========================================================================

/// CMS へ送る一覧条件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page:      u32,
    pub page_size: u32,
    pub category:  CategoryFilter,
    /// trim 済みの検索文字列（空なら絞り込みなし）
    pub search:    String,
}

impl ListQuery {
    pub fn search_query(&self) -> Option<&str> {
        Some(self.search.as_str()).filter(|s| !s.is_empty())
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page:      1,
            page_size: DEFAULT_PAGE_SIZE,
            category:  CategoryFilter::All,
            search:    String::new(),
        }
    }
}

/// CMS に問い合わせる Explorer の状態
///
/// 入力イベントのたびに再読み込みが必要かを `bool` で返す。
/// 呼び出し側は `true` のとき [`Self::begin_load`] でリクエストを発行し、
/// 完了したら [`Self::complete_load`] に結果を渡す。
#[derive(Debug)]
pub struct ExplorerState {
    articles:     Vec<ArticleListItem>,
    pagination:   Option<Pagination>,
    page_size:    u32,
    search_input: String,
    search:       String,
    category:     CategoryFilter,
    current_page: u32,
    /// 表示中の一覧を要求したページ
    query_page:   u32,
    loading:      bool,
    error:        Option<String>,
    guard:        LatestRequestGuard,
}

impl ExplorerState {
    /// 初期表示のデータから作成する
    pub fn new(initial: ArticlePage) -> Self {
        Self::with_page_size(initial, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(initial: ArticlePage, page_size: u32) -> Self {
        let current_page = initial.pagination.map_or(1, |p| p.page.max(1));
        Self {
            articles: initial.articles,
            pagination: initial.pagination,
            page_size: page_size.max(1),
            search_input: String::new(),
            search: String::new(),
            category: CategoryFilter::All,
            current_page,
            query_page: current_page,
            loading: false,
            error: None,
            guard: LatestRequestGuard::new(),
        }
    }

    /// 検索欄の入力
    ///
    /// ページを 1 に戻しエラーを消す。問い合わせはデバウンス後の
    /// [`Self::settle_search`] で行う。
    pub fn on_search_input(&mut self, text: impl Into<String>) {
        self.search_input = text.into();
        self.current_page = 1;
        self.error = None;
    }

    /// デバウンス時間が経過した検索入力を確定する
    ///
    /// 確定した検索文字列（trim 済み）が変わった場合と、入力でページが
    /// 1 に戻り表示中の一覧とずれた場合は再読み込みが必要。
    pub fn settle_search(&mut self) -> bool {
        let settled = self.search_input.trim();
        if settled == self.search && self.current_page == self.query_page {
            return false;
        }
        self.search = settled.to_string();
        self.query_page = self.current_page;
        true
    }

    /// カテゴリを選択する
    pub fn select_category(&mut self, label: &str) -> bool {
        let category = CategoryFilter::from_label(label);
        let changed = category != self.category || self.current_page != 1;
        self.category = category;
        self.current_page = 1;
        self.error = None;
        changed
    }

    pub fn next_page(&mut self) -> bool {
        if self.is_next_disabled() {
            return false;
        }
        self.current_page = (self.current_page + 1).min(self.total_pages());
        true
    }

    pub fn previous_page(&mut self) -> bool {
        if self.is_prev_disabled() {
            return false;
        }
        self.current_page = self.current_page.saturating_sub(1).max(1);
        true
    }

    /// リクエストを発行する
    ///
    /// 以前に発行したリクエストの結果はこれ以降すべて破棄される。
    pub fn begin_load(&mut self) -> (RequestTicket, ListQuery) {
        let ticket = self.guard.issue();
        self.loading = true;
        self.query_page = self.current_page;
        let query = ListQuery {
            page:      self.current_page,
            page_size: self.page_size,
            category:  self.category.clone(),
            search:    self.search.clone(),
        };
        (ticket, query)
    }

    /// リクエストの結果を反映する
    ///
    /// 最新のリクエストでなければ何もせず `false` を返す。
    pub fn complete_load(&mut self, ticket: RequestTicket, result: Result<ArticlePage, String>) -> bool {
        if !self.guard.is_latest(ticket) {
            return false;
        }

        match result {
            Ok(mut page) => {
                page.articles.truncate(self.page_size as usize);
                if let Some(server_page) = page.pagination.map(|p| p.page) {
                    self.current_page = server_page.max(1);
                }
                self.query_page = self.current_page;
                self.articles = page.articles;
                self.pagination = page.pagination;
                self.error = None;
            }
            Err(message) => {
                let message = if message.trim().is_empty() {
                    LOAD_FAILED_MESSAGE.to_string()
                } else {
                    message
                };
                self.error = Some(message);
                self.articles.clear();
                self.pagination = None;
            }
        }
        self.loading = false;
        true
    }

    pub fn articles(&self) -> &[ArticleListItem] {
        &self.articles
    }

    pub fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn category(&self) -> &CategoryFilter {
        &self.category
    }

    pub fn total_pages(&self) -> u32 {
        self.pagination.map_or(1, |p| p.page_count.max(1))
    }

    pub fn total_items(&self) -> u32 {
        self.pagination.map_or_else(
            || u32::try_from(self.articles.len()).unwrap_or(u32::MAX),
            |p| p.total,
        )
    }

    /// 表示中のページ
    ///
    /// 要求中のページを返す。条件変更で 1 に戻した直後も 1 になる。
    pub fn active_page(&self) -> u32 {
        self.current_page
    }

    pub fn is_prev_disabled(&self) -> bool {
        self.active_page() <= 1 || self.loading
    }

    pub fn is_next_disabled(&self) -> bool {
        self.active_page() >= self.total_pages() || self.loading
    }
}
