//! # 最新リクエストガード
//!
//! 重なり合う非同期リクエストのうち、最後に発行したものの結果だけを採用するための
//! 世代カウンタ。
//!
//! リクエスト A を発行した後に B を発行した場合、A が B より後に完了しても
//! A のチケットは `is_latest` で `false` になり、結果は破棄される。
//! リクエスト自体のキャンセルは行わない。
//!
//! ```rust
//! use travelhub_domain::request_guard::LatestRequestGuard;
//!
//! let guard = LatestRequestGuard::new();
//! let a = guard.issue();
//! let b = guard.issue();
//!
//! assert!(!guard.is_latest(a));
//! assert!(guard.is_latest(b));
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

/// 発行済みリクエストの世代番号
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// 単調増加する世代カウンタ
#[derive(Debug, Default)]
pub struct LatestRequestGuard {
    latest: AtomicU64,
}

impl LatestRequestGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新しいリクエストのチケットを発行する
    ///
    /// 以前に発行したチケットはすべて古くなる。
    pub fn issue(&self) -> RequestTicket {
        RequestTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// チケットが最後に発行されたものか
    pub fn is_latest(&self, ticket: RequestTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}
