//! # Clock（時刻プロバイダ）
//!
//! アクセストークンの有効期限判定で `Utc::now()` を直接呼ばず、
//! テストで固定時刻を注入可能にするための抽象化。

use chrono::{DateTime, Utc};

/// 現在時刻を提供するトレイト
pub trait Clock: Send + Sync {
   fn now(&self) -> DateTime<Utc>;
}

/// 実際のシステム時刻を返す実装
pub struct SystemClock;

impl Clock for SystemClock {
   fn now(&self) -> DateTime<Utc> {
      Utc::now()
   }
}

/// 固定時刻を返すテスト用実装
pub struct FixedClock {
   now: DateTime<Utc>,
}

impl FixedClock {
   pub fn new(now: DateTime<Utc>) -> Self {
      Self { now }
   }

   /// UNIX 秒から作成する
   ///
   /// JWT の `exp` クレームと比較するテストで使う。
   pub fn at_timestamp(secs: i64) -> Option<Self> {
      DateTime::from_timestamp(secs, 0).map(Self::new)
   }
}

impl Clock for FixedClock {
   fn now(&self) -> DateTime<Utc> {
      self.now
   }
}
