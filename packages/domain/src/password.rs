//! # パスワード
//!
//! パスワード関連の値オブジェクトと、会員登録時のパスワードポリシーを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 用途 |
//! |---|------------|------|
//! | [`PlainPassword`] | 平文パスワード | ログイン・会員登録時の入力値 |
//! | [`PasswordRequirement`] | パスワード要件 | 強度インジケータの各項目 |
//! | [`PasswordStrength`] | パスワード強度 | 要件ごとの充足状況 |

use serde::Serialize;
use strum::{Display, EnumIter, IntoEnumIterator};

/// 平文パスワード
///
/// ユーザーが入力したパスワードをラップする。
///
/// # セキュリティ
///
/// Debug 出力ではパスワードの値をマスクする。
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PlainPassword(String);

impl std::fmt::Debug for PlainPassword {
   fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      f.debug_tuple("PlainPassword").field(&crate::REDACTED).finish()
   }
}

impl PlainPassword {
   /// パスワードを作成する
   ///
   /// 入力値は trim しない（空白もパスワードの一部）。
   pub fn new(value: impl Into<String>) -> Self {
      Self(value.into())
   }

   /// 文字列参照を取得する
   pub fn as_str(&self) -> &str {
      &self.0
   }

   pub fn is_empty(&self) -> bool {
      self.0.is_empty()
   }
}

/// パスワード要件
///
/// `Display` は強度インジケータに表示するラベル。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum PasswordRequirement {
   #[strum(serialize = "8+ characters")]
   MinLength,
   #[strum(serialize = "Uppercase")]
   Uppercase,
   #[strum(serialize = "Lowercase")]
   Lowercase,
   #[strum(serialize = "Number")]
   Number,
}

impl PasswordRequirement {
   /// 最小文字数
   pub const MIN_LENGTH: usize = 8;

   /// 要件を満たしているか
   pub fn is_met_by(&self, password: &str) -> bool {
      match self {
         Self::MinLength => password.chars().count() >= Self::MIN_LENGTH,
         Self::Uppercase => password.chars().any(|c| c.is_ascii_uppercase()),
         Self::Lowercase => password.chars().any(|c| c.is_ascii_lowercase()),
         Self::Number => password.chars().any(|c| c.is_ascii_digit()),
      }
   }
}

/// パスワード強度
///
/// 要件ごとの充足状況。すべて満たした場合のみ会員登録できる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordStrength {
   checks: Vec<(PasswordRequirement, bool)>,
}

impl PasswordStrength {
   /// パスワードを評価する
   pub fn evaluate(password: &PlainPassword) -> Self {
      let checks = PasswordRequirement::iter()
         .map(|req| (req, req.is_met_by(password.as_str())))
         .collect();
      Self { checks }
   }

   /// すべての要件を満たしているか
   pub fn is_strong(&self) -> bool {
      self.checks.iter().all(|(_, met)| *met)
   }

   /// 要件ごとの充足状況
   pub fn checks(&self) -> &[(PasswordRequirement, bool)] {
      &self.checks
   }

   /// 満たしていない要件
   pub fn unmet(&self) -> Vec<PasswordRequirement> {
      self.checks
         .iter()
         .filter(|(_, met)| !met)
         .map(|(req, _)| *req)
         .collect()
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;
   use rstest::rstest;

   use super::*;

   #[rstest]
   fn test_平文パスワードのdebug出力はマスクされる() {
      let password = PlainPassword::new("Secret123");
      let debug = format!("{:?}", password);
      assert!(debug.contains("[REDACTED]"));
      assert!(!debug.contains("Secret123"));
   }

   #[rstest]
   fn test_すべての要件を満たすパスワードは強い() {
      let strength = PasswordStrength::evaluate(&PlainPassword::new("Wander1ust"));

      assert!(strength.is_strong());
      assert!(strength.unmet().is_empty());
   }

   #[rstest]
   #[case("Short1A", PasswordRequirement::MinLength)]
   #[case("lowercase1", PasswordRequirement::Uppercase)]
   #[case("UPPERCASE1", PasswordRequirement::Lowercase)]
   #[case("NoDigitsHere", PasswordRequirement::Number)]
   fn test_要件を1つ欠くと弱い(#[case] input: &str, #[case] missing: PasswordRequirement) {
      let strength = PasswordStrength::evaluate(&PlainPassword::new(input));

      assert!(!strength.is_strong());
      assert_eq!(strength.unmet(), vec![missing]);
   }

   #[rstest]
   fn test_要件ラベルは強度インジケータの表示順() {
      let labels: Vec<String> = PasswordRequirement::iter().map(|r| r.to_string()).collect();

      assert_eq!(labels, vec!["8+ characters", "Uppercase", "Lowercase", "Number"]);
   }
}
