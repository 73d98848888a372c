//! # エラーレスポンス（RFC 9457 Problem Details）
//!
//! Web サーバーが返すエラーレスポンス構造体を提供する。
//!
//! ## 設計
//!
//! - `ErrorResponse` は純粋なデータ構造（`Serialize` / `Deserialize` のみ）
//! - axum の `IntoResponse` 変換は web クレートの責務（shared に axum 依存を入れない）
//! - よく使うエラー種別は便利コンストラクタで提供し、URI のハードコードを排除
//! - `detail` は画面にそのまま表示される文言なので英語で書く

use serde::{Deserialize, Serialize};

/// error_type URI のベースパス
const ERROR_TYPE_BASE: &str = "https://travelhub.example.com/errors";

/// エラーレスポンス（RFC 9457 Problem Details）
///
/// `type` フィールドは URI で問題の種類を識別する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
   #[serde(rename = "type")]
   pub error_type: String,
   pub title:      String,
   pub status:     u16,
   pub detail:     String,
}

impl ErrorResponse {
   /// 汎用コンストラクタ
   ///
   /// `error_type_suffix` はベース URI に付加される（例: `"article-not-found"`）。
   pub fn new(
      error_type_suffix: &str,
      title: impl Into<String>,
      status: u16,
      detail: impl Into<String>,
   ) -> Self {
      Self {
         error_type: format!("{ERROR_TYPE_BASE}/{error_type_suffix}"),
         title: title.into(),
         status,
         detail: detail.into(),
      }
   }

   /// 401 Unauthorized
   pub fn unauthorized(detail: impl Into<String>) -> Self {
      Self::new("unauthorized", "Unauthorized", 401, detail)
   }

   /// 403 Forbidden
   pub fn forbidden(detail: impl Into<String>) -> Self {
      Self::new("forbidden", "Forbidden", 403, detail)
   }

   /// 404 Not Found
   pub fn not_found(detail: impl Into<String>) -> Self {
      Self::new("not-found", "Not Found", 404, detail)
   }

   /// 400 Validation Error
   pub fn validation_error(detail: impl Into<String>) -> Self {
      Self::new("validation-error", "Validation Error", 400, detail)
   }

   /// 502 Bad Gateway
   ///
   /// CMS が 2xx 以外を返したとき。detail には CMS のメッセージを載せる。
   pub fn bad_gateway(detail: impl Into<String>) -> Self {
      Self::new("upstream-error", "Bad Gateway", 502, detail)
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;

   use super::*;

   #[test]
   fn test_new_で全フィールドが正しく設定される() {
      let error = ErrorResponse::new(
         "article-not-found",
         "Article Not Found",
         404,
         "The article you are looking for does not exist.",
      );

      assert_eq!(
         error.error_type,
         "https://travelhub.example.com/errors/article-not-found"
      );
      assert_eq!(error.title, "Article Not Found");
      assert_eq!(error.status, 404);
      assert_eq!(
         error.detail,
         "The article you are looking for does not exist."
      );
   }

   #[test]
   fn test_jsonシリアライズでtypeフィールド名が正しい() {
      let error = ErrorResponse::validation_error("Title is required");
      let json = serde_json::to_value(&error).unwrap();

      assert_eq!(
         json["type"],
         "https://travelhub.example.com/errors/validation-error"
      );
      assert_eq!(json["title"], "Validation Error");
      assert_eq!(json["status"], 400);
      assert_eq!(json["detail"], "Title is required");
      assert!(json.get("error_type").is_none());
   }

   #[test]
   fn test_全便利コンストラクタのstatusが正しい() {
      assert_eq!(ErrorResponse::unauthorized("").status, 401);
      assert_eq!(ErrorResponse::forbidden("").status, 403);
      assert_eq!(ErrorResponse::not_found("").status, 404);
      assert_eq!(ErrorResponse::validation_error("").status, 400);
      assert_eq!(ErrorResponse::bad_gateway("").status, 502);
   }
}
