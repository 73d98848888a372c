//! # API レスポンスエンベロープ
//!
//! CMS と Web サーバーが共通で使う `{ "data": T }` 形式を提供する。

use serde::{Deserialize, Serialize};

/// `{ "data": T }` 形式のレスポンス型
///
/// この型は以下の場所で使用される:
/// - Web ハンドラ（Serialize でブラウザにレスポンスを返す）
/// - ルーターのテスト（Deserialize でレスポンスボディを検証する）
///
/// ## 使用例
///
/// ```
/// use travelhub_shared::ApiResponse;
///
/// let response = ApiResponse::new("hello");
/// assert_eq!(response.data, "hello");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// 新しい `ApiResponse` を作成する
    pub fn new(data: T) -> Self {
        Self { data }
    }

    /// 中身を取り出す
    pub fn into_data(self) -> T {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_serializeでdataキーに包まれる() {
        let response = ApiResponse::new(vec!["Bali", "Kyoto"]);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json, serde_json::json!({ "data": ["Bali", "Kyoto"] }));
    }

    #[test]
    fn test_cmsのmetaフィールドは読み捨てる() {
        let json = r#"{"data": {"name": "Nature"}, "meta": {"foo": 1}}"#;

        #[derive(Debug, Deserialize, PartialEq)]
        struct Category {
            name: String,
        }

        let response: ApiResponse<Category> = serde_json::from_str(json).unwrap();

        assert_eq!(
            response.into_data(),
            Category {
                name: "Nature".to_string(),
            }
        );
    }

    #[test]
    fn test_data_nullはoptionでnoneになる() {
        let json = r#"{"data": null, "meta": {}}"#;
        let response: ApiResponse<Option<String>> = serde_json::from_str(json).unwrap();

        assert!(response.data.is_none());
    }
}
