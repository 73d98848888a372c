//! # カテゴリ
//!
//! 記事の分類。Explorer の絞り込み条件であり、記事作成画面から新規作成もできる。

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// カテゴリの選択肢
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryOption {
    pub id:          i64,
    pub document_id: String,
    pub name:        String,
}

define_validated_string! {
    /// カテゴリ名
    pub struct CategoryName {
        label: "Category name",
        max_length: 100,
    }
}

/// 新規カテゴリ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name:        CategoryName,
    pub description: Option<String>,
}

impl NewCategory {
    /// 新規カテゴリを作成する
    ///
    /// 説明は trim して空なら `None` とする。
    pub fn new(name: impl Into<String>, description: Option<String>) -> Result<Self, DomainError> {
        Ok(Self {
            name:        CategoryName::new(name)?,
            description: description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
        })
    }
}
