//! CMS の JSON 形状とビューモデルへの変換
//!
//! CMS は一覧を `{ "data": [...], "meta": { "pagination": {...} } }`、
//! 単体を `{ "data": {...} }` で返す。書き込み系のボディも `{ "data": {...} }` で包む。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use travelhub_domain::{
   article::{ANONYMOUS_AUTHOR, ArticleDetail, ArticleDraft, ArticleListItem, DEFAULT_CATEGORY_NAME},
   category::{CategoryOption, NewCategory},
   comment::{CommentAuthor, CommentView, NewComment},
   media::get_valid_image_url,
   pagination::Pagination,
   user::SessionUser,
};

use super::error::CmsError;

// --- レスポンス型 ---

/// 一覧レスポンス
#[derive(Debug, Clone, Deserialize)]
pub struct CmsListResponse<T> {
   pub data: Vec<T>,
   #[serde(default)]
   pub meta: CmsListMeta,
}

/// 一覧レスポンスのメタ情報
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CmsListMeta {
   pub pagination: Option<Pagination>,
}

/// 単体レスポンス
#[derive(Debug, Clone, Deserialize)]
pub struct CmsSingleResponse<T> {
   pub data: Option<T>,
}

impl<T> CmsSingleResponse<T> {
   /// `data: null` を `NotFound` として取り出す
   pub fn into_found(self) -> Result<T, CmsError> {
      self.data.ok_or(CmsError::NotFound)
   }
}

/// 記事エンティティ
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleEntity {
   pub id: i64,
   pub document_id: String,
   pub title: String,
   #[serde(default)]
   pub description: Option<String>,
   #[serde(rename = "cover_image_url", default)]
   pub cover_image_url: Option<String>,
   pub created_at: DateTime<Utc>,
   #[serde(default)]
   pub user: Option<UserEntity>,
   #[serde(default)]
   pub category: Option<CategoryEntity>,
   #[serde(default)]
   pub comments: Option<Vec<CommentEntity>>,
}

/// ユーザーエンティティ
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEntity {
   pub id: i64,
   #[serde(default)]
   pub document_id: Option<String>,
   pub username: String,
   #[serde(default)]
   pub email: String,
}

/// カテゴリエンティティ
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryEntity {
   pub id: i64,
   pub document_id: String,
   pub name: String,
   #[serde(default)]
   pub description: Option<String>,
}

/// コメントエンティティ
///
/// `user` は populate されていない場合に欠落する。
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentEntity {
   pub id: i64,
   pub document_id: String,
   pub content: String,
   pub created_at: DateTime<Utc>,
   #[serde(default)]
   pub user: Option<CommentAuthor>,
}

// --- ビューモデルへの変換 ---

/// 表示できるカバー画像 URL だけを残す
///
/// 空文字列や相対パスは未設定として扱い、表示側でプレースホルダーにする。
fn displayable_cover(url: String) -> Option<String> {
   let url = url.trim();
   (get_valid_image_url(Some(url)) == url).then(|| url.to_string())
}

impl From<ArticleEntity> for ArticleListItem {
   fn from(entity: ArticleEntity) -> Self {
      let (author_name, author_id, author_document_id) = match entity.user {
         Some(user) => (user.username, Some(user.id), user.document_id),
         None => (ANONYMOUS_AUTHOR.to_string(), None, None),
      };

      Self {
         id: entity.id,
         document_id: entity.document_id,
         title: entity.title,
         description: entity.description.unwrap_or_default(),
         cover_image_url: entity.cover_image_url.and_then(displayable_cover),
         category_name: entity
            .category
            .map_or_else(|| DEFAULT_CATEGORY_NAME.to_string(), |c| c.name),
         author_name,
         author_id,
         author_document_id,
         created_at: entity.created_at,
      }
   }
}

impl ArticleEntity {
   /// 詳細ビューに変換する（本文は description）
   pub fn into_detail(mut self) -> ArticleDetail {
      let comments = self
         .comments
         .take()
         .unwrap_or_default()
         .into_iter()
         .map(CommentView::from)
         .collect();
      let summary = ArticleListItem::from(self);

      ArticleDetail {
         body: summary.description.clone(),
         summary,
         comments,
      }
   }
}

impl From<CommentEntity> for CommentView {
   fn from(entity: CommentEntity) -> Self {
      CommentView::new(
         entity.id,
         entity.document_id,
         entity.content,
         entity.created_at,
         entity.user,
      )
   }
}

impl From<CategoryEntity> for CategoryOption {
   fn from(entity: CategoryEntity) -> Self {
      Self {
         id: entity.id,
         document_id: entity.document_id,
         name: entity.name,
      }
   }
}

impl From<UserEntity> for SessionUser {
   fn from(entity: UserEntity) -> Self {
      Self {
         id: entity.id,
         document_id: entity.document_id,
         username: entity.username,
         email: entity.email,
      }
   }
}

// --- リクエスト型 ---

/// 書き込み系ボディの `{ "data": ... }` 包み
#[derive(Debug, Serialize)]
pub struct CmsData<T> {
   pub data: T,
}

/// 記事の作成・更新ボディ
///
/// 作成時はカテゴリ未指定なら `category` を送らない。
/// 更新時は `null` を送ってカテゴリを外せる。
#[derive(Debug, Serialize)]
pub struct ArticlePayload<'a> {
   pub title:           &'a str,
   pub description:     &'a str,
   pub cover_image_url: Option<&'a str>,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub category:        Option<Option<i64>>,
}

impl<'a> ArticlePayload<'a> {
   pub fn for_create(draft: &'a ArticleDraft) -> CmsData<Self> {
      CmsData {
         data: Self {
            category: draft.category_id.map(Some),
            ..Self::base(draft)
         },
      }
   }

   pub fn for_update(draft: &'a ArticleDraft) -> CmsData<Self> {
      CmsData {
         data: Self {
            category: Some(draft.category_id),
            ..Self::base(draft)
         },
      }
   }

   fn base(draft: &'a ArticleDraft) -> Self {
      Self {
         title:           draft.title.as_str(),
         description:     draft.description.as_str(),
         cover_image_url: draft.cover_image_url.as_deref(),
         category:        None,
      }
   }
}

/// コメント作成ボディ
#[derive(Debug, Serialize)]
pub struct CommentPayload<'a> {
   pub content: &'a str,
   pub article: i64,
}

impl<'a> CommentPayload<'a> {
   pub fn wrap(comment: &'a NewComment) -> CmsData<Self> {
      CmsData {
         data: Self {
            content: comment.content.as_str(),
            article: comment.article_id,
         },
      }
   }
}

/// カテゴリ作成ボディ
#[derive(Debug, Serialize)]
pub struct CategoryPayload<'a> {
   pub name:        &'a str,
   pub description: Option<&'a str>,
}

impl<'a> CategoryPayload<'a> {
   pub fn wrap(category: &'a NewCategory) -> CmsData<Self> {
      CmsData {
         data: Self {
            name:        category.name.as_str(),
            description: category.description.as_deref(),
         },
      }
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;
   use rstest::rstest;
   use serde_json::json;
   use travelhub_domain::article::ArticleForm;

   use super::*;

   fn article_json() -> serde_json::Value {
      json!({
         "id": 7,
         "documentId": "bali-doc",
         "title": "Bali sunsets",
         "description": "Golden hour in Uluwatu.\n\nThen dinner.",
         "cover_image_url": "https://img.example.com/bali.jpg",
         "createdAt": "2025-03-14T09:30:00.000Z",
         "updatedAt": "2025-03-14T09:30:00.000Z",
         "user": { "id": 3, "documentId": "user-doc", "username": "ayu", "email": "ayu@example.com" },
         "category": { "id": 2, "documentId": "cat-doc", "name": "Beach" },
         "comments": [
            {
               "id": 11,
               "documentId": "c-1",
               "content": "Lovely!",
               "createdAt": "2025-03-15T10:00:00.000Z",
               "user": { "username": "budi" }
            },
            {
               "id": 12,
               "documentId": "c-2",
               "content": "Been there",
               "createdAt": "2025-03-16T10:00:00.000Z"
            }
         ]
      })
   }

   #[test]
   fn test_記事エンティティを一覧項目に変換する() {
      let entity: ArticleEntity = serde_json::from_value(article_json()).unwrap();

      let item = ArticleListItem::from(entity);

      assert_eq!(item.id, 7);
      assert_eq!(item.document_id, "bali-doc");
      assert_eq!(item.category_name, "Beach");
      assert_eq!(item.author_name, "ayu");
      assert_eq!(item.author_id, Some(3));
      assert_eq!(item.author_document_id.as_deref(), Some("user-doc"));
      assert_eq!(
         item.cover_image_url.as_deref(),
         Some("https://img.example.com/bali.jpg")
      );
   }

   #[rstest]
   #[case::前後の空白は除く(" https://img.example.com/a.jpg ", Some("https://img.example.com/a.jpg"))]
   #[case::ルート相対パス("/uploads/a.jpg", Some("/uploads/a.jpg"))]
   #[case::空白だけ("  ", None)]
   #[case::相対パス("uploads/a.jpg", None)]
   #[case::dataスキーム("data:image/png;base64,AAAA", None)]
   fn test_表示できないカバー画像urlは未設定にする(
      #[case] raw: &str,
      #[case] expected: Option<&str>,
   ) {
      let mut json = article_json();
      json["cover_image_url"] = json!(raw);
      let entity: ArticleEntity = serde_json::from_value(json).unwrap();

      let item = ArticleListItem::from(entity);

      assert_eq!(item.cover_image_url.as_deref(), expected);
   }

   #[test]
   fn test_カテゴリと作者が欠けていれば既定値を使う() {
      let entity: ArticleEntity = serde_json::from_value(json!({
         "id": 1,
         "documentId": "d",
         "title": "t",
         "description": "x",
         "cover_image_url": null,
         "createdAt": "2025-01-01T00:00:00Z",
         "user": null
      }))
      .unwrap();

      let item = ArticleListItem::from(entity);

      assert_eq!(item.category_name, DEFAULT_CATEGORY_NAME);
      assert_eq!(item.author_name, ANONYMOUS_AUTHOR);
      assert_eq!(item.author_id, None);
      assert_eq!(item.cover_image_url, None);
   }

   #[test]
   fn test_詳細ビューは本文とコメントを持つ() {
      let entity: ArticleEntity = serde_json::from_value(article_json()).unwrap();

      let detail = entity.into_detail();

      assert_eq!(detail.body, "Golden hour in Uluwatu.\n\nThen dinner.");
      assert_eq!(detail.comments.len(), 2);
      assert_eq!(detail.comments[0].author_name, "budi");
      assert!(detail.comments[1].is_missing_author());
   }

   #[test]
   fn test_data_nullの単体レスポンスはnot_found() {
      let response: CmsSingleResponse<ArticleEntity> =
         serde_json::from_value(json!({ "data": null, "meta": {} })).unwrap();

      assert_eq!(response.into_found().unwrap_err(), CmsError::NotFound);
   }

   #[test]
   fn test_metaがなくても一覧レスポンスを読める() {
      let response: CmsListResponse<CategoryEntity> = serde_json::from_value(json!({
         "data": [{ "id": 1, "documentId": "a", "name": "Beach", "description": null }]
      }))
      .unwrap();

      assert!(response.meta.pagination.is_none());
      assert_eq!(
         CategoryOption::from(response.data[0].clone()),
         CategoryOption {
            id: 1,
            document_id: "a".to_string(),
            name: "Beach".to_string(),
         }
      );
   }

   #[test]
   fn test_作成ボディはカテゴリ未指定なら省略する() {
      let draft = ArticleDraft::for_create(ArticleForm {
         title: "Trip",
         description: "Story",
         ..ArticleForm::default()
      })
      .unwrap();

      let body = serde_json::to_value(ArticlePayload::for_create(&draft)).unwrap();

      assert_eq!(
         body,
         json!({ "data": { "title": "Trip", "description": "Story", "cover_image_url": null } })
      );
   }

   #[test]
   fn test_更新ボディはカテゴリのnullを送る() {
      let draft = ArticleDraft::for_update(ArticleForm {
         title: "Trip",
         description: "Story",
         cover_image_url: "https://img.example.com/a.png",
         category_id: None,
      })
      .unwrap();

      let body = serde_json::to_value(ArticlePayload::for_update(&draft)).unwrap();

      assert_eq!(
         body,
         json!({
            "data": {
               "title": "Trip",
               "description": "Story",
               "cover_image_url": "https://img.example.com/a.png",
               "category": null
            }
         })
      );
   }

   #[test]
   fn test_コメントボディは記事idを含む() {
      let comment = NewComment::new(7, "Nice read").unwrap();

      let body = serde_json::to_value(CommentPayload::wrap(&comment)).unwrap();

      assert_eq!(body, json!({ "data": { "content": "Nice read", "article": 7 } }));
   }
}
