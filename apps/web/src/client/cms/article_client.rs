//! 記事関連の CMS クライアント

use async_trait::async_trait;
use reqwest::Method;
use travelhub_domain::{
   article::{ArticleDetail, ArticleDraft, ArticleListItem, ArticlePage, DocumentId},
   explorer::ListQuery,
   pagination::Pagination,
   user::AccessToken,
};
use travelhub_shared::event_log::error::{category as error_category, kind as error_kind};

use super::{
   client_impl::{CmsClientImpl, encode_query},
   comment_client::CmsCommentClient,
   error::CmsError,
   response::{handle_empty_response, handle_response},
   types::{ArticleEntity, ArticlePayload, CmsListResponse, CmsSingleResponse},
};

/// 記事関連の CMS クライアントトレイト
#[async_trait]
pub trait CmsArticleClient: Send + Sync {
   /// 条件付きで記事一覧を取得する
   ///
   /// CMS の `GET /api/articles` を新しい順で呼び出す。CMS がページ情報を返さない場合は
   /// 要求したページと取得件数から組み立てる。
   async fn fetch_articles_list(
      &self,
      query: &ListQuery,
      token: Option<&AccessToken>,
   ) -> Result<ArticlePage, CmsError>;

   /// 絞り込みなしで記事一覧を取得する
   async fn get_articles_list(
      &self,
      page: Option<u32>,
      page_size: Option<u32>,
      token: Option<&AccessToken>,
   ) -> Result<Vec<ArticleListItem>, CmsError>;

   /// 記事の詳細を取得する
   ///
   /// 作者が埋め込まれていないコメントは 1 件ずつ取得し直して補う。
   async fn get_article_by_document_id(
      &self,
      document_id: &DocumentId,
      token: Option<&AccessToken>,
   ) -> Result<ArticleDetail, CmsError>;

   /// 記事を作成する（`POST /api/articles`）
   async fn create_article(
      &self,
      draft: &ArticleDraft,
      token: &AccessToken,
   ) -> Result<ArticleListItem, CmsError>;

   /// 記事を更新する（`PUT /api/articles/{documentId}`）
   async fn update_article(
      &self,
      document_id: &DocumentId,
      draft: &ArticleDraft,
      token: &AccessToken,
   ) -> Result<ArticleListItem, CmsError>;

   /// 記事を削除する（`DELETE /api/articles/{documentId}`）
   async fn delete_article(
      &self,
      document_id: &DocumentId,
      token: &AccessToken,
   ) -> Result<(), CmsError>;
}

/// 一覧取得のクエリ文字列を組み立てる
///
/// カテゴリは大文字小文字を区別しない完全一致、検索語はタイトルの部分一致。
pub(super) fn list_query_string(query: &ListQuery) -> String {
   let mut params = vec![
      ("populate", "*".to_string()),
      ("sort", "createdAt:desc".to_string()),
      ("pagination[page]", query.page.to_string()),
      ("pagination[pageSize]", query.page_size.to_string()),
   ];
   if let Some(category) = query.category.as_query() {
      params.push(("filters[category][name][$eqi]", category.to_string()));
   }
   if let Some(search) = query.search_query() {
      params.push(("filters[title][$containsi]", search.to_string()));
   }
   encode_query(&params)
}

/// CMS がページ情報を返さなかったときの代替
///
/// 要求ページより前はすべて埋まっているとみなす。
fn synthesize_pagination(query: &ListQuery, rows: usize) -> Pagination {
   let rows = u32::try_from(rows).unwrap_or(u32::MAX);
   let preceding = query.page.saturating_sub(1).saturating_mul(query.page_size);
   Pagination::from_total(query.page, query.page_size, preceding.saturating_add(rows))
}

#[async_trait]
impl CmsArticleClient for CmsClientImpl {
   #[tracing::instrument(skip_all, level = "debug", fields(page = query.page))]
   async fn fetch_articles_list(
      &self,
      query: &ListQuery,
      token: Option<&AccessToken>,
   ) -> Result<ArticlePage, CmsError> {
      let path = format!("/api/articles?{}", list_query_string(query));

      let response = self.request(Method::GET, &path, token).send().await?;
      let body: CmsListResponse<ArticleEntity> = handle_response(response).await?;

      let pagination = body
         .meta
         .pagination
         .unwrap_or_else(|| synthesize_pagination(query, body.data.len()));

      Ok(ArticlePage {
         articles:   body.data.into_iter().map(ArticleListItem::from).collect(),
         pagination: Some(pagination),
      })
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn get_articles_list(
      &self,
      page: Option<u32>,
      page_size: Option<u32>,
      token: Option<&AccessToken>,
   ) -> Result<Vec<ArticleListItem>, CmsError> {
      let mut params = vec![
         ("populate", "*".to_string()),
         ("sort", "createdAt:desc".to_string()),
      ];
      if let Some(page_size) = page_size {
         params.push(("pagination[pageSize]", page_size.to_string()));
      }
      if let Some(page) = page {
         params.push(("pagination[page]", page.to_string()));
      }
      let path = format!("/api/articles?{}", encode_query(&params));

      let response = self.request(Method::GET, &path, token).send().await?;
      let body: CmsListResponse<ArticleEntity> = handle_response(response).await?;

      Ok(body.data.into_iter().map(ArticleListItem::from).collect())
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%document_id))]
   async fn get_article_by_document_id(
      &self,
      document_id: &DocumentId,
      token: Option<&AccessToken>,
   ) -> Result<ArticleDetail, CmsError> {
      let path = format!(
         "/api/articles/{}?populate=*",
         urlencoding::encode(document_id.as_str())
      );

      let response = self.request(Method::GET, &path, token).send().await?;
      let body: CmsSingleResponse<ArticleEntity> = handle_response(response).await?;
      let mut detail = body.into_found()?.into_detail();

      let mut comments = Vec::with_capacity(detail.comments.len());
      for comment in std::mem::take(&mut detail.comments) {
         if !comment.is_missing_author() {
            comments.push(comment);
            continue;
         }
         match self.get_comment_author(&comment.document_id, token).await {
            Ok(Some(author)) => comments.push(comment.with_author(author)),
            Ok(None) => comments.push(comment),
            Err(e) => {
               tracing::warn!(
                  error.category = error_category::EXTERNAL_SERVICE,
                  error.kind = error_kind::COMMENT_AUTHOR_LOOKUP,
                  comment = %comment.document_id,
                  "コメント作者の取得に失敗しました: {}",
                  e
               );
               comments.push(comment);
            }
         }
      }
      detail.comments = comments;

      Ok(detail)
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn create_article(
      &self,
      draft: &ArticleDraft,
      token: &AccessToken,
   ) -> Result<ArticleListItem, CmsError> {
      let response = self
         .request(Method::POST, "/api/articles", Some(token))
         .json(&ArticlePayload::for_create(draft))
         .send()
         .await?;
      let body: CmsSingleResponse<ArticleEntity> = handle_response(response).await?;

      Ok(body.into_found()?.into())
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%document_id))]
   async fn update_article(
      &self,
      document_id: &DocumentId,
      draft: &ArticleDraft,
      token: &AccessToken,
   ) -> Result<ArticleListItem, CmsError> {
      let path = format!("/api/articles/{}", urlencoding::encode(document_id.as_str()));

      let response = self
         .request(Method::PUT, &path, Some(token))
         .json(&ArticlePayload::for_update(draft))
         .send()
         .await?;
      let body: CmsSingleResponse<ArticleEntity> = handle_response(response).await?;

      Ok(body.into_found()?.into())
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%document_id))]
   async fn delete_article(
      &self,
      document_id: &DocumentId,
      token: &AccessToken,
   ) -> Result<(), CmsError> {
      let path = format!("/api/articles/{}", urlencoding::encode(document_id.as_str()));

      let response = self.request(Method::DELETE, &path, Some(token)).send().await?;
      handle_empty_response(response).await
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;
   use travelhub_domain::explorer::CategoryFilter;

   use super::*;

   #[test]
   fn test_絞り込みなしのクエリ() {
      let query = ListQuery::default();

      assert_eq!(
         list_query_string(&query),
         "populate=%2A&sort=createdAt%3Adesc&pagination%5Bpage%5D=1&pagination%5BpageSize%5D=6"
      );
   }

   #[test]
   fn test_カテゴリと検索語をフィルタに含める() {
      let query = ListQuery {
         page:      2,
         page_size: 6,
         category:  CategoryFilter::from_label("Beach"),
         search:    "Bali".to_string(),
      };

      let encoded = list_query_string(&query);

      assert!(encoded.contains("filters%5Bcategory%5D%5Bname%5D%5B%24eqi%5D=Beach"));
      assert!(encoded.contains("filters%5Btitle%5D%5B%24containsi%5D=Bali"));
      assert!(encoded.contains("pagination%5Bpage%5D=2"));
   }

   #[test]
   fn test_空の検索語は送らない() {
      let query = ListQuery {
         search: String::new(),
         ..ListQuery::default()
      };

      assert!(!list_query_string(&query).contains("containsi"));
   }

   #[test]
   fn test_ページ情報がなければ要求ページから組み立てる() {
      let query = ListQuery {
         page: 3,
         ..ListQuery::default()
      };

      let pagination = synthesize_pagination(&query, 4);

      assert_eq!(
         pagination,
         Pagination {
            page:       3,
            page_size:  6,
            page_count: 3,
            total:      16,
         }
      );
   }
}
