//! コメント関連の CMS クライアント

use async_trait::async_trait;
use reqwest::Method;
use travelhub_domain::{
   comment::{CommentAuthor, CommentView, NewComment},
   user::AccessToken,
};

use super::{
   client_impl::CmsClientImpl,
   error::CmsError,
   response::handle_response,
   types::{CmsSingleResponse, CommentEntity, CommentPayload},
};

/// コメント関連の CMS クライアントトレイト
#[async_trait]
pub trait CmsCommentClient: Send + Sync {
   /// コメントを投稿する（`POST /api/comments`）
   async fn create_comment(
      &self,
      comment: &NewComment,
      token: &AccessToken,
   ) -> Result<CommentView, CmsError>;

   /// コメントの作者を取得する
   ///
   /// CMS の `GET /api/comments/{documentId}?populate=user` を呼び出す。
   /// コメントが存在しないか作者が紐付いていなければ `None`。
   async fn get_comment_author(
      &self,
      comment_document_id: &str,
      token: Option<&AccessToken>,
   ) -> Result<Option<CommentAuthor>, CmsError>;
}

#[async_trait]
impl CmsCommentClient for CmsClientImpl {
   #[tracing::instrument(skip_all, level = "debug", fields(article_id = comment.article_id))]
   async fn create_comment(
      &self,
      comment: &NewComment,
      token: &AccessToken,
   ) -> Result<CommentView, CmsError> {
      let response = self
         .request(Method::POST, "/api/comments", Some(token))
         .json(&CommentPayload::wrap(comment))
         .send()
         .await?;
      let body: CmsSingleResponse<CommentEntity> = handle_response(response).await?;

      Ok(body.into_found()?.into())
   }

   #[tracing::instrument(skip_all, level = "debug", fields(comment = %comment_document_id))]
   async fn get_comment_author(
      &self,
      comment_document_id: &str,
      token: Option<&AccessToken>,
   ) -> Result<Option<CommentAuthor>, CmsError> {
      let path = format!(
         "/api/comments/{}?populate=user",
         urlencoding::encode(comment_document_id)
      );

      let response = self.request(Method::GET, &path, token).send().await?;
      let body: CmsSingleResponse<CommentEntity> = match handle_response(response).await {
         Ok(body) => body,
         Err(CmsError::NotFound) => return Ok(None),
         Err(e) => return Err(e),
      };

      Ok(body.data.and_then(|comment| comment.user))
   }
}
