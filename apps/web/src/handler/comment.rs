//! # コメント API ハンドラ
//!
//! ## エンドポイント
//!
//! - `POST /api/comments` - 記事へのコメント投稿（要ログイン）

use std::sync::Arc;

use axum::{
   Json,
   extract::State,
   http::StatusCode,
   response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use travelhub_domain::comment::NewComment;
use travelhub_shared::{ApiResponse, event_log::event, log_business_event};

use crate::{
   client::CmsCommentClient,
   error::{domain_error_response, log_and_convert_cms_error, require_session},
};

/// コメント API の共有状態
pub struct CommentState {
   pub cms_client: Arc<dyn CmsCommentClient>,
}

/// コメント投稿リクエスト
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
   pub article_id: i64,
   #[serde(default)]
   pub content:    String,
}

/// POST /api/comments
pub async fn create_comment(
   State(state): State<Arc<CommentState>>,
   jar: CookieJar,
   Json(req): Json<CreateCommentRequest>,
) -> Response {
   let token = match require_session(&jar, "Please sign in to join the discussion.") {
      Ok(token) => token,
      Err(response) => return response,
   };
   let comment = match NewComment::new(req.article_id, req.content) {
      Ok(comment) => comment,
      Err(e) => return domain_error_response(e),
   };

   match state.cms_client.create_comment(&comment, &token).await {
      Ok(created) => {
         log_business_event!(
            event.category = event::category::COMMUNITY,
            event.action = event::action::COMMENT_POSTED,
            event.entity_type = event::entity_type::COMMENT,
            event.entity_id = %created.document_id,
            article_id = comment.article_id,
            event.result = event::result::SUCCESS,
            "コメントを投稿しました"
         );
         (StatusCode::CREATED, Json(ApiResponse::new(created))).into_response()
      }
      Err(e) => log_and_convert_cms_error("コメント投稿", e),
   }
}

#[cfg(test)]
mod tests {
   use async_trait::async_trait;
   use axum::{
      Router,
      body::{Body, to_bytes},
      http::{Method, Request, header},
      routing::post,
   };
   use chrono::{TimeZone, Utc};
   use pretty_assertions::assert_eq;
   use tower::ServiceExt;
   use travelhub_domain::{
      comment::{CommentAuthor, CommentView},
      user::AccessToken,
   };
   use travelhub_shared::ErrorResponse;

   use super::*;
   use crate::client::CmsError;

   struct StubComments;

   #[async_trait]
   impl CmsCommentClient for StubComments {
      async fn create_comment(
         &self,
         comment: &NewComment,
         _token: &AccessToken,
      ) -> Result<CommentView, CmsError> {
         Ok(CommentView::new(
            5,
            "comment-5".to_string(),
            comment.content.as_str().to_string(),
            Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap(),
            Some(CommentAuthor {
               username: Some("ayu".to_string()),
               email:    None,
            }),
         ))
      }

      async fn get_comment_author(
         &self,
         _comment_document_id: &str,
         _token: Option<&AccessToken>,
      ) -> Result<Option<CommentAuthor>, CmsError> {
         Ok(None)
      }
   }

   fn create_test_app() -> Router {
      Router::new()
         .route("/api/comments", post(create_comment))
         .with_state(Arc::new(CommentState {
            cms_client: Arc::new(StubComments),
         }))
   }

   fn post_comment(body: &str, cookie: Option<&str>) -> Request<Body> {
      let mut builder = Request::builder()
         .method(Method::POST)
         .uri("/api/comments")
         .header(header::CONTENT_TYPE, "application/json");
      if let Some(token) = cookie {
         builder = builder.header(header::COOKIE, format!("travelhub_token={token}"));
      }
      builder.body(Body::from(body.to_string())).unwrap()
   }

   async fn error_body(response: Response) -> ErrorResponse {
      let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
      serde_json::from_slice(&bytes).unwrap()
   }

   #[tokio::test]
   async fn test_ログイン済みならコメントを投稿して201() {
      let sut = create_test_app();

      let response = sut
         .oneshot(post_comment(
            r#"{"articleId": 3, "content": "Lovely trip"}"#,
            Some("jwt"),
         ))
         .await
         .unwrap();

      assert_eq!(response.status(), StatusCode::CREATED);
      let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
      let body: ApiResponse<CommentView> = serde_json::from_slice(&bytes).unwrap();
      assert_eq!(body.data.content, "Lovely trip");
      assert_eq!(body.data.author_name, "ayu");
   }

   #[tokio::test]
   async fn test_未ログインではコメントできない() {
      let sut = create_test_app();

      let response = sut
         .oneshot(post_comment(r#"{"articleId": 3, "content": "Hi"}"#, None))
         .await
         .unwrap();

      assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
      assert_eq!(
         error_body(response).await.detail,
         "Please sign in to join the discussion."
      );
   }

   #[tokio::test]
   async fn test_空のコメントは投稿しない() {
      let sut = create_test_app();

      let response = sut
         .oneshot(post_comment(r#"{"articleId": 3, "content": "   "}"#, Some("jwt")))
         .await
         .unwrap();

      assert_eq!(response.status(), StatusCode::BAD_REQUEST);
      assert_eq!(error_body(response).await.detail, "Comment is required");
   }
}
