//! CmsClient スーパートレイトとクライアント実装の構造体

use reqwest::Method;
use travelhub_domain::user::AccessToken;

use super::{
   article_client::CmsArticleClient,
   category_client::CmsCategoryClient,
   comment_client::CmsCommentClient,
   user_client::CmsUserClient,
};
use crate::middleware::request_id::inject_request_id;

/// CMS クライアントトレイト（スーパートレイト）
///
/// 記事 / カテゴリ / コメント / ユーザーの各サブトレイトを束ねる。
/// ハンドラのテストではサブトレイト単位でスタブを差し込める。
pub trait CmsClient: CmsArticleClient + CmsCategoryClient + CmsCommentClient + CmsUserClient {}

impl<T> CmsClient for T where
   T: CmsArticleClient + CmsCategoryClient + CmsCommentClient + CmsUserClient
{
}

/// CMS クライアント実装
#[derive(Clone)]
pub struct CmsClientImpl {
   pub(super) base_url: String,
   pub(super) client:   reqwest::Client,
}

impl CmsClientImpl {
   /// 新しい CmsClient を作成する
   ///
   /// # 引数
   ///
   /// - `base_url`: CMS のベース URL（例: `http://localhost:1337`）
   pub fn new(base_url: &str) -> Self {
      Self {
         base_url: base_url.trim_end_matches('/').to_string(),
         client:   reqwest::Client::new(),
      }
   }

   /// リクエストビルダーを作る
   ///
   /// トークンがあれば `Authorization: Bearer` を付ける。なければ匿名で送る。
   pub(super) fn request(
      &self,
      method: Method,
      path: &str,
      token: Option<&AccessToken>,
   ) -> reqwest::RequestBuilder {
      let builder = self
         .client
         .request(method, format!("{}{}", self.base_url, path));
      let builder = match token {
         Some(token) => builder.bearer_auth(token.as_str()),
         None => builder,
      };
      inject_request_id(builder)
   }
}

/// `key=value` の組をパーセントエンコードしたクエリ文字列にする
pub(super) fn encode_query(params: &[(&str, String)]) -> String {
   params
      .iter()
      .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
      .collect::<Vec<_>>()
      .join("&")
}
