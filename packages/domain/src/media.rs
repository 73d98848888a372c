//! # 画像 URL
//!
//! カバー画像 URL を表示可能な形に正規化する。
//!
//! CMS 応答の変換時に表示できない URL を落とすのに使い、描画側では
//! 未設定の画像をプレースホルダーに置き換えるのに使う。

/// 画像が無い、または表示できない場合に使う画像
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.png";

/// 表示可能な画像 URL を返す
///
/// `http://`, `https://` で始まる絶対 URL とルート相対パス（`/` 始まり）はそのまま返す。
/// それ以外（未設定、空文字列、相対パス、`data:` などのスキーム）は
/// [`PLACEHOLDER_IMAGE`] に置き換える。
pub fn get_valid_image_url(url: Option<&str>) -> &str {
    match url {
        Some(url)
            if url.starts_with("http://")
                || url.starts_with("https://")
                || url.starts_with('/') =>
        {
            url
        }
        _ => PLACEHOLDER_IMAGE,
    }
}
