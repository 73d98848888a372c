//! # ミドルウェア
//!
//! - `request_id`: Request ID の task-local 保存と CMS への伝播
//! - `route_guard`: ログイン必須パスのリダイレクト

pub mod request_id;
mod route_guard;

pub use route_guard::{PROTECTED_PATHS, is_protected, login_redirect_location, require_session_cookie};
