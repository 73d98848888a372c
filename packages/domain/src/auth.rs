//! # 認証フォーム
//!
//! ログイン・会員登録フォームの入力値を、CMS へ送信する前に検証する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 用途 |
//! |---|------------|------|
//! | [`Email`] | メールアドレス | 会員登録時の連絡先 |
//! | [`LoginCredentials`] | ログイン資格情報 | `POST /api/auth/local` の送信内容 |
//! | [`Registration`] | 会員登録 | `POST /api/auth/local/register` の送信内容 |
//!
//! ## 使用例
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use travelhub_domain::auth::{Registration, RegistrationForm};
//!
//! let registration = Registration::new(RegistrationForm {
//!     name:             "",
//!     email:            "nomad@example.com",
//!     password:         "Wander1ust",
//!     confirm_password: "Wander1ust",
//!     agreed_to_terms:  true,
//! })?;
//!
//! // 名前が空ならメールアドレスのローカル部がユーザー名になる
//! assert_eq!(registration.username(), "nomad");
//! # Ok(())
//! # }
//! ```

use serde::Serialize;

use crate::{
    DomainError,
    password::{PasswordStrength, PlainPassword},
};

/// メールアドレス（値オブジェクト）
///
/// `local@domain` の形式を要求する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// 最大文字数
    pub const MAX_LENGTH: usize = 255;

    /// メールアドレスを作成する
    ///
    /// # バリデーション
    ///
    /// - 空文字列ではない（前後の空白は除去する）
    /// - `@` の前後が空でない
    /// - 最大 255 文字
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into().trim().to_string();

        if value.is_empty() {
            return Err(DomainError::Validation("Email is required".to_string()));
        }

        let Some((local, domain)) = value.split_once('@') else {
            return Err(invalid_email());
        };

        if local.is_empty() || domain.is_empty() {
            return Err(invalid_email());
        }

        if value.len() > Self::MAX_LENGTH {
            return Err(DomainError::Validation(format!(
                "Email must be at most {} characters",
                Self::MAX_LENGTH
            )));
        }

        Ok(Self(value))
    }

    /// 文字列参照を取得する
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `@` より前の部分
    pub fn local_part(&self) -> &str {
        self.0.split_once('@').map_or(self.0.as_str(), |(local, _)| local)
    }
}

fn invalid_email() -> DomainError {
    DomainError::Validation("Please enter a valid email address.".to_string())
}

/// ログイン資格情報
///
/// CMS へそのまま送信する形で JSON にシリアライズされる。
#[derive(Debug, Clone, Serialize)]
pub struct LoginCredentials {
    identifier: String,
    password:   PlainPassword,
}

impl LoginCredentials {
    /// 資格情報を作成する
    ///
    /// `identifier`（メールアドレスまたはユーザー名）と `password` はどちらも必須。
    pub fn new(
        identifier: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let identifier = identifier.into().trim().to_string();
        let password = PlainPassword::new(password);

        if identifier.is_empty() || password.is_empty() {
            return Err(DomainError::Validation(
                "Please enter your email and password.".to_string(),
            ));
        }

        Ok(Self {
            identifier,
            password,
        })
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn password(&self) -> &PlainPassword {
        &self.password
    }
}

/// 会員登録フォームの入力値
#[derive(Debug, Clone, Copy)]
pub struct RegistrationForm<'a> {
    pub name:             &'a str,
    pub email:            &'a str,
    pub password:         &'a str,
    pub confirm_password: &'a str,
    pub agreed_to_terms:  bool,
}

/// 会員登録
///
/// 検証済みの入力値。CMS の登録エンドポイントへ送信する形で JSON にシリアライズされる。
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    username: String,
    email:    Email,
    password: PlainPassword,
}

impl Registration {
    /// フォームの入力値を検証する
    ///
    /// # バリデーション
    ///
    /// 1. メールアドレスの形式
    /// 2. パスワードポリシー（8 文字以上、大文字・小文字・数字を含む）
    /// 3. 確認用パスワードの一致（空は不一致扱い）
    /// 4. 利用規約への同意
    ///
    /// ユーザー名は名前を trim した値、空ならメールアドレスのローカル部を使う。
    pub fn new(form: RegistrationForm<'_>) -> Result<Self, DomainError> {
        let email = Email::new(form.email)?;
        let password = PlainPassword::new(form.password);

        let strength = PasswordStrength::evaluate(&password);
        if !strength.is_strong() {
            let unmet: Vec<String> = strength.unmet().iter().map(|r| r.to_string()).collect();
            return Err(DomainError::Validation(format!(
                "Password must include: {}",
                unmet.join(", ")
            )));
        }

        if password.is_empty() || form.password != form.confirm_password {
            return Err(DomainError::Validation(
                "Passwords do not match".to_string(),
            ));
        }

        if !form.agreed_to_terms {
            return Err(DomainError::Validation(
                "Please agree to the Terms of Service and Privacy Policy.".to_string(),
            ));
        }

        let name = form.name.trim();
        let username = if name.is_empty() {
            email.local_part().to_string()
        } else {
            name.to_string()
        };

        Ok(Self {
            username,
            email,
            password,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &Email {
        &self.email
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn form() -> RegistrationForm<'static> {
        RegistrationForm {
            name:             "  Ayu Lestari ",
            email:            "ayu@example.com",
            password:         "Wander1ust",
            confirm_password: "Wander1ust",
            agreed_to_terms:  true,
        }
    }

    #[rstest]
    #[case("user@example.com")]
    #[case("  spaced@example.com  ")]
    fn test_正しい形式のメールアドレスを受け付ける(#[case] input: &str) {
        assert!(Email::new(input).is_ok());
    }

    #[rstest]
    #[case("", "Email is required")]
    #[case("no-at-mark", "Please enter a valid email address.")]
    #[case("@example.com", "Please enter a valid email address.")]
    #[case("user@", "Please enter a valid email address.")]
    fn test_不正なメールアドレスはエラー(#[case] input: &str, #[case] message: &str) {
        assert_eq!(
            Email::new(input),
            Err(DomainError::Validation(message.to_string()))
        );
    }

    #[rstest]
    fn test_長すぎるメールアドレスはエラー() {
        let input = format!("{}@example.com", "a".repeat(250));
        assert!(Email::new(input).is_err());
    }

    #[rstest]
    #[case("", "secret")]
    #[case("user@example.com", "")]
    #[case("   ", "secret")]
    fn test_ログインはメールとパスワードの両方が必須(
        #[case] identifier: &str,
        #[case] password: &str,
    ) {
        let result = LoginCredentials::new(identifier, password);

        assert_eq!(
            result.unwrap_err().to_string(),
            "Please enter your email and password."
        );
    }

    #[rstest]
    fn test_ログイン資格情報はcmsの形でシリアライズされる() {
        let credentials = LoginCredentials::new("ayu@example.com", "Wander1ust").unwrap();

        assert_eq!(
            serde_json::to_value(&credentials).unwrap(),
            serde_json::json!({"identifier": "ayu@example.com", "password": "Wander1ust"})
        );
    }

    #[rstest]
    fn test_名前をtrimしてユーザー名にする(form: RegistrationForm<'static>) {
        let registration = Registration::new(form).unwrap();

        assert_eq!(registration.username(), "Ayu Lestari");
        assert_eq!(
            serde_json::to_value(&registration).unwrap(),
            serde_json::json!({
                "username": "Ayu Lestari",
                "email": "ayu@example.com",
                "password": "Wander1ust"
            })
        );
    }

    #[rstest]
    fn test_名前が空ならメールのローカル部をユーザー名にする(
        form: RegistrationForm<'static>,
    ) {
        let registration = Registration::new(RegistrationForm { name: "   ", ..form }).unwrap();

        assert_eq!(registration.username(), "ayu");
    }

    #[rstest]
    fn test_弱いパスワードは満たしていない要件を示す(form: RegistrationForm<'static>) {
        let result = Registration::new(RegistrationForm {
            password: "wanderlust",
            confirm_password: "wanderlust",
            ..form
        });

        assert_eq!(
            result.unwrap_err().to_string(),
            "Password must include: Uppercase, Number"
        );
    }

    #[rstest]
    fn test_確認用パスワードが一致しないとエラー(form: RegistrationForm<'static>) {
        let result = Registration::new(RegistrationForm {
            confirm_password: "Wander1usT",
            ..form
        });

        assert_eq!(result.unwrap_err().to_string(), "Passwords do not match");
    }

    #[rstest]
    fn test_利用規約に同意していないとエラー(form: RegistrationForm<'static>) {
        let result = Registration::new(RegistrationForm {
            agreed_to_terms: false,
            ..form
        });

        assert_eq!(
            result.unwrap_err().to_string(),
            "Please agree to the Terms of Service and Privacy Policy."
        );
    }
}
