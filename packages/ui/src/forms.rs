//! Client-side form validation.
//!
//! Each form validates into the request payload it feeds, or into
//! [`FormErrors`] keyed by field name. Controllers validate before touching
//! the network, so a rejected form never produces a request.

use std::fmt;

use api::{ImageUpload, NewPost, RegisterRequest, User, UserUpdate};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Per-field validation messages in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    fields: Vec<(&'static str, String)>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.push((field, message.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Message for `field`, if it failed.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, message)| message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(name, message)| (*name, message.as_str()))
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FormErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (_, message)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            f.write_str(message)?;
        }
        Ok(())
    }
}

impl std::error::Error for FormErrors {}

fn required(errors: &mut FormErrors, field: &'static str, label: &str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, format!("{label} is required"));
    }
}

fn password(errors: &mut FormErrors, value: &str) {
    if value.chars().count() < MIN_PASSWORD_LEN {
        errors.add(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        );
    }
}

fn email(errors: &mut FormErrors, value: &str) {
    if !is_valid_email(value.trim()) {
        errors.add("email", "Invalid email address");
    }
}

/// `local@domain.tld` with no whitespace and a dot inside the domain.
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !host.starts_with('.') && tld.len() >= 2,
        None => false,
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// Returns the trimmed identifier and the password.
    pub fn validate(&self) -> Result<(String, String), FormErrors> {
        let mut errors = FormErrors::new();
        email(&mut errors, &self.email);
        password(&mut errors, &self.password);
        errors.into_result(|| (self.email.trim().to_string(), self.password.clone()))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignUpForm {
    pub email: String,
    pub full_name: String,
    pub user_name: String,
    pub password: String,
}

impl SignUpForm {
    pub fn validate(&self) -> Result<RegisterRequest, FormErrors> {
        let mut errors = FormErrors::new();
        email(&mut errors, &self.email);
        required(&mut errors, "full_name", "Full name", &self.full_name);
        required(&mut errors, "user_name", "Username", &self.user_name);
        password(&mut errors, &self.password);
        errors.into_result(|| RegisterRequest {
            email: self.email.trim().to_string(),
            full_name: self.full_name.trim().to_string(),
            user_name: self.user_name.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewPostForm {
    pub title: String,
    pub content: String,
    pub image: Option<ImageUpload>,
}

impl NewPostForm {
    pub fn validate(&self) -> Result<NewPost, FormErrors> {
        let mut errors = FormErrors::new();
        required(&mut errors, "title", "Title", &self.title);
        required(&mut errors, "content", "Content", &self.content);
        errors.into_result(|| NewPost {
            title: self.title.trim().to_string(),
            content: self.content.trim().to_string(),
            image: self.image.clone(),
        })
    }
}

/// Editable profile fields. Email and avatar are carried over from the
/// current user unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileForm {
    pub full_name: String,
    pub user_name: String,
}

impl ProfileForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            full_name: user.full_name.clone(),
            user_name: user.user_name.clone(),
        }
    }

    pub fn validate(&self, current: &User) -> Result<UserUpdate, FormErrors> {
        let mut errors = FormErrors::new();
        required(&mut errors, "full_name", "Full name", &self.full_name);
        required(&mut errors, "user_name", "Username", &self.user_name);
        errors.into_result(|| UserUpdate {
            full_name: self.full_name.trim().to_string(),
            user_name: self.user_name.trim().to_string(),
            ..UserUpdate::from(current)
        })
    }
}

/// Comment bodies must contain something other than whitespace.
pub fn validate_comment(content: &str) -> Result<String, FormErrors> {
    let mut errors = FormErrors::new();
    required(&mut errors, "content", "Comment", content);
    errors.into_result(|| content.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("ann@example.com"));
        assert!(is_valid_email("a.b+c@mail.example.org"));
        assert!(!is_valid_email("ann"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ann@example"));
        assert!(!is_valid_email("ann@.com"));
        assert!(!is_valid_email("an n@example.com"));
        assert!(!is_valid_email("ann@ex@ample.com"));
    }

    #[test]
    fn test_login_form_collects_every_field() {
        let errors = LoginForm {
            email: "nope".into(),
            password: "123".into(),
        }
        .validate()
        .unwrap_err();

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("email"), Some("Invalid email address"));
        assert_eq!(
            errors.get("password"),
            Some("Password must be at least 6 characters")
        );
        assert_eq!(
            errors.to_string(),
            "Invalid email address; Password must be at least 6 characters"
        );
    }

    #[test]
    fn test_login_form_trims_email() {
        let (email, password) = LoginForm {
            email: "  ann@example.com ".into(),
            password: "secret1".into(),
        }
        .validate()
        .unwrap();
        assert_eq!(email, "ann@example.com");
        assert_eq!(password, "secret1");
    }

    #[test]
    fn test_sign_up_form() {
        let request = SignUpForm {
            email: "ann@example.com".into(),
            full_name: " Ann Lee ".into(),
            user_name: "ann".into(),
            password: "secret1".into(),
        }
        .validate()
        .unwrap();
        assert_eq!(request.full_name, "Ann Lee");

        let errors = SignUpForm::default().validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|(f, _)| f).collect();
        assert_eq!(fields, ["email", "full_name", "user_name", "password"]);
    }

    #[test]
    fn test_new_post_requires_title_and_content() {
        let errors = NewPostForm {
            title: "   ".into(),
            content: "body".into(),
            image: None,
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.get("title"), Some("Title is required"));
        assert!(errors.get("content").is_none());

        let post = NewPostForm {
            title: " Hello ".into(),
            content: "World".into(),
            image: None,
        }
        .validate()
        .unwrap();
        assert_eq!(post.title, "Hello");
    }

    #[test]
    fn test_profile_form_keeps_email() {
        let user = User {
            id: "u1".into(),
            email: "ann@example.com".into(),
            user_name: "ann".into(),
            full_name: "Ann".into(),
            avatar_url: Some("/img/ann.png".into()),
            refresh_tokens: Vec::new(),
        };
        let mut form = ProfileForm::from_user(&user);
        form.user_name = "annie".into();

        let update = form.validate(&user).unwrap();
        assert_eq!(update.user_name, "annie");
        assert_eq!(update.email, "ann@example.com");
        assert_eq!(update.avatar_url.as_deref(), Some("/img/ann.png"));

        form.full_name.clear();
        assert!(form.validate(&user).unwrap_err().get("full_name").is_some());
    }

    #[test]
    fn test_comment_validation() {
        assert_eq!(validate_comment("  nice  ").unwrap(), "nice");
        assert!(validate_comment(" \n ").is_err());
    }
}
