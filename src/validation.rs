//! Request body schemas.
//!
//! Each `parse` takes the raw request body and either returns the typed
//! payload or every field problem found, never stopping at the first one.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::app::FieldErrors;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex")
});

#[derive(Debug, Clone, PartialEq)]
pub struct SignupInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlogInput {
    pub title: String,
    pub content: String,
    pub img_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommentInput {
    pub content: String,
}

impl SignupInput {
    pub fn parse(body: &str) -> Result<SignupInput, FieldErrors> {
        let mut fields = Fields::from_body(body)?;
        let username = fields.string("username").and_then(|v| fields.length(v, "username", 4, Some(20)));
        let email = fields.string("email").and_then(|v| fields.email(v, "email"));
        let password = fields.string("password").and_then(|v| fields.length(v, "password", 3, None));

        match (username, email, password) {
            (Some(username), Some(email), Some(password)) if fields.errors.is_empty() => Ok(SignupInput {
                username,
                email,
                password,
            }),
            _ => Err(fields.errors),
        }
    }
}

impl LoginInput {
    pub fn parse(body: &str) -> Result<LoginInput, FieldErrors> {
        let mut fields = Fields::from_body(body)?;
        let email = fields.string("email").and_then(|v| fields.email(v, "email"));
        let password = fields.string("password").and_then(|v| fields.length(v, "password", 3, None));

        match (email, password) {
            (Some(email), Some(password)) if fields.errors.is_empty() => Ok(LoginInput { email, password }),
            _ => Err(fields.errors),
        }
    }
}

impl BlogInput {
    pub fn parse(body: &str) -> Result<BlogInput, FieldErrors> {
        let mut fields = Fields::from_body(body)?;
        let title = fields.string("title").and_then(|v| fields.length(v, "title", 3, None));
        let content = fields.string("content");
        let img_url = fields.optional_string("imgUrl");

        match (title, content) {
            (Some(title), Some(content)) if fields.errors.is_empty() => Ok(BlogInput {
                title,
                content,
                img_url,
            }),
            _ => Err(fields.errors),
        }
    }
}

impl CommentInput {
    pub fn parse(body: &str) -> Result<CommentInput, FieldErrors> {
        let mut fields = Fields::from_body(body)?;
        let content = fields.string("content").and_then(|v| fields.length(v, "content", 1, None));

        match content {
            Some(content) if fields.errors.is_empty() => Ok(CommentInput { content }),
            _ => Err(fields.errors),
        }
    }
}

/// Field accessor that records a message for every bad field
struct Fields {
    object: Map<String, Value>,
    errors: FieldErrors,
}

impl Fields {
    fn from_body(body: &str) -> Result<Fields, FieldErrors> {
        match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(object)) => Ok(Fields {
                object,
                errors: FieldErrors::default(),
            }),
            _ => {
                let mut errors = FieldErrors::default();
                errors.add("body", "Expected a JSON object");
                Err(errors)
            }
        }
    }

    fn string(&mut self, name: &str) -> Option<String> {
        match self.object.get(name) {
            Some(Value::String(value)) => Some(value.clone()),
            None | Some(Value::Null) => {
                self.errors.add(name, "Required");
                None
            }
            Some(_) => {
                self.errors.add(name, "Expected string");
                None
            }
        }
    }

    fn optional_string(&mut self, name: &str) -> Option<String> {
        match self.object.get(name) {
            Some(Value::String(value)) => Some(value.clone()),
            None | Some(Value::Null) => None,
            Some(_) => {
                self.errors.add(name, "Expected string");
                None
            }
        }
    }

    fn length(&mut self, value: String, name: &str, min: usize, max: Option<usize>) -> Option<String> {
        let len = value.chars().count();
        if len < min {
            self.errors.add(name, format!("Must contain at least {} character(s)", min));
            return None;
        }
        if let Some(max) = max {
            if len > max {
                self.errors.add(name, format!("Must contain at most {} character(s)", max));
                return None;
            }
        }

        Some(value)
    }

    fn email(&mut self, value: String, name: &str) -> Option<String> {
        if !EMAIL_RE.is_match(&value) {
            self.errors.add(name, "Invalid email");
            return None;
        }

        Some(value)
    }
}
