//! User identity used to send the digest.

use std::fmt;

use crate::error::{AppError, Result};

/// The user's email address (persisted) and session password (memory only).
#[derive(Default, Clone)]
pub struct Identity {
    email: String,
    password: Option<String>,
}

impl Identity {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: None,
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = Some(password.into());
    }

    pub fn clear_password(&mut self) {
        self.password = None;
    }

    /// Build the scoped credentials handed to a notifier.
    ///
    /// Fails when the email is blank or no password was supplied this session.
    pub fn credentials(&self) -> Result<Credentials> {
        match self.password.as_deref() {
            Some(password) if !self.email.trim().is_empty() && !password.is_empty() => {
                Ok(Credentials {
                    email: self.email.trim().to_string(),
                    password: password.to_string(),
                })
            }
            _ => Err(AppError::MissingCredentials),
        }
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Login for one mail send.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
