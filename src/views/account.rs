//! Login and registration forms.

use super::Notice;
use crate::{AuthOutcome, Session};

const MISSING_FIELDS_MESSAGE: &str = "Please fill in all fields";

#[derive(Debug, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    error: Option<String>,
    submitting: bool,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    /// Inline error from the last attempt.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub async fn submit(&mut self, session: &mut Session) -> Notice {
        if self.email.trim().is_empty() || self.password.is_empty() {
            self.error = Some(MISSING_FIELDS_MESSAGE.to_string());
            return Notice::error(MISSING_FIELDS_MESSAGE);
        }
        self.error = None;
        self.submitting = true;
        let outcome = session.login(self.email.trim(), &self.password).await;
        self.submitting = false;
        self.finish(outcome, "Logged in successfully")
    }

    fn finish(&mut self, outcome: AuthOutcome, success: &str) -> Notice {
        if outcome.success {
            self.password.clear();
            return Notice::success(success);
        }
        let message = outcome.error.unwrap_or_else(|| "Login failed".to_string());
        self.error = Some(message.clone());
        Notice::error(message)
    }
}

#[derive(Debug, Default)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    error: Option<String>,
    submitting: bool,
}

impl RegisterForm {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub async fn submit(&mut self, session: &mut Session) -> Notice {
        if self.name.trim().is_empty() || self.email.trim().is_empty() || self.password.is_empty()
        {
            self.error = Some(MISSING_FIELDS_MESSAGE.to_string());
            return Notice::error(MISSING_FIELDS_MESSAGE);
        }
        self.error = None;
        self.submitting = true;
        let outcome = session
            .register(self.name.trim(), self.email.trim(), &self.password)
            .await;
        self.submitting = false;

        if !outcome.success {
            let message = outcome
                .error
                .unwrap_or_else(|| "Registration failed".to_string());
            self.error = Some(message.clone());
            return Notice::error(message);
        }
        self.password.clear();
        if session.is_authenticated() {
            Notice::success("Account created")
        } else {
            Notice::info("Account created. Please log in.")
        }
    }
}
