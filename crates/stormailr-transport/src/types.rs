//! Message types consumed by the delivery pipeline
//!
//! An [`OutboundMessage`] is composed by the caller and handed over whole for
//! each send. It is never mutated here.

use serde::{Deserialize, Serialize};

/// A mailbox: email address plus optional display name (empty when absent)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub email: String,
    #[serde(default)]
    pub name: String,
}

impl Address {
    pub fn new(email: &str, name: &str) -> Self {
        Self {
            email: email.to_string(),
            name: name.to_string(),
        }
    }

    /// Address without a display name
    pub fn email_only(email: &str) -> Self {
        Self::new(email, "")
    }
}

/// Delivery priority hint forwarded to the remote API
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Low,
    Normal,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully composed message ready for delivery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Sender mailbox
    pub from: Address,

    /// Primary recipients
    #[serde(default)]
    pub to: Vec<Address>,

    /// CC recipients
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cc: Vec<Address>,

    /// BCC recipients
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bcc: Vec<Address>,

    pub subject: String,

    /// HTML body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_body: Option<String>,

    /// Plain text body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_body: Option<String>,

    #[serde(default)]
    pub priority: Priority,
}

impl OutboundMessage {
    /// Create a single-recipient HTML message
    pub fn simple(from: Address, to: Address, subject: &str, html: &str) -> Self {
        Self {
            from,
            to: vec![to],
            cc: vec![],
            bcc: vec![],
            subject: subject.to_string(),
            html_body: Some(html.to_string()),
            text_body: None,
            priority: Priority::default(),
        }
    }

    /// Add plain text version
    pub fn with_text(mut self, text: &str) -> Self {
        self.text_body = Some(text.to_string());
        self
    }

    pub fn with_cc(mut self, cc: Address) -> Self {
        self.cc.push(cc);
        self
    }

    pub fn with_bcc(mut self, bcc: Address) -> Self {
        self.bcc.push(bcc);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Every recipient email across to, cc and bcc, in that order
    pub fn recipient_emails(&self) -> Vec<&str> {
        self.to
            .iter()
            .chain(&self.cc)
            .chain(&self.bcc)
            .map(|address| address.email.as_str())
            .collect()
    }

    /// Check the message is complete enough to be worth a network call.
    ///
    /// Rules are checked in order and the first failure wins: at least one
    /// recipient, a non-blank subject, then at least one non-empty body.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.to.is_empty() && self.cc.is_empty() && self.bcc.is_empty() {
            return Err(ValidationError::NoRecipients);
        }

        if self.subject.trim().is_empty() {
            return Err(ValidationError::MissingSubject);
        }

        let has_html = self.html_body.as_deref().is_some_and(|b| !b.is_empty());
        let has_text = self.text_body.as_deref().is_some_and(|b| !b.is_empty());
        if !has_html && !has_text {
            return Err(ValidationError::MissingBody);
        }

        Ok(())
    }
}

/// Validation error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Message has no recipients in to, cc or bcc")]
    NoRecipients,

    #[error("Message subject is empty")]
    MissingSubject,

    #[error("Message must have either html or text content")]
    MissingBody,
}
