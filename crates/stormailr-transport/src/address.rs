//! Recipient normalisation
//!
//! Converts anything recipient-like into the `{email, name}` pairs the API
//! expects. Order is preserved and nothing is filtered, deduplicated or
//! syntax-checked; the remote side owns address validation.

use crate::types::Address;

/// Something that can be addressed as a recipient
pub trait RecipientLike {
    fn email(&self) -> &str;

    /// Display name, if any
    fn name(&self) -> Option<&str>;
}

impl RecipientLike for Address {
    fn email(&self) -> &str {
        &self.email
    }

    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }
}

/// Bare `user@example.com` or `Display Name <user@example.com>`
impl RecipientLike for str {
    fn email(&self) -> &str {
        split_mailbox(self).0
    }

    fn name(&self) -> Option<&str> {
        split_mailbox(self).1
    }
}

impl RecipientLike for String {
    fn email(&self) -> &str {
        self.as_str().email()
    }

    fn name(&self) -> Option<&str> {
        self.as_str().name()
    }
}

impl<T: RecipientLike + ?Sized> RecipientLike for &T {
    fn email(&self) -> &str {
        (**self).email()
    }

    fn name(&self) -> Option<&str> {
        (**self).name()
    }
}

/// `(email, name)` pairs
impl<E: AsRef<str>, N: AsRef<str>> RecipientLike for (E, N) {
    fn email(&self) -> &str {
        self.0.as_ref()
    }

    fn name(&self) -> Option<&str> {
        Some(self.1.as_ref())
    }
}

/// Normalise a recipient list into canonical addresses
pub fn normalize<R: RecipientLike>(recipients: &[R]) -> Vec<Address> {
    recipients
        .iter()
        .map(|recipient| Address {
            email: recipient.email().to_string(),
            name: recipient.name().unwrap_or_default().to_string(),
        })
        .collect()
}

/// Split `Name <email>` into its parts; anything else is taken as a bare email
fn split_mailbox(raw: &str) -> (&str, Option<&str>) {
    let trimmed = raw.trim();
    if let (Some(start), true) = (trimmed.rfind('<'), trimmed.ends_with('>')) {
        let email = trimmed[start + 1..trimmed.len() - 1].trim();
        let name = trimmed[..start].trim().trim_matches('"').trim();
        let name = (!name.is_empty()).then_some(name);
        return (email, name);
    }
    (raw, None)
}
