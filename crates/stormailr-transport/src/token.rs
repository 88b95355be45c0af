//! Request authentication tokens
//!
//! Each request carries a single-use token of the form
//!
//! ```text
//! {user}:{base64(HMAC-SHA512(secret, user ++ entropy ++ timestamp))}.{entropy}.{timestamp}
//! ```
//!
//! where `entropy` is 32 random bytes hex-encoded and `timestamp` is Unix
//! seconds. The server re-derives the MAC, so the layout must not change.
//! Freshness windows are enforced remotely; nothing here caches or expires.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha512;

use crate::error::BoxError;
use crate::providers::RandomBytes;

type HmacSha512 = Hmac<Sha512>;

pub const TOKEN_HEADER: &str = "X-AUTH-TOKEN";
pub const ALGORITHM_HEADER: &str = "X-AUTH-ALGORITHM";
pub const ALGORITHM: &str = "sha512";

/// Bytes of entropy drawn per token (hex-encoded to 64 chars)
const ENTROPY_BYTES: usize = 32;

/// A freshly generated authentication header pair
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken {
    pub header_value: String,
    pub algorithm: &'static str,
}

impl AuthToken {
    /// Header name/value pairs to attach to the request
    pub fn headers(&self) -> [(&'static str, String); 2] {
        [
            (TOKEN_HEADER, self.header_value.clone()),
            (ALGORITHM_HEADER, self.algorithm.to_string()),
        ]
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthToken")
            .field("header_value", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

/// Generate a new token for `user`, signed with `secret`
pub fn generate_token(
    user: &str,
    secret: &str,
    now: DateTime<Utc>,
    random: &dyn RandomBytes,
) -> Result<AuthToken, BoxError> {
    let mut bytes = [0u8; ENTROPY_BYTES];
    random.fill(&mut bytes)?;
    let entropy = hex::encode(bytes);
    let timestamp = now.timestamp().to_string();

    let mac = sign(user, secret, &entropy, &timestamp)?;

    Ok(AuthToken {
        header_value: format!("{user}:{mac}.{entropy}.{timestamp}"),
        algorithm: ALGORITHM,
    })
}

/// base64 HMAC-SHA512 over `user ++ entropy ++ timestamp`
fn sign(user: &str, secret: &str, entropy: &str, timestamp: &str) -> Result<String, BoxError> {
    let mut mac = HmacSha512::new_from_slice(secret.as_bytes())
        .map_err(|e| format!("HMAC error: {}", e))?;
    mac.update(user.as_bytes());
    mac.update(entropy.as_bytes());
    mac.update(timestamp.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    struct FixedBytes(u8);

    impl RandomBytes for FixedBytes {
        fn fill(&self, dest: &mut [u8]) -> Result<(), BoxError> {
            dest.fill(self.0);
            Ok(())
        }
    }

    struct BrokenRandom;

    impl RandomBytes for BrokenRandom {
        fn fill(&self, _dest: &mut [u8]) -> Result<(), BoxError> {
            Err("entropy pool unavailable".into())
        }
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    /// Split `user:mac.entropy.timestamp` back into parts
    fn parse(header: &str) -> (&str, &str, &str, &str) {
        let (user, signed) = header.split_once(':').unwrap();
        let mut parts = signed.splitn(3, '.');
        (
            user,
            parts.next().unwrap(),
            parts.next().unwrap(),
            parts.next().unwrap(),
        )
    }

    fn recompute(user: &str, secret: &str, entropy: &str, timestamp: &str) -> String {
        let mut mac = HmacSha512::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(format!("{user}{entropy}{timestamp}").as_bytes());
        BASE64.encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_token_layout() {
        let token = generate_token("app", "s3cret", at(1_709_769_600), &FixedBytes(0xab)).unwrap();
        let (user, mac, entropy, timestamp) = parse(&token.header_value);

        assert_eq!(user, "app");
        assert_eq!(entropy, "ab".repeat(32));
        assert_eq!(timestamp, "1709769600");
        assert_eq!(mac, recompute("app", "s3cret", entropy, timestamp));
        assert_eq!(token.algorithm, "sha512");
    }

    #[test]
    fn test_headers() {
        let token = generate_token("app", "key", at(1), &FixedBytes(0)).unwrap();
        let headers = token.headers();
        assert_eq!(headers[0].0, "X-AUTH-TOKEN");
        assert_eq!(headers[0].1, token.header_value);
        assert_eq!(headers[1], ("X-AUTH-ALGORITHM", "sha512".to_string()));
    }

    #[test]
    fn test_secret_changes_mac() {
        let a = generate_token("app", "one", at(10), &FixedBytes(1)).unwrap();
        let b = generate_token("app", "two", at(10), &FixedBytes(1)).unwrap();
        assert_ne!(a.header_value, b.header_value);
    }

    #[test]
    fn test_random_failure_propagates() {
        let err = generate_token("app", "key", at(1), &BrokenRandom).unwrap_err();
        assert_eq!(err.to_string(), "entropy pool unavailable");
    }

    #[test]
    fn test_debug_redacts() {
        let token = generate_token("app", "key", at(1), &FixedBytes(7)).unwrap();
        let debug = format!("{:?}", token);
        assert!(!debug.contains(&token.header_value));
    }

    #[test]
    fn test_os_random_tokens_differ() {
        let random = crate::providers::OsRandom;
        let a = generate_token("app", "key", at(5), &random).unwrap();
        let b = generate_token("app", "key", at(5), &random).unwrap();
        assert_ne!(a.header_value, b.header_value);
    }

    proptest! {
        #[test]
        fn token_verifies(
            user in "[a-z0-9_]{1,16}",
            secret in "\\PC{0,32}",
            secs in 0i64..4_000_000_000,
            byte in any::<u8>(),
        ) {
            let token = generate_token(&user, &secret, at(secs), &FixedBytes(byte)).unwrap();
            let (u, mac, entropy, timestamp) = parse(&token.header_value);

            prop_assert_eq!(u, user.as_str());
            prop_assert_eq!(entropy.len(), 64);
            prop_assert!(entropy.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
            prop_assert_eq!(timestamp, secs.to_string());
            prop_assert_eq!(mac, recompute(&user, &secret, entropy, timestamp));
        }
    }
}
