//! Injected capabilities: wall clock, randomness and slugging
//!
//! The delivery client never reaches for ambient globals. Tests swap these for
//! fixed implementations to make tokens and campaign names deterministic.

use chrono::{DateTime, Utc};
use rand_core::{OsRng, RngCore};

use crate::error::BoxError;

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// System wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Cryptographically secure randomness
pub trait RandomBytes: Send + Sync {
    fn fill(&self, dest: &mut [u8]) -> Result<(), BoxError>;
}

/// Operating system CSPRNG
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomBytes for OsRandom {
    fn fill(&self, dest: &mut [u8]) -> Result<(), BoxError> {
        OsRng.try_fill_bytes(dest)?;
        Ok(())
    }
}

/// Turns free text into a URL-safe identifier
pub trait Slugger: Send + Sync {
    fn slug(&self, input: &str) -> String;
}

/// Lowercase ASCII slugs joined with a single separator
#[derive(Debug, Clone, Copy)]
pub struct AsciiSlugger {
    separator: char,
}

impl Default for AsciiSlugger {
    fn default() -> Self {
        Self { separator: '-' }
    }
}

impl AsciiSlugger {
    pub fn with_separator(separator: char) -> Self {
        Self { separator }
    }
}

impl Slugger for AsciiSlugger {
    fn slug(&self, input: &str) -> String {
        let ascii = deunicode::deunicode(input);
        let mut slug = String::with_capacity(ascii.len());
        let mut pending_separator = false;

        for c in ascii.chars() {
            if c.is_ascii_alphanumeric() {
                if pending_separator && !slug.is_empty() {
                    slug.push(self.separator);
                }
                pending_separator = false;
                slug.push(c.to_ascii_lowercase());
            } else {
                pending_separator = true;
            }
        }

        slug
    }
}
