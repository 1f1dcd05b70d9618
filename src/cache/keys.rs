//! Cache Key Module
//!
//! Derives fixed-length store keys from request identity. Keys have the form
//! `<namespace>_<32 hex chars>`, where the hex part is the first 128 bits of
//! a SHA-256 over the `|`-joined identity fields.

use std::fmt;

use sha2::{Digest, Sha256};

const FIELD_SEPARATOR: char = '|';
const ESCAPE: char = '\\';
const HASH_BYTES: usize = 16;

// == Namespace ==
/// Cache layers. Each layer owns a disjoint key prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Rendered HTML fragments
    Output,
    /// Raw upstream API payloads
    ApiData,
}

impl Namespace {
    pub fn as_str(self) -> &'static str {
        match self {
            Namespace::Output => "output",
            Namespace::ApiData => "apidata",
        }
    }

    /// Leading text shared by every key in this namespace.
    pub fn prefix(self) -> String {
        format!("{}_", self.as_str())
    }

    /// Starts a key in this namespace.
    pub fn key(self) -> KeyBuilder {
        KeyBuilder::new(self.as_str())
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// == Key Builder ==
/// Accumulates ordered identity fields for one key.
///
/// `identity` fields are lower-cased so user and repository names match
/// case-insensitively; `field` values are taken verbatim.
#[derive(Debug, Clone)]
pub struct KeyBuilder {
    namespace: String,
    fields: Vec<String>,
}

impl KeyBuilder {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            fields: Vec::new(),
        }
    }

    /// Appends a case-insensitive identity field (user, repo, list of repos).
    pub fn identity(mut self, value: &str) -> Self {
        self.fields.push(value.to_lowercase());
        self
    }

    /// Appends a case-sensitive parameter field.
    pub fn field(mut self, value: impl fmt::Display) -> Self {
        self.fields.push(value.to_string());
        self
    }

    pub fn build(&self) -> String {
        let mut joined = String::new();
        for field in &self.fields {
            for ch in field.chars() {
                if ch == FIELD_SEPARATOR || ch == ESCAPE {
                    joined.push(ESCAPE);
                }
                joined.push(ch);
            }
            joined.push(FIELD_SEPARATOR);
        }

        let digest = Sha256::digest(joined.as_bytes());
        format!("{}_{}", self.namespace, hex::encode(&digest[..HASH_BYTES]))
    }
}

// == Build Key ==
/// Builds a key treating every field as a case-insensitive identity field.
pub fn build_key<S: AsRef<str>>(namespace: &str, identity: &[S]) -> String {
    identity
        .iter()
        .fold(KeyBuilder::new(namespace), |builder, field| {
            builder.identity(field.as_ref())
        })
        .build()
}
