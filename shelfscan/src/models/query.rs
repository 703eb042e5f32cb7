//! Typed search queries

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where an identifier came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierSource {
    Barcode,
    IsbnText,
    TitleText,
    Manual,
}

impl fmt::Display for IdentifierSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IdentifierSource::Barcode => "barcode",
            IdentifierSource::IsbnText => "ISBN OCR",
            IdentifierSource::TitleText => "title OCR",
            IdentifierSource::Manual => "manual entry",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    Isbn,
    Title,
}

impl QueryKind {
    /// Catalog search prefix for this kind
    pub fn prefix(&self) -> &'static str {
        match self {
            QueryKind::Isbn => "isbn:",
            QueryKind::Title => "intitle:",
        }
    }
}

/// A search request derived from recognized input
///
/// Constructed only through [`Query::isbn`] and [`Query::title`], which
/// enforce the value invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Query {
    kind: QueryKind,
    value: String,
}

impl Query {
    /// ISBN query; `None` unless the value has ISBN shape
    pub fn isbn(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if has_isbn_shape(&value) {
            Some(Self {
                kind: QueryKind::Isbn,
                value,
            })
        } else {
            None
        }
    }

    /// Title query; `None` for empty or whitespace-only values
    pub fn title(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            None
        } else {
            Some(Self {
                kind: QueryKind::Title,
                value,
            })
        }
    }

    pub fn kind(&self) -> QueryKind {
        self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Prefixed catalog search term, e.g. `isbn:9784061519677`
    pub fn search_term(&self) -> String {
        format!("{}{}", self.kind.prefix(), self.value)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.search_term())
    }
}

/// At least 10 characters, all ASCII digits except an optional final `X`
pub fn has_isbn_shape(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() < 10 {
        return false;
    }
    let (last, body) = match bytes.split_last() {
        Some(split) => split,
        None => return false,
    };
    body.iter().all(u8::is_ascii_digit) && (last.is_ascii_digit() || *last == b'X')
}
