//! Version token extraction from line-oriented build descriptors.
//!
//! A descriptor is any text file carrying a declaration such as
//! `FROM golang:1.7.4 AS builder`. Given the tag `FROM golang:`, the token is
//! the text after the tag up to the next whitespace: `1.7.4`.

use crate::types::VersionToken;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("failed to read descriptor file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("version token not found: no line in {source_name} starts with '{tag}'")]
    NotFound { source_name: String, tag: String },
    #[error("empty version token in {source_name} line {line_no}: '{line}'")]
    EmptyToken {
        source_name: String,
        line_no: usize,
        line: String,
    },
    #[error("descriptor tag must not be empty")]
    EmptyTag,
}

/// Literal prefix identifying the declaration line that carries a version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPattern(String);

impl TagPattern {
    /// Leading whitespace is dropped, since lines are matched after their own
    /// indentation is stripped.
    pub fn new(tag: impl Into<String>) -> Result<Self, DescriptorError> {
        let tag = tag.into();
        let tag = tag.trim_start();
        if tag.trim_end().is_empty() {
            return Err(DescriptorError::EmptyTag);
        }
        Ok(Self(tag.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Token following the tag on `line`, if the line carries the tag.
    ///
    /// `Some("")` means the tag matched but nothing follows it.
    pub fn capture<'a>(&self, line: &'a str) -> Option<&'a str> {
        let rest = line.trim_start().strip_prefix(self.0.as_str())?;
        Some(rest.split(char::is_whitespace).next().unwrap_or(""))
    }
}

impl fmt::Display for TagPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extract the version token from descriptor text. The first matching line
/// wins; `source_name` only labels errors.
pub fn extract_version_token_str(
    content: &str,
    tag: &TagPattern,
    source_name: &str,
) -> Result<VersionToken, DescriptorError> {
    for (idx, line) in content.lines().enumerate() {
        let Some(token) = tag.capture(line) else {
            continue;
        };
        if token.is_empty() {
            return Err(DescriptorError::EmptyToken {
                source_name: source_name.to_owned(),
                line_no: idx + 1,
                line: line.trim().to_owned(),
            });
        }
        return Ok(VersionToken::new(token));
    }
    Err(DescriptorError::NotFound {
        source_name: source_name.to_owned(),
        tag: tag.as_str().to_owned(),
    })
}

pub fn extract_version_token(
    path: impl AsRef<Path>,
    tag: &TagPattern,
) -> Result<VersionToken, DescriptorError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| DescriptorError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    extract_version_token_str(&content, tag, &path.display().to_string())
}
