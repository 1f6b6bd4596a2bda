//! File identifiers used as row keys in the history table

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use thiserror::Error;

/// Reason a string cannot be used as a file key
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidFileKey {
    #[error("file key is empty")]
    Empty,

    #[error("file key {0:?} contains a tab or line break")]
    Separator(String),
}

/// Identifier (usually a path) of a test source file
///
/// Keys never contain the table's field or record separators, so every key
/// survives a write/read cycle unchanged. Ordering is lexicographic by byte.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FileKey(String);

impl FileKey {
    /// Validate and wrap a file identifier
    pub fn new(key: impl Into<String>) -> Result<Self, InvalidFileKey> {
        let key = key.into();
        if key.is_empty() {
            return Err(InvalidFileKey::Empty);
        }
        if key.contains(['\t', '\n', '\r']) {
            return Err(InvalidFileKey::Separator(key));
        }
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for FileKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FileKey {
    type Error = InvalidFileKey;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for FileKey {
    type Error = InvalidFileKey;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FileKey> for String {
    fn from(key: FileKey) -> Self {
        key.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_key_accepts_paths() {
        let key = FileKey::new("spec/models/user_spec.rb").unwrap();
        assert_eq!(key.as_str(), "spec/models/user_spec.rb");
        assert_eq!(key.to_string(), "spec/models/user_spec.rb");
    }

    #[test]
    fn test_file_key_rejects_empty() {
        assert_eq!(FileKey::new(""), Err(InvalidFileKey::Empty));
    }

    #[test]
    fn test_file_key_rejects_separators() {
        assert!(FileKey::new("a\tb").is_err());
        assert!(FileKey::new("a\nb").is_err());
        assert!(FileKey::new("a\r").is_err());
    }

    #[test]
    fn test_file_key_ordering_is_lexicographic() {
        let mut keys = vec![
            FileKey::new("b_spec.rb").unwrap(),
            FileKey::new("A_spec.rb").unwrap(),
            FileKey::new("a_spec.rb").unwrap(),
        ];
        keys.sort();
        let names: Vec<_> = keys.iter().map(FileKey::as_str).collect();
        assert_eq!(names, ["A_spec.rb", "a_spec.rb", "b_spec.rb"]);
    }

    #[test]
    fn test_file_key_serde_validates() {
        let key: FileKey = serde_json::from_str("\"a_spec.rb\"").unwrap();
        assert_eq!(key.as_str(), "a_spec.rb");
        assert!(serde_json::from_str::<FileKey>("\"a\\tb\"").is_err());
    }
}
