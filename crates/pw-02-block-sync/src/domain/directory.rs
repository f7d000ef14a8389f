//! # Validator Directory
//!
//! Static producer-identity → display-name table, loaded once at startup.
//!
//! ## File Format
//!
//! ```toml
//! version = 1
//!
//! [[validators]]
//! identity = "A1B2C3D4E5F60718293A4B5C6D7E8F9001122334"
//! name = "Example Validator"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::errors::DirectoryError;

/// Directory file format version understood by this build.
pub const DIRECTORY_FORMAT_VERSION: u32 = 1;

/// Characters kept at each end of an unknown identity.
pub const FALLBACK_KEEP: usize = 6;

const ELLIPSIS: &str = "...";

/// One `[[validators]]` entry.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Producer token, compared byte for byte.
    pub identity: String,
    /// Display name.
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct DirectoryFile {
    version: u32,
    #[serde(default)]
    validators: Vec<DirectoryEntry>,
}

/// Immutable identity → name table.
#[derive(Clone, Debug, Default)]
pub struct ValidatorDirectory {
    entries: HashMap<String, String>,
}

impl ValidatorDirectory {
    /// Empty directory; every lookup falls back.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from entries, rejecting empty and duplicate identities.
    pub fn from_entries<I>(entries: I) -> Result<Self, DirectoryError>
    where
        I: IntoIterator<Item = DirectoryEntry>,
    {
        let mut map = HashMap::new();
        for entry in entries {
            if entry.identity.is_empty() {
                return Err(DirectoryError::EmptyIdentity(entry.name));
            }
            if map.contains_key(&entry.identity) {
                return Err(DirectoryError::DuplicateIdentity(entry.identity));
            }
            map.insert(entry.identity, entry.name);
        }
        Ok(Self { entries: map })
    }

    /// Parse the TOML directory format.
    pub fn parse(content: &str) -> Result<Self, DirectoryError> {
        let file: DirectoryFile =
            toml::from_str(content).map_err(|e| DirectoryError::Parse(e.to_string()))?;
        if file.version != DIRECTORY_FORMAT_VERSION {
            return Err(DirectoryError::UnsupportedVersion(file.version));
        }
        Self::from_entries(file.validators)
    }

    /// Read and parse a directory file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DirectoryError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| DirectoryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let directory = Self::parse(&content)?;
        tracing::info!(
            "[pw-02] Loaded {} validators from {}",
            directory.len(),
            path.display()
        );
        Ok(directory)
    }

    /// Exact-match lookup.
    pub fn lookup(&self, identity: &str) -> Option<&str> {
        self.entries.get(identity).map(String::as_str)
    }

    /// Directory name, or the truncated identity when unknown.
    pub fn display_name(&self, identity: &str) -> String {
        self.lookup(identity)
            .map(str::to_string)
            .unwrap_or_else(|| truncate_identity(identity))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entries are loaded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `first K + "..." + last K` characters; short tokens are returned whole.
pub fn truncate_identity(identity: &str) -> String {
    let chars: Vec<char> = identity.chars().collect();
    if chars.len() <= FALLBACK_KEEP * 2 + ELLIPSIS.len() {
        return identity.to_string();
    }
    let head: String = chars[..FALLBACK_KEEP].iter().collect();
    let tail: String = chars[chars.len() - FALLBACK_KEEP..].iter().collect();
    format!("{head}{ELLIPSIS}{tail}")
}
