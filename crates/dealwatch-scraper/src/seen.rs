//! Persistent set of already-announced deal links.
//!
//! Stored as a JSON array of strings. Loading never fails: a missing file is
//! a first run and a corrupt file is logged and treated as empty, so a bad
//! write can at worst cause duplicate announcements, never a stuck bot.

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::ScraperError;

/// Links already announced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeenSet(HashSet<String>);

impl SeenSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, link: &str) -> bool {
        self.0.contains(link)
    }

    /// Returns `true` if the link was not already present.
    pub fn insert(&mut self, link: impl Into<String>) -> bool {
        self.0.insert(link.into())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    fn sorted(&self) -> Vec<&str> {
        let mut links: Vec<&str> = self.iter().collect();
        links.sort_unstable();
        links
    }
}

impl<S: Into<String>> FromIterator<S> for SeenSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone)]
pub struct SeenStore {
    path: PathBuf,
}

impl SeenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the seen set, falling back to an empty set on any problem.
    #[must_use]
    pub fn load(&self) -> SeenSet {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no seen-deals file yet; starting empty");
                return SeenSet::new();
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "could not read seen-deals file; starting empty"
                );
                return SeenSet::new();
            }
        };

        match serde_json::from_str::<Vec<String>>(&contents) {
            Ok(links) => {
                let seen: SeenSet = links.into_iter().collect();
                tracing::debug!(path = %self.path.display(), count = seen.len(), "loaded seen deals");
                seen
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "seen-deals file is corrupt; starting empty"
                );
                SeenSet::new()
            }
        }
    }

    /// Overwrites the file with `seen` as a sorted JSON array.
    ///
    /// The array is written to a sibling temp file and renamed into place so a
    /// crash mid-write leaves the previous file intact.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::SeenStoreIo`] if the directory or file cannot be written.
    /// - [`ScraperError::SeenStoreSerialize`] if serialization fails.
    pub fn save(&self, seen: &SeenSet) -> Result<(), ScraperError> {
        let io_err = |source| ScraperError::SeenStoreIo {
            path: self.path.display().to_string(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(&seen.sorted())?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;

        tracing::debug!(path = %self.path.display(), count = seen.len(), "saved seen deals");
        Ok(())
    }
}
