//! Wordlist sources consumed by the dictionary attack.
//!
//! Registration and bookkeeping of wordlists live elsewhere; this module only
//! resolves a reference to an ordered list of trimmed, non-blank entries.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{CrackError, Result};

/// Resolves a wordlist reference to its candidate strings.
pub trait WordlistSource: Send + Sync {
    fn load(&self, name: &str) -> Result<Vec<String>>;
}

/// Trims every line and drops blank ones, keeping order.
pub fn clean_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reads wordlists from disk, relative to a base directory.
#[derive(Debug, Clone)]
pub struct DirectoryWordlists {
    root: PathBuf,
}

impl DirectoryWordlists {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    // A reference that exists as given wins over one under the root directory.
    fn resolve(&self, name: &str) -> PathBuf {
        let direct = Path::new(name);
        if direct.is_absolute() || direct.exists() {
            direct.to_path_buf()
        } else {
            self.root.join(name)
        }
    }
}

impl WordlistSource for DirectoryWordlists {
    fn load(&self, name: &str) -> Result<Vec<String>> {
        let path = self.resolve(name);
        let bytes = std::fs::read(&path).map_err(|e| {
            CrackError::ResourceUnavailable(format!("wordlist {} unreadable: {e}", path.display()))
        })?;
        let words = clean_lines(&String::from_utf8_lossy(&bytes));
        if words.is_empty() {
            return Err(CrackError::ResourceUnavailable(format!(
                "wordlist {} is empty",
                path.display()
            )));
        }
        debug!(path = %path.display(), entries = words.len(), "Loaded wordlist");
        Ok(words)
    }
}

/// In-memory wordlists keyed by name.
#[derive(Debug, Clone, Default)]
pub struct StaticWordlists {
    lists: HashMap<String, Vec<String>>,
}

impl StaticWordlists {
    pub fn with<I, S>(mut self, name: &str, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();
        self.lists.insert(name.to_string(), words);
        self
    }
}

impl WordlistSource for StaticWordlists {
    fn load(&self, name: &str) -> Result<Vec<String>> {
        match self.lists.get(name) {
            Some(words) if !words.is_empty() => Ok(words.clone()),
            Some(_) => Err(CrackError::ResourceUnavailable(format!("wordlist {name} is empty"))),
            None => Err(CrackError::ResourceUnavailable(format!("wordlist {name} not found"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn clean_lines_strips_and_skips_blanks() {
        let words = clean_lines("  alpha \n\n\t\nbeta\r\n   \ngamma");
        assert_eq!(words, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn directory_source_reads_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("common.txt")).unwrap();
        writeln!(file, "password\n\n 123456 \nqwerty").unwrap();

        let source = DirectoryWordlists::new(dir.path());
        let words = source.load("common.txt").unwrap();
        assert_eq!(words, vec!["password", "123456", "qwerty"]);
    }

    #[test]
    fn directory_source_accepts_absolute_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "letmein").unwrap();

        let source = DirectoryWordlists::new("/nonexistent");
        let words = source.load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(words, vec!["letmein"]);
    }

    #[test]
    fn missing_or_empty_is_resource_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("blank.txt"), "\n  \n").unwrap();
        let source = DirectoryWordlists::new(dir.path());

        assert!(matches!(
            source.load("nope.txt"),
            Err(CrackError::ResourceUnavailable(_))
        ));
        assert!(matches!(
            source.load("blank.txt"),
            Err(CrackError::ResourceUnavailable(_))
        ));
    }

    #[test]
    fn static_source() {
        let source = StaticWordlists::default().with("mini", ["a", " ", "b "]);
        assert_eq!(source.load("mini").unwrap(), vec!["a", "b"]);
        assert!(source.load("other").is_err());
    }
}
