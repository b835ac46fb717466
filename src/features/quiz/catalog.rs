//! Question catalog: genre -> difficulty -> questions
//!
//! The catalog is read-only configuration. A default set ships embedded in
//! the binary; deployments point `QUIZ_CATALOG_PATH` at a YAML or JSON file
//! of the same shape to replace it. All validation happens at load time so
//! the session manager never meets a malformed bucket.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::{bail, Context, Result};
use rand::seq::IndexedRandom;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

const EMBEDDED_CATALOG: &str = include_str!("../../../catalog/questions.yaml");

/// One catalog entry. The answer is canonical; submissions are compared
/// against it after trimming and case-folding.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub hint: Option<String>,
}

/// Immutable question catalog keyed by genre, then difficulty.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct QuizCatalog {
    genres: BTreeMap<String, BTreeMap<String, Vec<QuizQuestion>>>,
}

impl QuizCatalog {
    /// The catalog compiled into the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_yaml_str(EMBEDDED_CATALOG).context("embedded question catalog is invalid")
    }

    /// Load a catalog from disk, picking the format from the extension
    /// (`.json` is JSON, anything else is YAML).
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read question catalog {}", path.display()))?;
        let catalog = if path.extension().and_then(|e| e.to_str()) == Some("json") {
            serde_json::from_str(&raw)
                .with_context(|| format!("invalid JSON catalog {}", path.display()))?
        } else {
            serde_yaml::from_str(&raw)
                .with_context(|| format!("invalid YAML catalog {}", path.display()))?
        };
        Self::validated(catalog)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        Self::validated(serde_yaml::from_str(raw).context("invalid YAML catalog")?)
    }

    // Lookup keys are canonicalized to trimmed lowercase here so `pick` can
    // normalize user input the same way.
    fn validated(catalog: Self) -> Result<Self> {
        if catalog.genres.is_empty() {
            bail!("question catalog has no genres");
        }
        let mut genres = BTreeMap::new();
        for (genre, difficulties) in catalog.genres {
            if difficulties.is_empty() {
                bail!("genre `{genre}` has no difficulties");
            }
            let mut buckets = BTreeMap::new();
            for (difficulty, questions) in difficulties {
                if questions.is_empty() {
                    bail!("bucket `{genre}/{difficulty}` is empty");
                }
                for q in &questions {
                    if q.question.trim().is_empty() || q.answer.trim().is_empty() {
                        bail!("bucket `{genre}/{difficulty}` has a blank question or answer");
                    }
                }
                buckets.insert(difficulty.trim().to_lowercase(), questions);
            }
            genres.insert(genre.trim().to_lowercase(), buckets);
        }
        Ok(Self { genres })
    }

    /// Pick one question uniformly at random from the matching bucket.
    /// Returns `None` for a genre/difficulty pair the catalog doesn't know.
    pub fn pick(&self, genre: &str, difficulty: &str) -> Option<&QuizQuestion> {
        let bucket = self
            .genres
            .get(genre.trim().to_lowercase().as_str())?
            .get(difficulty.trim().to_lowercase().as_str())?;
        bucket.choose(&mut rand::rng())
    }

    /// Known genres, sorted.
    pub fn genres(&self) -> Vec<&str> {
        self.genres.keys().map(String::as_str).collect()
    }

    /// Known difficulties for a genre, sorted.
    pub fn difficulties(&self, genre: &str) -> Vec<&str> {
        self.genres
            .get(genre.trim().to_lowercase().as_str())
            .map(|d| d.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}
