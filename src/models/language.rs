//! Language model and the language vocabulary.
//!
//! A language record stores a stable string code (e.g. `en`). Display names
//! come from the vocabulary, an ordered `code -> name` mapping loaded once at
//! startup from a line-oriented file:
//!
//! ```text
//! # code|Display Name
//! en|English
//! fr|French
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// Language record from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Language {
    pub id: i32,
    pub code: String,
}

/// Language with its display name resolved against the vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LanguageView {
    pub id: i32,
    pub code: String,
    pub name: String,
}

/// Create language request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLanguage {
    /// Vocabulary code; the configured default is used when omitted
    pub code: Option<String>,
}

/// One vocabulary entry, in file order
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VocabularyEntry {
    pub code: String,
    pub name: String,
}

/// Immutable ordered mapping from language code to display name
#[derive(Debug, Clone)]
pub struct LanguageVocabulary {
    entries: IndexMap<String, String>,
    default_code: String,
}

impl LanguageVocabulary {
    /// Read and parse the vocabulary file
    pub fn load(path: &str, default_code: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::Internal(format!("Failed to read language vocabulary {}: {}", path, e))
        })?;
        Self::parse(&content, default_code)
    }

    /// Parse `code|name` lines; `#` comments and blank lines are skipped
    pub fn parse(content: &str, default_code: &str) -> AppResult<Self> {
        let mut entries = IndexMap::new();

        for (lineno, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (code, name) = line.split_once('|').ok_or_else(|| {
                AppError::Internal(format!(
                    "Language vocabulary line {}: expected `code|name`",
                    lineno + 1
                ))
            })?;
            let (code, name) = (code.trim().to_lowercase(), name.trim());

            if code.is_empty() || name.is_empty() {
                return Err(AppError::Internal(format!(
                    "Language vocabulary line {}: empty code or name",
                    lineno + 1
                )));
            }
            if entries.insert(code.clone(), name.to_string()).is_some() {
                return Err(AppError::Internal(format!(
                    "Language vocabulary line {}: duplicate code {}",
                    lineno + 1,
                    code
                )));
            }
        }

        let default_code = default_code.to_lowercase();
        if !entries.contains_key(&default_code) {
            return Err(AppError::Internal(format!(
                "Language vocabulary has no entry for default code {}",
                default_code
            )));
        }

        Ok(Self {
            entries,
            default_code,
        })
    }

    pub fn default_code(&self) -> &str {
        &self.default_code
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    /// Display name for a code
    pub fn name(&self, code: &str) -> Option<&str> {
        self.entries.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> Vec<VocabularyEntry> {
        self.entries
            .iter()
            .map(|(code, name)| VocabularyEntry {
                code: code.clone(),
                name: name.clone(),
            })
            .collect()
    }

    /// Resolve a stored record; codes missing from the vocabulary show the raw code
    pub fn view(&self, language: &Language) -> LanguageView {
        LanguageView {
            id: language.id,
            code: language.code.clone(),
            name: self
                .name(&language.code)
                .map(str::to_string)
                .unwrap_or_else(|| language.code.clone()),
        }
    }
}
