//! Locale-keyed validation message catalog.
//!
//! Templates are written so they read naturally when concatenated directly
//! after an attribute display name (`"Name" + " is required"`), and may
//! carry `{name}`-style placeholders filled by
//! [`MessageCatalog::get_formatted_message`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::config;
use crate::validation::humanize;

#[derive(Debug, Deserialize)]
struct MessagesDocument {
    #[serde(default)]
    validation_messages: HashMap<String, String>,
}

pub struct MessageCatalog {
    default_file: PathBuf,
    locale_dir: PathBuf,
    // One load per locale; populated on first access and immutable after.
    cache: RwLock<HashMap<String, HashMap<String, String>>>,
}

static CATALOG: Lazy<MessageCatalog> = Lazy::new(|| {
    let validation = &config::config().validation;
    MessageCatalog::new(&validation.messages_file, &validation.messages_dir)
});

/// Process-wide catalog reading the configured message documents.
pub fn catalog() -> &'static MessageCatalog {
    &CATALOG
}

impl MessageCatalog {
    pub fn new(default_file: impl Into<PathBuf>, locale_dir: impl Into<PathBuf>) -> Self {
        Self {
            default_file: default_file.into(),
            locale_dir: locale_dir.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Message for `kind`, falling back to a humanized kind name when the
    /// catalog has no entry.
    pub fn get_message(&self, kind: &str, locale: &str) -> String {
        self.with_messages(locale, |messages| {
            messages
                .get(kind)
                .cloned()
                .unwrap_or_else(|| humanize(kind))
        })
    }

    /// Message for `kind` with every `{name}` placeholder substituted.
    /// Placeholders without a matching interpolation are left verbatim.
    pub fn get_formatted_message(
        &self,
        kind: &str,
        interpolations: &[(&str, &str)],
        locale: &str,
    ) -> String {
        let mut message = self.get_message(kind, locale);
        for (name, value) in interpolations {
            message = message.replace(&format!("{{{}}}", name), value);
        }
        message
    }

    /// All message kinds for a locale (CLI listing).
    pub fn kinds(&self, locale: &str) -> Vec<(String, String)> {
        self.with_messages(locale, |messages| {
            let mut entries: Vec<_> = messages
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            entries.sort();
            entries
        })
    }

    fn with_messages<R>(&self, locale: &str, f: impl FnOnce(&HashMap<String, String>) -> R) -> R {
        {
            let cache = self.cache.read().expect("message cache poisoned");
            if let Some(messages) = cache.get(locale) {
                return f(messages);
            }
        }

        let loaded = self.load_from_file(locale);

        let mut cache = self.cache.write().expect("message cache poisoned");
        // A racing loader may have beaten us here; keep the first entry.
        let messages = cache.entry(locale.to_string()).or_insert(loaded);
        f(messages)
    }

    // Locale-specific file wins; otherwise the single default document.
    fn load_from_file(&self, locale: &str) -> HashMap<String, String> {
        let locale_file = self.locale_dir.join(format!("{}.yml", locale));
        let file = if locale_file.exists() {
            locale_file
        } else {
            self.default_file.clone()
        };

        read_messages_document(&file)
    }
}

fn read_messages_document(path: &Path) -> HashMap<String, String> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!("failed to read message file {}: {}", path.display(), e);
            return HashMap::new();
        }
    };

    match serde_yaml::from_str::<MessagesDocument>(&raw) {
        Ok(document) => document.validation_messages,
        Err(e) => {
            tracing::warn!("failed to parse message file {}: {}", path.display(), e);
            HashMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn catalog_with(default: &str, locales: &[(&str, &str)]) -> (tempfile::TempDir, MessageCatalog) {
        let dir = tempfile::tempdir().unwrap();
        let default_file = dir.path().join("validation_messages.yml");
        fs::write(&default_file, default).unwrap();

        let locale_dir = dir.path().join("validation_messages");
        fs::create_dir(&locale_dir).unwrap();
        for (locale, body) in locales {
            fs::write(locale_dir.join(format!("{}.yml", locale)), body).unwrap();
        }

        let catalog = MessageCatalog::new(&default_file, &locale_dir);
        (dir, catalog)
    }

    #[test]
    fn reads_default_document_when_locale_file_absent() {
        let (_dir, catalog) = catalog_with(
            "validation_messages:\n  presence: \" is required\"\n",
            &[],
        );
        assert_eq!(catalog.get_message("presence", "en"), " is required");
    }

    #[test]
    fn locale_file_takes_priority() {
        let (_dir, catalog) = catalog_with(
            "validation_messages:\n  presence: \" is required\"\n",
            &[("ja", "validation_messages:\n  presence: \"は必須です\"\n")],
        );
        assert_eq!(catalog.get_message("presence", "ja"), "は必須です");
        assert_eq!(catalog.get_message("presence", "en"), " is required");
    }

    #[test]
    fn unknown_kind_humanizes() {
        let (_dir, catalog) = catalog_with("validation_messages: {}\n", &[]);
        assert_eq!(catalog.get_message("not_a_kind", "en"), "Not a kind");
    }

    #[test]
    fn interpolates_named_placeholders() {
        let (_dir, catalog) = catalog_with(
            "validation_messages:\n  too_short: \" is too short (minimum is {count} characters)\"\n",
            &[],
        );
        assert_eq!(
            catalog.get_formatted_message("too_short", &[("count", "6")], "en"),
            " is too short (minimum is 6 characters)"
        );
    }

    #[test]
    fn unmatched_placeholders_stay_verbatim() {
        let (_dir, catalog) = catalog_with(
            "validation_messages:\n  odd: \" wants {count} and {other}\"\n",
            &[],
        );
        assert_eq!(
            catalog.get_formatted_message("odd", &[("count", "3")], "en"),
            " wants 3 and {other}"
        );
    }

    #[test]
    fn malformed_document_yields_empty_catalog() {
        let (_dir, catalog) = catalog_with("presence: [unclosed\n", &[]);
        // Falls back to humanized kind, not a panic
        assert_eq!(catalog.get_message("presence", "en"), "Presence");
    }

    #[test]
    fn loads_once_per_locale() {
        let (dir, catalog) = catalog_with(
            "validation_messages:\n  presence: \" is required\"\n",
            &[],
        );
        assert_eq!(catalog.get_message("presence", "en"), " is required");

        // Rewriting the file after first access must not change results:
        // the catalog was memoized by the first load.
        fs::write(
            dir.path().join("validation_messages.yml"),
            "validation_messages:\n  presence: \" changed\"\n",
        )
        .unwrap();
        assert_eq!(catalog.get_message("presence", "en"), " is required");
    }
}
