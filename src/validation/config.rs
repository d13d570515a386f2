//! Attribute configuration registry.
//!
//! One YAML document per entity type under the configured directory, shape
//! `{ entity: { attribute: { display_name, choices_display } } }`. Loaded
//! on first access per entity and memoized for the process lifetime; a
//! config change requires a restart.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::RwLock;

use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::config;
use crate::validation::humanize;

/// Configuration-time failure. Raised while rules are being defined, never
/// in request handling, and never user-facing.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigurationError {
    #[error("{message}")]
    AttributeNotManaged {
        entity: String,
        attribute: String,
        message: String,
    },

    #[error("unknown format pattern '{name}'")]
    UnknownPattern { name: String },

    #[error("attribute '{attribute}' has no enum definition for {entity}")]
    UnknownEnum { entity: String, attribute: String },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttributeEntry {
    pub display_name: Option<String>,
    #[serde(default)]
    pub choices_display: BTreeMap<String, String>,
}

type EntityConfig = BTreeMap<String, AttributeEntry>;

pub struct ConfigurationManager {
    config_dir: PathBuf,
    cache: RwLock<HashMap<String, EntityConfig>>,
}

static REGISTRY: Lazy<ConfigurationManager> =
    Lazy::new(|| ConfigurationManager::new(&config::config().validation.config_dir));

/// Process-wide registry reading from the configured validations directory.
pub fn registry() -> &'static ConfigurationManager {
    &REGISTRY
}

impl ConfigurationManager {
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Configured display name, or the humanized attribute name when the
    /// entry carries none.
    pub fn get_display_name(&self, entity: &str, attribute: &str) -> String {
        self.with_entity(entity, |entity_config| {
            entity_config
                .get(attribute)
                .and_then(|entry| entry.display_name.clone())
                .unwrap_or_else(|| humanize(attribute))
        })
    }

    pub fn is_managed(&self, entity: &str, attribute: &str) -> bool {
        self.with_entity(entity, |entity_config| entity_config.contains_key(attribute))
    }

    /// Hard precondition for every rule definition: the attribute must be
    /// present in the entity's configuration document.
    pub fn assert_managed(&self, entity: &str, attribute: &str) -> Result<(), ConfigurationError> {
        if self.is_managed(entity, attribute) {
            return Ok(());
        }

        Err(ConfigurationError::AttributeNotManaged {
            entity: entity.to_string(),
            attribute: attribute.to_string(),
            message: self.not_managed_message(entity, attribute),
        })
    }

    /// Configured value-to-label map for an enumerated attribute. Missing
    /// configuration is tolerated: empty map plus a warning.
    pub fn get_choice_display_names(&self, entity: &str, attribute: &str) -> BTreeMap<String, String> {
        let choices = self.with_entity(entity, |entity_config| {
            entity_config
                .get(attribute)
                .map(|entry| entry.choices_display.clone())
                .unwrap_or_default()
        });

        if choices.is_empty() {
            tracing::warn!("no choices_display configured for {}#{}", entity, attribute);
        }
        choices
    }

    pub fn managed_attributes(&self, entity: &str) -> Vec<String> {
        self.with_entity(entity, |entity_config| entity_config.keys().cloned().collect())
    }

    /// Entity types with a configuration document present on disk.
    pub fn available_entities(&self) -> Vec<String> {
        let mut entities: Vec<String> = std::fs::read_dir(&self.config_dir)
            .map(|entries| {
                entries
                    .filter_map(|entry| entry.ok())
                    .filter_map(|entry| {
                        let path = entry.path();
                        if path.extension().and_then(|e| e.to_str()) == Some("yml") {
                            path.file_stem()
                                .and_then(|s| s.to_str())
                                .map(str::to_string)
                        } else {
                            None
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();
        entities.sort();
        entities
    }

    fn with_entity<R>(&self, entity: &str, f: impl FnOnce(&EntityConfig) -> R) -> R {
        {
            let cache = self.cache.read().expect("attribute config cache poisoned");
            if let Some(entity_config) = cache.get(entity) {
                return f(entity_config);
            }
        }

        let loaded = self.load_from_file(entity);

        let mut cache = self.cache.write().expect("attribute config cache poisoned");
        // Keep the first load if another request raced us here.
        let entity_config = cache.entry(entity.to_string()).or_insert(loaded);
        f(entity_config)
    }

    // Missing and malformed documents both degrade to an empty config;
    // every attribute then fails assert_managed, which is the loudest
    // honest signal available at rule-definition time.
    fn load_from_file(&self, entity: &str) -> EntityConfig {
        let path = self.config_dir.join(format!("{}.yml", entity));

        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("missing validation config {}: {}", path.display(), e);
                return EntityConfig::default();
            }
        };

        match serde_yaml::from_str::<HashMap<String, EntityConfig>>(&raw) {
            Ok(mut document) => document.remove(entity).unwrap_or_default(),
            Err(e) => {
                tracing::error!("failed to parse validation config {}: {}", path.display(), e);
                EntityConfig::default()
            }
        }
    }

    fn not_managed_message(&self, entity: &str, attribute: &str) -> String {
        let managed = self.managed_attributes(entity);

        let mut message = format!(
            "attribute '{}' is not managed for the {} entity.\n\n\
             To fix:\n\
             1. add the attribute to config/validations/{}.yml\n\
             2. or use one of the managed attributes\n\n",
            attribute, entity, entity
        );

        if managed.is_empty() {
            message.push_str(&format!("The {} entity currently manages no attributes.", entity));
        } else {
            message.push_str(&format!("Managed attributes: {}", managed.join(", ")));
            if let Some(similar) = find_similar_attribute(attribute, &managed) {
                message.push_str(&format!("\n\nDid you mean '{}'?", similar));
            }
        }

        message
    }
}

/// Nearest managed attribute: exact case-insensitive match first, then
/// substring containment in either direction, then minimum edit distance.
fn find_similar_attribute(target: &str, managed: &[String]) -> Option<String> {
    let target = target.to_lowercase();

    if let Some(exact) = managed.iter().find(|attr| attr.to_lowercase() == target) {
        return Some(exact.clone());
    }

    if let Some(partial) = managed
        .iter()
        .find(|attr| attr.contains(&target) || target.contains(attr.as_str()))
    {
        return Some(partial.clone());
    }

    managed
        .iter()
        .min_by_key(|attr| levenshtein_distance(&target, &attr.to_lowercase()))
        .cloned()
}

fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut matrix = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=b.len() {
        matrix[0][j] = j;
    }

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            matrix[i][j] = (matrix[i - 1][j] + 1)
                .min(matrix[i][j - 1] + 1)
                .min(matrix[i - 1][j - 1] + cost);
        }
    }

    matrix[a.len()][b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const CUSTOMER_DOC: &str = "\
customer:
  name:
    display_name: \"Name\"
  customer_type:
    display_name: \"Customer type\"
    choices_display:
      regular: \"Regular\"
      premium: \"Premium\"
  status:
    display_name: \"Status\"
";

    fn manager_with(files: &[(&str, &str)]) -> (tempfile::TempDir, ConfigurationManager) {
        let dir = tempfile::tempdir().unwrap();
        for (name, body) in files {
            fs::write(dir.path().join(format!("{}.yml", name)), body).unwrap();
        }
        let manager = ConfigurationManager::new(dir.path());
        (dir, manager)
    }

    #[test]
    fn display_name_from_config_with_humanized_fallback() {
        let (_dir, manager) = manager_with(&[("customer", CUSTOMER_DOC)]);
        assert_eq!(manager.get_display_name("customer", "customer_type"), "Customer type");
        // Unconfigured attribute falls back to humanized form
        assert_eq!(manager.get_display_name("customer", "fax_number"), "Fax number");
    }

    #[test]
    fn assert_managed_accepts_configured_attributes() {
        let (_dir, manager) = manager_with(&[("customer", CUSTOMER_DOC)]);
        assert!(manager.assert_managed("customer", "name").is_ok());
    }

    #[test]
    fn assert_managed_reports_nearest_match() {
        let (_dir, manager) = manager_with(&[("customer", CUSTOMER_DOC)]);
        let err = manager.assert_managed("customer", "customer_typ").unwrap_err();
        let text = err.to_string();
        assert!(text.contains("not managed"), "{text}");
        assert!(text.contains("name, customer_type, status") || text.contains("customer_type"));
        assert!(text.contains("Did you mean 'customer_type'?"), "{text}");
    }

    #[test]
    fn case_insensitive_match_beats_edit_distance() {
        let (_dir, manager) = manager_with(&[("customer", CUSTOMER_DOC)]);
        let err = manager.assert_managed("customer", "NAME").unwrap_err();
        assert!(err.to_string().contains("Did you mean 'name'?"));
    }

    #[test]
    fn choice_display_names_empty_when_unconfigured() {
        let (_dir, manager) = manager_with(&[("customer", CUSTOMER_DOC)]);
        assert!(manager.get_choice_display_names("customer", "status").is_empty());
        assert_eq!(
            manager.get_choice_display_names("customer", "customer_type")["premium"],
            "Premium"
        );
    }

    #[test]
    fn missing_document_yields_empty_config() {
        let (_dir, manager) = manager_with(&[]);
        assert!(!manager.is_managed("customer", "name"));
        assert!(manager.managed_attributes("customer").is_empty());
    }

    #[test]
    fn malformed_document_yields_empty_config() {
        let (_dir, manager) = manager_with(&[("customer", "customer: [broken\n")]);
        assert!(!manager.is_managed("customer", "name"));
    }

    #[test]
    fn load_is_memoized_per_entity() {
        let (dir, manager) = manager_with(&[("customer", CUSTOMER_DOC)]);
        let first = manager.managed_attributes("customer");

        // A rewrite after first access is invisible until restart.
        fs::write(dir.path().join("customer.yml"), "customer: {}\n").unwrap();
        let second = manager.managed_attributes("customer");
        assert_eq!(first, second);
    }

    #[test]
    fn levenshtein_basics() {
        assert_eq!(levenshtein_distance("status", "status"), 0);
        assert_eq!(levenshtein_distance("status", "statos"), 1);
        assert_eq!(levenshtein_distance("", "abc"), 3);
    }
}
