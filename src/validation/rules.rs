//! Entity-level validation rule sets.
//!
//! Rules are declared once per entity at startup through
//! [`RuleSetBuilder`]; declaring a rule against an attribute that is not in
//! the entity's configuration document aborts construction with a
//! [`ConfigurationError`]. Checking a record never fails hard: violations
//! accumulate into a [`ValidationErrors`] value surfaced as a 422.

use serde_json::Value;

use crate::auth::Role;
use crate::database::models::{customer, department, work_record};
use crate::validation::config::{ConfigurationError, ConfigurationManager};
use crate::validation::messages::MessageCatalog;
use crate::validation::patterns;

/// A single field-level violation. `message` is the complete human
/// sentence (display name + catalog message).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub attribute: String,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, attribute: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            attribute: attribute.into(),
            message: message.into(),
        });
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    pub fn full_messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.message.clone()).collect()
    }
}

#[derive(Debug, Clone)]
enum Rule {
    Presence {
        attribute: String,
        message: String,
    },
    Format {
        attribute: String,
        pattern: String,
        message: String,
        allow_blank: bool,
    },
    Length {
        attribute: String,
        min: Option<usize>,
        max: Option<usize>,
        too_short: String,
        too_long: String,
    },
    Inclusion {
        attribute: String,
        choices: Vec<String>,
        message: String,
    },
}

/// Uniqueness is probed by the persistence layer; the rule carries the
/// composed message so the probe only reports, never formats.
#[derive(Debug, Clone)]
pub struct UniqueRule {
    pub attribute: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct RuleSet {
    entity: String,
    rules: Vec<Rule>,
    unique: Vec<UniqueRule>,
}

impl RuleSet {
    pub fn builder<'a>(
        entity: &str,
        config: &'a ConfigurationManager,
        messages: &'a MessageCatalog,
        locale: &str,
    ) -> RuleSetBuilder<'a> {
        RuleSetBuilder {
            entity: entity.to_string(),
            locale: locale.to_string(),
            config,
            messages,
            rules: Vec::new(),
            unique: Vec::new(),
        }
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn unique_rules(&self) -> &[UniqueRule] {
        &self.unique
    }

    /// Check a JSON record against every rule, accumulating violations.
    pub fn check(&self, record: &Value) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        for rule in &self.rules {
            match rule {
                Rule::Presence { attribute, message } => {
                    if is_blank(record.get(attribute.as_str())) {
                        errors.add(attribute, message);
                    }
                }
                Rule::Format {
                    attribute,
                    pattern,
                    message,
                    allow_blank,
                } => {
                    let value = record.get(attribute.as_str());
                    if is_blank(value) {
                        if !allow_blank {
                            errors.add(attribute, message);
                        }
                    } else if let Some(value) = value {
                        if patterns::matches(pattern, &string_of(value)) != Some(true) {
                            errors.add(attribute, message);
                        }
                    }
                }
                Rule::Length {
                    attribute,
                    min,
                    max,
                    too_short,
                    too_long,
                } => {
                    // Blank values are presence's business, not length's
                    let value = record.get(attribute.as_str());
                    if is_blank(value) {
                        continue;
                    }
                    if let Some(value) = value {
                        let length = string_of(value).chars().count();
                        if let Some(min) = min {
                            if length < *min {
                                errors.add(attribute, too_short);
                            }
                        }
                        if let Some(max) = max {
                            if length > *max {
                                errors.add(attribute, too_long);
                            }
                        }
                    }
                }
                Rule::Inclusion {
                    attribute,
                    choices,
                    message,
                } => {
                    let accepted = match record.get(attribute.as_str()) {
                        Some(value) if !is_blank(Some(value)) => {
                            choices.contains(&string_of(value))
                        }
                        _ => false,
                    };
                    if !accepted {
                        errors.add(attribute, message);
                    }
                }
            }
        }

        errors
    }
}

pub struct RuleSetBuilder<'a> {
    entity: String,
    locale: String,
    config: &'a ConfigurationManager,
    messages: &'a MessageCatalog,
    rules: Vec<Rule>,
    unique: Vec<UniqueRule>,
}

impl<'a> RuleSetBuilder<'a> {
    pub fn require_presence(mut self, attributes: &[&str]) -> Result<Self, ConfigurationError> {
        for attribute in attributes {
            let message = self.composed_message(attribute, "presence", &[])?;
            self.rules.push(Rule::Presence {
                attribute: attribute.to_string(),
                message,
            });
        }
        Ok(self)
    }

    pub fn require_unique(mut self, attributes: &[&str]) -> Result<Self, ConfigurationError> {
        for attribute in attributes {
            let message = self.composed_message(attribute, "taken", &[])?;
            self.unique.push(UniqueRule {
                attribute: attribute.to_string(),
                message,
            });
        }
        Ok(self)
    }

    pub fn require_format(self, attributes: &[&str], pattern: &str) -> Result<Self, ConfigurationError> {
        self.format_rule(attributes, pattern, false)
    }

    pub fn require_format_allow_blank(
        self,
        attributes: &[&str],
        pattern: &str,
    ) -> Result<Self, ConfigurationError> {
        self.format_rule(attributes, pattern, true)
    }

    fn format_rule(
        mut self,
        attributes: &[&str],
        pattern: &str,
        allow_blank: bool,
    ) -> Result<Self, ConfigurationError> {
        if !patterns::exists(pattern) {
            return Err(ConfigurationError::UnknownPattern {
                name: pattern.to_string(),
            });
        }

        for attribute in attributes {
            // The message kind shares the pattern's name
            let message = self.composed_message(attribute, pattern, &[])?;
            self.rules.push(Rule::Format {
                attribute: attribute.to_string(),
                pattern: pattern.to_string(),
                message,
                allow_blank,
            });
        }
        Ok(self)
    }

    /// Independent optional bounds with distinct too-short/too-long
    /// messages.
    pub fn require_length(
        mut self,
        attribute: &str,
        min: Option<usize>,
        max: Option<usize>,
    ) -> Result<Self, ConfigurationError> {
        let too_short = match min {
            Some(min) => {
                let count = min.to_string();
                self.composed_message(attribute, "too_short", &[("count", count.as_str())])?
            }
            None => String::new(),
        };
        let too_long = match max {
            Some(max) => {
                let count = max.to_string();
                self.composed_message(attribute, "too_long", &[("count", count.as_str())])?
            }
            None => String::new(),
        };
        if min.is_none() && max.is_none() {
            // Nothing to enforce, but the managed check still applies
            self.config.assert_managed(&self.entity, attribute)?;
            return Ok(self);
        }

        self.rules.push(Rule::Length {
            attribute: attribute.to_string(),
            min,
            max,
            too_short,
            too_long,
        });
        Ok(self)
    }

    /// Inclusion against the statically known enum values for the
    /// attribute. Fails construction when the attribute has no enum.
    pub fn require_enum_inclusion(self, attributes: &[&str]) -> Result<Self, ConfigurationError> {
        let mut builder = self;
        for attribute in attributes {
            let choices = enum_choices(&builder.entity, attribute).ok_or_else(|| {
                ConfigurationError::UnknownEnum {
                    entity: builder.entity.clone(),
                    attribute: attribute.to_string(),
                }
            })?;
            builder = builder.inclusion_rule(attribute, choices)?;
        }
        Ok(builder)
    }

    /// Inclusion against an explicit choice list.
    pub fn require_inclusion_in(
        self,
        attributes: &[&str],
        choices: &[&str],
    ) -> Result<Self, ConfigurationError> {
        let mut builder = self;
        for attribute in attributes {
            builder = builder.inclusion_rule(attribute, choices)?;
        }
        Ok(builder)
    }

    fn inclusion_rule(mut self, attribute: &str, choices: &[&str]) -> Result<Self, ConfigurationError> {
        let joined = choices.join(", ");
        let message = self.composed_message(attribute, "inclusion", &[("choices", &joined)])?;
        self.rules.push(Rule::Inclusion {
            attribute: attribute.to_string(),
            choices: choices.iter().map(|c| c.to_string()).collect(),
            message,
        });
        Ok(self)
    }

    pub fn build(self) -> RuleSet {
        RuleSet {
            entity: self.entity,
            rules: self.rules,
            unique: self.unique,
        }
    }

    // Managed check first, then display name + catalog message. Order
    // matters: an unmanaged attribute must fail before anything else.
    fn composed_message(
        &self,
        attribute: &str,
        kind: &str,
        interpolations: &[(&str, &str)],
    ) -> Result<String, ConfigurationError> {
        self.config.assert_managed(&self.entity, attribute)?;

        let display_name = self.config.get_display_name(&self.entity, attribute);
        let message = self
            .messages
            .get_formatted_message(kind, interpolations, &self.locale);
        Ok(format!("{}{}", display_name, message))
    }
}

/// Legal values for integer-backed entity enums, keyed by
/// (entity, attribute). The single place this mapping lives.
fn enum_choices(entity: &str, attribute: &str) -> Option<&'static [&'static str]> {
    match (entity, attribute) {
        ("customer", "customer_type") => Some(customer::CustomerType::VALUES),
        ("customer", "status") => Some(customer::CustomerStatus::VALUES),
        ("department", "department_type") => Some(department::DepartmentType::VALUES),
        ("department", "status") => Some(department::DepartmentStatus::VALUES),
        ("work_record", "work_type") => Some(work_record::WorkType::VALUES),
        ("work_record", "status") => Some(work_record::WorkStatus::VALUES),
        ("user", "role") => Some(Role::VALUES),
        _ => None,
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

fn string_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    const CUSTOMER_DOC: &str = "\
customer:
  name:
    display_name: \"Name\"
  customer_type:
    display_name: \"Customer type\"
  status:
    display_name: \"Status\"
";

    const MESSAGES_DOC: &str = "\
validation_messages:
  presence: \" is required\"
  taken: \" has already been taken\"
  too_short: \" is too short (minimum is {count} characters)\"
  too_long: \" is too long (maximum is {count} characters)\"
  inclusion: \" is not a valid choice (options: {choices})\"
  japanese_name: \" contains characters that are not allowed\"
";

    struct Fixture {
        _dir: tempfile::TempDir,
        config: ConfigurationManager,
        messages: MessageCatalog,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("customer.yml"), CUSTOMER_DOC).unwrap();
        let messages_file = dir.path().join("validation_messages.yml");
        fs::write(&messages_file, MESSAGES_DOC).unwrap();

        let config = ConfigurationManager::new(dir.path());
        let messages = MessageCatalog::new(&messages_file, dir.path().join("validation_messages"));
        Fixture {
            _dir: dir,
            config,
            messages,
        }
    }

    fn builder<'a>(f: &'a Fixture) -> RuleSetBuilder<'a> {
        RuleSet::builder("customer", &f.config, &f.messages, "en")
    }

    #[test]
    fn unmanaged_attribute_aborts_every_rule_kind() {
        let f = fixture();

        assert!(matches!(
            builder(&f).require_presence(&["nickname"]),
            Err(ConfigurationError::AttributeNotManaged { .. })
        ));
        assert!(matches!(
            builder(&f).require_unique(&["nickname"]),
            Err(ConfigurationError::AttributeNotManaged { .. })
        ));
        assert!(matches!(
            builder(&f).require_format(&["nickname"], "email"),
            Err(ConfigurationError::AttributeNotManaged { .. })
        ));
        assert!(matches!(
            builder(&f).require_length("nickname", Some(1), None),
            Err(ConfigurationError::AttributeNotManaged { .. })
        ));
        assert!(matches!(
            builder(&f).require_inclusion_in(&["nickname"], &["a"]),
            Err(ConfigurationError::AttributeNotManaged { .. })
        ));
    }

    #[test]
    fn presence_composes_display_name_and_message() {
        let f = fixture();
        let rules = builder(&f).require_presence(&["name"]).unwrap().build();

        let errors = rules.check(&json!({}));
        assert_eq!(errors.full_messages(), vec!["Name is required"]);

        let errors = rules.check(&json!({ "name": "   " }));
        assert_eq!(errors.len(), 1);

        let errors = rules.check(&json!({ "name": "田中" }));
        assert!(errors.is_empty());
    }

    #[test]
    fn length_bounds_emit_distinct_messages() {
        let f = fixture();
        let rules = builder(&f)
            .require_length("name", Some(3), Some(5))
            .unwrap()
            .build();

        let errors = rules.check(&json!({ "name": "ab" }));
        assert_eq!(
            errors.full_messages(),
            vec!["Name is too short (minimum is 3 characters)"]
        );

        let errors = rules.check(&json!({ "name": "abcdef" }));
        assert_eq!(
            errors.full_messages(),
            vec!["Name is too long (maximum is 5 characters)"]
        );

        // Blank values are presence's business, not length's
        assert!(rules.check(&json!({})).is_empty());
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let f = fixture();
        let rules = builder(&f)
            .require_length("name", None, Some(3))
            .unwrap()
            .build();
        assert!(rules.check(&json!({ "name": "あいう" })).is_empty());
        assert_eq!(rules.check(&json!({ "name": "あいうえ" })).len(), 1);
    }

    #[test]
    fn format_respects_allow_blank() {
        let f = fixture();
        let strict = builder(&f)
            .require_format(&["name"], "japanese_name")
            .unwrap()
            .build();
        let lenient = builder(&f)
            .require_format_allow_blank(&["name"], "japanese_name")
            .unwrap()
            .build();

        assert_eq!(strict.check(&json!({})).len(), 1);
        assert!(lenient.check(&json!({})).is_empty());

        assert_eq!(
            strict.check(&json!({ "name": "bad@value" })).full_messages(),
            vec!["Name contains characters that are not allowed"]
        );
    }

    #[test]
    fn unknown_pattern_fails_construction() {
        let f = fixture();
        assert!(matches!(
            builder(&f).require_format(&["name"], "quantum_name"),
            Err(ConfigurationError::UnknownPattern { .. })
        ));
    }

    #[test]
    fn enum_inclusion_embeds_choices_in_message() {
        let f = fixture();
        let rules = builder(&f)
            .require_enum_inclusion(&["customer_type"])
            .unwrap()
            .build();

        let errors = rules.check(&json!({ "customer_type": "platinum" }));
        assert_eq!(
            errors.full_messages(),
            vec!["Customer type is not a valid choice (options: regular, premium, corporate)"]
        );

        assert!(rules.check(&json!({ "customer_type": "premium" })).is_empty());
    }

    #[test]
    fn enum_inclusion_requires_a_known_enum() {
        let f = fixture();
        assert!(matches!(
            builder(&f).require_enum_inclusion(&["name"]),
            Err(ConfigurationError::UnknownEnum { .. })
        ));
    }

    #[test]
    fn unique_rules_carry_composed_messages_for_the_store() {
        let f = fixture();
        let rules = builder(&f).require_unique(&["name"]).unwrap().build();

        let unique = rules.unique_rules();
        assert_eq!(unique.len(), 1);
        assert_eq!(unique[0].attribute, "name");
        assert_eq!(unique[0].message, "Name has already been taken");
        // No check-time rule: probing is the persistence layer's job
        assert!(rules.check(&json!({})).is_empty());
    }

    #[test]
    fn violations_accumulate_across_rules() {
        let f = fixture();
        let rules = builder(&f)
            .require_presence(&["name", "customer_type"])
            .unwrap()
            .require_enum_inclusion(&["customer_type"])
            .unwrap()
            .build();

        let errors = rules.check(&json!({}));
        assert_eq!(errors.len(), 3);
    }
}
