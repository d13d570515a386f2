use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::FromRow;

use crate::auth::Role;
use crate::validation::config::{ConfigurationError, ConfigurationManager};
use crate::validation::messages::MessageCatalog;
use crate::validation::rules::RuleSet;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    // Never serialized; `sha256$<salt>$<digest>` form
    #[serde(skip_serializing)]
    pub encrypted_password: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Profile shape returned by the users endpoints.
    pub fn as_api_json(&self) -> Value {
        json!({
            "id": self.id,
            "email": self.email,
            "role": self.role,
            "created_at": self.created_at,
            "updated_at": self.updated_at,
        })
    }

    /// Compact shape embedded in login/signup responses.
    pub fn as_session_json(&self) -> Value {
        json!({
            "id": self.id,
            "email": self.email,
            "role": self.role,
        })
    }
}

/// Signup validation: email shape and uniqueness, password bounds, role
/// from the fixed hierarchy. Confirmation matching happens at the handler
/// where both values are in hand.
pub fn validation_rules(
    config: &ConfigurationManager,
    messages: &MessageCatalog,
    locale: &str,
) -> Result<RuleSet, ConfigurationError> {
    Ok(RuleSet::builder("user", config, messages, locale)
        .require_presence(&["email", "password"])?
        .require_format_allow_blank(&["email"], "email")?
        .require_unique(&["email"])?
        .require_length("password", Some(6), Some(128))?
        .require_enum_inclusion(&["role"])?
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rules() -> RuleSet {
        let config = ConfigurationManager::new("config/validations");
        let messages = MessageCatalog::new(
            "config/validation_messages.yml",
            "config/validation_messages",
        );
        validation_rules(&config, &messages, "en").expect("user rules")
    }

    #[test]
    fn short_password_message_uses_configured_display_name() {
        let errors = rules().check(&json!({
            "email": "user@example.com",
            "password": "abc",
            "role": "staff",
        }));
        assert_eq!(
            errors.full_messages(),
            vec!["Password is too short (minimum is 6 characters)"]
        );
    }

    #[test]
    fn malformed_email_and_unknown_role_are_both_reported() {
        let errors = rules().check(&json!({
            "email": "not-an-email",
            "password": "secret-enough",
            "role": "root",
        }));
        let messages = errors.full_messages();
        assert!(messages
            .iter()
            .any(|m| m.starts_with("Email is not a valid email address")));
        assert!(messages
            .iter()
            .any(|m| m == "Role is not a valid choice (options: staff, manager, admin)"));
    }
}
