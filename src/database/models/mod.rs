pub mod customer;
pub mod department;
pub mod user;
pub mod work_record;

pub use customer::Customer;
pub use department::Department;
pub use user::User;
pub use work_record::WorkRecord;

use crate::validation::config::{ConfigurationError, ConfigurationManager};
use crate::validation::messages::MessageCatalog;
use crate::validation::rules::RuleSet;

/// Every entity rule set, built once at startup. Construction doubles as
/// the fail-fast check that the validation documents match the code.
#[derive(Debug, Clone)]
pub struct Rules {
    pub user: RuleSet,
    pub customer: RuleSet,
    pub department: RuleSet,
    pub work_record: RuleSet,
}

impl Rules {
    pub fn build(
        config: &ConfigurationManager,
        messages: &MessageCatalog,
        locale: &str,
    ) -> Result<Rules, ConfigurationError> {
        Ok(Rules {
            user: user::validation_rules(config, messages, locale)?,
            customer: customer::validation_rules(config, messages, locale)?,
            department: department::validation_rules(config, messages, locale)?,
            work_record: work_record::validation_rules(config, messages, locale)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Builds against the real documents under config/; a drifted document
    // fails here before it can fail at server startup.
    #[test]
    fn rules_build_from_committed_documents() {
        let config = ConfigurationManager::new("config/validations");
        let messages = MessageCatalog::new(
            "config/validation_messages.yml",
            "config/validation_messages",
        );

        let rules = Rules::build(&config, &messages, "en").expect("rule construction");
        assert_eq!(rules.customer.entity(), "customer");
        assert_eq!(rules.user.entity(), "user");
    }
}
