pub mod config;
pub mod messages;
pub mod patterns;
pub mod rules;

pub use config::{ConfigurationError, ConfigurationManager};
pub use messages::MessageCatalog;
pub use rules::{RuleSet, ValidationErrors};

/// Humanized fallback for attribute and message-kind names:
/// "customer_type" becomes "Customer type".
pub(crate) fn humanize(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::humanize;

    #[test]
    fn humanizes_snake_case() {
        assert_eq!(humanize("customer_type"), "Customer type");
        assert_eq!(humanize("email"), "Email");
        assert_eq!(humanize(""), "");
    }
}
