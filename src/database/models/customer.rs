use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::validation::config::{ConfigurationError, ConfigurationManager};
use crate::validation::messages::MessageCatalog;
use crate::validation::rules::RuleSet;

/// Customer lifecycle state. New records default to `Pending` until intake
/// review finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[repr(i32)]
#[serde(rename_all = "lowercase")]
pub enum CustomerStatus {
    Active = 0,
    Inactive = 1,
    Pending = 2,
}

impl CustomerStatus {
    pub const VALUES: &'static [&'static str] = &["active", "inactive", "pending"];

    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerStatus::Active => "active",
            CustomerStatus::Inactive => "inactive",
            CustomerStatus::Pending => "pending",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(CustomerStatus::Active),
            "inactive" => Some(CustomerStatus::Inactive),
            "pending" => Some(CustomerStatus::Pending),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[repr(i32)]
#[serde(rename_all = "lowercase")]
pub enum CustomerType {
    Regular = 0,
    Premium = 1,
    Corporate = 2,
}

impl CustomerType {
    pub const VALUES: &'static [&'static str] = &["regular", "premium", "corporate"];

    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerType::Regular => "regular",
            CustomerType::Premium => "premium",
            CustomerType::Corporate => "corporate",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "regular" => Some(CustomerType::Regular),
            "premium" => Some(CustomerType::Premium),
            "corporate" => Some(CustomerType::Corporate),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub customer_type: CustomerType,
    pub status: CustomerStatus,
    pub department_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Premium and corporate customers get priority handling.
    pub fn vip(&self) -> bool {
        matches!(self.customer_type, CustomerType::Premium | CustomerType::Corporate)
    }
}

pub fn validation_rules(
    config: &ConfigurationManager,
    messages: &MessageCatalog,
    locale: &str,
) -> Result<RuleSet, ConfigurationError> {
    Ok(RuleSet::builder("customer", config, messages, locale)
        .require_presence(&["name"])?
        .require_length("name", None, Some(100))?
        .require_format(&["name"], "japanese_name")?
        .require_presence(&["customer_type", "status"])?
        .require_enum_inclusion(&["customer_type", "status"])?
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        for value in CustomerStatus::VALUES {
            assert_eq!(CustomerStatus::parse(value).unwrap().as_str(), *value);
        }
        assert_eq!(CustomerStatus::parse("archived"), None);
    }

    #[test]
    fn vip_covers_premium_and_corporate() {
        let base = Customer {
            id: 1,
            name: "田中商事".to_string(),
            customer_type: CustomerType::Regular,
            status: CustomerStatus::Active,
            department_id: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(!base.vip());
        assert!(Customer { customer_type: CustomerType::Premium, ..base.clone() }.vip());
        assert!(Customer { customer_type: CustomerType::Corporate, ..base }.vip());
    }
}
