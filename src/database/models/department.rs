use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::validation::config::{ConfigurationError, ConfigurationManager};
use crate::validation::messages::MessageCatalog;
use crate::validation::rules::RuleSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[repr(i32)]
#[serde(rename_all = "lowercase")]
pub enum DepartmentStatus {
    Active = 0,
    Inactive = 1,
    Archived = 2,
}

impl DepartmentStatus {
    pub const VALUES: &'static [&'static str] = &["active", "inactive", "archived"];

    pub fn as_str(&self) -> &'static str {
        match self {
            DepartmentStatus::Active => "active",
            DepartmentStatus::Inactive => "inactive",
            DepartmentStatus::Archived => "archived",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(DepartmentStatus::Active),
            "inactive" => Some(DepartmentStatus::Inactive),
            "archived" => Some(DepartmentStatus::Archived),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[repr(i32)]
#[serde(rename_all = "lowercase")]
pub enum DepartmentType {
    Sales = 0,
    Engineering = 1,
    Administration = 2,
    Support = 3,
    Other = 4,
}

impl DepartmentType {
    pub const VALUES: &'static [&'static str] =
        &["sales", "engineering", "administration", "support", "other"];

    pub fn as_str(&self) -> &'static str {
        match self {
            DepartmentType::Sales => "sales",
            DepartmentType::Engineering => "engineering",
            DepartmentType::Administration => "administration",
            DepartmentType::Support => "support",
            DepartmentType::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "sales" => Some(DepartmentType::Sales),
            "engineering" => Some(DepartmentType::Engineering),
            "administration" => Some(DepartmentType::Administration),
            "support" => Some(DepartmentType::Support),
            "other" => Some(DepartmentType::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Department {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub status: DepartmentStatus,
    pub department_type: DepartmentType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Department names are unique across the office; address is optional but
/// shape-checked when present.
pub fn validation_rules(
    config: &ConfigurationManager,
    messages: &MessageCatalog,
    locale: &str,
) -> Result<RuleSet, ConfigurationError> {
    Ok(RuleSet::builder("department", config, messages, locale)
        .require_presence(&["name"])?
        .require_length("name", None, Some(100))?
        .require_unique(&["name"])?
        .require_format(&["name"], "japanese_name")?
        .require_length("address", None, Some(500))?
        .require_format_allow_blank(&["address"], "japanese_address")?
        .require_enum_inclusion(&["status", "department_type"])?
        .build())
}
