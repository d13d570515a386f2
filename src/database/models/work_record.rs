use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::validation::config::{ConfigurationError, ConfigurationManager};
use crate::validation::messages::MessageCatalog;
use crate::validation::rules::RuleSet;

/// Work progression state. New records default to `InProgress`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[repr(i32)]
#[serde(rename_all = "snake_case")]
pub enum WorkStatus {
    InProgress = 0,
    Completed = 1,
    OnHold = 2,
    Cancelled = 3,
}

impl WorkStatus {
    pub const VALUES: &'static [&'static str] =
        &["in_progress", "completed", "on_hold", "cancelled"];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkStatus::InProgress => "in_progress",
            WorkStatus::Completed => "completed",
            WorkStatus::OnHold => "on_hold",
            WorkStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "in_progress" => Some(WorkStatus::InProgress),
            "completed" => Some(WorkStatus::Completed),
            "on_hold" => Some(WorkStatus::OnHold),
            "cancelled" => Some(WorkStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[repr(i32)]
#[serde(rename_all = "snake_case")]
pub enum WorkType {
    Consultation = 0,
    Support = 1,
    Maintenance = 2,
    Emergency = 3,
}

impl WorkType {
    pub const VALUES: &'static [&'static str] =
        &["consultation", "support", "maintenance", "emergency"];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkType::Consultation => "consultation",
            WorkType::Support => "support",
            WorkType::Maintenance => "maintenance",
            WorkType::Emergency => "emergency",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "consultation" => Some(WorkType::Consultation),
            "support" => Some(WorkType::Support),
            "maintenance" => Some(WorkType::Maintenance),
            "emergency" => Some(WorkType::Emergency),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkRecord {
    pub id: i64,
    pub customer_id: i64,
    pub staff_user_id: i64,
    pub department_id: Option<i64>,
    pub content: String,
    pub work_date: DateTime<Utc>,
    pub status: WorkStatus,
    pub work_type: WorkType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkRecord {
    pub fn urgent(&self) -> bool {
        self.work_type == WorkType::Emergency
    }
}

pub fn validation_rules(
    config: &ConfigurationManager,
    messages: &MessageCatalog,
    locale: &str,
) -> Result<RuleSet, ConfigurationError> {
    Ok(RuleSet::builder("work_record", config, messages, locale)
        .require_presence(&["content", "work_date"])?
        .require_length("content", None, Some(1000))?
        .require_enum_inclusion(&["status", "work_type"])?
        .build())
}
