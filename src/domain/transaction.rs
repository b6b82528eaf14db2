use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::common::new_id;

/// A signed movement of money on a single account.
///
/// Positive amounts flow into the account, negative ones out of it. `salary_id` links the
/// movement to the income event that produced or moved it; `None` marks a manual entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub account_id: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal,
    #[serde(default)]
    pub salary_id: Option<String>,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Creates a manual transaction dated `now`.
    pub fn new(
        account_id: impl Into<String>,
        description: impl Into<String>,
        amount: Decimal,
        salary_id: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: new_id(),
            account_id: account_id.into(),
            description: description.into(),
            amount,
            salary_id,
            date: now,
            created_at: now,
        }
    }

    /// Replaces the generated identifier, used for engine-produced records.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn is_linked_to(&self, salary_id: &str) -> bool {
        self.salary_id.as_deref() == Some(salary_id)
    }
}
