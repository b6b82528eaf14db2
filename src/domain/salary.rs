//! Income events that get distributed across accounts.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::common::new_id;

/// One occurrence of income. Immutable once recorded; only deletion is supported.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Salary {
    pub id: String,
    pub name: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Salary {
    pub fn new(name: impl Into<String>, amount: Decimal, created_at: DateTime<Utc>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            amount,
            created_at,
        }
    }
}
