use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::new_id;

/// A spending or saving category that salaries are distributed across.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    pub color: AccountColor,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Creates a new account with a generated identifier.
    pub fn new(name: impl Into<String>, color: AccountColor, created_at: DateTime<Utc>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            color,
            created_at,
        }
    }
}

/// Fixed palette an account can be painted with. Persisted as the hex code.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum AccountColor {
    #[default]
    #[serde(rename = "#2196F3")]
    Blue,
    #[serde(rename = "#4CAF50")]
    Green,
    #[serde(rename = "#FF9800")]
    Orange,
    #[serde(rename = "#F44336")]
    Red,
    #[serde(rename = "#9C27B0")]
    Purple,
    #[serde(rename = "#00BCD4")]
    Cyan,
    #[serde(rename = "#795548")]
    Brown,
    #[serde(rename = "#607D8B")]
    Grey,
}

impl AccountColor {
    pub const ALL: [AccountColor; 8] = [
        AccountColor::Blue,
        AccountColor::Green,
        AccountColor::Orange,
        AccountColor::Red,
        AccountColor::Purple,
        AccountColor::Cyan,
        AccountColor::Brown,
        AccountColor::Grey,
    ];

    pub fn hex(self) -> &'static str {
        match self {
            AccountColor::Blue => "#2196F3",
            AccountColor::Green => "#4CAF50",
            AccountColor::Orange => "#FF9800",
            AccountColor::Red => "#F44336",
            AccountColor::Purple => "#9C27B0",
            AccountColor::Cyan => "#00BCD4",
            AccountColor::Brown => "#795548",
            AccountColor::Grey => "#607D8B",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AccountColor::Blue => "Blue",
            AccountColor::Green => "Green",
            AccountColor::Orange => "Orange",
            AccountColor::Red => "Red",
            AccountColor::Purple => "Purple",
            AccountColor::Cyan => "Cyan",
            AccountColor::Brown => "Brown",
            AccountColor::Grey => "Grey",
        }
    }

    /// Resolves a palette entry from its hex code (case-insensitive).
    pub fn from_hex(value: &str) -> Option<Self> {
        let needle = value.trim();
        Self::ALL
            .into_iter()
            .find(|color| color.hex().eq_ignore_ascii_case(needle))
    }
}

impl fmt::Display for AccountColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hex())
    }
}
