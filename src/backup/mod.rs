//! Export and restore of all three collections as a single JSON document.
//!
//! ```json
//! { "meta": { "createdAt": "...", "version": 1 },
//!   "data": { "accounts": [], "transactions": [], "salaries": [] } }
//! ```
//!
//! Restoring overwrites every collection wholesale. Nothing is merged.

pub mod fs_transport;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    core::ledger_store::LedgerStore,
    domain::{Account, Salary, Transaction},
    errors::LedgerError,
    ledger::Ledger,
    storage::Collection,
    time::Clock,
};

pub use fs_transport::FsTransport;

pub const BACKUP_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("Invalid backup file: {0}")]
    InvalidFile(String),
    #[error("Unrecognized backup structure: {0}")]
    UnrecognizedStructure(String),
    #[error("Backup version {0} is newer than this application supports")]
    UnsupportedVersion(u32),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BackupMeta {
    pub created_at: DateTime<Utc>,
    pub version: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackupPayload {
    pub meta: BackupMeta,
    pub data: Ledger,
}

/// Whether the platform could hand the backup to a share target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    Unavailable,
}

/// Moves backup blobs in and out of the application.
pub trait FileTransport {
    /// Stores `blob` and returns where it was written.
    fn write(&self, blob: &str) -> Result<String, BackupError>;
    fn share(&self, locator: &str) -> Result<ShareOutcome, BackupError>;
    /// Lets the user pick a backup; `None` when the pick was cancelled.
    fn pick_file_for_import(&self) -> Result<Option<String>, BackupError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupReport {
    pub locator: String,
    pub share: ShareOutcome,
}

impl BackupReport {
    pub fn message(&self) -> String {
        match self.share {
            ShareOutcome::Shared => format!("Backup saved to:\n{}", self.locator),
            ShareOutcome::Unavailable => format!(
                "Backup saved to:\n{}\nSharing is not available on this device",
                self.locator
            ),
        }
    }
}

pub struct BackupService;

impl BackupService {
    pub fn payload(ledger: &Ledger, clock: &dyn Clock) -> BackupPayload {
        BackupPayload {
            meta: BackupMeta {
                created_at: clock.now(),
                version: BACKUP_SCHEMA_VERSION,
            },
            data: ledger.clone(),
        }
    }

    /// Serialises the current collections into a backup document.
    pub fn export(ledger: &Ledger, clock: &dyn Clock) -> Result<String, BackupError> {
        let payload = Self::payload(ledger, clock);
        serde_json::to_string(&payload).map_err(|err| BackupError::Ledger(err.into()))
    }

    /// Writes a backup through `transport` and offers it for sharing.
    ///
    /// A share target being unavailable is reported in the result, not as an error.
    pub fn backup_and_share(
        store: &LedgerStore,
        clock: &dyn Clock,
        transport: &dyn FileTransport,
    ) -> Result<BackupReport, BackupError> {
        let blob = Self::export(store.ledger(), clock)?;
        let locator = transport.write(&blob)?;
        let share = transport.share(&locator)?;
        if share == ShareOutcome::Unavailable {
            warn!(%locator, "sharing unavailable");
        }
        info!(%locator, "backup written");
        Ok(BackupReport { locator, share })
    }

    /// Parses a backup document into a ledger without touching any store.
    ///
    /// A missing `meta` is accepted, as is a missing collection, which reads as empty.
    /// A collection present as anything but a list, `null` included, is refused.
    pub fn parse(blob: &str) -> Result<Ledger, BackupError> {
        let document: Value =
            serde_json::from_str(blob).map_err(|err| BackupError::InvalidFile(err.to_string()))?;

        if let Some(version) = document.pointer("/meta/version").and_then(Value::as_u64) {
            if version > u64::from(BACKUP_SCHEMA_VERSION) {
                return Err(BackupError::UnsupportedVersion(
                    u32::try_from(version).unwrap_or(u32::MAX),
                ));
            }
        }

        let data = match document.get("data") {
            None | Some(Value::Null) => return Ok(Ledger::default()),
            Some(data @ Value::Object(_)) => data,
            Some(_) => {
                return Err(BackupError::UnrecognizedStructure(
                    "`data` is not an object".into(),
                ))
            }
        };

        Ok(Ledger {
            accounts: collection::<Account>(data, Collection::Accounts)?,
            transactions: collection::<Transaction>(data, Collection::Transactions)?,
            salaries: collection::<Salary>(data, Collection::Salaries)?,
        })
    }

    /// Replaces every collection in `store` with the backup's content.
    pub fn import(store: &mut LedgerStore, blob: &str) -> Result<(), BackupError> {
        let ledger = Self::parse(blob)?;
        let counts = (
            ledger.accounts.len(),
            ledger.transactions.len(),
            ledger.salaries.len(),
        );
        store.try_replace_all(ledger)?;
        info!(
            accounts = counts.0,
            transactions = counts.1,
            salaries = counts.2,
            "backup restored"
        );
        Ok(())
    }

    /// Asks `transport` for a file and imports it. `Ok(false)` means the pick was cancelled.
    pub fn restore(
        store: &mut LedgerStore,
        transport: &dyn FileTransport,
    ) -> Result<bool, BackupError> {
        match transport.pick_file_for_import()? {
            Some(blob) => {
                Self::import(store, &blob)?;
                Ok(true)
            }
            None => {
                info!("restore cancelled");
                Ok(false)
            }
        }
    }
}

fn collection<T: DeserializeOwned>(
    data: &Value,
    collection: Collection,
) -> Result<Vec<T>, BackupError> {
    let key = collection.key();
    match data.get(key) {
        None => Ok(Vec::new()),
        // Re-read from text: integers wider than 64 bits only reach `Decimal` intact that way.
        Some(items @ Value::Array(_)) => serde_json::from_str::<Vec<T>>(&items.to_string())
            .map_err(|err| {
                BackupError::UnrecognizedStructure(format!("`data.{}`: {}", key, err))
            }),
        Some(_) => Err(BackupError::UnrecognizedStructure(format!(
            "`data.{}` is not a list",
            key
        ))),
    }
}
