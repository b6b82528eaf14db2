//! In-memory ledger state plus whole-collection persistence.
//!
//! Every mutation updates memory first, which is authoritative from that moment on,
//! and then rewrites each touched collection as a single blob. A failed write is
//! logged and swallowed: memory and storage may diverge until the next successful
//! save of that collection.

use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, info, warn};

use crate::{
    config::Config,
    domain::{Account, Salary, Transaction},
    errors::LedgerError,
    ledger::{ledger_warnings, Ledger},
    storage::{Collection, JsonFileStore, KeyValueStore},
};

/// Owns the three collections and the key-value store they persist to.
pub struct LedgerStore {
    ledger: Ledger,
    storage: Box<dyn KeyValueStore>,
}

impl LedgerStore {
    /// Loads all collections from `storage`, defaulting missing or corrupt ones to empty.
    pub fn open(storage: Box<dyn KeyValueStore>) -> Self {
        let ledger = Self::load(storage.as_ref());
        for warning in ledger_warnings(&ledger) {
            warn!(%warning, "ledger integrity");
        }
        info!(
            accounts = ledger.accounts.len(),
            transactions = ledger.transactions.len(),
            salaries = ledger.salaries.len(),
            "ledger loaded"
        );
        Self { ledger, storage }
    }

    /// Opens the JSON file store configured for `base`.
    pub fn open_with_config(config: &Config, base: &Path) -> Result<Self, LedgerError> {
        let store = JsonFileStore::new(config.resolve_data_dir(base))?;
        Ok(Self::open(Box::new(store)))
    }

    pub fn load(storage: &dyn KeyValueStore) -> Ledger {
        Ledger {
            accounts: load_collection(storage, Collection::Accounts),
            transactions: load_collection(storage, Collection::Transactions),
            salaries: load_collection(storage, Collection::Salaries),
        }
    }

    /// Writes `items` as the blob for `collection`.
    pub fn try_save<T: Serialize>(
        &self,
        collection: Collection,
        items: &[T],
    ) -> Result<(), LedgerError> {
        let json = serde_json::to_string(items)?;
        self.storage.set(collection.key(), &json)
    }

    /// Like [`Self::try_save`] but only logs failures.
    pub fn save<T: Serialize>(&self, collection: Collection, items: &[T]) {
        match self.try_save(collection, items) {
            Ok(()) => debug!(collection = collection.key(), count = items.len(), "saved"),
            Err(err) => error!(collection = collection.key(), error = %err, "failed to save collection"),
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn accounts(&self) -> &[Account] {
        &self.ledger.accounts
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.ledger.transactions
    }

    pub fn salaries(&self) -> &[Salary] {
        &self.ledger.salaries
    }

    pub fn storage(&self) -> &dyn KeyValueStore {
        self.storage.as_ref()
    }

    pub fn set_accounts(&mut self, accounts: Vec<Account>) {
        self.ledger.accounts = accounts;
        self.persist(Collection::Accounts);
    }

    pub fn set_transactions(&mut self, transactions: Vec<Transaction>) {
        self.ledger.transactions = transactions;
        self.persist(Collection::Transactions);
    }

    pub fn set_salaries(&mut self, salaries: Vec<Salary>) {
        self.ledger.salaries = salaries;
        self.persist(Collection::Salaries);
    }

    /// Applies `mutator` to the in-memory ledger, then persists every collection in `touched`.
    pub fn apply<R, F>(&mut self, touched: &[Collection], mutator: F) -> R
    where
        F: FnOnce(&mut Ledger) -> R,
    {
        let result = mutator(&mut self.ledger);
        for collection in touched {
            self.persist(*collection);
        }
        result
    }

    /// Replaces all three collections wholesale.
    pub fn replace_all(&mut self, ledger: Ledger) {
        self.ledger = ledger;
        for collection in Collection::ALL {
            self.persist(collection);
        }
    }

    /// Like [`Self::replace_all`] but reports the first failed write.
    ///
    /// Memory is replaced even when a write fails; later collections are still attempted.
    pub fn try_replace_all(&mut self, ledger: Ledger) -> Result<(), LedgerError> {
        self.ledger = ledger;
        let mut first_error = None;
        for collection in Collection::ALL {
            let outcome = match collection {
                Collection::Accounts => self.try_save(collection, &self.ledger.accounts),
                Collection::Transactions => self.try_save(collection, &self.ledger.transactions),
                Collection::Salaries => self.try_save(collection, &self.ledger.salaries),
            };
            if let Err(err) = outcome {
                error!(collection = collection.key(), error = %err, "failed to save collection");
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Re-reads every collection from storage, discarding in-memory state.
    pub fn reload(&mut self) {
        self.ledger = Self::load(self.storage.as_ref());
    }

    fn persist(&self, collection: Collection) {
        match collection {
            Collection::Accounts => self.save(collection, &self.ledger.accounts),
            Collection::Transactions => self.save(collection, &self.ledger.transactions),
            Collection::Salaries => self.save(collection, &self.ledger.salaries),
        }
    }
}

fn load_collection<T: DeserializeOwned>(storage: &dyn KeyValueStore, collection: Collection) -> Vec<T> {
    match storage.get(collection.key()) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|err| {
            warn!(collection = collection.key(), error = %err, "unparseable collection, starting empty");
            Vec::new()
        }),
        Ok(None) => Vec::new(),
        Err(err) => {
            error!(collection = collection.key(), error = %err, "failed to read collection");
            Vec::new()
        }
    }
}
