//! Groups balances for the distribution charts.
//!
//! Only the grouping is computed here. Sorting and percentages are presentation
//! helpers applied at display time.

use rust_decimal::Decimal;

use crate::{
    core::services::balance_service::{BalanceScope, BalanceService},
    domain::AccountColor,
    ledger::Ledger,
};

/// One account's positive balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartEntry {
    pub name: String,
    pub amount: Decimal,
    pub color: AccountColor,
}

/// Accounts sharing a colour, merged into one bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorGroup {
    pub name: String,
    pub amount: Decimal,
    pub color: AccountColor,
    pub accounts: Vec<String>,
}

/// Shared view over chart rows for the display helpers.
pub trait ChartRow {
    fn amount(&self) -> Decimal;
}

impl ChartRow for ChartEntry {
    fn amount(&self) -> Decimal {
        self.amount
    }
}

impl ChartRow for ColorGroup {
    fn amount(&self) -> Decimal {
        self.amount
    }
}

pub struct ChartService;

impl ChartService {
    /// One entry per account with a positive balance under `scope`, in account order.
    pub fn by_account(ledger: &Ledger, scope: &BalanceScope) -> Vec<ChartEntry> {
        ledger
            .accounts
            .iter()
            .map(|account| ChartEntry {
                name: account.name.clone(),
                amount: BalanceService::account_balance(ledger, &account.id, scope),
                color: account.color,
            })
            .filter(|entry| entry.amount > Decimal::ZERO)
            .collect()
    }

    /// Merges entries by colour, keeping the order in which each colour first appears.
    pub fn by_color(entries: &[ChartEntry]) -> Vec<ColorGroup> {
        let mut groups: Vec<ColorGroup> = Vec::new();
        for entry in entries {
            match groups.iter_mut().find(|group| group.color == entry.color) {
                Some(group) => {
                    group.amount = group.amount.saturating_add(entry.amount);
                    group.accounts.push(entry.name.clone());
                }
                None => groups.push(ColorGroup {
                    name: format!("Accounts {}", entry.color),
                    amount: entry.amount,
                    color: entry.color,
                    accounts: vec![entry.name.clone()],
                }),
            }
        }
        groups
    }

    /// Copy of `rows` ordered by amount, largest first. Ties keep their order.
    pub fn sorted_by_amount_desc<T: ChartRow + Clone>(rows: &[T]) -> Vec<T> {
        let mut sorted = rows.to_vec();
        sorted.sort_by(|a, b| b.amount().cmp(&a.amount()));
        sorted
    }

    /// Share of `total` in percent, or `None` when the total is zero or the share does
    /// not fit in a `Decimal`.
    pub fn percentage_of_total(amount: Decimal, total: Decimal) -> Option<Decimal> {
        if total.is_zero() {
            return None;
        }
        amount
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|scaled| scaled.checked_div(total))
            .or_else(|| {
                amount
                    .checked_div(total)
                    .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Account, Transaction};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn entry(name: &str, amount: Decimal, color: AccountColor) -> ChartEntry {
        ChartEntry {
            name: name.into(),
            amount,
            color,
        }
    }

    #[test]
    fn by_account_skips_non_positive_balances() {
        let now = Utc::now();
        let mut ledger = Ledger::new();
        for (name, amount) in [("Rent", dec!(500)), ("Fun", dec!(0)), ("Debt", dec!(-40))] {
            let account = Account::new(name, AccountColor::Red, now);
            ledger
                .transactions
                .push(Transaction::new(account.id.clone(), "x", amount, None, now));
            ledger.accounts.push(account);
        }
        let entries = ChartService::by_account(&ledger, &BalanceScope::All);
        assert_eq!(entries, vec![entry("Rent", dec!(500), AccountColor::Red)]);
    }

    #[test]
    fn by_color_merges_in_first_seen_order() {
        let entries = vec![
            entry("Rent", dec!(500), AccountColor::Red),
            entry("Food", dec!(200), AccountColor::Green),
            entry("Car", dec!(100), AccountColor::Red),
        ];
        let groups = ChartService::by_color(&entries);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "Accounts #F44336");
        assert_eq!(groups[0].amount, dec!(600));
        assert_eq!(groups[0].accounts, vec!["Rent".to_string(), "Car".to_string()]);
        assert_eq!(groups[1].color, AccountColor::Green);
    }

    #[test]
    fn presentation_helpers() {
        let entries = vec![
            entry("a", dec!(1), AccountColor::Blue),
            entry("b", dec!(3), AccountColor::Blue),
        ];
        let sorted = ChartService::sorted_by_amount_desc(&entries);
        assert_eq!(sorted[0].name, "b");
        assert_eq!(
            ChartService::percentage_of_total(dec!(1), dec!(4)),
            Some(dec!(25))
        );
        assert_eq!(ChartService::percentage_of_total(dec!(1), Decimal::ZERO), None);
    }

    #[test]
    fn huge_amounts_neither_panic_nor_wrap() {
        let groups = ChartService::by_color(&[
            entry("a", Decimal::MAX, AccountColor::Cyan),
            entry("b", Decimal::MAX, AccountColor::Cyan),
        ]);
        assert_eq!(groups[0].amount, Decimal::MAX);
        assert_eq!(
            ChartService::percentage_of_total(Decimal::MAX, Decimal::MAX),
            Some(dec!(100))
        );
    }
}
