//! Exchanges: user-owned ledgers grouping actions and their transactions.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::deposit::{Deposit, DepositAction};
use super::withdrawal::{Withdrawal, WithdrawalAction};
use super::{parse_record, to_record, ENTITY_EXCHANGE};
use crate::error::CoreError;
use crate::types::EntityId;

/// The fields of an exchange before it is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExchange {
    pub user_id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A persisted exchange.
///
/// Only `id`, `userId`, `name` and `description` are stored. The [`ledger`]
/// is rebuilt from the action and transaction collections whenever an
/// exchange is loaded.
///
/// [`ledger`]: Exchange::ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exchange {
    pub id: EntityId,
    #[serde(flatten)]
    pub fields: NewExchange,
    #[serde(skip)]
    pub ledger: ExchangeLedger,
}

impl Exchange {
    pub fn from_new(fields: NewExchange, id: EntityId) -> Self {
        Self {
            id,
            fields,
            ledger: ExchangeLedger::default(),
        }
    }

    pub fn from_json(value: serde_json::Value) -> Result<Self, CoreError> {
        parse_record(value, ENTITY_EXCHANGE)
    }

    pub fn to_json(&self) -> Result<serde_json::Value, CoreError> {
        to_record(self, ENTITY_EXCHANGE)
    }

    pub fn with_ledger(mut self, ledger: ExchangeLedger) -> Self {
        self.ledger = ledger;
        self
    }

    pub fn total_currency(&self) -> f64 {
        self.ledger.total_currency()
    }

    /// Apply the fields present in `edits`, keeping every other value.
    pub fn merge_edits(&self, edits: &ExchangeEdits) -> Self {
        Self {
            id: self.id.clone(),
            fields: NewExchange {
                user_id: self.fields.user_id.clone(),
                name: edits
                    .name
                    .clone()
                    .unwrap_or_else(|| self.fields.name.clone()),
                description: edits
                    .description
                    .clone()
                    .unwrap_or_else(|| self.fields.description.clone()),
            },
            ledger: self.ledger.clone(),
        }
    }
}

/// Field-level overrides for an exchange.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeEdits {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    pub description: Option<String>,
}

/// The actions and transactions belonging to one exchange.
///
/// Totals are computed on every call from the transactions' own frozen rates,
/// so they can never go stale after a collection changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExchangeLedger {
    deposit_actions: Vec<DepositAction>,
    withdrawal_actions: Vec<WithdrawalAction>,
    deposits: Vec<Deposit>,
    withdrawals: Vec<Withdrawal>,
}

impl ExchangeLedger {
    pub fn new(
        deposit_actions: Vec<DepositAction>,
        withdrawal_actions: Vec<WithdrawalAction>,
        deposits: Vec<Deposit>,
        withdrawals: Vec<Withdrawal>,
    ) -> Self {
        let mut ledger = Self {
            deposit_actions,
            withdrawal_actions,
            deposits,
            withdrawals,
        };
        ledger.sort_actions();
        ledger
    }

    pub fn deposit_actions(&self) -> &[DepositAction] {
        &self.deposit_actions
    }

    pub fn withdrawal_actions(&self) -> &[WithdrawalAction] {
        &self.withdrawal_actions
    }

    pub fn deposits(&self) -> &[Deposit] {
        &self.deposits
    }

    pub fn withdrawals(&self) -> &[Withdrawal] {
        &self.withdrawals
    }

    pub fn add_deposit(&mut self, deposit: Deposit) {
        self.deposits.push(deposit);
    }

    pub fn add_withdrawal(&mut self, withdrawal: Withdrawal) {
        self.withdrawals.push(withdrawal);
    }

    pub fn total_deposits(&self) -> f64 {
        self.deposits.iter().map(Deposit::deposit).sum()
    }

    pub fn total_withdrawals(&self) -> f64 {
        self.withdrawals.iter().map(Withdrawal::cost).sum()
    }

    pub fn total_currency(&self) -> f64 {
        self.total_deposits() - self.total_withdrawals()
    }

    /// Order both action lists by `sortedLocation`.
    fn sort_actions(&mut self) {
        self.deposit_actions
            .sort_by_key(|a| a.fields.sorted_location);
        self.withdrawal_actions
            .sort_by_key(|a| a.fields.sorted_location);
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;
    use crate::bank::{NewDeposit, NewDepositAction, NewWithdrawal, NewWithdrawalAction};
    use crate::types::now;

    fn deposit_action(uom_quantity: f64, deposit_quantity: f64, sorted: i64) -> DepositAction {
        DepositAction::from_new(
            NewDepositAction {
                user_id: "u1".into(),
                exchange_id: "ex1".into(),
                name: format!("deposit {sorted}"),
                uom: "minutes".into(),
                uom_quantity,
                deposit_quantity,
                enabled: true,
                sorted_location: sorted,
            },
            format!("da{sorted}"),
            now(),
        )
    }

    fn withdrawal_action(uom_quantity: f64, withdrawal_quantity: f64) -> WithdrawalAction {
        WithdrawalAction::from_new(
            NewWithdrawalAction {
                user_id: "u1".into(),
                exchange_id: "ex1".into(),
                name: "treat".into(),
                uom: "items".into(),
                uom_quantity,
                withdrawal_quantity,
                enabled: true,
                sorted_location: 0,
            },
            "wa1".into(),
            now(),
        )
    }

    fn deposit(action: &DepositAction, quantity: f64) -> Deposit {
        Deposit::from_new(NewDeposit::from_action(action, quantity), "d".into(), now())
    }

    fn withdrawal(action: &WithdrawalAction, quantity: f64) -> Withdrawal {
        Withdrawal::from_new(NewWithdrawal::from_action(action, quantity), "w".into(), now())
    }

    #[test]
    fn empty_exchange_has_zero_currency() {
        let ex = Exchange::from_new(
            NewExchange {
                user_id: "u1".into(),
                name: "Fitness".into(),
                description: String::new(),
            },
            "ex1".into(),
        );
        assert_eq!(ex.total_currency(), 0.0);
    }

    #[test]
    fn total_currency_is_deposits_minus_withdrawals() {
        let da = deposit_action(1.0, 1.0, 0);
        let wa = withdrawal_action(1.0, 1.0);
        let mut ledger = ExchangeLedger::new(
            vec![da.clone()],
            vec![wa.clone()],
            vec![deposit(&da, 10.0), deposit(&da, 20.0)],
            vec![withdrawal(&wa, 12.0)],
        );

        assert_eq!(ledger.total_deposits(), 30.0);
        assert_eq!(ledger.total_withdrawals(), 12.0);
        assert_eq!(ledger.total_currency(), 18.0);

        ledger.add_withdrawal(withdrawal(&wa, 5.0));
        assert_eq!(ledger.total_currency(), 13.0);
    }

    #[test]
    fn each_transaction_uses_its_own_rate() {
        let cheap = deposit_action(3.0, 1.0, 0);
        let rich = deposit_action(1.0, 4.0, 1);
        let mut ledger = ExchangeLedger::default();
        ledger.add_deposit(deposit(&cheap, 9.0));
        ledger.add_deposit(deposit(&rich, 2.0));

        assert_eq!(ledger.total_currency(), 11.0);
    }

    #[test]
    fn actions_sorted_by_location() {
        let ledger = ExchangeLedger::new(
            vec![
                deposit_action(1.0, 1.0, 5),
                deposit_action(1.0, 1.0, 1),
                deposit_action(1.0, 1.0, 3),
            ],
            Vec::new(),
            Vec::new(),
            Vec::new(),
        );
        let order: Vec<i64> = ledger
            .deposit_actions()
            .iter()
            .map(|a| a.fields.sorted_location)
            .collect();
        assert_eq!(order, vec![1, 3, 5]);
    }

    #[test]
    fn json_excludes_ledger() {
        let da = deposit_action(1.0, 1.0, 0);
        let ex = Exchange::from_new(
            NewExchange {
                user_id: "u1".into(),
                name: "Fitness".into(),
                description: "daily".into(),
            },
            "ex1".into(),
        )
        .with_ledger(ExchangeLedger::new(
            vec![da.clone()],
            Vec::new(),
            vec![deposit(&da, 1.0)],
            Vec::new(),
        ));

        let json = ex.to_json().unwrap();
        assert_eq!(
            json,
            json!({ "id": "ex1", "userId": "u1", "name": "Fitness", "description": "daily" })
        );

        let parsed = Exchange::from_json(json).unwrap();
        assert_eq!(parsed.fields, ex.fields);
        assert_eq!(parsed.ledger, ExchangeLedger::default());
    }

    #[test]
    fn description_defaults_to_empty() {
        let parsed =
            Exchange::from_json(json!({ "id": "ex1", "userId": "u1", "name": "Fitness" }))
                .unwrap();
        assert_eq!(parsed.fields.description, "");
    }

    #[test]
    fn missing_owner_is_invalid_data() {
        assert_matches!(
            Exchange::from_json(json!({ "id": "ex1", "name": "Fitness" })),
            Err(CoreError::InvalidData(_))
        );
    }

    #[test]
    fn merge_edits_keeps_owner_and_absent_fields() {
        let ex = Exchange::from_new(
            NewExchange {
                user_id: "u1".into(),
                name: "Fitness".into(),
                description: "daily".into(),
            },
            "ex1".into(),
        );
        let edited = ex.merge_edits(&ExchangeEdits {
            name: Some("Health".into()),
            description: None,
        });
        assert_eq!(edited.fields.user_id, "u1");
        assert_eq!(edited.fields.name, "Health");
        assert_eq!(edited.fields.description, "daily");
    }
}
