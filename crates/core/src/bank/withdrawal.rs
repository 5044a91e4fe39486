//! Withdrawal actions (rate definitions) and withdrawals (recorded transactions).

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{
    as_invalid_data, parse_record, to_record, validate_quantity, validate_rate, validate_value,
    ENTITY_WITHDRAWAL, ENTITY_WITHDRAWAL_ACTION,
};
use crate::error::CoreError;
use crate::types::{EntityId, Timestamp};

// ---------------------------------------------------------------------------
// Withdrawal actions
// ---------------------------------------------------------------------------

/// The fields of a withdrawal action before it is persisted.
///
/// `uom_quantity` units of the action cost `withdrawal_quantity` units of
/// currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWithdrawalAction {
    pub user_id: EntityId,
    pub exchange_id: EntityId,
    pub name: String,
    pub uom: String,
    pub uom_quantity: f64,
    pub withdrawal_quantity: f64,
    pub enabled: bool,
    pub sorted_location: i64,
}

impl NewWithdrawalAction {
    pub fn ensure_valid(&self) -> Result<(), CoreError> {
        validate_rate(
            self.uom_quantity,
            self.withdrawal_quantity,
            "withdrawalQuantity",
        )
    }

    /// Currency spent per single unit of measure.
    pub fn exchange_rate(&self) -> f64 {
        self.withdrawal_quantity / self.uom_quantity
    }

    pub fn cost(&self, quantity: f64) -> f64 {
        quantity * self.exchange_rate()
    }
}

/// A persisted withdrawal action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalAction {
    pub id: EntityId,
    #[serde(flatten)]
    pub fields: NewWithdrawalAction,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date_added: Timestamp,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date_updated: Timestamp,
}

impl WithdrawalAction {
    pub fn from_new(fields: NewWithdrawalAction, id: EntityId, now: Timestamp) -> Self {
        Self {
            id,
            fields,
            date_added: now,
            date_updated: now,
        }
    }

    pub fn from_json(value: serde_json::Value) -> Result<Self, CoreError> {
        let action: Self = parse_record(value, ENTITY_WITHDRAWAL_ACTION)?;
        action
            .fields
            .ensure_valid()
            .map_err(|e| as_invalid_data(e, ENTITY_WITHDRAWAL_ACTION))?;
        Ok(action)
    }

    pub fn to_json(&self) -> Result<serde_json::Value, CoreError> {
        to_record(self, ENTITY_WITHDRAWAL_ACTION)
    }

    pub fn exchange_rate(&self) -> f64 {
        self.fields.exchange_rate()
    }

    /// Apply the fields present in `edits`, keeping every other value.
    pub fn merge_edits(
        &self,
        edits: &WithdrawalActionEdits,
        now: Timestamp,
    ) -> Result<Self, CoreError> {
        let current = &self.fields;
        let fields = NewWithdrawalAction {
            user_id: current.user_id.clone(),
            exchange_id: edits
                .exchange_id
                .clone()
                .unwrap_or_else(|| current.exchange_id.clone()),
            name: edits.name.clone().unwrap_or_else(|| current.name.clone()),
            uom: edits.uom.clone().unwrap_or_else(|| current.uom.clone()),
            uom_quantity: edits.uom_quantity.unwrap_or(current.uom_quantity),
            withdrawal_quantity: edits
                .withdrawal_quantity
                .unwrap_or(current.withdrawal_quantity),
            enabled: edits.enabled.unwrap_or(current.enabled),
            sorted_location: edits.sorted_location.unwrap_or(current.sorted_location),
        };
        fields.ensure_valid()?;

        Ok(Self {
            id: self.id.clone(),
            fields,
            date_added: self.date_added,
            date_updated: now,
        })
    }
}

/// Field-level overrides for a withdrawal action. Absent fields are retained.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalActionEdits {
    #[validate(length(min = 1))]
    pub exchange_id: Option<EntityId>,
    #[validate(length(min = 1))]
    pub name: Option<String>,
    pub uom: Option<String>,
    #[validate(range(exclusive_min = 0.0))]
    pub uom_quantity: Option<f64>,
    #[validate(range(min = 0.0))]
    pub withdrawal_quantity: Option<f64>,
    pub enabled: Option<bool>,
    pub sorted_location: Option<i64>,
}

// ---------------------------------------------------------------------------
// Withdrawals
// ---------------------------------------------------------------------------

/// The fields of a withdrawal before it is persisted, with the action's name
/// and rate frozen at creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWithdrawal {
    pub user_id: EntityId,
    pub exchange_id: EntityId,
    pub withdrawal_action_id: EntityId,
    pub withdrawal_action_name: String,
    pub uom_quantity: f64,
    pub withdrawal_quantity: f64,
    pub quantity: f64,
}

impl NewWithdrawal {
    pub fn from_action(action: &WithdrawalAction, quantity: f64) -> Self {
        Self {
            user_id: action.fields.user_id.clone(),
            exchange_id: action.fields.exchange_id.clone(),
            withdrawal_action_id: action.id.clone(),
            withdrawal_action_name: action.fields.name.clone(),
            uom_quantity: action.fields.uom_quantity,
            withdrawal_quantity: action.fields.withdrawal_quantity,
            quantity,
        }
    }

    pub fn ensure_valid(&self) -> Result<(), CoreError> {
        validate_rate(
            self.uom_quantity,
            self.withdrawal_quantity,
            "withdrawalQuantity",
        )?;
        validate_quantity(self.quantity)?;
        validate_value(self.cost())
    }

    pub fn exchange_rate(&self) -> f64 {
        self.withdrawal_quantity / self.uom_quantity
    }

    /// Currency this withdrawal cost, at its frozen rate.
    pub fn cost(&self) -> f64 {
        self.quantity * self.exchange_rate()
    }
}

/// A persisted withdrawal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Withdrawal {
    pub id: EntityId,
    #[serde(flatten)]
    pub fields: NewWithdrawal,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date_added: Timestamp,
}

impl Withdrawal {
    pub fn from_new(fields: NewWithdrawal, id: EntityId, now: Timestamp) -> Self {
        Self {
            id,
            fields,
            date_added: now,
        }
    }

    pub fn from_json(value: serde_json::Value) -> Result<Self, CoreError> {
        let withdrawal: Self = parse_record(value, ENTITY_WITHDRAWAL)?;
        withdrawal
            .fields
            .ensure_valid()
            .map_err(|e| as_invalid_data(e, ENTITY_WITHDRAWAL))?;
        Ok(withdrawal)
    }

    pub fn to_json(&self) -> Result<serde_json::Value, CoreError> {
        to_record(self, ENTITY_WITHDRAWAL)
    }

    pub fn cost(&self) -> f64 {
        self.fields.cost()
    }

    /// Apply an edit; see [`crate::bank::Deposit::merge_edits`].
    pub fn merge_edits(
        &self,
        quantity: Option<f64>,
        action: Option<&WithdrawalAction>,
    ) -> Result<Self, CoreError> {
        let quantity = quantity.unwrap_or(self.fields.quantity);
        let fields = match action {
            Some(action) => NewWithdrawal::from_action(action, quantity),
            None => NewWithdrawal {
                quantity,
                ..self.fields.clone()
            },
        };
        fields.ensure_valid()?;

        Ok(Self {
            id: self.id.clone(),
            fields,
            date_added: self.date_added,
        })
    }
}

/// Field-level overrides for a withdrawal.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalEdits {
    #[validate(length(min = 1))]
    pub withdrawal_action_id: Option<EntityId>,
    #[validate(range(min = 0.0))]
    pub quantity: Option<f64>,
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;
    use crate::types::now;

    fn action(uom_quantity: f64, withdrawal_quantity: f64) -> WithdrawalAction {
        WithdrawalAction::from_new(
            NewWithdrawalAction {
                user_id: "u1".into(),
                exchange_id: "ex1".into(),
                name: "Watch TV".into(),
                uom: "Episodes".into(),
                uom_quantity,
                withdrawal_quantity,
                enabled: true,
                sorted_location: 1,
            },
            "wa1".into(),
            now(),
        )
    }

    #[test]
    fn withdrawal_cost_uses_frozen_rate() {
        let a = action(1.0, 2.0);
        let withdrawal =
            Withdrawal::from_new(NewWithdrawal::from_action(&a, 4.0), "w1".into(), now());
        assert_eq!(withdrawal.cost(), 8.0);

        let edited = a
            .merge_edits(
                &WithdrawalActionEdits {
                    withdrawal_quantity: Some(10.0),
                    ..Default::default()
                },
                now(),
            )
            .unwrap();
        assert_eq!(edited.exchange_rate(), 10.0);
        assert_eq!(withdrawal.cost(), 8.0);
    }

    #[test]
    fn quantity_edit_keeps_snapshot() {
        let a = action(1.0, 2.0);
        let withdrawal =
            Withdrawal::from_new(NewWithdrawal::from_action(&a, 4.0), "w1".into(), now());
        let edited = withdrawal.merge_edits(Some(1.5), None).unwrap();

        assert_eq!(edited.fields.withdrawal_action_name, "Watch TV");
        assert_eq!(edited.cost(), 3.0);
    }

    #[test]
    fn negative_quantity_rejected() {
        let a = action(1.0, 2.0);
        let withdrawal =
            Withdrawal::from_new(NewWithdrawal::from_action(&a, 4.0), "w1".into(), now());
        assert_matches!(
            withdrawal.merge_edits(Some(-1.0), None),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn json_round_trip() {
        let a = action(1.0, 2.0);
        assert_eq!(WithdrawalAction::from_json(a.to_json().unwrap()).unwrap(), a);

        let withdrawal =
            Withdrawal::from_new(NewWithdrawal::from_action(&a, 4.0), "w1".into(), now());
        assert_eq!(
            Withdrawal::from_json(withdrawal.to_json().unwrap()).unwrap(),
            withdrawal
        );
    }

    #[test]
    fn wrong_type_is_invalid_data() {
        let a = action(1.0, 2.0);
        let withdrawal =
            Withdrawal::from_new(NewWithdrawal::from_action(&a, 4.0), "w1".into(), now());
        let mut json = withdrawal.to_json().unwrap();
        json["quantity"] = json!("four");
        assert_matches!(Withdrawal::from_json(json), Err(CoreError::InvalidData(_)));

        assert_matches!(
            WithdrawalAction::from_json(json!(["not", "a", "record"])),
            Err(CoreError::InvalidData(_))
        );
    }
}
