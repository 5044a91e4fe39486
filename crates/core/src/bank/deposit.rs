//! Deposit actions (rate definitions) and deposits (recorded transactions).

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{
    as_invalid_data, parse_record, to_record, validate_quantity, validate_rate, validate_value,
    ENTITY_DEPOSIT, ENTITY_DEPOSIT_ACTION,
};
use crate::error::CoreError;
use crate::types::{EntityId, Timestamp};

// ---------------------------------------------------------------------------
// Deposit actions
// ---------------------------------------------------------------------------

/// The fields of a deposit action before it is persisted.
///
/// `uom` is the unit a user measures the action in (e.g. "Minutes Ridden");
/// `uom_quantity` units of it are worth `deposit_quantity` units of currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDepositAction {
    pub user_id: EntityId,
    pub exchange_id: EntityId,
    pub name: String,
    pub uom: String,
    pub uom_quantity: f64,
    pub deposit_quantity: f64,
    pub enabled: bool,
    pub sorted_location: i64,
}

impl NewDepositAction {
    /// Reject rates that cannot be evaluated.
    pub fn ensure_valid(&self) -> Result<(), CoreError> {
        validate_rate(self.uom_quantity, self.deposit_quantity, "depositQuantity")
    }

    /// Currency earned per single unit of measure.
    pub fn exchange_rate(&self) -> f64 {
        self.deposit_quantity / self.uom_quantity
    }

    /// Currency earned for `quantity` units of measure at the current rate.
    pub fn cost(&self, quantity: f64) -> f64 {
        quantity * self.exchange_rate()
    }
}

/// A persisted deposit action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositAction {
    pub id: EntityId,
    #[serde(flatten)]
    pub fields: NewDepositAction,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date_added: Timestamp,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date_updated: Timestamp,
}

impl DepositAction {
    pub fn from_new(fields: NewDepositAction, id: EntityId, now: Timestamp) -> Self {
        Self {
            id,
            fields,
            date_added: now,
            date_updated: now,
        }
    }

    pub fn from_json(value: serde_json::Value) -> Result<Self, CoreError> {
        let action: Self = parse_record(value, ENTITY_DEPOSIT_ACTION)?;
        action
            .fields
            .ensure_valid()
            .map_err(|e| as_invalid_data(e, ENTITY_DEPOSIT_ACTION))?;
        Ok(action)
    }

    pub fn to_json(&self) -> Result<serde_json::Value, CoreError> {
        to_record(self, ENTITY_DEPOSIT_ACTION)
    }

    pub fn exchange_rate(&self) -> f64 {
        self.fields.exchange_rate()
    }

    /// Apply the fields present in `edits`, keeping every other value.
    pub fn merge_edits(
        &self,
        edits: &DepositActionEdits,
        now: Timestamp,
    ) -> Result<Self, CoreError> {
        let current = &self.fields;
        let fields = NewDepositAction {
            user_id: current.user_id.clone(),
            exchange_id: edits
                .exchange_id
                .clone()
                .unwrap_or_else(|| current.exchange_id.clone()),
            name: edits.name.clone().unwrap_or_else(|| current.name.clone()),
            uom: edits.uom.clone().unwrap_or_else(|| current.uom.clone()),
            uom_quantity: edits.uom_quantity.unwrap_or(current.uom_quantity),
            deposit_quantity: edits.deposit_quantity.unwrap_or(current.deposit_quantity),
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

/// Field-level overrides for a deposit action. Absent fields are retained.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DepositActionEdits {
    #[validate(length(min = 1))]
    pub exchange_id: Option<EntityId>,
    #[validate(length(min = 1))]
    pub name: Option<String>,
    pub uom: Option<String>,
    #[validate(range(exclusive_min = 0.0))]
    pub uom_quantity: Option<f64>,
    #[validate(range(min = 0.0))]
    pub deposit_quantity: Option<f64>,
    pub enabled: Option<bool>,
    pub sorted_location: Option<i64>,
}

// ---------------------------------------------------------------------------
// Deposits
// ---------------------------------------------------------------------------

/// The fields of a deposit before it is persisted.
///
/// The action's name and rate are copied in at creation time so that later
/// edits to the action never change what a past deposit was worth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDeposit {
    pub user_id: EntityId,
    pub exchange_id: EntityId,
    pub deposit_action_id: EntityId,
    pub deposit_action_name: String,
    pub uom_quantity: f64,
    pub deposit_quantity: f64,
    pub quantity: f64,
}

impl NewDeposit {
    /// Snapshot `action`'s rate for a deposit of `quantity` units of measure.
    pub fn from_action(action: &DepositAction, quantity: f64) -> Self {
        Self {
            user_id: action.fields.user_id.clone(),
            exchange_id: action.fields.exchange_id.clone(),
            deposit_action_id: action.id.clone(),
            deposit_action_name: action.fields.name.clone(),
            uom_quantity: action.fields.uom_quantity,
            deposit_quantity: action.fields.deposit_quantity,
            quantity,
        }
    }

    pub fn ensure_valid(&self) -> Result<(), CoreError> {
        validate_rate(self.uom_quantity, self.deposit_quantity, "depositQuantity")?;
        validate_quantity(self.quantity)?;
        validate_value(self.deposit())
    }

    pub fn exchange_rate(&self) -> f64 {
        self.deposit_quantity / self.uom_quantity
    }

    /// Currency this deposit is worth, at its frozen rate.
    pub fn deposit(&self) -> f64 {
        self.quantity * self.exchange_rate()
    }
}

/// A persisted deposit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deposit {
    pub id: EntityId,
    #[serde(flatten)]
    pub fields: NewDeposit,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date_added: Timestamp,
}

impl Deposit {
    pub fn from_new(fields: NewDeposit, id: EntityId, now: Timestamp) -> Self {
        Self {
            id,
            fields,
            date_added: now,
        }
    }

    pub fn from_json(value: serde_json::Value) -> Result<Self, CoreError> {
        let deposit: Self = parse_record(value, ENTITY_DEPOSIT)?;
        deposit
            .fields
            .ensure_valid()
            .map_err(|e| as_invalid_data(e, ENTITY_DEPOSIT))?;
        Ok(deposit)
    }

    pub fn to_json(&self) -> Result<serde_json::Value, CoreError> {
        to_record(self, ENTITY_DEPOSIT)
    }

    pub fn deposit(&self) -> f64 {
        self.fields.deposit()
    }

    /// Apply an edit. When `action` is given the deposit is re-pointed at it
    /// and takes a fresh snapshot of its rate; otherwise the frozen rate stays.
    pub fn merge_edits(
        &self,
        quantity: Option<f64>,
        action: Option<&DepositAction>,
    ) -> Result<Self, CoreError> {
        let quantity = quantity.unwrap_or(self.fields.quantity);
        let fields = match action {
            Some(action) => NewDeposit::from_action(action, quantity),
            None => NewDeposit {
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

/// Field-level overrides for a deposit.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DepositEdits {
    #[validate(length(min = 1))]
    pub deposit_action_id: Option<EntityId>,
    #[validate(range(min = 0.0))]
    pub quantity: Option<f64>,
}
