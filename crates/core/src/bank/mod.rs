//! Bank ledger entities.
//!
//! Every entity comes in two shapes: a `New*` draft holding the fields a
//! caller supplies, and a persisted record that embeds the draft (flattened in
//! JSON) alongside its identity and timestamps.
//!
//! - [`exchange`] -- the user-owned ledger and its computed balance.
//! - [`deposit`] -- deposit action definitions and recorded deposits.
//! - [`withdrawal`] -- withdrawal action definitions and recorded withdrawals.

pub mod deposit;
pub mod exchange;
pub mod withdrawal;

pub use deposit::{
    Deposit, DepositAction, DepositActionEdits, DepositEdits, NewDeposit, NewDepositAction,
};
pub use exchange::{Exchange, ExchangeEdits, ExchangeLedger, NewExchange};
pub use withdrawal::{
    NewWithdrawal, NewWithdrawalAction, Withdrawal, WithdrawalAction, WithdrawalActionEdits,
    WithdrawalEdits,
};

use serde::de::DeserializeOwned;

use crate::error::CoreError;

/// Entity name constants used in error messages and logs.
pub const ENTITY_EXCHANGE: &str = "Exchange";
pub const ENTITY_DEPOSIT_ACTION: &str = "Deposit Action";
pub const ENTITY_WITHDRAWAL_ACTION: &str = "Withdrawal Action";
pub const ENTITY_DEPOSIT: &str = "Deposit";
pub const ENTITY_WITHDRAWAL: &str = "Withdrawal";

/// Strictly parse a raw record. Any missing or mistyped field is invalid data.
pub(crate) fn parse_record<T: DeserializeOwned>(
    value: serde_json::Value,
    entity: &str,
) -> Result<T, CoreError> {
    serde_json::from_value(value)
        .map_err(|e| CoreError::InvalidData(format!("{entity}: {e}")))
}

/// Serialize a record into its persisted JSON shape.
pub(crate) fn to_record<T: serde::Serialize>(
    value: &T,
    entity: &str,
) -> Result<serde_json::Value, CoreError> {
    serde_json::to_value(value).map_err(|e| CoreError::InvalidData(format!("{entity}: {e}")))
}

/// Largest currency value a single transaction may carry. Keeps every
/// balance finite, however many transactions an exchange holds.
pub const MAX_TRANSACTION_VALUE: f64 = 1e15;

/// Check the two numbers that make up an exchange rate.
///
/// The unit-of-measure quantity is the rate's denominator and must be strictly
/// positive; the currency quantity may be zero but not negative.
pub(crate) fn validate_rate(
    uom_quantity: f64,
    currency_quantity: f64,
    currency_field: &str,
) -> Result<(), CoreError> {
    if !uom_quantity.is_finite() || uom_quantity <= 0.0 {
        return Err(CoreError::Validation(
            "uomQuantity must be greater than 0".into(),
        ));
    }
    if !currency_quantity.is_finite() || currency_quantity < 0.0 {
        return Err(CoreError::Validation(format!(
            "{currency_field} must be 0 or greater"
        )));
    }
    if !(currency_quantity / uom_quantity).is_finite() {
        return Err(CoreError::Validation(format!(
            "{currency_field} per uomQuantity is too large"
        )));
    }
    Ok(())
}

/// Check the amount recorded against an action.
pub(crate) fn validate_quantity(quantity: f64) -> Result<(), CoreError> {
    if !quantity.is_finite() || quantity < 0.0 {
        return Err(CoreError::Validation("quantity must be 0 or greater".into()));
    }
    Ok(())
}

/// Check the currency value of one transaction.
pub(crate) fn validate_value(value: f64) -> Result<(), CoreError> {
    if !value.is_finite() || value > MAX_TRANSACTION_VALUE {
        return Err(CoreError::Validation(format!(
            "Transaction value must not exceed {MAX_TRANSACTION_VALUE}"
        )));
    }
    Ok(())
}

/// Re-label a validation failure on stored data as invalid data.
pub(crate) fn as_invalid_data(err: CoreError, entity: &str) -> CoreError {
    match err {
        CoreError::Validation(msg) => CoreError::InvalidData(format!("{entity}: {msg}")),
        other => other,
    }
}
