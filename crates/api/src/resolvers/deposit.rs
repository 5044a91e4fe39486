//! Deposit operations.
//!
//! A deposit copies its action's rate when it is recorded; editing the action
//! afterwards never changes what the deposit was worth.

use action_bank_core::bank::{Deposit, DepositEdits, NewDeposit, ENTITY_DEPOSIT};
use action_bank_core::types::EntityId;
use serde::Deserialize;
use validator::Validate;

use super::deposit_action::owned_deposit_action;
use super::{as_missing, ensure_own_user_id, not_found, repo_error};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Arguments for [`add_deposit`].
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddDepositInput {
    #[validate(length(min = 1))]
    pub deposit_action_id: EntityId,
    #[validate(range(min = 0.0))]
    pub quantity: f64,
}

async fn owned_deposit(state: &AppState, caller: &AuthUser, id: &str) -> AppResult<Deposit> {
    let deposit = state
        .bank
        .get_deposit_by_id(id)
        .await
        .map_err(repo_error(ENTITY_DEPOSIT))?;

    if deposit.fields.user_id != caller.user_id {
        return Err(not_found(ENTITY_DEPOSIT));
    }
    owned_deposit_action(state, caller, &deposit.fields.deposit_action_id)
        .await
        .map_err(|e| as_missing(e, ENTITY_DEPOSIT))?;

    Ok(deposit)
}

pub async fn get_deposit_by_id(
    state: &AppState,
    caller: &AuthUser,
    id: &str,
) -> AppResult<Deposit> {
    owned_deposit(state, caller, id).await
}

pub async fn get_deposits_by_user_id(
    state: &AppState,
    caller: &AuthUser,
    user_id: &str,
) -> AppResult<Vec<Deposit>> {
    ensure_own_user_id(caller, user_id)?;
    state
        .bank
        .get_deposits_by_user_id(user_id)
        .await
        .map_err(repo_error(ENTITY_DEPOSIT))
}

pub async fn get_deposits_by_deposit_action_id(
    state: &AppState,
    caller: &AuthUser,
    deposit_action_id: &str,
) -> AppResult<Vec<Deposit>> {
    owned_deposit_action(state, caller, deposit_action_id).await?;
    state
        .bank
        .get_deposits_by_deposit_action_id(deposit_action_id)
        .await
        .map_err(repo_error(ENTITY_DEPOSIT))
}

/// Record a deposit at the action's current rate.
pub async fn add_deposit(
    state: &AppState,
    caller: &AuthUser,
    input: AddDepositInput,
) -> AppResult<Deposit> {
    input.validate()?;

    let action = owned_deposit_action(state, caller, &input.deposit_action_id).await?;
    let fields = NewDeposit {
        user_id: caller.user_id.clone(),
        ..NewDeposit::from_action(&action, input.quantity)
    };
    fields.ensure_valid()?;

    let deposit = state
        .bank
        .add_deposit(fields)
        .await
        .map_err(repo_error(ENTITY_DEPOSIT))?;

    tracing::info!(
        deposit_id = %deposit.id,
        deposit_action_id = %action.id,
        user_id = %caller.user_id,
        value = deposit.deposit(),
        "Deposit recorded"
    );
    Ok(deposit)
}

/// Edit a deposit's quantity, or move it to another action. Moving takes a
/// fresh copy of the new action's rate.
pub async fn edit_deposit(
    state: &AppState,
    caller: &AuthUser,
    id: &str,
    edits: DepositEdits,
) -> AppResult<Deposit> {
    edits.validate()?;

    let existing = owned_deposit(state, caller, id).await?;
    let new_action = match &edits.deposit_action_id {
        Some(action_id) if *action_id != existing.fields.deposit_action_id => {
            Some(owned_deposit_action(state, caller, action_id).await?)
        }
        _ => None,
    };

    let merged = existing.merge_edits(edits.quantity, new_action.as_ref())?;
    let deposit = state
        .bank
        .edit_deposit(merged)
        .await
        .map_err(repo_error(ENTITY_DEPOSIT))?;

    tracing::info!(deposit_id = %deposit.id, user_id = %caller.user_id, "Deposit updated");
    Ok(deposit)
}

pub async fn delete_deposit(
    state: &AppState,
    caller: &AuthUser,
    id: &str,
) -> AppResult<EntityId> {
    owned_deposit(state, caller, id).await?;
    let deleted = state
        .bank
        .delete_deposit(id)
        .await
        .map_err(repo_error(ENTITY_DEPOSIT))?;

    tracing::info!(deposit_id = %deleted, user_id = %caller.user_id, "Deposit deleted");
    Ok(deleted)
}
