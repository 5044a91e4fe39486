//! Deposit action operations.

use action_bank_core::bank::{
    DepositAction, DepositActionEdits, NewDepositAction, ENTITY_DEPOSIT_ACTION,
};
use action_bank_core::types::{now, EntityId};
use serde::Deserialize;
use validator::Validate;

use super::exchange::owned_exchange;
use super::{as_missing, ensure_own_user_id, not_found, repo_error};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

fn default_enabled() -> bool {
    true
}

/// Arguments for [`add_deposit_action`].
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddDepositActionInput {
    #[validate(length(min = 1))]
    pub exchange_id: EntityId,
    #[validate(length(min = 1))]
    pub name: String,
    pub uom: String,
    #[validate(range(exclusive_min = 0.0))]
    pub uom_quantity: f64,
    #[validate(range(min = 0.0))]
    pub deposit_quantity: f64,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub sorted_location: i64,
}

/// Fetch a deposit action the caller owns, through its exchange.
pub(crate) async fn owned_deposit_action(
    state: &AppState,
    caller: &AuthUser,
    id: &str,
) -> AppResult<DepositAction> {
    let action = state
        .bank
        .get_deposit_action_by_id(id)
        .await
        .map_err(repo_error(ENTITY_DEPOSIT_ACTION))?;

    if action.fields.user_id != caller.user_id {
        return Err(not_found(ENTITY_DEPOSIT_ACTION));
    }
    owned_exchange(state, caller, &action.fields.exchange_id)
        .await
        .map_err(|e| as_missing(e, ENTITY_DEPOSIT_ACTION))?;

    Ok(action)
}

pub async fn get_deposit_action_by_id(
    state: &AppState,
    caller: &AuthUser,
    id: &str,
) -> AppResult<DepositAction> {
    owned_deposit_action(state, caller, id).await
}

pub async fn get_deposit_actions_by_user_id(
    state: &AppState,
    caller: &AuthUser,
    user_id: &str,
) -> AppResult<Vec<DepositAction>> {
    ensure_own_user_id(caller, user_id)?;
    state
        .bank
        .get_deposit_actions_by_user_id(user_id)
        .await
        .map_err(repo_error(ENTITY_DEPOSIT_ACTION))
}

/// Deposit actions of one exchange, ordered by `sortedLocation`.
pub async fn get_deposit_actions_by_exchange_id(
    state: &AppState,
    caller: &AuthUser,
    exchange_id: &str,
) -> AppResult<Vec<DepositAction>> {
    owned_exchange(state, caller, exchange_id).await?;
    state
        .bank
        .get_deposit_actions_by_exchange_id(exchange_id)
        .await
        .map_err(repo_error(ENTITY_DEPOSIT_ACTION))
}

pub async fn add_deposit_action(
    state: &AppState,
    caller: &AuthUser,
    input: AddDepositActionInput,
) -> AppResult<DepositAction> {
    input.validate()?;
    owned_exchange(state, caller, &input.exchange_id).await?;

    let fields = NewDepositAction {
        user_id: caller.user_id.clone(),
        exchange_id: input.exchange_id,
        name: input.name,
        uom: input.uom,
        uom_quantity: input.uom_quantity,
        deposit_quantity: input.deposit_quantity,
        enabled: input.enabled,
        sorted_location: input.sorted_location,
    };
    fields.ensure_valid()?;

    let action = state
        .bank
        .add_deposit_action(fields)
        .await
        .map_err(repo_error(ENTITY_DEPOSIT_ACTION))?;

    tracing::info!(
        deposit_action_id = %action.id,
        exchange_id = %action.fields.exchange_id,
        user_id = %caller.user_id,
        "Deposit action created"
    );
    Ok(action)
}

/// Edit a deposit action. Recorded deposits keep the rate they were made at.
pub async fn edit_deposit_action(
    state: &AppState,
    caller: &AuthUser,
    id: &str,
    edits: DepositActionEdits,
) -> AppResult<DepositAction> {
    edits.validate()?;

    let existing = owned_deposit_action(state, caller, id).await?;
    if let Some(exchange_id) = &edits.exchange_id {
        if *exchange_id != existing.fields.exchange_id {
            owned_exchange(state, caller, exchange_id).await?;
        }
    }

    let merged = existing.merge_edits(&edits, now())?;
    let action = state
        .bank
        .edit_deposit_action(merged)
        .await
        .map_err(repo_error(ENTITY_DEPOSIT_ACTION))?;

    tracing::info!(
        deposit_action_id = %action.id,
        user_id = %caller.user_id,
        "Deposit action updated"
    );
    Ok(action)
}

/// Delete a deposit action and every deposit recorded against it.
pub async fn delete_deposit_action(
    state: &AppState,
    caller: &AuthUser,
    id: &str,
) -> AppResult<EntityId> {
    owned_deposit_action(state, caller, id).await?;

    let deposits = state
        .bank
        .delete_deposits_by_deposit_action_id(id)
        .await
        .map_err(repo_error(ENTITY_DEPOSIT_ACTION))?;
    let deleted = state
        .bank
        .delete_deposit_action(id)
        .await
        .map_err(repo_error(ENTITY_DEPOSIT_ACTION))?;

    tracing::info!(
        deposit_action_id = %deleted,
        user_id = %caller.user_id,
        deposits,
        "Deposit action deleted"
    );
    Ok(deleted)
}
