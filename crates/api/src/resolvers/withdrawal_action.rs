//! Withdrawal action operations.

use action_bank_core::bank::{
    NewWithdrawalAction, WithdrawalAction, WithdrawalActionEdits, ENTITY_WITHDRAWAL_ACTION,
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

/// Arguments for [`add_withdrawal_action`].
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddWithdrawalActionInput {
    #[validate(length(min = 1))]
    pub exchange_id: EntityId,
    #[validate(length(min = 1))]
    pub name: String,
    pub uom: String,
    #[validate(range(exclusive_min = 0.0))]
    pub uom_quantity: f64,
    #[validate(range(min = 0.0))]
    pub withdrawal_quantity: f64,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub sorted_location: i64,
}

/// A withdrawal action counts as owned only while its exchange is.
pub(crate) async fn owned_withdrawal_action(
    state: &AppState,
    caller: &AuthUser,
    id: &str,
) -> AppResult<WithdrawalAction> {
    let action = state
        .bank
        .get_withdrawal_action_by_id(id)
        .await
        .map_err(repo_error(ENTITY_WITHDRAWAL_ACTION))?;

    if action.fields.user_id != caller.user_id {
        return Err(not_found(ENTITY_WITHDRAWAL_ACTION));
    }
    owned_exchange(state, caller, &action.fields.exchange_id)
        .await
        .map_err(|e| as_missing(e, ENTITY_WITHDRAWAL_ACTION))?;

    Ok(action)
}

pub async fn get_withdrawal_action_by_id(
    state: &AppState,
    caller: &AuthUser,
    id: &str,
) -> AppResult<WithdrawalAction> {
    owned_withdrawal_action(state, caller, id).await
}

pub async fn get_withdrawal_actions_by_user_id(
    state: &AppState,
    caller: &AuthUser,
    user_id: &str,
) -> AppResult<Vec<WithdrawalAction>> {
    ensure_own_user_id(caller, user_id)?;
    state
        .bank
        .get_withdrawal_actions_by_user_id(user_id)
        .await
        .map_err(repo_error(ENTITY_WITHDRAWAL_ACTION))
}

/// Withdrawal actions of one exchange, ordered by `sortedLocation`.
pub async fn get_withdrawal_actions_by_exchange_id(
    state: &AppState,
    caller: &AuthUser,
    exchange_id: &str,
) -> AppResult<Vec<WithdrawalAction>> {
    owned_exchange(state, caller, exchange_id).await?;
    state
        .bank
        .get_withdrawal_actions_by_exchange_id(exchange_id)
        .await
        .map_err(repo_error(ENTITY_WITHDRAWAL_ACTION))
}

pub async fn add_withdrawal_action(
    state: &AppState,
    caller: &AuthUser,
    input: AddWithdrawalActionInput,
) -> AppResult<WithdrawalAction> {
    input.validate()?;
    owned_exchange(state, caller, &input.exchange_id).await?;

    let fields = NewWithdrawalAction {
        user_id: caller.user_id.clone(),
        exchange_id: input.exchange_id,
        name: input.name,
        uom: input.uom,
        uom_quantity: input.uom_quantity,
        withdrawal_quantity: input.withdrawal_quantity,
        enabled: input.enabled,
        sorted_location: input.sorted_location,
    };
    fields.ensure_valid()?;

    let action = state
        .bank
        .add_withdrawal_action(fields)
        .await
        .map_err(repo_error(ENTITY_WITHDRAWAL_ACTION))?;

    tracing::info!(
        withdrawal_action_id = %action.id,
        exchange_id = %action.fields.exchange_id,
        user_id = %caller.user_id,
        "Withdrawal action created"
    );
    Ok(action)
}

/// Edit a withdrawal action. Recorded withdrawals keep the rate they were made at.
pub async fn edit_withdrawal_action(
    state: &AppState,
    caller: &AuthUser,
    id: &str,
    edits: WithdrawalActionEdits,
) -> AppResult<WithdrawalAction> {
    edits.validate()?;

    let existing = owned_withdrawal_action(state, caller, id).await?;
    let moved_to = edits
        .exchange_id
        .as_deref()
        .filter(|target| *target != existing.fields.exchange_id);
    if let Some(target) = moved_to {
        owned_exchange(state, caller, target).await?;
    }

    let merged = existing.merge_edits(&edits, now())?;
    let action = state
        .bank
        .edit_withdrawal_action(merged)
        .await
        .map_err(repo_error(ENTITY_WITHDRAWAL_ACTION))?;

    tracing::info!(
        withdrawal_action_id = %action.id,
        user_id = %caller.user_id,
        "Withdrawal action updated"
    );
    Ok(action)
}

/// Delete a withdrawal action and every withdrawal recorded against it.
pub async fn delete_withdrawal_action(
    state: &AppState,
    caller: &AuthUser,
    id: &str,
) -> AppResult<EntityId> {
    owned_withdrawal_action(state, caller, id).await?;

    let withdrawals = state
        .bank
        .delete_withdrawals_by_withdrawal_action_id(id)
        .await
        .map_err(repo_error(ENTITY_WITHDRAWAL_ACTION))?;
    let deleted = state
        .bank
        .delete_withdrawal_action(id)
        .await
        .map_err(repo_error(ENTITY_WITHDRAWAL_ACTION))?;

    tracing::info!(
        withdrawal_action_id = %deleted,
        user_id = %caller.user_id,
        withdrawals,
        "Withdrawal action deleted"
    );
    Ok(deleted)
}
