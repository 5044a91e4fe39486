//! Withdrawal operations. Same ownership and rate-freezing rules as deposits.

use action_bank_core::bank::{NewWithdrawal, Withdrawal, WithdrawalEdits, ENTITY_WITHDRAWAL};
use action_bank_core::types::EntityId;
use serde::Deserialize;
use validator::Validate;

use super::withdrawal_action::owned_withdrawal_action;
use super::{as_missing, ensure_own_user_id, not_found, repo_error};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Arguments for [`add_withdrawal`].
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddWithdrawalInput {
    #[validate(length(min = 1))]
    pub withdrawal_action_id: EntityId,
    #[validate(range(min = 0.0))]
    pub quantity: f64,
}

async fn owned_withdrawal(
    state: &AppState,
    caller: &AuthUser,
    id: &str,
) -> AppResult<Withdrawal> {
    let withdrawal = state
        .bank
        .get_withdrawal_by_id(id)
        .await
        .map_err(repo_error(ENTITY_WITHDRAWAL))?;

    if withdrawal.fields.user_id != caller.user_id {
        return Err(not_found(ENTITY_WITHDRAWAL));
    }
    owned_withdrawal_action(state, caller, &withdrawal.fields.withdrawal_action_id)
        .await
        .map_err(|e| as_missing(e, ENTITY_WITHDRAWAL))?;

    Ok(withdrawal)
}

pub async fn get_withdrawal_by_id(
    state: &AppState,
    caller: &AuthUser,
    id: &str,
) -> AppResult<Withdrawal> {
    owned_withdrawal(state, caller, id).await
}

pub async fn get_withdrawals_by_user_id(
    state: &AppState,
    caller: &AuthUser,
    user_id: &str,
) -> AppResult<Vec<Withdrawal>> {
    ensure_own_user_id(caller, user_id)?;
    state
        .bank
        .get_withdrawals_by_user_id(user_id)
        .await
        .map_err(repo_error(ENTITY_WITHDRAWAL))
}

pub async fn get_withdrawals_by_withdrawal_action_id(
    state: &AppState,
    caller: &AuthUser,
    withdrawal_action_id: &str,
) -> AppResult<Vec<Withdrawal>> {
    owned_withdrawal_action(state, caller, withdrawal_action_id).await?;
    state
        .bank
        .get_withdrawals_by_withdrawal_action_id(withdrawal_action_id)
        .await
        .map_err(repo_error(ENTITY_WITHDRAWAL))
}

pub async fn add_withdrawal(
    state: &AppState,
    caller: &AuthUser,
    input: AddWithdrawalInput,
) -> AppResult<Withdrawal> {
    input.validate()?;

    let action = owned_withdrawal_action(state, caller, &input.withdrawal_action_id).await?;
    let fields = NewWithdrawal {
        user_id: caller.user_id.clone(),
        ..NewWithdrawal::from_action(&action, input.quantity)
    };
    fields.ensure_valid()?;

    let withdrawal = state
        .bank
        .add_withdrawal(fields)
        .await
        .map_err(repo_error(ENTITY_WITHDRAWAL))?;

    tracing::info!(
        withdrawal_id = %withdrawal.id,
        withdrawal_action_id = %action.id,
        user_id = %caller.user_id,
        cost = withdrawal.cost(),
        "Withdrawal recorded"
    );
    Ok(withdrawal)
}

pub async fn edit_withdrawal(
    state: &AppState,
    caller: &AuthUser,
    id: &str,
    edits: WithdrawalEdits,
) -> AppResult<Withdrawal> {
    edits.validate()?;

    let existing = owned_withdrawal(state, caller, id).await?;
    let new_action = match &edits.withdrawal_action_id {
        Some(action_id) if *action_id != existing.fields.withdrawal_action_id => {
            Some(owned_withdrawal_action(state, caller, action_id).await?)
        }
        _ => None,
    };

    let merged = existing.merge_edits(edits.quantity, new_action.as_ref())?;
    let withdrawal = state
        .bank
        .edit_withdrawal(merged)
        .await
        .map_err(repo_error(ENTITY_WITHDRAWAL))?;

    tracing::info!(withdrawal_id = %withdrawal.id, user_id = %caller.user_id, "Withdrawal updated");
    Ok(withdrawal)
}

pub async fn delete_withdrawal(
    state: &AppState,
    caller: &AuthUser,
    id: &str,
) -> AppResult<EntityId> {
    owned_withdrawal(state, caller, id).await?;
    let deleted = state
        .bank
        .delete_withdrawal(id)
        .await
        .map_err(repo_error(ENTITY_WITHDRAWAL))?;

    tracing::info!(withdrawal_id = %deleted, user_id = %caller.user_id, "Withdrawal deleted");
    Ok(deleted)
}
