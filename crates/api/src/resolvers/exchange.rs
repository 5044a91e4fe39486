//! Exchange operations.

use action_bank_core::bank::{
    Deposit, DepositAction, Exchange, ExchangeEdits, NewExchange, Withdrawal, WithdrawalAction,
    ENTITY_EXCHANGE,
};
use action_bank_core::types::EntityId;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{ensure_own_user_id, not_found, repo_error};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Arguments for [`add_exchange`]. The owner is always the caller.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddExchangeInput {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// An exchange with its ledger and balances.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeResponse {
    pub id: EntityId,
    pub user_id: EntityId,
    pub name: String,
    pub description: String,
    pub deposit_actions: Vec<DepositAction>,
    pub withdrawal_actions: Vec<WithdrawalAction>,
    pub deposits: Vec<Deposit>,
    pub withdrawals: Vec<Withdrawal>,
    pub total_deposits: f64,
    pub total_withdrawals: f64,
    pub total_currency: f64,
}

impl From<&Exchange> for ExchangeResponse {
    fn from(exchange: &Exchange) -> Self {
        let ledger = &exchange.ledger;
        Self {
            id: exchange.id.clone(),
            user_id: exchange.fields.user_id.clone(),
            name: exchange.fields.name.clone(),
            description: exchange.fields.description.clone(),
            deposit_actions: ledger.deposit_actions().to_vec(),
            withdrawal_actions: ledger.withdrawal_actions().to_vec(),
            deposits: ledger.deposits().to_vec(),
            withdrawals: ledger.withdrawals().to_vec(),
            total_deposits: ledger.total_deposits(),
            total_withdrawals: ledger.total_withdrawals(),
            total_currency: ledger.total_currency(),
        }
    }
}

// ---------------------------------------------------------------------------
// Ownership
// ---------------------------------------------------------------------------

/// Fetch an exchange the caller owns. Someone else's exchange is reported as
/// missing.
pub(crate) async fn owned_exchange(
    state: &AppState,
    caller: &AuthUser,
    id: &str,
) -> AppResult<Exchange> {
    let exchange = state
        .bank
        .get_exchange_by_id(id)
        .await
        .map_err(repo_error(ENTITY_EXCHANGE))?;

    if exchange.fields.user_id != caller.user_id {
        return Err(not_found(ENTITY_EXCHANGE));
    }
    Ok(exchange)
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

pub async fn get_exchange_by_id(
    state: &AppState,
    caller: &AuthUser,
    id: &str,
) -> AppResult<ExchangeResponse> {
    let exchange = owned_exchange(state, caller, id).await?;
    Ok(ExchangeResponse::from(&exchange))
}

pub async fn get_exchanges_by_user_id(
    state: &AppState,
    caller: &AuthUser,
    user_id: &str,
) -> AppResult<Vec<ExchangeResponse>> {
    ensure_own_user_id(caller, user_id)?;

    let exchanges = state
        .bank
        .get_exchanges_by_user_id(user_id)
        .await
        .map_err(repo_error(ENTITY_EXCHANGE))?;

    tracing::debug!(user_id, count = exchanges.len(), "Listed exchanges");
    Ok(exchanges.iter().map(ExchangeResponse::from).collect())
}

pub async fn add_exchange(
    state: &AppState,
    caller: &AuthUser,
    input: AddExchangeInput,
) -> AppResult<ExchangeResponse> {
    input.validate()?;

    let exchange = state
        .bank
        .add_exchange(NewExchange {
            user_id: caller.user_id.clone(),
            name: input.name,
            description: input.description,
        })
        .await
        .map_err(repo_error(ENTITY_EXCHANGE))?;

    tracing::info!(exchange_id = %exchange.id, user_id = %caller.user_id, "Exchange created");
    Ok(ExchangeResponse::from(&exchange))
}

pub async fn edit_exchange(
    state: &AppState,
    caller: &AuthUser,
    id: &str,
    edits: ExchangeEdits,
) -> AppResult<ExchangeResponse> {
    edits.validate()?;

    let existing = owned_exchange(state, caller, id).await?;
    let exchange = state
        .bank
        .edit_exchange(existing.merge_edits(&edits))
        .await
        .map_err(repo_error(ENTITY_EXCHANGE))?;

    tracing::info!(exchange_id = %exchange.id, user_id = %caller.user_id, "Exchange updated");
    Ok(ExchangeResponse::from(&exchange))
}

/// Delete an exchange together with every action and transaction under it.
pub async fn delete_exchange(
    state: &AppState,
    caller: &AuthUser,
    id: &str,
) -> AppResult<EntityId> {
    let exchange = owned_exchange(state, caller, id).await?;
    let bank = &state.bank;
    let fail = || repo_error(ENTITY_EXCHANGE);

    let mut deposits = 0;
    for action in exchange.ledger.deposit_actions() {
        deposits += bank
            .delete_deposits_by_deposit_action_id(&action.id)
            .await
            .map_err(fail())?;
    }
    let mut withdrawals = 0;
    for action in exchange.ledger.withdrawal_actions() {
        withdrawals += bank
            .delete_withdrawals_by_withdrawal_action_id(&action.id)
            .await
            .map_err(fail())?;
    }

    // Transactions whose action was already gone.
    deposits += bank
        .delete_deposits_by_exchange_id(id)
        .await
        .map_err(fail())?;
    withdrawals += bank
        .delete_withdrawals_by_exchange_id(id)
        .await
        .map_err(fail())?;
    let deposit_actions = bank
        .delete_deposit_actions_by_exchange_id(id)
        .await
        .map_err(fail())?;
    let withdrawal_actions = bank
        .delete_withdrawal_actions_by_exchange_id(id)
        .await
        .map_err(fail())?;

    let deleted = bank.delete_exchange(id).await.map_err(fail())?;

    tracing::info!(
        exchange_id = %deleted,
        user_id = %caller.user_id,
        deposit_actions,
        withdrawal_actions,
        deposits,
        withdrawals,
        "Exchange deleted"
    );
    Ok(deleted)
}
