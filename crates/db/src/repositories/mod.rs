//! Storage contracts.
//!
//! Resolvers only ever see these traits (as `Arc<dyn UserRepo>` /
//! `Arc<dyn BankRepo>`), so a backend can be swapped without touching the
//! ledger logic. Every lookup either returns a fully-typed entity or fails with
//! [`RepoError::DoesNotExist`]; no backend returns `Option`.

use action_bank_core::bank::{
    Deposit, DepositAction, Exchange, NewDeposit, NewDepositAction, NewExchange, NewWithdrawal,
    NewWithdrawalAction, Withdrawal, WithdrawalAction,
};
use action_bank_core::types::EntityId;
use action_bank_core::user::{NewUser, User};
use async_trait::async_trait;

use crate::error::RepoError;

/// User storage.
///
/// `add_user` and `edit_user` enforce username and email uniqueness and fail
/// with [`RepoError::UsernameExists`] or [`RepoError::EmailExists`].
#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn get_user_by_id(&self, id: &str) -> Result<User, RepoError>;

    async fn get_user_by_username(&self, username: &str) -> Result<User, RepoError>;

    /// One page of users, oldest first. `page` is 1-based.
    async fn get_users(&self, page_size: usize, page: usize) -> Result<Vec<User>, RepoError>;

    async fn add_user(&self, user: NewUser) -> Result<User, RepoError>;

    /// Replace a user record wholesale.
    async fn edit_user(&self, user: User) -> Result<User, RepoError>;

    /// Store a new password hash. Any outstanding reset token is cleared.
    async fn update_password(&self, id: &str, password_hash: String) -> Result<(), RepoError>;

    /// Store the digest of a freshly issued reset token and stamp its date.
    async fn make_password_reset_token(&self, id: &str, token_hash: String)
        -> Result<(), RepoError>;

    async fn delete_user(&self, id: &str) -> Result<(), RepoError>;

    async fn is_no_users(&self) -> Result<bool, RepoError>;
}

/// Bank ledger storage.
///
/// Exchanges are returned with their ledger (actions and transactions)
/// attached. Deletes remove only the named record; cascading is the caller's
/// job, using the bulk `delete_*_by_*` operations.
#[async_trait]
pub trait BankRepo: Send + Sync {
    // -- Exchanges --

    async fn get_exchange_by_id(&self, id: &str) -> Result<Exchange, RepoError>;
    async fn get_exchanges_by_user_id(&self, user_id: &str) -> Result<Vec<Exchange>, RepoError>;
    async fn add_exchange(&self, exchange: NewExchange) -> Result<Exchange, RepoError>;
    async fn edit_exchange(&self, exchange: Exchange) -> Result<Exchange, RepoError>;
    async fn delete_exchange(&self, id: &str) -> Result<EntityId, RepoError>;

    // -- Deposit actions --

    async fn get_deposit_action_by_id(&self, id: &str) -> Result<DepositAction, RepoError>;
    async fn get_deposit_actions_by_user_id(
        &self,
        user_id: &str,
    ) -> Result<Vec<DepositAction>, RepoError>;
    async fn get_deposit_actions_by_exchange_id(
        &self,
        exchange_id: &str,
    ) -> Result<Vec<DepositAction>, RepoError>;
    async fn add_deposit_action(&self, action: NewDepositAction)
        -> Result<DepositAction, RepoError>;
    /// Replace a deposit action. If its exchange changed, the deposits
    /// recorded against it move to the new exchange too.
    async fn edit_deposit_action(&self, action: DepositAction) -> Result<DepositAction, RepoError>;
    async fn delete_deposit_action(&self, id: &str) -> Result<EntityId, RepoError>;
    async fn delete_deposit_actions_by_exchange_id(
        &self,
        exchange_id: &str,
    ) -> Result<usize, RepoError>;

    // -- Withdrawal actions --

    async fn get_withdrawal_action_by_id(&self, id: &str) -> Result<WithdrawalAction, RepoError>;
    async fn get_withdrawal_actions_by_user_id(
        &self,
        user_id: &str,
    ) -> Result<Vec<WithdrawalAction>, RepoError>;
    async fn get_withdrawal_actions_by_exchange_id(
        &self,
        exchange_id: &str,
    ) -> Result<Vec<WithdrawalAction>, RepoError>;
    async fn add_withdrawal_action(
        &self,
        action: NewWithdrawalAction,
    ) -> Result<WithdrawalAction, RepoError>;
    /// Replace a withdrawal action, moving its withdrawals along with it.
    async fn edit_withdrawal_action(
        &self,
        action: WithdrawalAction,
    ) -> Result<WithdrawalAction, RepoError>;
    async fn delete_withdrawal_action(&self, id: &str) -> Result<EntityId, RepoError>;
    async fn delete_withdrawal_actions_by_exchange_id(
        &self,
        exchange_id: &str,
    ) -> Result<usize, RepoError>;

    // -- Deposits --

    async fn get_deposit_by_id(&self, id: &str) -> Result<Deposit, RepoError>;
    async fn get_deposits_by_user_id(&self, user_id: &str) -> Result<Vec<Deposit>, RepoError>;
    async fn get_deposits_by_deposit_action_id(
        &self,
        action_id: &str,
    ) -> Result<Vec<Deposit>, RepoError>;
    async fn add_deposit(&self, deposit: NewDeposit) -> Result<Deposit, RepoError>;
    async fn edit_deposit(&self, deposit: Deposit) -> Result<Deposit, RepoError>;
    async fn delete_deposit(&self, id: &str) -> Result<EntityId, RepoError>;
    async fn delete_deposits_by_deposit_action_id(
        &self,
        action_id: &str,
    ) -> Result<usize, RepoError>;
    async fn delete_deposits_by_exchange_id(&self, exchange_id: &str)
        -> Result<usize, RepoError>;

    // -- Withdrawals --

    async fn get_withdrawal_by_id(&self, id: &str) -> Result<Withdrawal, RepoError>;
    async fn get_withdrawals_by_user_id(&self, user_id: &str)
        -> Result<Vec<Withdrawal>, RepoError>;
    async fn get_withdrawals_by_withdrawal_action_id(
        &self,
        action_id: &str,
    ) -> Result<Vec<Withdrawal>, RepoError>;
    async fn add_withdrawal(&self, withdrawal: NewWithdrawal) -> Result<Withdrawal, RepoError>;
    async fn edit_withdrawal(&self, withdrawal: Withdrawal) -> Result<Withdrawal, RepoError>;
    async fn delete_withdrawal(&self, id: &str) -> Result<EntityId, RepoError>;
    async fn delete_withdrawals_by_withdrawal_action_id(
        &self,
        action_id: &str,
    ) -> Result<usize, RepoError>;
    async fn delete_withdrawals_by_exchange_id(
        &self,
        exchange_id: &str,
    ) -> Result<usize, RepoError>;
}
