//! Bank ledger backend: one JSON file per entity collection.

use std::path::Path;

use action_bank_core::bank::{
    Deposit, DepositAction, Exchange, ExchangeLedger, NewDeposit, NewDepositAction, NewExchange,
    NewWithdrawal, NewWithdrawalAction, Withdrawal, WithdrawalAction, ENTITY_DEPOSIT,
    ENTITY_DEPOSIT_ACTION, ENTITY_EXCHANGE, ENTITY_WITHDRAWAL, ENTITY_WITHDRAWAL_ACTION,
};
use action_bank_core::types::{new_id, now, EntityId};
use async_trait::async_trait;

use super::collection::Collection;
use crate::error::RepoError;
use crate::repositories::BankRepo;

pub const EXCHANGES_FILE: &str = "exchanges.json";
pub const DEPOSIT_ACTIONS_FILE: &str = "depositActions.json";
pub const WITHDRAWAL_ACTIONS_FILE: &str = "withdrawalActions.json";
pub const DEPOSITS_FILE: &str = "deposits.json";
pub const WITHDRAWALS_FILE: &str = "withdrawals.json";

pub struct FileBankRepo {
    exchanges: Collection<Exchange>,
    deposit_actions: Collection<DepositAction>,
    withdrawal_actions: Collection<WithdrawalAction>,
    deposits: Collection<Deposit>,
    withdrawals: Collection<Withdrawal>,
}

impl FileBankRepo {
    pub async fn open(dir: &Path) -> Result<Self, RepoError> {
        Ok(Self {
            exchanges: Collection::load(dir, EXCHANGES_FILE, ENTITY_EXCHANGE, Exchange::from_json)
                .await?,
            deposit_actions: Collection::load(
                dir,
                DEPOSIT_ACTIONS_FILE,
                ENTITY_DEPOSIT_ACTION,
                DepositAction::from_json,
            )
            .await?,
            withdrawal_actions: Collection::load(
                dir,
                WITHDRAWAL_ACTIONS_FILE,
                ENTITY_WITHDRAWAL_ACTION,
                WithdrawalAction::from_json,
            )
            .await?,
            deposits: Collection::load(dir, DEPOSITS_FILE, ENTITY_DEPOSIT, Deposit::from_json)
                .await?,
            withdrawals: Collection::load(
                dir,
                WITHDRAWALS_FILE,
                ENTITY_WITHDRAWAL,
                Withdrawal::from_json,
            )
            .await?,
        })
    }

    /// Assemble the ledger of one exchange from the four child collections.
    async fn ledger_for(&self, exchange_id: &str) -> ExchangeLedger {
        ExchangeLedger::new(
            self.deposit_actions
                .filter(|a| a.fields.exchange_id == exchange_id)
                .await,
            self.withdrawal_actions
                .filter(|a| a.fields.exchange_id == exchange_id)
                .await,
            self.deposits
                .filter(|d| d.fields.exchange_id == exchange_id)
                .await,
            self.withdrawals
                .filter(|w| w.fields.exchange_id == exchange_id)
                .await,
        )
    }

    async fn with_ledger(&self, exchange: Exchange) -> Exchange {
        let ledger = self.ledger_for(&exchange.id).await;
        exchange.with_ledger(ledger)
    }
}

#[async_trait]
impl BankRepo for FileBankRepo {
    // -- Exchanges --

    async fn get_exchange_by_id(&self, id: &str) -> Result<Exchange, RepoError> {
        let exchange = self.exchanges.get(id).await?;
        Ok(self.with_ledger(exchange).await)
    }

    async fn get_exchanges_by_user_id(&self, user_id: &str) -> Result<Vec<Exchange>, RepoError> {
        let exchanges = self.exchanges.filter(|e| e.fields.user_id == user_id).await;
        let mut out = Vec::with_capacity(exchanges.len());
        for exchange in exchanges {
            out.push(self.with_ledger(exchange).await);
        }
        Ok(out)
    }

    async fn add_exchange(&self, exchange: NewExchange) -> Result<Exchange, RepoError> {
        self.exchanges
            .insert(Exchange::from_new(exchange, new_id()))
            .await
    }

    async fn edit_exchange(&self, exchange: Exchange) -> Result<Exchange, RepoError> {
        let saved = self.exchanges.replace(exchange).await?;
        Ok(self.with_ledger(saved).await)
    }

    async fn delete_exchange(&self, id: &str) -> Result<EntityId, RepoError> {
        self.exchanges.remove(id).await
    }

    // -- Deposit actions --

    async fn get_deposit_action_by_id(&self, id: &str) -> Result<DepositAction, RepoError> {
        self.deposit_actions.get(id).await
    }

    async fn get_deposit_actions_by_user_id(
        &self,
        user_id: &str,
    ) -> Result<Vec<DepositAction>, RepoError> {
        Ok(self
            .deposit_actions
            .filter(|a| a.fields.user_id == user_id)
            .await)
    }

    async fn get_deposit_actions_by_exchange_id(
        &self,
        exchange_id: &str,
    ) -> Result<Vec<DepositAction>, RepoError> {
        let mut actions = self
            .deposit_actions
            .filter(|a| a.fields.exchange_id == exchange_id)
            .await;
        actions.sort_by_key(|a| a.fields.sorted_location);
        Ok(actions)
    }

    async fn add_deposit_action(
        &self,
        action: NewDepositAction,
    ) -> Result<DepositAction, RepoError> {
        self.deposit_actions
            .insert(DepositAction::from_new(action, new_id(), now()))
            .await
    }

    async fn edit_deposit_action(&self, action: DepositAction) -> Result<DepositAction, RepoError> {
        let previous = self.deposit_actions.get(&action.id).await?;
        let saved = self.deposit_actions.replace(action).await?;

        let exchange_id = &saved.fields.exchange_id;
        if previous.fields.exchange_id != *exchange_id {
            let moved = self
                .deposits
                .modify_where(
                    |d| d.fields.deposit_action_id == saved.id,
                    |d| d.fields.exchange_id.clone_from(exchange_id),
                )
                .await?;
            tracing::debug!(
                deposit_action_id = %saved.id,
                exchange_id = %exchange_id,
                moved,
                "Deposits moved with their action"
            );
        }
        Ok(saved)
    }

    async fn delete_deposit_action(&self, id: &str) -> Result<EntityId, RepoError> {
        self.deposit_actions.remove(id).await
    }

    async fn delete_deposit_actions_by_exchange_id(
        &self,
        exchange_id: &str,
    ) -> Result<usize, RepoError> {
        self.deposit_actions
            .remove_where(|a| a.fields.exchange_id == exchange_id)
            .await
    }

    // -- Withdrawal actions --

    async fn get_withdrawal_action_by_id(&self, id: &str) -> Result<WithdrawalAction, RepoError> {
        self.withdrawal_actions.get(id).await
    }

    async fn get_withdrawal_actions_by_user_id(
        &self,
        user_id: &str,
    ) -> Result<Vec<WithdrawalAction>, RepoError> {
        Ok(self
            .withdrawal_actions
            .filter(|a| a.fields.user_id == user_id)
            .await)
    }

    async fn get_withdrawal_actions_by_exchange_id(
        &self,
        exchange_id: &str,
    ) -> Result<Vec<WithdrawalAction>, RepoError> {
        let mut actions = self
            .withdrawal_actions
            .filter(|a| a.fields.exchange_id == exchange_id)
            .await;
        actions.sort_by_key(|a| a.fields.sorted_location);
        Ok(actions)
    }

    async fn add_withdrawal_action(
        &self,
        action: NewWithdrawalAction,
    ) -> Result<WithdrawalAction, RepoError> {
        self.withdrawal_actions
            .insert(WithdrawalAction::from_new(action, new_id(), now()))
            .await
    }

    async fn edit_withdrawal_action(
        &self,
        action: WithdrawalAction,
    ) -> Result<WithdrawalAction, RepoError> {
        let previous = self.withdrawal_actions.get(&action.id).await?;
        let saved = self.withdrawal_actions.replace(action).await?;

        if previous.fields.exchange_id != saved.fields.exchange_id {
            let exchange_id = &saved.fields.exchange_id;
            let moved = self
                .withdrawals
                .modify_where(
                    |w| w.fields.withdrawal_action_id == saved.id,
                    |w| w.fields.exchange_id.clone_from(exchange_id),
                )
                .await?;
            tracing::debug!(
                withdrawal_action_id = %saved.id,
                exchange_id = %exchange_id,
                moved,
                "Withdrawals moved with their action"
            );
        }
        Ok(saved)
    }

    async fn delete_withdrawal_action(&self, id: &str) -> Result<EntityId, RepoError> {
        self.withdrawal_actions.remove(id).await
    }

    async fn delete_withdrawal_actions_by_exchange_id(
        &self,
        exchange_id: &str,
    ) -> Result<usize, RepoError> {
        self.withdrawal_actions
            .remove_where(|a| a.fields.exchange_id == exchange_id)
            .await
    }

    // -- Deposits --

    async fn get_deposit_by_id(&self, id: &str) -> Result<Deposit, RepoError> {
        self.deposits.get(id).await
    }

    async fn get_deposits_by_user_id(&self, user_id: &str) -> Result<Vec<Deposit>, RepoError> {
        Ok(self.deposits.filter(|d| d.fields.user_id == user_id).await)
    }

    async fn get_deposits_by_deposit_action_id(
        &self,
        action_id: &str,
    ) -> Result<Vec<Deposit>, RepoError> {
        Ok(self
            .deposits
            .filter(|d| d.fields.deposit_action_id == action_id)
            .await)
    }

    async fn add_deposit(&self, deposit: NewDeposit) -> Result<Deposit, RepoError> {
        self.deposits
            .insert(Deposit::from_new(deposit, new_id(), now()))
            .await
    }

    async fn edit_deposit(&self, deposit: Deposit) -> Result<Deposit, RepoError> {
        self.deposits.replace(deposit).await
    }

    async fn delete_deposit(&self, id: &str) -> Result<EntityId, RepoError> {
        self.deposits.remove(id).await
    }

    async fn delete_deposits_by_deposit_action_id(
        &self,
        action_id: &str,
    ) -> Result<usize, RepoError> {
        self.deposits
            .remove_where(|d| d.fields.deposit_action_id == action_id)
            .await
    }

    async fn delete_deposits_by_exchange_id(
        &self,
        exchange_id: &str,
    ) -> Result<usize, RepoError> {
        self.deposits
            .remove_where(|d| d.fields.exchange_id == exchange_id)
            .await
    }

    // -- Withdrawals --

    async fn get_withdrawal_by_id(&self, id: &str) -> Result<Withdrawal, RepoError> {
        self.withdrawals.get(id).await
    }

    async fn get_withdrawals_by_user_id(
        &self,
        user_id: &str,
    ) -> Result<Vec<Withdrawal>, RepoError> {
        Ok(self.withdrawals.filter(|w| w.fields.user_id == user_id).await)
    }

    async fn get_withdrawals_by_withdrawal_action_id(
        &self,
        action_id: &str,
    ) -> Result<Vec<Withdrawal>, RepoError> {
        Ok(self
            .withdrawals
            .filter(|w| w.fields.withdrawal_action_id == action_id)
            .await)
    }

    async fn add_withdrawal(&self, withdrawal: NewWithdrawal) -> Result<Withdrawal, RepoError> {
        self.withdrawals
            .insert(Withdrawal::from_new(withdrawal, new_id(), now()))
            .await
    }

    async fn edit_withdrawal(&self, withdrawal: Withdrawal) -> Result<Withdrawal, RepoError> {
        self.withdrawals.replace(withdrawal).await
    }

    async fn delete_withdrawal(&self, id: &str) -> Result<EntityId, RepoError> {
        self.withdrawals.remove(id).await
    }

    async fn delete_withdrawals_by_withdrawal_action_id(
        &self,
        action_id: &str,
    ) -> Result<usize, RepoError> {
        self.withdrawals
            .remove_where(|w| w.fields.withdrawal_action_id == action_id)
            .await
    }

    async fn delete_withdrawals_by_exchange_id(
        &self,
        exchange_id: &str,
    ) -> Result<usize, RepoError> {
        self.withdrawals
            .remove_where(|w| w.fields.exchange_id == exchange_id)
            .await
    }
}
