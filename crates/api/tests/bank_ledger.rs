//! Resolver-level tests for exchanges, actions and transactions: ownership
//! isolation, cascades, rate freezing and balances.

mod common;

use action_bank_api::error::AppError;
use action_bank_api::middleware::auth::AuthUser;
use action_bank_api::resolvers::deposit::{self, AddDepositInput};
use action_bank_api::resolvers::deposit_action::{self, AddDepositActionInput};
use action_bank_api::resolvers::exchange::{self, AddExchangeInput, ExchangeResponse};
use action_bank_api::resolvers::withdrawal::{self, AddWithdrawalInput};
use action_bank_api::resolvers::withdrawal_action::{self, AddWithdrawalActionInput};
use action_bank_api::state::AppState;
use action_bank_core::bank::{
    DepositAction, DepositActionEdits, DepositEdits, ExchangeEdits, WithdrawalAction,
    WithdrawalActionEdits, WithdrawalEdits,
};
use action_bank_core::error::CoreError;
use action_bank_core::roles::USER_TYPE_BASIC;
use assert_matches::assert_matches;
use common::{caller, seed_user, test_state};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn two_users(state: &AppState) -> (AuthUser, AuthUser) {
    let alice = seed_user(state, "alice", USER_TYPE_BASIC).await;
    let bob = seed_user(state, "bob", USER_TYPE_BASIC).await;
    (caller(&alice), caller(&bob))
}

async fn new_exchange(state: &AppState, user: &AuthUser, name: &str) -> ExchangeResponse {
    exchange::add_exchange(
        state,
        user,
        AddExchangeInput {
            name: name.into(),
            description: String::new(),
        },
    )
    .await
    .expect("exchange creation should succeed")
}

async fn new_deposit_action(
    state: &AppState,
    user: &AuthUser,
    exchange_id: &str,
    uom_quantity: f64,
    deposit_quantity: f64,
) -> DepositAction {
    deposit_action::add_deposit_action(
        state,
        user,
        AddDepositActionInput {
            exchange_id: exchange_id.into(),
            name: "Ride a Bike".into(),
            uom: "Minutes".into(),
            uom_quantity,
            deposit_quantity,
            enabled: true,
            sorted_location: 0,
        },
    )
    .await
    .expect("deposit action creation should succeed")
}

async fn new_withdrawal_action(
    state: &AppState,
    user: &AuthUser,
    exchange_id: &str,
    uom_quantity: f64,
    withdrawal_quantity: f64,
) -> WithdrawalAction {
    withdrawal_action::add_withdrawal_action(
        state,
        user,
        AddWithdrawalActionInput {
            exchange_id: exchange_id.into(),
            name: "Watch TV".into(),
            uom: "Minutes".into(),
            uom_quantity,
            withdrawal_quantity,
            enabled: true,
            sorted_location: 0,
        },
    )
    .await
    .expect("withdrawal action creation should succeed")
}

async fn deposit_of(state: &AppState, user: &AuthUser, action_id: &str, quantity: f64) -> String {
    deposit::add_deposit(
        state,
        user,
        AddDepositInput {
            deposit_action_id: action_id.into(),
            quantity,
        },
    )
    .await
    .expect("deposit should succeed")
    .id
}

async fn withdrawal_of(
    state: &AppState,
    user: &AuthUser,
    action_id: &str,
    quantity: f64,
) -> String {
    withdrawal::add_withdrawal(
        state,
        user,
        AddWithdrawalInput {
            withdrawal_action_id: action_id.into(),
            quantity,
        },
    )
    .await
    .expect("withdrawal should succeed")
    .id
}

fn is_not_found(err: &AppError, expected: &str) -> bool {
    matches!(err, AppError::Core(CoreError::NotFound { entity }) if *entity == expected)
}

// ---------------------------------------------------------------------------
// Ownership isolation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn foreign_exchange_looks_missing() {
    let (_dir, state) = test_state().await;
    let (alice, bob) = two_users(&state).await;
    let ex = new_exchange(&state, &alice, "Chores").await;

    let foreign = exchange::get_exchange_by_id(&state, &bob, &ex.id)
        .await
        .unwrap_err();
    let missing = exchange::get_exchange_by_id(&state, &bob, "no-such-id")
        .await
        .unwrap_err();

    assert!(is_not_found(&foreign, "Exchange"));
    assert!(is_not_found(&missing, "Exchange"));
    assert_eq!(foreign.to_string(), missing.to_string());

    let edit = exchange::edit_exchange(
        &state,
        &bob,
        &ex.id,
        ExchangeEdits {
            name: Some("Mine now".into()),
            description: None,
        },
    )
    .await
    .unwrap_err();
    assert!(is_not_found(&edit, "Exchange"));

    let delete = exchange::delete_exchange(&state, &bob, &ex.id)
        .await
        .unwrap_err();
    assert!(is_not_found(&delete, "Exchange"));

    // Still intact for its owner.
    let own = exchange::get_exchange_by_id(&state, &alice, &ex.id)
        .await
        .unwrap();
    assert_eq!(own.name, "Chores");
}

#[tokio::test]
async fn foreign_actions_and_transactions_look_missing() {
    let (_dir, state) = test_state().await;
    let (alice, bob) = two_users(&state).await;
    let ex = new_exchange(&state, &alice, "Chores").await;
    let da = new_deposit_action(&state, &alice, &ex.id, 1.0, 1.0).await;
    let wa = new_withdrawal_action(&state, &alice, &ex.id, 1.0, 1.0).await;
    let d = deposit_of(&state, &alice, &da.id, 1.0).await;
    let w = withdrawal_of(&state, &alice, &wa.id, 1.0).await;

    let err = deposit_action::get_deposit_action_by_id(&state, &bob, &da.id)
        .await
        .unwrap_err();
    assert!(is_not_found(&err, "Deposit Action"));

    let err = withdrawal_action::delete_withdrawal_action(&state, &bob, &wa.id)
        .await
        .unwrap_err();
    assert!(is_not_found(&err, "Withdrawal Action"));

    let err = deposit::edit_deposit(
        &state,
        &bob,
        &d,
        DepositEdits {
            quantity: Some(100.0),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(is_not_found(&err, "Deposit"));

    let err = withdrawal::get_withdrawal_by_id(&state, &bob, &w)
        .await
        .unwrap_err();
    assert!(is_not_found(&err, "Withdrawal"));
}

#[tokio::test]
async fn cannot_attach_to_a_foreign_exchange_or_action() {
    let (_dir, state) = test_state().await;
    let (alice, bob) = two_users(&state).await;
    let ex = new_exchange(&state, &alice, "Chores").await;
    let da = new_deposit_action(&state, &alice, &ex.id, 1.0, 1.0).await;

    let err = deposit_action::add_deposit_action(
        &state,
        &bob,
        AddDepositActionInput {
            exchange_id: ex.id.clone(),
            name: "Sneaky".into(),
            uom: "Minutes".into(),
            uom_quantity: 1.0,
            deposit_quantity: 100.0,
            enabled: true,
            sorted_location: 0,
        },
    )
    .await
    .unwrap_err();
    assert!(is_not_found(&err, "Exchange"));

    let err = deposit::add_deposit(
        &state,
        &bob,
        AddDepositInput {
            deposit_action_id: da.id.clone(),
            quantity: 5.0,
        },
    )
    .await
    .unwrap_err();
    assert!(is_not_found(&err, "Deposit Action"));
}

#[tokio::test]
async fn listing_by_another_owner_is_rejected() {
    let (_dir, state) = test_state().await;
    let (alice, bob) = two_users(&state).await;
    new_exchange(&state, &alice, "Chores").await;

    assert_matches!(
        exchange::get_exchanges_by_user_id(&state, &bob, &alice.user_id).await,
        Err(AppError::Core(CoreError::Forbidden(_)))
    );
    assert_matches!(
        deposit::get_deposits_by_user_id(&state, &bob, &alice.user_id).await,
        Err(AppError::Core(CoreError::Forbidden(_)))
    );

    let own = exchange::get_exchanges_by_user_id(&state, &alice, &alice.user_id)
        .await
        .unwrap();
    assert_eq!(own.len(), 1);
    assert!(exchange::get_exchanges_by_user_id(&state, &bob, &bob.user_id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn moving_an_action_reverifies_the_new_exchange() {
    let (_dir, state) = test_state().await;
    let (alice, bob) = two_users(&state).await;
    let ex = new_exchange(&state, &alice, "Chores").await;
    let other = new_exchange(&state, &alice, "Exercise").await;
    let bobs = new_exchange(&state, &bob, "Bob's").await;
    let da = new_deposit_action(&state, &alice, &ex.id, 1.0, 1.0).await;

    let err = deposit_action::edit_deposit_action(
        &state,
        &alice,
        &da.id,
        DepositActionEdits {
            exchange_id: Some(bobs.id.clone()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(is_not_found(&err, "Exchange"));

    let moved = deposit_action::edit_deposit_action(
        &state,
        &alice,
        &da.id,
        DepositActionEdits {
            exchange_id: Some(other.id.clone()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(moved.fields.exchange_id, other.id);
    assert_eq!(moved.fields.name, "Ride a Bike");
}

#[tokio::test]
async fn transactions_follow_their_action_to_a_new_exchange() {
    let (_dir, state) = test_state().await;
    let (alice, _) = two_users(&state).await;
    let old = new_exchange(&state, &alice, "Chores").await;
    let new = new_exchange(&state, &alice, "Exercise").await;
    let da = new_deposit_action(&state, &alice, &old.id, 1.0, 1.0).await;
    let wa = new_withdrawal_action(&state, &alice, &old.id, 1.0, 1.0).await;
    let deposit_id = deposit_of(&state, &alice, &da.id, 10.0).await;
    let withdrawal_id = withdrawal_of(&state, &alice, &wa.id, 4.0).await;

    deposit_action::edit_deposit_action(
        &state,
        &alice,
        &da.id,
        DepositActionEdits {
            exchange_id: Some(new.id.clone()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    withdrawal_action::edit_withdrawal_action(
        &state,
        &alice,
        &wa.id,
        WithdrawalActionEdits {
            exchange_id: Some(new.id.clone()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let left = exchange::get_exchange_by_id(&state, &alice, &old.id)
        .await
        .unwrap();
    assert!(left.deposits.is_empty());
    assert!(left.withdrawals.is_empty());
    assert_eq!(left.total_currency, 0.0);

    let arrived = exchange::get_exchange_by_id(&state, &alice, &new.id)
        .await
        .unwrap();
    assert_eq!(arrived.deposit_actions.len(), 1);
    assert_eq!(arrived.deposits.len(), 1);
    assert_eq!(arrived.withdrawals.len(), 1);
    assert_eq!(arrived.total_deposits, 10.0);
    assert_eq!(arrived.total_withdrawals, 4.0);
    assert_eq!(arrived.total_currency, 6.0);

    exchange::delete_exchange(&state, &alice, &old.id)
        .await
        .unwrap();

    let deposit = deposit::get_deposit_by_id(&state, &alice, &deposit_id)
        .await
        .unwrap();
    assert_eq!(deposit.fields.exchange_id, new.id);
    withdrawal::get_withdrawal_by_id(&state, &alice, &withdrawal_id)
        .await
        .unwrap();
    let arrived = exchange::get_exchange_by_id(&state, &alice, &new.id)
        .await
        .unwrap();
    assert_eq!(arrived.total_currency, 6.0);
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn zero_uom_quantity_is_rejected() {
    let (_dir, state) = test_state().await;
    let (alice, _) = two_users(&state).await;
    let ex = new_exchange(&state, &alice, "Chores").await;

    let result = deposit_action::add_deposit_action(
        &state,
        &alice,
        AddDepositActionInput {
            exchange_id: ex.id.clone(),
            name: "Broken".into(),
            uom: "Minutes".into(),
            uom_quantity: 0.0,
            deposit_quantity: 1.0,
            enabled: true,
            sorted_location: 0,
        },
    )
    .await;
    assert_matches!(result, Err(AppError::Core(CoreError::Validation(_))));

    let da = new_deposit_action(&state, &alice, &ex.id, 1.0, 1.0).await;
    let result = deposit_action::edit_deposit_action(
        &state,
        &alice,
        &da.id,
        DepositActionEdits {
            uom_quantity: Some(0.0),
            ..Default::default()
        },
    )
    .await;
    assert_matches!(result, Err(AppError::Core(CoreError::Validation(_))));
}

#[tokio::test]
async fn negative_quantity_is_rejected() {
    let (_dir, state) = test_state().await;
    let (alice, _) = two_users(&state).await;
    let ex = new_exchange(&state, &alice, "Chores").await;
    let wa = new_withdrawal_action(&state, &alice, &ex.id, 1.0, 1.0).await;

    let result = withdrawal::add_withdrawal(
        &state,
        &alice,
        AddWithdrawalInput {
            withdrawal_action_id: wa.id.clone(),
            quantity: -3.0,
        },
    )
    .await;
    assert_matches!(result, Err(AppError::Core(CoreError::Validation(_))));
}

// ---------------------------------------------------------------------------
// Rate freezing and balances
// ---------------------------------------------------------------------------

#[tokio::test]
async fn recorded_deposits_keep_their_rate() {
    let (_dir, state) = test_state().await;
    let (alice, _) = two_users(&state).await;
    let ex = new_exchange(&state, &alice, "Chores").await;
    let da = new_deposit_action(&state, &alice, &ex.id, 3.0, 1.0).await;
    let d = deposit_of(&state, &alice, &da.id, 9.0).await;

    let recorded = deposit::get_deposit_by_id(&state, &alice, &d).await.unwrap();
    assert_eq!(recorded.deposit(), 3.0);

    deposit_action::edit_deposit_action(
        &state,
        &alice,
        &da.id,
        DepositActionEdits {
            deposit_quantity: Some(2.0),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let recorded = deposit::get_deposit_by_id(&state, &alice, &d).await.unwrap();
    assert_eq!(recorded.deposit(), 3.0);

    let ex = exchange::get_exchange_by_id(&state, &alice, &ex.id)
        .await
        .unwrap();
    assert_eq!(ex.total_deposits, 3.0);

    // A new deposit uses the new rate.
    deposit_of(&state, &alice, &da.id, 9.0).await;
    let ex = exchange::get_exchange_by_id(&state, &alice, &ex.id)
        .await
        .unwrap();
    assert_eq!(ex.total_deposits, 9.0);
}

#[tokio::test]
async fn moving_a_deposit_takes_the_new_rate() {
    let (_dir, state) = test_state().await;
    let (alice, _) = two_users(&state).await;
    let ex = new_exchange(&state, &alice, "Chores").await;
    let slow = new_deposit_action(&state, &alice, &ex.id, 3.0, 1.0).await;
    let fast = new_deposit_action(&state, &alice, &ex.id, 1.0, 2.0).await;
    let d = deposit_of(&state, &alice, &slow.id, 9.0).await;

    let quantity_only = deposit::edit_deposit(
        &state,
        &alice,
        &d,
        DepositEdits {
            quantity: Some(6.0),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(quantity_only.deposit(), 2.0);

    let moved = deposit::edit_deposit(
        &state,
        &alice,
        &d,
        DepositEdits {
            deposit_action_id: Some(fast.id.clone()),
            quantity: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(moved.fields.deposit_action_id, fast.id);
    assert_eq!(moved.deposit(), 12.0);
}

#[tokio::test]
async fn balance_reflects_every_transaction() {
    let (_dir, state) = test_state().await;
    let (alice, _) = two_users(&state).await;
    let ex = new_exchange(&state, &alice, "Chores").await;
    let da = new_deposit_action(&state, &alice, &ex.id, 1.0, 1.0).await;
    let wa = new_withdrawal_action(&state, &alice, &ex.id, 2.0, 1.0).await;

    deposit_of(&state, &alice, &da.id, 10.0).await;
    deposit_of(&state, &alice, &da.id, 20.0).await;
    withdrawal_of(&state, &alice, &wa.id, 24.0).await;

    let balance = exchange::get_exchange_by_id(&state, &alice, &ex.id)
        .await
        .unwrap();
    assert_eq!(balance.total_deposits, 30.0);
    assert_eq!(balance.total_withdrawals, 12.0);
    assert_eq!(balance.total_currency, 18.0);

    let w = withdrawal_of(&state, &alice, &wa.id, 10.0).await;
    let balance = exchange::get_exchange_by_id(&state, &alice, &ex.id)
        .await
        .unwrap();
    assert_eq!(balance.total_currency, 13.0);

    withdrawal::edit_withdrawal(
        &state,
        &alice,
        &w,
        WithdrawalEdits {
            quantity: Some(0.0),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let balance = exchange::get_exchange_by_id(&state, &alice, &ex.id)
        .await
        .unwrap();
    assert_eq!(balance.total_currency, 18.0);
}

#[tokio::test]
async fn exchange_lists_actions_in_sorted_order() {
    let (_dir, state) = test_state().await;
    let (alice, _) = two_users(&state).await;
    let ex = new_exchange(&state, &alice, "Chores").await;

    for (name, position) in [("Third", 3), ("First", 1), ("Second", 2)] {
        deposit_action::add_deposit_action(
            &state,
            &alice,
            AddDepositActionInput {
                exchange_id: ex.id.clone(),
                name: name.into(),
                uom: "Times".into(),
                uom_quantity: 1.0,
                deposit_quantity: 1.0,
                enabled: true,
                sorted_location: position,
            },
        )
        .await
        .unwrap();
    }

    let names: Vec<String> = exchange::get_exchange_by_id(&state, &alice, &ex.id)
        .await
        .unwrap()
        .deposit_actions
        .into_iter()
        .map(|a| a.fields.name)
        .collect();
    assert_eq!(names, vec!["First", "Second", "Third"]);

    let by_exchange = deposit_action::get_deposit_actions_by_exchange_id(&state, &alice, &ex.id)
        .await
        .unwrap();
    assert_eq!(by_exchange[0].fields.name, "First");
}

// ---------------------------------------------------------------------------
// Cascades
// ---------------------------------------------------------------------------

#[tokio::test]
async fn deleting_an_action_removes_only_its_transactions() {
    let (_dir, state) = test_state().await;
    let (alice, _) = two_users(&state).await;
    let ex = new_exchange(&state, &alice, "Chores").await;
    let doomed = new_deposit_action(&state, &alice, &ex.id, 1.0, 1.0).await;
    let kept = new_deposit_action(&state, &alice, &ex.id, 1.0, 1.0).await;

    for _ in 0..3 {
        deposit_of(&state, &alice, &doomed.id, 1.0).await;
    }
    let survivor = deposit_of(&state, &alice, &kept.id, 1.0).await;

    let deleted = deposit_action::delete_deposit_action(&state, &alice, &doomed.id)
        .await
        .unwrap();
    assert_eq!(deleted, doomed.id);

    let remaining = deposit::get_deposits_by_user_id(&state, &alice, &alice.user_id)
        .await
        .unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, survivor);

    let err = deposit_action::get_deposit_action_by_id(&state, &alice, &doomed.id)
        .await
        .unwrap_err();
    assert!(is_not_found(&err, "Deposit Action"));
}

#[tokio::test]
async fn deleting_an_exchange_removes_everything_under_it() {
    let (_dir, state) = test_state().await;
    let (alice, _) = two_users(&state).await;
    let ex = new_exchange(&state, &alice, "Chores").await;
    let other = new_exchange(&state, &alice, "Exercise").await;

    let da = new_deposit_action(&state, &alice, &ex.id, 1.0, 1.0).await;
    let wa = new_withdrawal_action(&state, &alice, &ex.id, 1.0, 1.0).await;
    deposit_of(&state, &alice, &da.id, 1.0).await;
    deposit_of(&state, &alice, &da.id, 2.0).await;
    withdrawal_of(&state, &alice, &wa.id, 1.0).await;

    let other_da = new_deposit_action(&state, &alice, &other.id, 1.0, 1.0).await;
    deposit_of(&state, &alice, &other_da.id, 5.0).await;

    exchange::delete_exchange(&state, &alice, &ex.id)
        .await
        .unwrap();

    let actions = deposit_action::get_deposit_actions_by_user_id(&state, &alice, &alice.user_id)
        .await
        .unwrap();
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].fields.exchange_id, other.id);

    assert!(
        withdrawal_action::get_withdrawal_actions_by_user_id(&state, &alice, &alice.user_id)
            .await
            .unwrap()
            .is_empty()
    );
    assert!(
        withdrawal::get_withdrawals_by_user_id(&state, &alice, &alice.user_id)
            .await
            .unwrap()
            .is_empty()
    );

    let deposits = deposit::get_deposits_by_user_id(&state, &alice, &alice.user_id)
        .await
        .unwrap();
    assert_eq!(deposits.len(), 1);
    assert_eq!(deposits[0].fields.exchange_id, other.id);

    let other = exchange::get_exchange_by_id(&state, &alice, &other.id)
        .await
        .unwrap();
    assert_eq!(other.total_currency, 5.0);
}
