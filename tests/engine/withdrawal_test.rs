// Withdrawal Handler Tests
// Paying a Successful campaign's collection to its owner exactly once

mod common;

use common::*;
use stakefund::campaign::{CampaignId, CampaignStatus};
use stakefund::engine::{Engine, EngineError, Operation};
use stakefund::ledger::PayoutReason;

fn successful_campaign(engine: &Engine, raised: u64) -> CampaignId {
    let id = active_campaign(engine, COIN);
    if raised > 0 {
        engine.donate(id, alice(), raised, after_challenge(engine, id)).unwrap();
    }
    engine.resolve_funding(id, deadline(engine, id)).unwrap();
    id
}

#[test]
fn test_withdraw_pays_owner() {
    let engine = Engine::default();
    let id = successful_campaign(&engine, COIN / 2);
    let paid_before = engine.ledger().paid_to(&owner());

    let payout = engine.withdraw(id).unwrap();
    assert_eq!(payout.to, owner());
    assert_eq!(payout.amount, COIN / 2);
    assert_eq!(payout.reason, PayoutReason::Withdrawal);

    assert_eq!(engine.ledger().paid_to(&owner()), paid_before + COIN / 2);
    assert_eq!(engine.ledger().escrow, 0);
    assert_eq!(engine.custodial_balance(), 0);
}

#[test]
fn test_withdraw_keeps_historical_total() {
    let engine = Engine::default();
    let id = successful_campaign(&engine, 300);
    engine.withdraw(id).unwrap();

    let campaign = engine.campaign(id).unwrap();
    assert_eq!(campaign.status(), CampaignStatus::Successful);
    assert_eq!(campaign.amount_collected(), 300);
    assert_eq!(campaign.withdrawn_amount(), 300);
    assert!(campaign.is_withdrawn());
    assert_eq!(campaign.escrowed(), 0);
}

#[test]
fn test_second_withdraw_rejected() {
    let engine = Engine::default();
    let id = successful_campaign(&engine, 300);
    engine.withdraw(id).unwrap();

    assert_eq!(engine.withdraw(id), Err(EngineError::NothingToWithdraw));
    assert_eq!(engine.ledger().paid_to(&owner()), MIN_STAKE + 300);
}

#[test]
fn test_withdraw_nothing_collected() {
    let engine = Engine::default();
    let id = successful_campaign(&engine, 0);

    assert_eq!(engine.withdraw(id), Err(EngineError::NothingToWithdraw));
}

#[test]
fn test_withdraw_requires_successful() {
    let engine = Engine::default();
    let id = active_campaign(&engine, COIN);
    engine.donate(id, alice(), 5, after_challenge(&engine, id)).unwrap();

    assert_eq!(
        engine.withdraw(id),
        Err(EngineError::InvalidState {
            id,
            status: CampaignStatus::Active,
            operation: Operation::Withdraw,
        })
    );
    assert_eq!(engine.ledger().escrow, 5);
}

#[test]
fn test_withdraw_unknown_campaign() {
    let engine = Engine::default();
    let missing = CampaignId::new(1);

    assert_eq!(engine.withdraw(missing), Err(EngineError::NotFound(missing)));
}

#[test]
fn test_withdraw_only_touches_own_escrow() {
    let engine = Engine::default();
    let first = successful_campaign(&engine, 100);
    let second = active_campaign(&engine, COIN);
    engine.donate(second, bob(), 40, after_challenge(&engine, second)).unwrap();

    engine.withdraw(first).unwrap();

    assert_eq!(engine.ledger().escrow, 40);
    engine.audit().unwrap();
}
