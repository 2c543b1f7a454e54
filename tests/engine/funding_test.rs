// Funding Resolver Tests
// Donations into Active campaigns and resolution to Successful

mod common;

use common::*;
use stakefund::campaign::{CampaignId, CampaignStatus, Donation};
use stakefund::engine::{Engine, EngineError, Operation};

// ============================================================================
// DONATIONS
// ============================================================================

#[test]
fn test_donation_updates_collection_and_escrow() {
    let engine = Engine::default();
    let id = active_campaign(&engine, COIN);
    let now = after_challenge(&engine, id);

    assert_eq!(engine.donate(id, alice(), COIN / 5, now).unwrap(), COIN / 5);
    assert_eq!(engine.donate(id, bob(), COIN / 10, now).unwrap(), 3 * COIN / 10);

    let campaign = engine.campaign(id).unwrap();
    assert_eq!(campaign.amount_collected(), 3 * COIN / 10);
    assert_eq!(
        campaign.donors(),
        &[
            Donation { donor: alice(), amount: COIN / 5 },
            Donation { donor: bob(), amount: COIN / 10 },
        ]
    );
    assert_eq!(engine.ledger().escrow, 3 * COIN / 10);
    assert_eq!(engine.custodial_balance(), 3 * COIN / 10);
}

#[test]
fn test_repeat_donor_appends() {
    let engine = Engine::default();
    let id = active_campaign(&engine, COIN);
    let now = after_challenge(&engine, id);

    engine.donate(id, alice(), 1, now).unwrap();
    engine.donate(id, alice(), 2, now).unwrap();

    let campaign = engine.campaign(id).unwrap();
    assert_eq!(campaign.donors().len(), 2);
    assert_eq!(campaign.amount_collected(), 3);
}

#[test]
fn test_donation_past_target_accepted() {
    let engine = Engine::default();
    let id = active_campaign(&engine, 10);
    let now = after_challenge(&engine, id);

    engine.donate(id, alice(), 10, now).unwrap();
    assert_eq!(engine.donate(id, bob(), 5, now).unwrap(), 15);
}

#[test]
fn test_donation_to_pending_rejected() {
    let engine = Engine::default();
    let id = create(&engine);

    assert_eq!(
        engine.donate(id, alice(), COIN / 10, T0),
        Err(EngineError::InvalidState {
            id,
            status: CampaignStatus::Pending,
            operation: Operation::Donate,
        })
    );
    assert_eq!(engine.campaign(id).unwrap().amount_collected(), 0);
}

#[test]
fn test_donation_to_failed_rejected() {
    let engine = Engine::default();
    let id = create(&engine);
    engine.cast_vote(id, alice(), false).unwrap();
    let now = after_challenge(&engine, id);
    engine.resolve_challenge(id, now).unwrap();

    assert!(matches!(
        engine.donate(id, bob(), 1, now),
        Err(EngineError::InvalidState { status: CampaignStatus::Failed, .. })
    ));
}

#[test]
fn test_owner_self_donation_rejected() {
    let engine = Engine::default();
    let id = active_campaign(&engine, COIN);

    assert_eq!(
        engine.donate(id, owner(), COIN / 10, after_challenge(&engine, id)),
        Err(EngineError::OwnerSelfDonation)
    );
}

#[test]
fn test_donation_at_deadline_rejected() {
    let engine = Engine::default();
    let id = active_campaign(&engine, COIN);
    let deadline = deadline(&engine, id);

    assert!(engine.donate(id, alice(), 1, deadline - 1).is_ok());
    assert_eq!(
        engine.donate(id, alice(), 1, deadline),
        Err(EngineError::CampaignExpired { deadline })
    );
    assert_eq!(engine.campaign(id).unwrap().amount_collected(), 1);
}

#[test]
fn test_zero_donation_rejected() {
    let engine = Engine::default();
    let id = active_campaign(&engine, COIN);

    assert_eq!(
        engine.donate(id, alice(), 0, after_challenge(&engine, id)),
        Err(EngineError::InvalidAmount)
    );
}

#[test]
fn test_overflowing_donation_rejected() {
    let engine = Engine::default();
    let id = active_campaign(&engine, COIN);
    let now = after_challenge(&engine, id);
    engine.donate(id, alice(), u64::MAX - 5, now).unwrap();

    assert_eq!(engine.donate(id, bob(), 10, now), Err(EngineError::AmountOverflow));

    let campaign = engine.campaign(id).unwrap();
    assert_eq!(campaign.amount_collected(), u64::MAX - 5);
    assert_eq!(campaign.donors().len(), 1);
    assert_eq!(engine.ledger().escrow, u64::MAX - 5);
}

#[test]
fn test_custodial_overflow_reported_as_amount_overflow() {
    let engine = Engine::default();
    let first = active_campaign(&engine, COIN);
    let second = active_campaign(&engine, COIN);
    let now = after_challenge(&engine, second);
    engine.donate(first, alice(), u64::MAX - 5, now).unwrap();
    let before = engine.snapshot();

    assert_eq!(engine.donate(second, bob(), 10, now), Err(EngineError::AmountOverflow));
    assert_eq!(
        engine.create_campaign(owner(), proposal(), now),
        Err(EngineError::AmountOverflow)
    );

    assert_eq!(engine.snapshot(), before);
    assert_eq!(engine.campaign_count(), 2);
    engine.audit().unwrap();
}

#[test]
fn test_donate_unknown_campaign() {
    let engine = Engine::default();
    let missing = CampaignId::new(9);

    assert_eq!(engine.donate(missing, alice(), 1, T0), Err(EngineError::NotFound(missing)));
}

// ============================================================================
// FUNDING RESOLUTION
// ============================================================================

#[test]
fn test_resolve_when_target_met() {
    let engine = Engine::default();
    let id = active_campaign(&engine, COIN);
    let now = after_challenge(&engine, id);
    engine.donate(id, alice(), COIN, now).unwrap();

    let resolution = engine.resolve_funding(id, now).unwrap();
    assert!(resolution.target_reached);
    assert_eq!(resolution.collected, COIN);
    assert_eq!(engine.campaign(id).unwrap().status(), CampaignStatus::Successful);
}

#[test]
fn test_resolve_before_target_and_deadline_rejected() {
    let engine = Engine::default();
    let id = active_campaign(&engine, COIN);
    let now = after_challenge(&engine, id);
    engine.donate(id, alice(), COIN - 1, now).unwrap();

    assert_eq!(
        engine.resolve_funding(id, now),
        Err(EngineError::NotYetResolvable {
            collected: COIN - 1,
            target: COIN,
            deadline: deadline(&engine, id),
        })
    );
    assert_eq!(engine.campaign(id).unwrap().status(), CampaignStatus::Active);
}

#[test]
fn test_resolve_at_deadline_short_of_target() {
    let engine = Engine::default();
    let id = active_campaign(&engine, COIN);
    engine.donate(id, alice(), COIN / 4, after_challenge(&engine, id)).unwrap();

    let resolution = engine.resolve_funding(id, deadline(&engine, id)).unwrap();
    assert!(!resolution.target_reached);
    assert_eq!(resolution.collected, COIN / 4);
    assert_eq!(engine.campaign(id).unwrap().status(), CampaignStatus::Successful);
}

#[test]
fn test_resolve_at_deadline_with_nothing_collected() {
    let engine = Engine::default();
    let id = active_campaign(&engine, COIN);

    let resolution = engine.resolve_funding(id, deadline(&engine, id)).unwrap();
    assert_eq!(resolution.collected, 0);
    assert_eq!(engine.campaign(id).unwrap().status(), CampaignStatus::Successful);
}

#[test]
fn test_resolve_funding_requires_active() {
    let engine = Engine::default();
    let id = create(&engine);

    assert!(matches!(
        engine.resolve_funding(id, deadline(&engine, id)),
        Err(EngineError::InvalidState { status: CampaignStatus::Pending, operation: Operation::ResolveFunding, .. })
    ));
}

#[test]
fn test_resolve_funding_only_once() {
    let engine = Engine::default();
    let id = active_campaign(&engine, COIN);
    let end = deadline(&engine, id);
    engine.resolve_funding(id, end).unwrap();

    assert!(matches!(
        engine.resolve_funding(id, end),
        Err(EngineError::InvalidState { status: CampaignStatus::Successful, .. })
    ));
}

#[test]
fn test_donation_after_success_rejected() {
    let engine = Engine::default();
    let id = active_campaign(&engine, 10);
    let now = after_challenge(&engine, id);
    engine.donate(id, alice(), 10, now).unwrap();
    engine.resolve_funding(id, now).unwrap();

    assert!(matches!(
        engine.donate(id, bob(), 1, now),
        Err(EngineError::InvalidState { status: CampaignStatus::Successful, .. })
    ));
    assert_eq!(engine.campaign(id).unwrap().amount_collected(), 10);
}

#[test]
fn test_deadline_inside_challenge_window() {
    let engine = Engine::default();
    let mut params = proposal();
    params.deadline = T0 + DAY / 2;
    let id = engine.create_campaign(owner(), params, T0).unwrap();
    let now = after_challenge(&engine, id);
    engine.resolve_challenge(id, now).unwrap();

    assert!(matches!(
        engine.donate(id, alice(), 1, now),
        Err(EngineError::CampaignExpired { .. })
    ));
    assert!(engine.resolve_funding(id, now).is_ok());
}
