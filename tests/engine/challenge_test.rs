// Challenge Resolver Tests
// Pending -> Active / Failed once the voting window has closed

mod common;

use common::*;
use stakefund::campaign::{CampaignId, CampaignStatus, Tally};
use stakefund::engine::{ChallengeOutcome, Engine, EngineError, Operation};
use stakefund::ledger::PayoutReason;

// ============================================================================
// TIMING
// ============================================================================

#[test]
fn test_resolve_before_window_end_rejected() {
    let engine = Engine::default();
    let id = create(&engine);
    let end = engine.campaign(id).unwrap().challenge_end();

    for now in [T0, end - 1, end] {
        assert_eq!(
            engine.resolve_challenge(id, now),
            Err(EngineError::ChallengeNotEnded { challenge_end: end })
        );
    }
    assert_eq!(engine.campaign(id).unwrap().status(), CampaignStatus::Pending);
    assert_eq!(engine.campaign(id).unwrap().stake(), MIN_STAKE);
}

#[test]
fn test_resolve_strictly_after_window_end() {
    let engine = Engine::default();
    let id = create(&engine);
    let end = engine.campaign(id).unwrap().challenge_end();

    assert!(engine.resolve_challenge(id, end + 1).is_ok());
}

// ============================================================================
// APPROVAL
// ============================================================================

#[test]
fn test_approval_activates_and_refunds() {
    let engine = Engine::default();
    let id = create(&engine);
    engine.cast_vote(id, alice(), true).unwrap();
    engine.cast_vote(id, bob(), false).unwrap();
    engine.cast_vote(id, carol(), true).unwrap();

    let outcome = engine.resolve_challenge(id, after_challenge(&engine, id)).unwrap();

    match outcome {
        ChallengeOutcome::Activated { tally, refund } => {
            assert_eq!(tally, Tally { yes: 2, no: 1 });
            assert_eq!(refund.to, owner());
            assert_eq!(refund.amount, MIN_STAKE);
            assert_eq!(refund.reason, PayoutReason::StakeRefund);
        }
        other => panic!("expected activation, got {:?}", other),
    }

    let campaign = engine.campaign(id).unwrap();
    assert_eq!(campaign.status(), CampaignStatus::Active);
    assert_eq!(campaign.stake(), 0);
    assert_eq!(engine.custodial_balance(), 0);
    assert_eq!(engine.ledger().paid_to(&owner()), MIN_STAKE);
}

#[test]
fn test_tie_with_votes_activates() {
    let engine = Engine::default();
    let id = create(&engine);
    engine.cast_vote(id, alice(), true).unwrap();
    engine.cast_vote(id, bob(), false).unwrap();

    let outcome = engine.resolve_challenge(id, after_challenge(&engine, id)).unwrap();
    assert_eq!(outcome.status(), CampaignStatus::Active);
}

#[test]
fn test_no_votes_activates() {
    let engine = Engine::default();
    let id = create(&engine);

    let outcome = engine.resolve_challenge(id, after_challenge(&engine, id)).unwrap();
    assert_eq!(outcome.status(), CampaignStatus::Active);
    assert_eq!(outcome.tally(), Tally::default());
}

// ============================================================================
// REJECTION
// ============================================================================

#[test]
fn test_rejection_fails_and_forfeits() {
    let engine = Engine::default();
    let id = create(&engine);
    engine.cast_vote(id, alice(), false).unwrap();
    let custodial_before = engine.custodial_balance();

    let outcome = engine.resolve_challenge(id, after_challenge(&engine, id)).unwrap();
    assert_eq!(
        outcome,
        ChallengeOutcome::Rejected {
            tally: Tally { yes: 0, no: 1 },
            forfeited: MIN_STAKE
        }
    );

    let campaign = engine.campaign(id).unwrap();
    assert_eq!(campaign.status(), CampaignStatus::Failed);
    assert_eq!(campaign.stake(), 0);
    assert_eq!(engine.treasury_balance(), MIN_STAKE);
    assert_eq!(engine.custodial_balance(), custodial_before);
    assert_eq!(engine.ledger().paid_to(&owner()), 0);
}

#[test]
fn test_treasury_accumulates_across_campaigns() {
    let engine = Engine::default();
    for _ in 0..3 {
        let id = create(&engine);
        engine.cast_vote(id, alice(), false).unwrap();
        engine.resolve_challenge(id, after_challenge(&engine, id)).unwrap();
    }

    assert_eq!(engine.treasury_balance(), 3 * MIN_STAKE);
}

// ============================================================================
// AT-MOST-ONCE
// ============================================================================

#[test]
fn test_second_resolution_rejected() {
    let engine = Engine::default();
    let id = create(&engine);
    let now = after_challenge(&engine, id);
    engine.resolve_challenge(id, now).unwrap();

    assert_eq!(
        engine.resolve_challenge(id, now + DAY),
        Err(EngineError::InvalidState {
            id,
            status: CampaignStatus::Active,
            operation: Operation::ResolveChallenge,
        })
    );
    assert_eq!(engine.ledger().paid_to(&owner()), MIN_STAKE);
}

#[test]
fn test_second_resolution_of_failed_rejected() {
    let engine = Engine::default();
    let id = create(&engine);
    engine.cast_vote(id, alice(), false).unwrap();
    let now = after_challenge(&engine, id);
    engine.resolve_challenge(id, now).unwrap();

    assert!(matches!(
        engine.resolve_challenge(id, now),
        Err(EngineError::InvalidState { status: CampaignStatus::Failed, .. })
    ));
    assert_eq!(engine.treasury_balance(), MIN_STAKE);
}

#[test]
fn test_resolve_unknown_campaign() {
    let engine = Engine::default();
    let missing = CampaignId::new(0);

    assert_eq!(
        engine.resolve_challenge(missing, T0),
        Err(EngineError::NotFound(missing))
    );
}

// ============================================================================
// ACTIVATE ALIAS
// ============================================================================

#[test]
fn test_activate_is_resolve_challenge() {
    let engine = Engine::default();
    let approved = create(&engine);
    let rejected = create(&engine);
    engine.cast_vote(approved, alice(), true).unwrap();
    engine.cast_vote(rejected, alice(), false).unwrap();
    let now = after_challenge(&engine, approved);

    assert_eq!(
        engine.activate_campaign(approved, now).unwrap().status(),
        CampaignStatus::Active
    );
    assert_eq!(
        engine.activate_campaign(rejected, now).unwrap().status(),
        CampaignStatus::Failed
    );
    assert!(matches!(
        engine.resolve_challenge(approved, now),
        Err(EngineError::InvalidState { .. })
    ));
}
