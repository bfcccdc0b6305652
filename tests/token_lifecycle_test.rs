//! Token lifecycle: issue, verify, expire, invalidate
//!
//! Run with: cargo test --test token_lifecycle_test

mod common;

use common::TestEnvironment;
use linkvault::access::{decode, encode, VerificationResult};
use linkvault::storage::TokenStore;
use pretty_assertions::assert_eq;

const USER: i64 = 424242;

#[test]
fn test_encode_decode_round_trip_for_ascii() {
    for payload in ["token_00ff", "1", "12-40", "~!@#$%^&*()_+ {}|:<>?", ""] {
        assert_eq!(decode(&encode(payload)).unwrap(), payload);
    }
}

#[tokio::test]
async fn test_issue_sets_expiry_and_unverified() {
    let env = TestEnvironment::new();
    let record = env.issuer.issue(USER).await.unwrap();

    assert_eq!(record.token.len(), 32);
    assert!(!record.verified);
    assert_eq!((record.expires_at - record.issued_at).num_seconds(), common::VALIDITY_SECS);

    let stored = env.store.find_token(USER).await.unwrap().unwrap();
    assert_eq!(stored, record);
}

#[tokio::test]
async fn test_reissue_invalidates_previous_token() {
    let env = TestEnvironment::new();
    let first = env.issuer.issue(USER).await.unwrap();
    let second = env.issuer.issue(USER).await.unwrap();
    assert_ne!(first.token, second.token);

    assert_eq!(env.verifier.verify(USER, &first.token).await.unwrap(), VerificationResult::Invalid);
    assert_eq!(env.verifier.verify(USER, &second.token).await.unwrap(), VerificationResult::Valid);
}

#[tokio::test]
async fn test_expiry_boundary() {
    let env = TestEnvironment::new();
    let record = env.issuer.issue(USER).await.unwrap();

    env.advance_secs(common::VALIDITY_SECS - 1);
    assert_eq!(env.verifier.verify(USER, &record.token).await.unwrap(), VerificationResult::Valid);

    env.advance_secs(1);
    assert_eq!(env.verifier.verify(USER, &record.token).await.unwrap(), VerificationResult::Expired);

    env.advance_secs(1);
    assert_eq!(env.verifier.verify(USER, &record.token).await.unwrap(), VerificationResult::Expired);
}

#[tokio::test]
async fn test_expired_regardless_of_presented_string() {
    let env = TestEnvironment::new();
    env.issuer.issue(USER).await.unwrap();
    env.advance_secs(common::VALIDITY_SECS + 1);

    assert_eq!(env.verifier.verify(USER, "nonsense").await.unwrap(), VerificationResult::Expired);
}

#[tokio::test]
async fn test_suffixed_token_is_invalid() {
    let env = TestEnvironment::new();
    let record = env.issuer.issue(USER).await.unwrap();

    let tampered = format!("{}x", record.token);
    assert_eq!(env.verifier.verify(USER, &tampered).await.unwrap(), VerificationResult::Invalid);
    assert_eq!(
        env.verifier.verify(USER, &record.token.to_uppercase()).await.unwrap(),
        VerificationResult::Invalid
    );
}

#[tokio::test]
async fn test_never_issued_is_not_found() {
    let env = TestEnvironment::new();
    assert_eq!(env.verifier.verify(USER, "anything").await.unwrap(), VerificationResult::NotFound);
}

#[tokio::test]
async fn test_valid_marks_verified_without_touching_token() {
    let env = TestEnvironment::new();
    let record = env.issuer.issue(USER).await.unwrap();

    env.verifier.verify(USER, &record.token).await.unwrap();
    env.verifier.verify(USER, &record.token).await.unwrap();

    let stored = env.store.find_token(USER).await.unwrap().unwrap();
    assert!(stored.verified);
    assert_eq!(stored.token, record.token);
    assert_eq!(stored.expires_at, record.expires_at);
}

#[tokio::test]
async fn test_invalid_attempt_does_not_mark_verified() {
    let env = TestEnvironment::new();
    env.issuer.issue(USER).await.unwrap();
    env.verifier.verify(USER, "wrong").await.unwrap();

    assert!(!env.store.find_token(USER).await.unwrap().unwrap().verified);
}

#[tokio::test]
async fn test_hundred_second_scenario() {
    let env = TestEnvironment::with_validity(100);
    let old = env.issuer.issue(USER).await.unwrap();

    env.advance_secs(50);
    assert_eq!(env.verifier.verify(USER, &old.token).await.unwrap(), VerificationResult::Valid);

    env.advance_secs(100);
    assert_eq!(env.verifier.verify(USER, &old.token).await.unwrap(), VerificationResult::Expired);

    let fresh = env.issuer.issue(USER).await.unwrap();
    assert_eq!(env.verifier.verify(USER, &old.token).await.unwrap(), VerificationResult::Invalid);
    assert_eq!(env.verifier.verify(USER, &fresh.token).await.unwrap(), VerificationResult::Valid);
}

#[tokio::test]
async fn test_delete_all_tokens_makes_everything_not_found() {
    let env = TestEnvironment::new();
    let mut issued = Vec::new();
    for user_id in [1, 2, 3] {
        issued.push((user_id, env.issuer.issue(user_id).await.unwrap().token));
    }

    assert_eq!(env.store.delete_all_tokens().await.unwrap(), 3);

    for (user_id, token) in issued {
        assert_eq!(
            env.verifier.verify(user_id, &token).await.unwrap(),
            VerificationResult::NotFound
        );
    }
}

#[tokio::test]
async fn test_tokens_are_per_user() {
    let env = TestEnvironment::new();
    let a = env.issuer.issue(10).await.unwrap();
    let b = env.issuer.issue(20).await.unwrap();

    assert_eq!(env.verifier.verify(10, &b.token).await.unwrap(), VerificationResult::Invalid);
    assert_eq!(env.verifier.verify(20, &a.token).await.unwrap(), VerificationResult::Invalid);
}
