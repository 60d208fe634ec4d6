//! Webhook signature verification tests

mod common;

use common::*;

fn create_test_verifier() -> StripeVerifier {
    StripeVerifier::new(TEST_WEBHOOK_SECRET)
}

/// Get current Unix timestamp as a string (for webhook signature tests)
fn current_timestamp() -> String {
    chrono::Utc::now().timestamp().to_string()
}

/// Get an old timestamp (for testing timestamp rejection)
fn old_timestamp() -> String {
    // 10 minutes ago - beyond the 5-minute tolerance
    (chrono::Utc::now().timestamp() - 600).to_string()
}

#[test]
fn test_valid_signature() {
    let verifier = create_test_verifier();
    let payload = b"{\"type\":\"checkout.session.completed\"}";
    let timestamp = current_timestamp();
    let signature = compute_stripe_signature(payload, TEST_WEBHOOK_SECRET, &timestamp);
    let signature_header = format!("t={},v1={}", timestamp, signature);

    let result = verifier
        .verify_signature(payload, &signature_header)
        .expect("Verification should not error");

    assert!(result, "Valid signature should be accepted");
}

#[test]
fn test_invalid_signature() {
    let verifier = create_test_verifier();
    let payload = b"{\"type\":\"checkout.session.completed\"}";
    let timestamp = current_timestamp();
    // Use wrong secret to generate invalid signature
    let signature = compute_stripe_signature(payload, "wrong_secret", &timestamp);
    let signature_header = format!("t={},v1={}", timestamp, signature);

    let result = verifier
        .verify_signature(payload, &signature_header)
        .expect("Verification should not error");

    assert!(!result, "Invalid signature should be rejected");
}

#[test]
fn test_modified_payload() {
    let verifier = create_test_verifier();
    let original_payload = b"{\"type\":\"checkout.session.completed\"}";
    let modified_payload = b"{\"type\":\"checkout.session.completed\",\"hacked\":true}";
    let timestamp = current_timestamp();
    // Sign the original payload
    let signature = compute_stripe_signature(original_payload, TEST_WEBHOOK_SECRET, &timestamp);
    let signature_header = format!("t={},v1={}", timestamp, signature);

    // Verify with modified payload
    let result = verifier
        .verify_signature(modified_payload, &signature_header)
        .expect("Verification should not error");

    assert!(!result, "Modified payload should be rejected");
}

#[test]
fn test_old_timestamp_rejected() {
    let verifier = create_test_verifier();
    let payload = b"{\"type\":\"checkout.session.completed\"}";
    let timestamp = old_timestamp();
    // Valid signature but timestamp too old
    let signature = compute_stripe_signature(payload, TEST_WEBHOOK_SECRET, &timestamp);
    let signature_header = format!("t={},v1={}", timestamp, signature);

    let result = verifier
        .verify_signature(payload, &signature_header)
        .expect("Verification should not error");

    assert!(
        !result,
        "Old timestamp should be rejected (replay attack prevention)"
    );
}

#[test]
fn test_future_timestamp_rejected() {
    let verifier = create_test_verifier();
    let payload = b"{\"type\":\"checkout.session.completed\"}";
    // 2 minutes in the future - beyond the 60-second skew tolerance
    let timestamp = (chrono::Utc::now().timestamp() + 120).to_string();
    let signature = compute_stripe_signature(payload, TEST_WEBHOOK_SECRET, &timestamp);
    let signature_header = format!("t={},v1={}", timestamp, signature);

    let result = verifier
        .verify_signature(payload, &signature_header)
        .expect("Verification should not error");

    assert!(!result, "Future timestamp should be rejected");
}

#[test]
fn test_missing_timestamp() {
    let verifier = create_test_verifier();
    let payload = b"{\"type\":\"checkout.session.completed\"}";
    // Signature without timestamp
    let signature_header = "v1=somesignature";

    let result = verifier.verify_signature(payload, signature_header);

    assert!(result.is_err(), "Missing timestamp should error");
}

#[test]
fn test_missing_signature() {
    let verifier = create_test_verifier();
    let payload = b"{\"type\":\"checkout.session.completed\"}";
    // Header without v1 signature
    let signature_header = "t=1234567890";

    let result = verifier.verify_signature(payload, signature_header);

    assert!(result.is_err(), "Missing signature should error");
}

#[test]
fn test_malformed_header() {
    let verifier = create_test_verifier();
    let payload = b"{\"type\":\"checkout.session.completed\"}";

    let result = verifier.verify_signature(payload, "garbage");

    assert!(result.is_err(), "Malformed header should error");
}

#[test]
fn test_empty_signature_header() {
    let verifier = create_test_verifier();
    let payload = b"{\"type\":\"checkout.session.completed\"}";

    let result = verifier.verify_signature(payload, "");

    assert!(result.is_err(), "Empty header should error");
}

#[test]
fn test_non_numeric_timestamp() {
    let verifier = create_test_verifier();
    let payload = b"{\"type\":\"checkout.session.completed\"}";

    let result = verifier.verify_signature(payload, "t=notanumber,v1=abc");

    assert!(result.is_err(), "Non-numeric timestamp should error");
}

#[test]
fn test_unconfigured_secret_errors() {
    // Absence of the signing secret must fail verification, never pass
    let verifier = StripeVerifier::new("");
    let payload = b"{\"type\":\"checkout.session.completed\"}";
    let timestamp = current_timestamp();
    let signature = compute_stripe_signature(payload, "", &timestamp);
    let signature_header = format!("t={},v1={}", timestamp, signature);

    let result = verifier.verify_signature(payload, &signature_header);

    assert!(result.is_err(), "Unconfigured secret should error");
}
