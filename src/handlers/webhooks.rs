//! Stripe webhook receiver.
//!
//! Verifies the raw request body against the `stripe-signature` header,
//! then dispatches recognized event types to the subscription store.
//! Unrecognized events are acknowledged without processing; handler
//! failures are reported in the response body but still answer 200, so
//! the provider does not redeliver (kept for compatibility with the
//! provider configuration this service was built against).

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use serde_json::json;

use crate::db::{queries, AppState};
use crate::error::{AppError, Result};
use crate::payments::stripe::{self, StripeCheckoutSession, StripeSubscription, StripeWebhookEvent};

/// Subscription state extracted from a relevant event.
#[derive(Debug)]
pub struct SubscriptionData {
    pub subscription_id: String,
    pub customer_id: String,
}

/// Parsed webhook event, one variant per recognized event type.
///
/// Matching is exhaustive: a new recognized type means a new variant,
/// and the compiler points at every dispatch site that must handle it.
#[derive(Debug)]
pub enum WebhookEvent {
    SubscriptionCreated(SubscriptionData),
    SubscriptionUpdated(SubscriptionData),
    SubscriptionDeleted(SubscriptionData),
    CheckoutCompleted(SubscriptionData),
    /// Event type not relevant to subscription mirroring
    Ignored,
}

pub fn router() -> Router<AppState> {
    // Registered with `any` so the handler owns the method check and can
    // answer 405 with an Allow header itself.
    Router::new().route("/api/webhooks", any(handle_stripe_webhook))
}

/// POST /api/webhooks - Stripe webhook endpoint.
///
/// Takes the raw body as `Bytes` - the exact bytes Stripe signed must
/// reach verification, so no body parsing happens upstream.
pub async fn handle_stripe_webhook(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if method != Method::POST {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, "POST")],
            "Method not allowed",
        )
            .into_response();
    }

    let signature = match headers.get("stripe-signature").and_then(|v| v.to_str().ok()) {
        Some(s) => s.to_string(),
        None => return webhook_error("missing stripe-signature header"),
    };

    match state.stripe.verify_signature(&body, &signature) {
        Ok(true) => {}
        Ok(false) => return webhook_error("signature verification failed"),
        Err(e) => return webhook_error(&error_message(&e)),
    }

    let envelope = match stripe::parse_envelope(&body) {
        Ok(ev) => ev,
        Err(e) => return webhook_error(&error_message(&e)),
    };

    match extract_event(&envelope) {
        Ok(WebhookEvent::Ignored) => {
            tracing::debug!("Ignoring webhook event type: {}", envelope.event_type);
            (StatusCode::OK, Json(json!({ "received": true }))).into_response()
        }
        Ok(event) => match dispatch(&state, event) {
            Ok(subscription_id) => {
                tracing::info!(
                    "Webhook processed: type={}, subscription={}",
                    envelope.event_type,
                    subscription_id
                );
                (StatusCode::OK, Json(json!({ "ok": true }))).into_response()
            }
            Err(e) => handler_failed(&envelope.event_type, &e),
        },
        Err(e) => handler_failed(&envelope.event_type, &e),
    }
}

/// 400 response for anything that fails before the event is trusted.
fn webhook_error(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        format!("Webhook error {}", message),
    )
        .into_response()
}

/// 200 response with an error body for failures after the event is
/// trusted. The success-class status suppresses provider-side retry.
fn handler_failed(event_type: &str, err: &AppError) -> Response {
    tracing::error!("Webhook handler failed for {}: {}", event_type, err);
    (
        StatusCode::OK,
        Json(json!({ "error": "Webhook handler failed." })),
    )
        .into_response()
}

fn error_message(err: &AppError) -> String {
    match err {
        AppError::BadRequest(msg) => msg.clone(),
        other => other.to_string(),
    }
}

/// Classify the envelope into a typed event.
///
/// Extraction failures on a recognized type (missing IDs, wrong shape)
/// are handler failures, not signature failures - the payload was
/// authentic, we just could not act on it.
fn extract_event(envelope: &StripeWebhookEvent) -> Result<WebhookEvent> {
    match envelope.event_type.as_str() {
        "customers.subscription.created" => {
            Ok(WebhookEvent::SubscriptionCreated(subscription_data(envelope)?))
        }
        "customers.subscription.updated" => {
            Ok(WebhookEvent::SubscriptionUpdated(subscription_data(envelope)?))
        }
        "customers.subscription.deleted" => {
            Ok(WebhookEvent::SubscriptionDeleted(subscription_data(envelope)?))
        }
        "checkout.session.completed" => {
            Ok(WebhookEvent::CheckoutCompleted(checkout_data(envelope)?))
        }
        _ => Ok(WebhookEvent::Ignored),
    }
}

fn subscription_data(envelope: &StripeWebhookEvent) -> Result<SubscriptionData> {
    let subscription: StripeSubscription =
        serde_json::from_value(envelope.data.object.clone())?;

    let customer_id = subscription
        .customer
        .as_ref()
        .and_then(stripe::coerce_id)
        .ok_or_else(|| AppError::Internal("subscription event missing customer".into()))?;

    Ok(SubscriptionData {
        subscription_id: subscription.id,
        customer_id,
    })
}

fn checkout_data(envelope: &StripeWebhookEvent) -> Result<SubscriptionData> {
    let session: StripeCheckoutSession = serde_json::from_value(envelope.data.object.clone())?;

    let subscription_id = session
        .subscription
        .as_ref()
        .and_then(stripe::coerce_id)
        .ok_or_else(|| AppError::Internal("checkout session missing subscription".into()))?;
    let customer_id = session
        .customer
        .as_ref()
        .and_then(stripe::coerce_id)
        .ok_or_else(|| AppError::Internal("checkout session missing customer".into()))?;

    Ok(SubscriptionData {
        subscription_id,
        customer_id,
    })
}

/// Exactly one persistence call per relevant event, at-most-once.
/// Returns the subscription ID that was written.
fn dispatch(state: &AppState, event: WebhookEvent) -> Result<String> {
    let conn = state.db.get()?;

    let subscription = match event {
        WebhookEvent::SubscriptionCreated(data) => queries::save_subscription(
            &conn,
            &data.subscription_id,
            &data.customer_id,
            Some(true),
        )?,
        WebhookEvent::SubscriptionUpdated(data) | WebhookEvent::SubscriptionDeleted(data) => {
            queries::save_subscription(
                &conn,
                &data.subscription_id,
                &data.customer_id,
                Some(false),
            )?
        }
        // No explicit flag - the store defaults to active
        WebhookEvent::CheckoutCompleted(data) => {
            queries::save_subscription(&conn, &data.subscription_id, &data.customer_id, None)?
        }
        WebhookEvent::Ignored => {
            return Err(AppError::Internal("unhandled event reached dispatch".into()))
        }
    };

    Ok(subscription.id)
}
