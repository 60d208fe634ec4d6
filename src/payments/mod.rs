pub mod stripe;

pub use stripe::{StripeCheckoutSession, StripeSubscription, StripeVerifier, StripeWebhookEvent};
