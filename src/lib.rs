//! Newsstand - subscription-gated newsletter backend
//!
//! This library provides the core functionality for the Newsstand site:
//! the marketing landing page, the Stripe webhook receiver, and the
//! subscription store it mirrors provider events into.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod payments;
