//! Domain layer: entities, store capabilities and rate-limit model.
//!
//! Nothing in here depends on axum, sqlx or redis. The traits in
//! [`repositories`] and [`rate_limit::CounterStore`] describe the external
//! stores; implementations live in [`crate::infrastructure`].
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Durable store trait definitions
//! - [`rate_limit`] - Fixed-window policy, key layout and counting store trait
//! - [`click_event`] / [`click_worker`] - Asynchronous daily click counting

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod rate_limit;
pub mod repositories;
