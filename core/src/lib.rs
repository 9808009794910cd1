//! WealthPulse core — investment-behavior analytics.
//!
//! Turns a caller-owned history of simulation records into trends,
//! suggestions, alerts, a behavioral profile and a gamified score,
//! composed by `engine::DashboardAssembler` into one snapshot.

pub mod alert_engine;
pub mod behavior_profiler;
pub mod clock;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod projector;
pub mod record;
pub mod rng;
pub mod rule;
pub mod scenario;
pub mod score_engine;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod suggestion_generator;
pub mod trend_detector;
pub mod types;
