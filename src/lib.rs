//! VoiceUp dashboard client.
//!
//! Citizens file road and infrastructure reports; staff move them through a
//! fixed status pipeline (Seen → Verified → In Progress → On Hold → Completed).
//! This crate holds the status progression engine, a thin client for the
//! VoiceUp REST API, and the terminal front end built on both.

pub mod achievements;
pub mod api;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod priority;
pub mod progression;
pub mod telemetry;
pub mod ui;

pub use error::VoiceUpError;
