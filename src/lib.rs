//! # Giveaway Bot
//!
//! A Telegram bot that lets channel administrators run timed giveaway
//! campaigns.
//!
//! ## Features
//! - Multi-step drafting of a campaign's start and end posts
//! - Publication to several channels at a scheduled Moscow time
//! - Participant registration through a join button, for channel members only
//! - Drafts kept in SQLite (or memory) between steps

/// Backend REST client and its data model
pub mod api;
/// Commands, keyboards, texts and update handlers
pub mod bot;
/// Configuration management and environment variables
pub mod config;
/// Per-admin drafting flows
pub mod conversation;
/// Scratch storage for drafts in progress
pub mod drafts;
/// Error types shared across the crate
pub mod error;
/// Messaging-platform operations
pub mod platform;
/// Scheduler, dispatcher, membership and health services
pub mod services;
/// Utility functions for datetime, validation, and formatting
pub mod utils;
