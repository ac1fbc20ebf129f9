//! Shared functionality for the RPC system and background tasks, split out for clarity.

pub mod invite_cleanup;
pub mod invite_counters;
pub mod invite_emails;
pub mod rate_limit;
