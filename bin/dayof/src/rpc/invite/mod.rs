pub mod invite_accept;
pub mod invite_send;
pub mod invite_stats;
pub mod invite_validate;
