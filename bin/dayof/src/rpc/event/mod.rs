pub mod event_create;
pub mod event_join;
