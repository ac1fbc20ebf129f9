pub mod email_events;
