pub mod credential_gate;
pub mod domain;
pub mod engine_session;
pub mod infrastructure;
