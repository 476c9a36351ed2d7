pub mod domain;
pub mod feedback_log;
pub mod infrastructure;
