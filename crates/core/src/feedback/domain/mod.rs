pub mod feedback_entry;
pub mod feedback_store;
