pub mod file_credential_store;
pub mod memory_credential_store;
