pub mod capture_logger;
pub mod capture_loop;
pub mod domain;
pub mod infrastructure;
