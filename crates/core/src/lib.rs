pub mod capture;
pub mod detection;
pub mod feedback;
pub mod overlay;
pub mod session;
pub mod shared;
