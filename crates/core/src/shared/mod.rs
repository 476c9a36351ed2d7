pub mod clock;
pub mod constants;
pub mod detection_result;
pub mod encoded_frame;
pub mod frame;
