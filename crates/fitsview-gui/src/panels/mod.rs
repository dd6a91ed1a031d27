pub mod status;
pub mod viewport;
