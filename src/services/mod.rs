pub mod errors;
pub mod relay;
