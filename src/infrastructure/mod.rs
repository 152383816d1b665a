pub mod config;
pub mod sparql;
pub mod state;
