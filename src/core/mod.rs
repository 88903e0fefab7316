pub mod types;
pub mod ident;
pub mod config;
pub mod error;
pub mod stats;
pub mod pipeline;
