pub mod clause;
pub mod miner;
