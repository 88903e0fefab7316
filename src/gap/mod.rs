pub mod position;
pub mod resolver;
