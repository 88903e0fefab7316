pub mod emitter;
pub mod sparql;
