pub mod keyed;
pub mod coverage;
pub mod observed;
pub mod extractor;
