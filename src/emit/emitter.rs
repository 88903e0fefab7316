use crate::core::error::Result;
use crate::core::types::Batch;

/// Downstream consumer turning a batch into one runnable query.
///
/// `ordinal` numbers the batches of one category key, starting at 1.
pub trait QueryEmitter {
    fn emit(&mut self, batch: &Batch, ordinal: usize) -> Result<()>;

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Keeps emitted batches in memory
#[derive(Debug, Default)]
pub struct CollectingEmitter {
    pub batches: Vec<(usize, Batch)>,
}

impl CollectingEmitter {
    pub fn new() -> Self {
        CollectingEmitter::default()
    }
}

impl QueryEmitter for CollectingEmitter {
    fn emit(&mut self, batch: &Batch, ordinal: usize) -> Result<()> {
        self.batches.push((ordinal, batch.clone()));
        Ok(())
    }
}
