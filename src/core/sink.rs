//! Sink trait for rendered log output

use super::error::Result;

/// An ordered, append-only destination for rendered log lines
///
/// A sink is only ever mutated by its owner (a logger or its error mirror), which
/// serializes access, so implementations don't need interior locking.
pub trait Sink: Send {
    fn append(&mut self, bytes: &[u8]) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}

/// Sink that drops everything; backs the no-op logger
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardSink;

impl Sink for DiscardSink {
    fn append(&mut self, _bytes: &[u8]) -> Result<()> {
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "discard"
    }
}
