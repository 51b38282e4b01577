//! Service context bundling the port trait objects.

use crate::adapters::live::{LiveClock, LiveFileSystem};
use crate::ports::clock::Clock;
use crate::ports::filesystem::FileSystem;

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors wire
/// up different adapter implementations.
pub struct ServiceContext {
    /// Clock for feature and task timestamps.
    pub clock: Box<dyn Clock>,
    /// Filesystem holding the state documents.
    pub fs: Box<dyn FileSystem>,
}

impl ServiceContext {
    /// Creates a live context backed by the system clock and real disk.
    #[must_use]
    pub fn live() -> Self {
        Self { clock: Box::new(LiveClock), fs: Box::new(LiveFileSystem) }
    }

    /// Creates a context from explicit adapters.
    #[must_use]
    pub fn new(clock: Box<dyn Clock>, fs: Box<dyn FileSystem>) -> Self {
        Self { clock, fs }
    }
}
