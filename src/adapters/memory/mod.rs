//! In-memory adapters for tests and embedders that do not want disk I/O.

pub mod clock;
pub mod filesystem;

pub use clock::FixedClock;
pub use filesystem::MemoryFileSystem;
