//! Live adapters that perform real I/O.

pub mod clock;
pub mod filesystem;

pub use clock::LiveClock;
pub use filesystem::LiveFileSystem;
