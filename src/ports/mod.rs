//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the engine and the outside
//! world (time, durable storage). Implementations live in `src/adapters/`.

pub mod clock;
pub mod filesystem;

pub use clock::Clock;
pub use filesystem::FileSystem;
