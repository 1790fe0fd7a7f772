//! Job repository implementations.

mod memory;
mod postgres;

#[cfg(test)]
pub(crate) use memory::fixtures;
pub use memory::{MemoryJobRepository, Seed};
pub use postgres::PgJobRepository;
