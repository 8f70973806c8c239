pub mod entries;
pub mod error;
pub mod metadata;
pub mod report;
pub mod ruleset;
pub mod sync;
mod tree;
pub mod utils;

#[cfg(test)]
mod testing;
