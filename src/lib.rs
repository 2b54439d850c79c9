pub mod cli;
pub mod config;
pub mod error;
pub mod platform;
pub mod prune;
pub mod types;

#[cfg(test)]
pub mod testing;
