mod config;
mod operation;

pub use config::Config;
pub use operation::{Method, Operation, RollbackSpec};

#[cfg(test)]
mod tests;
