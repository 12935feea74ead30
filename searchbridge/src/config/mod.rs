//! Configuration for the console binary.

mod dependencies;

pub use dependencies::Dependencies;
