//! Unit tests for individual components

mod config_test;
mod pool_test;
