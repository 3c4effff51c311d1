// src/lib.rs
pub mod config;
pub mod health;
pub mod metrics;
pub mod report;
pub mod runner;
pub mod server;
