pub mod cli;
pub mod config;
pub mod connection;
pub mod pretty;
pub mod server;
pub mod session;
