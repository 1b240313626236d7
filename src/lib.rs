pub mod client;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod services;

pub use client::BoardsClient;
