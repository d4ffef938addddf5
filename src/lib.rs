pub mod cli;
pub mod config;
pub mod db;
pub mod filter;
pub mod lookup;
pub mod models;
pub mod time;

pub use db::Database;
