pub mod auth;
pub mod config;
pub mod db;
pub mod handlers;
pub mod marketplace;
pub mod models;

pub use db::connection;
