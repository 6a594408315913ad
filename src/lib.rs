pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod metis;
pub mod middleware;
pub mod notification;
pub mod server;
