pub mod auth;
pub mod config;
pub mod database;
pub mod draft;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod platforms;
pub mod routes;
