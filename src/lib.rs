pub mod api;
pub mod cli;
pub mod config;
pub mod models;
pub mod services;
pub mod web;


pub use api::ApiClient;
pub use config::Config;
