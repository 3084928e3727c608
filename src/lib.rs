//! # gainers lib

use std::env;

pub mod api;
pub mod cache;
pub mod config;
pub mod data;
pub mod ds;
pub mod error;
pub mod financial;
pub mod scan;
pub mod ticker;
pub mod utils;

pub fn init() {
    env_logger::Builder::new()
        .parse_filters(env::var("LOG").as_deref().unwrap_or("off"))
        .init();
}
