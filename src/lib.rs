pub mod aggregate;
pub mod api;
pub mod config;
pub mod error;
pub mod explorer;
pub mod fetch;
pub mod models;
pub mod presenter;
pub mod price;
pub mod render;
pub mod service;
