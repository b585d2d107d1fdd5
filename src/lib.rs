pub mod config;
pub mod db;
pub mod error;
pub mod estimator;
pub mod providers;
pub mod refresh;
pub mod render;
pub mod server;
pub mod service;

pub use error::CountrydexError;
