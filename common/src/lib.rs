pub mod auth;
pub mod config;
pub mod errors;
pub mod repository;
pub mod storage;
pub mod util;

pub use repository::*;
pub type ClientId = String;
