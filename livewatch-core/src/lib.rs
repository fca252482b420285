// src/lib.rs

pub mod config;
pub mod db;
pub mod repositories;
pub mod platforms;
pub mod services;
pub mod tasks;
pub mod test_utils;

pub use db::Database;
pub use livewatch_common::error::Error;
