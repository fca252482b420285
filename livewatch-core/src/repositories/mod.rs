// src/repositories/mod.rs

pub mod postgres;

pub use livewatch_common::traits::repository_traits::BroadcasterRepository;
pub use postgres::broadcaster::PostgresBroadcasterRepository;
