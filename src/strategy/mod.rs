// src/strategy/mod.rs

pub mod baseline;
pub mod qlearning;
pub mod traits;
