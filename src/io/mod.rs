// src/io/mod.rs

pub mod catalog;
pub mod demand;
pub mod reporting;
