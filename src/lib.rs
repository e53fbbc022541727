// src/lib.rs

//! catwatch library: snapshot diffing and digest delivery for an adoption listing.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
