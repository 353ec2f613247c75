// src/models/mod.rs

pub mod extended_json;
pub mod like;
pub mod product;
pub mod user;
