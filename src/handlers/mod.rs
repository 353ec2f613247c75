// src/handlers/mod.rs

pub mod admin;
pub mod like;
pub mod product;
