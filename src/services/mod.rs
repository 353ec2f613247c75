// src/services/mod.rs
//
// Store-agnostic operations. Each takes the store handle explicitly.

pub mod catalog;
pub mod likes;
pub mod projection;
pub mod reset;
