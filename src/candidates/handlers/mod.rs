// src/candidates/handlers/mod.rs

pub mod exports;
pub mod review;
pub mod submissions;

// Re-export handler functions
pub use exports::*;
pub use review::*;
pub use submissions::*;
