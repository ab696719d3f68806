// src/candidates/mod.rs

pub mod choices;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod service;
pub mod validators;


// Re-export commonly used items
pub use routes::candidates_routes;
