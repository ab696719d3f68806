// src/cv_files/mod.rs
//! CV uploads stored inline in the database and served back to admins.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod service;
pub mod storage;

#[cfg(test)]
mod tests;

pub use routes::cv_files_routes;
