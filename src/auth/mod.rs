//! # Auth Module
//!
//! This module handles admin authentication:
//! - Email/password login against bcrypt hashes
//! - Bearer token issue and validation
//! - AuthedAdmin extractor for dashboard routes

pub mod extractors;
pub mod handlers;
pub mod models;
pub mod password;
pub mod routes;
pub mod service;
pub mod token;


pub use extractors::AuthedAdmin;
pub use routes::auth_routes;
pub use service::AuthService;
