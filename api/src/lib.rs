//! # CraftLink API
//!
//! HTTP layer of the CraftLink backend: route handlers, request DTOs,
//! the generic document controller, and the authentication middleware.

pub mod app;
pub mod controller;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
