//! Utility functions shared between server modules

pub mod validation;
