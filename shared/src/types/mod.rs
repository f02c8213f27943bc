//! Common type definitions shared between server modules

pub mod pagination;
pub mod response;

pub use pagination::{PageInfo, PageParams};
pub use response::{Envelope, PagedDocs};
