//! Application services between the HTTP adapters and the grammar library.

pub mod error;
pub mod highlight;
