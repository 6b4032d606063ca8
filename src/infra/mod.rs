//! Infrastructure adapters.

pub mod store;
