//! v1 API Data Transfer Objects.

pub mod users;

pub use users::*;
