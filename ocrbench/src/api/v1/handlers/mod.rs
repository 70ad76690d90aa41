pub(crate) mod health;
pub mod home;
pub mod users;

pub use health::health_check;
