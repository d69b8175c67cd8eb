pub mod ask;
pub mod fallback;
pub mod health;
pub mod users;
