pub mod api;
pub mod core;
pub mod faq;
pub mod handlers;
pub mod models;
pub mod security;
pub mod stores;
pub mod utils;
