pub mod api;
pub mod faq;
pub mod user;
