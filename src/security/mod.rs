pub mod authenticator;
pub mod password;
pub mod token;
