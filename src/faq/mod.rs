pub mod corpus;
pub mod matcher;
pub mod router;
