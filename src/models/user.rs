use serde::{Deserialize, Serialize};

/// Public user record. The password hash never leaves the credential store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Row id assigned by the store
    pub id: i64,
    pub name: String,
}
