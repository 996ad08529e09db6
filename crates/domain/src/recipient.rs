use serde::{Deserialize, Serialize};

/// A customer portal user who receives statement emails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    /// Business partner code of the customer in the inventory backend
    pub card_code: String,
    pub card_name: String,
    pub email: String,
}
