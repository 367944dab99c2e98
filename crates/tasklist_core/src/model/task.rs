use serde::{Deserialize, Serialize};

/// One task record. Field names serialize in camelCase because that is the
/// durable JSON format; `description` and `completed` tolerate absence so
/// sparser payloads written by hand or by older builds still decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: String,
}
