use serde::{Deserialize, Serialize};

/// Body of `POST /blocks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBlock {
    pub start: String,
    pub end: String,
    #[serde(rename = "calendarID")]
    pub calendar_id: String,
    pub notes: String,
}

/// The part of the create response we keep. Acuity sends the id as a number.
#[derive(Debug, Deserialize)]
pub struct CreatedBlock {
    pub id: Option<serde_json::Value>,
}
