use serde::{Deserialize, Serialize};

/// One editable text fragment of the public site (hero copy, about
/// paragraphs, contact details), keyed by a stable slug.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteContent {
    pub key: String,
    pub value: String,
    pub updated_at: String,
}
