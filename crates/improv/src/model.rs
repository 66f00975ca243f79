use serde::{Deserialize, Deserializer, Serialize};

/// Number of slides fetched together for one presentation.
pub const SLIDE_BATCH_SIZE: usize = 5;

/// A performance style. Its `color` decides which topics may follow it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    #[serde(alias = "style_id")]
    pub id: i64,
    #[serde(alias = "style_name")]
    pub name: String,
    #[serde(
        default,
        alias = "style_description",
        deserialize_with = "null_as_empty"
    )]
    pub description: String,
    #[serde(alias = "style_color")]
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: i64,
    pub color: String,
    pub style_id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub id: i64,
    pub image_url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
}

/// Rows coming back from PostgREST may carry `null` for optional text columns.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}
