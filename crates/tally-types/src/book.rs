use serde::{Deserialize, Serialize};

/// A double-entry account book owned by the remote service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub collection_id: Option<String>,
    /// Date pattern used when string-encoding transaction dates.
    #[serde(default = "default_date_pattern")]
    pub date_pattern: String,
    #[serde(default = "default_fraction_digits")]
    pub fraction_digits: u32,
    #[serde(default)]
    pub time_zone: Option<String>,
}

fn default_date_pattern() -> String {
    "yyyy-MM-dd".into()
}

fn default_fraction_digits() -> u32 {
    2
}

/// A named set of books.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub book_ids: Vec<String>,
}
