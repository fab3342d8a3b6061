use serde::{Deserialize, Serialize};

/// A flower document from the `flowers` collection, already projected to the
/// fields callers receive. Absent fields serialize as `null` so the key set
/// never changes.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(crate = "rocket::serde")]
pub struct FlowerRecord {
    pub flowername: Option<String>,
    pub habitat: Option<String>,
    #[serde(rename = "binomialName")]
    pub binomial_name: Option<String>,
    pub classification: Option<String>,
    pub flowername_kr: Option<String>,
}

/// An upstream shopping listing, forwarded without being inspected.
pub type ShoppingItem = serde_json::Value;

/// One page of the upstream search response. Only `items` is read.
#[derive(Debug, Deserialize, Default)]
#[serde(crate = "rocket::serde")]
pub struct ShoppingPage {
    items: Option<Vec<ShoppingItem>>,
}

impl ShoppingPage {
    pub fn into_items(self) -> Vec<ShoppingItem> {
        self.items.unwrap_or_default()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(crate = "rocket::serde")]
pub struct ShoppingResults {
    pub items: Vec<ShoppingItem>,
}
