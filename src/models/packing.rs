use serde::Serialize;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PackingCategory {
    pub name: String,
    pub items: Vec<String>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PackingList {
    /// Generated text as returned by the model, also used for export.
    pub text: String,
    pub categories: Vec<PackingCategory>,
}
