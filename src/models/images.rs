use serde::Serialize;

/// Photos of the destination. An empty list comes with a message saying why.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct DestinationImages {
    pub query: String,
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
