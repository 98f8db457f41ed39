use serde::{Deserialize, Serialize};
use url::Url;

use super::trip::Coordinates;

const MAP_SEARCH_URL: &str = "https://www.google.com/maps/search/";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Spot {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_link: Option<String>,
}

impl Spot {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            coordinates: None,
            map_link: None,
        }
    }

    /// The query used to geocode this spot and to build its map link.
    pub fn search_query(&self, destination: &str) -> String {
        format!("{} {}", destination, self.name)
    }

    pub fn with_map_link(mut self, destination: &str) -> Self {
        self.map_link = map_search_link(&self.search_query(destination));
        self
    }
}

pub fn map_search_link(query: &str) -> Option<String> {
    let mut url = Url::parse(MAP_SEARCH_URL).ok()?;
    url.query_pairs_mut()
        .append_pair("api", "1")
        .append_pair("query", query);
    Some(url.into())
}

/// Spots for a destination together with the geocoding outcome.
#[derive(Debug, Serialize, Clone)]
pub struct SpotMap {
    pub destination: String,
    pub center: Coordinates,
    pub spots: Vec<Spot>,
    pub warnings: Vec<String>,
}
