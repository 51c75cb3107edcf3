use std::collections::BTreeMap;

use serde::Serialize;

use super::required;
use crate::errors::NewRelicError;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Server {
    pub overview_url: String,
    pub hostname: String,
    pub server_id: String,
}

impl Server {
    pub fn from_properties(properties: &BTreeMap<String, String>) -> Result<Self, NewRelicError> {
        Ok(Self {
            overview_url: required(properties, "server", "overview-url")?,
            hostname: required(properties, "server", "hostname")?,
            server_id: required(properties, "server", "id")?,
        })
    }
}
