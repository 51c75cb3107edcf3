use std::collections::BTreeMap;

use serde::Serialize;

use super::required;
use crate::errors::NewRelicError;

/// One entry of the account's application list.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Application {
    pub name: String,
    pub app_id: String,
    pub overview_url: String,
    pub servers_url: String,
}

impl Application {
    pub fn from_properties(properties: &BTreeMap<String, String>) -> Result<Self, NewRelicError> {
        Ok(Self {
            name: required(properties, "application", "name")?,
            app_id: required(properties, "application", "id")?,
            overview_url: required(properties, "application", "overview-url")?,
            servers_url: required(properties, "application", "servers-url")?,
        })
    }
}

/// Selects an application for deletion, either by numeric id or by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplicationTarget {
    Id(u64),
    Name(String),
}

impl ApplicationTarget {
    pub(crate) fn form_pair(&self) -> (String, String) {
        match self {
            Self::Id(id) => ("app_id".to_string(), id.to_string()),
            Self::Name(name) => ("app".to_string(), name.clone()),
        }
    }
}
