//! Records built from API responses
//!
//! Each record is a plain value copied out of one XML element. Construction
//! fails with [`NewRelicError::MissingField`] when a required key is absent.

use std::collections::BTreeMap;

use crate::errors::NewRelicError;

pub mod application;
pub mod deployment;
pub mod metric;
pub mod server;
pub mod threshold;

pub use application::{Application, ApplicationTarget};
pub use deployment::DeploymentNotice;
pub use metric::{Metric, MetricDataQuery};
pub use server::Server;
pub use threshold::Threshold;

pub(crate) fn required(
    properties: &BTreeMap<String, String>,
    resource: &'static str,
    key: &'static str,
) -> Result<String, NewRelicError> {
    properties
        .get(key)
        .cloned()
        .ok_or_else(|| NewRelicError::missing_field(resource, key))
}
