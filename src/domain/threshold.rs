use std::collections::BTreeMap;

use serde::Serialize;

use super::required;
use crate::errors::NewRelicError;

/// Current value of one monitored metric against its alert threshold.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Threshold {
    pub name: String,
    pub metric_value: String,
    pub formatted_metric_value: String,
    pub threshold_value: String,
    pub begin_time: String,
    pub end_time: String,
}

impl Threshold {
    pub fn from_properties(properties: &BTreeMap<String, String>) -> Result<Self, NewRelicError> {
        Ok(Self {
            name: required(properties, "threshold_value", "name")?,
            metric_value: required(properties, "threshold_value", "metric_value")?,
            formatted_metric_value: required(
                properties,
                "threshold_value",
                "formatted_metric_value",
            )?,
            threshold_value: required(properties, "threshold_value", "threshold_value")?,
            begin_time: required(properties, "threshold_value", "begin_time")?,
            end_time: required(properties, "threshold_value", "end_time")?,
        })
    }
}
