pub mod client;
pub mod config;
pub mod dispatch;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod rate_limit;
pub mod transport;
pub mod xml;

#[cfg(test)]
pub(crate) mod fixtures;

pub use client::Client;
pub use config::{ClientConfig, Endpoints, ProxyConfig};
pub use domain::{
    Application, ApplicationTarget, DeploymentNotice, Metric, MetricDataQuery, Server, Threshold,
};
pub use errors::NewRelicError;
