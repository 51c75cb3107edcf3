use std::{collections::BTreeMap, sync::Arc, time::Duration};

use tracing::debug;

use crate::{
    config::{ClientConfig, Endpoints},
    dispatch::Dispatcher,
    domain::{
        Application, ApplicationTarget, DeploymentNotice, Metric, MetricDataQuery, Server,
        Threshold,
    },
    errors::NewRelicError,
    rate_limit::RateLimiter,
    transport::{HttpTransport, Transport},
    xml::XmlElement,
};

/// Metric queries can return a lot of data, so they never run with less than this.
pub const METRIC_TIMEOUT_FLOOR: Duration = Duration::from_secs(5);
pub const DEFAULT_METRIC_NAME_LIMIT: u32 = 5_000;

/// Client for the New Relic v1 REST API.
pub struct Client {
    account_id: String,
    endpoints: Endpoints,
    dispatcher: Dispatcher,
    rate_limiter: RateLimiter,
}

impl Client {
    pub fn new(config: ClientConfig) -> Result<Self, NewRelicError> {
        ensure_credentials(&config)?;
        let transport = HttpTransport::new(&config.api_key, config.proxy.as_ref())
            .map_err(|err| NewRelicError::invalid_parameter(err.to_string()))?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Builds a client on top of a custom transport. Credentials are still
    /// required; the transport is responsible for sending them.
    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, NewRelicError> {
        ensure_credentials(&config)?;

        Ok(Self {
            account_id: config.account_id,
            endpoints: config.endpoints,
            dispatcher: Dispatcher::new(
                transport,
                config.retries,
                config.retry_delay,
                config.timeout,
            ),
            rate_limiter: RateLimiter::default(),
        })
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub async fn view_applications(&self) -> Result<Vec<Application>, NewRelicError> {
        let uri = format!(
            "{}/accounts/{}/applications.xml",
            self.endpoints.rpm, self.account_id
        );
        let response = self.dispatcher.get(&uri, Vec::new(), None).await?;

        let applications = response
            .find_all("application")
            .into_iter()
            .map(|application| Application::from_properties(&application.child_map()))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = applications.len(), "fetched applications");
        Ok(applications)
    }

    /// Returns the ids of applications the API did not report as deleted.
    pub async fn delete_applications(
        &self,
        targets: &[ApplicationTarget],
    ) -> Result<Vec<String>, NewRelicError> {
        if targets.is_empty() {
            return Err(NewRelicError::invalid_parameter(
                "at least one application id or name is required",
            ));
        }

        let uri = format!(
            "{}/api/v1/accounts/{}/applications/delete.xml",
            self.endpoints.api, self.account_id
        );
        let form = targets.iter().map(ApplicationTarget::form_pair).collect();
        let response = self.dispatcher.post(&uri, form, None).await?;

        Ok(failed_deletions(&response, "application"))
    }

    /// Maps each metric name of an agent to the fields it reports.
    pub async fn get_metric_names(
        &self,
        agent_id: &str,
        name_pattern: Option<&str>,
        limit: u32,
    ) -> Result<BTreeMap<String, Vec<String>>, NewRelicError> {
        self.rate_limiter.check("get_metric_names")?;

        let mut query = Vec::new();
        if let Some(pattern) = name_pattern {
            query.push(("re".to_string(), pattern.to_string()));
        }
        query.push(("limit".to_string(), limit.to_string()));

        let uri = format!(
            "{}/api/v1/applications/{}/metrics.xml",
            self.endpoints.api, agent_id
        );
        let response = self
            .dispatcher
            .get(&uri, query, Some(self.metric_timeout()))
            .await?;

        response
            .find_all("metric")
            .into_iter()
            .map(|metric| {
                let name = metric
                    .attr("name")
                    .ok_or_else(|| NewRelicError::missing_field("metric", "name"))?;
                let fields: Vec<String> = metric
                    .find_all("field")
                    .into_iter()
                    .filter_map(|field| field.attr("name").map(str::to_string))
                    .collect();
                Ok((name.to_string(), fields))
            })
            .collect()
    }

    /// One [`Metric`] per application, metric and time slice in the window.
    pub async fn get_metric_data(
        &self,
        query: &MetricDataQuery,
    ) -> Result<Vec<Metric>, NewRelicError> {
        let pairs = query.query_pairs()?;
        self.rate_limiter.check("get_metric_data")?;

        let uri = format!(
            "{}/api/v1/accounts/{}/metrics/data.xml",
            self.endpoints.api, self.account_id
        );
        let response = self
            .dispatcher
            .get(&uri, pairs, Some(self.metric_timeout()))
            .await?;

        Ok(response
            .find_all("metric")
            .into_iter()
            .map(Metric::from_element)
            .collect())
    }

    /// Records a deployment and returns the fields of the created marker.
    pub async fn notify_deployment(
        &self,
        notice: &DeploymentNotice,
    ) -> Result<BTreeMap<String, String>, NewRelicError> {
        let form = notice.form_pairs()?;
        let uri = format!("{}/deployments.xml", self.endpoints.rpm);
        let response = self.dispatcher.post(&uri, form, None).await?;

        Ok(response.child_map())
    }

    pub async fn get_threshold_values(
        &self,
        application_id: &str,
    ) -> Result<Vec<Threshold>, NewRelicError> {
        let uri = format!(
            "{}/accounts/{}/applications/{}/threshold_values.xml",
            self.endpoints.rpm, self.account_id, application_id
        );
        let response = self.dispatcher.get(&uri, Vec::new(), None).await?;

        response
            .find_all("threshold_value")
            .into_iter()
            .map(|threshold| Threshold::from_properties(&threshold.attributes))
            .collect()
    }

    pub async fn view_servers(&self) -> Result<Vec<Server>, NewRelicError> {
        let uri = format!(
            "{}/api/v1/accounts/{}/servers.xml",
            self.endpoints.api, self.account_id
        );
        let response = self.dispatcher.get(&uri, Vec::new(), None).await?;

        response
            .find_all("server")
            .into_iter()
            .map(|server| Server::from_properties(&server.child_map()))
            .collect()
    }

    /// Returns the server id back when the API did not report it as deleted.
    pub async fn delete_servers(&self, server_id: &str) -> Result<Vec<String>, NewRelicError> {
        let uri = format!(
            "{}/api/v1/accounts/{}/servers/{}.xml",
            self.endpoints.api, self.account_id, server_id
        );
        let response = self.dispatcher.delete(&uri, None).await?;

        Ok(failed_deletions(&response, "server"))
    }

    fn metric_timeout(&self) -> Duration {
        self.dispatcher.timeout().max(METRIC_TIMEOUT_FLOOR)
    }
}

fn ensure_credentials(config: &ClientConfig) -> Result<(), NewRelicError> {
    if config.account_id.trim().is_empty() || config.api_key.trim().is_empty() {
        return Err(NewRelicError::MissingCredentials);
    }
    Ok(())
}

fn failed_deletions(response: &XmlElement, tag: &str) -> Vec<String> {
    response
        .find_all(tag)
        .into_iter()
        .filter(|element| {
            !element
                .find("result")
                .is_some_and(|result| result.text().contains("deleted"))
        })
        .map(|element| {
            element
                .attr("id")
                .or_else(|| element.child_text("id"))
                .unwrap_or_default()
                .to_string()
        })
        .collect()
}
