use std::{sync::Arc, time::Duration};

use tracing::{debug, warn};

use crate::{
    errors::NewRelicError,
    transport::{ApiRequest, Method, RawResponse, Transport},
    xml::{self, XmlElement},
};

/// Sends requests with a fixed-delay retry on connection failures and turns
/// the final response into either a parsed XML tree or a typed error.
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    retries: u32,
    retry_delay: Duration,
    timeout: Duration,
}

impl Dispatcher {
    pub fn new(
        transport: Arc<dyn Transport>,
        retries: u32,
        retry_delay: Duration,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            retries,
            retry_delay,
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn get(
        &self,
        uri: &str,
        query: Vec<(String, String)>,
        timeout: Option<Duration>,
    ) -> Result<XmlElement, NewRelicError> {
        let request = ApiRequest::new(Method::Get, uri, timeout.unwrap_or(self.timeout))
            .with_query(query);
        self.dispatch(request).await
    }

    pub async fn post(
        &self,
        uri: &str,
        form: Vec<(String, String)>,
        timeout: Option<Duration>,
    ) -> Result<XmlElement, NewRelicError> {
        let request =
            ApiRequest::new(Method::Post, uri, timeout.unwrap_or(self.timeout)).with_form(form);
        self.dispatch(request).await
    }

    pub async fn delete(
        &self,
        uri: &str,
        timeout: Option<Duration>,
    ) -> Result<XmlElement, NewRelicError> {
        let request = ApiRequest::new(Method::Delete, uri, timeout.unwrap_or(self.timeout));
        self.dispatch(request).await
    }

    pub async fn dispatch(&self, request: ApiRequest) -> Result<XmlElement, NewRelicError> {
        let response = self.send_with_retries(&request).await?;

        if !response.is_success() {
            let message = error_message(&response);
            warn!(
                method = request.method.as_str(),
                uri = %request.uri,
                status = response.status,
                "api returned non-success status"
            );
            return Err(NewRelicError::from_status(response.status, message));
        }

        xml::parse_response(&response.body)
    }

    async fn send_with_retries(&self, request: &ApiRequest) -> Result<RawResponse, NewRelicError> {
        let max_attempts = self.retries.saturating_add(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!(
                method = request.method.as_str(),
                uri = %request.uri,
                attempt,
                "sending api request"
            );

            match self.transport.send(request).await {
                Ok(response) => return Ok(response),
                Err(err) if err.is_transient() && attempt < max_attempts => {
                    warn!(
                        uri = %request.uri,
                        attempt,
                        delay_ms = self.retry_delay.as_millis() as u64,
                        error = %err,
                        "api request failed, retrying"
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(err) => {
                    warn!(uri = %request.uri, attempt, error = %err, "api request failed");
                    return Err(NewRelicError::Unreachable {
                        attempts: attempt,
                        message: err.to_string(),
                    });
                }
            }
        }
    }
}

fn error_message(response: &RawResponse) -> String {
    let body = response.body.trim();
    if !body.is_empty() {
        return body.to_string();
    }
    response
        .reason
        .clone()
        .unwrap_or_else(|| format!("http status {}", response.status))
}
