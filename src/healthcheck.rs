use std::time::Duration;

use thiserror::Error;

use crate::config::DEFAULT_HTTP_PORT;

const PROBE_TIMEOUT: Duration = Duration::from_secs(2);
const HEALTH_PATH: &str = "/health/check";

#[derive(Error, Debug)]
#[error("Healthcheck failed: {0}")]
pub struct HealthcheckError(String);

/// Probe the liveness endpoint on the default port.
pub async fn healthcheck() -> Result<(), HealthcheckError> {
    healthcheck_with_port(DEFAULT_HTTP_PORT).await
}

/// Probe `http://127.0.0.1:<port>/health/check`; any non-2xx answer is a failure.
pub async fn healthcheck_with_port(port: u16) -> Result<(), HealthcheckError> {
    let client = reqwest::Client::builder()
        .timeout(PROBE_TIMEOUT)
        .build()
        .map_err(|e| HealthcheckError(format!("Failed to create HTTP client: {e}")))?;

    let url = format!("http://127.0.0.1:{port}{HEALTH_PATH}");
    let resp = client
        .get(&url)
        .send()
        .await
        .map_err(|e| HealthcheckError(format!("Request to {url} failed: {e}")))?;

    if resp.status().is_success() {
        Ok(())
    } else {
        Err(HealthcheckError(format!(
            "Health endpoint returned status: {}",
            resp.status()
        )))
    }
}
