use crate::{
    form::state::SlipPayload,
    foundation::error::{SlipError, SlipResult},
};

/// Delivers a slip to the record keeper.
///
/// Implementations make exactly one attempt per call and report any non-acceptance as
/// [`SlipError::Submission`].
#[allow(async_fn_in_trait)]
pub trait Submitter {
    /// Send one slip; `Ok` means the endpoint accepted it.
    async fn submit(&self, payload: &SlipPayload) -> SlipResult<()>;
}

/// Posts the slip as JSON to a webhook (a spreadsheet script in the default deployment).
#[derive(Clone, Debug)]
pub struct HttpSubmitter {
    client: reqwest::Client,
    endpoint_url: String,
}

impl HttpSubmitter {
    /// Post to `endpoint_url` with a default client.
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint_url)
    }

    /// Post with a caller-configured client (timeouts, proxies).
    pub fn with_client(client: reqwest::Client, endpoint_url: impl Into<String>) -> Self {
        Self {
            client,
            endpoint_url: endpoint_url.into(),
        }
    }

    /// Where slips are posted.
    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }
}

impl Submitter for HttpSubmitter {
    #[tracing::instrument(skip(self, payload), fields(url = %self.endpoint_url))]
    async fn submit(&self, payload: &SlipPayload) -> SlipResult<()> {
        let response = self
            .client
            .post(&self.endpoint_url)
            .json(payload)
            .send()
            .await
            .map_err(|e| SlipError::submission(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SlipError::submission(format!(
                "endpoint answered {status}"
            )));
        }

        tracing::debug!(%status, "endpoint accepted slip");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/submit/http.rs"]
mod tests;
