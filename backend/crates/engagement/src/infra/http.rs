//! HTTP client for the remote engagement service
//!
//! - `GET  {base}/freelancers/{freelancerId}/decisions`
//! - `PUT  {base}/decisions/{decisionId}/read`
//! - `POST {base}/freelancers/verify`
//!
//! Non-2xx replies become [`AppError::from_upstream`]; transport failures
//! go through the `reqwest` conversion in `kernel`.

use kernel::error::app_error::{AppError, ResultExt};
use kernel::error::kind::ErrorKind;
use platform::http::{build_client, endpoint, parse_base_url};
use reqwest::{Client, Response, Url};

use crate::application::config::EngagementConfig;
use crate::domain::entity::decision::Decision;
use crate::domain::repository::{IdentityVerifier, RemoteDecisionService};
use crate::domain::value_object::FreelancerId;
use crate::error::EngagementResult;
use crate::infra::dto::{DecisionListDto, MarkReadRequest, VerifyRequest, VerifyResponse};

/// `reqwest`-backed remote engagement service
#[derive(Debug, Clone)]
pub struct HttpEngagementClient {
    client: Client,
    base_url: Url,
}

impl HttpEngagementClient {
    pub fn new(config: &EngagementConfig) -> EngagementResult<Self> {
        let client = build_client(&config.http_client_config())?;
        let base_url = parse_base_url(&config.remote_base_url)?;
        Ok(Self { client, base_url })
    }

    fn url(&self, segments: &[&str]) -> EngagementResult<Url> {
        Ok(endpoint(&self.base_url, segments)?)
    }

    /// Pass 2xx responses through, turn anything else into an upstream error
    async fn ensure_success(response: Response) -> EngagementResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(AppError::from_upstream(status.as_u16(), body).into())
    }
}

impl RemoteDecisionService for HttpEngagementClient {
    async fn list_decisions(&self, freelancer_id: &FreelancerId) -> EngagementResult<Vec<Decision>> {
        let url = self.url(&["freelancers", freelancer_id.as_str(), "decisions"])?;

        let response = self.client.get(url).send().await.map_err(AppError::from)?;
        let list: DecisionListDto = Self::ensure_success(response)
            .await?
            .json()
            .await
            .map_app_err(ErrorKind::BadGateway, "Malformed decision list")?;

        Ok(list.into_decisions())
    }

    async fn mark_read(&self, decision_id: &str, freelancer_id: &FreelancerId) -> EngagementResult<()> {
        let url = self.url(&["decisions", decision_id, "read"])?;

        let response = self
            .client
            .put(url)
            .json(&MarkReadRequest {
                freelancer_id: freelancer_id.as_str(),
            })
            .send()
            .await
            .map_err(AppError::from)?;
        Self::ensure_success(response).await?;

        Ok(())
    }
}

impl IdentityVerifier for HttpEngagementClient {
    async fn verify(&self, freelancer_id: &FreelancerId, email: &str) -> EngagementResult<bool> {
        let url = self.url(&["freelancers", "verify"])?;

        let response = self
            .client
            .post(url)
            .json(&VerifyRequest {
                freelancer_id: freelancer_id.as_str(),
                email,
            })
            .send()
            .await
            .map_err(AppError::from)?;
        let body: VerifyResponse = Self::ensure_success(response)
            .await?
            .json()
            .await
            .map_err(AppError::from)?;

        Ok(body.verified)
    }
}
