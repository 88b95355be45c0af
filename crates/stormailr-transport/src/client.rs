//! Delivery client
//!
//! One message in, one outcome out: validate, build the payload, sign, POST
//! once. There is no queue and no retry; a failed send is reported and left
//! to the caller.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::config::{ConnectionConfig, DEFAULT_TIMEOUT};
use crate::endpoint::resolve_endpoint;
use crate::error::DeliveryError;
use crate::http::{HttpRequest, HttpSender, ReqwestSender};
use crate::payload::DeliveryPayload;
use crate::providers::{AsciiSlugger, Clock, OsRandom, RandomBytes, Slugger, SystemClock};
use crate::token::generate_token;
use crate::types::OutboundMessage;

/// Successful delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeliveryResult {
    /// HTTP status returned by the API
    pub status: u16,
}

/// Anything that can deliver a message
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, message: &OutboundMessage) -> Result<DeliveryResult, DeliveryError>;
}

/// Client for the StorMailR email API
///
/// Holds only immutable configuration and shared collaborators, so one
/// instance can serve concurrent sends.
#[derive(Clone)]
pub struct DeliveryClient {
    config: ConnectionConfig,
    timeout: Duration,
    http: Arc<dyn HttpSender>,
    slugger: Arc<dyn Slugger>,
    random: Arc<dyn RandomBytes>,
    clock: Arc<dyn Clock>,
}

impl DeliveryClient {
    /// Create a client with the default collaborators
    pub fn new(config: ConnectionConfig) -> Self {
        Self {
            config,
            timeout: DEFAULT_TIMEOUT,
            http: Arc::new(ReqwestSender::new()),
            slugger: Arc::new(AsciiSlugger::default()),
            random: Arc::new(OsRandom),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_http_sender(mut self, http: Arc<dyn HttpSender>) -> Self {
        self.http = http;
        self
    }

    pub fn with_slugger(mut self, slugger: Arc<dyn Slugger>) -> Self {
        self.slugger = slugger;
        self
    }

    pub fn with_random(mut self, random: Arc<dyn RandomBytes>) -> Self {
        self.random = random;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Deliver a message with a single request
    #[instrument(skip_all, fields(host = %self.config.host))]
    pub async fn send(&self, message: &OutboundMessage) -> Result<DeliveryResult, DeliveryError> {
        let result = self.try_send(message).await;

        if let Err(ref e) = result {
            let recipients = message.recipient_emails();
            match e {
                DeliveryError::InvalidMessage(_) => {
                    warn!(?recipients, subject = %message.subject, error = %e, "Email rejected before sending");
                }
                _ => {
                    error!(?recipients, subject = %message.subject, kind = ?e.kind(), error = %e, "Email delivery failed");
                }
            }
        }

        result
    }

    async fn try_send(&self, message: &OutboundMessage) -> Result<DeliveryResult, DeliveryError> {
        message.validate()?;

        let request = self.prepare_request(message)?;
        let response = self
            .http
            .send(request)
            .await
            .map_err(DeliveryError::TransportFailure)?;

        info!(status = response.status, "Email accepted");

        Ok(DeliveryResult {
            status: response.status,
        })
    }

    /// Build the signed request for an already validated message
    fn prepare_request(&self, message: &OutboundMessage) -> Result<HttpRequest, DeliveryError> {
        let now = self.clock.now();

        let payload =
            DeliveryPayload::build(message, &self.config, self.slugger.as_ref(), now.date_naive());
        let body = serde_json::to_vec(&payload).map_err(DeliveryError::unexpected)?;

        let endpoint = resolve_endpoint(&self.config);

        let token = generate_token(
            &self.config.user,
            &self.config.secret,
            now,
            self.random.as_ref(),
        )
        .map_err(DeliveryError::UnexpectedFailure)?;

        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        headers.extend(
            token
                .headers()
                .into_iter()
                .map(|(name, value)| (name.to_string(), value)),
        );

        Ok(HttpRequest {
            method: Method::POST,
            url: endpoint.url,
            headers,
            body,
            timeout: self.timeout,
        })
    }
}

#[async_trait]
impl Transport for DeliveryClient {
    async fn send(&self, message: &OutboundMessage) -> Result<DeliveryResult, DeliveryError> {
        DeliveryClient::send(self, message).await
    }
}

impl std::fmt::Display for DeliveryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let protocol = resolve_endpoint(&self.config).protocol;
        write!(f, "stormailr+{}://{}", protocol.as_str(), self.config.host)?;
        if let Some(project) = self.config.project() {
            write!(f, " ({})", project)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for DeliveryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryClient")
            .field("config", &self.config)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
