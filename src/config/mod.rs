//! Runtime configuration for the proxy.

use std::fmt;
use std::time::Duration;

use crate::cli::Args;
use crate::prediction::{
    DEFAULT_API_BASE_URL, DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT, XTTS_V2_VERSION,
};
use crate::proxy::PollPolicy;

/// Largest accepted request body: 4.5 MiB, room for a base64 voice sample.
pub const DEFAULT_MAX_BODY_BYTES: usize = 4_718_592;

/// Settings the proxy is constructed with.
///
/// Built once at startup. The credential is optional here so that a
/// misconfigured server still answers each request with a configuration error.
#[derive(Clone)]
pub struct ProxyConfig {
    api_token: Option<String>,
    pub api_base_url: String,
    pub model_version: String,
    pub poll: PollPolicy,
    /// Limit on each upstream request.
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub max_body_bytes: usize,
}

impl ProxyConfig {
    /// Create a config with default settings and the given credential.
    ///
    /// Blank tokens are treated as absent.
    pub fn new(api_token: Option<String>) -> Self {
        Self {
            api_token: api_token.filter(|t| !t.trim().is_empty()),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            model_version: XTTS_V2_VERSION.to_string(),
            poll: PollPolicy::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Build the config from parsed command-line arguments.
    pub fn from_args(args: &Args) -> Self {
        Self::new(args.api_token.clone())
            .with_api_base_url(&args.api_base_url)
            .with_model_version(&args.model_version)
            .with_poll_policy(PollPolicy {
                initial_interval: Duration::from_millis(args.poll_interval_ms),
                multiplier: args.poll_multiplier,
                max_interval: Duration::from_millis(args.poll_max_interval_ms),
                max_attempts: args.poll_max_attempts,
            })
            .with_timeouts(
                Duration::from_millis(args.request_timeout_ms),
                Duration::from_millis(args.connect_timeout_ms),
            )
            .with_max_body_bytes(args.max_body_bytes)
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_model_version(mut self, version: impl Into<String>) -> Self {
        self.model_version = version.into();
        self
    }

    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    pub fn with_timeouts(mut self, request: Duration, connect: Duration) -> Self {
        self.request_timeout = request;
        self.connect_timeout = connect;
        self
    }

    pub fn with_max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    /// The service credential, if configured.
    pub fn api_token(&self) -> Option<&str> {
        self.api_token.as_deref()
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self::new(None)
    }
}

impl fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("api_base_url", &self.api_base_url)
            .field("model_version", &self.model_version)
            .field("poll", &self.poll)
            .field("request_timeout", &self.request_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("max_body_bytes", &self.max_body_bytes)
            .finish()
    }
}
