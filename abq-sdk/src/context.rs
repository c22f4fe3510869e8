use std::env;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use abq_api::{Client, Credentials, Transport};

use crate::error::{Error, Result};
use crate::fanout::FanOut;
use crate::monitor::TaskMonitor;
use crate::service::{AdministrationService, CloudService, InfrastructureService, SearchService};

/// Environment variable holding the API endpoint.
pub const ENV_ENDPOINT: &str = "ABIQUO_ENDPOINT";
/// Environment variable holding the user name or session token.
pub const ENV_IDENTITY: &str = "ABIQUO_IDENTITY";
/// Environment variable holding the password.
pub const ENV_CREDENTIAL: &str = "ABIQUO_CREDENTIAL";

pub const DEFAULT_ASYNC_TASK_MONITOR_DELAY: Duration = Duration::from_millis(5000);
pub const DEFAULT_MAX_SCHEDULER_THREADS: usize = 10;

/// Runtime settings of an [`AbiquoContext`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbiquoConfig {
    pub endpoint: String,
    pub api_version: &'static str,
    /// Delay between two status requests of a task poller.
    pub async_task_monitor_delay: Duration,
    /// Concurrent requests of a fan-out listing.
    pub max_scheduler_threads: usize,
    /// HTTP request timeout, also the aggregate budget of fan-out listings.
    pub request_timeout: Option<Duration>,
}

/// Entry point of the SDK: an API client plus configuration.
///
/// Cheap to clone; every wrapper holds one.
#[derive(Clone)]
pub struct AbiquoContext {
    inner: Arc<Inner>,
}

struct Inner {
    api: Client,
    config: AbiquoConfig,
}

impl AbiquoContext {
    pub fn builder(endpoint: impl Into<String>, credentials: Credentials) -> ContextBuilder {
        ContextBuilder::new(endpoint, credentials)
    }

    /// The low-level API client, for calls not covered by the wrappers.
    pub fn api(&self) -> &Client {
        &self.inner.api
    }

    pub fn config(&self) -> &AbiquoConfig {
        &self.inner.config
    }

    /// A task poller using the configured delay.
    pub fn task_monitor(&self) -> TaskMonitor {
        TaskMonitor::new(self)
    }

    /// The fan-out executor sized from configuration.
    pub fn fan_out(&self) -> FanOut {
        let fan_out = FanOut::new(self.inner.config.max_scheduler_threads);
        match self.inner.config.request_timeout {
            Some(max_wait) => fan_out.max_wait(max_wait),
            None => fan_out,
        }
    }

    pub fn cloud(&self) -> CloudService {
        CloudService::new(self.clone())
    }

    pub fn administration(&self) -> AdministrationService {
        AdministrationService::new(self.clone())
    }

    pub fn search(&self) -> SearchService {
        SearchService::new(self.clone())
    }

    pub fn infrastructure(&self) -> InfrastructureService {
        InfrastructureService::new(self.clone())
    }
}

impl fmt::Debug for AbiquoContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbiquoContext")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

/// Builder for [`AbiquoContext`].
pub struct ContextBuilder {
    endpoint: String,
    credentials: Credentials,
    async_task_monitor_delay: Duration,
    max_scheduler_threads: usize,
    request_timeout: Option<Duration>,
    transport: Option<Arc<dyn Transport>>,
}

impl ContextBuilder {
    pub fn new(endpoint: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            endpoint: endpoint.into(),
            credentials,
            async_task_monitor_delay: DEFAULT_ASYNC_TASK_MONITOR_DELAY,
            max_scheduler_threads: DEFAULT_MAX_SCHEDULER_THREADS,
            request_timeout: None,
            transport: None,
        }
    }

    /// Read endpoint and credentials from `ABIQUO_ENDPOINT`,
    /// `ABIQUO_IDENTITY` and the optional `ABIQUO_CREDENTIAL`.
    ///
    /// Without a credential the identity is used as a session token.
    pub fn from_env() -> Result<Self> {
        let endpoint = required_env(ENV_ENDPOINT)?;
        let identity = required_env(ENV_IDENTITY)?;
        let credential = env::var(ENV_CREDENTIAL).ok().filter(|v| !v.is_empty());
        Ok(Self::new(endpoint, Credentials::from_identity(identity, credential)))
    }

    // ===== Task monitoring =====

    pub fn async_task_monitor_delay(mut self, delay: Duration) -> Self {
        self.async_task_monitor_delay = delay;
        self
    }

    // ===== Fan-out listing =====

    pub fn max_scheduler_threads(mut self, threads: usize) -> Self {
        self.max_scheduler_threads = threads;
        self
    }

    // ===== HTTP =====

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Send requests through `transport` instead of HTTP.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> Result<AbiquoContext> {
        if self.async_task_monitor_delay.is_zero() {
            return Err(Error::validation("async task monitor delay must be positive"));
        }
        if self.max_scheduler_threads == 0 {
            return Err(Error::validation("max scheduler threads must be positive"));
        }

        let mut api = Client::builder(self.endpoint.clone(), self.credentials);
        if let Some(timeout) = self.request_timeout {
            api = api.timeout(timeout);
        }
        if let Some(transport) = self.transport {
            api = api.transport(transport);
        }
        let api = api.build()?;

        Ok(AbiquoContext {
            inner: Arc::new(Inner {
                api,
                config: AbiquoConfig {
                    endpoint: self.endpoint,
                    api_version: abq_api::client::API_VERSION,
                    async_task_monitor_delay: self.async_task_monitor_delay,
                    max_scheduler_threads: self.max_scheduler_threads,
                    request_timeout: self.request_timeout,
                },
            }),
        })
    }
}

fn required_env(name: &str) -> Result<String> {
    env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::validation(format!("environment variable {name} is not set")))
}
