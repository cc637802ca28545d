//! GCE REST implementation of [`ComputeProvider`].
//!
//! Pass-through plumbing: every method maps one-to-one onto a
//! `compute.googleapis.com` endpoint, no reconciliation logic lives here.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;

use crate::auth::AccessToken;
use crate::config::FleetConfig;
use crate::models::{Instance, InstanceSpec, Metadata, Operation};
use crate::provider::{ComputeProvider, ProviderError, ProviderResult};
use crate::Result;

pub const COMPUTE_BASE_URL: &str = "https://compute.googleapis.com/compute/v1";

// Boot disk image and network wiring for created instances.
const SOURCE_IMAGE: &str = "projects/ubuntu-os-cloud/global/images/family/ubuntu-2004-lts";
const DEFAULT_NETWORK: &str = "global/networks/default";

#[derive(Debug, Clone)]
pub struct GceClient {
    http: reqwest::Client,
    base: String,
    project: String,
    zone: String,
    token: AccessToken,
}

impl GceClient {
    pub fn new(config: &FleetConfig, token: AccessToken) -> Result<Self> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| crate::Error::Config(format!("building http client: {e}")))?;
        Ok(Self {
            http,
            base: COMPUTE_BASE_URL.into(),
            project: config.project()?,
            zone: config.zone()?,
            token,
        })
    }

    /// Point the client at another API root, e.g. a local emulator.
    pub fn with_base_url<S: AsRef<str>>(mut self, base: S) -> Self {
        self.base = base.as_ref().trim_end_matches('/').into();
        self
    }

    fn zone_url(&self, tail: &str) -> String {
        format!(
            "{}/projects/{}/zones/{}/{}",
            self.base, self.project, self.zone, tail
        )
    }

    fn machine_type_url(&self, machine_type: &str) -> String {
        format!("zones/{}/machineTypes/{}", self.zone, machine_type)
    }

    async fn check(res: reqwest::Response, what: &str) -> ProviderResult<reqwest::Response> {
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        let body = res.text().await.unwrap_or_default();
        if status == StatusCode::NOT_FOUND {
            Err(ProviderError::NotFound(what.into()))
        } else if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            Err(ProviderError::Transient(format!(
                "{what}: HTTP {status}: {body}"
            )))
        } else {
            Err(ProviderError::Api(format!("{what}: HTTP {status}: {body}")))
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: String,
        what: &str,
    ) -> ProviderResult<T> {
        let res = self
            .http
            .get(&url)
            .bearer_auth(self.token.bearer())
            .send()
            .await?;
        let res = Self::check(res, what).await?;
        res.json::<T>()
            .await
            .map_err(|e| ProviderError::Api(format!("decoding {what} payload: {e}")))
    }

    async fn post_json<B: Serialize>(
        &self,
        url: String,
        body: Option<&B>,
        what: &str,
    ) -> ProviderResult<Operation> {
        let mut req = self.http.post(&url).bearer_auth(self.token.bearer());
        match body {
            Some(body) => req = req.json(body),
            // the start/stop verbs take an empty body
            None => req = req.header(reqwest::header::CONTENT_LENGTH, 0),
        }
        let res = req.send().await?;
        let res = Self::check(res, what).await?;
        res.json::<Operation>()
            .await
            .map_err(|e| ProviderError::Api(format!("decoding {what} operation: {e}")))
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            ProviderError::Transient(e.to_string())
        } else {
            ProviderError::Api(e.to_string())
        }
    }
}

#[async_trait]
impl ComputeProvider for GceClient {
    async fn get_instance(&self, name: &str) -> ProviderResult<Instance> {
        self.get_json(self.zone_url(&format!("instances/{name}")), name)
            .await
    }

    async fn insert_instance(&self, spec: &InstanceSpec) -> ProviderResult<Operation> {
        let body = InsertBody {
            name: &spec.name,
            machine_type: self.machine_type_url(&spec.machine_type),
            disks: vec![DiskSpec {
                boot: true,
                auto_delete: true,
                initialize_params: InitializeParams {
                    source_image: SOURCE_IMAGE,
                },
            }],
            network_interfaces: vec![NicSpec {
                network: DEFAULT_NETWORK,
                access_configs: vec![AccessConfig {
                    kind: "ONE_TO_ONE_NAT",
                    name: "External NAT",
                }],
            }],
            metadata: Metadata::startup_script(&spec.startup_script),
        };
        self.post_json(self.zone_url("instances"), Some(&body), &spec.name)
            .await
    }

    async fn start_instance(&self, name: &str) -> ProviderResult<Operation> {
        self.post_json::<()>(self.zone_url(&format!("instances/{name}/start")), None, name)
            .await
    }

    async fn stop_instance(&self, name: &str) -> ProviderResult<Operation> {
        self.post_json::<()>(self.zone_url(&format!("instances/{name}/stop")), None, name)
            .await
    }

    async fn set_metadata(&self, name: &str, metadata: &Metadata) -> ProviderResult<Operation> {
        self.post_json(
            self.zone_url(&format!("instances/{name}/setMetadata")),
            Some(metadata),
            name,
        )
        .await
    }

    async fn get_operation(&self, operation: &Operation) -> ProviderResult<Operation> {
        self.get_json(
            self.zone_url(&format!("operations/{}", operation.name)),
            &operation.name,
        )
        .await
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InsertBody<'a> {
    name: &'a str,
    machine_type: String,
    disks: Vec<DiskSpec>,
    network_interfaces: Vec<NicSpec>,
    metadata: Metadata,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DiskSpec {
    boot: bool,
    auto_delete: bool,
    initialize_params: InitializeParams,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InitializeParams {
    source_image: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NicSpec {
    network: &'static str,
    access_configs: Vec<AccessConfig>,
}

#[derive(Serialize)]
struct AccessConfig {
    #[serde(rename = "type")]
    kind: &'static str,
    name: &'static str,
}
