// Copyright 2021 Cargill Incorporated
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A registry backed by Arrowhead service orchestration.
//!
//! Every job lookup first asks the orchestrator which system provides the assignment service,
//! then posts the request to that provider. Service levels are read from a plain HTTP endpoint.

use std::time::Duration;

use reqwest::{blocking::Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::{JobMetadata, OffLedgerRegistry, RegistryError, ServiceLevelResponse};

const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequesterSystem {
    pub system_name: String,
    pub address: String,
    pub port: u16,
    pub authentication_info: String,
}

impl Default for RequesterSystem {
    fn default() -> Self {
        RequesterSystem {
            system_name: "technician".into(),
            address: "127.0.0.1".into(),
            port: 5000,
            authentication_info: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ArrowheadConfig {
    /// Base URL of the orchestrator, e.g. `https://arrowhead-orchestrator:8441`.
    pub orchestrator_url: String,
    pub requester_system: RequesterSystem,
    /// Service definition that assigns work to technicians.
    pub assign_service: String,
    pub interface: String,
    /// Base URL serving `/sla/{productId}/servicelevel`.
    pub service_level_url: String,
    /// Base URL serving `/work/{jobId}/status`. Without it every job is reported done.
    pub job_status_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ArrowheadConfig {
    fn default() -> Self {
        ArrowheadConfig {
            orchestrator_url: "https://arrowhead-orchestrator:8441".into(),
            requester_system: RequesterSystem::default(),
            assign_service: "assign-worker".into(),
            interface: "HTTP-SECURE-JSON".into(),
            service_level_url: "http://localhost:5001".into(),
            job_status_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OrchestrationRequest<'a> {
    requester_system: &'a RequesterSystem,
    requested_service: RequestedService<'a>,
    orchestration_flags: OrchestrationFlags,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestedService<'a> {
    service_definition_requirement: &'a str,
    interface_requirements: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OrchestrationFlags {
    override_store: bool,
    enable_inter_cloud: bool,
}

#[derive(Debug, Deserialize)]
struct OrchestrationResponse {
    response: Vec<OrchestrationResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrchestrationResult {
    provider: Provider,
    service_uri: String,
}

#[derive(Debug, Deserialize)]
struct Provider {
    address: String,
    port: u16,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AssignWorkRequest<'a> {
    work_id: &'a str,
    technician_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct JobStatusResponse {
    done: bool,
}

pub struct ArrowheadRegistry {
    config: ArrowheadConfig,
    client: Client,
}

impl ArrowheadRegistry {
    pub fn new(config: ArrowheadConfig) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| RegistryError::InternalError(err.to_string()))?;
        Ok(ArrowheadRegistry { config, client })
    }

    /// Asks the orchestrator for the provider of the assignment service and returns its URL.
    fn orchestrate(&self) -> Result<String, RegistryError> {
        let request = OrchestrationRequest {
            requester_system: &self.config.requester_system,
            requested_service: RequestedService {
                service_definition_requirement: &self.config.assign_service,
                interface_requirements: vec![self.config.interface.as_str()],
            },
            orchestration_flags: OrchestrationFlags {
                override_store: false,
                enable_inter_cloud: false,
            },
        };

        let res = self
            .client
            .post(&format!(
                "{}/orchestrator/orchestration",
                self.config.orchestrator_url
            ))
            .json(&request)
            .send()
            .map_err(|err| RegistryError::TransportError(format!("orchestration: {}", err)))?;

        let status = res.status();
        if !status.is_success() {
            return Err(RegistryError::InvalidResponse(format!(
                "orchestration request failed with status code '{}'",
                status
            )));
        }

        let orchestration: OrchestrationResponse = res.json().map_err(|_| {
            RegistryError::InvalidResponse(
                "Failed to deserialize orchestration response".to_string(),
            )
        })?;

        let chosen = orchestration.response.into_iter().next().ok_or_else(|| {
            RegistryError::InvalidResponse(format!(
                "no provider for service '{}'",
                self.config.assign_service
            ))
        })?;
        debug!(
            "Orchestrator chose {}:{}{}",
            chosen.provider.address, chosen.provider.port, chosen.service_uri
        );

        Ok(format!(
            "https://{}:{}{}",
            chosen.provider.address, chosen.provider.port, chosen.service_uri
        ))
    }

    fn assign_work(
        &self,
        job_id: &str,
        technician_id: &str,
    ) -> Result<reqwest::blocking::Response, RegistryError> {
        let url = self.orchestrate()?;
        self.client
            .post(&url)
            .json(&AssignWorkRequest {
                work_id: job_id,
                technician_id,
            })
            .send()
            .map_err(|err| RegistryError::TransportError(format!("assign work: {}", err)))
    }
}

impl OffLedgerRegistry for ArrowheadRegistry {
    fn job_exists(&self, job_id: &str, technician_id: &str) -> Result<bool, RegistryError> {
        let res = self.assign_work(job_id, technician_id)?;
        match res.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            status => Err(RegistryError::InvalidResponse(format!(
                "assign work request failed with status code '{}'",
                status
            ))),
        }
    }

    fn lookup_job(&self, job_id: &str) -> Result<Option<JobMetadata>, RegistryError> {
        let res = self.assign_work(job_id, "")?;
        match res.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => res.json().map(Some).map_err(|_| {
                RegistryError::InvalidResponse("Failed to deserialize work response".to_string())
            }),
            status => Err(RegistryError::InvalidResponse(format!(
                "assign work request failed with status code '{}'",
                status
            ))),
        }
    }

    fn lookup_service_level(&self, product_id: &str) -> Result<Option<String>, RegistryError> {
        let res = self
            .client
            .get(&format!(
                "{}/sla/{}/servicelevel",
                self.config.service_level_url, product_id
            ))
            .send()
            .map_err(|err| RegistryError::TransportError(format!("service level: {}", err)))?;

        match res.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => res
                .json::<ServiceLevelResponse>()
                .map(|body| Some(body.service_level))
                .map_err(|_| {
                    RegistryError::InvalidResponse(
                        "Failed to deserialize service level response".to_string(),
                    )
                }),
            status => Err(RegistryError::InvalidResponse(format!(
                "service level request failed with status code '{}'",
                status
            ))),
        }
    }

    fn is_job_done(&self, job_id: &str) -> Result<bool, RegistryError> {
        let base = match &self.config.job_status_url {
            Some(base) => base,
            None => return Ok(true),
        };

        let res = self
            .client
            .get(&format!("{}/work/{}/status", base, job_id))
            .send()
            .map_err(|err| RegistryError::TransportError(format!("job status: {}", err)))?;

        match res.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => res
                .json::<JobStatusResponse>()
                .map(|body| body.done)
                .map_err(|_| {
                    RegistryError::InvalidResponse(
                        "Failed to deserialize job status response".to_string(),
                    )
                }),
            status => Err(RegistryError::InvalidResponse(format!(
                "job status request failed with status code '{}'",
                status
            ))),
        }
    }
}
