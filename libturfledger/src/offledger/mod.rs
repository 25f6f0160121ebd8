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

//! Lookups against the systems that own jobs and service levels outside the ledger.
//!
//! Contracts only see the `OffLedgerRegistry` trait. `StaticRegistry` serves fixed answers from
//! memory; with the `arrowhead` feature, `ArrowheadRegistry` resolves the providing system
//! through an Arrowhead orchestrator and calls it over HTTP.

#[cfg(feature = "arrowhead")]
mod arrowhead;
mod error;
mod static_registry;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "arrowhead")]
pub use self::arrowhead::{ArrowheadConfig, ArrowheadRegistry, RequesterSystem};
pub use self::error::RegistryError;
pub use self::static_registry::{RegistryFixture, StaticRegistry};

/// What the work-assignment system knows about a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMetadata {
    pub work_id: String,
    pub product_id: String,
    /// The job-type tag, naming the sub-contract that creates the job.
    pub event_type: String,
    pub address: String,
    pub start_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceLevelResponse {
    #[serde(rename = "ServiceLevel")]
    pub service_level: String,
}

pub trait OffLedgerRegistry: Send + Sync {
    /// Whether the job may be assigned to the technician.
    fn job_exists(&self, job_id: &str, technician_id: &str) -> Result<bool, RegistryError>;

    /// Metadata for a job, or `None` if the registry does not know it.
    fn lookup_job(&self, job_id: &str) -> Result<Option<JobMetadata>, RegistryError>;

    /// The service level tag of a product's SLA, or `None` if it has none.
    fn lookup_service_level(&self, product_id: &str) -> Result<Option<String>, RegistryError>;

    /// Whether the work behind the job has been reported finished.
    fn is_job_done(&self, job_id: &str) -> Result<bool, RegistryError>;
}
