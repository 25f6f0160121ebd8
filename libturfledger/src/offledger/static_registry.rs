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

//! An in-memory registry with fixed answers.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard};

use serde::Deserialize;

use super::{JobMetadata, OffLedgerRegistry, RegistryError};

/// The contents of a `StaticRegistry`, as loaded from a JSON fixture.
///
/// Jobs are assignable and reported done unless listed in `unassignable` or `pending`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegistryFixture {
    pub jobs: HashMap<String, JobMetadata>,
    pub service_levels: HashMap<String, String>,
    pub unassignable: BTreeSet<String>,
    pub pending: BTreeSet<String>,
}

#[derive(Debug, Default)]
struct Inner {
    fixture: RegistryFixture,
    unavailable: bool,
}

#[derive(Debug, Default)]
pub struct StaticRegistry {
    inner: Mutex<Inner>,
}

impl StaticRegistry {
    pub fn new() -> Self {
        StaticRegistry::default()
    }

    pub fn from_fixture(fixture: RegistryFixture) -> Self {
        StaticRegistry {
            inner: Mutex::new(Inner {
                fixture,
                unavailable: false,
            }),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let fixture = serde_json::from_str(json)
            .map_err(|err| RegistryError::InvalidResponse(format!("bad fixture: {}", err)))?;
        Ok(Self::from_fixture(fixture))
    }

    fn lock(&self) -> Result<MutexGuard<Inner>, RegistryError> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| RegistryError::InternalError("registry lock poisoned".into()))?;
        if inner.unavailable {
            return Err(RegistryError::TransportError(
                "registry marked unavailable".into(),
            ));
        }
        Ok(inner)
    }

    fn update<F: FnOnce(&mut Inner)>(&self, f: F) {
        let mut inner = match self.inner.lock() {
            Ok(inner) => inner,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut *inner)
    }

    pub fn add_job(&self, job: JobMetadata) {
        self.update(|inner| {
            inner.fixture.jobs.insert(job.work_id.clone(), job);
        })
    }

    pub fn set_service_level(&self, product_id: &str, service_level: &str) {
        self.update(|inner| {
            inner
                .fixture
                .service_levels
                .insert(product_id.to_string(), service_level.to_string());
        })
    }

    pub fn mark_unassignable(&self, job_id: &str) {
        self.update(|inner| {
            inner.fixture.unassignable.insert(job_id.to_string());
        })
    }

    pub fn mark_pending(&self, job_id: &str) {
        self.update(|inner| {
            inner.fixture.pending.insert(job_id.to_string());
        })
    }

    pub fn mark_done(&self, job_id: &str) {
        self.update(|inner| {
            inner.fixture.pending.remove(job_id);
        })
    }

    /// While unavailable, every lookup fails with a transport error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.update(|inner| inner.unavailable = unavailable)
    }
}

impl OffLedgerRegistry for StaticRegistry {
    fn job_exists(&self, job_id: &str, _technician_id: &str) -> Result<bool, RegistryError> {
        let inner = self.lock()?;
        Ok(inner.fixture.jobs.contains_key(job_id)
            && !inner.fixture.unassignable.contains(job_id))
    }

    fn lookup_job(&self, job_id: &str) -> Result<Option<JobMetadata>, RegistryError> {
        Ok(self.lock()?.fixture.jobs.get(job_id).cloned())
    }

    fn lookup_service_level(&self, product_id: &str) -> Result<Option<String>, RegistryError> {
        Ok(self.lock()?.fixture.service_levels.get(product_id).cloned())
    }

    fn is_job_done(&self, job_id: &str) -> Result<bool, RegistryError> {
        Ok(!self.lock()?.fixture.pending.contains(job_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "jobs": {
            "w-1": {
                "workId": "w-1",
                "productId": "p-1",
                "eventType": "bumpy",
                "address": "Storgatan 1",
                "startTime": "2023-06-01T08:00:00Z"
            }
        },
        "service_levels": { "p-1": "gold" },
        "pending": ["w-1"]
    }"#;

    #[test]
    fn fixture_answers() {
        let registry = StaticRegistry::from_json(FIXTURE).expect("Unable to load fixture");

        let job = registry.lookup_job("w-1").unwrap().expect("job missing");
        assert_eq!("p-1", job.product_id);
        assert_eq!("bumpy", job.event_type);
        assert!(registry.lookup_job("w-2").unwrap().is_none());

        assert!(registry.job_exists("w-1", "Org1MSP").unwrap());
        assert!(!registry.job_exists("w-2", "Org1MSP").unwrap());

        assert_eq!(
            Some("gold".to_string()),
            registry.lookup_service_level("p-1").unwrap()
        );
        assert!(!registry.is_job_done("w-1").unwrap());
        registry.mark_done("w-1");
        assert!(registry.is_job_done("w-1").unwrap());
    }

    #[test]
    fn unassignable_and_unavailable() {
        let registry = StaticRegistry::from_json(FIXTURE).expect("Unable to load fixture");
        registry.mark_unassignable("w-1");
        assert!(!registry.job_exists("w-1", "Org1MSP").unwrap());

        registry.set_unavailable(true);
        match registry.lookup_job("w-1") {
            Err(RegistryError::TransportError(_)) => (),
            res => panic!("Expected TransportError, got {:?}", res),
        }
    }
}
