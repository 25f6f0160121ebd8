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

//! The general contract: one job aggregate per technician.
//!
//! Taking a job looks the work up off-ledger, then has the sub-contract for the job's type create
//! it. Settling a job marks it done and credits the technician's monthly balance.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, SecondsFormat, Utc};

use crate::handler::{ApplyError, TransactionContext, TransactionHandler};
use crate::offledger::OffLedgerRegistry;
use crate::protocol::invocation::InvocationRequest;
use crate::protocol::{GeneralContract, Job, JobStatus, JobType, ServiceLevel};

use super::{invoke_checked, to_payload};

pub const GENERAL_CONTRACT: &str = "generalcontract";

pub const JOB_TAKEN_EVENT: &str = "generalcontract/job-taken";
pub const JOB_SETTLED_EVENT: &str = "generalcontract/job-settled";

/// Joins technician and job in settled-job keys. Technician ids may not contain it, so a
/// settled job never lands on an aggregate's key.
const SETTLED_KEY_SEPARATOR: char = '/';

/// Maps each job type to the contract that creates jobs of that type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobTypeRegistry {
    contracts: BTreeMap<JobType, String>,
}

impl Default for JobTypeRegistry {
    fn default() -> Self {
        JobTypeRegistry {
            contracts: JobType::ALL
                .iter()
                .map(|job_type| (*job_type, job_type.as_str().to_string()))
                .collect(),
        }
    }
}

impl JobTypeRegistry {
    pub fn with_contract(mut self, job_type: JobType, contract: &str) -> Self {
        self.contracts.insert(job_type, contract.to_string());
        self
    }

    /// The job type and contract for a registry tag.
    pub fn resolve(&self, tag: &str) -> Result<(JobType, &str), ApplyError> {
        let job_type: JobType = tag.parse()?;
        self.contracts
            .get(&job_type)
            .map(|contract| (job_type, contract.as_str()))
            .ok_or_else(|| {
                ApplyError::UnknownJobType(format!("no contract creates {} jobs", job_type))
            })
    }
}

/// The deadline for work starting at `start`. Without a known service level the start is kept.
pub fn job_deadline(start: DateTime<Utc>, service_level: Option<ServiceLevel>) -> DateTime<Utc> {
    match service_level {
        Some(level) => start + Duration::days(level.lead_days()),
        None => start,
    }
}

pub struct GeneralContractTransactionHandler {
    family_name: String,
    registry: Arc<dyn OffLedgerRegistry>,
    job_types: JobTypeRegistry,
}

impl GeneralContractTransactionHandler {
    pub fn new(registry: Arc<dyn OffLedgerRegistry>) -> GeneralContractTransactionHandler {
        GeneralContractTransactionHandler {
            family_name: GENERAL_CONTRACT.to_string(),
            registry,
            job_types: JobTypeRegistry::default(),
        }
    }

    pub fn with_job_types(mut self, job_types: JobTypeRegistry) -> Self {
        self.job_types = job_types;
        self
    }

    fn take_job(
        &self,
        request: &InvocationRequest,
        context: &mut dyn TransactionContext,
    ) -> Result<Vec<u8>, ApplyError> {
        request.expect_args(2, 2)?;
        let job_id = request.arg(0, "jobID")?;
        let technician_id = request.arg(1, "technicianID")?;

        let mut contract = GeneralContractState::new(context).require_contract(technician_id)?;
        if contract.has_job(job_id) {
            warn!(
                "Invalid transaction: technician {} already holds job {}",
                technician_id, job_id
            );
            return Err(ApplyError::DuplicateJob(format!(
                "technician {} already holds job {}",
                technician_id, job_id
            )));
        }

        let metadata = match self.registry.lookup_job(job_id)? {
            Some(metadata) if !metadata.work_id.is_empty() => metadata,
            _ => {
                warn!("Invalid transaction: job {} is unknown off-ledger", job_id);
                return Err(ApplyError::NotFoundExternally(format!(
                    "job {} is not known to the work registry",
                    job_id
                )));
            }
        };
        let (job_type, job_contract) = self.job_types.resolve(&metadata.event_type)?;

        let service_level = self
            .registry
            .lookup_service_level(&metadata.product_id)?
            .and_then(|tag| tag.parse::<ServiceLevel>().ok());
        let deadline = job_deadline(metadata.start_time, service_level);

        let payload = invoke_checked(
            context,
            job_contract,
            vec![
                "Create".into(),
                technician_id.to_string(),
                job_id.to_string(),
                metadata.product_id.clone(),
                metadata.address.clone(),
                deadline.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            ],
        )?;
        let job: Job = serde_json::from_slice(&payload)?;

        contract.add_job(job.clone());
        GeneralContractState::new(context).save_contract(&contract)?;
        context.add_event(
            JOB_TAKEN_EVENT.to_string(),
            vec![
                ("technician_id".into(), technician_id.to_string()),
                ("job_id".into(), job_id.to_string()),
                ("job_type".into(), job_type.to_string()),
            ],
            payload,
        )?;
        info!(
            "Technician {} took {} job {}",
            technician_id, job_type, job_id
        );
        to_payload(&job)
    }

    /// Marks the caller's job done and credits what `payout` says it earns.
    fn settle_job(
        &self,
        request: &InvocationRequest,
        context: &mut dyn TransactionContext,
        payout: fn(&Job) -> i64,
    ) -> Result<Vec<u8>, ApplyError> {
        request.expect_args(1, 1)?;
        let job_id = request.arg(0, "jobID")?;
        let technician_id = context.caller_identity().to_string();

        let mut contract = GeneralContractState::new(context).require_contract(&technician_id)?;
        if !self.registry.is_job_done(job_id)? {
            warn!(
                "Invalid transaction: job {} is not reported done",
                job_id
            );
            return Err(ApplyError::JobNotDone(format!(
                "job {} is not reported done",
                job_id
            )));
        }

        let mut job = require_job(&contract, job_id)?.clone();
        if job.status() == JobStatus::Done {
            warn!("Invalid transaction: job {} is already settled", job_id);
            return Err(ApplyError::AlreadySettled(format!(
                "job {} is already settled",
                job_id
            )));
        }

        job.set_status(JobStatus::Done);
        let amount = payout(&job);
        contract.credit(amount);
        if !contract.replace_job(job.clone()) {
            return Err(ApplyError::NotFound(format!(
                "technician {} has no job {}",
                technician_id, job_id
            )));
        }

        let mut state = GeneralContractState::new(context);
        state.save_settled_job(&technician_id, &job)?;
        state.save_contract(&contract)?;
        context.add_event(
            JOB_SETTLED_EVENT.to_string(),
            vec![
                ("technician_id".into(), technician_id.clone()),
                ("job_id".into(), job_id.to_string()),
                ("credit".into(), amount.to_string()),
            ],
            to_payload(&job)?,
        )?;
        info!(
            "Settled job {} for {}: credited {}, balance {}",
            job_id,
            technician_id,
            amount,
            contract.monthly_balance()
        );
        to_payload(&contract)
    }
}

impl TransactionHandler for GeneralContractTransactionHandler {
    fn family_name(&self) -> &str {
        &self.family_name
    }

    fn apply(
        &self,
        request: &InvocationRequest,
        context: &mut dyn TransactionContext,
    ) -> Result<Vec<u8>, ApplyError> {
        debug!(
            "General contract txn {}: {}",
            context.transaction_id(),
            request.function()
        );

        match request.function() {
            "CreateGeneralContract" => {
                request.expect_args(0, 0)?;
                apply_create_general_contract(context)
            }
            "TakeJob" => self.take_job(request, context),
            "JobDoneCorrectError" => {
                self.settle_job(request, context, |job| job.job_pay() + job.inspection_pay())
            }
            "JobDoneWrongError" => self.settle_job(request, context, |job| job.inspection_pay()),
            "ReadGeneralContract" => {
                request.expect_args(1, 1)?;
                to_payload(
                    &GeneralContractState::new(context)
                        .require_contract(request.arg(0, "technicianID")?)?,
                )
            }
            "ReadJob" => {
                request.expect_args(2, 2)?;
                let contract = GeneralContractState::new(context)
                    .require_contract(request.arg(1, "technicianID")?)?;
                to_payload(require_job(&contract, request.arg(0, "jobID")?)?)
            }
            "GetAllJobs" => {
                request.expect_args(0, 0)?;
                let technician_id = context.caller_identity().to_string();
                let contract =
                    GeneralContractState::new(context).require_contract(&technician_id)?;
                to_payload(contract.jobs())
            }
            other => Err(ApplyError::InvalidArgument(format!(
                "generalcontract has no entry point {}",
                other
            ))),
        }
    }
}

fn apply_create_general_contract(
    context: &mut dyn TransactionContext,
) -> Result<Vec<u8>, ApplyError> {
    let technician_id = context.caller_identity().to_string();
    let mut state = GeneralContractState::new(context);
    if state.get_contract(&technician_id)?.is_some() {
        warn!(
            "Invalid transaction: during CreateGeneralContract, {} already has a contract",
            technician_id
        );
        return Err(ApplyError::AlreadyExists(format!(
            "technician {} already has a general contract",
            technician_id
        )));
    }

    let contract = GeneralContract::new(&technician_id);
    state.save_contract(&contract)?;
    info!("Created general contract for {}", technician_id);
    to_payload(&contract)
}

fn require_job<'c>(contract: &'c GeneralContract, job_id: &str) -> Result<&'c Job, ApplyError> {
    contract.job(job_id).ok_or_else(|| {
        warn!(
            "Invalid transaction: technician {} has no job {}",
            contract.technician_id(),
            job_id
        );
        ApplyError::NotFound(format!(
            "technician {} has no job {}",
            contract.technician_id(),
            job_id
        ))
    })
}

/// Typed access to the aggregates and settled jobs in the general contract namespace.
pub struct GeneralContractState<'a> {
    context: &'a mut dyn TransactionContext,
}

impl<'a> GeneralContractState<'a> {
    pub fn new(context: &'a mut dyn TransactionContext) -> GeneralContractState<'a> {
        GeneralContractState { context }
    }

    pub fn get_contract(
        &mut self,
        technician_id: &str,
    ) -> Result<Option<GeneralContract>, ApplyError> {
        check_technician_id(technician_id)?;
        match self.context.get_state_entry(technician_id)? {
            Some(packed) => Ok(Some(serde_json::from_slice(&packed)?)),
            None => Ok(None),
        }
    }

    pub fn require_contract(&mut self, technician_id: &str) -> Result<GeneralContract, ApplyError> {
        self.get_contract(technician_id)?.ok_or_else(|| {
            warn!(
                "Invalid transaction: technician {} has no general contract",
                technician_id
            );
            ApplyError::NotFound(format!(
                "technician {} has no general contract",
                technician_id
            ))
        })
    }

    pub fn save_contract(&mut self, contract: &GeneralContract) -> Result<(), ApplyError> {
        self.context.set_state_entry(
            contract.technician_id().to_string(),
            to_payload(contract)?,
        )?;
        Ok(())
    }

    pub fn save_settled_job(&mut self, technician_id: &str, job: &Job) -> Result<(), ApplyError> {
        self.context
            .set_state_entry(settled_job_key(technician_id, job.id()), to_payload(job)?)?;
        Ok(())
    }
}

pub fn settled_job_key(technician_id: &str, job_id: &str) -> String {
    format!("{}{}{}", technician_id, SETTLED_KEY_SEPARATOR, job_id)
}

fn check_technician_id(technician_id: &str) -> Result<(), ApplyError> {
    if technician_id.is_empty() || technician_id.contains(SETTLED_KEY_SEPARATOR) {
        warn!(
            "Invalid transaction: '{}' is not a valid technician id",
            technician_id
        );
        return Err(ApplyError::InvalidArgument(format!(
            "technician id '{}' must be non-empty and must not contain '{}'",
            technician_id, SETTLED_KEY_SEPARATOR
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 6, 1, 8, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn deadline_follows_service_level() {
        assert_eq!(
            "2023-06-08T08:00:00Z",
            job_deadline(start(), Some(ServiceLevel::Standard))
                .to_rfc3339_opts(SecondsFormat::AutoSi, true)
        );
        assert_eq!(
            start() + Duration::days(5),
            job_deadline(start(), Some(ServiceLevel::Gold))
        );
        assert_eq!(
            start() + Duration::days(3),
            job_deadline(start(), Some(ServiceLevel::Platinum))
        );
        assert_eq!(start(), job_deadline(start(), None));
    }

    #[test]
    fn job_types_resolve_to_contracts() {
        let job_types = JobTypeRegistry::default().with_contract(JobType::Razor, "razor-v2");

        assert_eq!(
            (JobType::Bumpy, "bumpy"),
            job_types.resolve("bumpy").unwrap()
        );
        assert_eq!(
            (JobType::Razor, "razor-v2"),
            job_types.resolve("razor").unwrap()
        );
        match job_types.resolve("hedge") {
            Err(ApplyError::UnknownJobType(_)) => (),
            res => panic!("Expected UnknownJobType, got {:?}", res),
        }
    }

    #[test]
    fn settled_jobs_are_keyed_by_technician() {
        assert_eq!("Org1MSP/w-1", settled_job_key("Org1MSP", "w-1"));
    }

    #[test]
    fn technician_ids_cannot_look_like_settled_keys() {
        assert!(check_technician_id("Org1MSP").is_ok());
        for bad in ["", "Org1MSP/w-1", "/"].iter() {
            match check_technician_id(bad) {
                Err(ApplyError::InvalidArgument(_)) => (),
                res => panic!("Expected InvalidArgument for '{}', got {:?}", bad, res),
            }
        }
    }
}
