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

//! Job sub-contracts.
//!
//! Each job type is its own contract with its own record shape. They share one handler,
//! `JobSubContract`, parameterized by the record type: creation checks that the job is new on
//! the ledger and assignable off it, stores the record, and answers with the `Job` projection the
//! general contract keeps.

mod bumpy;
mod inspect;
mod razor;

use std::marker::PhantomData;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::handler::{ApplyError, TransactionContext, TransactionHandler};
use crate::offledger::OffLedgerRegistry;
use crate::protocol::invocation::InvocationRequest;
use crate::protocol::{Job, JobType};

use super::general_contract::GENERAL_CONTRACT;
use super::{require_invoked_by, to_payload};

pub use self::bumpy::BumpyJob;
pub use self::inspect::InspectJob;
pub use self::razor::RazorJob;

/// The arguments of a sub-contract's `Create` entry point.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateJobArgs {
    pub technician_id: String,
    pub job_id: String,
    pub mower: String,
    pub address: String,
    pub deadline: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub inspect_job: Option<String>,
}

impl CreateJobArgs {
    /// Reads `(technicianID, jobID, mower, address[, deadline[, location[, inspectJob]]])`.
    /// Empty optional arguments count as absent.
    pub fn from_request(request: &InvocationRequest) -> Result<Self, ApplyError> {
        request.expect_args(4, 7)?;
        let optional = |index| {
            request
                .optional_arg(index)
                .filter(|arg: &&str| !arg.is_empty())
        };

        let deadline = match optional(4) {
            Some(raw) => Some(
                DateTime::parse_from_rfc3339(raw)
                    .map_err(|err| {
                        ApplyError::InvalidArgument(format!("bad deadline '{}': {}", raw, err))
                    })?
                    .with_timezone(&Utc),
            ),
            None => None,
        };

        Ok(CreateJobArgs {
            technician_id: request.arg(0, "technicianID")?.to_string(),
            job_id: request.arg(1, "jobID")?.to_string(),
            mower: request.arg(2, "mower")?.to_string(),
            address: request.arg(3, "address")?.to_string(),
            deadline,
            location: optional(5).map(str::to_string),
            inspect_job: optional(6).map(str::to_string),
        })
    }
}

/// A job record owned by one sub-contract.
pub trait JobRecord: Serialize + DeserializeOwned + Sized {
    const JOB_TYPE: JobType;

    /// A new, ongoing record.
    fn create(args: CreateJobArgs) -> Result<Self, ApplyError>;

    fn id(&self) -> &str;

    /// The record as the general contract sees it.
    fn project(&self) -> Result<Job, ApplyError>;

    /// Entry points beyond the shared ones.
    fn apply_extra(
        request: &InvocationRequest,
        _state: &mut JobState<Self>,
    ) -> Result<Vec<u8>, ApplyError> {
        Err(ApplyError::InvalidArgument(format!(
            "{} has no entry point {}",
            Self::JOB_TYPE,
            request.function()
        )))
    }
}

pub struct JobSubContract<R> {
    family_name: String,
    general_contract: String,
    registry: Arc<dyn OffLedgerRegistry>,
    _record: PhantomData<fn() -> R>,
}

impl<R: JobRecord> JobSubContract<R> {
    pub fn new(registry: Arc<dyn OffLedgerRegistry>) -> Self {
        JobSubContract {
            family_name: R::JOB_TYPE.as_str().to_string(),
            general_contract: GENERAL_CONTRACT.to_string(),
            registry,
            _record: PhantomData,
        }
    }

    pub fn with_family_name(mut self, family_name: &str) -> Self {
        self.family_name = family_name.to_string();
        self
    }

    /// Accepts `Create` only from the contract deployed as `general_contract`.
    pub fn with_general_contract(mut self, general_contract: &str) -> Self {
        self.general_contract = general_contract.to_string();
        self
    }

    fn create(
        &self,
        request: &InvocationRequest,
        state: &mut JobState<R>,
    ) -> Result<Vec<u8>, ApplyError> {
        let args = CreateJobArgs::from_request(request)?;

        if state.job_exists_on_ledger(&args.job_id)? {
            warn!(
                "Invalid transaction: during Create, {} job {} already exists",
                self.family_name, args.job_id
            );
            return Err(ApplyError::AlreadyExists(format!(
                "job {} already exists on ledger",
                args.job_id
            )));
        }

        if !self
            .registry
            .job_exists(&args.job_id, &args.technician_id)?
        {
            warn!(
                "Invalid transaction: job {} cannot be assigned to {}",
                args.job_id, args.technician_id
            );
            return Err(ApplyError::NotAssignable(format!(
                "job {} cannot be assigned to {}",
                args.job_id, args.technician_id
            )));
        }

        let record = R::create(args)?;
        state.save_job(&record)?;
        info!("Created {} job {}", self.family_name, record.id());
        to_payload(&record.project()?)
    }
}

impl<R: JobRecord> TransactionHandler for JobSubContract<R> {
    fn family_name(&self) -> &str {
        &self.family_name
    }

    fn apply(
        &self,
        request: &InvocationRequest,
        context: &mut dyn TransactionContext,
    ) -> Result<Vec<u8>, ApplyError> {
        debug!(
            "{} txn {}: {}",
            self.family_name,
            context.transaction_id(),
            request.function()
        );
        if request.function() == "Create" {
            require_invoked_by(context, &self.general_contract, "Create")?;
        }
        let mut state = JobState::<R>::new(context);

        match request.function() {
            "Create" => self.create(request, &mut state),
            "JobExistsOnLedger" => {
                request.expect_args(1, 1)?;
                to_payload(&state.job_exists_on_ledger(request.arg(0, "jobID")?)?)
            }
            "ReadJob" => {
                request.expect_args(1, 1)?;
                to_payload(&state.require_job(request.arg(0, "jobID")?)?)
            }
            _ => R::apply_extra(request, &mut state),
        }
    }
}

/// Typed access to one sub-contract's job records.
pub struct JobState<'a, R> {
    context: &'a mut dyn TransactionContext,
    _record: PhantomData<R>,
}

impl<'a, R: JobRecord> JobState<'a, R> {
    pub fn new(context: &'a mut dyn TransactionContext) -> JobState<'a, R> {
        JobState {
            context,
            _record: PhantomData,
        }
    }

    pub fn get_job(&mut self, job_id: &str) -> Result<Option<R>, ApplyError> {
        match self.context.get_state_entry(job_id)? {
            Some(packed) => Ok(Some(serde_json::from_slice(&packed)?)),
            None => Ok(None),
        }
    }

    pub fn require_job(&mut self, job_id: &str) -> Result<R, ApplyError> {
        self.get_job(job_id)?.ok_or_else(|| {
            warn!(
                "Invalid transaction: {} job {} does not exist",
                R::JOB_TYPE,
                job_id
            );
            ApplyError::NotFound(format!("{} job {} does not exist", R::JOB_TYPE, job_id))
        })
    }

    pub fn job_exists_on_ledger(&mut self, job_id: &str) -> Result<bool, ApplyError> {
        Ok(self.get_job(job_id)?.is_some())
    }

    pub fn save_job(&mut self, record: &R) -> Result<(), ApplyError> {
        self.context
            .set_state_entry(record.id().to_string(), to_payload(record)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(args: &[&str]) -> InvocationRequest {
        let mut raw = vec!["Create".to_string()];
        raw.extend(args.iter().map(|s| s.to_string()));
        InvocationRequest::from_args(&raw).expect("Unable to build request")
    }

    #[test]
    fn create_args_with_deadline() {
        let args = CreateJobArgs::from_request(&request(&[
            "Org1MSP",
            "w-1",
            "p-1",
            "Storgatan 1",
            "2023-06-06T10:00:00+02:00",
        ]))
        .unwrap();

        assert_eq!("w-1", args.job_id);
        assert_eq!(
            "2023-06-06T08:00:00+00:00",
            args.deadline.map(|d| d.to_rfc3339()).unwrap_or_default()
        );
        assert_eq!(None, args.location);
    }

    #[test]
    fn empty_optionals_are_absent() {
        let args = CreateJobArgs::from_request(&request(&[
            "Org1MSP", "w-1", "p-1", "Field 4", "", "", "w-0",
        ]))
        .unwrap();

        assert_eq!(None, args.deadline);
        assert_eq!(None, args.location);
        assert_eq!(Some("w-0".to_string()), args.inspect_job);
    }

    #[test]
    fn bad_deadline_is_invalid() {
        match CreateJobArgs::from_request(&request(&[
            "Org1MSP",
            "w-1",
            "p-1",
            "Storgatan 1",
            "next tuesday",
        ])) {
            Err(ApplyError::InvalidArgument(_)) => (),
            res => panic!("Expected InvalidArgument, got {:?}", res),
        }
    }

    #[test]
    fn too_few_args_are_invalid() {
        assert!(CreateJobArgs::from_request(&request(&["Org1MSP", "w-1"])).is_err());
    }
}
