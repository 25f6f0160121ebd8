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

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::handler::ApplyError;
use crate::protocol::invocation::InvocationRequest;
use crate::protocol::job::JobBuilder;
use crate::protocol::{Job, JobStatus, JobType};

use super::{to_payload, CreateJobArgs, JobRecord, JobState};

const INSPECT_PAY: i64 = 50;

/// An inspection of another job. `IncorrectError` records that the inspected work was not at
/// fault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InspectJob {
    #[serde(rename = "Type")]
    job_type: JobType,
    status: JobStatus,
    correct_error: bool,
    pay: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    deadline: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inspect_job: Option<String>,
    #[serde(rename = "ID")]
    id: String,
    mower: String,
    area: String,
    #[serde(default)]
    location: String,
}

impl InspectJob {
    pub fn correct_error(&self) -> bool {
        self.correct_error
    }

    pub fn inspect_job(&self) -> Option<&str> {
        self.inspect_job.as_deref()
    }
}

impl JobRecord for InspectJob {
    const JOB_TYPE: JobType = JobType::Inspect;

    fn create(args: CreateJobArgs) -> Result<Self, ApplyError> {
        let area = args.address;
        Ok(InspectJob {
            job_type: JobType::Inspect,
            status: JobStatus::Ongoing,
            correct_error: true,
            pay: INSPECT_PAY,
            deadline: args.deadline,
            inspect_job: args.inspect_job,
            id: args.job_id,
            mower: args.mower,
            location: args.location.unwrap_or_else(|| area.clone()),
            area,
        })
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn project(&self) -> Result<Job, ApplyError> {
        Ok(JobBuilder::new()
            .with_job_type(self.job_type)
            .with_status(self.status)
            .with_job_pay(self.pay)
            .with_inspection_pay(0)
            .with_deadline(self.deadline)
            .with_id(self.id.clone())
            .with_mower(self.mower.clone())
            .with_address(self.area.clone())
            .build()?)
    }

    fn apply_extra(
        request: &InvocationRequest,
        state: &mut JobState<Self>,
    ) -> Result<Vec<u8>, ApplyError> {
        match request.function() {
            "IncorrectError" => {
                request.expect_args(2, 2)?;
                let technician_id = request.arg(0, "technicianID")?;
                let job_id = request.arg(1, "jobID")?;

                let mut job = state.require_job(job_id)?;
                job.correct_error = false;
                state.save_job(&job)?;
                info!(
                    "Inspection {} marked incorrect by {}",
                    job_id, technician_id
                );
                to_payload(&job)
            }
            other => Err(ApplyError::InvalidArgument(format!(
                "inspect has no entry point {}",
                other
            ))),
        }
    }
}
