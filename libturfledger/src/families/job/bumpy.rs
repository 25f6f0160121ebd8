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

use serde::{Deserialize, Serialize};

use crate::handler::ApplyError;
use crate::protocol::job::JobBuilder;
use crate::protocol::{Job, JobStatus, JobType};

use super::{CreateJobArgs, JobRecord};

const BUMPY_JOB_PAY: i64 = 50;
const BUMPY_INSPECTION_PAY: i64 = 50;

/// A bumpy-lawn job. The record is the projection itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BumpyJob(Job);

impl JobRecord for BumpyJob {
    const JOB_TYPE: JobType = JobType::Bumpy;

    fn create(args: CreateJobArgs) -> Result<Self, ApplyError> {
        let job = JobBuilder::new()
            .with_job_type(JobType::Bumpy)
            .with_status(JobStatus::Ongoing)
            .with_job_pay(BUMPY_JOB_PAY)
            .with_inspection_pay(BUMPY_INSPECTION_PAY)
            .with_deadline(args.deadline)
            .with_id(args.job_id)
            .with_mower(args.mower)
            .with_address(args.address)
            .build()?;
        Ok(BumpyJob(job))
    }

    fn id(&self) -> &str {
        self.0.id()
    }

    fn project(&self) -> Result<Job, ApplyError> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bumpy_pays_fifty_and_fifty() {
        let job = BumpyJob::create(CreateJobArgs {
            technician_id: "Org1MSP".into(),
            job_id: "w-1".into(),
            mower: "p-1".into(),
            address: "Storgatan 1".into(),
            deadline: None,
            location: None,
            inspect_job: None,
        })
        .unwrap()
        .project()
        .unwrap();

        assert_eq!(JobType::Bumpy, job.job_type());
        assert_eq!(JobStatus::Ongoing, job.status());
        assert_eq!(50, job.job_pay());
        assert_eq!(50, job.inspection_pay());
        assert_eq!("Storgatan 1", job.address());
    }
}
