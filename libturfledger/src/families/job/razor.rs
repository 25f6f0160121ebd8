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
use crate::protocol::job::JobBuilder;
use crate::protocol::{Job, JobStatus, JobType};

use super::{CreateJobArgs, JobRecord};

const RAZOR_PAY: i64 = 150;

/// A razor job: one flat pay, no inspection pay. The area is what the general contract knows as
/// the address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RazorJob {
    #[serde(rename = "Type")]
    job_type: JobType,
    status: JobStatus,
    pay: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    deadline: Option<DateTime<Utc>>,
    #[serde(rename = "ID")]
    id: String,
    mower: String,
    area: String,
    #[serde(default)]
    location: String,
}

impl JobRecord for RazorJob {
    const JOB_TYPE: JobType = JobType::Razor;

    fn create(args: CreateJobArgs) -> Result<Self, ApplyError> {
        let area = args.address;
        Ok(RazorJob {
            job_type: JobType::Razor,
            status: JobStatus::Ongoing,
            pay: RAZOR_PAY,
            deadline: args.deadline,
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
}
