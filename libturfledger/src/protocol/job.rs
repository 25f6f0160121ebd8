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

//! Job records and the per-technician general contract that aggregates them.

use std::collections::BTreeSet;
use std::error::Error as StdError;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ProtocolBuildError;

/// The closed set of job kinds. Each kind is handled by its own sub-contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    Bumpy,
    Razor,
    Inspect,
}

impl JobType {
    pub const ALL: [JobType; 3] = [JobType::Bumpy, JobType::Razor, JobType::Inspect];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::Bumpy => "bumpy",
            JobType::Razor => "razor",
            JobType::Inspect => "inspect",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseJobTypeError(String);

impl StdError for ParseJobTypeError {}

impl fmt::Display for ParseJobTypeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown job type '{}'", self.0)
    }
}

impl FromStr for JobType {
    type Err = ParseJobTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bumpy" => Ok(JobType::Bumpy),
            "razor" => Ok(JobType::Razor),
            "inspect" => Ok(JobType::Inspect),
            _ => Err(ParseJobTypeError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Ongoing,
    Done,
}

/// A job as held in a technician's general contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Job {
    #[serde(rename = "Type")]
    job_type: JobType,
    status: JobStatus,
    job_pay: i64,
    inspection_pay: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    deadline: Option<DateTime<Utc>>,
    #[serde(rename = "ID")]
    id: String,
    mower: String,
    address: String,
}

impl Job {
    pub fn job_type(&self) -> JobType {
        self.job_type
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn job_pay(&self) -> i64 {
        self.job_pay
    }

    pub fn inspection_pay(&self) -> i64 {
        self.inspection_pay
    }

    pub fn deadline(&self) -> Option<&DateTime<Utc>> {
        self.deadline.as_ref()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn mower(&self) -> &str {
        &self.mower
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn set_status(&mut self, status: JobStatus) {
        self.status = status;
    }
}

#[derive(Default, Clone)]
pub struct JobBuilder {
    job_type: Option<JobType>,
    status: Option<JobStatus>,
    job_pay: Option<i64>,
    inspection_pay: Option<i64>,
    deadline: Option<DateTime<Utc>>,
    id: Option<String>,
    mower: Option<String>,
    address: Option<String>,
}

impl JobBuilder {
    pub fn new() -> Self {
        JobBuilder::default()
    }

    pub fn with_job_type(mut self, job_type: JobType) -> JobBuilder {
        self.job_type = Some(job_type);
        self
    }

    pub fn with_status(mut self, status: JobStatus) -> JobBuilder {
        self.status = Some(status);
        self
    }

    pub fn with_job_pay(mut self, job_pay: i64) -> JobBuilder {
        self.job_pay = Some(job_pay);
        self
    }

    pub fn with_inspection_pay(mut self, inspection_pay: i64) -> JobBuilder {
        self.inspection_pay = Some(inspection_pay);
        self
    }

    pub fn with_deadline(mut self, deadline: Option<DateTime<Utc>>) -> JobBuilder {
        self.deadline = deadline;
        self
    }

    pub fn with_id(mut self, id: String) -> JobBuilder {
        self.id = Some(id);
        self
    }

    pub fn with_mower(mut self, mower: String) -> JobBuilder {
        self.mower = Some(mower);
        self
    }

    pub fn with_address(mut self, address: String) -> JobBuilder {
        self.address = Some(address);
        self
    }

    pub fn build(self) -> Result<Job, ProtocolBuildError> {
        let job_type = self.job_type.ok_or_else(|| {
            ProtocolBuildError::MissingField("'job_type' field is required".to_string())
        })?;
        let id = self
            .id
            .ok_or_else(|| ProtocolBuildError::MissingField("'id' field is required".to_string()))?;

        Ok(Job {
            job_type,
            status: self.status.unwrap_or(JobStatus::Ongoing),
            job_pay: self.job_pay.unwrap_or(0),
            inspection_pay: self.inspection_pay.unwrap_or(0),
            deadline: self.deadline,
            id,
            mower: self.mower.unwrap_or_default(),
            address: self.address.unwrap_or_default(),
        })
    }
}

/// The per-technician aggregate of jobs and earnings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GeneralContract {
    #[serde(rename = "TechnicianID")]
    technician_id: String,
    monthly_balance: i64,
    jobs: Vec<Job>,
    job_authority: BTreeSet<String>,
}

impl GeneralContract {
    /// An empty aggregate for `technician_id`.
    pub fn new(technician_id: &str) -> Self {
        GeneralContract {
            technician_id: technician_id.to_string(),
            monthly_balance: 0,
            jobs: Vec::new(),
            job_authority: BTreeSet::new(),
        }
    }

    pub fn technician_id(&self) -> &str {
        &self.technician_id
    }

    pub fn monthly_balance(&self) -> i64 {
        self.monthly_balance
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn job_authority(&self) -> &BTreeSet<String> {
        &self.job_authority
    }

    pub fn job(&self, job_id: &str) -> Option<&Job> {
        self.jobs.iter().find(|job| job.id() == job_id)
    }

    pub fn has_job(&self, job_id: &str) -> bool {
        self.job(job_id).is_some()
    }

    pub fn add_job(&mut self, job: Job) {
        self.jobs.push(job);
    }

    /// Replaces the job with the same id. Returns false if there is none.
    pub fn replace_job(&mut self, job: Job) -> bool {
        match self.jobs.iter_mut().find(|existing| existing.id() == job.id()) {
            Some(existing) => {
                *existing = job;
                true
            }
            None => false,
        }
    }

    pub fn credit(&mut self, amount: i64) {
        self.monthly_balance += amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bumpy_job(id: &str) -> Job {
        JobBuilder::new()
            .with_job_type(JobType::Bumpy)
            .with_job_pay(50)
            .with_inspection_pay(50)
            .with_id(id.into())
            .with_mower("mower-1".into())
            .with_address("Storgatan 1".into())
            .build()
            .expect("Unable to build job")
    }

    #[test]
    fn job_json_uses_ledger_field_names() {
        let job = JobBuilder::new()
            .with_job_type(JobType::Razor)
            .with_job_pay(150)
            .with_deadline(Utc.with_ymd_and_hms(2023, 6, 1, 8, 0, 0).single())
            .with_id("w-1".into())
            .build()
            .expect("Unable to build job");

        let json = serde_json::to_value(&job).expect("Unable to serialize job");

        assert_eq!("razor", json["Type"]);
        assert_eq!("Ongoing", json["Status"]);
        assert_eq!(150, json["JobPay"]);
        assert_eq!(0, json["InspectionPay"]);
        assert_eq!("2023-06-01T08:00:00Z", json["Deadline"]);
        assert_eq!("w-1", json["ID"]);
    }

    #[test]
    fn missing_deadline_is_omitted() {
        let json = serde_json::to_value(&bumpy_job("w-2")).expect("Unable to serialize job");

        assert!(json.get("Deadline").is_none());
        let parsed: Job = serde_json::from_value(json).expect("Unable to parse job");
        assert_eq!(None, parsed.deadline());
    }

    #[test]
    fn job_type_parses_known_tags_only() {
        assert_eq!(Ok(JobType::Inspect), "inspect".parse());
        assert!("Bumpy".parse::<JobType>().is_err());
        assert!("mowing".parse::<JobType>().is_err());
    }

    #[test]
    fn replace_job_by_id() {
        let mut gc = GeneralContract::new("Org1MSP");
        gc.add_job(bumpy_job("w-1"));

        let mut done = bumpy_job("w-1");
        done.set_status(JobStatus::Done);
        assert!(gc.replace_job(done));
        assert_eq!(Some(JobStatus::Done), gc.job("w-1").map(Job::status));

        assert!(!gc.replace_job(bumpy_job("w-9")));
        assert_eq!(1, gc.jobs().len());
    }

    #[test]
    fn general_contract_json() {
        let gc = GeneralContract::new("Org1MSP");
        let json = serde_json::to_string(&gc).expect("Unable to serialize general contract");

        assert_eq!(
            r#"{"TechnicianID":"Org1MSP","MonthlyBalance":0,"Jobs":[],"JobAuthority":[]}"#,
            json
        );
    }
}
