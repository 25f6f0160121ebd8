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

//! Structs for transactions, contract invocations, receipts and the records the contracts store.
//!
//! A transaction names a contract and its arguments. Executing it produces a transaction
//! receipt. Records are stored as JSON so that payloads returned across contract invocations can
//! be decoded by any caller.

pub mod invocation;
pub mod job;
pub mod receipt;
pub mod sla;
pub mod transaction;

use std::error::Error as StdError;

pub use crate::protocol::job::{GeneralContract, Job, JobStatus, JobType, ParseJobTypeError};
pub use crate::protocol::sla::{Customer, ParseServiceLevelError, ServiceLevel, Sla};

/// Returned by the protocol builders when a required field is missing.
#[derive(Debug)]
pub enum ProtocolBuildError {
    MissingField(String),
}

impl StdError for ProtocolBuildError {}

impl std::fmt::Display for ProtocolBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            ProtocolBuildError::MissingField(ref s) => write!(f, "MissingField: {}", s),
        }
    }
}
