/*
 * Copyright 2017 Bitwise IO, Inc.
 * Copyright 2019 Cargill Incorporated
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 * -----------------------------------------------------------------------------
 */

use std::error::Error;

use crate::offledger::RegistryError;
use crate::protocol::{ParseJobTypeError, ParseServiceLevelError, ProtocolBuildError};

/// Errors returned by a contract entry point. Any of these aborts the transaction.
#[derive(Debug)]
pub enum ApplyError {
    /// The record being created is already present in state.
    AlreadyExists(String),
    /// An aggregate, job, customer or SLA is absent from state.
    NotFound(String),
    /// The off-ledger registry has no metadata for the requested job.
    NotFoundExternally(String),
    /// The job is already part of the technician's aggregate.
    DuplicateJob(String),
    /// The job has already been settled.
    AlreadySettled(String),
    /// The off-ledger registry does not report the job as finished.
    JobNotDone(String),
    /// The off-ledger registry refused the job assignment.
    NotAssignable(String),
    InvalidServiceLevel(String),
    UnknownJobType(String),
    /// A nested contract invocation returned a non-success status.
    SubcontractInvocationFailed { contract: String, detail: String },
    /// Talking to the off-ledger registry failed.
    ExternalLookupFailed(String),
    /// The valuation parameters would divide by zero or overflow.
    ArithmeticHazard(String),
    /// Missing, malformed or unknown transaction arguments.
    InvalidArgument(String),
    /// The entry point may only be reached through another contract.
    PermissionDenied(String),
    SerializationError(String),
    ContextError(ContextError),
}

impl ApplyError {
    /// Returns true for failures caused by the environment rather than by the transaction.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            ApplyError::ExternalLookupFailed(_)
                | ApplyError::SerializationError(_)
                | ApplyError::ContextError(_)
        )
    }
}

impl Error for ApplyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ApplyError::ContextError(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for ApplyError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            ApplyError::AlreadyExists(ref s) => write!(f, "AlreadyExists: {}", s),
            ApplyError::NotFound(ref s) => write!(f, "NotFound: {}", s),
            ApplyError::NotFoundExternally(ref s) => write!(f, "NotFoundExternally: {}", s),
            ApplyError::DuplicateJob(ref s) => write!(f, "DuplicateJob: {}", s),
            ApplyError::AlreadySettled(ref s) => write!(f, "AlreadySettled: {}", s),
            ApplyError::JobNotDone(ref s) => write!(f, "JobNotDone: {}", s),
            ApplyError::NotAssignable(ref s) => write!(f, "NotAssignable: {}", s),
            ApplyError::InvalidServiceLevel(ref s) => write!(f, "InvalidServiceLevel: {}", s),
            ApplyError::UnknownJobType(ref s) => write!(f, "UnknownJobType: {}", s),
            ApplyError::SubcontractInvocationFailed {
                ref contract,
                ref detail,
            } => write!(
                f,
                "SubcontractInvocationFailed: {} returned: {}",
                contract, detail
            ),
            ApplyError::ExternalLookupFailed(ref s) => write!(f, "ExternalLookupFailed: {}", s),
            ApplyError::ArithmeticHazard(ref s) => write!(f, "ArithmeticHazard: {}", s),
            ApplyError::InvalidArgument(ref s) => write!(f, "InvalidArgument: {}", s),
            ApplyError::PermissionDenied(ref s) => write!(f, "PermissionDenied: {}", s),
            ApplyError::SerializationError(ref s) => write!(f, "SerializationError: {}", s),
            ApplyError::ContextError(ref err) => write!(f, "ContextError: {}", err),
        }
    }
}

impl From<ContextError> for ApplyError {
    fn from(context_error: ContextError) -> Self {
        ApplyError::ContextError(context_error)
    }
}

impl From<RegistryError> for ApplyError {
    fn from(err: RegistryError) -> Self {
        ApplyError::ExternalLookupFailed(err.to_string())
    }
}

impl From<ParseServiceLevelError> for ApplyError {
    fn from(err: ParseServiceLevelError) -> Self {
        ApplyError::InvalidServiceLevel(err.to_string())
    }
}

impl From<ParseJobTypeError> for ApplyError {
    fn from(err: ParseJobTypeError) -> Self {
        ApplyError::UnknownJobType(err.to_string())
    }
}

impl From<ProtocolBuildError> for ApplyError {
    fn from(err: ProtocolBuildError) -> Self {
        ApplyError::SerializationError(err.to_string())
    }
}

impl From<serde_json::Error> for ApplyError {
    fn from(err: serde_json::Error) -> Self {
        ApplyError::SerializationError(err.to_string())
    }
}

#[derive(Debug)]
pub enum ContextError {
    /// Returned when the underlying state could not be read
    StateReadError(String),
    /// Returned when a nested invocation cannot be dispatched
    InvocationError(String),
    /// Returned when there is an issue adding an event to the transaction
    TransactionReceiptError(String),
}

impl Error for ContextError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

impl std::fmt::Display for ContextError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            ContextError::StateReadError(ref s) => write!(f, "StateReadError: {}", s),
            ContextError::InvocationError(ref s) => write!(f, "InvocationError: {}", s),
            ContextError::TransactionReceiptError(ref s) => {
                write!(f, "TransactionReceiptError: {}", s)
            }
        }
    }
}
