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

use std::error::Error;
use std::fmt;

use crate::state::{StateReadError, StateWriteError};

#[derive(Debug)]
pub enum ExecutionError {
    /// No contract is deployed under the requested name.
    UnknownContract(String),
    /// A value the transaction read changed before its changes could be committed.
    StaleReadSet(String),
    StateReadError(StateReadError),
    StateWriteError(StateWriteError),
    InternalError(String),
}

impl Error for ExecutionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ExecutionError::StateReadError(err) => Some(err),
            ExecutionError::StateWriteError(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExecutionError::UnknownContract(name) => write!(f, "unknown contract: {}", name),
            ExecutionError::StaleReadSet(txn_id) => {
                write!(f, "read set of transaction {} is stale", txn_id)
            }
            ExecutionError::StateReadError(err) => write!(f, "state read failed: {}", err),
            ExecutionError::StateWriteError(err) => write!(f, "state write failed: {}", err),
            ExecutionError::InternalError(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl From<StateReadError> for ExecutionError {
    fn from(err: StateReadError) -> Self {
        ExecutionError::StateReadError(err)
    }
}

impl From<StateWriteError> for ExecutionError {
    fn from(err: StateWriteError) -> Self {
        ExecutionError::StateWriteError(err)
    }
}
