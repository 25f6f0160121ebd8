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

//! Contains the components that execute a `Transaction` against state.
//!
//! Contracts are deployed into a `ContractRegistry` by name. The `Executor` runs each transaction
//! against a snapshot of the head state, letting contracts invoke each other synchronously
//! through an `ExecutionContext`, and commits the resulting change set only if everything the
//! transaction read is still current.

mod context;
mod error;
mod executor;

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::handler::TransactionHandler;

pub use self::context::{ExecutionContext, MAX_INVOCATION_DEPTH};
pub use self::error::ExecutionError;
pub use self::executor::{Executor, SimulatedTransaction};

/// The contracts an executor can dispatch to, by name.
#[derive(Clone, Default)]
pub struct ContractRegistry {
    contracts: BTreeMap<String, Arc<dyn TransactionHandler>>,
}

impl ContractRegistry {
    pub fn new() -> Self {
        ContractRegistry::default()
    }

    /// Deploys `handler` under its family name, replacing any contract deployed under the same
    /// name.
    pub fn register(&mut self, handler: Arc<dyn TransactionHandler>) {
        let name = handler.family_name().to_string();
        if self.contracts.insert(name.clone(), handler).is_some() {
            warn!("Replaced contract {}", name);
        } else {
            info!("Deployed contract {}", name);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn TransactionHandler>> {
        self.contracts.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.contracts.keys().map(String::as_str)
    }
}
