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

use std::sync::{Arc, Mutex, MutexGuard};

use crate::context::Context;
use crate::handler::TransactionHandler;
use crate::protocol::invocation::{InvocationRequest, InvocationResponse};
use crate::protocol::receipt::TransactionReceipt;
use crate::protocol::transaction::{Transaction, TransactionBuilder};
use crate::state::{Read, Write};

use super::{ContractRegistry, ExecutionContext, ExecutionError};

#[derive(Debug, Clone)]
enum Outcome {
    Valid(Vec<u8>),
    Invalid(InvocationResponse),
}

/// A transaction that has run against a snapshot but has not been committed.
#[derive(Debug, Clone)]
pub struct SimulatedTransaction {
    transaction_id: String,
    context: Context,
    outcome: Outcome,
}

impl SimulatedTransaction {
    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    /// The state id the transaction was simulated against.
    pub fn base_state_id(&self) -> &str {
        self.context.state_id()
    }

    pub fn is_valid(&self) -> bool {
        matches!(self.outcome, Outcome::Valid(_))
    }

    pub fn response(&self) -> InvocationResponse {
        match &self.outcome {
            Outcome::Valid(payload) => InvocationResponse::success(payload.clone()),
            Outcome::Invalid(response) => response.clone(),
        }
    }
}

/// Runs transactions against a state store and commits their results.
///
/// The executor owns the head state id. Simulation reads a snapshot and never blocks other
/// simulations; commit validates the read set against the current head under a lock, so an
/// executor can be shared between threads.
pub struct Executor<S> {
    state: S,
    contracts: ContractRegistry,
    head: Mutex<String>,
}

impl<S> Executor<S>
where
    S: Read<StateId = String> + Write<StateId = String>,
{
    pub fn new(state: S, initial_state_id: String) -> Self {
        Executor {
            state,
            contracts: ContractRegistry::new(),
            head: Mutex::new(initial_state_id),
        }
    }

    pub fn with_contracts(mut self, contracts: ContractRegistry) -> Self {
        self.contracts = contracts;
        self
    }

    pub fn deploy(&mut self, handler: Arc<dyn TransactionHandler>) {
        self.contracts.register(handler);
    }

    pub fn contracts(&self) -> &ContractRegistry {
        &self.contracts
    }

    fn lock_head(&self) -> Result<MutexGuard<String>, ExecutionError> {
        self.head
            .lock()
            .map_err(|_| ExecutionError::InternalError("head lock poisoned".into()))
    }

    /// The id of the most recently committed state.
    pub fn head(&self) -> Result<String, ExecutionError> {
        Ok(self.lock_head()?.clone())
    }

    /// Runs `transaction` against the current head without committing anything.
    pub fn simulate(
        &self,
        transaction: &Transaction,
    ) -> Result<SimulatedTransaction, ExecutionError> {
        let base = self.head()?;
        let handler = self
            .contracts
            .get(transaction.contract())
            .ok_or_else(|| ExecutionError::UnknownContract(transaction.contract().to_string()))?;

        let mut context = Context::new(&base);
        let result = InvocationRequest::from_args(transaction.args()).and_then(|request| {
            debug!(
                "Executing {}::{} as {} ({})",
                transaction.contract(),
                request.function(),
                transaction.identity(),
                transaction.id()
            );
            let mut execution_context = ExecutionContext::new(
                &self.state,
                &self.contracts,
                &mut context,
                transaction.contract(),
                transaction.identity(),
                transaction.id(),
            );
            handler.apply(&request, &mut execution_context)
        });

        let outcome = match result {
            Ok(payload) => Outcome::Valid(payload),
            Err(err) => {
                warn!("Transaction {} rejected: {}", transaction.id(), err);
                Outcome::Invalid(InvocationResponse::from_error(&err))
            }
        };

        Ok(SimulatedTransaction {
            transaction_id: transaction.id().to_string(),
            context,
            outcome,
        })
    }

    /// Commits a simulated transaction on top of the current head.
    ///
    /// An invalid transaction produces an invalid receipt and leaves state untouched. A valid one
    /// is committed only if every value and range it read is unchanged at the head.
    ///
    /// # Errors
    ///
    /// `ExecutionError::StaleReadSet` if the head moved in a way that changes what the
    /// transaction read.
    pub fn commit(
        &self,
        simulated: SimulatedTransaction,
    ) -> Result<TransactionReceipt, ExecutionError> {
        let SimulatedTransaction {
            transaction_id,
            context,
            outcome,
        } = simulated;

        let payload = match outcome {
            Outcome::Valid(payload) => payload,
            Outcome::Invalid(response) => {
                return Ok(TransactionReceipt::invalid(
                    &transaction_id,
                    response.status(),
                    response.payload_lossy(),
                ))
            }
        };

        let mut head = self.lock_head()?;
        if head.as_str() != context.state_id() {
            self.validate_reads(&head, &context)
                .map_err(|err| match err {
                    ExecutionError::StaleReadSet(changed) => {
                        warn!(
                            "Transaction {} is stale, {} changed since it was simulated",
                            transaction_id, changed
                        );
                        ExecutionError::StaleReadSet(transaction_id.clone())
                    }
                    err => err,
                })?;
        }

        let (state_changes, events) = context.into_parts();
        let next_state_id = self.state.commit(&head, &state_changes)?;
        info!(
            "Committed transaction {} ({} changes) as state {}",
            transaction_id,
            state_changes.len(),
            next_state_id
        );
        *head = next_state_id.clone();

        Ok(TransactionReceipt::valid(
            &transaction_id,
            payload,
            state_changes,
            events,
            next_state_id,
        ))
    }

    fn validate_reads(&self, head: &String, context: &Context) -> Result<(), ExecutionError> {
        for (address, observed) in context.reads() {
            let current = self.state.get(head, &[address.clone()])?.remove(address);
            if &current != observed {
                return Err(ExecutionError::StaleReadSet(address.clone()));
            }
        }
        for (prefix, observed) in context.range_reads() {
            if &self.state.list(head, prefix)? != observed {
                return Err(ExecutionError::StaleReadSet(prefix.clone()));
            }
        }
        Ok(())
    }

    /// Simulates and commits `transaction`.
    pub fn execute(&self, transaction: &Transaction) -> Result<TransactionReceipt, ExecutionError> {
        let simulated = self.simulate(transaction)?;
        self.commit(simulated)
    }

    /// Runs a read-only entry point and returns its response. Nothing is committed.
    pub fn query(
        &self,
        contract: &str,
        args: &[String],
        identity: &str,
    ) -> Result<InvocationResponse, ExecutionError> {
        let transaction = TransactionBuilder::new()
            .with_contract(contract.to_string())
            .with_args(args.to_vec())
            .with_identity(identity.to_string())
            .build()
            .map_err(|err| ExecutionError::InternalError(err.to_string()))?;
        Ok(self.simulate(&transaction)?.response())
    }
}
