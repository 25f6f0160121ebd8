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

//! Traits for handling the execution of a contract entry point.
//!
//! The TransactionHandler trait is implemented by every contract. Handlers must be stateless and
//! deterministic: everything they read or write goes through the TransactionContext they are
//! given, which is scoped to the handler's own namespace. Contracts reach each other only through
//! `invoke_contract`, whose effects land in the same write set as the caller's.

mod error;

pub use crate::handler::error::{ApplyError, ContextError};
use crate::protocol::invocation::{InvocationRequest, InvocationResponse};

pub trait TransactionContext {
    /// get_state_entry returns the value stored at `key` in the current contract's namespace,
    /// or `None` if the key is unset.
    ///
    /// # Arguments
    ///
    /// * `key` - the natural key to fetch
    fn get_state_entry(&mut self, key: &str) -> Result<Option<Vec<u8>>, ContextError>;

    /// get_state_range returns every entry of the current contract's namespace, ordered by key.
    fn get_state_range(&mut self) -> Result<Vec<(String, Vec<u8>)>, ContextError>;

    /// get_foreign_state_entry reads `key` from another contract's namespace. Foreign
    /// namespaces are read-only.
    ///
    /// # Arguments
    ///
    /// * `namespace` - the name of the contract that owns the key
    /// * `key` - the natural key to fetch
    fn get_foreign_state_entry(
        &mut self,
        namespace: &str,
        key: &str,
    ) -> Result<Option<Vec<u8>>, ContextError>;

    /// set_state_entry requests that `key` be set to `data` in the current namespace.
    fn set_state_entry(&mut self, key: String, data: Vec<u8>) -> Result<(), ContextError>;

    /// delete_state_entry requests that `key` be unset in the current namespace. Returns the
    /// key if it was set.
    fn delete_state_entry(&mut self, key: &str) -> Result<Option<String>, ContextError>;

    /// invoke_contract synchronously calls another contract's entry point within the same
    /// transaction. `args[0]` is the entry point name.
    ///
    /// A contract failure is reported through the response status, not as an `Err`; the
    /// callee's writes are discarded in that case. `Err` is reserved for invocations that could
    /// not be dispatched at all.
    fn invoke_contract(
        &mut self,
        name: &str,
        args: &[String],
    ) -> Result<InvocationResponse, ContextError>;

    /// caller_identity returns the organization identity that submitted the transaction.
    fn caller_identity(&self) -> &str;

    /// invoking_contract returns the name of the contract that invoked this one through
    /// `invoke_contract`, or `None` if the transaction called this contract directly.
    fn invoking_contract(&self) -> Option<&str>;

    /// transaction_id returns the id of the transaction being executed.
    fn transaction_id(&self) -> &str;

    /// add_event adds a new event to the execution result for this transaction.
    ///
    /// # Arguments
    ///
    /// * `event_type` -  This is used to subscribe to events. It should be globally unique and
    ///         describe what, in general, has occured.
    /// * `attributes` - Additional information about the event that is transparent to the
    ///          ledger. Attributes can be used by subscribers to filter the type of events
    ///          they receive.
    /// * `data` - Additional information about the event that is opaque to the ledger.
    fn add_event(
        &mut self,
        event_type: String,
        attributes: Vec<(String, String)>,
        data: Vec<u8>,
    ) -> Result<(), ContextError>;
}

pub trait TransactionHandler: Send + Sync {
    /// family_name is the name the contract is deployed under, e.g. "mower". It is also the
    /// contract's state namespace and the name other contracts invoke it by.
    fn family_name(&self) -> &str;

    /// Apply dispatches the requested entry point. On success the returned bytes become the
    /// response payload.
    fn apply(
        &self,
        request: &InvocationRequest,
        context: &mut dyn TransactionContext,
    ) -> Result<Vec<u8>, ApplyError>;
}
