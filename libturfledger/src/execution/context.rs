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

use crate::addressing::{make_address, namespace_prefix};
use crate::context::Context;
use crate::handler::{ContextError, TransactionContext};
use crate::protocol::invocation::{InvocationRequest, InvocationResponse};
use crate::protocol::receipt::Event;
use crate::state::Read;

use super::ContractRegistry;

/// How deep contract invocations may nest before the call is refused.
pub const MAX_INVOCATION_DEPTH: usize = 8;

/// The `TransactionContext` handed to a contract while a transaction executes.
///
/// Reads fall through the transaction's own changes to the base state and are recorded in the
/// read set. Writes only append to the change set. A nested invocation gets a context for the
/// callee's namespace over the same change set.
pub struct ExecutionContext<'a> {
    reader: &'a dyn Read<StateId = String>,
    contracts: &'a ContractRegistry,
    context: &'a mut Context,
    namespace: String,
    identity: &'a str,
    transaction_id: &'a str,
    invoker: Option<String>,
    depth: usize,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(
        reader: &'a dyn Read<StateId = String>,
        contracts: &'a ContractRegistry,
        context: &'a mut Context,
        namespace: &str,
        identity: &'a str,
        transaction_id: &'a str,
    ) -> Self {
        ExecutionContext {
            reader,
            contracts,
            context,
            namespace: namespace.to_string(),
            identity,
            transaction_id,
            invoker: None,
            depth: 0,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn read(&mut self, address: &str) -> Result<Option<Vec<u8>>, ContextError> {
        if let Some(value) = self.context.get_state(address) {
            return Ok(value.map(<[u8]>::to_vec));
        }

        let observed = self
            .reader
            .get(&self.context.state_id().to_string(), &[address.to_string()])
            .map_err(|err| ContextError::StateReadError(err.to_string()))?
            .remove(address);
        self.context.record_read(address, observed.clone());
        Ok(observed)
    }
}

impl<'a> TransactionContext for ExecutionContext<'a> {
    fn get_state_entry(&mut self, key: &str) -> Result<Option<Vec<u8>>, ContextError> {
        let address = make_address(&self.namespace, key);
        self.read(&address)
    }

    fn get_state_range(&mut self) -> Result<Vec<(String, Vec<u8>)>, ContextError> {
        let prefix = namespace_prefix(&self.namespace);
        let base = self
            .reader
            .list(&self.context.state_id().to_string(), &prefix)
            .map_err(|err| ContextError::StateReadError(err.to_string()))?;
        self.context.record_range_read(&prefix, base.clone());

        Ok(self
            .context
            .overlay(&prefix, base)
            .into_iter()
            .map(|(address, value)| (address[prefix.len()..].to_string(), value))
            .collect())
    }

    fn get_foreign_state_entry(
        &mut self,
        namespace: &str,
        key: &str,
    ) -> Result<Option<Vec<u8>>, ContextError> {
        let address = make_address(namespace, key);
        self.read(&address)
    }

    fn set_state_entry(&mut self, key: String, data: Vec<u8>) -> Result<(), ContextError> {
        let address = make_address(&self.namespace, &key);
        self.context.set_state(address, data);
        Ok(())
    }

    fn delete_state_entry(&mut self, key: &str) -> Result<Option<String>, ContextError> {
        let address = make_address(&self.namespace, key);
        let existed = self.read(&address)?.is_some();
        self.context.delete_state(address);
        Ok(if existed { Some(key.to_string()) } else { None })
    }

    fn invoke_contract(
        &mut self,
        name: &str,
        args: &[String],
    ) -> Result<InvocationResponse, ContextError> {
        if self.depth + 1 >= MAX_INVOCATION_DEPTH {
            return Err(ContextError::InvocationError(format!(
                "invocation of {} from {} exceeds the nesting limit of {}",
                name, self.namespace, MAX_INVOCATION_DEPTH
            )));
        }
        let handler = self.contracts.get(name).cloned().ok_or_else(|| {
            ContextError::InvocationError(format!("no contract deployed as {}", name))
        })?;
        let request = match InvocationRequest::from_args(args) {
            Ok(request) => request,
            Err(err) => return Ok(InvocationResponse::from_error(&err)),
        };

        debug!(
            "{} invoking {}::{}",
            self.namespace,
            name,
            request.function()
        );

        let savepoint = self.context.savepoint();
        let mut callee = ExecutionContext {
            reader: self.reader,
            contracts: self.contracts,
            context: &mut *self.context,
            namespace: name.to_string(),
            identity: self.identity,
            transaction_id: self.transaction_id,
            invoker: Some(self.namespace.clone()),
            depth: self.depth + 1,
        };

        match handler.apply(&request, &mut callee) {
            Ok(payload) => Ok(InvocationResponse::success(payload)),
            Err(err) => {
                self.context.rollback_to(savepoint);
                warn!(
                    "{}::{} failed, discarding its changes: {}",
                    name,
                    request.function(),
                    err
                );
                Ok(InvocationResponse::from_error(&err))
            }
        }
    }

    fn caller_identity(&self) -> &str {
        self.identity
    }

    fn transaction_id(&self) -> &str {
        self.transaction_id
    }

    fn invoking_contract(&self) -> Option<&str> {
        self.invoker.as_deref()
    }

    fn add_event(
        &mut self,
        event_type: String,
        attributes: Vec<(String, String)>,
        data: Vec<u8>,
    ) -> Result<(), ContextError> {
        self.context.add_event(Event {
            event_type,
            attributes,
            data,
        });
        Ok(())
    }
}
