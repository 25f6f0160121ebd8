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

//! The marketplace contracts.
//!
//! `general_contract` keeps each technician's jobs and earnings and creates jobs through the
//! sub-contracts in `job`. `customer` keeps each customer's SLAs and changes them through
//! `mower`, which owns the SLA records and their valuation.

pub mod customer;
pub mod general_contract;
pub mod job;
pub mod mower;

use std::sync::Arc;

use serde::Serialize;

use crate::execution::ContractRegistry;
use crate::handler::{ApplyError, TransactionContext, TransactionHandler};
use crate::offledger::OffLedgerRegistry;

use self::customer::CustomerTransactionHandler;
use self::general_contract::GeneralContractTransactionHandler;
use self::job::{BumpyJob, InspectJob, JobSubContract, RazorJob};
use self::mower::MowerTransactionHandler;

/// Every marketplace contract, under its default name, sharing one off-ledger registry.
pub fn marketplace_handlers(
    registry: Arc<dyn OffLedgerRegistry>,
) -> Vec<Arc<dyn TransactionHandler>> {
    vec![
        Arc::new(GeneralContractTransactionHandler::new(registry.clone())),
        Arc::new(JobSubContract::<BumpyJob>::new(registry.clone())),
        Arc::new(JobSubContract::<RazorJob>::new(registry.clone())),
        Arc::new(JobSubContract::<InspectJob>::new(registry)),
        Arc::new(MowerTransactionHandler::new()),
        Arc::new(CustomerTransactionHandler::new()),
    ]
}

/// A `ContractRegistry` with every marketplace contract deployed.
pub fn marketplace_contracts(registry: Arc<dyn OffLedgerRegistry>) -> ContractRegistry {
    let mut contracts = ContractRegistry::new();
    for handler in marketplace_handlers(registry) {
        contracts.register(handler);
    }
    contracts
}

/// Fails unless the running contract was invoked by `contract`.
pub(crate) fn require_invoked_by(
    context: &dyn TransactionContext,
    contract: &str,
    entry_point: &str,
) -> Result<(), ApplyError> {
    match context.invoking_contract() {
        Some(invoker) if invoker == contract => Ok(()),
        invoker => {
            warn!(
                "Invalid transaction: {} reached from {} instead of {}",
                entry_point,
                invoker.unwrap_or("a transaction"),
                contract
            );
            Err(ApplyError::PermissionDenied(format!(
                "{} may only be invoked by {}",
                entry_point, contract
            )))
        }
    }
}

/// Invokes `contract` and returns its payload, failing if the callee did not succeed.
pub(crate) fn invoke_checked(
    context: &mut dyn TransactionContext,
    contract: &str,
    args: Vec<String>,
) -> Result<Vec<u8>, ApplyError> {
    let response = context.invoke_contract(contract, &args)?;
    if !response.is_success() {
        warn!(
            "Invalid transaction: {} {} returned status {}: {}",
            contract,
            args.first().map(String::as_str).unwrap_or_default(),
            response.status(),
            response.payload_lossy()
        );
        return Err(ApplyError::SubcontractInvocationFailed {
            contract: contract.to_string(),
            detail: response.payload_lossy(),
        });
    }
    Ok(response.into_payload())
}

pub(crate) fn to_payload<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, ApplyError> {
    Ok(serde_json::to_vec(value)?)
}
