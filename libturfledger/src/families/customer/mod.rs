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

//! The customer contract keeps each customer's SLAs.
//!
//! Every change to an SLA is made by invoking the mower contract; the customer record keeps a
//! snapshot of what the mower contract returned.

use crate::addressing::hash;
use crate::handler::{ApplyError, TransactionContext, TransactionHandler};
use crate::protocol::invocation::{format_decimal, InvocationRequest};
use crate::protocol::{Customer, ServiceLevel, Sla};

use super::mower::MOWER_CONTRACT;
use super::{invoke_checked, to_payload};

pub const CUSTOMER_CONTRACT: &str = "customer";

/// Length of a derived SLA id, in hex characters.
const DERIVED_SLA_ID_LEN: usize = 16;

pub struct CustomerTransactionHandler {
    family_name: String,
    mower_contract: String,
}

impl CustomerTransactionHandler {
    #[allow(clippy::new_without_default)]
    pub fn new() -> CustomerTransactionHandler {
        CustomerTransactionHandler {
            family_name: CUSTOMER_CONTRACT.to_string(),
            mower_contract: MOWER_CONTRACT.to_string(),
        }
    }

    /// Delegates SLA changes to the contract deployed as `mower_contract`.
    pub fn with_mower_contract(mut self, mower_contract: &str) -> Self {
        self.mower_contract = mower_contract.to_string();
        self
    }

    fn create_sla(
        &self,
        request: &InvocationRequest,
        context: &mut dyn TransactionContext,
    ) -> Result<Vec<u8>, ApplyError> {
        request.expect_args(5, 6)?;
        let customer_id = request.arg(0, "customerID")?;
        let service_level: ServiceLevel = request.arg(1, "serviceLevel")?.parse()?;
        let target = request.f32_arg(2, "targetGrassLength")?;
        let max = request.f32_arg(3, "maxGrassLength")?;
        let min = request.f32_arg(4, "minGrassLength")?;

        let mut customer = CustomerState::new(context).require_customer(customer_id)?;
        let sla_id = match request.optional_arg(5) {
            Some(sla_id) if !sla_id.is_empty() => sla_id.to_string(),
            _ => derive_sla_id(customer_id, context.transaction_id()),
        };

        let payload = invoke_checked(
            context,
            &self.mower_contract,
            vec![
                "CreateSLA".into(),
                sla_id.clone(),
                service_level.to_string(),
                format_decimal(target),
                format_decimal(max),
                format_decimal(min),
            ],
        )?;
        let sla: Sla = serde_json::from_slice(&payload)?;

        customer.add_sla(sla);
        CustomerState::new(context).save_customer(&customer)?;
        info!("Customer {} now holds SLA {}", customer_id, sla_id);
        Ok(payload)
    }

    /// Forwards a change of one held SLA to the mower contract and stores the new snapshot.
    fn update_sla(
        &self,
        request: &InvocationRequest,
        context: &mut dyn TransactionContext,
        mower_function: &str,
        mower_args: Vec<String>,
    ) -> Result<Vec<u8>, ApplyError> {
        let customer_id = request.arg(0, "customerID")?;
        let sla_id = request.arg(1, "slaID")?;
        let mut customer = require_held_sla(context, customer_id, sla_id)?;

        let mut args = vec![mower_function.to_string(), sla_id.to_string()];
        args.extend(mower_args);
        let payload = invoke_checked(context, &self.mower_contract, args)?;
        let sla: Sla = serde_json::from_slice(&payload)?;

        customer.replace_sla(sla);
        CustomerState::new(context).save_customer(&customer)?;
        Ok(payload)
    }

    fn remove_sla(
        &self,
        request: &InvocationRequest,
        context: &mut dyn TransactionContext,
    ) -> Result<Vec<u8>, ApplyError> {
        request.expect_args(2, 2)?;
        let customer_id = request.arg(0, "customerID")?;
        let sla_id = request.arg(1, "slaID")?;
        let mut customer = require_held_sla(context, customer_id, sla_id)?;

        invoke_checked(
            context,
            &self.mower_contract,
            vec!["DeleteSLA".into(), sla_id.to_string()],
        )?;

        customer.remove_sla(sla_id);
        CustomerState::new(context).save_customer(&customer)?;
        info!("Customer {} no longer holds SLA {}", customer_id, sla_id);
        to_payload(&customer)
    }

    fn read_mower_sla(
        &self,
        request: &InvocationRequest,
        context: &mut dyn TransactionContext,
    ) -> Result<Vec<u8>, ApplyError> {
        request.expect_args(2, 2)?;
        let sla_id = request.arg(1, "slaID")?;
        require_held_sla(context, request.arg(0, "customerID")?, sla_id)?;

        invoke_checked(
            context,
            &self.mower_contract,
            vec!["ReadSLA".into(), sla_id.to_string()],
        )
    }

    /// Reads every held SLA straight from the mower namespace.
    fn get_all_sla(
        &self,
        request: &InvocationRequest,
        context: &mut dyn TransactionContext,
    ) -> Result<Vec<u8>, ApplyError> {
        request.expect_args(1, 1)?;
        let customer = CustomerState::new(context).require_customer(request.arg(0, "customerID")?)?;

        let mut slas = Vec::with_capacity(customer.slas().len());
        for held in customer.slas() {
            let packed = context
                .get_foreign_state_entry(&self.mower_contract, held.id())?
                .ok_or_else(|| {
                    warn!(
                        "Invalid transaction: customer {} references missing SLA {}",
                        customer.id(),
                        held.id()
                    );
                    ApplyError::NotFound(format!("the SLA {} does not exist", held.id()))
                })?;
            slas.push(serde_json::from_slice::<Sla>(&packed)?);
        }
        to_payload(&slas)
    }
}

impl TransactionHandler for CustomerTransactionHandler {
    fn family_name(&self) -> &str {
        &self.family_name
    }

    fn apply(
        &self,
        request: &InvocationRequest,
        context: &mut dyn TransactionContext,
    ) -> Result<Vec<u8>, ApplyError> {
        debug!(
            "Customer txn {}: {}",
            context.transaction_id(),
            request.function()
        );

        match request.function() {
            "CreateCustomer" => {
                request.expect_args(1, 1)?;
                apply_create_customer(request.arg(0, "id")?, context)
            }
            "CreateSLA" => self.create_sla(request, context),
            "UpdateServiceLevel" => {
                request.expect_args(3, 3)?;
                let service_level: ServiceLevel = request.arg(2, "serviceLevel")?.parse()?;
                self.update_sla(
                    request,
                    context,
                    "ChangeServiceLevel",
                    vec![service_level.to_string()],
                )
            }
            "UpdateTargetGrassLength" => {
                request.expect_args(3, 3)?;
                let target = request.f32_arg(2, "targetGrassLength")?;
                self.update_sla(
                    request,
                    context,
                    "UpdateTargetGrassLength",
                    vec![format_decimal(target)],
                )
            }
            "UpdateGrassLengthInterval" => {
                request.expect_args(4, 4)?;
                let max = request.f32_arg(2, "maxGrassLength")?;
                let min = request.f32_arg(3, "minGrassLength")?;
                self.update_sla(
                    request,
                    context,
                    "UpdateGrassLengthInterval",
                    vec![format_decimal(max), format_decimal(min)],
                )
            }
            "RemoveSLA" => self.remove_sla(request, context),
            "ReadCustomer" => {
                request.expect_args(1, 1)?;
                to_payload(&CustomerState::new(context).require_customer(request.arg(0, "id")?)?)
            }
            "ReadMowerSLA" => self.read_mower_sla(request, context),
            "GetAllSLA" => self.get_all_sla(request, context),
            other => Err(ApplyError::InvalidArgument(format!(
                "customer has no entry point {}",
                other
            ))),
        }
    }
}

fn apply_create_customer(
    id: &str,
    context: &mut dyn TransactionContext,
) -> Result<Vec<u8>, ApplyError> {
    let mut state = CustomerState::new(context);
    if state.get_customer(id)?.is_some() {
        warn!(
            "Invalid transaction: during CreateCustomer, customer {} already exists",
            id
        );
        return Err(ApplyError::AlreadyExists(format!(
            "the customer {} already exists",
            id
        )));
    }

    let customer = Customer::new(id);
    state.save_customer(&customer)?;
    info!("Created customer {}", id);
    to_payload(&customer)
}

fn require_held_sla(
    context: &mut dyn TransactionContext,
    customer_id: &str,
    sla_id: &str,
) -> Result<Customer, ApplyError> {
    let customer = CustomerState::new(context).require_customer(customer_id)?;
    if !customer.has_sla(sla_id) {
        warn!(
            "Invalid transaction: customer {} does not hold SLA {}",
            customer_id, sla_id
        );
        return Err(ApplyError::NotFound(format!(
            "customer {} has no SLA {}",
            customer_id, sla_id
        )));
    }
    Ok(customer)
}

/// An SLA id for a customer that did not name one, unique per transaction.
pub fn derive_sla_id(customer_id: &str, transaction_id: &str) -> String {
    let mut id = hash(&format!("{}/{}", customer_id, transaction_id));
    id.truncate(DERIVED_SLA_ID_LEN);
    id
}

/// Typed access to the customer records in the customer namespace.
pub struct CustomerState<'a> {
    context: &'a mut dyn TransactionContext,
}

impl<'a> CustomerState<'a> {
    pub fn new(context: &'a mut dyn TransactionContext) -> CustomerState<'a> {
        CustomerState { context }
    }

    pub fn get_customer(&mut self, id: &str) -> Result<Option<Customer>, ApplyError> {
        match self.context.get_state_entry(id)? {
            Some(packed) => Ok(Some(serde_json::from_slice(&packed)?)),
            None => Ok(None),
        }
    }

    pub fn require_customer(&mut self, id: &str) -> Result<Customer, ApplyError> {
        self.get_customer(id)?.ok_or_else(|| {
            warn!("Invalid transaction: customer {} does not exist", id);
            ApplyError::NotFound(format!("the customer {} does not exist", id))
        })
    }

    pub fn save_customer(&mut self, customer: &Customer) -> Result<(), ApplyError> {
        self.context
            .set_state_entry(customer.id().to_string(), to_payload(customer)?)?;
        Ok(())
    }
}
