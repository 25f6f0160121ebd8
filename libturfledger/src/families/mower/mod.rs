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

//! The mower contract owns SLA records and keeps their appraised value current.

pub mod valuation;

use crate::handler::{ApplyError, TransactionContext, TransactionHandler};
use crate::protocol::invocation::InvocationRequest;
use crate::protocol::{ServiceLevel, Sla};

use super::customer::CUSTOMER_CONTRACT;
use super::{require_invoked_by, to_payload};

pub const MOWER_CONTRACT: &str = "mower";

pub struct MowerTransactionHandler {
    family_name: String,
    customer_contract: String,
}

impl MowerTransactionHandler {
    #[allow(clippy::new_without_default)]
    pub fn new() -> MowerTransactionHandler {
        MowerTransactionHandler {
            family_name: MOWER_CONTRACT.to_string(),
            customer_contract: CUSTOMER_CONTRACT.to_string(),
        }
    }

    /// Accepts `CreateSLA` only from the contract deployed as `customer_contract`.
    pub fn with_customer_contract(mut self, customer_contract: &str) -> Self {
        self.customer_contract = customer_contract.to_string();
        self
    }
}

impl TransactionHandler for MowerTransactionHandler {
    fn family_name(&self) -> &str {
        &self.family_name
    }

    fn apply(
        &self,
        request: &InvocationRequest,
        context: &mut dyn TransactionContext,
    ) -> Result<Vec<u8>, ApplyError> {
        debug!(
            "Mower txn {}: {}",
            context.transaction_id(),
            request.function()
        );
        if request.function() == "CreateSLA" {
            require_invoked_by(context, &self.customer_contract, "CreateSLA")?;
        }
        let mut state = MowerState::new(context);

        match request.function() {
            "CreateSLA" => apply_create_sla(request, &mut state),
            "ChangeServiceLevel" => apply_change_service_level(request, &mut state),
            "EvaluateSLA" => apply_evaluate_sla(request),
            "UpdateTargetGrassLength" => apply_update_target_grass_length(request, &mut state),
            "UpdateGrassLengthInterval" => apply_update_grass_length_interval(request, &mut state),
            "DeleteSLA" => apply_delete_sla(request, &mut state),
            "ReadSLA" => {
                request.expect_args(1, 1)?;
                to_payload(&state.require_sla(request.arg(0, "id")?)?)
            }
            "GetAllSLA" => {
                request.expect_args(0, 0)?;
                to_payload(&state.list_slas()?)
            }
            other => Err(ApplyError::InvalidArgument(format!(
                "mower has no entry point {}",
                other
            ))),
        }
    }
}

fn apply_create_sla(
    request: &InvocationRequest,
    state: &mut MowerState,
) -> Result<Vec<u8>, ApplyError> {
    request.expect_args(5, 5)?;
    let id = request.arg(0, "id")?;
    let service_level: ServiceLevel = request.arg(1, "serviceLevel")?.parse()?;
    let target = request.f32_arg(2, "targetGrassLength")?;
    let max = request.f32_arg(3, "maxGrassLength")?;
    let min = request.f32_arg(4, "minGrassLength")?;

    if state.get_sla(id)?.is_some() {
        warn!("Invalid transaction: during CreateSLA, SLA {} already exists", id);
        return Err(ApplyError::AlreadyExists(format!("the SLA {} already exists", id)));
    }

    let sla = Sla::new(id, service_level, target, max, min);
    state.save_evaluated(sla)
}

fn apply_change_service_level(
    request: &InvocationRequest,
    state: &mut MowerState,
) -> Result<Vec<u8>, ApplyError> {
    request.expect_args(2, 2)?;
    let mut sla = state.require_sla(request.arg(0, "id")?)?;
    let service_level: ServiceLevel = request.arg(1, "serviceLevel")?.parse()?;

    sla.set_service_level(service_level);
    state.save_evaluated(sla)
}

fn apply_evaluate_sla(request: &InvocationRequest) -> Result<Vec<u8>, ApplyError> {
    request.expect_args(4, 4)?;
    let service_level: ServiceLevel = request.arg(0, "serviceLevel")?.parse()?;
    let value = valuation::evaluate(
        service_level,
        request.f32_arg(1, "targetGrassLength")?,
        request.f32_arg(2, "maxGrassLength")?,
        request.f32_arg(3, "minGrassLength")?,
    )?;
    to_payload(&value)
}

fn apply_update_target_grass_length(
    request: &InvocationRequest,
    state: &mut MowerState,
) -> Result<Vec<u8>, ApplyError> {
    request.expect_args(2, 2)?;
    let mut sla = state.require_sla(request.arg(0, "id")?)?;

    sla.set_target_grass_length(request.f32_arg(1, "targetGrassLength")?);
    state.save_evaluated(sla)
}

fn apply_update_grass_length_interval(
    request: &InvocationRequest,
    state: &mut MowerState,
) -> Result<Vec<u8>, ApplyError> {
    request.expect_args(3, 3)?;
    let mut sla = state.require_sla(request.arg(0, "id")?)?;

    sla.set_grass_length_interval(
        request.f32_arg(1, "maxGrassLength")?,
        request.f32_arg(2, "minGrassLength")?,
    );
    state.save_evaluated(sla)
}

fn apply_delete_sla(
    request: &InvocationRequest,
    state: &mut MowerState,
) -> Result<Vec<u8>, ApplyError> {
    request.expect_args(1, 1)?;
    let id = request.arg(0, "id")?;
    state.require_sla(id)?;
    state.delete_sla(id)?;
    info!("Deleted SLA {}", id);
    Ok(Vec::new())
}

/// Typed access to the SLA records in the mower namespace.
pub struct MowerState<'a> {
    context: &'a mut dyn TransactionContext,
}

impl<'a> MowerState<'a> {
    pub fn new(context: &'a mut dyn TransactionContext) -> MowerState<'a> {
        MowerState { context }
    }

    pub fn get_sla(&mut self, id: &str) -> Result<Option<Sla>, ApplyError> {
        match self.context.get_state_entry(id)? {
            Some(packed) => Ok(Some(serde_json::from_slice(&packed)?)),
            None => Ok(None),
        }
    }

    pub fn require_sla(&mut self, id: &str) -> Result<Sla, ApplyError> {
        self.get_sla(id)?.ok_or_else(|| {
            warn!("Invalid transaction: SLA {} does not exist", id);
            ApplyError::NotFound(format!("the SLA {} does not exist", id))
        })
    }

    /// Recomputes the appraised value, stores the SLA and returns it as the payload.
    pub fn save_evaluated(&mut self, mut sla: Sla) -> Result<Vec<u8>, ApplyError> {
        let value = valuation::evaluate(
            sla.service_level(),
            sla.target_grass_length(),
            sla.max_grass_length(),
            sla.min_grass_length(),
        )?;
        sla.set_appraised_value(value);

        let payload = to_payload(&sla)?;
        self.context
            .set_state_entry(sla.id().to_string(), payload.clone())?;
        info!(
            "Saved SLA {} ({}, appraised at {})",
            sla.id(),
            sla.service_level(),
            value
        );
        Ok(payload)
    }

    pub fn delete_sla(&mut self, id: &str) -> Result<(), ApplyError> {
        self.context.delete_state_entry(id)?;
        Ok(())
    }

    /// Every SLA in the namespace, in key order.
    pub fn list_slas(&mut self) -> Result<Vec<Sla>, ApplyError> {
        self.context
            .get_state_range()?
            .iter()
            .map(|(_, packed)| serde_json::from_slice(packed).map_err(ApplyError::from))
            .collect()
    }
}
