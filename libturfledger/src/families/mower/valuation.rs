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

//! Appraisal of a mowing agreement.
//!
//! All arithmetic is done in `f32`, one rounding per operation, and the result is truncated
//! toward zero. Changing the precision or the order of operations changes appraised values that
//! are already stored on the ledger.

use crate::handler::ApplyError;
use crate::protocol::ServiceLevel;

const SPREAD_WEIGHT: f32 = 0.7;
const TARGET_WEIGHT: f32 = 0.3;

/// Computes the monthly value of an agreement.
///
/// A narrower tolerated interval between `max` and `min`, a shorter `target` or a higher service
/// level each make the agreement more expensive.
///
/// # Errors
///
/// `ApplyError::ArithmeticHazard` if any length is not finite, if `max <= min`, if
/// `target <= 0` or if the result does not fit in an `i64`.
pub fn evaluate(
    service_level: ServiceLevel,
    target: f32,
    max: f32,
    min: f32,
) -> Result<i64, ApplyError> {
    if !(target.is_finite() && max.is_finite() && min.is_finite()) {
        return Err(ApplyError::ArithmeticHazard(format!(
            "grass lengths must be finite (target {}, max {}, min {})",
            target, max, min
        )));
    }

    let spread = max - min;
    if spread <= 0.0 {
        return Err(ApplyError::ArithmeticHazard(format!(
            "max grass length {} must exceed min grass length {}",
            max, min
        )));
    }
    if target <= 0.0 {
        return Err(ApplyError::ArithmeticHazard(format!(
            "target grass length {} must be positive",
            target
        )));
    }

    let inverse_spread = 1.0f32 / spread;
    let target_factor = 1.0f32 / target;
    let cost_factor = (inverse_spread * SPREAD_WEIGHT) + (target_factor * TARGET_WEIGHT);
    let monthly_cost = service_level.base_cost() * (cost_factor + 1.0);

    if !monthly_cost.is_finite() || monthly_cost.abs() >= i64::MAX as f32 {
        return Err(ApplyError::ArithmeticHazard(format!(
            "appraised value {} is out of range",
            monthly_cost
        )));
    }

    Ok(monthly_cost.trunc() as i64)
}
