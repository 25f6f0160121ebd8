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

//! Service-level agreements and the customers that hold them.

use std::error::Error as StdError;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceLevel {
    Standard,
    Gold,
    Platinum,
}

impl ServiceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceLevel::Standard => "standard",
            ServiceLevel::Gold => "gold",
            ServiceLevel::Platinum => "platinum",
        }
    }

    /// Monthly base cost before the grass-length factors are applied.
    pub fn base_cost(&self) -> f32 {
        match self {
            ServiceLevel::Standard => 50.0,
            ServiceLevel::Gold => 100.0,
            ServiceLevel::Platinum => 200.0,
        }
    }

    /// Days a technician has to finish a job for a mower on this level.
    pub fn lead_days(&self) -> i64 {
        match self {
            ServiceLevel::Standard => 7,
            ServiceLevel::Gold => 5,
            ServiceLevel::Platinum => 3,
        }
    }
}

impl fmt::Display for ServiceLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseServiceLevelError(String);

impl StdError for ParseServiceLevelError {}

impl fmt::Display for ParseServiceLevelError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown service level '{}'", self.0)
    }
}

impl FromStr for ServiceLevel {
    type Err = ParseServiceLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(ServiceLevel::Standard),
            "gold" => Ok(ServiceLevel::Gold),
            "platinum" => Ok(ServiceLevel::Platinum),
            _ => Err(ParseServiceLevelError(s.to_string())),
        }
    }
}

/// A mowing agreement for one mower. `appraised_value` is always derived from the other terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Sla {
    appraised_value: i64,
    service_level: ServiceLevel,
    target_grass_length: f32,
    max_grass_length: f32,
    min_grass_length: f32,
    #[serde(rename = "ID")]
    id: String,
}

impl Sla {
    pub fn new(
        id: &str,
        service_level: ServiceLevel,
        target_grass_length: f32,
        max_grass_length: f32,
        min_grass_length: f32,
    ) -> Self {
        Sla {
            appraised_value: 0,
            service_level,
            target_grass_length,
            max_grass_length,
            min_grass_length,
            id: id.to_string(),
        }
    }

    pub fn appraised_value(&self) -> i64 {
        self.appraised_value
    }

    pub fn service_level(&self) -> ServiceLevel {
        self.service_level
    }

    pub fn target_grass_length(&self) -> f32 {
        self.target_grass_length
    }

    pub fn max_grass_length(&self) -> f32 {
        self.max_grass_length
    }

    pub fn min_grass_length(&self) -> f32 {
        self.min_grass_length
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_appraised_value(&mut self, appraised_value: i64) {
        self.appraised_value = appraised_value;
    }

    pub fn set_service_level(&mut self, service_level: ServiceLevel) {
        self.service_level = service_level;
    }

    pub fn set_target_grass_length(&mut self, target_grass_length: f32) {
        self.target_grass_length = target_grass_length;
    }

    pub fn set_grass_length_interval(&mut self, max_grass_length: f32, min_grass_length: f32) {
        self.max_grass_length = max_grass_length;
        self.min_grass_length = min_grass_length;
    }
}

/// A customer and snapshots of the SLAs it holds, in insertion order until a removal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "SLAs")]
    slas: Vec<Sla>,
}

impl Customer {
    pub fn new(id: &str) -> Self {
        Customer {
            id: id.to_string(),
            slas: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn slas(&self) -> &[Sla] {
        &self.slas
    }

    pub fn sla_position(&self, sla_id: &str) -> Option<usize> {
        self.slas.iter().position(|sla| sla.id() == sla_id)
    }

    pub fn has_sla(&self, sla_id: &str) -> bool {
        self.sla_position(sla_id).is_some()
    }

    pub fn add_sla(&mut self, sla: Sla) {
        self.slas.push(sla);
    }

    /// Overwrites the snapshot with the same id. Returns false if there is none.
    pub fn replace_sla(&mut self, sla: Sla) -> bool {
        match self.sla_position(sla.id()) {
            Some(index) => {
                self.slas[index] = sla;
                true
            }
            None => false,
        }
    }

    /// Removes the snapshot by moving the last one into its slot.
    pub fn remove_sla(&mut self, sla_id: &str) -> Option<Sla> {
        self.sla_position(sla_id)
            .map(|index| self.slas.swap_remove(index))
    }
}
