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

#[derive(Debug)]
pub enum RegistryError {
    /// The registry could not be reached.
    TransportError(String),
    /// The registry answered with something that could not be understood.
    InvalidResponse(String),
    InternalError(String),
}

impl Error for RegistryError {}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RegistryError::TransportError(msg) => write!(f, "registry unreachable: {}", msg),
            RegistryError::InvalidResponse(msg) => write!(f, "invalid registry response: {}", msg),
            RegistryError::InternalError(msg) => write!(f, "registry error: {}", msg),
        }
    }
}
