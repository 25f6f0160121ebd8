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

//! Ledger contracts for a lawn-care marketplace.
//!
//! Technicians take jobs and settle them against a monthly balance through the general contract,
//! which delegates job creation to one sub-contract per job type. Customers hold service-level
//! agreements whose appraised value is computed by the mower contract. All contracts run inside
//! an `Executor` that gives each transaction an isolated context, folds nested contract
//! invocations into the same write set and commits the result atomically.

pub mod addressing;
pub mod context;
pub mod execution;
pub mod families;
pub mod handler;
pub mod offledger;
pub mod protocol;
pub mod state;

#[macro_use]
extern crate log;
