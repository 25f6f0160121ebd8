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

#[macro_use]
extern crate clap;
#[macro_use]
extern crate log;

use std::error::Error;
use std::fs;
use std::process;
use std::sync::Arc;

use log::LevelFilter;
use serde_json::Value;

use turfledger::execution::Executor;
use turfledger::families::marketplace_contracts;
#[cfg(feature = "arrowhead")]
use turfledger::offledger::{ArrowheadConfig, ArrowheadRegistry};
use turfledger::offledger::{OffLedgerRegistry, StaticRegistry};
use turfledger::protocol::transaction::Transaction;
use turfledger::state::hashmap::{HashMapState, State};

fn main() {
    let matches = clap_app!(turfledger_tp =>
        (version: crate_version!())
        (about: "Runs marketplace transactions against an in-memory ledger")
        (@arg registry: -r --registry +takes_value
         "JSON fixture answering off-ledger job and service level lookups")
        (@arg arrowhead: --arrowhead +takes_value
         "JSON Arrowhead configuration; replaces the fixture registry")
        (@arg identity: -i --identity +takes_value
         "identity for transactions that do not name one")
        (@arg verbose: -v --verbose +multiple
         "increase output verbosity")
        (@arg transactions: +required
         "JSON file holding an array of transactions"))
    .get_matches();

    let logger = simple_logger::SimpleLogger::new().with_utc_timestamps();
    let logger = match matches.occurrences_of("verbose") {
        0 => logger.with_level(LevelFilter::Warn),
        1 => logger.with_level(LevelFilter::Info),
        2 => logger.with_level(LevelFilter::Debug),
        _ => logger.with_level(LevelFilter::Trace),
    };

    logger.init().expect("Failed to create logger");

    if let Err(err) = run(&matches) {
        error!("{}", err);
        process::exit(1);
    }
}

fn run(matches: &clap::ArgMatches) -> Result<(), Box<dyn Error>> {
    let registry = load_registry(matches)?;
    let executor = Executor::new(HashMapState::new(), HashMapState::state_id(&State::new()))
        .with_contracts(marketplace_contracts(registry));

    let identity = matches.value_of("identity").unwrap_or("Org1MSP");
    let transactions = load_transactions(
        matches
            .value_of("transactions")
            .ok_or("no transactions file given")?,
        identity,
    )?;

    for transaction in &transactions {
        let receipt = executor.execute(transaction)?;
        println!("{}", serde_json::to_string(&receipt)?);
    }

    info!(
        "Ran {} transactions, head is {}",
        transactions.len(),
        executor.head()?
    );
    Ok(())
}

fn load_registry(matches: &clap::ArgMatches) -> Result<Arc<dyn OffLedgerRegistry>, Box<dyn Error>> {
    #[cfg(feature = "arrowhead")]
    {
        if let Some(path) = matches.value_of("arrowhead") {
            let config: ArrowheadConfig = serde_json::from_str(&fs::read_to_string(path)?)?;
            info!("Using Arrowhead orchestrator at {}", config.orchestrator_url);
            return Ok(Arc::new(ArrowheadRegistry::new(config)?));
        }
    }
    #[cfg(not(feature = "arrowhead"))]
    {
        if matches.is_present("arrowhead") {
            return Err("built without the arrowhead feature".into());
        }
    }

    match matches.value_of("registry") {
        Some(path) => Ok(Arc::new(StaticRegistry::from_json(&fs::read_to_string(
            path,
        )?)?)),
        None => {
            warn!("No registry fixture given; every off-ledger lookup will come back empty");
            Ok(Arc::new(StaticRegistry::new()))
        }
    }
}

/// Reads the transactions, giving `identity` to those that do not carry one.
fn load_transactions(path: &str, identity: &str) -> Result<Vec<Transaction>, Box<dyn Error>> {
    let raw: Vec<Value> = serde_json::from_str(&fs::read_to_string(path)?)?;
    raw.into_iter()
        .map(|mut value| {
            if let Some(fields) = value.as_object_mut() {
                fields
                    .entry("identity")
                    .or_insert_with(|| Value::String(identity.to_string()));
            }
            Ok(serde_json::from_value(value)?)
        })
        .collect()
}
