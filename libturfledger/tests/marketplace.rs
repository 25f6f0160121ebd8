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

use std::sync::Arc;

use chrono::{TimeZone, Utc};

use turfledger::execution::{ExecutionError, Executor};
use turfledger::families::marketplace_contracts;
use turfledger::offledger::{JobMetadata, StaticRegistry};
use turfledger::protocol::invocation::InvocationResponse;
use turfledger::protocol::receipt::{TransactionReceipt, TransactionResult};
use turfledger::protocol::transaction::{Transaction, TransactionBuilder};
use turfledger::protocol::{Customer, GeneralContract, Job, JobStatus, JobType, Sla};
use turfledger::state::hashmap::{HashMapState, State};

const TECHNICIAN: &str = "Org1MSP";

struct Ledger {
    executor: Executor<HashMapState>,
    registry: Arc<StaticRegistry>,
}

impl Ledger {
    fn new() -> Self {
        let registry = Arc::new(StaticRegistry::new());
        let executor = Executor::new(HashMapState::new(), HashMapState::state_id(&State::new()))
            .with_contracts(marketplace_contracts(registry.clone()));
        Ledger { executor, registry }
    }

    fn with_job(self, job_id: &str, job_type: JobType, product_id: &str) -> Self {
        self.with_tagged_job(job_id, job_type.as_str(), product_id)
    }

    fn with_tagged_job(self, job_id: &str, tag: &str, product_id: &str) -> Self {
        self.registry.add_job(JobMetadata {
            work_id: job_id.to_string(),
            product_id: product_id.to_string(),
            event_type: tag.to_string(),
            address: "Storgatan 1".to_string(),
            start_time: Utc
                .with_ymd_and_hms(2023, 6, 1, 8, 0, 0)
                .single()
                .expect("valid timestamp"),
        });
        self
    }

    fn execute(&self, identity: &str, contract: &str, args: &[&str]) -> TransactionReceipt {
        self.executor
            .execute(&txn(identity, contract, args))
            .expect("Unable to execute transaction")
    }

    fn query(&self, identity: &str, contract: &str, args: &[&str]) -> InvocationResponse {
        self.executor
            .query(
                contract,
                &args.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
                identity,
            )
            .expect("Unable to run query")
    }

    fn payload_of<T: serde::de::DeserializeOwned>(
        &self,
        identity: &str,
        contract: &str,
        args: &[&str],
    ) -> T {
        let response = self.query(identity, contract, args);
        assert!(response.is_success(), "{}", response.payload_lossy());
        serde_json::from_slice(response.payload()).expect("Unable to parse payload")
    }

    fn general_contract(&self, technician_id: &str) -> GeneralContract {
        let response = self.query(
            technician_id,
            "generalcontract",
            &["ReadGeneralContract", technician_id],
        );
        assert!(response.is_success(), "{}", response.payload_lossy());
        serde_json::from_slice(response.payload()).expect("Unable to parse general contract")
    }
}

fn txn(identity: &str, contract: &str, args: &[&str]) -> Transaction {
    TransactionBuilder::new()
        .with_contract(contract.to_string())
        .with_args(args.iter().map(|s| s.to_string()).collect())
        .with_identity(identity.to_string())
        .build()
        .expect("Unable to build transaction")
}

fn assert_valid(receipt: &TransactionReceipt) {
    assert!(
        receipt.is_valid(),
        "Expected a valid receipt, got {:?}",
        receipt.error_message()
    );
}

fn assert_rejected(receipt: &TransactionReceipt, status: u16, error: &str) {
    match &receipt.transaction_result {
        TransactionResult::Invalid {
            status: actual,
            error_message,
        } => {
            assert_eq!(status, *actual, "{}", error_message);
            assert!(
                error_message.starts_with(error),
                "Expected {}, got {}",
                error,
                error_message
            );
        }
        result => panic!("Expected {} to be rejected, got {:?}", error, result),
    }
}

#[test]
fn customer_sla_is_valued_by_service_level() {
    let ledger = Ledger::new();
    assert_valid(&ledger.execute(TECHNICIAN, "customer", &["CreateCustomer", "c1"]));

    for (level, id, value) in [
        ("standard", "s-1", 57),
        ("gold", "s-2", 114),
        ("platinum", "s-3", 229),
    ]
    .iter()
    {
        let receipt = ledger.execute(
            TECHNICIAN,
            "customer",
            &["CreateSLA", "c1", *level, "5", "10", "2", *id],
        );
        assert_valid(&receipt);
        let sla: Sla = serde_json::from_slice(receipt.payload().unwrap_or_default()).unwrap();
        assert_eq!(*value, sla.appraised_value());
        assert_eq!(*id, sla.id());
    }

    let receipt = ledger.execute(
        TECHNICIAN,
        "customer",
        &["UpdateServiceLevel", "c1", "s-1", "platinum"],
    );
    assert_valid(&receipt);
    let sla: Sla = serde_json::from_slice(receipt.payload().unwrap_or_default()).unwrap();
    assert_eq!(229, sla.appraised_value());

    let stored = ledger.query(TECHNICIAN, "mower", &["ReadSLA", "s-1"]);
    let stored: Sla = serde_json::from_slice(stored.payload()).unwrap();
    assert_eq!(sla, stored);
}

#[test]
fn removed_sla_leaves_customer_and_mower() {
    let ledger = Ledger::new();
    assert_valid(&ledger.execute(TECHNICIAN, "customer", &["CreateCustomer", "c1"]));
    for id in ["s-1", "s-2", "s-3"].iter() {
        assert_valid(&ledger.execute(
            TECHNICIAN,
            "customer",
            &["CreateSLA", "c1", "standard", "5", "10", "2", *id],
        ));
    }

    let receipt = ledger.execute(TECHNICIAN, "customer", &["RemoveSLA", "c1", "s-1"]);
    assert_valid(&receipt);
    let customer: Customer = serde_json::from_slice(receipt.payload().unwrap_or_default()).unwrap();
    let held: Vec<&str> = customer.slas().iter().map(Sla::id).collect();
    assert_eq!(vec!["s-3", "s-2"], held);

    let all = ledger.query(TECHNICIAN, "customer", &["GetAllSLA", "c1"]);
    assert!(all.is_success(), "{}", all.payload_lossy());
    let all: Vec<Sla> = serde_json::from_slice(all.payload()).unwrap();
    assert_eq!(2, all.len());

    let gone = ledger.query(TECHNICIAN, "mower", &["ReadSLA", "s-1"]);
    assert_eq!(InvocationResponse::BAD_REQUEST, gone.status());
}

#[test]
fn sla_with_bad_interval_is_rejected_everywhere() {
    let ledger = Ledger::new();
    assert_valid(&ledger.execute(TECHNICIAN, "customer", &["CreateCustomer", "c1"]));

    let receipt = ledger.execute(
        TECHNICIAN,
        "customer",
        &["CreateSLA", "c1", "gold", "5", "2", "10", "s-1"],
    );
    assert_rejected(&receipt, 400, "SubcontractInvocationFailed");

    let customer = ledger.query(TECHNICIAN, "customer", &["ReadCustomer", "c1"]);
    let customer: Customer = serde_json::from_slice(customer.payload()).unwrap();
    assert!(customer.slas().is_empty());
    assert_eq!(
        InvocationResponse::BAD_REQUEST,
        ledger.query(TECHNICIAN, "mower", &["ReadSLA", "s-1"]).status()
    );
}

#[test]
fn general_contract_is_created_once() {
    let ledger = Ledger::new();
    assert_valid(&ledger.execute(TECHNICIAN, "generalcontract", &["CreateGeneralContract"]));
    assert_rejected(
        &ledger.execute(TECHNICIAN, "generalcontract", &["CreateGeneralContract"]),
        400,
        "AlreadyExists",
    );

    let contract = ledger.general_contract(TECHNICIAN);
    assert_eq!(TECHNICIAN, contract.technician_id());
    assert_eq!(0, contract.monthly_balance());
    assert!(contract.jobs().is_empty());
}

#[test]
fn taken_job_is_ongoing_with_deadline() {
    let ledger = Ledger::new().with_job("w-1", JobType::Bumpy, "p-1");
    ledger.registry.set_service_level("p-1", "gold");
    assert_valid(&ledger.execute(TECHNICIAN, "generalcontract", &["CreateGeneralContract"]));

    let receipt = ledger.execute(TECHNICIAN, "generalcontract", &["TakeJob", "w-1", TECHNICIAN]);
    assert_valid(&receipt);
    let job: Job = serde_json::from_slice(receipt.payload().unwrap_or_default()).unwrap();
    assert_eq!(JobStatus::Ongoing, job.status());
    assert_eq!(JobType::Bumpy, job.job_type());
    assert_eq!(
        "2023-06-06T08:00:00+00:00",
        job.deadline().map(|d| d.to_rfc3339()).unwrap_or_default()
    );
    assert_eq!(
        vec!["generalcontract/job-taken"],
        receipt
            .events()
            .iter()
            .map(|event| event.event_type.as_str())
            .collect::<Vec<_>>()
    );

    let created = ledger.query(TECHNICIAN, "bumpy", &["JobExistsOnLedger", "w-1"]);
    assert_eq!(b"true".to_vec(), created.payload().to_vec());

    assert_rejected(
        &ledger.execute(TECHNICIAN, "generalcontract", &["TakeJob", "w-1", TECHNICIAN]),
        400,
        "DuplicateJob",
    );
    assert_eq!(1, ledger.general_contract(TECHNICIAN).jobs().len());
}

#[test]
fn take_job_needs_a_contract_and_a_known_job() {
    let ledger = Ledger::new().with_job("w-1", JobType::Razor, "p-1");
    assert_rejected(
        &ledger.execute(TECHNICIAN, "generalcontract", &["TakeJob", "w-1", TECHNICIAN]),
        400,
        "NotFound",
    );

    assert_valid(&ledger.execute(TECHNICIAN, "generalcontract", &["CreateGeneralContract"]));
    assert_rejected(
        &ledger.execute(TECHNICIAN, "generalcontract", &["TakeJob", "w-9", TECHNICIAN]),
        400,
        "NotFoundExternally",
    );

    ledger.registry.set_unavailable(true);
    assert_rejected(
        &ledger.execute(TECHNICIAN, "generalcontract", &["TakeJob", "w-1", TECHNICIAN]),
        500,
        "ExternalLookupFailed",
    );
}

#[test]
fn failed_sub_contract_leaves_aggregate_unchanged() {
    let ledger = Ledger::new().with_job("w-1", JobType::Razor, "p-1");
    ledger.registry.mark_unassignable("w-1");
    assert_valid(&ledger.execute(TECHNICIAN, "generalcontract", &["CreateGeneralContract"]));

    let before = ledger.query(
        TECHNICIAN,
        "generalcontract",
        &["ReadGeneralContract", TECHNICIAN],
    );
    let head = ledger.executor.head().unwrap();

    assert_rejected(
        &ledger.execute(TECHNICIAN, "generalcontract", &["TakeJob", "w-1", TECHNICIAN]),
        400,
        "SubcontractInvocationFailed",
    );

    let after = ledger.query(
        TECHNICIAN,
        "generalcontract",
        &["ReadGeneralContract", TECHNICIAN],
    );
    assert_eq!(before.payload(), after.payload());
    assert_eq!(head, ledger.executor.head().unwrap());
    assert_eq!(
        b"false".to_vec(),
        ledger
            .query(TECHNICIAN, "razor", &["JobExistsOnLedger", "w-1"])
            .payload()
            .to_vec()
    );
}

#[test]
fn settling_credits_the_monthly_balance() {
    let ledger = Ledger::new()
        .with_job("w-1", JobType::Bumpy, "p-1")
        .with_job("w-2", JobType::Bumpy, "p-2");
    assert_valid(&ledger.execute(TECHNICIAN, "generalcontract", &["CreateGeneralContract"]));
    for job_id in ["w-1", "w-2"].iter() {
        assert_valid(&ledger.execute(
            TECHNICIAN,
            "generalcontract",
            &["TakeJob", *job_id, TECHNICIAN],
        ));
    }

    let receipt = ledger.execute(TECHNICIAN, "generalcontract", &["JobDoneCorrectError", "w-1"]);
    assert_valid(&receipt);
    assert_eq!(100, ledger.general_contract(TECHNICIAN).monthly_balance());

    assert_valid(&ledger.execute(TECHNICIAN, "generalcontract", &["JobDoneWrongError", "w-2"]));
    let contract = ledger.general_contract(TECHNICIAN);
    assert_eq!(150, contract.monthly_balance());
    assert!(contract
        .jobs()
        .iter()
        .all(|job| job.status() == JobStatus::Done));

    assert_rejected(
        &ledger.execute(TECHNICIAN, "generalcontract", &["JobDoneCorrectError", "w-1"]),
        400,
        "AlreadySettled",
    );
    assert_eq!(150, ledger.general_contract(TECHNICIAN).monthly_balance());
}

#[test]
fn unfinished_work_is_not_settled() {
    let ledger = Ledger::new().with_job("w-1", JobType::Inspect, "p-1");
    ledger.registry.mark_pending("w-1");
    assert_valid(&ledger.execute(TECHNICIAN, "generalcontract", &["CreateGeneralContract"]));
    assert_valid(&ledger.execute(
        TECHNICIAN,
        "generalcontract",
        &["TakeJob", "w-1", TECHNICIAN],
    ));

    assert_rejected(
        &ledger.execute(TECHNICIAN, "generalcontract", &["JobDoneCorrectError", "w-1"]),
        400,
        "JobNotDone",
    );

    ledger.registry.mark_done("w-1");
    assert_valid(&ledger.execute(TECHNICIAN, "generalcontract", &["JobDoneCorrectError", "w-1"]));
    assert_eq!(50, ledger.general_contract(TECHNICIAN).monthly_balance());
}

#[test]
fn inspection_can_be_marked_incorrect() {
    let ledger = Ledger::new().with_job("w-1", JobType::Inspect, "p-1");
    assert_valid(&ledger.execute(TECHNICIAN, "generalcontract", &["CreateGeneralContract"]));
    assert_valid(&ledger.execute(
        TECHNICIAN,
        "generalcontract",
        &["TakeJob", "w-1", TECHNICIAN],
    ));

    assert_valid(&ledger.execute(TECHNICIAN, "inspect", &["IncorrectError", TECHNICIAN, "w-1"]));
    let record = ledger.query(TECHNICIAN, "inspect", &["ReadJob", "w-1"]);
    let record: serde_json::Value = serde_json::from_slice(record.payload()).unwrap();
    assert_eq!(false, record["CorrectError"]);

    assert_rejected(
        &ledger.execute(TECHNICIAN, "inspect", &["IncorrectError", TECHNICIAN, "w-9"]),
        400,
        "NotFound",
    );
}

#[test]
fn racing_transactions_on_one_aggregate() {
    let ledger = Ledger::new()
        .with_job("w-1", JobType::Bumpy, "p-1")
        .with_job("w-2", JobType::Razor, "p-2");
    assert_valid(&ledger.execute(TECHNICIAN, "generalcontract", &["CreateGeneralContract"]));

    let first = ledger
        .executor
        .simulate(&txn(
            TECHNICIAN,
            "generalcontract",
            &["TakeJob", "w-1", TECHNICIAN],
        ))
        .unwrap();
    let second = ledger
        .executor
        .simulate(&txn(
            TECHNICIAN,
            "generalcontract",
            &["TakeJob", "w-2", TECHNICIAN],
        ))
        .unwrap();
    assert!(first.is_valid() && second.is_valid());

    assert_valid(&ledger.executor.commit(first).unwrap());
    match ledger.executor.commit(second) {
        Err(ExecutionError::StaleReadSet(_)) => (),
        res => panic!("Expected StaleReadSet, got {:?}", res),
    }

    let contract = ledger.general_contract(TECHNICIAN);
    assert_eq!(1, contract.jobs().len());
    assert!(contract.has_job("w-1"));
}

#[test]
fn settling_never_touches_another_aggregate() {
    let ledger = Ledger::new().with_job("w-1", JobType::Bumpy, "p-1");
    assert_rejected(
        &ledger.execute("Org1MSP/w-1", "generalcontract", &["CreateGeneralContract"]),
        400,
        "InvalidArgument",
    );

    assert_valid(&ledger.execute(TECHNICIAN, "generalcontract", &["CreateGeneralContract"]));
    assert_valid(&ledger.execute(
        TECHNICIAN,
        "generalcontract",
        &["TakeJob", "w-1", TECHNICIAN],
    ));
    assert_valid(&ledger.execute(TECHNICIAN, "generalcontract", &["JobDoneCorrectError", "w-1"]));

    let lookalike = ledger.query(
        TECHNICIAN,
        "generalcontract",
        &["ReadGeneralContract", "Org1MSP/w-1"],
    );
    assert_eq!(InvocationResponse::BAD_REQUEST, lookalike.status());
    assert!(lookalike.payload_lossy().starts_with("InvalidArgument"));

    let contract = ledger.general_contract(TECHNICIAN);
    assert_eq!(100, contract.monthly_balance());
    assert_eq!(1, contract.jobs().len());
}

#[test]
fn jobs_are_only_created_through_take_job() {
    let ledger = Ledger::new().with_job("w-1", JobType::Bumpy, "p-1");
    assert_valid(&ledger.execute(TECHNICIAN, "generalcontract", &["CreateGeneralContract"]));

    assert_rejected(
        &ledger.execute(
            TECHNICIAN,
            "bumpy",
            &["Create", TECHNICIAN, "w-1", "p-1", "Storgatan 1"],
        ),
        400,
        "PermissionDenied",
    );
    assert_eq!(
        b"false".to_vec(),
        ledger
            .query(TECHNICIAN, "bumpy", &["JobExistsOnLedger", "w-1"])
            .payload()
            .to_vec()
    );

    assert_valid(&ledger.execute(
        TECHNICIAN,
        "generalcontract",
        &["TakeJob", "w-1", TECHNICIAN],
    ));
    assert_eq!(1, ledger.general_contract(TECHNICIAN).jobs().len());
}

#[test]
fn slas_are_only_created_through_customers() {
    let ledger = Ledger::new();
    assert_rejected(
        &ledger.execute(
            TECHNICIAN,
            "mower",
            &["CreateSLA", "s-1", "gold", "5", "10", "2"],
        ),
        400,
        "PermissionDenied",
    );
    assert_eq!(
        InvocationResponse::BAD_REQUEST,
        ledger.query(TECHNICIAN, "mower", &["ReadSLA", "s-1"]).status()
    );
}

#[test]
fn customer_updates_are_re_evaluated() {
    let ledger = Ledger::new();
    assert_valid(&ledger.execute(TECHNICIAN, "customer", &["CreateCustomer", "c1"]));
    assert_valid(&ledger.execute(
        TECHNICIAN,
        "customer",
        &["CreateSLA", "c1", "standard", "5", "10", "2", "s-1"],
    ));

    // 50 * (1 + 0.7/8 + 0.3/4) = 58.125
    assert_valid(&ledger.execute(
        TECHNICIAN,
        "customer",
        &["UpdateTargetGrassLength", "c1", "s-1", "4"],
    ));
    let customer: Customer = ledger.payload_of(TECHNICIAN, "customer", &["ReadCustomer", "c1"]);
    assert_eq!(58, customer.slas()[0].appraised_value());
    let sla: Sla = ledger.payload_of(TECHNICIAN, "mower", &["ReadSLA", "s-1"]);
    assert_eq!(58, sla.appraised_value());
    assert_eq!(4.0, sla.target_grass_length());

    // 50 * (1 + 0.7/4 + 0.3/4) = 62.5
    assert_valid(&ledger.execute(
        TECHNICIAN,
        "customer",
        &["UpdateGrassLengthInterval", "c1", "s-1", "6", "2"],
    ));
    let customer: Customer = ledger.payload_of(TECHNICIAN, "customer", &["ReadCustomer", "c1"]);
    assert_eq!(62, customer.slas()[0].appraised_value());
    let sla: Sla = ledger.payload_of(TECHNICIAN, "mower", &["ReadSLA", "s-1"]);
    assert_eq!(62, sla.appraised_value());
    assert_eq!(customer.slas()[0], sla);

    let through_customer: Sla =
        ledger.payload_of(TECHNICIAN, "customer", &["ReadMowerSLA", "c1", "s-1"]);
    assert_eq!(sla, through_customer);
    assert_rejected(
        &ledger.execute(TECHNICIAN, "customer", &["ReadMowerSLA", "c1", "s-9"]),
        400,
        "NotFound",
    );
}

#[test]
fn mower_entry_points() {
    let ledger = Ledger::new();
    let value: i64 = ledger.payload_of(
        TECHNICIAN,
        "mower",
        &["EvaluateSLA", "gold", "5", "10", "2"],
    );
    assert_eq!(114, value);

    assert_valid(&ledger.execute(TECHNICIAN, "customer", &["CreateCustomer", "c1"]));
    for id in ["s-b", "s-a"].iter() {
        assert_valid(&ledger.execute(
            TECHNICIAN,
            "customer",
            &["CreateSLA", "c1", "standard", "5", "10", "2", *id],
        ));
    }
    let all: Vec<Sla> = ledger.payload_of(TECHNICIAN, "mower", &["GetAllSLA"]);
    assert_eq!(
        vec!["s-a", "s-b"],
        all.iter().map(Sla::id).collect::<Vec<_>>()
    );

    let receipt = ledger.execute(TECHNICIAN, "mower", &["DeleteSLA", "s-a"]);
    assert_valid(&receipt);
    assert_eq!(Some(&[][..]), receipt.payload());
    assert_rejected(
        &ledger.execute(TECHNICIAN, "mower", &["DeleteSLA", "s-a"]),
        400,
        "NotFound",
    );
    let all: Vec<Sla> = ledger.payload_of(TECHNICIAN, "mower", &["GetAllSLA"]);
    assert_eq!(vec!["s-b"], all.iter().map(Sla::id).collect::<Vec<_>>());

    // the customer still references s-a, so reading its SLAs fails on the first missing record
    let stale = ledger.query(TECHNICIAN, "customer", &["GetAllSLA", "c1"]);
    assert_eq!(InvocationResponse::BAD_REQUEST, stale.status());
    assert!(stale.payload_lossy().starts_with("NotFound"));
}

#[test]
fn taken_jobs_can_be_read_back() {
    let ledger = Ledger::new()
        .with_job("w-1", JobType::Razor, "p-1")
        .with_job("w-2", JobType::Bumpy, "p-2");
    assert_valid(&ledger.execute(TECHNICIAN, "generalcontract", &["CreateGeneralContract"]));
    for job_id in ["w-1", "w-2"].iter() {
        assert_valid(&ledger.execute(
            TECHNICIAN,
            "generalcontract",
            &["TakeJob", *job_id, TECHNICIAN],
        ));
    }

    let job: Job = ledger.payload_of(
        TECHNICIAN,
        "generalcontract",
        &["ReadJob", "w-1", TECHNICIAN],
    );
    assert_eq!(JobStatus::Ongoing, job.status());
    assert_eq!(JobType::Razor, job.job_type());
    assert_eq!(150, job.job_pay());

    let jobs: Vec<Job> = ledger.payload_of(TECHNICIAN, "generalcontract", &["GetAllJobs"]);
    assert_eq!(
        vec!["w-1", "w-2"],
        jobs.iter().map(Job::id).collect::<Vec<_>>()
    );

    assert_valid(&ledger.execute(TECHNICIAN, "generalcontract", &["JobDoneWrongError", "w-1"]));
    let job: Job = ledger.payload_of(
        TECHNICIAN,
        "generalcontract",
        &["ReadJob", "w-1", TECHNICIAN],
    );
    assert_eq!(JobStatus::Done, job.status());

    assert_rejected(
        &ledger.execute(TECHNICIAN, "generalcontract", &["ReadJob", "w-9", TECHNICIAN]),
        400,
        "NotFound",
    );
}

#[test]
fn unknown_job_type_fails_before_any_sub_contract() {
    let ledger = Ledger::new().with_tagged_job("w-1", "hedge", "p-1");
    assert_valid(&ledger.execute(TECHNICIAN, "generalcontract", &["CreateGeneralContract"]));
    let head = ledger.executor.head().unwrap();

    assert_rejected(
        &ledger.execute(TECHNICIAN, "generalcontract", &["TakeJob", "w-1", TECHNICIAN]),
        400,
        "UnknownJobType",
    );
    assert_eq!(head, ledger.executor.head().unwrap());
    assert!(ledger.general_contract(TECHNICIAN).jobs().is_empty());
}
