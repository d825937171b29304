#![allow(dead_code)]

// tests/common/mod.rs
use moonrise::db::txn_policy::{set_txn_policy, TxnPolicy};

// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

// Games span many intents, so the suites commit by default. Each test owns a
// private in-memory database. `MOONRISE_TXN_POLICY=rollback` flips it.
#[ctor::ctor]
fn init_txn_policy() {
    let policy = match std::env::var("MOONRISE_TXN_POLICY")
        .unwrap_or_default()
        .to_lowercase()
        .as_str()
    {
        "rollback" => TxnPolicy::RollbackOnOk,
        _ => TxnPolicy::CommitOnOk,
    };

    set_txn_policy(policy);
}
