//! Report assembly against the in-memory and SurrealDB ledgers.

use std::sync::Arc;

use auditx_core::domain::rule::{RULE_FUTURE_DATES, RULE_PII_EXPOSURE};
use auditx_core::{
    hash_dataset, ColumnStats, FactorName, MetadataSummary, ReportAssembler, RiskLevel,
    RuleResult, Submitter,
};
use auditx_ledger::fakes::MemoryAuditLedger;
use auditx_ledger::{AuditLedger, SurrealAuditLedger};

const DATASET: &[u8] = b"date,vendor,amount\n2024-03-01,ACME,120.00\n2031-01-01,ACME,-4.00\n";

fn failing_rules() -> Vec<RuleResult> {
    vec![
        RuleResult::failed(RULE_FUTURE_DATES),
        RuleResult::passed(RULE_PII_EXPOSURE),
    ]
}

fn memory_assembler() -> (Arc<MemoryAuditLedger>, ReportAssembler) {
    let ledger = Arc::new(MemoryAuditLedger::new());
    let assembler = ReportAssembler::new(ledger.clone());
    (ledger, assembler)
}

#[tokio::test]
async fn first_submission_creates_record() {
    let (ledger, assembler) = memory_assembler();
    let submitter = Submitter::new("auditor-1");

    let audit = assembler
        .assemble_dataset(DATASET, &failing_rules(), &MetadataSummary::new(), 1, &submitter)
        .await
        .unwrap();

    assert!(audit.created());
    assert_eq!(audit.report.content_hash, hash_dataset(DATASET));
    assert_eq!(audit.report.risk_level, RiskLevel::new(1));
    assert_eq!(audit.report.score(FactorName::Timeliness), 70);
    assert_eq!(audit.receipt.record().submitter, submitter);
    assert_eq!(ledger.len(), 1);
}

#[tokio::test]
async fn resubmission_reports_original_outcome() {
    let (ledger, assembler) = memory_assembler();
    let metadata = MetadataSummary::new();

    let first = assembler
        .assemble_dataset(DATASET, &failing_rules(), &metadata, 1, &Submitter::new("a"))
        .await
        .unwrap();
    let second = assembler
        .assemble_dataset(DATASET, &[], &metadata, 2, &Submitter::new("b"))
        .await
        .unwrap();

    assert!(first.created());
    assert!(!second.created());
    assert_eq!(ledger.len(), 1);

    assert_eq!(second.report.risk_level, RiskLevel::new(1));
    assert_eq!(second.report.timestamp, first.report.timestamp);
    assert_eq!(second.receipt.record(), first.receipt.record());
    assert_eq!(second.receipt.record().submitter, Submitter::new("a"));
    // factors reflect the rules of this call
    assert_eq!(second.report.score(FactorName::Timeliness), 100);
}

#[tokio::test]
async fn negative_risk_level_writes_nothing() {
    let (ledger, assembler) = memory_assembler();
    let err = assembler
        .assemble_dataset(DATASET, &[], &MetadataSummary::new(), -1, &Submitter::anonymous())
        .await
        .unwrap_err();
    assert!(err.is_invalid_input());
    assert!(ledger.is_empty());
}

#[tokio::test]
async fn malformed_metadata_writes_nothing() {
    let (ledger, assembler) = memory_assembler();
    let metadata = MetadataSummary::new().with_column("amount", ColumnStats::with_nulls(f64::NAN));
    let err = assembler
        .assemble_dataset(DATASET, &[], &metadata, 0, &Submitter::anonymous())
        .await
        .unwrap_err();
    assert!(err.is_invalid_input());
    assert!(ledger.is_empty());
}

#[tokio::test]
async fn unavailable_ledger_propagates() {
    let (ledger, assembler) = memory_assembler();
    ledger.set_offline(true);

    let err = assembler
        .assemble_dataset(DATASET, &[], &MetadataSummary::new(), 0, &Submitter::anonymous())
        .await
        .unwrap_err();
    assert!(err.is_unavailable());
    assert!(!err.is_invalid_input());

    ledger.set_offline(false);
    assert!(ledger.is_empty());
}

#[tokio::test]
async fn reconstruct_matches_assembled_report() {
    let (_ledger, assembler) = memory_assembler();
    let hash = hash_dataset(DATASET);
    let rules = failing_rules();
    let metadata = MetadataSummary::new().with_column("vendor", ColumnStats::with_nulls(25.0));

    let before = assembler.reconstruct(&hash, &rules, &metadata).await.unwrap();
    assert!(before.is_none());

    let audit = assembler
        .assemble(&hash, &rules, &metadata, 0, &Submitter::anonymous())
        .await
        .unwrap();
    let rebuilt = assembler
        .reconstruct(&hash, &rules, &metadata)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(rebuilt, audit.report);
}

#[tokio::test]
async fn reconstruct_never_writes() {
    let (ledger, assembler) = memory_assembler();
    let hash = hash_dataset(DATASET);
    assembler
        .reconstruct(&hash, &[], &MetadataSummary::new())
        .await
        .unwrap();
    assert!(ledger.lookup(&hash).await.unwrap().is_none());
}

#[tokio::test]
async fn surreal_ledger_round_trip() {
    let ledger = SurrealAuditLedger::in_memory().await.unwrap();
    let assembler = ReportAssembler::new(Arc::new(ledger));
    let metadata = MetadataSummary::new();

    let first = assembler
        .assemble_dataset(DATASET, &failing_rules(), &metadata, 2, &Submitter::new("ops"))
        .await
        .unwrap();
    let second = assembler
        .assemble_dataset(DATASET, &failing_rules(), &metadata, 0, &Submitter::new("ops"))
        .await
        .unwrap();

    assert!(first.created());
    assert!(!second.created());
    assert_eq!(second.report, first.report);
}
