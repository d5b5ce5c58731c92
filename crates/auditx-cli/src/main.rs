//! AuditX - tamper-evident dataset audits
//!
//! The `auditx` command scores a dataset's quality from externally evaluated
//! rule results and anchors the outcome in a write-once ledger.
//!
//! ## Commands
//!
//! - `hash`: Print the content hash of a dataset file
//! - `score`: Compute the seven quality factors for a rule set
//! - `submit`: Hash, score and record a dataset, then print its report
//! - `lookup`: Show the ledger record anchored for a content hash

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, Level};

use auditx_core::{
    compliance_score, hash_file, write_report_json, AssembledAudit, AuditError, AuditLedger,
    AuditReport, ContentHash, FactorScores, MetadataSummary, ReportArtifact, ReportAssembler,
    RuleResult, ScoringEngine, Submitter,
};
use auditx_ledger::SurrealAuditLedger;

#[derive(Parser)]
#[command(name = "auditx")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Dataset quality scoring with a write-once audit ledger", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the SHA-256 content hash of a dataset file
    Hash {
        /// Dataset file, hashed byte for byte
        file: PathBuf,
    },

    /// Compute quality factors without touching the ledger
    Score {
        /// JSON array of rule results
        #[arg(short, long)]
        rules: PathBuf,

        /// JSON metadata summary with per-column statistics
        #[arg(short, long)]
        metadata: Option<PathBuf>,
    },

    /// Hash, score and record a dataset
    Submit {
        /// Dataset file
        file: PathBuf,

        /// JSON array of rule results
        #[arg(short, long)]
        rules: PathBuf,

        /// JSON metadata summary with per-column statistics
        #[arg(short, long)]
        metadata: Option<PathBuf>,

        /// Risk level to anchor (derived from rule severities if omitted)
        #[arg(long, allow_negative_numbers = true)]
        risk_level: Option<i64>,

        /// Identity recorded with the audit
        #[arg(long, env = "AUDITX_SUBMITTER")]
        submitter: Option<String>,

        /// Write the report artifact as JSON to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the ledger record for a content hash
    Lookup {
        /// 64 hex characters, optionally 0x-prefixed
        hash: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    auditx_core::init_tracing(cli.json, level);

    run(cli.command).await
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Hash { file } => cmd_hash(&file),
        Commands::Score { rules, metadata } => cmd_score(&rules, metadata.as_deref()),
        Commands::Submit {
            file,
            rules,
            metadata,
            risk_level,
            submitter,
            output,
        } => {
            let ledger = open_ledger().await?;
            let submitter = submitter.map(Submitter::new).unwrap_or_else(Submitter::anonymous);
            cmd_submit(
                ledger,
                &file,
                &rules,
                metadata.as_deref(),
                risk_level,
                &submitter,
                output.as_deref(),
            )
            .await
            .map(|_| ())
        }
        Commands::Lookup { hash } => {
            let ledger = open_ledger().await?;
            cmd_lookup(ledger.as_ref(), &hash).await
        }
    }
}

async fn open_ledger() -> Result<Arc<dyn AuditLedger>> {
    let ledger = SurrealAuditLedger::from_env()
        .await
        .context("Failed to open the audit ledger")?;
    Ok(Arc::new(ledger))
}

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {what} file: {:?}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("Malformed {what} JSON in {:?}", path))
}

fn load_inputs(rules: &Path, metadata: Option<&Path>) -> Result<(Vec<RuleResult>, MetadataSummary)> {
    let rules: Vec<RuleResult> = read_json(rules, "rules")?;
    let metadata = match metadata {
        Some(path) => read_json(path, "metadata")?,
        None => MetadataSummary::new(),
    };
    Ok((rules, metadata))
}

/// Map domain errors onto the three outcomes a user must be able to tell apart.
fn explain(err: AuditError) -> anyhow::Error {
    if err.is_unavailable() {
        anyhow::Error::new(err).context("ledger unreachable, retry")
    } else if err.is_invalid_input() {
        anyhow::Error::new(err).context("malformed data")
    } else {
        anyhow::Error::new(err)
    }
}

fn cmd_hash(file: &Path) -> Result<()> {
    let hash = hash_file(file).with_context(|| format!("Failed to read dataset: {:?}", file))?;
    println!("{}", hash);
    Ok(())
}

fn cmd_score(rules: &Path, metadata: Option<&Path>) -> Result<()> {
    let (rules, metadata) = load_inputs(rules, metadata)?;
    let factors = ScoringEngine::standard()
        .score(&rules, &metadata)
        .map_err(explain)?;
    print_factors(&factors);

    let compliance = compliance_score(&rules);
    println!();
    println!(
        "Compliance: {} ({})",
        compliance.final_score, compliance.risk_band
    );
    for line in &compliance.breakdown {
        println!("  {}", line);
    }
    Ok(())
}

async fn cmd_submit(
    ledger: Arc<dyn AuditLedger>,
    file: &Path,
    rules: &Path,
    metadata: Option<&Path>,
    risk_level: Option<i64>,
    submitter: &Submitter,
    output: Option<&Path>,
) -> Result<AssembledAudit> {
    let (rules, metadata) = load_inputs(rules, metadata)?;
    let bytes =
        std::fs::read(file).with_context(|| format!("Failed to read dataset: {:?}", file))?;

    let risk_level = match risk_level {
        Some(level) => level,
        None => {
            let compliance = compliance_score(&rules);
            debug!(score = compliance.final_score, band = %compliance.risk_band, "derived risk level");
            i64::from(compliance.risk_band.risk_level().value())
        }
    };

    let assembler = ReportAssembler::new(ledger);
    let audit = assembler
        .assemble_dataset(&bytes, &rules, &metadata, risk_level, submitter)
        .await
        .map_err(explain)?;

    if audit.created() {
        println!("Recorded {}", audit.report.content_hash);
    } else {
        let original = audit.receipt.record();
        println!(
            "Dataset already audited by {} at {}; the original record is kept.",
            original.submitter,
            format_timestamp(original.timestamp)
        );
    }
    print_report(&audit.report);

    if let Some(path) = output {
        let artifact = ReportArtifact::from_receipt(&audit.report, &audit.receipt);
        write_report_json(path, &artifact)?;
        println!("Report written to {:?}", path);
    }

    Ok(audit)
}

async fn cmd_lookup(ledger: &dyn AuditLedger, hash: &str) -> Result<()> {
    let hash = ContentHash::try_from(hash).context("Invalid content hash")?;
    let record = ledger
        .lookup(&hash)
        .await
        .map_err(|e| explain(e.into()))?;

    match record {
        Some(record) => {
            println!("hash       {}", record.content_hash);
            println!("risk level {}", record.risk_level.value());
            println!("recorded   {}", format_timestamp(record.timestamp));
            println!("submitter  {}", record.submitter);
        }
        None => bail!("not found: {} has never been audited", hash),
    }
    Ok(())
}

fn print_factors(factors: &FactorScores) {
    for factor in factors {
        println!("{:<14} {:>3}", factor.name, factor.score);
    }
}

fn print_report(report: &AuditReport) {
    println!("hash       {}", report.content_hash);
    println!("risk level {}", report.risk_level.value());
    println!("recorded   {}", format_timestamp(report.timestamp));
    println!();
    print_factors(&report.factors);
}

fn format_timestamp(epoch: i64) -> String {
    chrono::DateTime::from_timestamp(epoch, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| epoch.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use auditx_ledger::fakes::MemoryAuditLedger;
    use serde_json::json;

    struct Fixture {
        dir: tempfile::TempDir,
        dataset: PathBuf,
        rules: PathBuf,
    }

    fn fixture(rules: serde_json::Value) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let dataset = dir.path().join("ledger.csv");
        std::fs::write(&dataset, "date,amount\n2024-01-02,15.00\n2030-06-01,-2.00\n").unwrap();
        let rules_path = dir.path().join("rules.json");
        std::fs::write(&rules_path, rules.to_string()).unwrap();
        Fixture {
            dir,
            dataset,
            rules: rules_path,
        }
    }

    #[tokio::test]
    async fn test_submit_derives_risk_from_severity() {
        let fx = fixture(json!([
            {"rule_id": "RULE_002", "passed": false, "severity": "HIGH"},
            {"rule_id": "RULE_003", "passed": false, "severity": "MEDIUM"}
        ]));
        let ledger: Arc<dyn AuditLedger> = Arc::new(MemoryAuditLedger::new());

        let audit = cmd_submit(
            ledger,
            &fx.dataset,
            &fx.rules,
            None,
            None,
            &Submitter::anonymous(),
            None,
        )
        .await
        .unwrap();

        // 100 - 30 - 15 = 55, yellow band
        assert_eq!(audit.report.risk_level.value(), 1);
        assert!(audit.created());
    }

    #[tokio::test]
    async fn test_submit_twice_reports_duplicate_and_writes_artifact() {
        let fx = fixture(json!([]));
        let ledger: Arc<dyn AuditLedger> = Arc::new(MemoryAuditLedger::new());
        let out = fx.dir.path().join("report.json");
        let submitter = Submitter::new("cli-test");

        cmd_submit(ledger.clone(), &fx.dataset, &fx.rules, None, Some(0), &submitter, None)
            .await
            .unwrap();
        let second = cmd_submit(
            ledger,
            &fx.dataset,
            &fx.rules,
            None,
            Some(2),
            &submitter,
            Some(&out),
        )
        .await
        .unwrap();

        assert!(!second.created());
        let artifact: ReportArtifact =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert!(artifact.duplicate);
        assert_eq!(artifact.risk_level, 0);
    }

    #[tokio::test]
    async fn test_submit_offline_says_retry() {
        let fx = fixture(json!([]));
        let memory = Arc::new(MemoryAuditLedger::new());
        memory.set_offline(true);

        let err = cmd_submit(
            memory,
            &fx.dataset,
            &fx.rules,
            None,
            Some(0),
            &Submitter::anonymous(),
            None,
        )
        .await
        .unwrap_err();
        assert!(format!("{err:#}").contains("ledger unreachable, retry"));
    }

    #[tokio::test]
    async fn test_submit_negative_risk_is_malformed() {
        let fx = fixture(json!([]));
        let ledger = Arc::new(MemoryAuditLedger::new());

        let err = cmd_submit(
            ledger.clone(),
            &fx.dataset,
            &fx.rules,
            None,
            Some(-1),
            &Submitter::anonymous(),
            None,
        )
        .await
        .unwrap_err();
        assert!(format!("{err:#}").contains("malformed data"));
        assert!(ledger.is_empty());
    }

    #[tokio::test]
    async fn test_lookup_unknown_and_bad_hash() {
        let ledger = MemoryAuditLedger::new();
        let unknown = ContentHash::from_bytes(b"never submitted").to_hex();

        let err = cmd_lookup(&ledger, &unknown).await.unwrap_err();
        assert!(err.to_string().contains("not found"));

        let err = cmd_lookup(&ledger, "xyz").await.unwrap_err();
        assert!(err.to_string().contains("Invalid content hash"));
    }

    #[test]
    fn test_score_rejects_malformed_rules_file() {
        let fx = fixture(json!({"not": "an array"}));
        let err = cmd_score(&fx.rules, None).unwrap_err();
        assert!(err.to_string().contains("Malformed rules JSON"));
    }

    #[tokio::test]
    async fn test_run_dispatches_parsed_commands() {
        let fx = fixture(json!([{"rule_id": "RULE_001", "passed": false}]));
        let dataset = fx.dataset.to_string_lossy().into_owned();
        let rules = fx.rules.to_string_lossy().into_owned();

        let cli = Cli::try_parse_from(["auditx", "hash", dataset.as_str()]).unwrap();
        run(cli.command).await.unwrap();

        let cli = Cli::try_parse_from(["auditx", "--json", "score", "--rules", rules.as_str()])
            .unwrap();
        assert!(cli.json);
        run(cli.command).await.unwrap();

        let cli = Cli::try_parse_from([
            "auditx",
            "submit",
            dataset.as_str(),
            "--rules",
            rules.as_str(),
            "--risk-level",
            "-2",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Submit {
                risk_level: Some(-2),
                ..
            }
        ));
    }

    #[test]
    fn test_hash_missing_file() {
        assert!(cmd_hash(Path::new("/definitely/not/here.csv")).is_err());
    }
}
