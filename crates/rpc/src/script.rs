//! Operation scripts
//!
//! A script is a JSON array of operations tagged by `op`:
//!
//! ```json
//! [
//!   { "op": "generate", "event_id": "E1", "origin_shard": "Port", "contract_address": "0x1", "umbrella": "SORA" },
//!   { "op": "record_xx", "event_id": "E1", "detected_alteration": true, "alteration_types": ["swap"], "actors": ["A1"] },
//!   { "op": "proof", "event_id": "E1", "witnesses": ["W1", "W2", "W3"] }
//! ]
//! ```

use chrono::Utc;
use ripple_core::{DensityScore, Hash32, RestitutionStatus};
use ripple_ledger::{
    CutReport, DepthReport, IntentReport, LedgerError, LedgerResult, ReturnReport, RippleLedger,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Failed to read script: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed script: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Step {index} ({op}) failed: {source}")]
    Step {
        index: usize,
        op: &'static str,
        #[source]
        source: LedgerError,
    },
}

/// One scripted ledger call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// Create a record; a conventional id is generated when none is given
    Generate {
        #[serde(default)]
        event_id: Option<String>,
        origin_shard: String,
        contract_address: String,
        umbrella: String,
    },
    RecordXx {
        event_id: String,
        detected_alteration: bool,
        #[serde(default)]
        alteration_types: Vec<String>,
        #[serde(default)]
        actors: Vec<String>,
    },
    RecordYy {
        event_id: String,
        original_owner: String,
        #[serde(default)]
        return_path: Vec<String>,
        #[serde(default)]
        restitution_status: RestitutionStatus,
        #[serde(default)]
        stolen_cycles_returned: u64,
    },
    RecordZz {
        event_id: String,
        scan_depth: u64,
        #[serde(default)]
        hidden_layers: Vec<String>,
        #[serde(default)]
        layer_types: Vec<String>,
    },
    RecordTt {
        event_id: String,
        event_type: String,
        memory_weave: String,
    },
    RecordWw {
        event_id: String,
        #[serde(default)]
        real_motive: String,
        #[serde(default)]
        stated_reason: String,
        #[serde(default)]
        hidden_agenda: String,
        #[serde(default)]
        authority_chain: Vec<String>,
        #[serde(default)]
        order_behind_action: String,
    },
    Density {
        event_id: String,
        score: i64,
    },
    Proof {
        event_id: String,
        witnesses: Vec<String>,
    },
    /// Print the JSON snapshot of a record
    Show {
        event_id: String,
    },
    /// Print the watchtower CSV row of a record
    Export {
        event_id: String,
    },
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Generate { .. } => "generate",
            Operation::RecordXx { .. } => "record_xx",
            Operation::RecordYy { .. } => "record_yy",
            Operation::RecordZz { .. } => "record_zz",
            Operation::RecordTt { .. } => "record_tt",
            Operation::RecordWw { .. } => "record_ww",
            Operation::Density { .. } => "density",
            Operation::Proof { .. } => "proof",
            Operation::Show { .. } => "show",
            Operation::Export { .. } => "export",
        }
    }
}

/// What a successful operation produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created(String),
    Recorded(String),
    MemoryHash(Hash32),
    Density(DensityScore),
    Proof(Hash32),
    Snapshot(String),
    Row(String),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Created(id) => write!(f, "created {}", id),
            Outcome::Recorded(id) => write!(f, "recorded {}", id),
            Outcome::MemoryHash(hash) => write!(f, "memory_hash {}", hash),
            Outcome::Density(score) => write!(f, "density_score {}", score),
            Outcome::Proof(hash) => write!(f, "proof_hash {}", hash),
            Outcome::Snapshot(json) => f.write_str(json),
            Outcome::Row(line) => f.write_str(line),
        }
    }
}

/// Result of one step in a script run
#[derive(Debug)]
pub struct StepResult {
    pub index: usize,
    pub op: &'static str,
    pub result: LedgerResult<Outcome>,
}

/// Summary of a script run
#[derive(Debug, Default)]
pub struct ScriptReport {
    pub steps: Vec<StepResult>,
}

impl ScriptReport {
    pub fn succeeded(&self) -> usize {
        self.steps.iter().filter(|s| s.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.steps.len() - self.succeeded()
    }
}

pub fn parse(json: &str) -> Result<Vec<Operation>, ScriptError> {
    Ok(serde_json::from_str(json)?)
}

pub fn load(path: &Path) -> Result<Vec<Operation>, ScriptError> {
    parse(&std::fs::read_to_string(path)?)
}

/// Apply one operation to the ledger
pub fn execute(ledger: &RippleLedger, operation: Operation) -> LedgerResult<Outcome> {
    match operation {
        Operation::Generate {
            event_id,
            origin_shard,
            contract_address,
            umbrella,
        } => {
            let event_id = event_id.unwrap_or_else(|| ripple_core::event_id::generate(Utc::now()));
            let event =
                ledger.generate_ripple(&event_id, &origin_shard, &contract_address, &umbrella)?;
            Ok(Outcome::Created(event.event_id))
        }
        Operation::RecordXx {
            event_id,
            detected_alteration,
            alteration_types,
            actors,
        } => {
            ledger.record_xx(
                &event_id,
                CutReport {
                    detected_alteration,
                    alteration_types,
                    actors,
                },
            )?;
            Ok(Outcome::Recorded(event_id))
        }
        Operation::RecordYy {
            event_id,
            original_owner,
            return_path,
            restitution_status,
            stolen_cycles_returned,
        } => {
            ledger.record_yy(
                &event_id,
                ReturnReport {
                    original_owner,
                    return_path,
                    restitution_status,
                    stolen_cycles_returned,
                },
            )?;
            Ok(Outcome::Recorded(event_id))
        }
        Operation::RecordZz {
            event_id,
            scan_depth,
            hidden_layers,
            layer_types,
        } => {
            ledger.record_zz(
                &event_id,
                DepthReport {
                    scan_depth,
                    hidden_layers,
                    layer_types,
                },
            )?;
            Ok(Outcome::Recorded(event_id))
        }
        Operation::RecordTt {
            event_id,
            event_type,
            memory_weave,
        } => ledger
            .record_tt(&event_id, &event_type, &memory_weave)
            .map(Outcome::MemoryHash),
        Operation::RecordWw {
            event_id,
            real_motive,
            stated_reason,
            hidden_agenda,
            authority_chain,
            order_behind_action,
        } => {
            ledger.record_ww(
                &event_id,
                IntentReport {
                    real_motive,
                    stated_reason,
                    hidden_agenda,
                    authority_chain,
                    order_behind_action,
                },
            )?;
            Ok(Outcome::Recorded(event_id))
        }
        Operation::Density { event_id, score } => ledger
            .update_density_score(&event_id, score)
            .map(Outcome::Density),
        Operation::Proof {
            event_id,
            witnesses,
        } => ledger
            .generate_tribunal_proof(&event_id, &witnesses)
            .map(Outcome::Proof),
        Operation::Show { event_id } => ledger.export_json(&event_id).map(Outcome::Snapshot),
        Operation::Export { event_id } => {
            let row = ledger.watchtower_row(&event_id)?;
            row.to_csv_line().map(Outcome::Row)
        }
    }
}

/// Run every operation in order.
///
/// Failures are collected in the report; with `fail_fast` the first one
/// aborts the run instead.
pub fn run(
    ledger: &RippleLedger,
    operations: Vec<Operation>,
    fail_fast: bool,
) -> Result<ScriptReport, ScriptError> {
    let mut report = ScriptReport::default();

    for (index, operation) in operations.into_iter().enumerate() {
        let op = operation.name();
        let result = execute(ledger, operation);

        if let Err(e) = &result {
            tracing::warn!(index, op, error = %e, "Script step failed");
            if fail_fast {
                return Err(ScriptError::Step {
                    index,
                    op,
                    source: e.clone(),
                });
            }
        }
        report.steps.push(StepResult { index, op, result });
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = r#"[
        { "op": "generate", "event_id": "E1", "origin_shard": "Port", "contract_address": "0x1", "umbrella": "SORA" },
        { "op": "record_xx", "event_id": "E1", "detected_alteration": true, "alteration_types": ["swap"], "actors": ["A1"] },
        { "op": "record_yy", "event_id": "E1", "original_owner": "O1", "return_path": ["O1"], "restitution_status": "in_progress", "stolen_cycles_returned": 10 },
        { "op": "record_yy", "event_id": "E1", "original_owner": "O1", "return_path": ["O1"], "restitution_status": "in_progress", "stolen_cycles_returned": 5 },
        { "op": "density", "event_id": "E1", "score": 150 },
        { "op": "proof", "event_id": "E1", "witnesses": ["W1", "W2", "W3"] },
        { "op": "export", "event_id": "E1" }
    ]"#;

    #[test]
    fn test_parse_tags() {
        let ops = parse(SCRIPT).unwrap();
        assert_eq!(ops.len(), 7);
        assert_eq!(ops[0].name(), "generate");
        assert_eq!(
            ops[2],
            Operation::RecordYy {
                event_id: "E1".to_string(),
                original_owner: "O1".to_string(),
                return_path: vec!["O1".to_string()],
                restitution_status: RestitutionStatus::InProgress,
                stolen_cycles_returned: 10,
            }
        );
    }

    #[test]
    fn test_unknown_op_rejected() {
        let result = parse(r#"[{ "op": "teleport", "event_id": "E1" }]"#);
        assert!(matches!(result, Err(ScriptError::Parse(_))));
    }

    #[test]
    fn test_run_continues_past_failures() {
        let ledger = RippleLedger::default();
        let report = run(&ledger, parse(SCRIPT).unwrap(), false).unwrap();

        assert_eq!(report.steps.len(), 7);
        assert_eq!(report.failed(), 1);
        assert!(matches!(
            report.steps[3].result,
            Err(LedgerError::InvalidTransition(_))
        ));
        assert_eq!(
            report.steps[4].result,
            Ok(Outcome::Density(DensityScore::clamped(100)))
        );
        match &report.steps[6].result {
            Ok(Outcome::Row(line)) => assert!(line.ends_with("XX,swap,red,true")),
            other => panic!("unexpected export result: {other:?}"),
        }
    }

    #[test]
    fn test_fail_fast_stops() {
        let ledger = RippleLedger::default();
        let result = run(&ledger, parse(SCRIPT).unwrap(), true);
        assert!(matches!(
            result,
            Err(ScriptError::Step {
                index: 3,
                op: "record_yy",
                ..
            })
        ));
        // Steps after the failure never ran
        assert_eq!(ledger.get_ripple_event("E1").unwrap().density_score.value(), 0);
    }

    #[test]
    fn test_generate_without_id_uses_convention() {
        let ledger = RippleLedger::default();
        let outcome = execute(
            &ledger,
            Operation::Generate {
                event_id: None,
                origin_shard: "Port".to_string(),
                contract_address: "0x1".to_string(),
                umbrella: "SORA".to_string(),
            },
        )
        .unwrap();

        let Outcome::Created(id) = outcome else {
            panic!("expected a created outcome");
        };
        assert!(ripple_core::event_id::follows_convention(&id));
        assert!(ledger.contains(&id));
    }
}
