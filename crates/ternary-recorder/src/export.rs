//! JSON audit-trail export

use crate::recorder::DecisionRecord;
use crate::{DecisionRecorder, DecisionStatistics, HoldEvent, HoldStatus, RecorderError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use ternary_evaluator::EngineConfig;

#[derive(Serialize)]
struct HoldEventEntry<'a> {
    #[serde(flatten)]
    event: &'a HoldEvent,
    status: HoldStatus,
}

#[derive(Serialize)]
struct AuditTrail<'a> {
    engine_config: &'a EngineConfig,
    statistics: DecisionStatistics,
    decision_log: &'a [DecisionRecord],
    hold_events: Vec<HoldEventEntry<'a>>,
    export_timestamp: DateTime<Utc>,
}

impl DecisionRecorder {
    /// Write the full audit trail as pretty-printed JSON
    ///
    /// Top-level keys: `engine_config`, `statistics`, `decision_log`,
    /// `hold_events`, `export_timestamp`.
    pub fn export<W: Write>(&self, mut sink: W) -> Result<(), RecorderError> {
        let config = self.config();
        let written = self.with_state(|history, hold_events| -> Result<usize, RecorderError> {
            let trail = AuditTrail {
                engine_config: config,
                statistics: DecisionStatistics::compute(history, hold_events, config),
                decision_log: history,
                hold_events: hold_events
                    .iter()
                    .map(|event| HoldEventEntry {
                        event,
                        status: event.status(),
                    })
                    .collect(),
                export_timestamp: Utc::now(),
            };
            serde_json::to_writer_pretty(&mut sink, &trail)?;
            Ok(history.len())
        })??;

        sink.flush()?;
        tracing::info!("Exported audit trail with {} decisions", written);
        Ok(())
    }

    /// Write the audit trail to a file, replacing it if present
    pub fn export_to_path(&self, path: impl AsRef<Path>) -> Result<(), RecorderError> {
        let path = path.as_ref();
        let file = File::create(path)?;
        self.export(BufWriter::new(file))?;
        tracing::info!("Audit trail written to {}", path.display());
        Ok(())
    }
}
