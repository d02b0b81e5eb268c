use csv::Writer;
use serde::Serialize;
use simuvida_schemas::{decision::LifecycleStage, impact::ImpactEstimate};
use std::fs;
use std::io;

#[derive(Debug, Serialize)]
struct LogEntry {
    step: u64,
    stage: String,
    decision: String,
    co2_kg: f64,
    water_l: f64,
    waste_kg: f64,
    score: u32,
}

/// Appends one CSV row per recomputation of a walkthrough session.
pub struct SessionLogger {
    writer: Writer<fs::File>,
}

impl SessionLogger {
    pub fn new(path: &str) -> Result<Self, io::Error> {
        let writer = Writer::from_path(path)?;
        Ok(Self { writer })
    }

    pub fn log_step(
        &mut self,
        step: u64,
        stage: LifecycleStage,
        decision: Option<&str>,
        estimate: &ImpactEstimate,
    ) -> Result<(), anyhow::Error> {
        let entry = LogEntry {
            step,
            stage: stage.title().to_string(),
            decision: decision.unwrap_or("-").to_string(),
            co2_kg: estimate.co2_kg,
            water_l: estimate.water_l,
            waste_kg: estimate.waste_kg,
            score: estimate.score,
        };
        self.writer.serialize(entry)?;
        self.writer.flush()?;
        Ok(())
    }
}
