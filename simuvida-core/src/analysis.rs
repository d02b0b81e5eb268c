use crate::error::SimuvidaError;
use serde::Deserialize;
use simuvida_schemas::{
    account::Account,
    decision::{DecisionRecord, EndOfLifeAction, LifecycleChoice, UsagePeriod},
    device::{DeviceKind, DeviceProfile},
    impact::ImpactEstimate,
};
use std::collections::HashMap;

/// One row of a session log CSV, as written by the session logger.
#[derive(Debug, Deserialize)]
pub struct LogEntry {
    pub step: u64,
    pub stage: String,
    pub decision: String,
    pub co2_kg: f64,
    pub water_l: f64,
    pub waste_kg: f64,
    pub score: u32,
}

pub fn read_session_log(log_path: &str) -> Result<Vec<LogEntry>, SimuvidaError> {
    let mut reader = csv::Reader::from_path(log_path)
        .map_err(|e| SimuvidaError::CsvError(log_path.to_string(), e))?;
    let mut entries = Vec::new();
    for result in reader.deserialize() {
        let record: LogEntry =
            result.map_err(|e| SimuvidaError::CsvError(log_path.to_string(), e))?;
        entries.push(record);
    }
    Ok(entries)
}

/// Serializes an estimate with the historical report field names, for the
/// machine-readable export written next to the certificate.
pub fn estimate_report_json(estimate: &ImpactEstimate) -> Result<String, SimuvidaError> {
    Ok(serde_json::to_string_pretty(estimate)?)
}

const TOP_MODEL_LIMIT: usize = 5;

#[derive(Debug, Default, Clone)]
pub struct FleetStats {
    pub total_devices: usize,
    pub total_accounts: usize,
    pub phone_count: usize,
    pub laptop_count: usize,
    pub pending_review: usize,
    pub top_phones: Vec<(String, usize)>,
    pub top_laptops: Vec<(String, usize)>,
}

pub fn fleet_stats(devices: &[DeviceProfile], accounts: &[Account]) -> FleetStats {
    FleetStats {
        total_devices: devices.len(),
        total_accounts: accounts.len(),
        phone_count: devices.iter().filter(|d| d.kind == DeviceKind::Phone).count(),
        laptop_count: devices.iter().filter(|d| d.kind == DeviceKind::Laptop).count(),
        pending_review: devices.iter().filter(|d| !d.reviewed).count(),
        top_phones: top_models(devices, DeviceKind::Phone),
        top_laptops: top_models(devices, DeviceKind::Laptop),
    }
}

// Count-descending, model name as the tie-break so the ranking is stable.
fn top_models(devices: &[DeviceProfile], kind: DeviceKind) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for device in devices.iter().filter(|d| d.kind == kind) {
        *counts.entry(device.model.clone()).or_insert(0) += 1;
    }
    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(TOP_MODEL_LIMIT);
    ranked
}

#[derive(Debug, Default, Clone)]
pub struct DecisionBreakdown {
    pub usage: Vec<(&'static str, usize)>,
    pub end_of_life: Vec<(&'static str, usize)>,
}

/// Distribution of recorded choices, in the fixed order the options are
/// presented.
pub fn decision_breakdown(decisions: &[DecisionRecord]) -> DecisionBreakdown {
    let mut usage: HashMap<UsagePeriod, usize> = HashMap::new();
    let mut end_of_life: HashMap<EndOfLifeAction, usize> = HashMap::new();
    for record in decisions {
        match record.choice {
            LifecycleChoice::Usage { period } => *usage.entry(period).or_insert(0) += 1,
            LifecycleChoice::EndOfLife { action } => {
                *end_of_life.entry(action).or_insert(0) += 1
            }
        }
    }
    DecisionBreakdown {
        usage: UsagePeriod::ALL
            .iter()
            .map(|p| (p.label(), usage.get(p).copied().unwrap_or(0)))
            .collect(),
        end_of_life: EndOfLifeAction::ALL
            .iter()
            .map(|a| (a.label(), end_of_life.get(a).copied().unwrap_or(0)))
            .collect(),
    }
}

/// Resolves a device's journal into the two walkthrough decisions. Records
/// are kept in append order, so the latest choice per stage wins.
pub fn resolved_decisions(
    records: &[DecisionRecord],
) -> (Option<UsagePeriod>, Option<EndOfLifeAction>) {
    let mut usage = None;
    let mut end_of_life = None;
    for record in records {
        match record.choice {
            LifecycleChoice::Usage { period } => usage = Some(period),
            LifecycleChoice::EndOfLife { action } => end_of_life = Some(action),
        }
    }
    (usage, end_of_life)
}

#[cfg(test)]
mod tests {
    use super::*;
    use simuvida_schemas::decision::LifecycleStage;

    fn device(id: &str, kind: DeviceKind, model: &str, reviewed: bool) -> DeviceProfile {
        DeviceProfile {
            device_id: id.to_string(),
            kind,
            model: model.to_string(),
            year: None,
            materials: None,
            owner_email: "ana@example.com".to_string(),
            reviewed,
            registered_at: 0,
        }
    }

    fn usage_record(device_id: &str, period: UsagePeriod, recorded_at: i64) -> DecisionRecord {
        DecisionRecord {
            device_id: device_id.to_string(),
            stage: LifecycleStage::Use,
            choice: LifecycleChoice::Usage { period },
            recorded_at,
        }
    }

    #[test]
    fn fleet_stats_counts_kinds_and_pending_reviews() {
        let devices = vec![
            device("DEV-0001", DeviceKind::Phone, "Galaxy A14", true),
            device("DEV-0002", DeviceKind::Phone, "Galaxy A14", false),
            device("DEV-0003", DeviceKind::Laptop, "MacBook Air M2", false),
        ];
        let stats = fleet_stats(&devices, &[]);
        assert_eq!(stats.total_devices, 3);
        assert_eq!(stats.phone_count, 2);
        assert_eq!(stats.laptop_count, 1);
        assert_eq!(stats.pending_review, 2);
        assert_eq!(stats.top_phones, vec![("Galaxy A14".to_string(), 2)]);
    }

    #[test]
    fn top_models_rank_by_count_then_name_and_truncate() {
        let mut devices = Vec::new();
        for (model, copies) in [("A", 1), ("B", 3), ("C", 1), ("D", 2), ("E", 1), ("F", 1)] {
            for i in 0..copies {
                devices.push(device(
                    &format!("DEV-{}-{}", model, i),
                    DeviceKind::Phone,
                    model,
                    true,
                ));
            }
        }
        let ranked = top_models(&devices, DeviceKind::Phone);
        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked[0], ("B".to_string(), 3));
        assert_eq!(ranked[1], ("D".to_string(), 2));
        // Singles tie, alphabetical from here on.
        assert_eq!(ranked[2].0, "A");
        assert_eq!(ranked[3].0, "C");
        assert_eq!(ranked[4].0, "E");
    }

    #[test]
    fn decision_breakdown_keeps_fixed_option_order() {
        let records = vec![
            usage_record("DEV-0001", UsagePeriod::OneYear, 1),
            usage_record("DEV-0002", UsagePeriod::OneYear, 2),
            DecisionRecord {
                device_id: "DEV-0001".to_string(),
                stage: LifecycleStage::EndOfLife,
                choice: LifecycleChoice::EndOfLife {
                    action: EndOfLifeAction::Repair,
                },
                recorded_at: 3,
            },
        ];
        let breakdown = decision_breakdown(&records);
        assert_eq!(breakdown.usage[0], ("1 año", 2));
        assert_eq!(breakdown.usage[2], ("3+ años", 0));
        assert_eq!(breakdown.end_of_life[2], ("reparar", 1));
        assert_eq!(breakdown.end_of_life[3], ("reciclar", 0));
    }

    #[test]
    fn estimate_export_keeps_the_historical_field_names() {
        let estimate = ImpactEstimate {
            co2_kg: 120.0,
            water_l: 80.0,
            waste_kg: 8.0,
            score: 65,
        };
        let json = estimate_report_json(&estimate).unwrap();
        assert!(json.contains("\"CO2\""));
        assert!(json.contains("\"agua\""));
        assert!(json.contains("\"residuos\""));
        assert!(json.contains("\"score\""));
    }

    #[test]
    fn resolved_decisions_take_the_latest_record_per_stage() {
        let records = vec![
            usage_record("DEV-0001", UsagePeriod::OneYear, 1),
            usage_record("DEV-0001", UsagePeriod::TwoYears, 2),
        ];
        let (usage, end_of_life) = resolved_decisions(&records);
        assert_eq!(usage, Some(UsagePeriod::TwoYears));
        assert_eq!(end_of_life, None);
    }
}
