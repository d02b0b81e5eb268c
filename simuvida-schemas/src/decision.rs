use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStage {
    Extraction,
    Manufacturing,
    Use,
    Transport,
    EndOfLife,
}

impl LifecycleStage {
    pub const ALL: [LifecycleStage; 5] = [
        LifecycleStage::Extraction,
        LifecycleStage::Manufacturing,
        LifecycleStage::Use,
        LifecycleStage::Transport,
        LifecycleStage::EndOfLife,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            LifecycleStage::Extraction => "Extracción",
            LifecycleStage::Manufacturing => "Fabricación",
            LifecycleStage::Use => "Uso",
            LifecycleStage::Transport => "Transporte",
            LifecycleStage::EndOfLife => "Fin de vida",
        }
    }

    /// 1-based position in the walkthrough, for display.
    pub fn number(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0) + 1
    }
}

/// How long the user plans to keep the device in service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UsagePeriod {
    #[serde(rename = "1 año")]
    OneYear,
    #[serde(rename = "2 años")]
    TwoYears,
    #[serde(rename = "3+ años")]
    ThreePlusYears,
}

impl Default for UsagePeriod {
    fn default() -> Self {
        UsagePeriod::ThreePlusYears
    }
}

impl UsagePeriod {
    pub const ALL: [UsagePeriod; 3] = [
        UsagePeriod::OneYear,
        UsagePeriod::TwoYears,
        UsagePeriod::ThreePlusYears,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            UsagePeriod::OneYear => "1 año",
            UsagePeriod::TwoYears => "2 años",
            UsagePeriod::ThreePlusYears => "3+ años",
        }
    }

    /// Buckets a planned span in whole years into the enumerated categories.
    pub fn from_years(years: u32) -> UsagePeriod {
        match years {
            0 | 1 => UsagePeriod::OneYear,
            2 => UsagePeriod::TwoYears,
            _ => UsagePeriod::ThreePlusYears,
        }
    }
}

impl std::str::FromStr for UsagePeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(years) = trimmed.trim_end_matches('+').parse::<u32>() {
            return Ok(UsagePeriod::from_years(years));
        }
        match trimmed.to_lowercase().as_str() {
            "1 año" | "1 ano" => Ok(UsagePeriod::OneYear),
            "2 años" | "2 anos" => Ok(UsagePeriod::TwoYears),
            "3+ años" | "3+ anos" => Ok(UsagePeriod::ThreePlusYears),
            other => Err(format!("unknown usage period '{}'", other)),
        }
    }
}

/// Disposition chosen for the device once its useful life ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndOfLifeAction {
    #[serde(rename = "desechar")]
    Discard,
    #[serde(rename = "donar")]
    Donate,
    #[serde(rename = "reparar")]
    Repair,
    #[serde(rename = "reciclar")]
    Recycle,
}

impl Default for EndOfLifeAction {
    fn default() -> Self {
        EndOfLifeAction::Recycle
    }
}

impl EndOfLifeAction {
    pub const ALL: [EndOfLifeAction; 4] = [
        EndOfLifeAction::Discard,
        EndOfLifeAction::Donate,
        EndOfLifeAction::Repair,
        EndOfLifeAction::Recycle,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EndOfLifeAction::Discard => "desechar",
            EndOfLifeAction::Donate => "donar",
            EndOfLifeAction::Repair => "reparar",
            EndOfLifeAction::Recycle => "reciclar",
        }
    }
}

impl std::str::FromStr for EndOfLifeAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "desechar" | "discard" => Ok(EndOfLifeAction::Discard),
            "donar" | "donate" => Ok(EndOfLifeAction::Donate),
            "reparar" | "repair" => Ok(EndOfLifeAction::Repair),
            "reciclar" | "recycle" => Ok(EndOfLifeAction::Recycle),
            other => Err(format!("unknown end-of-life action '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LifecycleChoice {
    Usage { period: UsagePeriod },
    EndOfLife { action: EndOfLifeAction },
}

impl LifecycleChoice {
    pub fn stage(&self) -> LifecycleStage {
        match self {
            LifecycleChoice::Usage { .. } => LifecycleStage::Use,
            LifecycleChoice::EndOfLife { .. } => LifecycleStage::EndOfLife,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LifecycleChoice::Usage { period } => period.label(),
            LifecycleChoice::EndOfLife { action } => action.label(),
        }
    }
}

/// One recorded user choice for a device. The numeric estimate is always
/// recomputed from these records, never stored alongside them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub device_id: String,
    pub stage: LifecycleStage,
    pub choice: LifecycleChoice,
    pub recorded_at: i64,
}
