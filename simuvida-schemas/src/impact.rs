use serde::{Deserialize, Serialize};

/// Derived environmental outcome of one device walkthrough, rounded to whole
/// display units. Serialized field names keep the historical report shape:
/// kilograms of CO₂-equivalent, liters of water, kilograms of e-waste, and a
/// unitless 20–100 eco-score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactEstimate {
    #[serde(rename = "CO2")]
    pub co2_kg: f64,
    #[serde(rename = "agua")]
    pub water_l: f64,
    #[serde(rename = "residuos")]
    pub waste_kg: f64,
    pub score: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape_matches_historical_reports() {
        let estimate = ImpactEstimate {
            co2_kg: 120.0,
            water_l: 80.0,
            waste_kg: 8.0,
            score: 65,
        };
        let value = serde_json::to_value(&estimate).unwrap();
        assert_eq!(value["CO2"], 120.0);
        assert_eq!(value["agua"], 80.0);
        assert_eq!(value["residuos"], 8.0);
        assert_eq!(value["score"], 65);
    }
}
