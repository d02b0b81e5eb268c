//! The impact estimator: a pure mapping from device class, age, and lifecycle
//! decisions to an environmental-impact estimate.

use simuvida_schemas::{
    catalog::{DeviceClassSpec, ImpactBaseline},
    decision::{EndOfLifeAction, UsagePeriod},
    impact::ImpactEstimate,
};

const SCORE_FLOOR: f64 = 20.0;
const SCORE_CEILING: f64 = 100.0;
const AGE_PENALTY_PER_YEAR: f64 = 0.05;
const AGE_PENALTY_CAP: f64 = 0.5;
const NEUTRAL_SCORE: u32 = 70;

/// Optional estimator inputs. Absent values fall back to the no-penalty
/// defaults, so an estimate is always computable.
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimateInputs {
    pub manufacture_year: Option<i32>,
    pub usage: Option<UsagePeriod>,
    pub end_of_life: Option<EndOfLifeAction>,
}

/// Efficiency penalty for device age: each year adds 5%, capped at +50%.
/// Unknown and future manufacture years contribute no penalty.
pub fn age_factor(manufacture_year: Option<i32>, reference_year: i32) -> f64 {
    match manufacture_year {
        Some(year) => {
            let age = (reference_year - year).max(0) as f64;
            1.0 + (age * AGE_PENALTY_PER_YEAR).min(AGE_PENALTY_CAP)
        }
        None => 1.0,
    }
}

fn usage_adjustment(period: UsagePeriod) -> (f64, f64) {
    match period {
        UsagePeriod::OneYear => (1.2, -20.0),
        UsagePeriod::TwoYears => (1.1, -10.0),
        UsagePeriod::ThreePlusYears => (1.0, 0.0),
    }
}

// Donating hands the device to the reuse chain and is scored like recycling.
fn end_of_life_adjustment(action: EndOfLifeAction) -> (f64, f64) {
    match action {
        EndOfLifeAction::Discard => (1.3, -30.0),
        EndOfLifeAction::Repair => (0.9, 10.0),
        EndOfLifeAction::Recycle | EndOfLifeAction::Donate => (0.8, 15.0),
    }
}

fn clamp_score(score: f64) -> f64 {
    score.clamp(SCORE_FLOOR, SCORE_CEILING)
}

/// Computes the estimate for one baseline. The age factor scales all three
/// magnitudes first, the starting score is derived from the aged CO₂ ratio,
/// and the two decision adjustments are applied after that, in a fixed order.
pub fn estimate(
    baseline: &ImpactBaseline,
    inputs: &EstimateInputs,
    reference_year: i32,
) -> ImpactEstimate {
    let base = baseline.sanitized();
    let factor = age_factor(inputs.manufacture_year, reference_year);

    let mut co2 = base.base_co2_kg * factor;
    let mut water = base.base_water_l * factor;
    let mut waste = base.base_waste_kg * factor;

    let mut score = clamp_score(SCORE_CEILING - (co2 / base.base_co2_kg) * 50.0);

    let (multiplier, delta) = usage_adjustment(inputs.usage.unwrap_or_default());
    co2 *= multiplier;
    water *= multiplier;
    waste *= multiplier;
    score += delta;

    let (multiplier, delta) = end_of_life_adjustment(inputs.end_of_life.unwrap_or_default());
    co2 *= multiplier;
    water *= multiplier;
    waste *= multiplier;
    score += delta;

    ImpactEstimate {
        co2_kg: co2.max(0.0).round(),
        water_l: water.max(0.0).round(),
        waste_kg: waste.max(0.0).round(),
        score: clamp_score(score).round() as u32,
    }
}

/// Estimate for a device whose class cannot be resolved: the fallback
/// magnitudes with a flat score of 70 and no adjustments applied.
pub fn neutral_estimate() -> ImpactEstimate {
    ImpactEstimate {
        co2_kg: ImpactBaseline::FALLBACK.base_co2_kg,
        water_l: ImpactBaseline::FALLBACK.base_water_l,
        waste_kg: ImpactBaseline::FALLBACK.base_waste_kg,
        score: NEUTRAL_SCORE,
    }
}

pub fn estimate_for_class(
    class: Option<&DeviceClassSpec>,
    inputs: &EstimateInputs,
    reference_year: i32,
) -> ImpactEstimate {
    match class {
        Some(spec) => estimate(&spec.baseline, inputs, reference_year),
        None => neutral_estimate(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simuvida_schemas::device::DeviceKind;

    const REFERENCE_YEAR: i32 = 2026;

    fn phone_baseline() -> ImpactBaseline {
        DeviceClassSpec::builtin(DeviceKind::Phone).baseline
    }

    fn laptop_baseline() -> ImpactBaseline {
        DeviceClassSpec::builtin(DeviceKind::Laptop).baseline
    }

    #[test]
    fn new_phone_recycled_matches_reference_trace() {
        let inputs = EstimateInputs {
            manufacture_year: Some(REFERENCE_YEAR),
            usage: Some(UsagePeriod::ThreePlusYears),
            end_of_life: Some(EndOfLifeAction::Recycle),
        };
        let result = estimate(&phone_baseline(), &inputs, REFERENCE_YEAR);
        assert_eq!(result.co2_kg, 120.0);
        assert_eq!(result.water_l, 80.0);
        assert_eq!(result.waste_kg, 8.0);
        assert_eq!(result.score, 65);
    }

    #[test]
    fn decade_old_phone_discarded_after_one_year_floors_the_score() {
        let inputs = EstimateInputs {
            manufacture_year: Some(REFERENCE_YEAR - 10),
            usage: Some(UsagePeriod::OneYear),
            end_of_life: Some(EndOfLifeAction::Discard),
        };
        let result = estimate(&phone_baseline(), &inputs, REFERENCE_YEAR);
        assert_eq!(result.co2_kg, 351.0);
        assert_eq!(result.water_l, 234.0);
        assert_eq!(result.waste_kg, 23.0);
        assert_eq!(result.score, 20);
    }

    #[test]
    fn laptop_without_year_skips_the_age_penalty() {
        let inputs = EstimateInputs {
            manufacture_year: None,
            usage: Some(UsagePeriod::TwoYears),
            end_of_life: Some(EndOfLifeAction::Repair),
        };
        let result = estimate(&laptop_baseline(), &inputs, REFERENCE_YEAR);
        assert_eq!(result.co2_kg, 297.0);
        assert_eq!(result.water_l, 198.0);
        assert_eq!(result.waste_kg, 20.0);
        assert_eq!(result.score, 50);
    }

    #[test]
    fn repeated_calls_return_identical_output() {
        let inputs = EstimateInputs {
            manufacture_year: Some(REFERENCE_YEAR - 4),
            usage: Some(UsagePeriod::TwoYears),
            end_of_life: Some(EndOfLifeAction::Donate),
        };
        let first = estimate(&phone_baseline(), &inputs, REFERENCE_YEAR);
        let second = estimate(&phone_baseline(), &inputs, REFERENCE_YEAR);
        assert_eq!(first, second);
    }

    #[test]
    fn absent_decisions_equal_explicit_defaults() {
        let absent = EstimateInputs {
            manufacture_year: Some(REFERENCE_YEAR - 2),
            usage: None,
            end_of_life: None,
        };
        let explicit = EstimateInputs {
            usage: Some(UsagePeriod::ThreePlusYears),
            end_of_life: Some(EndOfLifeAction::Recycle),
            ..absent
        };
        assert_eq!(
            estimate(&phone_baseline(), &absent, REFERENCE_YEAR),
            estimate(&phone_baseline(), &explicit, REFERENCE_YEAR)
        );
    }

    #[test]
    fn age_penalty_is_monotonic_and_capped() {
        let mut previous = 0.0;
        for age in 0..=10 {
            let inputs = EstimateInputs {
                manufacture_year: Some(REFERENCE_YEAR - age),
                ..EstimateInputs::default()
            };
            let result = estimate(&phone_baseline(), &inputs, REFERENCE_YEAR);
            assert!(
                result.co2_kg >= previous,
                "co2 decreased at age {}: {} < {}",
                age,
                result.co2_kg,
                previous
            );
            previous = result.co2_kg;
        }
        assert_eq!(age_factor(Some(REFERENCE_YEAR - 10), REFERENCE_YEAR), 1.5);
        assert_eq!(age_factor(Some(REFERENCE_YEAR - 14), REFERENCE_YEAR), 1.5);
        assert_eq!(age_factor(Some(REFERENCE_YEAR + 3), REFERENCE_YEAR), 1.0);
    }

    #[test]
    fn score_stays_inside_bounds_for_all_decision_combos() {
        let years = [
            None,
            Some(REFERENCE_YEAR),
            Some(REFERENCE_YEAR - 3),
            Some(REFERENCE_YEAR - 12),
        ];
        for baseline in [phone_baseline(), laptop_baseline()] {
            for year in years {
                for usage in UsagePeriod::ALL {
                    for action in EndOfLifeAction::ALL {
                        let inputs = EstimateInputs {
                            manufacture_year: year,
                            usage: Some(usage),
                            end_of_life: Some(action),
                        };
                        let result = estimate(&baseline, &inputs, REFERENCE_YEAR);
                        assert!((20..=100).contains(&result.score));
                        assert!(result.co2_kg >= 0.0);
                        assert!(result.water_l >= 0.0);
                        assert!(result.waste_kg >= 0.0);
                    }
                }
            }
        }
    }

    #[test]
    fn donate_is_scored_like_recycle() {
        let donate = EstimateInputs {
            end_of_life: Some(EndOfLifeAction::Donate),
            ..EstimateInputs::default()
        };
        let recycle = EstimateInputs {
            end_of_life: Some(EndOfLifeAction::Recycle),
            ..EstimateInputs::default()
        };
        assert_eq!(
            estimate(&laptop_baseline(), &donate, REFERENCE_YEAR),
            estimate(&laptop_baseline(), &recycle, REFERENCE_YEAR)
        );
    }

    #[test]
    fn unknown_class_falls_back_to_neutral_estimate() {
        let result = estimate_for_class(None, &EstimateInputs::default(), REFERENCE_YEAR);
        assert_eq!(result.co2_kg, 50.0);
        assert_eq!(result.water_l, 1000.0);
        assert_eq!(result.waste_kg, 2.0);
        assert_eq!(result.score, 70);
    }

    #[test]
    fn broken_baseline_is_sanitized_before_use() {
        let broken = ImpactBaseline {
            base_co2_kg: f64::NAN,
            base_water_l: 100.0,
            base_waste_kg: 2.0,
        };
        let result = estimate(&broken, &EstimateInputs::default(), REFERENCE_YEAR);
        assert_eq!(result.co2_kg, 40.0);
        assert_eq!(result.water_l, 80.0);
        assert_eq!(result.waste_kg, 2.0);
        assert_eq!(result.score, 65);
    }
}
