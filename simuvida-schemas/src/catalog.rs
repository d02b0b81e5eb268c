use crate::device::DeviceKind;
use serde::{Deserialize, Serialize};

/// Reference lifecycle footprint of one device class, before any age or
/// decision adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactBaseline {
    pub base_co2_kg: f64,
    pub base_water_l: f64,
    pub base_waste_kg: f64,
}

impl ImpactBaseline {
    /// Substitute magnitudes for stored values that carry no meaning.
    pub const FALLBACK: ImpactBaseline = ImpactBaseline {
        base_co2_kg: 50.0,
        base_water_l: 1000.0,
        base_waste_kg: 2.0,
    };

    /// Non-finite or non-positive magnitudes are replaced field by field with
    /// the fixed fallback so they never reach the estimator arithmetic.
    pub fn sanitized(&self) -> ImpactBaseline {
        fn pick(value: f64, fallback: f64) -> f64 {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                fallback
            }
        }
        ImpactBaseline {
            base_co2_kg: pick(self.base_co2_kg, Self::FALLBACK.base_co2_kg),
            base_water_l: pick(self.base_water_l, Self::FALLBACK.base_water_l),
            base_waste_kg: pick(self.base_waste_kg, Self::FALLBACK.base_waste_kg),
        }
    }
}

/// Display text shown while walking the informational lifecycle stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageNarrative {
    pub extraction: String,
    pub manufacturing: String,
    pub transport: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceClassSpec {
    pub kind: DeviceKind,
    pub display_name: String,
    pub baseline: ImpactBaseline,
    pub narrative: StageNarrative,
}

impl DeviceClassSpec {
    pub fn builtin(kind: DeviceKind) -> DeviceClassSpec {
        match kind {
            DeviceKind::Phone => DeviceClassSpec {
                kind,
                display_name: "Teléfono promedio".to_string(),
                baseline: ImpactBaseline {
                    base_co2_kg: 150.0,
                    base_water_l: 100.0,
                    base_waste_kg: 10.0,
                },
                narrative: StageNarrative {
                    extraction: "50 kg de minerales extraídos".to_string(),
                    manufacturing: "80 L de agua usados en fábrica".to_string(),
                    transport: "12,000 km de transporte global".to_string(),
                },
            },
            DeviceKind::Laptop => DeviceClassSpec {
                kind,
                display_name: "Laptop promedio".to_string(),
                baseline: ImpactBaseline {
                    base_co2_kg: 300.0,
                    base_water_l: 200.0,
                    base_waste_kg: 20.0,
                },
                narrative: StageNarrative {
                    extraction: "200 kg de minerales extraídos".to_string(),
                    manufacturing: "300 L de agua usados en fábrica".to_string(),
                    transport: "15,000 km de transporte global".to_string(),
                },
            },
        }
    }

    pub fn builtin_classes() -> Vec<DeviceClassSpec> {
        DeviceKind::ALL.iter().map(|k| Self::builtin(*k)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_has_one_class_per_kind() {
        let classes = DeviceClassSpec::builtin_classes();
        assert_eq!(classes.len(), DeviceKind::ALL.len());
        assert_eq!(classes[0].baseline.base_co2_kg, 150.0);
        assert_eq!(classes[1].baseline.base_co2_kg, 300.0);
    }

    #[test]
    fn sanitized_replaces_unusable_magnitudes() {
        let broken = ImpactBaseline {
            base_co2_kg: f64::NAN,
            base_water_l: -3.0,
            base_waste_kg: 10.0,
        };
        let fixed = broken.sanitized();
        assert_eq!(fixed.base_co2_kg, 50.0);
        assert_eq!(fixed.base_water_l, 1000.0);
        assert_eq!(fixed.base_waste_kg, 10.0);
    }
}
