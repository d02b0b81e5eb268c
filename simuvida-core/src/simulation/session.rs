use crate::{
    error::SimuvidaError,
    estimator::{self, EstimateInputs},
    logger::SessionLogger,
};
use simuvida_schemas::{
    catalog::DeviceClassSpec,
    decision::{EndOfLifeAction, LifecycleStage, UsagePeriod},
    device::DeviceProfile,
    impact::ImpactEstimate,
};

/// A single walkthrough of the five lifecycle stages for one device. Every
/// state change recomputes the estimate from its explicit inputs; no partial
/// result is cached between steps.
pub struct SimulationSession {
    pub(super) device: DeviceProfile,
    pub(super) class: DeviceClassSpec,
    pub(super) usage: Option<UsagePeriod>,
    pub(super) end_of_life: Option<EndOfLifeAction>,
    pub(super) reference_year: i32,
    pub(super) stage_index: usize,
    pub(super) step: u64,
    pub(super) logger: Option<SessionLogger>,
}

impl SimulationSession {
    pub fn device(&self) -> &DeviceProfile {
        &self.device
    }

    pub fn class(&self) -> &DeviceClassSpec {
        &self.class
    }

    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }

    pub fn current_stage(&self) -> Option<LifecycleStage> {
        LifecycleStage::ALL.get(self.stage_index).copied()
    }

    pub fn is_complete(&self) -> bool {
        self.stage_index >= LifecycleStage::ALL.len()
    }

    /// Display text for a stage. The informational stages narrate the device
    /// class; the decision stages narrate the current choice.
    pub fn narrative(&self, stage: LifecycleStage) -> String {
        match stage {
            LifecycleStage::Extraction => self.class.narrative.extraction.clone(),
            LifecycleStage::Manufacturing => self.class.narrative.manufacturing.clone(),
            LifecycleStage::Transport => self.class.narrative.transport.clone(),
            LifecycleStage::Use => format!(
                "Tiempo de uso planeado: {}",
                self.resolved_usage().label()
            ),
            LifecycleStage::EndOfLife => format!(
                "Destino final elegido: {}",
                self.resolved_end_of_life().label()
            ),
        }
    }

    /// The estimate for the current inputs. Pure recomputation on every call.
    pub fn estimate(&self) -> ImpactEstimate {
        let inputs = EstimateInputs {
            manufacture_year: self.device.year,
            usage: self.usage,
            end_of_life: self.end_of_life,
        };
        estimator::estimate(&self.class.baseline, &inputs, self.reference_year)
    }

    pub fn choose_usage(
        &mut self,
        period: UsagePeriod,
    ) -> Result<ImpactEstimate, SimuvidaError> {
        self.usage = Some(period);
        self.log(LifecycleStage::Use, Some(period.label()))
    }

    pub fn choose_end_of_life(
        &mut self,
        action: EndOfLifeAction,
    ) -> Result<ImpactEstimate, SimuvidaError> {
        self.end_of_life = Some(action);
        self.log(LifecycleStage::EndOfLife, Some(action.label()))
    }

    /// Logs the estimate for the current stage and moves to the next one.
    /// Returns `false` once the walkthrough is complete.
    pub fn advance(&mut self) -> Result<bool, SimuvidaError> {
        let stage = match self.current_stage() {
            Some(stage) => stage,
            None => return Ok(false),
        };
        self.log(stage, None)?;
        self.stage_index += 1;
        Ok(!self.is_complete())
    }

    pub fn resolved_usage(&self) -> UsagePeriod {
        self.usage.unwrap_or_default()
    }

    pub fn resolved_end_of_life(&self) -> EndOfLifeAction {
        self.end_of_life.unwrap_or_default()
    }

    fn log(
        &mut self,
        stage: LifecycleStage,
        decision: Option<&str>,
    ) -> Result<ImpactEstimate, SimuvidaError> {
        let estimate = self.estimate();
        self.step += 1;
        if let Some(logger) = &mut self.logger {
            logger.log_step(self.step, stage, decision, &estimate)?;
        }
        Ok(estimate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::builder::SessionBuilder;
    use simuvida_schemas::device::DeviceKind;

    const REFERENCE_YEAR: i32 = 2026;

    fn phone(year: Option<i32>) -> DeviceProfile {
        DeviceProfile {
            device_id: "DEV-0001".to_string(),
            kind: DeviceKind::Phone,
            model: "Galaxy A14".to_string(),
            year,
            materials: None,
            owner_email: "ana@example.com".to_string(),
            reviewed: false,
            registered_at: 0,
        }
    }

    fn session(year: Option<i32>) -> SimulationSession {
        SessionBuilder::new()
            .with_device(phone(year))
            .with_class(DeviceClassSpec::builtin(DeviceKind::Phone))
            .with_reference_year(REFERENCE_YEAR)
            .build()
            .unwrap()
    }

    #[test]
    fn walkthrough_visits_all_five_stages_in_order() {
        let mut session = session(None);
        let mut visited = Vec::new();
        while let Some(stage) = session.current_stage() {
            visited.push(stage);
            session.advance().unwrap();
        }
        assert_eq!(visited, LifecycleStage::ALL.to_vec());
        assert!(session.is_complete());
        assert!(!session.advance().unwrap());
    }

    #[test]
    fn decisions_change_the_estimate_synchronously() {
        let mut session = session(Some(REFERENCE_YEAR));
        let before = session.estimate();
        assert_eq!(before.score, 65);
        let after = session.choose_usage(UsagePeriod::OneYear).unwrap();
        assert_eq!(after.score, 45);
        let last = session
            .choose_end_of_life(EndOfLifeAction::Discard)
            .unwrap();
        assert_eq!(last.score, 20);
        assert_eq!(session.estimate(), last);
    }

    #[test]
    fn unset_decisions_resolve_to_the_no_penalty_defaults() {
        let session = session(None);
        assert_eq!(session.resolved_usage(), UsagePeriod::ThreePlusYears);
        assert_eq!(session.resolved_end_of_life(), EndOfLifeAction::Recycle);
        assert!(session.narrative(LifecycleStage::Use).contains("3+ años"));
        assert!(session.narrative(LifecycleStage::EndOfLife).contains("reciclar"));
    }

    #[test]
    fn narrative_reflects_the_device_class() {
        let session = session(None);
        assert_eq!(
            session.narrative(LifecycleStage::Extraction),
            "50 kg de minerales extraídos"
        );
        assert_eq!(
            session.narrative(LifecycleStage::Transport),
            "12,000 km de transporte global"
        );
    }
}
