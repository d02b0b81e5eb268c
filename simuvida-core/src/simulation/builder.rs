use crate::{
    error::SimuvidaError,
    logger::SessionLogger,
    simulation::session::SimulationSession,
};
use simuvida_schemas::{
    catalog::DeviceClassSpec,
    decision::{EndOfLifeAction, UsagePeriod},
    device::DeviceProfile,
};

/// A fluent builder for constructing a `SimulationSession`.
///
/// The reference year is taken here, at the boundary, so the session itself
/// stays deterministic across calls.
#[derive(Default)]
pub struct SessionBuilder {
    device: Option<DeviceProfile>,
    class: Option<DeviceClassSpec>,
    usage: Option<UsagePeriod>,
    end_of_life: Option<EndOfLifeAction>,
    reference_year: Option<i32>,
    log_path: Option<String>,
}

impl SessionBuilder {
    /// Creates a new, empty `SessionBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the device profile to walk through its lifecycle.
    pub fn with_device(mut self, device: DeviceProfile) -> Self {
        self.device = Some(device);
        self
    }

    /// Sets the device class that provides baseline and narrative.
    pub fn with_class(mut self, class: DeviceClassSpec) -> Self {
        self.class = Some(class);
        self
    }

    /// Presets the usage decision before the walkthrough starts.
    pub fn with_usage(mut self, period: UsagePeriod) -> Self {
        self.usage = Some(period);
        self
    }

    /// Presets the end-of-life decision before the walkthrough starts.
    pub fn with_end_of_life(mut self, action: EndOfLifeAction) -> Self {
        self.end_of_life = Some(action);
        self
    }

    /// Sets the year the age penalty is measured against.
    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_year = Some(year);
        self
    }

    /// Configures the session to append each recomputation to a CSV file.
    pub fn with_session_logging_to_file(mut self, path: &str) -> Self {
        self.log_path = Some(path.to_string());
        self
    }

    /// Consumes the builder and returns a ready session.
    ///
    /// # Errors
    ///
    /// Returns a `SimuvidaError` if the device, its class, or the reference
    /// year is missing, or if the class does not match the device kind.
    pub fn build(self) -> Result<SimulationSession, SimuvidaError> {
        let device = self.device.ok_or(SimuvidaError::DeviceNotDefined)?;
        let class = self.class.ok_or(SimuvidaError::ClassNotDefined)?;
        if class.kind != device.kind {
            return Err(SimuvidaError::ConfigError(format!(
                "Device class '{}' does not match device kind '{}'",
                class.kind.as_str(),
                device.kind.as_str()
            )));
        }
        let reference_year = self.reference_year.ok_or_else(|| {
            SimuvidaError::ConfigError(
                "A reference year must be provided for the session".to_string(),
            )
        })?;

        let logger = match self.log_path {
            Some(path) => Some(
                SessionLogger::new(&path)
                    .map_err(|e| SimuvidaError::FileIO(path.clone(), e))?,
            ),
            None => None,
        };

        Ok(SimulationSession {
            device,
            class,
            usage: self.usage,
            end_of_life: self.end_of_life,
            reference_year,
            stage_index: 0,
            step: 0,
            logger,
        })
    }
}
