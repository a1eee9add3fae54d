use bevy::log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{physics::PhysicsConfig, race::RaceConfig, spacecraft::SpacecraftConfig};
use crate::utils::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub physics: PhysicsConfig,
    pub spacecraft: SpacecraftConfig,
    pub race: RaceConfig,
}

impl SimulationConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let config: SimulationConfig = serde_yaml::from_reader(file)?;
        config.validate()?;
        info!("Loaded simulation config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        serde_yaml::to_writer(file, self)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.physics.validate()?;
        self.spacecraft.validate()?;
        // Flight assist removes k * dt of the spin each step; past 1 it
        // would reverse the rotation instead of damping it.
        let decay = self.spacecraft.flight_assist_damping * self.physics.max_timestep;
        if decay > 1.0 {
            return Err(ConfigError::invalid(
                "flight_assist_damping",
                format!(
                    "{} is too strong for max_timestep {}",
                    self.spacecraft.flight_assist_damping, self.physics.max_timestep
                ),
            ));
        }
        Ok(())
    }
}
