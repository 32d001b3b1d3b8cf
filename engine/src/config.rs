//
// Copyright 2025-2026 The Wulin Project Developers. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

use serde::{Deserialize, Serialize};
use serde_env_field::EnvField;

/// Engine configuration loaded at process start.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Configuration {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub progression: ProgressionConfig,
}

impl Configuration {
    pub fn load(path: &str) -> Result<Configuration, String> {
        let conf = serde_yaml::from_reader(
            std::fs::File::open(path).map_err(|e| format!("Failed to open config file: {}", e))?,
        )
        .map_err(|e| format!("Failed to parse config file: {}", e))?;

        Ok(conf)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: EnvField<String>,
    pub username: EnvField<String>,
    pub password: EnvField<String>,
}

/// Tuning knobs for the progression arithmetic.
///
/// Defaults match live balance; change them only alongside a content pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// Divisor in the martial advancement gate `combat_exp >= level^3 / divisor`.
    pub exp_threshold_divisor: i64,
    /// Numerator of the per-round research energy cost `max(min, base / perception)`.
    pub research_base_cost: i64,
    /// Floor of the per-round research energy cost.
    pub research_min_cost: i64,
    /// Base per-tick energy cost when practicing, reduced by perception.
    pub practice_base_cost: i64,
    /// Floor of the per-tick practice cost.
    pub practice_min_cost: i64,
    /// Probability that a successful exert use grants a point of passive
    /// progress in the active force.
    pub weak_improve_chance: f64,
    /// Seconds between sustained-healing ticks.
    pub heal_tick_seconds: u64,
    /// Seconds a powerup or shield buff lasts per force level.
    pub buff_seconds_per_level: u64,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            exp_threshold_divisor: 10,
            research_base_cost: 1000,
            research_min_cost: 10,
            practice_base_cost: 50,
            practice_min_cost: 5,
            weak_improve_chance: 0.25,
            heal_tick_seconds: 5,
            buff_seconds_per_level: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progression_defaults() {
        let config = ProgressionConfig::default();
        assert_eq!(config.exp_threshold_divisor, 10);
        assert_eq!(config.research_base_cost, 1000);
        assert_eq!(config.research_min_cost, 10);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = "research_base_cost: 800\n";
        let config: ProgressionConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.research_base_cost, 800);
        assert_eq!(config.research_min_cost, 10);
    }
}
