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

//! Universal exert effects
//!
//! Available with any active force: an instant energy-to-health
//! conversion, a sustained healing trance, and a timed power surge.

use crate::character::{Character, attrs, drain, restore};
use crate::exert::{ExertContext, ExertEffect, ExertRegistry, lock};
use crate::scheduler::TickControl;
use std::sync::Arc;
use std::time::Duration;
use wulin_common::ExertResult;

/// Energy drained by each healing trance tick.
const HEAL_TICK_COST: i64 = 10;
/// Temp key marking the power surge buff.
pub const POWERUP_TEMP: &str = "buff_powerup";

pub fn register(registry: &mut ExertRegistry) {
    registry.register(Box::new(Recover));
    registry.register(Box::new(Heal));
    registry.register(Box::new(Powerup));
}

/// Health restored by one healing trance tick at `force_level`.
fn heal_per_tick(force_level: i32) -> i64 {
    5 + i64::from(force_level) / 2
}

/// One tick of the healing trance. Pure over the character handle so it
/// can be tested without a runtime; the scheduler stops the task when this
/// returns [`TickControl::Stop`].
pub fn healing_tick(character: &mut dyn Character, force_level: i32) -> TickControl {
    if !character.alive() || character.in_combat() {
        return TickControl::Stop;
    }
    if character.get(attrs::ENERGY) < HEAL_TICK_COST {
        character.send("Your energy is spent; the trance ends.");
        return TickControl::Stop;
    }
    if character.get(attrs::HP) >= character.get(attrs::MAX_HP) {
        character.send("Your wounds are closed; the trance ends.");
        return TickControl::Stop;
    }
    drain(character, attrs::ENERGY, HEAL_TICK_COST);
    restore(character, attrs::HP, attrs::MAX_HP, heal_per_tick(force_level));
    TickControl::Continue
}

/// Instant conversion of energy into health.
struct Recover;

impl ExertEffect for Recover {
    fn name(&self) -> &'static str {
        "recover"
    }

    fn display_name(&self) -> &'static str {
        "recover"
    }

    fn is_universal(&self) -> bool {
        true
    }

    fn execute(&self, ctx: &ExertContext<'_>) -> ExertResult {
        let mut character = lock(ctx.character);
        let amount = 20 + i64::from(ctx.force_level) * 2;
        if character.get(attrs::HP) >= character.get(attrs::MAX_HP) {
            return ExertResult::failure("You are unharmed.");
        }
        if character.get(attrs::ENERGY) < amount {
            return ExertResult::failure("You lack the energy.");
        }
        drain(&mut *character, attrs::ENERGY, amount);
        restore(&mut *character, attrs::HP, attrs::MAX_HP, amount);
        ExertResult {
            success: true,
            message: "You direct your force inward and your wounds knit.".to_string(),
            resource_changed: true,
            ..Default::default()
        }
    }
}

/// Sustained healing trance driven by the scheduler.
struct Heal;

impl ExertEffect for Heal {
    fn name(&self) -> &'static str {
        "heal"
    }

    fn display_name(&self) -> &'static str {
        "healing trance"
    }

    fn is_universal(&self) -> bool {
        true
    }

    fn execute(&self, ctx: &ExertContext<'_>) -> ExertResult {
        let (owner, needs_healing) = {
            let character = lock(ctx.character);
            (
                character.id(),
                character.get(attrs::HP) < character.get(attrs::MAX_HP),
            )
        };
        if !needs_healing {
            return ExertResult::failure("You are unharmed.");
        }

        let handle = Arc::clone(ctx.character);
        let force_level = ctx.force_level;
        ctx.scheduler.spawn_interval(
            owner,
            "exert-heal",
            Duration::from_secs(ctx.config.heal_tick_seconds),
            move || healing_tick(&mut *lock(&handle), force_level),
        );
        ExertResult {
            success: true,
            message: "You sink into a healing trance.".to_string(),
            healing_started: Some(true),
            ..Default::default()
        }
    }
}

/// Timed power surge; expires on its own through the scheduler.
struct Powerup;

impl ExertEffect for Powerup {
    fn name(&self) -> &'static str {
        "powerup"
    }

    fn display_name(&self) -> &'static str {
        "power surge"
    }

    fn is_universal(&self) -> bool {
        true
    }

    fn execute(&self, ctx: &ExertContext<'_>) -> ExertResult {
        let cost = 100;
        let owner = {
            let mut character = lock(ctx.character);
            if character.get_temp(POWERUP_TEMP).is_some() {
                return ExertResult::failure("Your force is already surging.");
            }
            if character.get(attrs::ENERGY) < cost {
                return ExertResult::failure("You lack the energy.");
            }
            drain(&mut *character, attrs::ENERGY, cost);
            character.set_temp(POWERUP_TEMP, Some(ctx.force_level.to_string()));
            character.id()
        };

        let seconds = ctx.config.buff_seconds_per_level * u64::from(ctx.force_level.max(1) as u32);
        let handle = Arc::clone(ctx.character);
        ctx.scheduler.spawn_once(
            owner,
            "exert-powerup",
            Duration::from_secs(seconds),
            move || {
                let mut character = lock(&handle);
                character.set_temp(POWERUP_TEMP, None);
                character.send("The surge of force ebbs away.");
            },
        );
        ExertResult {
            success: true,
            message: "Force floods your limbs.".to_string(),
            resource_changed: true,
            buff_applied: Some("powerup".to_string()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProgressionConfig;
    use crate::scheduler::Scheduler;
    use crate::test_utils::TestCharacter;
    use std::sync::Mutex;

    fn wounded(energy: i64) -> TestCharacter {
        let mut character = TestCharacter::new("Shen");
        character.set(attrs::HP, 50);
        character.set(attrs::MAX_HP, 100);
        character.set(attrs::ENERGY, energy);
        character.set(attrs::MAX_ENERGY, 500);
        character
    }

    #[test]
    fn test_healing_tick_restores_and_drains() {
        let mut character = wounded(100);
        assert_eq!(healing_tick(&mut character, 10), TickControl::Continue);
        assert_eq!(character.get(attrs::HP), 60);
        assert_eq!(character.get(attrs::ENERGY), 90);
    }

    #[test]
    fn test_healing_tick_stops_when_whole() {
        let mut character = wounded(100);
        character.set(attrs::HP, 100);
        assert_eq!(healing_tick(&mut character, 10), TickControl::Stop);
    }

    #[test]
    fn test_healing_tick_stops_without_energy() {
        let mut character = wounded(HEAL_TICK_COST - 1);
        assert_eq!(healing_tick(&mut character, 10), TickControl::Stop);
        assert_eq!(character.get(attrs::HP), 50);
    }

    #[test]
    fn test_healing_tick_stops_in_combat_or_dead() {
        let mut character = wounded(100);
        character.set_in_combat(true);
        assert_eq!(healing_tick(&mut character, 10), TickControl::Stop);

        let mut character = wounded(100);
        character.set_alive(false);
        assert_eq!(healing_tick(&mut character, 10), TickControl::Stop);
    }

    fn context<'a>(
        character: &'a crate::character::SharedCharacter,
        scheduler: &'a Arc<Scheduler>,
        config: &'a ProgressionConfig,
        force_level: i32,
    ) -> ExertContext<'a> {
        ExertContext {
            character,
            scheduler,
            config,
            force_skill_id: "jiben-neigong",
            force_level,
            target: None,
        }
    }

    #[tokio::test]
    async fn test_recover_converts_energy_to_health() {
        let character: crate::character::SharedCharacter =
            Arc::new(Mutex::new(wounded(200)));
        let scheduler = Arc::new(Scheduler::new());
        let config = ProgressionConfig::default();

        // force level 10: 40 energy for 40 health
        let result = Recover.execute(&context(&character, &scheduler, &config, 10));
        assert!(result.success);
        assert!(result.resource_changed);
        let guard = lock(&character);
        assert_eq!(guard.get(attrs::HP), 90);
        assert_eq!(guard.get(attrs::ENERGY), 160);
    }

    #[tokio::test]
    async fn test_recover_rejects_when_unharmed_or_spent() {
        let scheduler = Arc::new(Scheduler::new());
        let config = ProgressionConfig::default();

        let mut whole = wounded(200);
        whole.set(attrs::HP, 100);
        let character: crate::character::SharedCharacter = Arc::new(Mutex::new(whole));
        assert!(!Recover.execute(&context(&character, &scheduler, &config, 10)).success);

        let character: crate::character::SharedCharacter =
            Arc::new(Mutex::new(wounded(10)));
        assert!(!Recover.execute(&context(&character, &scheduler, &config, 10)).success);
    }

    #[tokio::test(start_paused = true)]
    async fn test_heal_trance_runs_until_whole() {
        let character: crate::character::SharedCharacter =
            Arc::new(Mutex::new(wounded(500)));
        let scheduler = Arc::new(Scheduler::new());
        let config = ProgressionConfig::default();

        let result = Heal.execute(&context(&character, &scheduler, &config, 10));
        assert!(result.success);
        assert_eq!(result.healing_started, Some(true));

        // 10 health per tick, 50 missing: whole after five ticks.
        tokio::time::sleep(Duration::from_secs(config.heal_tick_seconds * 7)).await;
        let guard = lock(&character);
        assert_eq!(guard.get(attrs::HP), 100);
        assert_eq!(guard.get(attrs::ENERGY), 500 - 5 * HEAL_TICK_COST);
    }

    #[tokio::test(start_paused = true)]
    async fn test_powerup_expires_on_schedule() {
        let character: crate::character::SharedCharacter =
            Arc::new(Mutex::new(wounded(500)));
        let scheduler = Arc::new(Scheduler::new());
        let config = ProgressionConfig::default();

        let result = Powerup.execute(&context(&character, &scheduler, &config, 5));
        assert!(result.success);
        assert_eq!(result.buff_applied.as_deref(), Some("powerup"));
        assert_eq!(lock(&character).get_temp(POWERUP_TEMP).as_deref(), Some("5"));

        // Double application is rejected while the buff holds.
        assert!(!Powerup.execute(&context(&character, &scheduler, &config, 5)).success);

        tokio::time::sleep(Duration::from_secs(config.buff_seconds_per_level * 5 + 1)).await;
        assert!(lock(&character).get_temp(POWERUP_TEMP).is_none());
    }

    #[test]
    fn test_register_order() {
        let mut registry = ExertRegistry::new();
        register(&mut registry);
        assert_eq!(registry.names(), ["recover", "heal", "powerup"]);
    }
}
