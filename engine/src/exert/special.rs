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

//! Opt-in exert effects
//!
//! Available only when the active force's definition lists them in its
//! `exert_effects`. Both are usable mid-combat; that is the point of them.

use crate::character::{attrs, drain};
use crate::exert::{ExertContext, ExertEffect, ExertRegistry, lock};
use std::sync::Arc;
use std::time::Duration;
use wulin_common::ExertResult;

/// Temp key marking the force shield buff.
pub const SHIELD_TEMP: &str = "buff_shield";
/// Temp key marking the sword-energy buff.
pub const JIANQI_TEMP: &str = "buff_jianqi";

pub fn register(registry: &mut ExertRegistry) {
    registry.register(Box::new(Shield));
    registry.register(Box::new(Jianqi));
}

/// Raise a timed buff stored under `temp_key`, expiring via the scheduler.
fn timed_buff(
    ctx: &ExertContext<'_>,
    temp_key: &'static str,
    task: &'static str,
    cost: i64,
    expiry_message: &'static str,
) -> Result<(), ExertResult> {
    let owner = {
        let mut character = lock(ctx.character);
        if character.get_temp(temp_key).is_some() {
            return Err(ExertResult::failure("That force is already at work."));
        }
        if character.get(attrs::ENERGY) < cost {
            return Err(ExertResult::failure("You lack the energy."));
        }
        drain(&mut *character, attrs::ENERGY, cost);
        character.set_temp(temp_key, Some(ctx.force_level.to_string()));
        character.id()
    };

    let seconds = ctx.config.buff_seconds_per_level * u64::from(ctx.force_level.max(1) as u32);
    let handle = Arc::clone(ctx.character);
    ctx.scheduler
        .spawn_once(owner, task, Duration::from_secs(seconds), move || {
            let mut character = lock(&handle);
            character.set_temp(temp_key, None);
            character.send(expiry_message);
        });
    Ok(())
}

/// Protective screen of force; the combat layer reads the buff level from
/// temp storage when resolving incoming blows.
struct Shield;

impl ExertEffect for Shield {
    fn name(&self) -> &'static str {
        "shield"
    }

    fn display_name(&self) -> &'static str {
        "force shield"
    }

    fn can_use_in_combat(&self) -> bool {
        true
    }

    fn execute(&self, ctx: &ExertContext<'_>) -> ExertResult {
        if let Err(failure) = timed_buff(
            ctx,
            SHIELD_TEMP,
            "exert-shield",
            80,
            "Your shield of force dissipates.",
        ) {
            return failure;
        }
        ExertResult {
            success: true,
            message: "A shimmering screen of force surrounds you.".to_string(),
            resource_changed: true,
            buff_applied: Some("shield".to_string()),
            ..Default::default()
        }
    }
}

/// Sword energy wreathing the mapped blade.
struct Jianqi;

impl ExertEffect for Jianqi {
    fn name(&self) -> &'static str {
        "jianqi"
    }

    fn display_name(&self) -> &'static str {
        "sword energy"
    }

    fn can_use_in_combat(&self) -> bool {
        true
    }

    fn execute(&self, ctx: &ExertContext<'_>) -> ExertResult {
        if let Err(failure) = timed_buff(
            ctx,
            JIANQI_TEMP,
            "exert-jianqi",
            120,
            "The sword energy around your blade fades.",
        ) {
            return failure;
        }
        ExertResult {
            success: true,
            message: "Pale energy wreathes your blade.".to_string(),
            resource_changed: true,
            buff_applied: Some("jianqi".to_string()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{Character, SharedCharacter};
    use crate::config::ProgressionConfig;
    use crate::scheduler::Scheduler;
    use crate::test_utils::TestCharacter;
    use std::sync::Mutex;

    fn context<'a>(
        character: &'a SharedCharacter,
        scheduler: &'a Arc<Scheduler>,
        config: &'a ProgressionConfig,
    ) -> ExertContext<'a> {
        ExertContext {
            character,
            scheduler,
            config,
            force_skill_id: "zixia-shengong",
            force_level: 10,
            target: None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_shield_applies_and_expires() {
        let mut probe = TestCharacter::new("Shen");
        probe.set(attrs::ENERGY, 300);
        let character: SharedCharacter = Arc::new(Mutex::new(probe));
        let scheduler = Arc::new(Scheduler::new());
        let config = ProgressionConfig::default();

        let result = Shield.execute(&context(&character, &scheduler, &config));
        assert!(result.success);
        assert_eq!(lock(&character).get_temp(SHIELD_TEMP).as_deref(), Some("10"));
        assert_eq!(lock(&character).get(attrs::ENERGY), 220);

        // Stacking is rejected while active.
        assert!(!Shield.execute(&context(&character, &scheduler, &config)).success);

        tokio::time::sleep(Duration::from_secs(config.buff_seconds_per_level * 10 + 1)).await;
        assert!(lock(&character).get_temp(SHIELD_TEMP).is_none());
    }

    #[tokio::test]
    async fn test_jianqi_requires_energy() {
        let mut probe = TestCharacter::new("Shen");
        probe.set(attrs::ENERGY, 50);
        let character: SharedCharacter = Arc::new(Mutex::new(probe));
        let scheduler = Arc::new(Scheduler::new());
        let config = ProgressionConfig::default();

        let result = Jianqi.execute(&context(&character, &scheduler, &config));
        assert!(!result.success);
        assert_eq!(lock(&character).get(attrs::ENERGY), 50);
    }

    #[test]
    fn test_register_order_and_combat_use() {
        let mut registry = ExertRegistry::new();
        register(&mut registry);
        assert_eq!(registry.names(), ["shield", "jianqi"]);
        assert!(registry.get("shield").unwrap().can_use_in_combat());
        assert!(!registry.get("shield").unwrap().is_universal());
    }
}
