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

//! Exert effects
//!
//! Consumable abilities channelled through the active force: convert
//! energy, sustain a healing trance, raise timed buffs. Universal effects
//! work with any force; the rest must be opted into by the force's
//! definition. Every rejection is a soft [`ExertResult`], never an error.

pub mod special;
pub mod universal;

use crate::character::{Character, SharedCharacter};
use crate::config::ProgressionConfig;
use crate::scheduler::Scheduler;
use crate::skill::manager::SkillManager;
use std::collections::HashMap;
use std::sync::{Arc, MutexGuard, PoisonError};
use wulin_common::ExertResult;

/// Everything an effect needs at execution time.
pub struct ExertContext<'a> {
    pub character: &'a SharedCharacter,
    pub scheduler: &'a Arc<Scheduler>,
    pub config: &'a ProgressionConfig,
    /// The active force channelling the effect.
    pub force_skill_id: &'a str,
    pub force_level: i32,
    pub target: Option<&'a str>,
}

/// One named exert effect.
pub trait ExertEffect: Send + Sync {
    fn name(&self) -> &'static str;
    fn display_name(&self) -> &'static str;

    /// Universal effects are available with any active force; the rest
    /// require an opt-in in the force's definition.
    fn is_universal(&self) -> bool {
        false
    }

    fn can_use_in_combat(&self) -> bool {
        false
    }

    fn execute(&self, ctx: &ExertContext<'_>) -> ExertResult;
}

/// Effect lookup by name, built once at bootstrap like the skill registry.
#[derive(Default)]
pub struct ExertRegistry {
    effects: HashMap<&'static str, Box<dyn ExertEffect>>,
    order: Vec<&'static str>,
}

impl ExertRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, effect: Box<dyn ExertEffect>) {
        let name = effect.name();
        if self.effects.contains_key(name) {
            tracing::warn!(effect = name, "duplicate exert registration, overwriting");
        } else {
            self.order.push(name);
        }
        self.effects.insert(name, effect);
    }

    pub fn get(&self, name: &str) -> Option<&dyn ExertEffect> {
        self.effects.get(name).map(Box::as_ref)
    }

    /// Effect names in registration order.
    pub fn names(&self) -> &[&'static str] {
        &self.order
    }
}

/// Lock a shared character, recovering the guard from a poisoned lock.
pub(crate) fn lock(character: &SharedCharacter) -> MutexGuard<'_, dyn Character + 'static> {
    character.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Route one exert invocation: resolve the active force, the effect, the
/// opt-in, and the combat restriction, then execute. A successful use gives
/// the channelling force a chance to advance.
pub fn dispatch(
    manager: &mut SkillManager,
    exerts: &ExertRegistry,
    scheduler: &Arc<Scheduler>,
    character: &SharedCharacter,
    effect_name: &str,
    target: Option<&str>,
) -> ExertResult {
    let Some(force_id) = manager.active_force().map(str::to_string) else {
        return ExertResult::failure("You must first circulate an internal force.");
    };
    let force_level = manager.ledger().level_of(&force_id);

    let Some(effect) = exerts.get(effect_name) else {
        return ExertResult::failure("You know no such application of your force.");
    };

    if !effect.is_universal() {
        let opted_in = manager
            .registry()
            .get(&force_id)
            .is_some_and(|def| def.exert_effects.contains(&effect_name));
        if !opted_in {
            return ExertResult::failure(format!(
                "Your force cannot channel {}.",
                effect.display_name()
            ));
        }
    }

    if lock(character).in_combat() && !effect.can_use_in_combat() {
        return ExertResult::failure("You cannot do that in the midst of battle.");
    }

    let config = manager.config().clone();
    let result = effect.execute(&ExertContext {
        character,
        scheduler,
        config: &config,
        force_skill_id: &force_id,
        force_level,
        target,
    });

    if result.success {
        let guard = lock(character);
        manager.weak_improve(&*guard, &force_id);
    }
    result
}
