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

//! Immutable skill descriptors
//!
//! A [`SkillDefinition`] is a flat descriptor: a capability tag (category,
//! slot, optional weapon/dantian type) plus a small set of strategy fields
//! populated by the composable constructors below. Shared defaults live on
//! the constructors; per-branch overrides are plain data, not subclassing.
//!
//! Definitions are created once at bootstrap, registered in the
//! [`crate::skill::registry::SkillRegistry`], and never mutated.

use crate::character::{Character, attrs};
use crate::config::ProgressionConfig;
use wulin_common::{BonusSummary, SkillCategory, SlotType};

/// Weapon family tag. The external combat engine keys its weapon-mismatch
/// penalty off this; the progression engine only declares it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeaponType {
    Sword,
    Blade,
    Spear,
    Staff,
    Throwing,
}

impl WeaponType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponType::Sword => "sword",
            WeaponType::Blade => "blade",
            WeaponType::Spear => "spear",
            WeaponType::Staff => "staff",
            WeaponType::Throwing => "throwing",
        }
    }
}

/// Internal-energy family of a force skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DantianType {
    Lower,
    Middle,
    Upper,
}

/// Resource caps contributed by the active force at a given level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceBonus {
    pub max_hp: i32,
    pub max_mp: i32,
}

/// One entry in a martial skill's ordered action table.
#[derive(Debug, Clone)]
pub struct SkillAction {
    pub name: &'static str,
    /// Skill level at which the action becomes usable.
    pub unlock_level: i32,
    /// Energy consumed per use.
    pub energy_cost: i32,
    /// Combat modifiers applied while this is the best unlocked action.
    pub modifiers: BonusSummary,
}

/// How a skill's per-level advancement is gated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImproveGate {
    /// Default martial gate: `combat_exp >= level^3 / divisor`. Each
    /// successive level costs disproportionately more combat experience.
    CombatExperience,
    /// Internal/support gate: advancement is funded by energy spent per
    /// practice tick instead of combat experience.
    PracticeEnergy,
    /// Not improvable by any normal means (innate aptitude, canon arts).
    Never,
}

/// What happens to a skill's level when the character dies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathRule {
    /// Lose one level, floored at zero.
    LoseOne,
    /// Unaffected. Deliberate override for Cognize skills.
    Immune,
}

/// Narrative puzzle steps gating the reference faction's terminal arts.
/// Declaration order inside [`UnlockRules::puzzle`] is the evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzleStep {
    Canju,
    Duanju,
    Shiyan,
}

impl PuzzleStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            PuzzleStep::Canju => "canju",
            PuzzleStep::Duanju => "duanju",
            PuzzleStep::Shiyan => "shiyan",
        }
    }

    /// Character flag marking this step complete for `faction`.
    pub fn flag_key(&self, faction: &str) -> String {
        format!("{}_puzzle_{}", faction, self.as_str())
    }
}

/// Declared unlock conditions for a skill.
///
/// Every collection here is a vector, not a map: declaration order decides
/// which failing rule wins, and that ordering is a contract.
#[derive(Debug, Clone, Default)]
pub struct UnlockRules {
    pub min_rank: Option<&'static str>,
    pub min_attrs: Vec<(&'static str, i64)>,
    pub pre_skills: Vec<(&'static str, i32)>,
    pub puzzle: Vec<PuzzleStep>,
    pub challenges: Vec<&'static str>,
}

/// Per-level attribute bonuses granted while a skill is active, as
/// (attribute key, bonus) pairs.
pub type AttributeBonusFn = fn(i32) -> Vec<(&'static str, i64)>;
/// Per-level resource-cap bonus of a force skill.
pub type ResourceBonusFn = fn(i32) -> ResourceBonus;
/// Whether a skill accepts being mapped into `slot`.
pub type ValidEnableFn = fn(&SkillDefinition, SlotType) -> bool;

fn no_attribute_bonus(_level: i32) -> Vec<(&'static str, i64)> {
    Vec::new()
}

fn no_resource_bonus(_level: i32) -> ResourceBonus {
    ResourceBonus::default()
}

/// Default enable rule: the slot must match the skill's own slot type.
fn enable_matching_slot(def: &SkillDefinition, slot: SlotType) -> bool {
    slot.mappable() && slot == def.skill_type
}

/// Immutable, stateless descriptor of what a skill is and the rules for
/// learning and advancing it. Shared by every character.
#[derive(Debug, Clone)]
pub struct SkillDefinition {
    pub skill_id: &'static str,
    pub skill_name: &'static str,
    /// Slot this skill occupies when mapped. Non-mappable arts (Support,
    /// Cognize) carry the `Cognize` pseudo-slot.
    pub skill_type: SlotType,
    pub category: SkillCategory,
    pub faction: Option<&'static str>,
    /// Terminal canon art of its faction. Subject to the crippled legacy
    /// transition instead of removal on expulsion.
    pub is_canon: bool,
    pub weapon_type: Option<WeaponType>,
    pub dantian: Option<DantianType>,
    /// Maximum reachable level.
    pub max_level: i32,
    /// Ordered action table; empty for non-martial skills.
    pub actions: Vec<SkillAction>,
    pub unlock: Option<UnlockRules>,
    /// Skills that cannot coexist with this one in a ledger.
    pub conflicts: Vec<&'static str>,
    /// Names of non-universal exert effects this force opts into.
    pub exert_effects: Vec<&'static str>,
    /// Lesser skills this art can stand in for at the combat layer.
    pub sub_skills: Vec<&'static str>,
    pub improve_gate: ImproveGate,
    pub death_rule: DeathRule,
    pub attribute_bonus: AttributeBonusFn,
    pub resource_bonus: ResourceBonusFn,
    pub valid_enable: ValidEnableFn,
}

impl SkillDefinition {
    fn base(
        skill_id: &'static str,
        skill_name: &'static str,
        skill_type: SlotType,
        category: SkillCategory,
        improve_gate: ImproveGate,
        death_rule: DeathRule,
    ) -> Self {
        Self {
            skill_id,
            skill_name,
            skill_type,
            category,
            faction: None,
            is_canon: false,
            weapon_type: None,
            dantian: None,
            max_level: 999,
            actions: Vec::new(),
            unlock: None,
            conflicts: Vec::new(),
            exert_effects: Vec::new(),
            sub_skills: Vec::new(),
            improve_gate,
            death_rule,
            attribute_bonus: no_attribute_bonus,
            resource_bonus: no_resource_bonus,
            valid_enable: enable_matching_slot,
        }
    }

    /// Martial art mapped into a combat slot, advanced by combat experience.
    pub fn martial(
        skill_id: &'static str,
        skill_name: &'static str,
        slot: SlotType,
        weapon: Option<WeaponType>,
    ) -> Self {
        let mut def = Self::base(
            skill_id,
            skill_name,
            slot,
            SkillCategory::Martial,
            ImproveGate::CombatExperience,
            DeathRule::LoseOne,
        );
        def.weapon_type = weapon;
        def
    }

    /// Internal force skill, advanced by practice energy.
    pub fn internal(skill_id: &'static str, skill_name: &'static str, dantian: DantianType) -> Self {
        let mut def = Self::base(
            skill_id,
            skill_name,
            SlotType::Force,
            SkillCategory::Internal,
            ImproveGate::PracticeEnergy,
            DeathRule::LoseOne,
        );
        def.dantian = Some(dantian);
        def
    }

    /// Auxiliary art without combat actions; never mapped.
    pub fn support(skill_id: &'static str, skill_name: &'static str) -> Self {
        Self::base(
            skill_id,
            skill_name,
            SlotType::Cognize,
            SkillCategory::Support,
            ImproveGate::PracticeEnergy,
            DeathRule::LoseOne,
        )
    }

    /// Innate aptitude: not improvable by normal means, immune to death
    /// penalty. Both are intentional overrides of the defaults.
    pub fn cognize(skill_id: &'static str, skill_name: &'static str) -> Self {
        Self::base(
            skill_id,
            skill_name,
            SlotType::Cognize,
            SkillCategory::Cognize,
            ImproveGate::Never,
            DeathRule::Immune,
        )
    }

    /// A faction's terminal canon art.
    pub fn canon(skill_id: &'static str, skill_name: &'static str) -> Self {
        let mut def = Self::cognize(skill_id, skill_name);
        def.is_canon = true;
        def
    }

    pub fn with_faction(mut self, faction: &'static str) -> Self {
        self.faction = Some(faction);
        self
    }

    pub fn with_unlock(mut self, unlock: UnlockRules) -> Self {
        self.unlock = Some(unlock);
        self
    }

    pub fn with_actions(mut self, actions: Vec<SkillAction>) -> Self {
        self.actions = actions;
        self
    }

    pub fn with_max_level(mut self, max_level: i32) -> Self {
        self.max_level = max_level;
        self
    }

    pub fn with_conflicts(mut self, conflicts: Vec<&'static str>) -> Self {
        self.conflicts = conflicts;
        self
    }

    pub fn with_exert_effects(mut self, effects: Vec<&'static str>) -> Self {
        self.exert_effects = effects;
        self
    }

    pub fn with_sub_skills(mut self, sub_skills: Vec<&'static str>) -> Self {
        self.sub_skills = sub_skills;
        self
    }

    pub fn with_attribute_bonus(mut self, f: AttributeBonusFn) -> Self {
        self.attribute_bonus = f;
        self
    }

    pub fn with_resource_bonus(mut self, f: ResourceBonusFn) -> Self {
        self.resource_bonus = f;
        self
    }

    pub fn with_valid_enable(mut self, f: ValidEnableFn) -> Self {
        self.valid_enable = f;
        self
    }

    /// Whether the character clears this skill's advancement gate at
    /// `level`. Level caps apply to every gate.
    pub fn can_improve(
        &self,
        character: &dyn Character,
        level: i32,
        config: &ProgressionConfig,
    ) -> bool {
        if level >= self.max_level {
            return false;
        }
        match self.improve_gate {
            ImproveGate::CombatExperience => {
                let required = i64::from(level).pow(3) / config.exp_threshold_divisor;
                character.get(attrs::COMBAT_EXP) >= required
            }
            ImproveGate::PracticeEnergy => true,
            ImproveGate::Never => false,
        }
    }

    /// Level after one death penalty application.
    pub fn on_death_penalty(&self, level: i32) -> i32 {
        match self.death_rule {
            DeathRule::LoseOne => (level - 1).max(0),
            DeathRule::Immune => level,
        }
    }

    /// Energy cost of one practice tick, reduced by perception.
    pub fn practice_cost(&self, character: &dyn Character, config: &ProgressionConfig) -> i64 {
        let discounted = config.practice_base_cost - character.get(attrs::PERCEPTION);
        discounted.max(config.practice_min_cost)
    }

    /// Whether this skill accepts `slot` when mapped.
    pub fn valid_enable(&self, slot: SlotType) -> bool {
        (self.valid_enable)(self, slot)
    }

    /// Best action unlocked at `level`, by declaration order.
    pub fn best_action(&self, level: i32) -> Option<&SkillAction> {
        self.actions
            .iter()
            .filter(|action| action.unlock_level <= level)
            .last()
    }

    pub fn attribute_bonus(&self, level: i32) -> Vec<(&'static str, i64)> {
        (self.attribute_bonus)(level)
    }

    pub fn resource_bonus(&self, level: i32) -> ResourceBonus {
        (self.resource_bonus)(level)
    }
}
