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

//! Skill taxonomy primitives shared between the engine and the wire layer

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Combat slot a skill can be mapped into.
///
/// Each slot holds at most one mapped skill at a time. `Cognize` is a
/// pseudo-slot: skills carrying it can never be mapped into combat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotType {
    Sword,
    Blade,
    Spear,
    Staff,
    Throwing,
    Unarmed,
    Dodge,
    Parry,
    Force,
    Cognize,
}

impl SlotType {
    /// Whether this slot participates in combat mapping at all.
    pub fn mappable(&self) -> bool {
        !matches!(self, SlotType::Cognize)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SlotType::Sword => "sword",
            SlotType::Blade => "blade",
            SlotType::Spear => "spear",
            SlotType::Staff => "staff",
            SlotType::Throwing => "throwing",
            SlotType::Unarmed => "unarmed",
            SlotType::Dodge => "dodge",
            SlotType::Parry => "parry",
            SlotType::Force => "force",
            SlotType::Cognize => "cognize",
        }
    }

    /// All slot variants in display order.
    pub fn all() -> &'static [SlotType] {
        &[
            SlotType::Sword,
            SlotType::Blade,
            SlotType::Spear,
            SlotType::Staff,
            SlotType::Throwing,
            SlotType::Unarmed,
            SlotType::Dodge,
            SlotType::Parry,
            SlotType::Force,
            SlotType::Cognize,
        ]
    }
}

impl fmt::Display for SlotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SlotType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .find(|slot| slot.as_str() == s.to_lowercase())
            .copied()
            .ok_or(format!("Unknown slot {}", s))
    }
}

/// Broad skill family fixing structural constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    /// Weapon arts, palms, dodging and parrying techniques.
    Martial,
    /// Internal force cultivation. Contributes resource bonuses while active.
    Internal,
    /// Auxiliary arts without direct combat actions.
    Support,
    /// Innate aptitude and terminal canon arts. Never mappable, never
    /// improvable by normal means.
    Cognize,
}

impl SkillCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillCategory::Martial => "martial",
            SkillCategory::Internal => "internal",
            SkillCategory::Support => "support",
            SkillCategory::Cognize => "cognize",
        }
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Aggregated combat-facing totals contributed by mapped skills and the
/// active force. All fields default to zero so an empty loadout sums cleanly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusSummary {
    pub attack: i32,
    pub defense: i32,
    pub dodge: i32,
    pub parry: i32,
    pub max_hp: i32,
    pub max_mp: i32,
    pub crit_rate: i32,
    pub hit_rate: i32,
}

impl BonusSummary {
    /// Accumulate another summary into this one.
    pub fn add(&mut self, other: &BonusSummary) {
        self.attack += other.attack;
        self.defense += other.defense;
        self.dodge += other.dodge;
        self.parry += other.parry;
        self.max_hp += other.max_hp;
        self.max_mp += other.max_mp;
        self.crit_rate += other.crit_rate;
        self.hit_rate += other.hit_rate;
    }
}
