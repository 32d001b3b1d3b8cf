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

//! The per-character skill ledger
//!
//! One [`SkillLedger`] per character, owned exclusively by that character's
//! [`crate::skill::manager::SkillManager`]. Entries are created on first
//! successful learn and only ever removed by faction expulsion.
//!
//! Maps to: `wulin.entity_skills` table (one row per learned skill)

use crate::skill::learned_cap;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::str::FromStr;
use uuid::Uuid;
use wulin_common::{SkillRecord, SlotType};

/// Mutable per-skill state for one character.
#[derive(Debug, Clone)]
pub struct PlayerSkillData {
    pub skill_id: String,
    pub skill_type: SlotType,
    pub level: i32,
    /// Experience within the current level; always `< (level + 1)^2` while
    /// the skill is unlocked and improvable.
    pub learned: i32,
    pub is_mapped: bool,
    pub mapped_slot: Option<SlotType>,
    pub is_active_force: bool,
    /// Terminal lock applied to a crippled canon skill. One-way.
    pub is_locked: bool,
    /// Needs writing at the next save checkpoint.
    pub dirty: bool,
    /// Row already exists in storage.
    pub persisted: bool,
    /// Persistent row id.
    pub record_id: Uuid,
    /// When the skill was first learned.
    pub learned_at: DateTime<Utc>,
}

impl PlayerSkillData {
    /// Fresh entry for a newly learned skill.
    pub fn new(skill_id: impl Into<String>, skill_type: SlotType) -> Self {
        Self {
            skill_id: skill_id.into(),
            skill_type,
            level: 0,
            learned: 0,
            is_mapped: false,
            mapped_slot: None,
            is_active_force: false,
            is_locked: false,
            dirty: true,
            persisted: false,
            record_id: Uuid::new_v4(),
            learned_at: Utc::now(),
        }
    }

    /// Experience required to leave the current level.
    pub fn learned_max(&self) -> i32 {
        learned_cap(self.level)
    }

    /// Rebuild an entry from its persisted row. The slot string is parsed
    /// leniently; a corrupt slot clears the mapping rather than failing the
    /// whole load.
    pub fn from_record(record: &SkillRecord) -> Self {
        let skill_type =
            SlotType::from_str(&record.skill_type).unwrap_or(SlotType::Cognize);
        let mapped_slot = record
            .mapped_slot
            .as_deref()
            .and_then(|slot| SlotType::from_str(slot).ok());
        Self {
            skill_id: record.skill_id.clone(),
            skill_type,
            level: record.level,
            learned: record.learned,
            is_mapped: record.is_mapped && mapped_slot.is_some(),
            mapped_slot,
            is_active_force: record.is_active_force,
            is_locked: record.is_locked,
            dirty: false,
            persisted: true,
            record_id: record.id,
            learned_at: record.created_at,
        }
    }

    pub fn to_record(&self, character_id: Uuid) -> SkillRecord {
        SkillRecord {
            id: self.record_id,
            character_id,
            skill_id: self.skill_id.clone(),
            skill_type: self.skill_type.as_str().to_string(),
            level: self.level,
            learned: self.learned,
            is_mapped: self.is_mapped,
            mapped_slot: self.mapped_slot.map(|slot| slot.as_str().to_string()),
            is_active_force: self.is_active_force,
            is_locked: self.is_locked,
            created_at: self.learned_at,
        }
    }
}

/// All learned skills of one character plus the slot mapping.
#[derive(Debug, Default)]
pub struct SkillLedger {
    skills: HashMap<String, PlayerSkillData>,
    slot_map: HashMap<SlotType, String>,
    active_force: Option<String>,
}

impl SkillLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, skill_id: &str) -> bool {
        self.skills.contains_key(skill_id)
    }

    pub fn get(&self, skill_id: &str) -> Option<&PlayerSkillData> {
        self.skills.get(skill_id)
    }

    pub fn get_mut(&mut self, skill_id: &str) -> Option<&mut PlayerSkillData> {
        self.skills.get_mut(skill_id)
    }

    /// Level of a skill; not learned counts as 0.
    pub fn level_of(&self, skill_id: &str) -> i32 {
        self.skills.get(skill_id).map(|entry| entry.level).unwrap_or(0)
    }

    pub fn insert(&mut self, entry: PlayerSkillData) {
        self.skills.insert(entry.skill_id.clone(), entry);
    }

    /// Remove an entry outright. Faction expulsion only; canon skills are
    /// locked instead, never removed.
    pub fn remove(&mut self, skill_id: &str) -> Option<PlayerSkillData> {
        if let Some(entry) = self.skills.remove(skill_id) {
            // Scan by occupant: the slot map may point here even when the
            // entry's own mapping flags were never set.
            self.slot_map.retain(|_, occupant| occupant != skill_id);
            if self.active_force.as_deref() == Some(skill_id) {
                self.active_force = None;
            }
            Some(entry)
        } else {
            None
        }
    }

    /// Test/fixture helper: learn a skill directly at a level.
    pub fn learn(&mut self, skill_id: &str, skill_type: SlotType, level: i32) {
        let mut entry = PlayerSkillData::new(skill_id, skill_type);
        entry.level = level;
        self.insert(entry);
    }

    pub fn occupant(&self, slot: SlotType) -> Option<&str> {
        self.slot_map.get(&slot).map(String::as_str)
    }

    pub fn slot_map(&self) -> &HashMap<SlotType, String> {
        &self.slot_map
    }

    /// Point `slot` at `skill_id` in the slot map. Entry flags are the
    /// manager's responsibility.
    pub fn set_slot(&mut self, slot: SlotType, skill_id: Option<&str>) {
        match skill_id {
            Some(id) => {
                self.slot_map.insert(slot, id.to_string());
            }
            None => {
                self.slot_map.remove(&slot);
            }
        }
    }

    pub fn active_force(&self) -> Option<&str> {
        self.active_force.as_deref()
    }

    pub fn set_active_force(&mut self, skill_id: Option<&str>) {
        self.active_force = skill_id.map(str::to_string);
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerSkillData> {
        self.skills.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut PlayerSkillData> {
        self.skills.values_mut()
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}
