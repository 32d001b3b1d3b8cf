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

//! The per-character skill manager
//!
//! One instance per character; the only component allowed to mutate that
//! character's [`SkillLedger`]. Domain rejections come back as user-facing
//! strings, never as panics or errors — the command layer surfaces them
//! verbatim.

use crate::character::Character;
use crate::config::ProgressionConfig;
use crate::faction::RankLadder;
use crate::persistence::{SkillService, StoreError};
use crate::skill::ledger::{PlayerSkillData, SkillLedger};
use crate::skill::registry::SkillRegistry;
use crate::skill::unlock::{UnlockEvaluator, UnlockResult, UnlockState, crippled_flag};
use std::sync::Arc;
use uuid::Uuid;
use wulin_common::{BonusSummary, MapResult, SkillCategory, SkillPanel, SkillPanelEntry, SlotType};

/// Mutable skill state and operations for one character.
pub struct SkillManager {
    character_id: Uuid,
    ledger: SkillLedger,
    registry: Arc<SkillRegistry>,
    ladder: Arc<dyn RankLadder>,
    config: ProgressionConfig,
    /// Rows removed by faction expulsion, deleted at the next save.
    deleted: Vec<Uuid>,
}

impl SkillManager {
    pub fn new(
        character_id: Uuid,
        registry: Arc<SkillRegistry>,
        ladder: Arc<dyn RankLadder>,
        config: ProgressionConfig,
    ) -> Self {
        Self {
            character_id,
            ledger: SkillLedger::new(),
            registry,
            ladder,
            config,
            deleted: Vec::new(),
        }
    }

    pub fn character_id(&self) -> Uuid {
        self.character_id
    }

    pub fn ledger(&self) -> &SkillLedger {
        &self.ledger
    }

    /// Mutable ledger access for fixtures and world scripts that grant
    /// levels directly. Gameplay flows go through the operations below.
    pub fn ledger_mut(&mut self) -> &mut SkillLedger {
        &mut self.ledger
    }

    pub fn registry(&self) -> &Arc<SkillRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &ProgressionConfig {
        &self.config
    }

    /// Unlock verdict for any skill, learned or not. This is the one code
    /// path deciding unlock state; learning and UI previews both use it.
    pub fn evaluate(&self, character: &dyn Character, skill_id: &str) -> UnlockResult {
        UnlockEvaluator::new(&self.registry, &*self.ladder).evaluate(
            character,
            &self.ledger,
            skill_id,
        )
    }

    /// Learn a skill from `source` (a book, a teacher, a master's grace).
    /// Inserts a fresh ledger entry at level 0 on success.
    pub fn learn_skill(
        &mut self,
        character: &dyn Character,
        skill_id: &str,
        source: &str,
    ) -> Result<(), String> {
        let Some(def) = self.registry.get(skill_id) else {
            return Err("You know of no such art.".to_string());
        };

        // Conflicts are symmetric: either side declaring the pair blocks it.
        for conflict in &def.conflicts {
            if self.ledger.contains(conflict) {
                let name = self
                    .registry
                    .get(conflict)
                    .map(|other| other.skill_name)
                    .unwrap_or(conflict);
                return Err(format!(
                    "{} cannot coexist with the {} you have already cultivated.",
                    def.skill_name, name
                ));
            }
        }
        for entry in self.ledger.iter() {
            if let Some(other) = self.registry.get(&entry.skill_id) {
                if other.conflicts.contains(&skill_id) {
                    return Err(format!(
                        "{} cannot coexist with the {} you have already cultivated.",
                        def.skill_name, other.skill_name
                    ));
                }
            }
        }

        let verdict = self.evaluate(character, skill_id);
        if verdict.state != UnlockState::Available {
            return Err(verdict.message);
        }

        let skill_type = def.skill_type;
        tracing::info!(
            character = %self.character_id,
            skill_id,
            source,
            "character learned a new skill"
        );
        self.ledger.insert(PlayerSkillData::new(skill_id, skill_type));
        Ok(())
    }

    /// Whether the advancement gate for `skill_id` passes right now.
    pub fn can_improve(&self, character: &dyn Character, skill_id: &str) -> bool {
        let Some(entry) = self.ledger.get(skill_id) else {
            return false;
        };
        if entry.is_locked {
            return false;
        }
        self.registry
            .get(skill_id)
            .is_some_and(|def| def.can_improve(character, entry.level, &self.config))
    }

    /// Add `amount` experience within the current level. Returns whether a
    /// level-up happened. Fails silently (false, no mutation) when the
    /// skill is missing, locked, or its gate rejects.
    ///
    /// Level-up detection and the experience reset are one atomic step: no
    /// observer ever sees `learned >= (level + 1)^2`. Overflow past the
    /// threshold is discarded, not carried.
    pub fn improve_skill(&mut self, character: &dyn Character, skill_id: &str, amount: i32) -> bool {
        if amount <= 0 || !self.can_improve(character, skill_id) {
            return false;
        }
        let Some(entry) = self.ledger.get_mut(skill_id) else {
            return false;
        };
        entry.learned += amount;
        entry.dirty = true;
        if entry.learned >= entry.learned_max() {
            entry.level += 1;
            entry.learned = 0;
            tracing::debug!(skill_id, level = entry.level, "skill leveled up");
            return true;
        }
        false
    }

    /// Map `skill_id` into `slot`, or unmap the slot when `None`.
    ///
    /// Each slot holds at most one skill; mapping over an occupant clears
    /// the occupant's flags in the same operation.
    pub fn map_skill(&mut self, slot: SlotType, skill_id: Option<&str>) -> Result<(), String> {
        if !slot.mappable() {
            return Err("Nothing can be readied there.".to_string());
        }

        let Some(skill_id) = skill_id else {
            self.clear_slot(slot);
            return Ok(());
        };

        let Some(def) = self.registry.get(skill_id) else {
            return Err("You know of no such art.".to_string());
        };
        let def_name = def.skill_name;
        if !def.valid_enable(slot) {
            return Err(format!("{} cannot be readied as {}.", def_name, slot));
        }
        let Some(entry) = self.ledger.get(skill_id) else {
            return Err(format!("You have not learned {}.", def_name));
        };
        if entry.is_locked {
            return Err(format!("Your {} is crippled and beyond use.", def_name));
        }
        let previous_slot = entry.mapped_slot;

        // Evict the current occupant, if it is a different skill.
        if self
            .ledger
            .occupant(slot)
            .is_some_and(|occupant| occupant != skill_id)
        {
            self.clear_slot(slot);
        }
        // A skill occupies at most one slot; leaving the old one is part of
        // the same operation.
        if let Some(old_slot) = previous_slot {
            if old_slot != slot {
                self.ledger.set_slot(old_slot, None);
            }
        }

        if let Some(entry) = self.ledger.get_mut(skill_id) {
            entry.is_mapped = true;
            entry.mapped_slot = Some(slot);
            entry.dirty = true;
        }
        self.ledger.set_slot(slot, Some(skill_id));
        Ok(())
    }

    fn clear_slot(&mut self, slot: SlotType) {
        if let Some(occupant) = self.ledger.occupant(slot).map(str::to_string) {
            if let Some(entry) = self.ledger.get_mut(&occupant) {
                entry.is_mapped = false;
                entry.mapped_slot = None;
                entry.dirty = true;
            }
            self.ledger.set_slot(slot, None);
        }
    }

    /// Map operation wrapped into the outbound payload.
    pub fn map_result(&mut self, slot: SlotType, skill_id: Option<&str>) -> MapResult {
        let outcome = self.map_skill(slot, skill_id);
        let skill_name = skill_id
            .and_then(|id| self.registry.get(id))
            .map(|def| def.skill_name.to_string());
        MapResult {
            success: outcome.is_ok(),
            slot_type: slot,
            skill_id: skill_id.map(str::to_string),
            skill_name,
            message: match outcome {
                Ok(()) => match skill_id {
                    Some(_) => "Readied.".to_string(),
                    None => "Cleared.".to_string(),
                },
                Err(message) => message,
            },
            updated_map: self.ledger.slot_map().clone(),
        }
    }

    /// Make `skill_id` the character's active force. At most one force is
    /// active; activating a new one deactivates the previous.
    pub fn activate_force(&mut self, skill_id: &str) -> Result<(), String> {
        let Some(def) = self.registry.get(skill_id) else {
            return Err("You know of no such art.".to_string());
        };
        if def.category != SkillCategory::Internal {
            return Err(format!("{} is not an internal force.", def.skill_name));
        }
        let def_name = def.skill_name;
        match self.ledger.get(skill_id) {
            None => return Err(format!("You have not learned {}.", def_name)),
            Some(entry) if entry.is_locked => {
                return Err(format!("Your {} is crippled and beyond use.", def_name));
            }
            Some(_) => {}
        }

        self.deactivate_force();
        if let Some(entry) = self.ledger.get_mut(skill_id) {
            entry.is_active_force = true;
            entry.dirty = true;
        }
        self.ledger.set_active_force(Some(skill_id));
        Ok(())
    }

    /// Clear the active force, if any. Returns the previously active id.
    pub fn deactivate_force(&mut self) -> Option<String> {
        let previous = self.ledger.active_force().map(str::to_string)?;
        if let Some(entry) = self.ledger.get_mut(&previous) {
            entry.is_active_force = false;
            entry.dirty = true;
        }
        self.ledger.set_active_force(None);
        Some(previous)
    }

    pub fn active_force(&self) -> Option<&str> {
        self.ledger.active_force()
    }

    /// Apply the death penalty to every ledger entry. Mapped and active
    /// skills are not exempt; Cognize skills are immune by definition.
    pub fn apply_death_penalty(&mut self) {
        let registry = Arc::clone(&self.registry);
        for entry in self.ledger.iter_mut() {
            // An unregistered skill falls back to the default penalty.
            let new_level = registry
                .get(&entry.skill_id)
                .map(|def| def.on_death_penalty(entry.level))
                .unwrap_or_else(|| (entry.level - 1).max(0));
            if new_level != entry.level {
                entry.level = new_level;
                // Keep the in-level invariant after the drop.
                entry.learned = entry.learned.min(entry.learned_max() - 1).max(0);
                entry.dirty = true;
            }
        }
        tracing::info!(character = %self.character_id, "death penalty applied");
    }

    /// Faction expulsion: every skill of `faction` leaves the ledger,
    /// except its canon skill, which is retained, force-locked, and
    /// unmapped — the crippled legacy. That entry is never deleted.
    pub fn remove_skills_by_faction(&mut self, character: &mut dyn Character, faction: &str) {
        let affected: Vec<(String, bool)> = self
            .ledger
            .iter()
            .filter_map(|entry| {
                let def = self.registry.get(&entry.skill_id)?;
                (def.faction == Some(faction)).then(|| (entry.skill_id.clone(), def.is_canon))
            })
            .collect();

        for (skill_id, is_canon) in affected {
            if is_canon {
                if let Some(slot) = self.ledger.get(&skill_id).and_then(|entry| entry.mapped_slot)
                {
                    self.ledger.set_slot(slot, None);
                }
                if self.ledger.active_force() == Some(skill_id.as_str()) {
                    self.ledger.set_active_force(None);
                }
                if let Some(entry) = self.ledger.get_mut(&skill_id) {
                    entry.is_locked = true;
                    entry.is_mapped = false;
                    entry.mapped_slot = None;
                    entry.is_active_force = false;
                    entry.dirty = true;
                }
                character.set_flag(&crippled_flag(faction), true);
                tracing::info!(character = %self.character_id, skill_id, "canon skill crippled");
            } else if let Some(entry) = self.ledger.remove(&skill_id) {
                if entry.persisted {
                    self.deleted.push(entry.record_id);
                }
                tracing::info!(character = %self.character_id, skill_id, "faction skill removed");
            }
        }
    }

    /// Sum the combat-facing totals of every mapped martial skill plus the
    /// active force's resource bonus. All-zero when nothing is mapped.
    pub fn bonus_summary(&self) -> BonusSummary {
        let mut summary = BonusSummary::default();
        for (_, skill_id) in self.ledger.slot_map() {
            let Some(entry) = self.ledger.get(skill_id) else {
                continue;
            };
            let Some(def) = self.registry.get(skill_id) else {
                continue;
            };
            if def.category != SkillCategory::Martial {
                continue;
            }
            if let Some(action) = def.best_action(entry.level) {
                summary.add(&action.modifiers);
            }
        }
        if let Some(force_id) = self.ledger.active_force() {
            if let (Some(entry), Some(def)) =
                (self.ledger.get(force_id), self.registry.get(force_id))
            {
                let resource = def.resource_bonus(entry.level);
                summary.max_hp += resource.max_hp;
                summary.max_mp += resource.max_mp;
            }
        }
        summary
    }

    /// Outbound skill panel payload.
    pub fn panel(&self) -> SkillPanel {
        let mut skills: Vec<SkillPanelEntry> = self
            .ledger
            .iter()
            .map(|entry| {
                let def = self.registry.get(&entry.skill_id);
                SkillPanelEntry {
                    skill_id: entry.skill_id.clone(),
                    skill_name: def
                        .map(|def| def.skill_name.to_string())
                        .unwrap_or_else(|| entry.skill_id.clone()),
                    skill_type: entry.skill_type,
                    category: def.map(|def| def.category).unwrap_or(SkillCategory::Martial),
                    level: entry.level,
                    learned: entry.learned,
                    learned_max: entry.learned_max(),
                    is_mapped: entry.is_mapped,
                    mapped_slot: entry.mapped_slot,
                    is_active_force: entry.is_active_force,
                    is_locked: entry.is_locked,
                }
            })
            .collect();
        skills.sort_by(|a, b| a.skill_id.cmp(&b.skill_id));
        SkillPanel {
            skills,
            slot_map: self.ledger.slot_map().clone(),
            active_force: self.ledger.active_force().map(str::to_string),
            summary: self.bonus_summary(),
        }
    }

    /// Load the ledger from storage. Called once at character-enter; rows
    /// naming skills missing from the registry are skipped with a warning
    /// rather than failing the whole load.
    #[tracing::instrument(skip(self, store), fields(character = %self.character_id))]
    pub async fn load_from_store(&mut self, store: &dyn SkillService) -> Result<usize, StoreError> {
        let records = store.find_by_character(self.character_id).await?;
        let mut loaded = 0;
        for record in records {
            if self.registry.get(&record.skill_id).is_none() {
                tracing::warn!(skill_id = %record.skill_id, "skipping row for unregistered skill");
                continue;
            }
            let mut entry = PlayerSkillData::from_record(&record);
            if let Some(slot) = entry.mapped_slot.filter(|_| entry.is_mapped) {
                self.ledger.set_slot(slot, Some(&entry.skill_id));
            }
            if entry.is_active_force {
                if self.ledger.active_force().is_some() {
                    tracing::warn!(
                        skill_id = %entry.skill_id,
                        "multiple active forces in storage, keeping the first"
                    );
                    entry.is_active_force = false;
                    entry.dirty = true;
                } else {
                    self.ledger.set_active_force(Some(&entry.skill_id));
                }
            }
            self.ledger.insert(entry);
            loaded += 1;
        }
        Ok(loaded)
    }

    /// Flush dirty state to storage. Called at exit/logout. Failures are
    /// logged and swallowed: in-memory state is never rolled back, and the
    /// dirty flags stay set so the next checkpoint retries.
    #[tracing::instrument(skip(self, store), fields(character = %self.character_id))]
    pub async fn save_to_store(&mut self, store: &dyn SkillService) -> usize {
        let mut written = 0;

        let mut remaining = Vec::new();
        for record_id in std::mem::take(&mut self.deleted) {
            match store.delete(record_id).await {
                Ok(()) => written += 1,
                Err(error) => {
                    tracing::warn!(%record_id, %error, "failed to delete skill row");
                    remaining.push(record_id);
                }
            }
        }
        self.deleted = remaining;

        let character_id = self.character_id;
        let mut creates = Vec::new();
        let mut updates = Vec::new();
        for entry in self.ledger.iter() {
            if !entry.persisted {
                creates.push(entry.to_record(character_id));
            } else if entry.dirty {
                updates.push(entry.to_record(character_id));
            }
        }

        for record in creates {
            let skill_id = record.skill_id.clone();
            match store.create(&record).await {
                Ok(()) => {
                    if let Some(entry) = self.ledger.get_mut(&skill_id) {
                        entry.persisted = true;
                        entry.dirty = false;
                    }
                    written += 1;
                }
                Err(error) => {
                    tracing::warn!(%skill_id, %error, "failed to create skill row");
                }
            }
        }

        if !updates.is_empty() {
            // One remap can touch several rows; the batch is all-or-nothing.
            match store.update_many(&updates).await {
                Ok(()) => {
                    for record in &updates {
                        if let Some(entry) = self.ledger.get_mut(&record.skill_id) {
                            entry.dirty = false;
                        }
                    }
                    written += updates.len();
                }
                Err(error) => {
                    tracing::warn!(%error, "failed to update skill rows, will retry next save");
                }
            }
        }

        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::attrs;
    use crate::skill::learned_cap;
    use crate::test_utils::{TestCharacter, lingyun_elder, test_manager};

    #[test]
    fn test_learn_inserts_level_zero_entry() {
        let mut manager = test_manager();
        let character = TestCharacter::new("Shen");

        manager
            .learn_skill(&character, "jiben-jianfa", "test")
            .unwrap();
        let entry = manager.ledger().get("jiben-jianfa").unwrap();
        assert_eq!(entry.level, 0);
        assert_eq!(entry.learned, 0);
        assert!(!entry.is_mapped);
        assert!(entry.dirty);
    }

    #[test]
    fn test_learn_twice_rejected_with_string() {
        let mut manager = test_manager();
        let character = TestCharacter::new("Shen");
        manager
            .learn_skill(&character, "jiben-jianfa", "test")
            .unwrap();
        let rejection = manager
            .learn_skill(&character, "jiben-jianfa", "test")
            .unwrap_err();
        assert!(rejection.contains("already"));
    }

    #[test]
    fn test_unknown_skill_soft_rejection() {
        let mut manager = test_manager();
        let character = TestCharacter::new("Shen");
        assert!(manager.learn_skill(&character, "no-such-art", "test").is_err());
        assert!(!manager.improve_skill(&character, "no-such-art", 5));
        assert!(manager.map_skill(SlotType::Sword, Some("no-such-art")).is_err());
    }

    #[test]
    fn test_conflicts_are_symmetric() {
        let mut manager = test_manager();
        let character = lingyun_elder("Shen");

        manager
            .learn_skill(&character, "qingxu-gong", "test")
            .unwrap();
        manager.ledger_mut().get_mut("qingxu-gong").unwrap().level = 40;
        manager
            .learn_skill(&character, "zixia-shengong", "test")
            .unwrap();
        let rejection = manager
            .learn_skill(&character, "guiyuan-shengong", "test")
            .unwrap_err();
        assert!(rejection.contains("cannot coexist"));
    }

    #[test]
    fn test_improve_invariant_holds_after_every_call() {
        let mut manager = test_manager();
        let character = TestCharacter::new("Shen");
        manager
            .learn_skill(&character, "jiben-jianfa", "test")
            .unwrap();

        for _ in 0..200 {
            manager.improve_skill(&character, "jiben-jianfa", 3);
            let entry = manager.ledger().get("jiben-jianfa").unwrap();
            assert!(entry.learned < learned_cap(entry.level));
        }
    }

    #[test]
    fn test_fresh_skill_levels_on_one_point() {
        let mut manager = test_manager();
        let character = TestCharacter::new("Shen");
        manager
            .learn_skill(&character, "jiben-jianfa", "test")
            .unwrap();

        // Threshold at level 0 is (0+1)^2 = 1.
        let leveled = manager.improve_skill(&character, "jiben-jianfa", 1);
        assert!(leveled);
        let entry = manager.ledger().get("jiben-jianfa").unwrap();
        assert_eq!(entry.level, 1);
        assert_eq!(entry.learned, 0);
    }

    #[test]
    fn test_overflow_is_discarded_not_carried() {
        let mut manager = test_manager();
        let character = TestCharacter::new("Shen");
        manager
            .learn_skill(&character, "jiben-jianfa", "test")
            .unwrap();

        // 50 points into a level-0 skill: one level, remainder discarded.
        assert!(manager.improve_skill(&character, "jiben-jianfa", 50));
        let entry = manager.ledger().get("jiben-jianfa").unwrap();
        assert_eq!(entry.level, 1);
        assert_eq!(entry.learned, 0);
    }

    #[test]
    fn test_martial_gate_blocks_improvement() {
        let mut manager = test_manager();
        let mut character = TestCharacter::new("Shen");
        manager
            .learn_skill(&character, "jiben-jianfa", "test")
            .unwrap();
        manager.ledger_mut().get_mut("jiben-jianfa").unwrap().level = 30;

        // Level 30 needs 30^3 / 10 = 2700 combat experience.
        character.set(attrs::COMBAT_EXP, 2699);
        assert!(!manager.improve_skill(&character, "jiben-jianfa", 5));
        assert_eq!(manager.ledger().get("jiben-jianfa").unwrap().learned, 0);

        character.set(attrs::COMBAT_EXP, 2700);
        assert!(!manager.improve_skill(&character, "jiben-jianfa", 5));
        assert_eq!(manager.ledger().get("jiben-jianfa").unwrap().learned, 5);
    }

    #[test]
    fn test_slot_exclusivity_on_remap() {
        let mut manager = test_manager();
        let character = lingyun_elder("Shen");
        manager
            .learn_skill(&character, "jiben-jianfa", "test")
            .unwrap();
        manager
            .learn_skill(&character, "lingyun-jian", "test")
            .unwrap();

        manager.map_skill(SlotType::Sword, Some("jiben-jianfa")).unwrap();
        manager.map_skill(SlotType::Sword, Some("lingyun-jian")).unwrap();

        let old = manager.ledger().get("jiben-jianfa").unwrap();
        assert!(!old.is_mapped);
        assert!(old.mapped_slot.is_none());
        let new = manager.ledger().get("lingyun-jian").unwrap();
        assert!(new.is_mapped);
        assert_eq!(new.mapped_slot, Some(SlotType::Sword));
        assert_eq!(manager.ledger().occupant(SlotType::Sword), Some("lingyun-jian"));
    }

    #[test]
    fn test_unmap_clears_occupant() {
        let mut manager = test_manager();
        let character = TestCharacter::new("Shen");
        manager
            .learn_skill(&character, "jiben-jianfa", "test")
            .unwrap();
        manager.map_skill(SlotType::Sword, Some("jiben-jianfa")).unwrap();

        manager.map_skill(SlotType::Sword, None).unwrap();
        assert!(manager.ledger().occupant(SlotType::Sword).is_none());
        assert!(!manager.ledger().get("jiben-jianfa").unwrap().is_mapped);
    }

    #[test]
    fn test_wrong_slot_rejected() {
        let mut manager = test_manager();
        let character = TestCharacter::new("Shen");
        manager
            .learn_skill(&character, "jiben-jianfa", "test")
            .unwrap();
        assert!(manager.map_skill(SlotType::Blade, Some("jiben-jianfa")).is_err());
        assert!(manager.map_skill(SlotType::Cognize, Some("jiben-jianfa")).is_err());
    }

    #[test]
    fn test_canon_skill_never_mappable() {
        let mut manager = test_manager();
        let character = lingyun_elder("Shen");
        manager
            .learn_skill(&character, "lingyun-xinfa", "test")
            .unwrap();
        for slot in SlotType::all() {
            assert!(manager.map_skill(*slot, Some("lingyun-xinfa")).is_err());
        }
    }

    #[test]
    fn test_single_active_force() {
        let mut manager = test_manager();
        let character = lingyun_elder("Shen");
        manager
            .learn_skill(&character, "jiben-neigong", "test")
            .unwrap();
        manager
            .learn_skill(&character, "qingxu-gong", "test")
            .unwrap();

        manager.activate_force("jiben-neigong").unwrap();
        manager.activate_force("qingxu-gong").unwrap();

        assert_eq!(manager.active_force(), Some("qingxu-gong"));
        assert!(!manager.ledger().get("jiben-neigong").unwrap().is_active_force);
        assert!(manager.ledger().get("qingxu-gong").unwrap().is_active_force);
    }

    #[test]
    fn test_activate_rejects_non_force() {
        let mut manager = test_manager();
        let character = TestCharacter::new("Shen");
        manager
            .learn_skill(&character, "jiben-jianfa", "test")
            .unwrap();
        assert!(manager.activate_force("jiben-jianfa").is_err());
        assert!(manager.activate_force("jiben-neigong").is_err());
    }

    #[test]
    fn test_bonus_summary_zero_when_unmapped() {
        let manager = test_manager();
        assert_eq!(manager.bonus_summary(), BonusSummary::default());
    }

    #[test]
    fn test_bonus_summary_mapped_plus_active_force() {
        let mut manager = test_manager();
        let character = TestCharacter::new("Shen");
        manager
            .learn_skill(&character, "jiben-jianfa", "test")
            .unwrap();
        manager
            .learn_skill(&character, "jiben-neigong", "test")
            .unwrap();
        manager.ledger_mut().get_mut("jiben-neigong").unwrap().level = 10;
        manager.map_skill(SlotType::Sword, Some("jiben-jianfa")).unwrap();
        manager.map_skill(SlotType::Force, Some("jiben-neigong")).unwrap();

        // Force mapped but not active: no resource contribution yet.
        let summary = manager.bonus_summary();
        assert!(summary.attack > 0);
        assert_eq!(summary.max_mp, 0);

        manager.activate_force("jiben-neigong").unwrap();
        let summary = manager.bonus_summary();
        assert!(summary.max_mp > 0);
    }

    #[test]
    fn test_death_penalty_spares_cognize() {
        let mut manager = test_manager();
        let character = lingyun_elder("Shen");
        manager
            .learn_skill(&character, "jiben-jianfa", "test")
            .unwrap();
        manager
            .learn_skill(&character, "lingyun-xinfa", "test")
            .unwrap();
        manager.ledger_mut().get_mut("jiben-jianfa").unwrap().level = 5;
        manager.ledger_mut().get_mut("lingyun-xinfa").unwrap().level = 5;

        manager.apply_death_penalty();

        assert_eq!(manager.ledger().get("jiben-jianfa").unwrap().level, 4);
        assert_eq!(manager.ledger().get("lingyun-xinfa").unwrap().level, 5);

        // The manager defers to each definition's penalty hook.
        let registry = manager.registry();
        assert_eq!(registry.get("jiben-jianfa").unwrap().on_death_penalty(5), 4);
        assert_eq!(registry.get("lingyun-xinfa").unwrap().on_death_penalty(5), 5);
    }

    #[test]
    fn test_death_penalty_floors_and_keeps_invariant() {
        let mut manager = test_manager();
        let character = TestCharacter::new("Shen");
        manager
            .learn_skill(&character, "jiben-jianfa", "test")
            .unwrap();
        {
            let entry = manager.ledger_mut().get_mut("jiben-jianfa").unwrap();
            entry.level = 3;
            entry.learned = 15; // above the level-2 cap of 9
        }

        manager.apply_death_penalty();
        let entry = manager.ledger().get("jiben-jianfa").unwrap();
        assert_eq!(entry.level, 2);
        assert!(entry.learned < learned_cap(entry.level));

        manager.apply_death_penalty();
        manager.apply_death_penalty();
        manager.apply_death_penalty();
        assert_eq!(manager.ledger().get("jiben-jianfa").unwrap().level, 0);
    }

    #[test]
    fn test_faction_expulsion_cripples_canon() {
        let mut manager = test_manager();
        let mut character = lingyun_elder("Shen");
        manager
            .learn_skill(&character, "lingyun-jian", "test")
            .unwrap();
        manager
            .learn_skill(&character, "qingxu-gong", "test")
            .unwrap();
        manager
            .learn_skill(&character, "lingyun-xinfa", "test")
            .unwrap();
        manager
            .learn_skill(&character, "jiben-jianfa", "test")
            .unwrap();
        manager.map_skill(SlotType::Sword, Some("lingyun-jian")).unwrap();
        manager.activate_force("qingxu-gong").unwrap();

        manager.remove_skills_by_faction(&mut character, "lingyun");

        // Non-canon faction skills are gone.
        assert!(!manager.ledger().contains("lingyun-jian"));
        assert!(!manager.ledger().contains("qingxu-gong"));
        assert!(manager.ledger().occupant(SlotType::Sword).is_none());
        assert!(manager.active_force().is_none());

        // The canon skill remains, locked and unmapped.
        let canon = manager.ledger().get("lingyun-xinfa").unwrap();
        assert!(canon.is_locked);
        assert!(!canon.is_mapped);
        assert!(character.get_flag(&crippled_flag("lingyun")));

        // Unaffiliated skills untouched.
        assert!(manager.ledger().contains("jiben-jianfa"));
    }

    #[test]
    fn test_crippled_canon_is_terminal() {
        let mut manager = test_manager();
        let mut character = lingyun_elder("Shen");
        manager
            .learn_skill(&character, "lingyun-xinfa", "test")
            .unwrap();
        manager.remove_skills_by_faction(&mut character, "lingyun");

        for slot in SlotType::all() {
            assert!(manager.map_skill(*slot, Some("lingyun-xinfa")).is_err());
        }
        let before = manager.ledger().get("lingyun-xinfa").unwrap().level;
        assert!(!manager.improve_skill(&character, "lingyun-xinfa", 100));
        assert_eq!(manager.ledger().get("lingyun-xinfa").unwrap().level, before);
    }

    #[test]
    fn test_panel_shape() {
        let mut manager = test_manager();
        let character = TestCharacter::new("Shen");
        manager
            .learn_skill(&character, "jiben-jianfa", "test")
            .unwrap();
        manager.map_skill(SlotType::Sword, Some("jiben-jianfa")).unwrap();

        let panel = manager.panel();
        assert_eq!(panel.skills.len(), 1);
        assert_eq!(panel.skills[0].skill_name, "Basic Sword");
        assert_eq!(panel.skills[0].learned_max, 1);
        assert_eq!(panel.slot_map.get(&SlotType::Sword).unwrap(), "jiben-jianfa");
        assert!(panel.active_force.is_none());

        // The panel ships to the UI as camelCase JSON.
        let value = serde_json::to_value(&panel).unwrap();
        assert_eq!(value["slotMap"]["sword"], "jiben-jianfa");
        assert_eq!(value["skills"][0]["skillName"], "Basic Sword");
    }
}
