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

//! Process-wide skill lookup
//!
//! Built once at bootstrap by the explicit `register` entry points in
//! [`crate::content`], then shared read-only (typically behind an `Arc`).
//! Append-only: there is no removal for the lifetime of the process.

use crate::skill::definition::SkillDefinition;
use std::collections::HashMap;
use wulin_common::SlotType;

/// Lookup table from skill id to its immutable definition.
#[derive(Debug, Default)]
pub struct SkillRegistry {
    skills: HashMap<&'static str, SkillDefinition>,
    /// Registration order, for deterministic iteration.
    order: Vec<&'static str>,
}

impl SkillRegistry {
    pub fn new() -> Self {
        Self {
            skills: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Insert a definition by id. A collision overwrites the earlier entry
    /// (last write wins) and is logged; registration order must therefore
    /// stay deterministic.
    pub fn register(&mut self, def: SkillDefinition) {
        if self.skills.contains_key(def.skill_id) {
            tracing::warn!(skill_id = def.skill_id, "duplicate skill registration, overwriting");
        } else {
            self.order.push(def.skill_id);
        }
        self.skills.insert(def.skill_id, def);
    }

    pub fn get(&self, skill_id: &str) -> Option<&SkillDefinition> {
        self.skills.get(skill_id)
    }

    /// All skills occupying `slot`, in registration order.
    pub fn get_by_slot(&self, slot: SlotType) -> Vec<&SkillDefinition> {
        self.iter().filter(|def| def.skill_type == slot).collect()
    }

    /// All skills belonging to `faction`, in registration order.
    pub fn get_by_faction(&self, faction: &str) -> Vec<&SkillDefinition> {
        self.iter()
            .filter(|def| def.faction == Some(faction))
            .collect()
    }

    /// The terminal canon skill of `faction`, if it has one.
    pub fn canon_of(&self, faction: &str) -> Option<&SkillDefinition> {
        self.iter()
            .find(|def| def.is_canon && def.faction == Some(faction))
    }

    /// Iterate definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &SkillDefinition> {
        self.order.iter().filter_map(|id| self.skills.get(id))
    }

    pub fn count(&self) -> usize {
        self.skills.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skill::definition::DantianType;

    #[test]
    fn test_register_and_get() {
        let mut registry = SkillRegistry::new();
        registry.register(SkillDefinition::martial(
            "jiben-jianfa",
            "Basic Sword",
            SlotType::Sword,
            None,
        ));
        registry.register(SkillDefinition::internal(
            "jiben-neigong",
            "Basic Force",
            DantianType::Lower,
        ));

        assert_eq!(registry.count(), 2);
        assert_eq!(registry.get("jiben-jianfa").unwrap().skill_name, "Basic Sword");
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_collision_last_write_wins() {
        let mut registry = SkillRegistry::new();
        registry.register(SkillDefinition::martial(
            "jiben-jianfa",
            "Basic Sword",
            SlotType::Sword,
            None,
        ));
        registry.register(SkillDefinition::martial(
            "jiben-jianfa",
            "Rewritten Sword",
            SlotType::Sword,
            None,
        ));

        assert_eq!(registry.count(), 1);
        assert_eq!(
            registry.get("jiben-jianfa").unwrap().skill_name,
            "Rewritten Sword"
        );
    }

    #[test]
    fn test_iteration_order_is_registration_order() {
        let mut registry = SkillRegistry::new();
        for id in ["c-skill", "a-skill", "b-skill"] {
            registry.register(SkillDefinition::support(
                Box::leak(id.to_string().into_boxed_str()),
                "Support",
            ));
        }
        let ids: Vec<_> = registry.iter().map(|def| def.skill_id).collect();
        assert_eq!(ids, vec!["c-skill", "a-skill", "b-skill"]);
    }

    #[test]
    fn test_slot_and_faction_filters() {
        let mut registry = SkillRegistry::new();
        registry.register(
            SkillDefinition::martial("lingyun-jian", "Lingyun Sword", SlotType::Sword, None)
                .with_faction("lingyun"),
        );
        registry.register(
            SkillDefinition::canon("lingyun-xinfa", "Lingyun Canon").with_faction("lingyun"),
        );
        registry.register(SkillDefinition::martial(
            "jiben-jianfa",
            "Basic Sword",
            SlotType::Sword,
            None,
        ));

        assert_eq!(registry.get_by_slot(SlotType::Sword).len(), 2);
        assert_eq!(registry.get_by_faction("lingyun").len(), 2);
        assert_eq!(
            registry.canon_of("lingyun").unwrap().skill_id,
            "lingyun-xinfa"
        );
        assert!(registry.canon_of("wudang").is_none());
    }
}
