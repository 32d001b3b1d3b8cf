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

//! Shared basics taught outside any faction
//!
//! No unlock rules: any character can pick these up from a drill master or
//! a cheap manual. They exist so a fresh character has something to map
//! into each core slot before joining a sect.

use crate::skill::definition::{DantianType, ResourceBonus, SkillAction, SkillDefinition, WeaponType};
use crate::skill::registry::SkillRegistry;
use wulin_common::{BonusSummary, SlotType};

fn basic_force_resources(level: i32) -> ResourceBonus {
    ResourceBonus {
        max_hp: level * 2,
        max_mp: level * 3,
    }
}

pub fn register(registry: &mut SkillRegistry) {
    registry.register(
        SkillDefinition::martial(
            "jiben-jianfa",
            "Basic Sword",
            SlotType::Sword,
            Some(WeaponType::Sword),
        )
        .with_actions(vec![
            SkillAction {
                name: "ci",
                unlock_level: 0,
                energy_cost: 0,
                modifiers: BonusSummary {
                    attack: 5,
                    hit_rate: 2,
                    ..Default::default()
                },
            },
            SkillAction {
                name: "hui",
                unlock_level: 20,
                energy_cost: 10,
                modifiers: BonusSummary {
                    attack: 14,
                    hit_rate: 5,
                    ..Default::default()
                },
            },
        ]),
    );

    registry.register(
        SkillDefinition::martial("jiben-qinggong", "Basic Lightness", SlotType::Dodge, None)
            .with_actions(vec![SkillAction {
                name: "shanshen",
                unlock_level: 0,
                energy_cost: 0,
                modifiers: BonusSummary {
                    dodge: 6,
                    ..Default::default()
                },
            }]),
    );

    registry.register(
        SkillDefinition::internal("jiben-neigong", "Basic Force", DantianType::Lower)
            .with_resource_bonus(basic_force_resources),
    );

    // Innate aptitude. Never improvable, never lost to death.
    registry.register(SkillDefinition::cognize("genggu", "Root Aptitude"));
}
