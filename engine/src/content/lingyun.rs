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

//! The Lingyun Sect skill tree
//!
//! The reference faction: a full ladder from the entry sword art up to the
//! nameless sword behind the three-step puzzle, two rival force skills that
//! cannot coexist, and the sect canon that is crippled rather than removed
//! when a member is expelled.

use crate::skill::definition::{
    DantianType, PuzzleStep, ResourceBonus, SkillAction, SkillDefinition, UnlockRules, WeaponType,
};
use crate::skill::registry::SkillRegistry;
use wulin_common::{BonusSummary, SlotType};

pub const FACTION: &str = "lingyun";

fn zixia_resources(level: i32) -> ResourceBonus {
    ResourceBonus {
        max_hp: level * 3,
        max_mp: level * 5,
    }
}

fn guiyuan_resources(level: i32) -> ResourceBonus {
    ResourceBonus {
        max_hp: level * 5,
        max_mp: level * 4,
    }
}

fn taixu_attributes(level: i32) -> Vec<(&'static str, i64)> {
    vec![(crate::character::attrs::PERCEPTION, i64::from(level / 10))]
}

pub fn register(registry: &mut SkillRegistry) {
    // Entry sword art, taught to every disciple.
    registry.register(
        SkillDefinition::martial(
            "lingyun-jian",
            "Lingyun Sword",
            SlotType::Sword,
            Some(WeaponType::Sword),
        )
        .with_faction(FACTION)
        .with_unlock(UnlockRules {
            min_rank: Some("disciple"),
            ..Default::default()
        })
        .with_sub_skills(vec!["jiben-jianfa"])
        .with_actions(vec![
            SkillAction {
                name: "lingyun-chu",
                unlock_level: 0,
                energy_cost: 5,
                modifiers: BonusSummary {
                    attack: 10,
                    hit_rate: 4,
                    ..Default::default()
                },
            },
            SkillAction {
                name: "yunduan-luoyan",
                unlock_level: 30,
                energy_cost: 15,
                modifiers: BonusSummary {
                    attack: 25,
                    hit_rate: 8,
                    crit_rate: 3,
                    ..Default::default()
                },
            },
        ]),
    );

    registry.register(
        SkillDefinition::martial(
            "bihai-jianfa",
            "Azure Sea Sword",
            SlotType::Sword,
            Some(WeaponType::Sword),
        )
        .with_faction(FACTION)
        .with_unlock(UnlockRules {
            min_rank: Some("inner-disciple"),
            min_attrs: vec![(crate::character::attrs::AGILITY, 20)],
            pre_skills: vec![("lingyun-jian", 30)],
            ..Default::default()
        })
        .with_sub_skills(vec!["lingyun-jian"])
        .with_actions(vec![
            SkillAction {
                name: "bihai-chaosheng",
                unlock_level: 0,
                energy_cost: 10,
                modifiers: BonusSummary {
                    attack: 30,
                    hit_rate: 10,
                    ..Default::default()
                },
            },
            SkillAction {
                name: "canglang-juanxue",
                unlock_level: 50,
                energy_cost: 25,
                modifiers: BonusSummary {
                    attack: 55,
                    hit_rate: 14,
                    crit_rate: 6,
                    ..Default::default()
                },
            },
        ]),
    );

    // The sect's hidden pinnacle. All three puzzle steps, then the trial.
    registry.register(
        SkillDefinition::martial(
            "wuming-jianfa",
            "Nameless Sword",
            SlotType::Sword,
            Some(WeaponType::Sword),
        )
        .with_faction(FACTION)
        .with_unlock(UnlockRules {
            min_rank: Some("elder"),
            min_attrs: vec![
                (crate::character::attrs::PERCEPTION, 30),
                (crate::character::attrs::AGILITY, 30),
            ],
            pre_skills: vec![("bihai-jianfa", 80), ("zixia-shengong", 60)],
            puzzle: vec![PuzzleStep::Canju, PuzzleStep::Duanju, PuzzleStep::Shiyan],
            challenges: vec!["jianzhong-trial"],
        })
        .with_sub_skills(vec!["bihai-jianfa"])
        .with_actions(vec![SkillAction {
            name: "wuming-wushi",
            unlock_level: 0,
            energy_cost: 40,
            modifiers: BonusSummary {
                attack: 90,
                hit_rate: 20,
                crit_rate: 12,
                ..Default::default()
            },
        }]),
    );

    registry.register(
        SkillDefinition::martial("liuyun-shenfa", "Drifting Cloud Steps", SlotType::Dodge, None)
            .with_faction(FACTION)
            .with_unlock(UnlockRules {
                min_rank: Some("disciple"),
                ..Default::default()
            })
            .with_actions(vec![SkillAction {
                name: "liuyun-huanying",
                unlock_level: 0,
                energy_cost: 8,
                modifiers: BonusSummary {
                    dodge: 15,
                    ..Default::default()
                },
            }]),
    );

    registry.register(
        SkillDefinition::martial("jianxin-jue", "Sword Heart Parry", SlotType::Parry, None)
            .with_faction(FACTION)
            .with_unlock(UnlockRules {
                min_rank: Some("disciple"),
                pre_skills: vec![("lingyun-jian", 10)],
                ..Default::default()
            })
            .with_actions(vec![SkillAction {
                name: "jianxin-gedang",
                unlock_level: 0,
                energy_cost: 6,
                modifiers: BonusSummary {
                    parry: 12,
                    defense: 5,
                    ..Default::default()
                },
            }]),
    );

    registry.register(
        SkillDefinition::martial(
            "cangsong-gun",
            "Old Pine Staff",
            SlotType::Staff,
            Some(WeaponType::Staff),
        )
        .with_faction(FACTION)
        .with_unlock(UnlockRules {
            min_rank: Some("disciple"),
            min_attrs: vec![(crate::character::attrs::STRENGTH, 15)],
            ..Default::default()
        })
        .with_actions(vec![SkillAction {
            name: "cangsong-yingke",
            unlock_level: 0,
            energy_cost: 8,
            modifiers: BonusSummary {
                attack: 12,
                defense: 4,
                ..Default::default()
            },
        }]),
    );

    registry.register(
        SkillDefinition::martial(
            "hanxing-zhen",
            "Cold Star Needles",
            SlotType::Throwing,
            Some(WeaponType::Throwing),
        )
        .with_faction(FACTION)
        .with_unlock(UnlockRules {
            min_rank: Some("inner-disciple"),
            min_attrs: vec![(crate::character::attrs::AGILITY, 25)],
            ..Default::default()
        })
        .with_actions(vec![SkillAction {
            name: "hanxing-sanlian",
            unlock_level: 0,
            energy_cost: 12,
            modifiers: BonusSummary {
                attack: 18,
                hit_rate: 12,
                ..Default::default()
            },
        }]),
    );

    registry.register(
        SkillDefinition::martial("tianhe-zhang", "Celestial River Palm", SlotType::Unarmed, None)
            .with_faction(FACTION)
            .with_unlock(UnlockRules {
                min_rank: Some("inner-disciple"),
                pre_skills: vec![("qingxu-gong", 20)],
                ..Default::default()
            })
            .with_actions(vec![SkillAction {
                name: "tianhe-daoxuan",
                unlock_level: 0,
                energy_cost: 14,
                modifiers: BonusSummary {
                    attack: 22,
                    defense: 6,
                    ..Default::default()
                },
            }]),
    );

    // Entry force, prerequisite for the palm art.
    registry.register(
        SkillDefinition::internal("qingxu-gong", "Clear Void Force", DantianType::Lower)
            .with_faction(FACTION)
            .with_unlock(UnlockRules {
                min_rank: Some("disciple"),
                ..Default::default()
            })
            .with_resource_bonus(|level| ResourceBonus {
                max_hp: level * 2,
                max_mp: level * 4,
            }),
    );

    // The two advanced forces are rival lineages; a body can hold only one.
    registry.register(
        SkillDefinition::internal("zixia-shengong", "Purple Mist Force", DantianType::Middle)
            .with_faction(FACTION)
            .with_unlock(UnlockRules {
                min_rank: Some("protector"),
                pre_skills: vec![("qingxu-gong", 40)],
                ..Default::default()
            })
            .with_conflicts(vec!["guiyuan-shengong"])
            .with_exert_effects(vec!["shield"])
            .with_resource_bonus(zixia_resources),
    );

    registry.register(
        SkillDefinition::internal("guiyuan-shengong", "Returning Origin Force", DantianType::Upper)
            .with_faction(FACTION)
            .with_unlock(UnlockRules {
                min_rank: Some("protector"),
                pre_skills: vec![("qingxu-gong", 40)],
                challenges: vec!["guiyuan-cave"],
                ..Default::default()
            })
            .with_conflicts(vec!["zixia-shengong"])
            .with_exert_effects(vec!["shield", "jianqi"])
            .with_resource_bonus(guiyuan_resources),
    );

    registry.register(
        SkillDefinition::support("taixu-xinfa", "Great Void Method")
            .with_faction(FACTION)
            .with_unlock(UnlockRules {
                min_rank: Some("inner-disciple"),
                ..Default::default()
            })
            .with_attribute_bonus(taixu_attributes),
    );

    // The sect canon. Crippled, never removed, on expulsion.
    registry.register(
        SkillDefinition::canon("lingyun-xinfa", "Lingyun Canon")
            .with_faction(FACTION)
            .with_unlock(UnlockRules {
                min_rank: Some("protector"),
                ..Default::default()
            }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SkillRegistry {
        let mut registry = SkillRegistry::new();
        register(&mut registry);
        registry
    }

    #[test]
    fn test_tree_size_and_canon() {
        let registry = registry();
        assert_eq!(registry.count(), 13);
        let canon = registry.canon_of(FACTION).unwrap();
        assert_eq!(canon.skill_id, "lingyun-xinfa");
        for def in registry.iter() {
            assert_eq!(def.faction, Some(FACTION));
        }
    }

    #[test]
    fn test_rival_forces_conflict_both_ways() {
        let registry = registry();
        let zixia = registry.get("zixia-shengong").unwrap();
        let guiyuan = registry.get("guiyuan-shengong").unwrap();
        assert!(zixia.conflicts.contains(&"guiyuan-shengong"));
        assert!(guiyuan.conflicts.contains(&"zixia-shengong"));
    }

    #[test]
    fn test_nameless_sword_puzzle_declaration_order() {
        let registry = registry();
        let rules = registry.get("wuming-jianfa").unwrap().unlock.as_ref().unwrap();
        assert_eq!(
            rules.puzzle,
            vec![PuzzleStep::Canju, PuzzleStep::Duanju, PuzzleStep::Shiyan]
        );
        assert_eq!(rules.challenges, vec!["jianzhong-trial"]);
    }

    #[test]
    fn test_exert_opt_ins() {
        let registry = registry();
        assert_eq!(
            registry.get("zixia-shengong").unwrap().exert_effects,
            vec!["shield"]
        );
        assert_eq!(
            registry.get("guiyuan-shengong").unwrap().exert_effects,
            vec!["shield", "jianqi"]
        );
        assert!(registry.get("qingxu-gong").unwrap().exert_effects.is_empty());
    }
}
