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

//! Unlock evaluation
//!
//! [`UnlockEvaluator::evaluate`] is the single code path deciding whether a
//! skill is locked, available, already learned, or crippled. Learning,
//! panel previews, and every other caller go through it; there is no
//! duplicated copy of the decision anywhere else.
//!
//! Checks run in a strict order and the first failure wins. The order is a
//! contract: a character below both the rank bar and an attribute bar must
//! always see `unlock_rank_required`, because rank is checked first.

use crate::character::{Character, attrs};
use crate::faction::RankLadder;
use crate::skill::definition::{PuzzleStep, SkillDefinition};
use crate::skill::ledger::SkillLedger;
use crate::skill::registry::SkillRegistry;

/// Verdict of one unlock evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockState {
    Locked,
    Available,
    /// Terminal informational state, not an error.
    Learned,
    /// Canon skill locked by faction expulsion. One-way.
    Crippled,
}

/// Stable reason codes shared with the client. The string forms are part
/// of the wire contract and must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockReason {
    InsufficientEnergy,
    InsufficientPotential,
    CannotImprove,
    InsufficientSilver,
    TeacherCapReached,
    RankRequired,
    AttrRequired,
    PreqSkillRequired,
    PuzzleCanjuRequired,
    PuzzleDuanjuRequired,
    PuzzleShiyanRequired,
    ChallengeRequired,
    CanonCrippled,
}

impl UnlockReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnlockReason::InsufficientEnergy => "insufficient_energy",
            UnlockReason::InsufficientPotential => "insufficient_potential",
            UnlockReason::CannotImprove => "cannot_improve",
            UnlockReason::InsufficientSilver => "insufficient_silver",
            UnlockReason::TeacherCapReached => "teacher_cap_reached",
            UnlockReason::RankRequired => "unlock_rank_required",
            UnlockReason::AttrRequired => "unlock_attr_required",
            UnlockReason::PreqSkillRequired => "unlock_preq_skill_required",
            UnlockReason::PuzzleCanjuRequired => "unlock_puzzle_canju_required",
            UnlockReason::PuzzleDuanjuRequired => "unlock_puzzle_duanju_required",
            UnlockReason::PuzzleShiyanRequired => "unlock_puzzle_shiyan_required",
            UnlockReason::ChallengeRequired => "unlock_challenge_required",
            UnlockReason::CanonCrippled => "canon_crippled",
        }
    }

    fn for_puzzle(step: PuzzleStep) -> UnlockReason {
        match step {
            PuzzleStep::Canju => UnlockReason::PuzzleCanjuRequired,
            PuzzleStep::Duanju => UnlockReason::PuzzleDuanjuRequired,
            PuzzleStep::Shiyan => UnlockReason::PuzzleShiyanRequired,
        }
    }
}

/// Result of one evaluation: state, stable reason code (only when locked or
/// crippled), and display text.
#[derive(Debug, Clone)]
pub struct UnlockResult {
    pub state: UnlockState,
    pub reason: Option<UnlockReason>,
    pub message: String,
}

impl UnlockResult {
    fn locked(reason: UnlockReason, message: impl Into<String>) -> Self {
        Self {
            state: UnlockState::Locked,
            reason: Some(reason),
            message: message.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.state == UnlockState::Available
    }
}

/// Character flag marking a faction's canon skill crippled.
pub fn crippled_flag(faction: &str) -> String {
    format!("{}_canon_crippled", faction)
}

/// Character flag marking a one-off challenge complete.
pub fn challenge_flag(challenge: &str) -> String {
    format!("challenge_{}", challenge)
}

/// Pure decision function over a character's runtime state and a skill's
/// declared unlock rules.
pub struct UnlockEvaluator<'a> {
    registry: &'a SkillRegistry,
    ladder: &'a dyn RankLadder,
}

impl<'a> UnlockEvaluator<'a> {
    pub fn new(registry: &'a SkillRegistry, ladder: &'a dyn RankLadder) -> Self {
        Self { registry, ladder }
    }

    /// Evaluate `skill_id` for `character`. Unknown skills resolve to a
    /// soft locked result, never a panic.
    pub fn evaluate(
        &self,
        character: &dyn Character,
        ledger: &SkillLedger,
        skill_id: &str,
    ) -> UnlockResult {
        let Some(def) = self.registry.get(skill_id) else {
            return UnlockResult {
                state: UnlockState::Locked,
                reason: None,
                message: "You know of no such art.".to_string(),
            };
        };

        // 1. Faction membership, before everything else.
        if let Some(required) = def.faction {
            if character.faction().as_deref() != Some(required) {
                return UnlockResult::locked(
                    UnlockReason::RankRequired,
                    format!("{} is taught only within its sect.", def.skill_name),
                );
            }

            // 2. Crippled short-circuit, before the learned check.
            if def.is_canon
                && (character.get_flag(&crippled_flag(required))
                    || ledger.get(skill_id).is_some_and(|entry| entry.is_locked))
            {
                return UnlockResult {
                    state: UnlockState::Crippled,
                    reason: Some(UnlockReason::CanonCrippled),
                    message: format!(
                        "Your {} was crippled when you left the sect; it can never recover.",
                        def.skill_name
                    ),
                };
            }
        }

        // 3. Already learned.
        if ledger.contains(skill_id) {
            return UnlockResult {
                state: UnlockState::Learned,
                reason: None,
                message: format!("You have already learned {}.", def.skill_name),
            };
        }

        if let Some(rules) = &def.unlock {
            if let Some(result) = self.check_rules(character, ledger, def, rules) {
                return result;
            }
        }

        UnlockResult {
            state: UnlockState::Available,
            reason: None,
            message: format!("You are ready to learn {}.", def.skill_name),
        }
    }

    /// Steps 4-8, in declaration order within each rule kind.
    fn check_rules(
        &self,
        character: &dyn Character,
        ledger: &SkillLedger,
        def: &SkillDefinition,
        rules: &crate::skill::definition::UnlockRules,
    ) -> Option<UnlockResult> {
        // 4. Rank threshold.
        if let Some(rank) = rules.min_rank {
            let faction = def.faction.unwrap_or_default();
            let floor = self.ladder.rank_floor(faction, rank);
            let contribution = character.get(attrs::CONTRIBUTION);
            if floor.is_none_or(|floor| contribution < floor) {
                return Some(UnlockResult::locked(
                    UnlockReason::RankRequired,
                    format!("{} is reserved for the rank of {}.", def.skill_name, rank),
                ));
            }
        }

        // 5. Attribute thresholds.
        for (attr, threshold) in &rules.min_attrs {
            if character.get(attr) < *threshold {
                return Some(UnlockResult::locked(
                    UnlockReason::AttrRequired,
                    format!(
                        "Your {} is not yet strong enough to learn {}.",
                        attr, def.skill_name
                    ),
                ));
            }
        }

        // 6. Prerequisite skill levels; not learned counts as level 0.
        for (pre_skill, min_level) in &rules.pre_skills {
            if ledger.level_of(pre_skill) < *min_level {
                let pre_name = self
                    .registry
                    .get(pre_skill)
                    .map(|pre| pre.skill_name)
                    .unwrap_or(pre_skill);
                return Some(UnlockResult::locked(
                    UnlockReason::PreqSkillRequired,
                    format!(
                        "You must first master {} (level {}) before learning {}.",
                        pre_name, min_level, def.skill_name
                    ),
                ));
            }
        }

        // 7. Narrative puzzle steps, each with a step-specific reason.
        let faction = def.faction.unwrap_or_default();
        for step in &rules.puzzle {
            if !character.get_flag(&step.flag_key(faction)) {
                return Some(UnlockResult::locked(
                    UnlockReason::for_puzzle(*step),
                    format!(
                        "The secret of {} eludes you; the {} puzzle remains unsolved.",
                        def.skill_name,
                        step.as_str()
                    ),
                ));
            }
        }

        // 8. One-off challenge flags.
        for challenge in &rules.challenges {
            if !character.get_flag(&challenge_flag(challenge)) {
                return Some(UnlockResult::locked(
                    UnlockReason::ChallengeRequired,
                    format!(
                        "You have not yet proven yourself worthy of {}.",
                        def.skill_name
                    ),
                ));
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::faction::StaticLadder;
    use crate::skill::ledger::SkillLedger;
    use crate::test_utils::{TestCharacter, lingyun_member};
    use wulin_common::SlotType;

    fn registry() -> SkillRegistry {
        crate::bootstrap_skills()
    }

    fn evaluate(character: &TestCharacter, ledger: &SkillLedger, skill_id: &str) -> UnlockResult {
        let registry = registry();
        let ladder = StaticLadder::with_defaults();
        let evaluator = UnlockEvaluator::new(&registry, &ladder);
        evaluator.evaluate(character, ledger, skill_id)
    }

    #[test]
    fn test_unknown_skill_soft_locked() {
        let character = TestCharacter::new("Shen");
        let result = evaluate(&character, &SkillLedger::new(), "no-such-art");
        assert_eq!(result.state, UnlockState::Locked);
        assert!(result.reason.is_none());
    }

    #[test]
    fn test_wrong_faction_always_rank_required() {
        let mut character = TestCharacter::new("Shen");
        character.set_faction(Some("wudang"));
        // Attributes sky high; faction still wins.
        character.set(attrs::PERCEPTION, 999);
        let result = evaluate(&character, &SkillLedger::new(), "lingyun-jian");
        assert_eq!(result.state, UnlockState::Locked);
        assert_eq!(result.reason, Some(UnlockReason::RankRequired));
    }

    #[test]
    fn test_rank_checked_before_attributes() {
        // Below both the rank bar and the attribute bar: rank must win.
        let mut character = lingyun_member("Shen");
        character.set(attrs::CONTRIBUTION, 0);
        character.set(attrs::AGILITY, 0);
        let mut ledger = SkillLedger::new();
        ledger.learn("lingyun-jian", SlotType::Sword, 40);

        let result = evaluate(&character, &ledger, "bihai-jianfa");
        assert_eq!(result.reason, Some(UnlockReason::RankRequired));
    }

    #[test]
    fn test_attributes_checked_before_prerequisites() {
        let mut character = lingyun_member("Shen");
        character.set(attrs::CONTRIBUTION, 100);
        character.set(attrs::AGILITY, 0);
        // Prerequisite missing too; attribute failure must win.
        let result = evaluate(&character, &SkillLedger::new(), "bihai-jianfa");
        assert_eq!(result.reason, Some(UnlockReason::AttrRequired));
    }

    #[test]
    fn test_prerequisite_failure_includes_unlearned() {
        let mut character = lingyun_member("Shen");
        character.set(attrs::CONTRIBUTION, 100);
        character.set(attrs::AGILITY, 99);
        let result = evaluate(&character, &SkillLedger::new(), "bihai-jianfa");
        assert_eq!(result.reason, Some(UnlockReason::PreqSkillRequired));
    }

    #[test]
    fn test_puzzle_steps_fail_in_declaration_order() {
        let mut character = lingyun_member("Shen");
        character.set(attrs::CONTRIBUTION, 5000);
        character.set(attrs::PERCEPTION, 99);
        character.set(attrs::AGILITY, 99);
        let mut ledger = SkillLedger::new();
        ledger.learn("bihai-jianfa", SlotType::Sword, 90);
        ledger.learn("zixia-shengong", SlotType::Force, 70);

        let result = evaluate(&character, &ledger, "wuming-jianfa");
        assert_eq!(result.reason, Some(UnlockReason::PuzzleCanjuRequired));

        character.set_flag(&PuzzleStep::Canju.flag_key("lingyun"), true);
        let result = evaluate(&character, &ledger, "wuming-jianfa");
        assert_eq!(result.reason, Some(UnlockReason::PuzzleDuanjuRequired));

        character.set_flag(&PuzzleStep::Duanju.flag_key("lingyun"), true);
        let result = evaluate(&character, &ledger, "wuming-jianfa");
        assert_eq!(result.reason, Some(UnlockReason::PuzzleShiyanRequired));

        character.set_flag(&PuzzleStep::Shiyan.flag_key("lingyun"), true);
        let result = evaluate(&character, &ledger, "wuming-jianfa");
        assert_eq!(result.reason, Some(UnlockReason::ChallengeRequired));

        character.set_flag(&challenge_flag("jianzhong-trial"), true);
        let result = evaluate(&character, &ledger, "wuming-jianfa");
        assert_eq!(result.state, UnlockState::Available);
    }

    #[test]
    fn test_learned_is_informational() {
        let character = lingyun_member("Shen");
        let mut ledger = SkillLedger::new();
        ledger.learn("lingyun-jian", SlotType::Sword, 3);
        let result = evaluate(&character, &ledger, "lingyun-jian");
        assert_eq!(result.state, UnlockState::Learned);
        assert!(result.reason.is_none());
    }

    #[test]
    fn test_crippled_beats_learned() {
        let mut character = lingyun_member("Shen");
        let mut ledger = SkillLedger::new();
        ledger.learn("lingyun-xinfa", SlotType::Cognize, 10);
        character.set_flag(&crippled_flag("lingyun"), true);

        let result = evaluate(&character, &ledger, "lingyun-xinfa");
        assert_eq!(result.state, UnlockState::Crippled);
        assert_eq!(result.reason, Some(UnlockReason::CanonCrippled));
        assert_eq!(result.reason.unwrap().as_str(), "canon_crippled");
    }

    #[test]
    fn test_reason_codes_are_stable() {
        assert_eq!(UnlockReason::RankRequired.as_str(), "unlock_rank_required");
        assert_eq!(UnlockReason::AttrRequired.as_str(), "unlock_attr_required");
        assert_eq!(
            UnlockReason::PreqSkillRequired.as_str(),
            "unlock_preq_skill_required"
        );
        assert_eq!(
            UnlockReason::PuzzleCanjuRequired.as_str(),
            "unlock_puzzle_canju_required"
        );
        assert_eq!(
            UnlockReason::ChallengeRequired.as_str(),
            "unlock_challenge_required"
        );
        assert_eq!(UnlockReason::TeacherCapReached.as_str(), "teacher_cap_reached");
    }
}
