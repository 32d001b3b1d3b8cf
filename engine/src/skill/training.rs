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

//! Training batches
//!
//! Research, tutoring, and practice all share the same round-by-round
//! shape: a requested count, a per-round resource cost, and a stop on the
//! first round whose precondition fails. Completed rounds are never rolled
//! back; a batch that stops early reports how far it got and why.

use crate::character::{Character, attrs, drain};
use crate::skill::manager::SkillManager;
use crate::skill::unlock::UnlockReason;
use std::collections::HashMap;
use wulin_common::LearnResult;

/// An NPC teacher: the skills it teaches, the level it teaches each up to,
/// and its per-round fee in silver.
#[derive(Debug, Clone)]
pub struct TeacherProfile {
    pub name: String,
    /// Skill id to the highest level this teacher can raise it to.
    pub skills: HashMap<String, i32>,
    /// Silver charged per completed round.
    pub fee: i64,
}

/// Why a batch stopped before completing every requested round.
enum Stop {
    Reason(UnlockReason, String),
    Message(String),
}

impl SkillManager {
    /// Self-study from a manual. Each round costs energy scaled down by
    /// perception and draws one point from the potential pool. A round runs
    /// as long as any energy remains; a final round may exhaust it. Only a
    /// first round that yields nothing refunds its charge.
    pub fn research(
        &mut self,
        character: &mut dyn Character,
        skill_id: &str,
        times: u32,
    ) -> LearnResult {
        let cost = self.research_cost(character);
        let mut first_round = true;
        self.run_batch(character, skill_id, times, "study the manual", move |manager, character| {
            if !manager.can_improve(character, skill_id) {
                return Err(Stop::Reason(
                    UnlockReason::CannotImprove,
                    "You can learn nothing more from this.".to_string(),
                ));
            }
            if character.get(attrs::ENERGY) <= 0 {
                return Err(Stop::Reason(
                    UnlockReason::InsufficientEnergy,
                    "You are too exhausted to keep studying.".to_string(),
                ));
            }
            let before = character.get(attrs::ENERGY);
            drain(character, attrs::ENERGY, cost);
            let budget =
                (character.get(attrs::POTENTIAL) - character.get(attrs::LEARNED_POINTS)).max(0);
            if budget <= 0 {
                // A batch that achieves nothing must not charge; a
                // later-round failure keeps the charge of the failed attempt.
                if first_round {
                    character.set(attrs::ENERGY, before);
                }
                return Err(Stop::Reason(
                    UnlockReason::InsufficientPotential,
                    "Your potential is spent; no insight comes.".to_string(),
                ));
            }
            first_round = false;
            let spent = character.get(attrs::LEARNED_POINTS);
            character.set(attrs::LEARNED_POINTS, spent + 1);
            Ok(())
        })
    }

    /// Energy cost of one research round, reduced by perception and floored.
    pub fn research_cost(&self, character: &dyn Character) -> i64 {
        let perception = character.get(attrs::PERCEPTION).max(1);
        (self.config().research_base_cost / perception).max(self.config().research_min_cost)
    }

    /// Learn under an NPC teacher. Each round costs the teacher's fee in
    /// silver, and the teacher cannot raise a skill past its own cap.
    pub fn learn_from_teacher(
        &mut self,
        character: &mut dyn Character,
        teacher: &TeacherProfile,
        skill_id: &str,
        times: u32,
    ) -> LearnResult {
        let Some(cap) = teacher.skills.get(skill_id).copied() else {
            let message = format!("{} does not teach that art.", teacher.name);
            return self.batch_result(skill_id, 0, times, false, Err(Stop::Message(message)));
        };
        let fee = teacher.fee;
        let teacher_name = teacher.name.clone();
        self.run_batch(character, skill_id, times, "train under the master", move |manager, character| {
            let level = manager.ledger().level_of(skill_id);
            if level >= cap {
                return Err(Stop::Reason(
                    UnlockReason::TeacherCapReached,
                    format!("{} has nothing more to teach you.", teacher_name),
                ));
            }
            if !manager.can_improve(character, skill_id) {
                return Err(Stop::Reason(
                    UnlockReason::CannotImprove,
                    "You can learn nothing more from this.".to_string(),
                ));
            }
            if character.get(attrs::SILVER) < fee {
                return Err(Stop::Reason(
                    UnlockReason::InsufficientSilver,
                    "You cannot afford another lesson.".to_string(),
                ));
            }
            drain(character, attrs::SILVER, fee);
            Ok(())
        })
    }

    /// Repetition drills. Each round costs energy per the skill's practice
    /// cost; no potential is drawn.
    pub fn practice(
        &mut self,
        character: &mut dyn Character,
        skill_id: &str,
        times: u32,
    ) -> LearnResult {
        let cost = self
            .registry()
            .get(skill_id)
            .map(|def| def.practice_cost(character, self.config()));
        self.run_batch(character, skill_id, times, "drill the forms", move |manager, character| {
            if !manager.can_improve(character, skill_id) {
                return Err(Stop::Reason(
                    UnlockReason::CannotImprove,
                    "You can learn nothing more from this.".to_string(),
                ));
            }
            let cost = cost.unwrap_or(i64::MAX);
            if character.get(attrs::ENERGY) < cost {
                return Err(Stop::Reason(
                    UnlockReason::InsufficientEnergy,
                    "You are too exhausted to keep drilling.".to_string(),
                ));
            }
            drain(character, attrs::ENERGY, cost);
            Ok(())
        })
    }

    /// Incidental advancement from using a skill (combat hits, exert use).
    /// One point at the configured chance; returns whether it landed.
    pub fn weak_improve(&mut self, character: &dyn Character, skill_id: &str) -> bool {
        if !self.can_improve(character, skill_id) {
            return false;
        }
        if rand::random::<f64>() >= self.config().weak_improve_chance {
            return false;
        }
        self.improve_skill(character, skill_id, 1);
        true
    }

    /// Shared batch loop. Runs up to `times` rounds, stopping on the first
    /// failed precondition; each completed round grants one learned point.
    fn run_batch(
        &mut self,
        character: &mut dyn Character,
        skill_id: &str,
        times: u32,
        verb: &str,
        mut round: impl FnMut(&mut SkillManager, &mut dyn Character) -> Result<(), Stop>,
    ) -> LearnResult {
        if !self.ledger().contains(skill_id) {
            let name = self.skill_name(skill_id);
            return self.batch_result(
                skill_id,
                0,
                times,
                false,
                Err(Stop::Message(format!("You have not learned {}.", name))),
            );
        }

        let mut completed = 0;
        let mut level_up = false;
        let mut stop = None;
        for _ in 0..times {
            match round(self, character) {
                Ok(()) => {
                    level_up |= self.improve_skill(character, skill_id, 1);
                    completed += 1;
                }
                Err(cause) => {
                    stop = Some(cause);
                    break;
                }
            }
        }

        let outcome = match stop {
            Some(cause) => Err(cause),
            None => Ok(format!("You {}.", verb)),
        };
        self.batch_result(skill_id, completed, times, level_up, outcome)
    }

    fn skill_name(&self, skill_id: &str) -> String {
        self.registry()
            .get(skill_id)
            .map(|def| def.skill_name.to_string())
            .unwrap_or_else(|| skill_id.to_string())
    }

    fn batch_result(
        &self,
        skill_id: &str,
        completed: u32,
        requested: u32,
        level_up: bool,
        outcome: Result<String, Stop>,
    ) -> LearnResult {
        let (level, learned, learned_max) = self
            .ledger()
            .get(skill_id)
            .map(|entry| (entry.level, entry.learned, entry.learned_max()))
            .unwrap_or((0, 0, 1));
        let (message, reason) = match outcome {
            Ok(message) => (message, None),
            Err(Stop::Reason(reason, message)) => (message, Some(reason.as_str().to_string())),
            Err(Stop::Message(message)) => (message, None),
        };
        LearnResult {
            success: completed > 0,
            skill_id: skill_id.to_string(),
            skill_name: self.skill_name(skill_id),
            times_completed: completed,
            times_requested: requested,
            current_level: level,
            learned,
            learned_max,
            level_up,
            message,
            reason,
        }
    }
}
