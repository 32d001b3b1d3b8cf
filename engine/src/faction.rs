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

//! Faction rank ladders
//!
//! Faction membership and contribution bookkeeping live in the external
//! faction subsystem; unlock evaluation only needs to resolve a rank name
//! to its minimum-contribution floor.

use std::collections::HashMap;

/// Resolves rank names against a faction's ladder.
pub trait RankLadder: Send + Sync {
    /// Minimum contribution required to hold `rank` within `faction`.
    /// `None` when the faction or rank is unknown.
    fn rank_floor(&self, faction: &str, rank: &str) -> Option<i64>;
}

/// Table-backed ladder for the shipped factions.
#[derive(Debug, Default)]
pub struct StaticLadder {
    factions: HashMap<String, Vec<(String, i64)>>,
}

impl StaticLadder {
    pub fn new() -> Self {
        Self {
            factions: HashMap::new(),
        }
    }

    /// Ladder for every faction with registered skill content.
    pub fn with_defaults() -> Self {
        let mut ladder = Self::new();
        ladder.add_faction(
            "lingyun",
            &[
                ("disciple", 0),
                ("inner-disciple", 100),
                ("protector", 500),
                ("elder", 2000),
            ],
        );
        ladder
    }

    /// Register a faction's ladder, lowest rank first.
    pub fn add_faction(&mut self, faction: &str, ranks: &[(&str, i64)]) {
        self.factions.insert(
            faction.to_string(),
            ranks
                .iter()
                .map(|(name, floor)| (name.to_string(), *floor))
                .collect(),
        );
    }
}

impl RankLadder for StaticLadder {
    fn rank_floor(&self, faction: &str, rank: &str) -> Option<i64> {
        self.factions
            .get(faction)?
            .iter()
            .find(|(name, _)| name == rank)
            .map(|(_, floor)| *floor)
    }
}
