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

//! Skill taxonomy, registry, unlock evaluation, and the per-character ledger
//!
//! ## Leveling arithmetic
//! A skill at level `L` advances to `L + 1` the instant its in-level
//! experience reaches `(L + 1)^2`; the counter resets to exactly 0 and any
//! overflow is discarded. Martial skills additionally gate each level behind
//! lifetime combat experience on a cubic curve, `combat_exp >= L^3 / divisor`.

pub mod definition;
pub mod ledger;
pub mod manager;
pub mod registry;
pub mod training;
pub mod unlock;

/// In-level experience required to advance out of `level`.
pub fn learned_cap(level: i32) -> i32 {
    (level + 1).pow(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_learned_cap_is_quadratic() {
        assert_eq!(learned_cap(0), 1);
        assert_eq!(learned_cap(1), 4);
        assert_eq!(learned_cap(9), 100);
    }
}
