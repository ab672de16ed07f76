//! The fixed set of quest premises a game can start with.

use branchtale_core::rng::DeterministicRng;

/// Quest descriptions, one of which is chosen at random on start.
pub const SCENARIOS: [&str; 3] = [
    "Turn a princess back from a frog.",
    "Find the key to the dragon's treasure room.",
    "Defeat the evil wizard at the forest's exit.",
];

/// Picks a scenario uniformly at random.
pub fn pick_scenario(rng: &mut dyn DeterministicRng) -> &'static str {
    SCENARIOS[rng.pick_index(SCENARIOS.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use branchtale_test_support::SequenceRng;

    #[test]
    fn test_pick_scenario_uses_rng_index() {
        let mut rng = SequenceRng::new(vec![2, 0]);

        assert_eq!(pick_scenario(&mut rng), SCENARIOS[2]);
        assert_eq!(pick_scenario(&mut rng), SCENARIOS[0]);
    }
}
