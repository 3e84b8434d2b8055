use rand::{rngs::StdRng, Rng, SeedableRng};
use shared::domain::NodeIndex;

/// Source of memory-game target sequences.
pub trait PatternSource: Send {
    fn generate(&mut self, node_count: u8, length: usize) -> Vec<NodeIndex>;
}

/// Uniform, independent draws from `0..node_count`.
pub struct RandomPattern {
    rng: StdRng,
}

impl RandomPattern {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl PatternSource for RandomPattern {
    fn generate(&mut self, node_count: u8, length: usize) -> Vec<NodeIndex> {
        let node_count = node_count.max(1);
        (0..length)
            .map(|_| NodeIndex(self.rng.random_range(0..node_count)))
            .collect()
    }
}

/// Replays one predetermined sequence every round.
pub struct FixedPattern(pub Vec<NodeIndex>);

impl FixedPattern {
    pub fn from_indices(indices: &[u8]) -> Self {
        Self(indices.iter().copied().map(NodeIndex).collect())
    }
}

impl PatternSource for FixedPattern {
    fn generate(&mut self, _node_count: u8, _length: usize) -> Vec<NodeIndex> {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_patterns_stay_on_the_board() {
        let mut source = RandomPattern::seeded(7);
        for _ in 0..200 {
            let pattern = source.generate(4, 4);
            assert_eq!(pattern.len(), 4);
            assert!(pattern.iter().all(|n| n.0 < 4));
        }
    }

    #[test]
    fn seeded_sources_are_reproducible() {
        let a = RandomPattern::seeded(42).generate(4, 8);
        let b = RandomPattern::seeded(42).generate(4, 8);
        assert_eq!(a, b);
    }

    #[test]
    fn every_node_is_eventually_drawn() {
        let mut source = RandomPattern::seeded(1);
        let mut seen = [false; 4];
        for node in source.generate(4, 256) {
            seen[node.0 as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
