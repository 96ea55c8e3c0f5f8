//! Chain scoring: chain, connection and colour bonuses.

use crate::board::Group;
use crate::puyo::PuyoColor;
use std::collections::HashSet;

/// Colour bonus indexed by distinct colour count (1..=5).
const COLOR_BONUS: [u32; 5] = [0, 3, 6, 12, 24];

/// Groups at or above this size get the capped connection bonus.
const CONNECTION_CAP_SIZE: usize = 11;
const CONNECTION_CAP: u32 = 10;

/// Bonus for the `chain`-th step of a cascade (1-based).
pub fn chain_bonus(chain: u32) -> u32 {
    match chain {
        0 | 1 => 0,
        2 | 3 => 8 * (chain - 1),
        _ => 32 * (chain - 3),
    }
}

/// Bonus for a single erased group of `size` puyos.
pub fn connection_bonus(size: usize) -> u32 {
    match size {
        0..=4 => 0,
        s if s >= CONNECTION_CAP_SIZE => CONNECTION_CAP,
        s => (s - 3) as u32,
    }
}

pub fn color_bonus(distinct_colors: usize) -> u32 {
    match distinct_colors {
        0 => 0,
        n => COLOR_BONUS[n.min(COLOR_BONUS.len()) - 1],
    }
}

/// What one clear step erased.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClearedGroups {
    pub puyo_count: usize,
    pub group_sizes: Vec<usize>,
    pub distinct_colors: usize,
}

impl ClearedGroups {
    pub fn from_groups(groups: &[Group]) -> Self {
        let colors: HashSet<PuyoColor> = groups.iter().map(|g| g.color).collect();
        Self {
            puyo_count: groups.iter().map(Group::len).sum(),
            group_sizes: groups.iter().map(Group::len).collect(),
            distinct_colors: colors.len(),
        }
    }
}

/// Score of one clear step: `count * 10 * max(1, chain + connection + colour bonus)`.
pub fn calculate_score(chain: u32, cleared: &ClearedGroups) -> u32 {
    let connection: u32 = cleared.group_sizes.iter().map(|&s| connection_bonus(s)).sum();
    let bonus = chain_bonus(chain) + connection + color_bonus(cleared.distinct_colors);
    cleared.puyo_count as u32 * 10 * bonus.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleared(sizes: &[usize], colors: usize) -> ClearedGroups {
        ClearedGroups {
            puyo_count: sizes.iter().sum(),
            group_sizes: sizes.to_vec(),
            distinct_colors: colors,
        }
    }

    #[test]
    fn chain_bonus_table() {
        assert_eq!(chain_bonus(1), 0);
        assert_eq!(chain_bonus(2), 8);
        assert_eq!(chain_bonus(3), 16);
        assert_eq!(chain_bonus(4), 32);
        assert_eq!(chain_bonus(5), 64);
        assert_eq!(chain_bonus(10), 224);
    }

    #[test]
    fn connection_bonus_table() {
        assert_eq!(connection_bonus(4), 0);
        assert_eq!(connection_bonus(5), 2);
        assert_eq!(connection_bonus(10), 7);
        assert_eq!(connection_bonus(11), 10);
        assert_eq!(connection_bonus(30), 10);
    }

    #[test]
    fn color_bonus_table() {
        assert_eq!(color_bonus(1), 0);
        assert_eq!(color_bonus(2), 3);
        assert_eq!(color_bonus(3), 6);
        assert_eq!(color_bonus(4), 12);
        assert_eq!(color_bonus(5), 24);
    }

    #[test]
    fn single_group_of_four_scores_forty() {
        assert_eq!(calculate_score(1, &cleared(&[4], 1)), 40);
    }

    #[test]
    fn bonuses_add_up() {
        assert_eq!(calculate_score(1, &cleared(&[7], 1)), 280);
        assert_eq!(calculate_score(2, &cleared(&[4, 4], 1)), 640);
        assert_eq!(calculate_score(2, &cleared(&[4, 4], 2)), 880);
        assert_eq!(calculate_score(2, &cleared(&[4, 6], 1)), 1100);
        assert_eq!(calculate_score(2, &cleared(&[5, 5], 1)), 1200);
    }

    #[test]
    fn from_groups_counts_colours() {
        let groups = vec![
            Group {
                color: PuyoColor::Blue,
                cells: vec![(0, 13), (1, 13), (0, 12), (1, 12)],
            },
            Group {
                color: PuyoColor::Blue,
                cells: vec![(4, 13), (5, 13), (4, 12), (5, 12), (5, 11)],
            },
        ];
        let c = ClearedGroups::from_groups(&groups);
        assert_eq!(c.puyo_count, 9);
        assert_eq!(c.group_sizes, vec![4, 5]);
        assert_eq!(c.distinct_colors, 1);
    }
}
