//! Pure score computations: per-player totals and standard competition ("1224") ranks.

use crate::state::game::{Game, PlayerScore, ScoreSheet};

/// Sum of a player's scores. Pending round slots count as 0.
pub fn total(player: &PlayerScore) -> i64 {
    match &player.sheet {
        ScoreSheet::Rounds(scores) => scores.iter().flatten().map(|&score| i64::from(score)).sum(),
        ScoreSheet::Calculated(fields) => fields.values().map(|&score| i64::from(score)).sum(),
    }
}

/// Competition rank of every entry of `totals`, returned in the same order.
///
/// Equal totals share a rank, and the next distinct total is ranked by its position:
/// `[30, 30, 10]` yields `[1, 1, 3]`. Ties carry no secondary key.
pub fn ranks(totals: &[i64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..totals.len()).collect();
    order.sort_by(|&a, &b| totals[b].cmp(&totals[a]));

    let mut ranks = vec![0; totals.len()];
    for (position, &index) in order.iter().enumerate() {
        ranks[index] = match position.checked_sub(1).map(|prev| order[prev]) {
            Some(prev) if totals[prev] == totals[index] => ranks[prev],
            _ => position + 1,
        };
    }
    ranks
}

/// One row of the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    /// Seat of the player in the game.
    pub player_index: usize,
    /// Name snapshot of the player.
    pub player_name: String,
    /// Current total.
    pub total: i64,
    /// Competition rank.
    pub rank: usize,
}

/// Leaderboard for a game, ordered by rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standings {
    /// Rows sorted by total descending. Players sharing a total keep seating order,
    /// which is an artefact of the stable sort rather than a tie-break.
    pub rows: Vec<Standing>,
    /// Display policy: ranks are meaningless before any round exists (rounds) or while
    /// every total is zero (calculated).
    pub show_ranks: bool,
}

/// Compute totals, ranks and the rank visibility policy for `game`.
pub fn standings(game: &Game) -> Standings {
    let totals: Vec<i64> = game.players.iter().map(total).collect();
    let player_ranks = ranks(&totals);

    let mut rows: Vec<Standing> = game
        .players
        .iter()
        .enumerate()
        .map(|(player_index, player)| Standing {
            player_index,
            player_name: player.player_name.clone(),
            total: totals[player_index],
            rank: player_ranks[player_index],
        })
        .collect();
    rows.sort_by_key(|row| row.rank);

    Standings {
        rows,
        show_ranks: show_ranks(game, &totals),
    }
}

fn show_ranks(game: &Game, totals: &[i64]) -> bool {
    match game.players.first().map(|player| &player.sheet) {
        Some(ScoreSheet::Rounds(_)) => game.round_count() > 0,
        Some(ScoreSheet::Calculated(_)) => totals.iter().any(|&total| total != 0),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;
    use uuid::Uuid;

    use super::*;
    use crate::state::model::ModelRegistry;

    fn rounds_player(scores: Vec<Option<i32>>) -> PlayerScore {
        PlayerScore {
            player_id: None,
            player_name: "P".into(),
            sheet: ScoreSheet::Rounds(scores),
        }
    }

    #[test]
    fn total_treats_pending_rounds_as_zero() {
        assert_eq!(total(&rounds_player(vec![])), 0);
        assert_eq!(total(&rounds_player(vec![None])), 0);
        assert_eq!(total(&rounds_player(vec![None, None, None])), 0);
        assert_eq!(total(&rounds_player(vec![Some(5), None, Some(-2)])), 3);
    }

    #[test]
    fn total_sums_categories() {
        let mut fields = IndexMap::new();
        fields.insert("animaux".to_string(), 12);
        fields.insert("riviere".to_string(), 7);
        let player = PlayerScore {
            player_id: Some(Uuid::new_v4()),
            player_name: "P".into(),
            sheet: ScoreSheet::Calculated(fields),
        };
        assert_eq!(total(&player), 19);
    }

    #[test]
    fn total_does_not_overflow_on_large_scores() {
        let player = rounds_player(vec![Some(i32::MAX), Some(i32::MAX)]);
        assert_eq!(total(&player), 2 * i64::from(i32::MAX));
    }

    #[test]
    fn ranks_skip_after_ties() {
        assert_eq!(ranks(&[30, 30, 10]), vec![1, 1, 3]);
        assert_eq!(ranks(&[10, 30, 30]), vec![3, 1, 1]);
        assert_eq!(ranks(&[5, 9, 5, 1]), vec![2, 1, 2, 4]);
        assert_eq!(ranks(&[0, 0, 0]), vec![1, 1, 1]);
        assert_eq!(ranks(&[]), Vec::<usize>::new());
    }

    #[test]
    fn standings_hide_ranks_until_a_round_exists() {
        let registry = ModelRegistry::default();
        let model = registry.get_model("base").unwrap();
        let mut game = Game::new(model, "Base".into(), vec![(None, "A".into()), (None, "B".into())]);

        assert!(!standings(&game).show_ranks);

        game.players[0].sheet = ScoreSheet::Rounds(vec![None]);
        game.players[1].sheet = ScoreSheet::Rounds(vec![None]);
        let board = standings(&game);
        assert!(board.show_ranks);
        assert!(board.rows.iter().all(|row| row.rank == 1));
    }

    #[test]
    fn standings_hide_ranks_while_calculated_totals_are_zero() {
        let registry = ModelRegistry::default();
        let model = registry.get_model("harmonies").unwrap();
        let mut game = Game::new(model, "H".into(), vec![(None, "A".into()), (None, "B".into())]);

        assert!(!standings(&game).show_ranks);

        if let ScoreSheet::Calculated(fields) = &mut game.players[1].sheet {
            fields.insert("arbres".into(), 4);
        }
        let board = standings(&game);
        assert!(board.show_ranks);
        assert_eq!(board.rows[0].player_name, "B");
        assert_eq!(board.rows[0].rank, 1);
        assert_eq!(board.rows[1].rank, 2);
    }
}
