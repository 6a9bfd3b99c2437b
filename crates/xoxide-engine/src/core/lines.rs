//! Straight-line scanning over a [`Board`]: win detection and the
//! isolated-line scoring used by the score-driven game modes.
//!
//! All functions are pure board queries; none of them mutate the board.

use std::collections::HashSet;

use super::{
    board::Board,
    cell::{PerPlayer, Player},
    position::Position,
};

/// The four canonical line directions. Scanning each forward and backward
/// from a pivot covers every undirected line through that cell.
pub const LINE_DIRECTIONS: [(i32, i32); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

/// True when all `length` consecutive cells from `start` along `dir` hold
/// `player`'s mark.
#[must_use]
pub fn line_matches(
    board: &Board,
    start: Position,
    dir: (i32, i32),
    length: i32,
    player: Player,
) -> bool {
    (0..length).all(|i| board.get(start.step(dir, i)) == player.mark())
}

/// Finds a completed line of `length` marks running through `last_move`.
///
/// For each direction, every alignment of a `length`-sized window containing
/// `last_move` is tested; the first match in direction-then-offset order is
/// returned, which fixes the tie-break when one move completes several lines
/// at once.
#[must_use]
pub fn winning_line_through(
    board: &Board,
    last_move: Position,
    length: i32,
) -> Option<Vec<Position>> {
    let player = board.get(last_move).player()?;

    for dir in LINE_DIRECTIONS {
        for offset in (1 - length)..=0 {
            let start = last_move.step(dir, offset);
            if line_matches(board, start, dir, length, player) {
                return Some((0..length).map(|i| start.step(dir, i)).collect());
            }
        }
    }
    None
}

/// Number of consecutive cells holding `player`'s mark from `start`
/// (inclusive) along `dir`.
#[must_use]
pub fn count_in_direction(board: &Board, start: Position, dir: (i32, i32), player: Player) -> i32 {
    let mut count = 0;
    let mut current = start;
    while board.get(current) == player.mark() {
        count += 1;
        current = current.step(dir, 1);
    }
    count
}

/// Scores the longest run of `player`'s marks through `pivot` as length².
///
/// Every cell of that longest run is recorded in `visited`, so scanning the
/// remaining pivots of the same physical line contributes nothing further:
/// each isolated line is credited exactly once no matter how many of its
/// cells are used as scan pivots.
#[must_use]
pub fn max_isolated_line_score(
    board: &Board,
    pivot: Position,
    player: Player,
    visited: &mut HashSet<Position>,
) -> i32 {
    let mut best: Option<((i32, i32), i32, i32)> = None;
    let mut best_length = 0;

    for dir in LINE_DIRECTIONS {
        let forward = count_in_direction(board, pivot, dir, player);
        let backward = count_in_direction(board, pivot, (-dir.0, -dir.1), player);
        // The pivot is counted by both scans.
        let length = forward + backward - 1;
        if length > best_length {
            best_length = length;
            best = Some((dir, forward, backward));
        }
    }

    let Some((dir, forward, backward)) = best else {
        return 0;
    };
    for i in (1 - backward)..forward {
        visited.insert(pivot.step(dir, i));
    }
    best_length * best_length
}

/// Full-board rescan producing each player's base score: the sum of
/// (length)² over their isolated lines.
#[must_use]
pub fn base_scores(board: &Board) -> PerPlayer<i32> {
    let mut scores = PerPlayer::new(0, 0);
    let mut visited = HashSet::new();

    for player in [Player::X, Player::O] {
        visited.clear();
        let positions: Vec<_> = board.occupied_by(player).collect();
        for pos in positions {
            if !visited.contains(&pos) {
                scores[player] += max_isolated_line_score(board, pos, player, &mut visited);
            }
        }
    }
    scores
}
