//! Static evaluation used by the bot's search.
//!
//! Two distinct measures live here: [`evaluate_position`] is the leaf
//! evaluation of a whole board, [`evaluate_move`] is the cheap ordering
//! key applied to candidates before the search recurses into them.

use xoxide_engine::{Board, Cell, LINE_DIRECTIONS, Player, Position};

/// Static evaluation of a board from `bot`'s point of view.
///
/// Opponent threats are weighted 1.2x the bot's own chances: blocking
/// matters more than attacking.
#[must_use]
#[expect(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub(crate) fn evaluate_position(board: &Board, bot: Player, length: i32) -> i32 {
    let own = all_lines_score(board, bot, length);
    let opponent = all_lines_score(board, bot.opponent(), length);
    own - (opponent as f32 * 1.2) as i32 + center_control(board, bot)
}

/// Sums the best window through every of `player`'s marks in every
/// direction.
fn all_lines_score(board: &Board, player: Player, length: i32) -> i32 {
    let mut total = 0;
    for pos in board.occupied_by(player) {
        for dir in LINE_DIRECTIONS {
            total += best_window_score(board, pos, dir, player, length);
        }
    }
    total
}

/// Scores the best `length`-sized window through `start` along `dir`.
///
/// Windows containing an opposing mark are dead and score nothing. A
/// complete line scores 10000, one move from completion 1000, two moves
/// 100; otherwise 10 per own mark once at least two are present.
fn best_window_score(
    board: &Board,
    start: Position,
    dir: (i32, i32),
    player: Player,
    length: i32,
) -> i32 {
    let mut best = 0;
    for offset in (1 - length)..=0 {
        let mut own = 0;
        let mut empty = 0;
        let mut blocked = false;
        for i in 0..length {
            let cell = board.get(start.step(dir, offset + i));
            if cell == player.mark() {
                own += 1;
            } else if cell == Cell::Empty {
                empty += 1;
            } else {
                blocked = true;
                break;
            }
        }
        if blocked {
            continue;
        }
        if own == length {
            return 10000;
        }
        if own == length - 1 && empty == 1 {
            return 1000;
        }
        if own == length - 2 && empty == 2 {
            return 100;
        }
        if own >= 2 {
            best = best.max(own * 10);
        }
    }
    best
}

/// Bonus for holding the origin and its surrounding ring.
///
/// The penalties for the opponent holding them are deliberately larger
/// than the rewards, matching the defensive bias of the line weights.
fn center_control(board: &Board, bot: Player) -> i32 {
    let mut score = match board.get(Position::ORIGIN).player() {
        Some(player) if player == bot => 50,
        Some(_) => -60,
        None => 0,
    };
    for neighbor in Position::ORIGIN.neighbors() {
        score += match board.get(neighbor).player() {
            Some(player) if player == bot => 20,
            Some(_) => -25,
            None => 0,
        };
    }
    score
}

/// Ordering key for candidate moves: prefer cells near the origin and next
/// to existing marks, own marks counting a little more than the
/// opponent's. Used only to sort candidates before the search, never as
/// the final say.
#[must_use]
pub(crate) fn evaluate_move(board: &Board, candidate: Position, bot: Player) -> i32 {
    let mut score = (5 - candidate.manhattan_from_origin()) * 10;
    for neighbor in candidate.neighbors() {
        score += match board.get(neighbor).player() {
            Some(player) if player == bot => 15,
            Some(_) => 10,
            None => 0,
        };
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use xoxide_engine::Cell;

    #[test]
    fn test_complete_line_dominates() {
        let mut board = Board::new();
        for i in 0..3 {
            board.set(Position::new(i, 0), Cell::X);
        }
        // Scanned from the last mark, the first window is the full line.
        assert_eq!(
            best_window_score(&board, Position::new(2, 0), (1, 0), Player::X, 3),
            10000
        );
    }

    #[test]
    fn test_one_away_window() {
        let mut board = Board::new();
        board.set(Position::new(0, 0), Cell::X);
        board.set(Position::new(1, 0), Cell::X);
        // Scanned from the trailing mark, the first window already holds
        // both marks plus one gap.
        assert_eq!(
            best_window_score(&board, Position::new(1, 0), (1, 0), Player::X, 3),
            1000
        );
    }

    #[test]
    fn test_fully_blocked_windows_score_nothing() {
        // O X X O: every horizontal 3-window through the first X contains
        // an O.
        let board = Board::from_ascii(Position::new(-1, 0), "OXXO");
        assert_eq!(
            best_window_score(&board, Position::ORIGIN, (1, 0), Player::X, 3),
            0
        );
    }

    #[test]
    fn test_lone_mark_in_open_window_counts_as_two_away() {
        let mut board = Board::new();
        board.set(Position::ORIGIN, Cell::X);
        assert_eq!(
            best_window_score(&board, Position::ORIGIN, (1, 0), Player::X, 3),
            100
        );
    }

    #[test]
    fn test_position_evaluation_is_defensively_biased() {
        // Mirror-image pairs far from the origin: the opponent's threat
        // outweighs our identical one.
        let mut board = Board::new();
        board.set(Position::new(10, 10), Cell::X);
        board.set(Position::new(11, 10), Cell::X);
        board.set(Position::new(-10, -10), Cell::O);
        board.set(Position::new(-11, -10), Cell::O);
        let score = evaluate_position(&board, Player::X, 5);
        assert!(score < 0, "expected defensive bias, got {score}");
    }

    #[test]
    fn test_center_control_rewards_origin() {
        let mut board = Board::new();
        board.set(Position::ORIGIN, Cell::X);
        assert_eq!(center_control(&board, Player::X), 50);
        assert_eq!(center_control(&board, Player::O), -60);

        board.set(Position::new(1, 0), Cell::O);
        assert_eq!(center_control(&board, Player::X), 50 - 25);
    }

    #[test]
    fn test_move_ordering_prefers_contested_center() {
        let mut board = Board::new();
        board.set(Position::new(1, 0), Cell::X);

        let next_to_mark = evaluate_move(&board, Position::ORIGIN, Player::X);
        let far_away = evaluate_move(&board, Position::new(8, 8), Player::X);
        assert!(next_to_mark > far_away);
    }

    #[test]
    fn test_move_ordering_weights_own_marks_higher() {
        let mut own = Board::new();
        own.set(Position::new(1, 0), Cell::X);
        let mut theirs = Board::new();
        theirs.set(Position::new(1, 0), Cell::O);

        let near_own = evaluate_move(&own, Position::ORIGIN, Player::X);
        let near_theirs = evaluate_move(&theirs, Position::ORIGIN, Player::X);
        assert!(near_own > near_theirs);
    }
}
