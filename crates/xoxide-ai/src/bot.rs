use std::collections::BTreeSet;

use arrayvec::ArrayVec;
use rand::{Rng, SeedableRng as _, seq::IndexedRandom as _};
use rand_pcg::Pcg32;
use tracing::debug;
use xoxide_engine::{Board, Cell, GameSeed, Player, Position, winning_line_through};

use crate::{Difficulty, heuristics};

/// How far from existing marks candidate moves are collected.
const CANDIDATE_RADIUS: i32 = 2;

/// Value of a line completed during search; shallower completions score
/// higher through the depth bonus.
const WIN_SCORE: i32 = 10_000;
const WIN_DEPTH_BONUS: i32 = 10;

/// Chance (percent) that the easy tier plays a random candidate instead of
/// searching.
const EASY_RANDOM_CHANCE: u8 = 40;

/// The computer opponent.
///
/// The bot never touches the live board it is handed: lookahead runs on
/// value-semantics clones, one per explored branch, and the chosen move is
/// applied by the caller through the normal move path. The only state kept
/// between calls is the configuration and the easy-tier random source.
#[derive(Debug, Clone)]
pub struct Bot {
    player: Player,
    opponent: Player,
    difficulty: Difficulty,
    rng: Pcg32,
}

impl Bot {
    /// Creates a bot playing `player`, with an OS-seeded random source.
    #[must_use]
    pub fn new(difficulty: Difficulty, player: Player) -> Self {
        Self::with_seed(difficulty, player, rand::rng().random())
    }

    /// Like [`Self::new`], but with a fixed seed so the easy tier's random
    /// picks are reproducible.
    #[must_use]
    pub fn with_seed(difficulty: Difficulty, player: Player, seed: GameSeed) -> Self {
        Self {
            player,
            opponent: player.opponent(),
            difficulty,
            rng: Pcg32::from_seed(seed.to_bytes()),
        }
    }

    #[must_use]
    pub fn player(&self) -> Player {
        self.player
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn set_player(&mut self, player: Player) {
        self.player = player;
        self.opponent = player.opponent();
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    /// Picks the bot's next move, or `None` when no candidate cell exists.
    ///
    /// Forced tactics come first: a move completing the bot's own line is
    /// played immediately, then a move that blocks the opponent from
    /// completing one. Only when neither exists does the minimax search
    /// run.
    pub fn choose_move(&mut self, board: &Board, winning_length: i32) -> Option<Position> {
        let candidates = candidate_moves(board);
        if candidates.is_empty() {
            return None;
        }

        if let Some(tactical) = self.immediate_win_or_block(board, &candidates, winning_length) {
            debug!(%tactical, "playing forced tactical move");
            return Some(tactical);
        }

        if self.difficulty == Difficulty::Easy
            && self.rng.random_range(0..100) < EASY_RANDOM_CHANCE
        {
            let pick = candidates.choose(&mut self.rng).copied();
            debug!(?pick, "easy tier played a random candidate");
            return pick;
        }

        let (score, best) = self.minimax(
            board,
            self.difficulty.search_depth(),
            i32::MIN,
            i32::MAX,
            true,
            winning_length,
        );
        debug!(?best, score, "search finished");
        best.or_else(|| candidates.first().copied())
    }

    /// A candidate completing a line for the bot, else one that denies the
    /// opponent a completion.
    fn immediate_win_or_block(
        &self,
        board: &Board,
        candidates: &[Position],
        winning_length: i32,
    ) -> Option<Position> {
        completing_move(board, candidates, self.player, winning_length)
            .or_else(|| completing_move(board, candidates, self.opponent, winning_length))
    }

    /// Fixed-depth minimax with alpha-beta pruning.
    ///
    /// Candidates are ordered by the move heuristic and truncated to the
    /// tier's breadth cap before recursing; good ordering is what makes
    /// the alpha-beta cutoffs bite. A move that completes a line is worth
    /// `WIN_SCORE` plus a bonus for being found shallow, without further
    /// recursion.
    fn minimax(
        &self,
        board: &Board,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
        winning_length: i32,
    ) -> (i32, Option<Position>) {
        if depth == 0 {
            return (
                heuristics::evaluate_position(board, self.player, winning_length),
                None,
            );
        }
        let mut moves = candidate_moves(board);
        if moves.is_empty() {
            return (0, None);
        }
        moves.sort_by_key(|&candidate| {
            std::cmp::Reverse(heuristics::evaluate_move(board, candidate, self.player))
        });
        moves.truncate(self.difficulty.move_cap());

        #[expect(clippy::cast_possible_wrap)]
        let terminal_score = WIN_SCORE + depth as i32 * WIN_DEPTH_BONUS;
        let mover = if maximizing { self.player } else { self.opponent };

        let mut best_move = moves[0];
        if maximizing {
            let mut best_score = i32::MIN;
            for &candidate in &moves {
                let mut probe = board.clone();
                probe.set(candidate, mover.mark());
                if winning_line_through(&probe, candidate, winning_length).is_some() {
                    return (terminal_score, Some(candidate));
                }
                let (score, _) =
                    self.minimax(&probe, depth - 1, alpha, beta, false, winning_length);
                if score > best_score {
                    best_score = score;
                    best_move = candidate;
                }
                alpha = alpha.max(score);
                if beta <= alpha {
                    break;
                }
            }
            (best_score, Some(best_move))
        } else {
            let mut best_score = i32::MAX;
            for &candidate in &moves {
                let mut probe = board.clone();
                probe.set(candidate, mover.mark());
                if winning_line_through(&probe, candidate, winning_length).is_some() {
                    return (-terminal_score, Some(candidate));
                }
                let (score, _) =
                    self.minimax(&probe, depth - 1, alpha, beta, true, winning_length);
                if score < best_score {
                    best_score = score;
                    best_move = candidate;
                }
                beta = beta.min(score);
                if beta <= alpha {
                    break;
                }
            }
            (best_score, Some(best_move))
        }
    }
}

/// The first candidate whose placement completes a line for `player`,
/// probed on a scratch copy of the board.
fn completing_move(
    board: &Board,
    candidates: &[Position],
    player: Player,
    winning_length: i32,
) -> Option<Position> {
    candidates.iter().copied().find(|&candidate| {
        let mut probe = board.clone();
        probe.set(candidate, player.mark());
        winning_line_through(&probe, candidate, winning_length).is_some()
    })
}

/// Empty cells within [`CANDIDATE_RADIUS`] of any mark, deduplicated and
/// in ascending position order so the search is deterministic for a given
/// board.
///
/// On an empty board the 3x3 block around the origin is offered instead.
/// The result can only be empty when that fallback block is occupied too,
/// which a caller must treat as "no legal move".
fn candidate_moves(board: &Board) -> Vec<Position> {
    let mut candidates = BTreeSet::new();
    for (pos, _) in board.occupied() {
        for dx in -CANDIDATE_RADIUS..=CANDIDATE_RADIUS {
            for dy in -CANDIDATE_RADIUS..=CANDIDATE_RADIUS {
                let candidate = pos.offset(dx, dy);
                if board.get(candidate) == Cell::Empty {
                    candidates.insert(candidate);
                }
            }
        }
    }
    if candidates.is_empty() {
        for fallback in origin_block() {
            if board.get(fallback) == Cell::Empty {
                candidates.insert(fallback);
            }
        }
    }
    candidates.into_iter().collect()
}

/// The origin and its 8 surrounding cells.
fn origin_block() -> ArrayVec<Position, 9> {
    let mut block = ArrayVec::new();
    block.push(Position::ORIGIN);
    block.extend(Position::ORIGIN.neighbors());
    block
}
