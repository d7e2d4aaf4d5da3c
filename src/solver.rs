use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::{debug, info, trace};

use crate::board::Board;

/// Heuristic term of a search node's priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Priority {
    #[default]
    Manhattan,
    Hamming,
}

impl Priority {
    fn estimate(self, board: &Board) -> u32 {
        match self {
            Priority::Manhattan => board.manhattan(),
            Priority::Hamming => board.hamming(),
        }
    }
}

/// A board reached after `moves` slides. `parent` indexes the arena of the
/// search that created it.
struct SearchNode {
    board: Board,
    moves: u32,
    parent: Option<usize>,
}

/// Frontier entry, ordered for `BinaryHeap` (a max-heap): lower priority
/// ranks higher, and on equal priority the deeper node ranks higher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frontier {
    priority: u32,
    moves: u32,
    idx: usize,
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| self.moves.cmp(&other.moves))
            .then_with(|| other.idx.cmp(&self.idx))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One A* search: every node ever created, plus the open frontier.
struct Search {
    nodes: Vec<SearchNode>,
    open: BinaryHeap<Frontier>,
    priority: Priority,
}

impl Search {
    fn new(initial: Board, priority: Priority) -> Self {
        let mut search = Self {
            nodes: Vec::new(),
            open: BinaryHeap::new(),
            priority,
        };
        search.push(initial, 0, None);
        search
    }

    fn push(&mut self, board: Board, moves: u32, parent: Option<usize>) {
        let idx = self.nodes.len();
        let priority = moves + self.priority.estimate(&board);
        self.nodes.push(SearchNode {
            board,
            moves,
            parent,
        });
        self.open.push(Frontier {
            priority,
            moves,
            idx,
        });
    }

    fn pop(&mut self) -> Option<usize> {
        self.open.pop().map(|f| f.idx)
    }

    fn board(&self, idx: usize) -> &Board {
        &self.nodes[idx].board
    }

    /// Enqueue the successors of `idx`, skipping the board it came from.
    fn expand(&mut self, idx: usize) {
        let node = &self.nodes[idx];
        let moves = node.moves + 1;
        let previous = node.parent.map(|p| &self.nodes[p].board);
        let successors: Vec<Board> = node
            .board
            .neighbors()
            .into_iter()
            .filter(|b| previous != Some(b))
            .collect();

        for board in successors {
            self.push(board, moves, Some(idx));
        }
    }

    /// Boards from the root to `idx`, inclusive.
    fn path(&self, idx: usize) -> Vec<Board> {
        let mut path = Vec::new();
        let mut cur = Some(idx);
        while let Some(i) = cur {
            path.push(self.nodes[i].board.clone());
            cur = self.nodes[i].parent;
        }
        path.reverse();
        path
    }
}

/// Finds a shortest solution for a board, or proves there is none.
///
/// The search runs to completion inside the constructor. Two A* searches
/// advance in lockstep: one from the initial board and one from its
/// [twin](Board::twin). Exactly one of the two can reach the goal, so
/// whichever gets there first decides solvability.
pub struct Solver {
    solution: Option<Vec<Board>>,
    expanded: usize,
}

impl Solver {
    pub fn new(initial: Board) -> Self {
        Self::with_priority(initial, Priority::default())
    }

    pub fn with_priority(initial: Board, priority: Priority) -> Self {
        debug!(
            "solving {0}x{0} board with {1:?} priority, initial estimate {2}",
            initial.dimension(),
            priority,
            priority.estimate(&initial)
        );

        let twin = initial.twin();
        let mut main = Search::new(initial, priority);
        let mut twin = Search::new(twin, priority);
        let mut expanded = 0usize;

        let solution = loop {
            let Some(t) = twin.pop() else {
                break None;
            };
            expanded += 1;
            if twin.board(t).is_goal() {
                break None;
            }

            let Some(m) = main.pop() else {
                break None;
            };
            expanded += 1;
            if main.board(m).is_goal() {
                break Some(main.path(m));
            }

            main.expand(m);
            twin.expand(t);

            if expanded % 100_000 == 0 {
                trace!(
                    "expanded {expanded} nodes, frontiers {} / {}",
                    main.open.len(),
                    twin.open.len()
                );
            }
        };

        match &solution {
            Some(path) => info!(
                "solved in {} moves after {expanded} expansions",
                path.len() - 1
            ),
            None => info!("no solution, twin reached goal after {expanded} expansions"),
        }

        Self { solution, expanded }
    }

    pub fn is_solvable(&self) -> bool {
        self.solution.is_some()
    }

    /// Minimum number of moves, or -1 if the board is unsolvable.
    pub fn moves(&self) -> i64 {
        match &self.solution {
            Some(path) => path.len() as i64 - 1,
            None => -1,
        }
    }

    /// Boards from the initial board to the goal, inclusive.
    pub fn solution(&self) -> Option<&[Board]> {
        self.solution.as_deref()
    }

    /// Nodes dequeued across both searches.
    pub fn expanded(&self) -> usize {
        self.expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(rows: &[&[u32]]) -> Board {
        Board::new(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    #[test]
    fn frontier_prefers_low_priority_then_depth() {
        let mut heap = BinaryHeap::new();
        heap.push(Frontier {
            priority: 5,
            moves: 1,
            idx: 0,
        });
        heap.push(Frontier {
            priority: 4,
            moves: 0,
            idx: 1,
        });
        heap.push(Frontier {
            priority: 5,
            moves: 3,
            idx: 2,
        });
        heap.push(Frontier {
            priority: 4,
            moves: 2,
            idx: 3,
        });
        let order: Vec<usize> = std::iter::from_fn(|| heap.pop().map(|f| f.idx)).collect();
        assert_eq!(order, vec![3, 1, 2, 0]);
    }

    #[test]
    fn goal_is_solved_in_zero_moves() {
        let solver = Solver::new(Board::goal(3));
        assert!(solver.is_solvable());
        assert_eq!(solver.moves(), 0);
        assert_eq!(solver.solution().unwrap(), &[Board::goal(3)]);
    }

    #[test]
    fn one_move_away() {
        let start = board(&[&[1, 2, 3], &[4, 5, 6], &[7, 0, 8]]);
        let solver = Solver::new(start.clone());
        assert_eq!(solver.moves(), 1);
        assert_eq!(solver.solution().unwrap(), &[start, Board::goal(3)]);
    }

    #[test]
    fn unsolvable_boards() {
        for start in [
            board(&[&[1, 2, 3], &[4, 5, 6], &[8, 7, 0]]),
            board(&[&[1, 8, 3], &[4, 0, 2], &[7, 6, 5]]),
            board(&[&[2, 1], &[3, 0]]),
        ] {
            let solver = Solver::new(start);
            assert!(!solver.is_solvable());
            assert_eq!(solver.moves(), -1);
            assert!(solver.solution().is_none());
        }
    }

    #[test]
    fn known_puzzle() {
        // twin of this one is unsolvable
        let start = board(&[&[8, 1, 3], &[4, 0, 2], &[7, 6, 5]]);
        let solver = Solver::new(start.clone());
        assert!(solver.is_solvable());
        let path = solver.solution().unwrap();
        assert_eq!(path.first(), Some(&start));
        assert!(path.last().unwrap().is_goal());
        assert_eq!(solver.moves(), 14);
    }

    #[test]
    fn short_scrambles_are_optimal() {
        let start = board(&[&[0, 1, 3], &[4, 2, 5], &[7, 8, 6]]);
        assert_eq!(Solver::new(start.clone()).moves(), 4);
        assert_eq!(Solver::with_priority(start, Priority::Hamming).moves(), 4);

        let start = board(&[&[1, 2, 3], &[0, 7, 6], &[5, 4, 8]]);
        assert_eq!(Solver::new(start).moves(), 7);
    }

    #[test]
    fn two_by_two() {
        let start = board(&[&[0, 3], &[2, 1]]);
        let solver = Solver::new(start);
        assert!(solver.is_solvable());
        assert_eq!(solver.moves(), 6);
        assert!(solver.expanded() > 0);
    }

    #[test]
    fn expansion_never_undoes_the_previous_slide() {
        let root = board(&[&[1, 2, 3], &[4, 0, 5], &[6, 7, 8]]);
        let mut search = Search::new(root.clone(), Priority::Manhattan);
        let first = search.pop().unwrap();
        search.expand(first);
        assert_eq!(search.nodes.len(), 1 + root.neighbors().len());

        let child = 1;
        let child_board = search.board(child).clone();
        let before = search.nodes.len();
        search.expand(child);

        let grandchildren: Vec<&Board> = search.nodes[before..].iter().map(|n| &n.board).collect();
        assert_eq!(grandchildren.len(), child_board.neighbors().len() - 1);
        assert!(!grandchildren.contains(&&root));
        assert!(search.nodes[before..]
            .iter()
            .all(|n| n.parent == Some(child) && n.moves == 2));
    }
}
