//! Optimal solver for the N-by-N sliding tile puzzle.
//!
//! [`Board`] is an immutable grid with Manhattan and Hamming heuristics.
//! [`Solver`] runs A* on a board and its twin side by side to find a
//! shortest solution or prove that none exists.

pub mod board;
pub mod error;
pub mod solver;

pub use board::{Board, Move};
pub use error::BoardError;
pub use solver::{Priority, Solver};
