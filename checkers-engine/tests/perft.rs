//! Performance Test (perft)
//!
//! Tests to ensure the move generator passes perft by checking against known node counts
//! for English draughts.

use std::thread::available_parallelism;

use checkers_engine::coretypes::Color;
use checkers_engine::fen::Fen;
use checkers_engine::perft::*;
use checkers_engine::*;

const ONE_THREAD: usize = 1;

fn cpu_threads() -> usize {
    available_parallelism()
        .map(|inner| inner.get())
        .unwrap_or(1)
}

/// Run single and multithreaded perft `expected_nodes.len()` times.
/// The index of each expected_node value is its ply.
fn perft_tester(position: Position, expected_nodes: Vec<u64>) {
    for (ply, expected_node) in expected_nodes.into_iter().enumerate() {
        let single_thread_result = perft(position, ply as u8, ONE_THREAD);
        let multi_thread_result = perft(position, ply as u8, cpu_threads());

        println!("perft({ply}): {single_thread_result:?}");
        assert_eq!(single_thread_result.nodes, expected_node);
        assert_eq!(single_thread_result, multi_thread_result);
    }
}

#[test]
fn perft_starting_position() {
    perft_tester(
        Position::start_position(),
        vec![1, 7, 49, 302, 1_469, 7_361, 36_768],
    );
}

#[test]
fn perft_red_first() {
    // The board is symmetric under a half turn, so Red moving first gives the same counts.
    let position = Position::start_position().with_side_to_move(Color::Red);
    perft_tester(position, vec![1, 7, 49, 302, 1_469]);
}

#[test]
fn perft_forced_capture() {
    // Black must take, either single jump.
    let position = Position::parse_fen("B:B14,15:R18").unwrap();
    let info = perft(position, 1, ONE_THREAD);
    assert_eq!(info.nodes, 2);
    assert_eq!(info.captures, 2);
}

#[test]
fn divide_matches_perft() {
    let position = Position::start_position();
    let divided = divide(&position, 4);
    assert_eq!(divided.len(), 7);
    let total: u64 = divided.iter().map(|(_, nodes)| nodes).sum();
    assert_eq!(total, perft(position, 4, ONE_THREAD).nodes);
}
