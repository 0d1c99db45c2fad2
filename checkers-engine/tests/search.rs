//! Search
//!
//! Tests to ensure the engine finds the right move in small positions
//! and honors its depth and time limits.

use std::time::Duration;

use checkers_engine::coretypes::{Color, Score};
use checkers_engine::evaluation::Weights;
use checkers_engine::fen::Fen;
use checkers_engine::search::search;
use checkers_engine::*;

fn game_of(fen: &str) -> Game {
    Game::from(Position::parse_fen(fen).unwrap())
}

fn play(game: &mut Game, moves: &[&str]) {
    for text in moves {
        let move_ = game.position().parse_move(text).unwrap();
        game.apply_move(move_).unwrap();
    }
}

#[test]
fn takes_the_last_piece() {
    let result = search(&game_of("R:B18:R22,29"), Mode::depth(6, None), Weights::default()).unwrap();
    assert_eq!(result.best_move.to_string(), "22x15");
    assert_eq!(result.score, Score::WIN - Score(1));
    assert_eq!(result.leading(), Some(Color::Red));
}

#[test]
fn steps_away_from_a_capture() {
    // 14-18 would be jumped by the man on 23.
    let result = search(&game_of("B:B14:R23"), Mode::depth(3, None), Weights::default()).unwrap();
    assert_eq!(result.best_move.to_string(), "14-17");
    assert!(result.score > -Score::WIN + Score(10));
}

#[test]
fn seeks_repetition_when_behind() {
    // A lone black king against two red kings takes the draw on offer.
    let mut game = game_of("B:BK1:RK30,K32");
    play(&mut game, &["1-5", "32-27", "5-1", "27-32"]);
    assert_eq!(game.status(), GameStatus::Ongoing);

    let result = search(&game, Mode::depth(4, None), Weights::default()).unwrap();
    assert_eq!(result.best_move.to_string(), "1-5");
    assert_eq!(result.score, Score::DRAW);
}

#[test]
fn same_position_same_answer() {
    let game = Game::start_position();
    let weights = Weights::default();
    let first = search(&game, Mode::depth(6, None), weights).unwrap();
    let second = search(&game, Mode::depth(6, None), weights).unwrap();
    assert_eq!(first.best_move, second.best_move);
    assert_eq!(first.score, second.score);
    assert_eq!(first.pv, second.pv);
}

#[test]
fn principal_variation_is_playable() {
    let game = Game::start_position();
    let result = search(&game, Mode::depth(5, None), Weights::MATERIAL).unwrap();
    let mut position = *game.position();
    for move_ in &result.pv {
        position.do_legal_move(move_).unwrap();
    }
    assert_eq!(result.pv[0], result.best_move);
}

#[test]
fn time_budget_is_respected() {
    let budget = Duration::from_millis(100);
    let game = Game::start_position();
    let result = search(&game, Mode::movetime(budget, None), Weights::default()).unwrap();
    assert!(result.depth >= 1);
    assert!(result.stopped || result.depth == coretypes::MAX_DEPTH || result.score.is_decisive());
    assert!(result.elapsed < budget + Duration::from_millis(900));
    assert!(game.position().is_legal_move(&result.best_move));
}

#[test]
fn engine_and_search_agree() {
    let game = game_of("B:B5,6,10,K19:R21,22,27,K8");
    let expected = search(&game, Mode::depth(5, None), Weights::default()).unwrap();

    let mut engine = EngineBuilder::new().game(game).build();
    let result = engine.search_sync(Mode::depth(5, None)).unwrap();
    assert_eq!(result.best_move, expected.best_move);
    assert_eq!(result.score, expected.score);
}
