//! Games played through the Controller, as a front end would drive them.

use std::time::Duration;

use checkers_engine::coretypes::Color;
use checkers_engine::error::ErrorKind;
use checkers_engine::player::PendingMove;
use checkers_engine::*;

fn poll(pending: PendingMove) -> SearchResult {
    loop {
        if let Some(result) = pending.recv_timeout(Duration::from_millis(10)) {
            return result.unwrap();
        }
    }
}

#[test]
fn human_against_computer() {
    let config = GameConfig::new()
        .black(PlayerKind::Human)
        .red(PlayerKind::Computer(Difficulty::Medium));
    let mut controller = Controller::new(config);

    assert!(matches!(
        controller.request_move().unwrap(),
        MoveRequest::AwaitingInput
    ));
    let move_ = controller.game().position().parse_move("9-14").unwrap();
    controller.submit_human_move(move_).unwrap();
    match controller.request_move().unwrap() {
        MoveRequest::Ready(move_) => controller.apply_move(move_).unwrap(),
        other => panic!("expected the submitted move, got {other:?}"),
    };

    let result = match controller.request_move().unwrap() {
        MoveRequest::Pending(pending) => poll(pending),
        other => panic!("expected a pending search, got {other:?}"),
    };
    assert_eq!(result.player, Color::Red);
    assert!(result.depth <= 4);
    controller.apply_move(result.best_move).unwrap();
    assert_eq!(controller.side_to_move(), Color::Black);
}

#[test]
fn illegal_moves_change_nothing() {
    let mut controller = Controller::new(
        GameConfig::new()
            .black(PlayerKind::Human)
            .red(PlayerKind::Human),
    );
    let red_move = Position::start_position()
        .with_side_to_move(Color::Red)
        .parse_move("22-18")
        .unwrap();

    assert_eq!(
        controller.apply_move(red_move.clone()).unwrap_err().kind(),
        ErrorKind::IllegalMove
    );
    assert_eq!(
        controller.submit_human_move(red_move).unwrap_err().kind(),
        ErrorKind::IllegalMove
    );
    assert!(controller.game().history().is_empty());
    assert_eq!(*controller.game().position(), Position::start_position());
}

#[test]
fn undo_while_computer_thinks() {
    let config = GameConfig::new()
        .black(PlayerKind::Human)
        .red(PlayerKind::Engine(Mode::infinite()));
    let mut controller = Controller::new(config);

    let move_ = controller.game().position().parse_move("11-15").unwrap();
    controller.apply_move(move_).unwrap();
    let pending = match controller.request_move().unwrap() {
        MoveRequest::Pending(pending) => pending,
        other => panic!("expected a pending search, got {other:?}"),
    };

    // The human takes back the move before the computer answers.
    controller.undo().unwrap();
    assert_eq!(pending.wait().unwrap_err().kind(), ErrorKind::SearchCancelled);
    assert!(controller.game().history().is_empty());
    assert_eq!(controller.undos_left(Color::Black), Some(1));
}

#[test]
fn computers_play_to_the_end() {
    let config = GameConfig::new()
        .black(PlayerKind::Engine(Mode::depth(2, None)))
        .red(PlayerKind::Computer(Difficulty::Easy))
        .seed(Some(21));
    let mut controller = Controller::new(config);

    while !controller.status().is_over() {
        controller.play_turn().unwrap();
    }
    assert!(matches!(
        controller.request_move().unwrap(),
        MoveRequest::NoLegalMove
    ));
    let error = controller
        .apply_move(controller.game().history().records()[0].move_.clone())
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::GameOver);
}

#[test]
fn new_game_resets_everything() {
    let mut controller = Controller::new(
        GameConfig::new()
            .black(PlayerKind::Human)
            .red(PlayerKind::Human)
            .undo_allowance(None),
    );
    let move_ = controller.game().position().parse_move("11-15").unwrap();
    controller.apply_move(move_).unwrap();
    controller.undo().unwrap();
    assert_eq!(controller.undos_left(Color::Black), None);

    controller.new_game(GameConfig::new().first(Color::Red).red(PlayerKind::Human));
    assert!(controller.game().history().is_empty());
    assert_eq!(controller.side_to_move(), Color::Red);
    assert_eq!(controller.undos_left(Color::Red), Some(2));
}
