// Full-game scenarios driven through the public engine API.

use puyotui::board::CRANE_ROW;
use puyotui::{
    Board, Game, GameError, GameState, Position, Puyo, PuyoColor, PuyoSeqProvider, Rotation,
};

fn provider() -> PuyoSeqProvider {
    PuyoSeqProvider::with_default_table().expect("bundled table loads")
}

fn game_from(rows: &[&str]) -> Game {
    let board = Board::from_rows(rows).expect("valid fixture");
    let seq = provider().create_puyo_seq(0).unwrap();
    Game::from_board(board, seq)
}

/// Tick until a pair is controllable, recording the score after every chain step.
fn resolve(game: Game) -> (Game, Vec<u32>) {
    let mut game = game;
    let mut step_scores = Vec::new();
    while matches!(
        game.state(),
        GameState::Dropping | GameState::CheckingChains | GameState::FlashingPuyos
    ) {
        let next = game.update_game();
        if next.state() == GameState::FlashingPuyos && game.state() == GameState::CheckingChains {
            step_scores.push(next.last_step_score());
        }
        game = next;
    }
    (game, step_scores)
}

mod cascades {
    use super::*;

    #[test]
    fn red_seven_then_two_blue_fours() {
        let (game, steps) = resolve(game_from(&[
            "bbr.bb", //
            "rrrrrr", //
            "bbgybb",
        ]));
        assert_eq!(steps, vec![280, 640]);
        assert_eq!(game.score(), 920);
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.chain_count(), 0);
        assert_eq!(game.last_chain(), 2);
        assert_eq!(game.max_chain(), 2);
        assert_eq!(game.board().puyo_count(), 2);
    }

    #[test]
    fn second_step_with_two_colours() {
        let (game, steps) = resolve(game_from(&[
            "bbr.gg", //
            "rrrrrr", //
            "bbgygg",
        ]));
        assert_eq!(steps, vec![280, 880]);
        assert_eq!(game.score(), 1160);
    }

    #[test]
    fn second_step_with_four_and_six() {
        let (game, steps) = resolve(game_from(&[
            "bbrbbb", //
            "rrrrrr", //
            "bbgbbb",
        ]));
        assert_eq!(steps, vec![280, 1100]);
        assert_eq!(game.score(), 1380);
    }

    #[test]
    fn second_step_with_two_fives() {
        let (game, steps) = resolve(game_from(&[
            "b....b", //
            "bbr.bb", //
            "rrrrrr", //
            "bbgybb",
        ]));
        assert_eq!(steps, vec![280, 1200]);
        assert_eq!(game.score(), 1480);
    }

    #[test]
    fn group_of_three_is_left_alone() {
        let (game, steps) = resolve(game_from(&["r.....", "rr...."]));
        assert!(steps.is_empty());
        assert_eq!(game.score(), 0);
        assert_eq!(game.board().puyo_count(), 3);
    }

    #[test]
    fn floating_puyos_settle_before_checking() {
        // Blue column of four assembled by gravity.
        let (game, steps) = resolve(game_from(&[
            "b.....", //
            "......", //
            "b.....", //
            "......", //
            "bb....",
        ]));
        assert_eq!(steps, vec![40]);
        assert!(game.board().is_board_empty());
    }

    #[test]
    fn score_never_decreases_during_cascade() {
        let mut game = game_from(&["b....b", "bbr.bb", "rrrrrr", "bbgybb"]);
        let mut last = 0;
        while game.state() != GameState::Playing {
            game = game.update_game();
            assert!(game.score() >= last);
            last = game.score();
        }
    }
}

mod rows {
    use super::*;

    #[test]
    fn crane_row_puyo_stays_put_and_never_clears() {
        // Reserved row: a crane-row puyo above a red column of three does not fall or join it.
        let board = Board::from_rows(&["r.....", "r.....", "r....."])
            .unwrap()
            .set(0, CRANE_ROW as i32, Puyo::new(PuyoColor::Red))
            .unwrap();
        let seq = provider().create_puyo_seq(0).unwrap();
        let (game, steps) = resolve(Game::from_board(board, seq));
        assert!(steps.is_empty());
        assert_eq!(game.board().get(0, 0).color, PuyoColor::Red);
        assert_eq!(game.board().puyo_count(), 4);
    }

    #[test]
    fn ghost_row_puyo_falls_into_the_field_and_then_counts() {
        let board = Board::from_rows(&["r.....", "r.....", "r....."])
            .unwrap()
            .set(0, 1, Puyo::new(PuyoColor::Red))
            .unwrap();
        let seq = provider().create_puyo_seq(0).unwrap();
        let (game, steps) = resolve(Game::from_board(board, seq));
        assert_eq!(steps, vec![40]);
        assert!(game.board().is_board_empty());
    }
}

mod play {
    use super::*;

    fn squeezed_spawn() -> Game {
        // Columns 1 and 3 filled to the top of the field without any group.
        let rows: Vec<String> = (0..12)
            .map(|y| {
                let (a, b) = if y % 2 == 0 { ('r', 'b') } else { ('g', 'y') };
                format!(".{a}.{b}..")
            })
            .collect();
        let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
        let (game, _) = resolve(game_from(&rows));
        assert_eq!(game.state(), GameState::Playing);
        game
    }

    #[test]
    fn quick_turn_in_a_well() {
        let game = squeezed_spawn();
        let pair = *game.current_pair().unwrap();
        let turned = game.quick_turn().unwrap();
        let t = turned.current_pair().unwrap();
        assert_eq!(t.rotation, Rotation::Down);
        assert_eq!(t.position, Position::new(2, 1));
        assert_eq!(t.second_position(), pair.position);

        let dropped = turned.hard_drop().unwrap();
        assert_eq!(dropped.board().get(2, 12), pair.main_puyo);
        assert_eq!(dropped.board().get(2, 13), pair.second_puyo);
    }

    #[test]
    fn quick_turn_with_open_side_changes_nothing() {
        let game = Game::start_game(&provider(), Some(5)).unwrap();
        assert!(matches!(game.quick_turn(), Err(GameError::InvalidMove)));
        let right = game.rotate_clockwise().unwrap();
        assert!(matches!(right.quick_turn(), Err(GameError::InvalidMove)));
    }

    #[test]
    fn rotation_rejected_in_a_one_wide_well_bottom() {
        let game = squeezed_spawn();
        let dropped = game.soft_drop().unwrap();
        // Still in the well: neither horizontal orientation nor its kick fits.
        assert!(matches!(
            dropped.rotate_clockwise(),
            Err(GameError::InvalidRotation)
        ));
        assert!(matches!(
            dropped.rotate_counter_clockwise(),
            Err(GameError::InvalidRotation)
        ));
    }

    #[test]
    fn same_seed_same_commands_same_game() {
        let commands: [fn(&Game) -> Result<Game, GameError>; 5] = [
            Game::move_left,
            Game::rotate_clockwise,
            Game::move_right,
            Game::rotate_counter_clockwise,
            Game::hard_drop,
        ];
        let run = |seed| {
            let mut game = Game::start_game(&provider(), Some(seed)).unwrap();
            for round in 0..20 {
                for (i, cmd) in commands.iter().enumerate() {
                    if (round + i) % 3 == 0 || i == commands.len() - 1 {
                        if let Ok(next) = cmd(&game) {
                            game = next;
                        }
                    }
                }
                game = game.run_until_controllable();
                if game.is_game_over() {
                    break;
                }
            }
            game
        };
        assert_eq!(run(77), run(77));
    }

    #[test]
    fn stacking_one_column_ends_the_game() {
        let mut game = Game::start_game(&provider(), Some(3)).unwrap();
        for _ in 0..1000 {
            if game.is_game_over() {
                break;
            }
            game = game.hard_drop().unwrap().run_until_controllable();
        }
        assert!(game.is_game_over());
        assert!(matches!(game.hard_drop(), Err(GameError::GameOver)));
        assert!(game.board().is_column_full(2));
    }
}
