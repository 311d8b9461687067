use blockgrid_core::{Board, Catalogue, Cell, Color, Difficulty, Piece, PieceId, Point, Position, Shape};
use blockgrid_engine::{
    apply_placement, can_place, clear_lines, find_all_valid_positions,
    find_nearest_valid_position, is_game_over, place, ScoreCalculator, ScoringConfig, SnapConfig,
};

fn catalogue_piece(id: &str) -> Piece {
    Catalogue::standard()
        .find(id)
        .expect("catalogue id")
        .instantiate(PieceId(1), Color::Purple)
}

fn custom_piece(rows: &[&[u8]]) -> Piece {
    let shape = Shape::from_rows(rows).expect("valid shape");
    Piece::new(PieceId(9), "custom", shape, Color::Yellow, Difficulty::Easy)
}

fn fill_row_except(board: &mut Board, y: i32, skip: &[i32]) {
    for x in 0..board.width() as i32 {
        if !skip.contains(&x) {
            board.set(x, y, Cell::Filled(Color::Red));
        }
    }
}

/// Place, clear and score in one step, the way a controller does.
fn play(
    calc: &mut ScoreCalculator,
    board: &Board,
    piece: &Piece,
    pos: Position,
) -> (Board, blockgrid_engine::ScoreResult) {
    let placed = apply_placement(board, piece, pos).expect("valid placement");
    let score = calc.score_placement(&placed, piece);
    (placed.board, score)
}

mod placement_scenarios {
    use super::*;

    #[test]
    fn test_square_on_empty_board() {
        let board = Board::new();
        let sq = catalogue_piece("square-2x2");
        assert!(can_place(&board, &sq.shape, Position::new(0, 0)));

        let mut calc = ScoreCalculator::default();
        let (_, score) = play(&mut calc, &board, &sq, Position::new(0, 0));
        assert_eq!(score.cells_placed, 4);
        assert_eq!(score.cleared_lines, 0);
        assert_eq!(score.total_points, 4 * ScoringConfig::classic().points_per_cell);
    }

    #[test]
    fn test_single_completes_row() {
        let mut board = Board::new();
        fill_row_except(&mut board, 3, &[7]);
        let single = custom_piece(&[&[1]]);

        let mut calc = ScoreCalculator::default();
        let (after, score) = play(&mut calc, &board, &single, Position::new(7, 3));
        assert_eq!(score.cleared_lines, 1);
        assert_eq!(score.combo_multiplier, 1);
        assert!(calc.combo().opened);
        assert_eq!(score.total_points, 1 + 10);
        assert_eq!(after.row_fill(3), 0);
    }

    #[test]
    fn test_horizontal_eight_clears_row_zero() {
        let board = Board::new();
        let line = custom_piece(&[&[1, 1, 1, 1, 1, 1, 1, 1]]);
        let stamped = place(&board, &line, Position::new(0, 0));
        let cleared = clear_lines(&stamped);
        assert_eq!(cleared.lines, 1);
        assert_eq!(cleared.board.row_fill(0), 0);
        assert_eq!(cleared.board, board);
    }

    #[test]
    fn test_rows_outside_clear_untouched() {
        let mut board = Board::new();
        fill_row_except(&mut board, 7, &[0, 1]);
        board.set(4, 2, Cell::Filled(Color::Blue));
        let (after, score) = play(
            &mut ScoreCalculator::default(),
            &board,
            &catalogue_piece("hor-2"),
            Position::new(0, 7),
        );
        assert_eq!(score.cleared_lines, 1);
        assert_eq!(after.get(4, 2), Some(Cell::Filled(Color::Blue)));
        assert_eq!(after.filled_count(), 1);
        assert!(!score.board_cleared);
    }

    #[test]
    fn test_cross_clear() {
        let mut board = Board::new();
        fill_row_except(&mut board, 4, &[4]);
        for y in 0..8 {
            if y != 4 {
                board.set(4, y, Cell::Filled(Color::Green));
            }
        }
        let placed = apply_placement(&board, &custom_piece(&[&[1]]), Position::new(4, 4))
            .expect("valid");
        // 15 distinct cells, integer-divided by width
        assert_eq!(placed.mask.line_count(), 2);
        assert_eq!(placed.lines, 1);
        assert!(placed.board.is_clear());
    }
}

mod scoring_scenarios {
    use super::*;

    #[test]
    fn test_board_clear_bonus_gated() {
        let mut board = Board::new();
        fill_row_except(&mut board, 0, &[6, 7]);
        let mut calc = ScoreCalculator::default();
        let (after, score) = play(&mut calc, &board, &catalogue_piece("hor-2"), Position::new(6, 0));
        assert!(after.is_clear());
        assert!(score.board_cleared);
        // placed 2 + line 10 + figure 2x2 + board 300
        assert_eq!(score.total_points, 2 + 10 + 4 + 300);

        let mut board = Board::new();
        fill_row_except(&mut board, 0, &[6, 7]);
        board.set(0, 5, Cell::Filled(Color::Red));
        let (_, score) = play(&mut calc, &board, &catalogue_piece("hor-2"), Position::new(6, 0));
        assert!(!score.board_cleared);
    }

    #[test]
    fn test_complex_figure_fully_cleared() {
        let mut board = Board::new();
        fill_row_except(&mut board, 6, &[0, 1]);
        fill_row_except(&mut board, 7, &[0, 1]);
        board.set(5, 0, Cell::Filled(Color::Red));
        let (_, score) = play(
            &mut ScoreCalculator::default(),
            &board,
            &catalogue_piece("square-2x2"),
            Position::new(0, 6),
        );
        assert_eq!(score.cleared_lines, 2);
        assert_eq!(score.cleared_cell_points, 4 * 5);
        assert_eq!(score.total_points, 4 + 20 + 20);
    }

    #[test]
    fn test_custom_config_points() {
        let config = ScoringConfig {
            points_per_cell: 2,
            ..ScoringConfig::classic()
        };
        let mut calc = ScoreCalculator::new(config);
        let (_, score) = play(
            &mut calc,
            &Board::new(),
            &catalogue_piece("square-3x3"),
            Position::new(2, 2),
        );
        assert_eq!(score.total_points, 18);
    }
}

mod combo_lifecycle {
    use super::*;

    fn clearing_move(calc: &mut ScoreCalculator) -> blockgrid_engine::ScoreResult {
        let mut board = Board::new();
        fill_row_except(&mut board, 7, &[0]);
        board.set(3, 0, Cell::Filled(Color::Red));
        play(calc, &board, &custom_piece(&[&[1]]), Position::new(0, 7)).1
    }

    fn quiet_move(calc: &mut ScoreCalculator) -> blockgrid_engine::ScoreResult {
        play(calc, &Board::new(), &custom_piece(&[&[1]]), Position::new(0, 0)).1
    }

    #[test]
    fn test_combo_grows_then_closes() {
        let mut calc = ScoreCalculator::default();
        assert_eq!(clearing_move(&mut calc).combo_multiplier, 1);
        assert_eq!(clearing_move(&mut calc).combo_multiplier, 1);
        let third = clearing_move(&mut calc);
        assert_eq!(third.combo_multiplier, 2);
        assert_eq!(third.total_points, 1 + 10 * 2);

        for _ in 0..3 {
            quiet_move(&mut calc);
        }
        assert_eq!(calc.combo().counter, 0);
        assert!(!calc.combo().opened);

        let reopened = clearing_move(&mut calc);
        assert_eq!(reopened.combo_multiplier, 1);
        assert_eq!(reopened.combo_level, 0);
    }

    #[test]
    fn test_two_quiet_moves_keep_combo() {
        let mut calc = ScoreCalculator::default();
        clearing_move(&mut calc);
        clearing_move(&mut calc);
        quiet_move(&mut calc);
        quiet_move(&mut calc);
        assert_eq!(clearing_move(&mut calc).combo_multiplier, 2);
    }

    #[test]
    fn test_reset_combo_closes() {
        let mut calc = ScoreCalculator::default();
        clearing_move(&mut calc);
        clearing_move(&mut calc);
        calc.reset_combo();
        assert_eq!(clearing_move(&mut calc).combo_multiplier, 1);
        assert_eq!(calc.combo().counter, 0);
    }
}

mod snapping {
    use super::*;

    #[test]
    fn test_drag_sequence_hysteresis() {
        let board = Board::new();
        let sq = catalogue_piece("square-3x3");
        let valid = find_all_valid_positions(&board, &sq.shape);
        let config = SnapConfig::classic();

        let first = find_nearest_valid_position(&valid, Point::new(2.1, 2.2), None, &config);
        assert_eq!(first, Some(Position::new(2, 2)));

        // between anchors, sticky keeps the last one
        let mid = find_nearest_valid_position(&valid, Point::new(2.5, 2.6), first, &config);
        assert_eq!(mid, Some(Position::new(2, 2)));

        // off the board, sticky drops
        let away = find_nearest_valid_position(&valid, Point::new(12.0, 12.0), mid, &config);
        assert_eq!(away, None);
    }
}

mod game_over {
    use super::*;

    #[test]
    fn test_nearly_full_board() {
        let mut board = Board::new();
        for y in 0..8 {
            fill_row_except(&mut board, y, &[]);
        }
        board.set(3, 3, Cell::Empty);
        let pieces = [catalogue_piece("hor-2"), catalogue_piece("vert-2")];
        assert!(is_game_over(&board, &pieces));
        let with_single = [catalogue_piece("hor-2"), custom_piece(&[&[1]])];
        assert!(!is_game_over(&board, &with_single));
    }

    #[test]
    fn test_empty_board_never_over() {
        let board = Board::new();
        let all: Vec<Piece> = Catalogue::standard()
            .iter()
            .map(|entry| entry.instantiate(PieceId(0), Color::Red))
            .collect();
        for piece in &all {
            assert!(!is_game_over(&board, std::iter::once(piece)));
        }
    }
}
