//! Single-game controller. Every state change comes from one of the discrete
//! calls below; events go to the sink after the state is updated.

use blockgrid_core::{
    Board, Catalogue, Piece, PieceTriple, Point, Position, SessionSnapshot, TRIPLE_SIZE,
};
use blockgrid_engine::{
    apply_placement, find_all_valid_positions, find_nearest_valid_position, is_game_over,
    preview_clear, ClearMask, ComboState, PositionList, ScoreCalculator, ScoreResult,
};
use blockgrid_search::{BlockGenerator, GeneratorState};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::sink::{NoopSink, SessionEvent, SessionSink};

/// Piece being dragged plus its cached anchors.
#[derive(Clone, Debug, PartialEq)]
pub struct DragState {
    pub slot: usize,
    pub piece: Piece,
    pub valid: PositionList,
    /// Last anchor `drag_to` snapped to
    pub snapped: Option<Position>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlacementOutcome {
    pub board: Board,
    pub score: ScoreResult,
    pub mask: ClearMask,
    /// A new triple was dealt because the last slot emptied
    pub dealt: bool,
    pub game_over: bool,
}

pub struct Session {
    config: SessionConfig,
    board: Board,
    triple: PieceTriple,
    score: u64,
    best_score: u64,
    round: u32,
    pieces_placed: u32,
    calculator: ScoreCalculator,
    generator: BlockGenerator,
    generator_state: GeneratorState,
    rng: StdRng,
    sink: Box<dyn SessionSink>,
    drag: Option<DragState>,
    game_over: bool,
}

impl Session {
    /// Standard catalogue, seeded rng, no sink.
    pub fn new(config: SessionConfig, seed: u64) -> Result<Self, SessionError> {
        Self::with_catalogue(config, Catalogue::standard(), seed)
    }

    pub fn with_catalogue(
        config: SessionConfig,
        catalogue: Catalogue,
        seed: u64,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        let generator = BlockGenerator::new(catalogue, config.generator.clone())?;
        let mut rng = StdRng::seed_from_u64(seed);
        let generator_state = generator.initial_state(&mut rng);

        Ok(Self {
            board: Board::with_size(config.width, config.height),
            triple: PieceTriple::empty(),
            score: 0,
            best_score: 0,
            round: 0,
            pieces_placed: 0,
            calculator: ScoreCalculator::new(config.scoring.clone()),
            generator,
            generator_state,
            rng,
            sink: Box::new(NoopSink),
            drag: None,
            game_over: false,
            config,
        })
    }

    pub fn with_sink(mut self, sink: Box<dyn SessionSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn triple(&self) -> &PieceTriple {
        &self.triple
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    /// Triples dealt so far in this game.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn pieces_placed(&self) -> u32 {
        self.pieces_placed
    }

    pub fn combo(&self) -> &ComboState {
        self.calculator.combo()
    }

    pub fn drag(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Deal the first triple of a game.
    pub fn start(&mut self) -> &PieceTriple {
        self.emit(SessionEvent::GameStarted);
        self.deal();
        self.refresh_game_over();
        &self.triple
    }

    pub fn start_drag(&mut self, slot: usize) -> Result<DragState, SessionError> {
        if self.game_over {
            return Err(SessionError::GameOver);
        }
        let piece = self.piece_in(slot)?.clone();
        let drag = DragState {
            slot,
            valid: find_all_valid_positions(&self.board, &piece.shape),
            piece,
            snapped: None,
        };
        self.drag = Some(drag.clone());
        Ok(drag)
    }

    /// Snap the pointer (in cell units) to an anchor for the dragged piece.
    pub fn drag_to(&mut self, point: Point) -> Option<Position> {
        let drag = self.drag.as_mut()?;
        let snapped =
            find_nearest_valid_position(&drag.valid, point, drag.snapped, &self.config.snap);
        drag.snapped = snapped;
        snapped
    }

    /// Cells the dragged piece would clear at `position`.
    pub fn hover_preview(&self, position: Position) -> ClearMask {
        match &self.drag {
            Some(drag) => preview_clear(&self.board, &drag.piece.shape, position),
            None => ClearMask::empty(self.board.width(), self.board.height()),
        }
    }

    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    pub fn place(
        &mut self,
        slot: usize,
        position: Position,
    ) -> Result<PlacementOutcome, SessionError> {
        if self.game_over {
            return Err(SessionError::GameOver);
        }
        let piece = self.piece_in(slot)?.clone();
        let placement = apply_placement(&self.board, &piece, position).ok_or(
            SessionError::InvalidPlacement {
                slot,
                x: position.x,
                y: position.y,
            },
        )?;

        let score = self.calculator.score_placement(&placement, &piece);
        self.board = placement.board;
        self.triple.take(slot);
        self.score += u64::from(score.total_points);
        self.best_score = self.best_score.max(self.score);
        self.pieces_placed += 1;
        self.drag = None;

        self.emit(SessionEvent::PiecePlaced {
            piece,
            position,
            score,
        });
        if score.cleared_lines > 0 {
            self.emit(SessionEvent::LinesCleared {
                lines: score.cleared_lines,
                combo: score.combo_level,
            });
        }

        let dealt = self.triple.is_exhausted();
        if dealt {
            self.deal();
        }
        self.refresh_game_over();

        Ok(PlacementOutcome {
            board: self.board.clone(),
            score,
            mask: placement.mask,
            dealt,
            game_over: self.game_over,
        })
    }

    /// New game on an empty board. The best score survives.
    pub fn reset(&mut self) -> &PieceTriple {
        self.board = Board::with_size(self.config.width, self.config.height);
        self.triple = PieceTriple::empty();
        self.score = 0;
        self.round = 0;
        self.pieces_placed = 0;
        self.calculator.reset_combo();
        self.generator_state = self.generator.initial_state(&mut self.rng);
        self.drag = None;
        self.game_over = false;
        self.emit(SessionEvent::Reset);
        self.start()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            board: self.board.clone(),
            triple: self.triple.clone(),
            score: self.score,
            best_score: self.best_score,
            round: self.round,
        }
    }

    /// Resume from persisted state. Combo state is not persisted and starts
    /// closed. An exhausted triple is replaced with a fresh deal.
    pub fn restore(&mut self, snapshot: SessionSnapshot) -> Result<(), SessionError> {
        let (width, height) = (self.config.width.max(1), self.config.height.max(1));
        if snapshot.board.width() != width || snapshot.board.height() != height {
            return Err(SessionError::BoardMismatch {
                width,
                height,
                found_width: snapshot.board.width(),
                found_height: snapshot.board.height(),
            });
        }

        self.board = snapshot.board;
        self.triple = snapshot.triple;
        self.score = snapshot.score;
        self.best_score = snapshot.best_score.max(snapshot.score);
        self.round = snapshot.round;
        self.calculator.reset_combo();
        self.drag = None;
        if self.triple.is_exhausted() {
            self.deal();
        }
        self.refresh_game_over();
        Ok(())
    }

    /// The piece the next bag draw would produce.
    pub fn preview_block(&self) -> Option<Piece> {
        self.generator.preview_block(&self.generator_state)
    }

    fn piece_in(&self, slot: usize) -> Result<&Piece, SessionError> {
        if slot >= TRIPLE_SIZE {
            return Err(SessionError::UnknownSlot(slot));
        }
        self.triple.get(slot).ok_or(SessionError::EmptySlot(slot))
    }

    fn deal(&mut self) {
        let (state, dealt) =
            self.generator
                .next_blocks(self.generator_state.clone(), &self.board, &mut self.rng);
        self.generator_state = state;
        self.round += 1;
        self.emit(SessionEvent::BlocksGenerated {
            pieces: dealt.pieces.to_vec(),
            guaranteed: dealt.is_guaranteed(),
        });
        self.triple = PieceTriple::new(dealt.pieces);
    }

    fn refresh_game_over(&mut self) {
        let over = is_game_over(&self.board, self.triple.remaining());
        let newly_over = over && !self.game_over;
        self.game_over = over;
        if newly_over {
            self.emit(SessionEvent::GameOver { score: self.score });
        }
    }

    fn emit(&mut self, event: SessionEvent) {
        self.sink.on_event(&event);
    }
}
