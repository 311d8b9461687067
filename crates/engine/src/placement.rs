//! Placement validity, stamping and line clearing.

use blockgrid_core::{Board, Cell, Color, Piece, Position, Shape};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Cells belonging to full rows or full columns.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ClearMask {
    width: usize,
    height: usize,
    cells: Vec<bool>,
    full_rows: SmallVec<[usize; 8]>,
    full_columns: SmallVec<[usize; 8]>,
}

impl ClearMask {
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width * height],
            full_rows: SmallVec::new(),
            full_columns: SmallVec::new(),
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return false;
        }
        self.cells[y as usize * self.width + x as usize]
    }

    /// Number of distinct marked cells
    pub fn cell_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Full rows plus full columns
    pub fn line_count(&self) -> usize {
        self.full_rows.len() + self.full_columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.full_rows.is_empty() && self.full_columns.is_empty()
    }

    pub fn full_rows(&self) -> &[usize] {
        &self.full_rows
    }

    pub fn full_columns(&self) -> &[usize] {
        &self.full_columns
    }

    /// Marked (x, y) cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &marked)| marked)
            .map(move |(idx, _)| (idx % width, idx / width))
    }
}

/// Board after clearing plus what was removed.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct LineClear {
    pub board: Board,
    /// cleared cells / board width
    pub lines: u32,
    pub mask: ClearMask,
}

/// Full result of stamping a piece and clearing lines.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Placement {
    /// Board after clearing
    pub board: Board,
    /// Board with the piece stamped, before clearing
    pub stamped: Board,
    pub lines: u32,
    pub mask: ClearMask,
    pub cells_placed: u32,
    /// Cells of the placed piece that sit inside a cleared line
    pub cells_in_cleared_lines: u32,
}

/// Every filled shape cell lands on an in-bounds empty board cell.
pub fn can_place(board: &Board, shape: &Shape, pos: Position) -> bool {
    shape
        .filled_cells()
        .all(|(dx, dy)| board.is_free(pos.x + dx as i32, pos.y + dy as i32))
}

/// Stamp the piece with its color. Returns the board unchanged when the
/// placement is invalid.
pub fn place(board: &Board, piece: &Piece, pos: Position) -> Board {
    let mut next = board.clone();
    if can_place(board, &piece.shape, pos) {
        stamp(&mut next, piece, pos);
    }
    next
}

fn stamp(board: &mut Board, piece: &Piece, pos: Position) {
    for (dx, dy) in piece.shape.filled_cells() {
        board.set(pos.x + dx as i32, pos.y + dy as i32, Cell::Filled(piece.color));
    }
}

/// Mark every cell of every full row and full column.
pub fn cells_to_clear(board: &Board) -> ClearMask {
    let (width, height) = (board.width(), board.height());
    let mut mask = ClearMask::empty(width, height);

    for y in 0..height {
        if board.is_row_full(y) {
            mask.full_rows.push(y);
            mask.cells[y * width..(y + 1) * width].fill(true);
        }
    }
    for x in 0..width {
        if board.is_column_full(x) {
            mask.full_columns.push(x);
            for y in 0..height {
                mask.cells[y * width + x] = true;
            }
        }
    }
    mask
}

pub fn clear_lines(board: &Board) -> LineClear {
    let mask = cells_to_clear(board);
    let mut next = board.clone();
    for (x, y) in mask.cells() {
        next.set(x as i32, y as i32, Cell::Empty);
    }
    let lines = (mask.cell_count() / board.width()) as u32;
    LineClear {
        board: next,
        lines,
        mask,
    }
}

/// Cells that would clear if `shape` were placed at `pos`. Empty for an
/// invalid placement.
pub fn preview_clear(board: &Board, shape: &Shape, pos: Position) -> ClearMask {
    if !can_place(board, shape, pos) {
        return ClearMask::empty(board.width(), board.height());
    }
    let mut next = board.clone();
    for (dx, dy) in shape.filled_cells() {
        // color is irrelevant for fullness
        next.set(pos.x + dx as i32, pos.y + dy as i32, Cell::Filled(Color::Red));
    }
    cells_to_clear(&next)
}

/// Stamp, clear and count. `None` when the placement is invalid.
pub fn apply_placement(board: &Board, piece: &Piece, pos: Position) -> Option<Placement> {
    if !can_place(board, &piece.shape, pos) {
        return None;
    }
    let mut stamped = board.clone();
    stamp(&mut stamped, piece, pos);
    let cleared = clear_lines(&stamped);
    let cells_in_cleared_lines = piece
        .shape
        .filled_cells()
        .filter(|&(dx, dy)| cleared.mask.contains(pos.x + dx as i32, pos.y + dy as i32))
        .count() as u32;

    Some(Placement {
        board: cleared.board,
        stamped,
        lines: cleared.lines,
        mask: cleared.mask,
        cells_placed: piece.size() as u32,
        cells_in_cleared_lines,
    })
}

/// True iff no piece fits anywhere. An empty piece list counts as over.
pub fn is_game_over<'a, I>(board: &Board, pieces: I) -> bool
where
    I: IntoIterator<Item = &'a Piece>,
{
    !pieces
        .into_iter()
        .any(|piece| crate::positions::has_valid_position(board, &piece.shape))
}
