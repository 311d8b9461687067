//! Piece types: colors, difficulty tags, matrix shapes and dealt pieces.

use serde::{Deserialize, Serialize};

use crate::error::ShapeError;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
}

impl Color {
    pub const ALL: [Color; 6] = [
        Color::Red,
        Color::Blue,
        Color::Green,
        Color::Yellow,
        Color::Purple,
        Color::Orange,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Purple => "purple",
            Color::Orange => "orange",
        }
    }
}

/// Difficulty tag attached to catalogue shapes.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// Coarse shape family, computed once when a shape is built.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum ShapeClass {
    /// fully filled 1xN or Nx1
    Line,
    /// fully filled NxN
    Square,
    /// one full edge row joined to one full edge column
    L,
    T,
    S,
    Other,
}

pub const MAX_SHAPE_SIDE: usize = 16;

const T_PATTERN: [&[u8]; 2] = [&[1, 1, 1], &[0, 1, 0]];
const S_PATTERNS: [[&[u8]; 2]; 2] = [[&[0, 1, 1], &[1, 1, 0]], [&[1, 1, 0], &[0, 1, 1]]];

/// Rectangular matrix of filled / empty cells with at least one filled cell.
///
/// Offsets are (dx, dy) with dx along a row and dy down the rows, so the
/// matrix entry `rows[dy][dx]` covers board cell `(x + dx, y + dy)`.
#[derive(Clone, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct Shape {
    width: usize,
    height: usize,
    cells: Vec<bool>,
    size: usize,
    class: ShapeClass,
}

impl Shape {
    /// Build a shape from matrix rows, nonzero entries are filled.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, ShapeError> {
        let height = rows.len();
        if height == 0 {
            return Err(ShapeError::Empty);
        }
        let width = rows[0].as_ref().len();
        if width == 0 {
            return Err(ShapeError::Empty);
        }
        for (row, r) in rows.iter().enumerate() {
            let len = r.as_ref().len();
            if len != width {
                return Err(ShapeError::Ragged {
                    row,
                    expected: width,
                    found: len,
                });
            }
        }
        if width > MAX_SHAPE_SIDE || height > MAX_SHAPE_SIDE {
            return Err(ShapeError::TooLarge {
                width,
                height,
                max: MAX_SHAPE_SIDE,
            });
        }

        let cells: Vec<bool> = rows
            .iter()
            .flat_map(|r| r.as_ref().iter().map(|&v| v != 0))
            .collect();
        let size = cells.iter().filter(|&&c| c).count();
        if size == 0 {
            return Err(ShapeError::NoFilledCells);
        }
        let class = classify(width, height, &cells);
        Ok(Self {
            width,
            height,
            cells,
            size,
            class,
        })
    }

    #[inline(always)]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of filled cells
    #[inline(always)]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline(always)]
    pub fn class(&self) -> ShapeClass {
        self.class
    }

    /// Single row or single column, regardless of gaps
    pub fn is_straight(&self) -> bool {
        self.width == 1 || self.height == 1
    }

    pub fn is_filled(&self, dx: usize, dy: usize) -> bool {
        dx < self.width && dy < self.height && self.cells[dy * self.width + dx]
    }

    /// Filled (dx, dy) offsets in row-major order
    pub fn filled_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &filled)| filled)
            .map(move |(idx, _)| (idx % width, idx / width))
    }

    /// Filled cells in matrix row `dy`
    pub fn row_size(&self, dy: usize) -> usize {
        if dy >= self.height {
            return 0;
        }
        self.cells[dy * self.width..(dy + 1) * self.width]
            .iter()
            .filter(|&&c| c)
            .count()
    }

    /// Filled cells in matrix column `dx`
    pub fn column_size(&self, dx: usize) -> usize {
        if dx >= self.width {
            return 0;
        }
        (0..self.height)
            .filter(|&dy| self.cells[dy * self.width + dx])
            .count()
    }

    /// Filled cells over bounding box area
    pub fn compactness(&self) -> f32 {
        self.size as f32 / (self.width * self.height) as f32
    }

    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().map(|&c| u8::from(c)).collect())
            .collect()
    }
}

impl TryFrom<Vec<Vec<u8>>> for Shape {
    type Error = ShapeError;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        Shape::from_rows(&rows)
    }
}

impl From<Shape> for Vec<Vec<u8>> {
    fn from(shape: Shape) -> Self {
        shape.to_rows()
    }
}

fn classify(width: usize, height: usize, cells: &[bool]) -> ShapeClass {
    let full = cells.iter().all(|&c| c);
    if full {
        if width == 1 || height == 1 {
            return ShapeClass::Line;
        }
        if width == height {
            return ShapeClass::Square;
        }
        return ShapeClass::Other;
    }
    if is_corner(width, height, cells) {
        return ShapeClass::L;
    }
    if matches_rotation(width, height, cells, &T_PATTERN) {
        return ShapeClass::T;
    }
    if S_PATTERNS
        .iter()
        .any(|pattern| matches_rotation(width, height, cells, pattern))
    {
        return ShapeClass::S;
    }
    ShapeClass::Other
}

fn is_corner(width: usize, height: usize, cells: &[bool]) -> bool {
    if width < 2 || height < 2 {
        return false;
    }
    for row in [0, height - 1] {
        for col in [0, width - 1] {
            let matches = (0..height).all(|y| {
                (0..width).all(|x| cells[y * width + x] == (y == row || x == col))
            });
            if matches {
                return true;
            }
        }
    }
    false
}

fn matches_rotation(width: usize, height: usize, cells: &[bool], pattern: &[&[u8]]) -> bool {
    let mut p_height = pattern.len();
    let mut p_width = pattern[0].len();
    let mut p_cells: Vec<bool> = pattern
        .iter()
        .flat_map(|r| r.iter().map(|&v| v != 0))
        .collect();
    for _ in 0..4 {
        if p_width == width && p_height == height && p_cells == cells {
            return true;
        }
        let (w, h, rotated) = rotate_cw(p_width, p_height, &p_cells);
        p_width = w;
        p_height = h;
        p_cells = rotated;
    }
    false
}

fn rotate_cw(width: usize, height: usize, cells: &[bool]) -> (usize, usize, Vec<bool>) {
    let (new_w, new_h) = (height, width);
    let mut out = vec![false; cells.len()];
    for y in 0..height {
        for x in 0..width {
            // (x, y) lands at column (height - 1 - y), row x
            out[x * new_w + (height - 1 - y)] = cells[y * width + x];
        }
    }
    (new_w, new_h, out)
}

/// Identity assigned to each dealt piece. Unique within a session.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(pub u64);

/// A dealt piece: catalogue shape plus color and identity.
#[derive(Clone, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    /// catalogue id, e.g. `square-2x2`
    pub kind: String,
    pub shape: Shape,
    pub color: Color,
    pub difficulty: Difficulty,
}

impl Piece {
    pub fn new(
        id: PieceId,
        kind: impl Into<String>,
        shape: Shape,
        color: Color,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            id,
            kind: kind.into(),
            shape,
            color,
            difficulty,
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.shape.size()
    }

    #[inline]
    pub fn class(&self) -> ShapeClass {
        self.shape.class()
    }

    /// Same shape, new identity and color
    pub fn retagged(&self, id: PieceId, color: Color) -> Self {
        Self {
            id,
            color,
            ..self.clone()
        }
    }
}
