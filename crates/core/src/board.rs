//! board representation - row-major cells, dimensions fixed at construction
//! y = 0 is the top row, x = 0 the left column

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::piece::Color;

/// A single grid cell. Either empty or filled with a color tag, nothing in between.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Filled(Color),
}

impl Cell {
    #[inline(always)]
    pub fn is_filled(self) -> bool {
        matches!(self, Cell::Filled(_))
    }

    #[inline(always)]
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn color(self) -> Option<Color> {
        match self {
            Cell::Empty => None,
            Cell::Filled(color) => Some(color),
        }
    }
}

/// Fixed-size grid of cells. Default is 8x8.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Default for Board {
    fn default() -> Self {
        Self::with_size(Self::DEFAULT_WIDTH, Self::DEFAULT_HEIGHT)
    }
}

impl Board {
    pub const DEFAULT_WIDTH: usize = 8;
    pub const DEFAULT_HEIGHT: usize = 8;

    pub fn new() -> Self {
        Self::default()
    }

    /// Empty board of the given size. Zero dimensions are bumped to 1.
    pub fn with_size(width: usize, height: usize) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
        }
    }

    /// Parse a board from text rows: `.` is empty, anything else is filled.
    /// Filled cells take `color`. Returns `None` for empty or ragged input.
    pub fn from_ascii(rows: &[&str], color: Color) -> Option<Self> {
        let height = rows.len();
        let width = rows.first()?.chars().count();
        if width == 0 || rows.iter().any(|row| row.chars().count() != width) {
            return None;
        }
        let cells = rows
            .iter()
            .flat_map(|row| row.chars())
            .map(|ch| if ch == '.' { Cell::Empty } else { Cell::Filled(color) })
            .collect();
        Some(Self {
            width,
            height,
            cells,
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

    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some()
    }

    /// Cell at (x, y), `None` when out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Out-of-bounds counts as not filled
    #[inline]
    pub fn is_filled(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(Cell::Filled(_)))
    }

    /// In bounds and empty
    #[inline]
    pub fn is_free(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(Cell::Empty))
    }

    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    pub fn row_fill(&self, y: usize) -> usize {
        if y >= self.height {
            return 0;
        }
        let start = y * self.width;
        self.cells[start..start + self.width]
            .iter()
            .filter(|cell| cell.is_filled())
            .count()
    }

    pub fn column_fill(&self, x: usize) -> usize {
        if x >= self.width {
            return 0;
        }
        (0..self.height)
            .filter(|&y| self.cells[y * self.width + x].is_filled())
            .count()
    }

    pub fn is_row_full(&self, y: usize) -> bool {
        y < self.height && self.row_fill(y) == self.width
    }

    pub fn is_column_full(&self, x: usize) -> bool {
        x < self.width && self.column_fill(x) == self.height
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_filled()).count()
    }

    /// True when no cell is occupied
    pub fn is_clear(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_empty())
    }

    pub fn fill_ratio(&self) -> f32 {
        self.filled_count() as f32 / self.cells.len() as f32
    }

    /// Row-major cell slice
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width)
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for cell in row {
                write!(f, "{}", if cell.is_filled() { '#' } else { '.' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// serialized as a list of rows so the persisted form stays readable
impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let rows: Vec<&[Cell]> = self.rows().collect();
        rows.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let rows: Vec<Vec<Cell>> = Vec::deserialize(deserializer)?;
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(serde::de::Error::custom("board must have at least one cell"));
        }
        if rows.iter().any(|row| row.len() != width) {
            return Err(serde::de::Error::custom("board rows must share one width"));
        }
        Ok(Board {
            width,
            height,
            cells: rows.into_iter().flatten().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty_8x8() {
        let b = Board::new();
        assert_eq!(b.width(), 8);
        assert_eq!(b.height(), 8);
        assert!(b.is_clear());
        assert_eq!(b.filled_count(), 0);
    }

    #[test]
    fn test_set_get() {
        let mut b = Board::new();
        assert!(b.set(5, 2, Cell::Filled(Color::Red)));
        assert_eq!(b.get(5, 2), Some(Cell::Filled(Color::Red)));
        assert!(b.is_filled(5, 2));
        assert!(!b.is_free(5, 2));
        assert!(b.is_free(4, 2));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut b = Board::new();
        assert_eq!(b.get(-1, 0), None);
        assert_eq!(b.get(0, 8), None);
        assert!(!b.set(8, 0, Cell::Filled(Color::Blue)));
        assert!(!b.is_free(8, 0));
        assert!(!b.is_filled(8, 0));
    }

    #[test]
    fn test_row_and_column_full() {
        let mut b = Board::new();
        for x in 0..8 {
            b.set(x, 3, Cell::Filled(Color::Green));
        }
        assert!(b.is_row_full(3));
        assert!(!b.is_row_full(2));
        assert_eq!(b.column_fill(0), 1);
        assert!(!b.is_column_full(0));
    }

    #[test]
    fn test_from_ascii() {
        let b = Board::from_ascii(&["#..", "...", "..#"], Color::Purple).expect("valid rows");
        assert_eq!(b.width(), 3);
        assert_eq!(b.height(), 3);
        assert!(b.is_filled(0, 0));
        assert!(b.is_filled(2, 2));
        assert_eq!(b.filled_count(), 2);
        assert!(Board::from_ascii(&["##", "#"], Color::Red).is_none());
        assert!(Board::from_ascii(&[], Color::Red).is_none());
    }

    #[test]
    fn test_zero_size_bumped() {
        let b = Board::with_size(0, 0);
        assert_eq!(b.width(), 1);
        assert_eq!(b.height(), 1);
    }

    #[test]
    fn test_serde_rows() {
        let mut b = Board::with_size(3, 2);
        b.set(1, 1, Cell::Filled(Color::Orange));
        let json = serde_json::to_string(&b).expect("serialize");
        let back: Board = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(b, back);

        let ragged = r#"[["Empty"],["Empty","Empty"]]"#;
        assert!(serde_json::from_str::<Board>(ragged).is_err());
    }
}
