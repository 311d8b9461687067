//! Shape catalogue. Immutable after construction, indexed by id.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::CatalogueError;
use crate::piece::{Color, Difficulty, Piece, PieceId, Shape};

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct CatalogueEntry {
    pub id: String,
    pub name: String,
    pub difficulty: Difficulty,
    pub shape: Shape,
}

impl CatalogueEntry {
    pub fn new<R: AsRef<[u8]>>(
        id: impl Into<String>,
        name: impl Into<String>,
        difficulty: Difficulty,
        rows: &[R],
    ) -> Result<Self, CatalogueError> {
        let id = id.into();
        let shape = Shape::from_rows(rows).map_err(|source| CatalogueError::InvalidShape {
            id: id.clone(),
            source,
        })?;
        Ok(Self {
            id,
            name: name.into(),
            difficulty,
            shape,
        })
    }

    pub fn instantiate(&self, id: PieceId, color: Color) -> Piece {
        Piece::new(id, self.id.clone(), self.shape.clone(), color, self.difficulty)
    }
}

/// Unvalidated catalogue definition, as read from a data file.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct RawEntry {
    pub id: String,
    pub name: String,
    pub difficulty: Difficulty,
    pub rows: Vec<Vec<u8>>,
}

impl TryFrom<RawEntry> for CatalogueEntry {
    type Error = CatalogueError;

    fn try_from(raw: RawEntry) -> Result<Self, Self::Error> {
        CatalogueEntry::new(raw.id, raw.name, raw.difficulty, &raw.rows)
    }
}

type StandardShape = (&'static str, &'static str, Difficulty, &'static [&'static [u8]]);

const STANDARD_SHAPES: [StandardShape; 17] = [
    ("hor-2", "Horizontal 2", Difficulty::Easy, &[&[1, 1]]),
    ("hor-3", "Horizontal 3", Difficulty::Easy, &[&[1, 1, 1]]),
    ("hor-4", "Horizontal 4", Difficulty::Medium, &[&[1, 1, 1, 1]]),
    ("hor-5", "Horizontal 5", Difficulty::Hard, &[&[1, 1, 1, 1, 1]]),
    ("square-2x2", "Square 2x2", Difficulty::Easy, &[&[1, 1], &[1, 1]]),
    (
        "square-3x3",
        "Square 3x3",
        Difficulty::Hard,
        &[&[1, 1, 1], &[1, 1, 1], &[1, 1, 1]],
    ),
    ("vert-2", "Vertical 2", Difficulty::Easy, &[&[1], &[1]]),
    ("vert-3", "Vertical 3", Difficulty::Easy, &[&[1], &[1], &[1]]),
    ("vert-4", "Vertical 4", Difficulty::Medium, &[&[1], &[1], &[1], &[1]]),
    (
        "vert-5",
        "Vertical 5",
        Difficulty::Hard,
        &[&[1], &[1], &[1], &[1], &[1]],
    ),
    ("corner-2", "Corner 2", Difficulty::Medium, &[&[1, 0], &[1, 1]]),
    (
        "corner-3",
        "Corner 3",
        Difficulty::Hard,
        &[&[1, 1, 1], &[1, 0, 0], &[1, 0, 0]],
    ),
    ("L-shape", "L Shape", Difficulty::Hard, &[&[1, 0], &[1, 0], &[1, 1]]),
    ("rect-2x3", "Rectangle 2x3", Difficulty::Hard, &[&[1, 1, 1], &[1, 1, 1]]),
    ("t-shape", "T Shape", Difficulty::Medium, &[&[1, 1, 1], &[0, 1, 0]]),
    ("s-shape", "S Shape", Difficulty::Hard, &[&[0, 1, 1], &[1, 1, 0]]),
    (
        "3-dots-diagonal",
        "Diagonal Dots",
        Difficulty::Hard,
        &[&[0, 0, 1], &[0, 1, 0], &[1, 0, 0]],
    ),
];

#[derive(Clone, Debug)]
pub struct Catalogue {
    entries: Vec<CatalogueEntry>,
    index: FxHashMap<String, usize>,
}

impl Default for Catalogue {
    fn default() -> Self {
        Self::standard()
    }
}

impl Catalogue {
    /// The built-in 17 shape catalogue.
    pub fn standard() -> Self {
        let entries = STANDARD_SHAPES
            .iter()
            .filter_map(|&(id, name, difficulty, rows)| {
                CatalogueEntry::new(id, name, difficulty, rows).ok()
            })
            .collect();
        Self::index_entries(entries)
    }

    /// Strict construction: any duplicate id or empty input is an error.
    pub fn from_entries(entries: Vec<CatalogueEntry>) -> Result<Self, CatalogueError> {
        if entries.is_empty() {
            return Err(CatalogueError::Empty);
        }
        let mut seen = FxHashMap::default();
        for (idx, entry) in entries.iter().enumerate() {
            if seen.insert(entry.id.clone(), idx).is_some() {
                return Err(CatalogueError::DuplicateId(entry.id.clone()));
            }
        }
        Ok(Self {
            entries,
            index: seen,
        })
    }

    /// Load raw definitions, skipping invalid or duplicate entries.
    /// Skipped entries are reported alongside the catalogue.
    pub fn from_entries_lossy(raw: Vec<RawEntry>) -> (Self, Vec<CatalogueError>) {
        let mut errors = Vec::new();
        let mut entries: Vec<CatalogueEntry> = Vec::with_capacity(raw.len());
        for def in raw {
            match CatalogueEntry::try_from(def) {
                Ok(entry) if entries.iter().any(|e| e.id == entry.id) => {
                    errors.push(CatalogueError::DuplicateId(entry.id));
                }
                Ok(entry) => entries.push(entry),
                Err(err) => errors.push(err),
            }
        }
        (Self::index_entries(entries), errors)
    }

    fn index_entries(entries: Vec<CatalogueEntry>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| (entry.id.clone(), idx))
            .collect();
        Self { entries, index }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&CatalogueEntry> {
        self.entries.get(idx)
    }

    pub fn find(&self, id: &str) -> Option<&CatalogueEntry> {
        self.index.get(id).map(|&idx| &self.entries[idx])
    }

    pub fn entries(&self) -> &[CatalogueEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CatalogueEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Catalogue {
    type Item = &'a CatalogueEntry;
    type IntoIter = std::slice::Iter<'a, CatalogueEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
