//! Color grids for the matching puzzle.
//!
//! A [`Grid`] is an N×N arena of [`Color`] values addressed by `(row, col)`.
//! [`generate`] fills it in row-major order so that no cell repeats the color
//! above it or to its left, and [`cycle_cell`] steps one cell through the
//! [`Palette`] while keeping all four of its neighbors distinct.

pub mod session;

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

pub use session::{CycleOutcome, PuzzleSession, SessionState};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError
{
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("No color fits cell ({row}, {col})")]
    NoCandidate { row: usize, col: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color
{
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
    Cyan,
}

impl Color
{
    pub const ALL: [Color; 6] = [
        Color::Red,
        Color::Green,
        Color::Blue,
        Color::Yellow,
        Color::Purple,
        Color::Cyan,
    ];

    pub fn rgb(self) -> (u8, u8, u8)
    {
        match self {
            Color::Red => (200, 40, 40),
            Color::Green => (40, 170, 70),
            Color::Blue => (50, 90, 220),
            Color::Yellow => (230, 200, 30),
            Color::Purple => (150, 60, 190),
            Color::Cyan => (30, 190, 200),
        }
    }

    pub fn name(self) -> &'static str
    {
        match self {
            Color::Red => "red",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Yellow => "yellow",
            Color::Purple => "purple",
            Color::Cyan => "cyan",
        }
    }
}

/// Ordered set of distinct colors. The order drives [`cycle_cell`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette
{
    colors: Vec<Color>,
}

impl Palette
{
    pub fn new(colors: Vec<Color>) -> Result<Self, GridError>
    {
        for (idx, color) in colors.iter().enumerate() {
            if colors[..idx].contains(color) {
                return Err(GridError::Configuration(format!(
                    "palette lists {} more than once",
                    color.name()
                )));
            }
        }
        Ok(Self { colors })
    }

    /// The first `count` colors of [`Color::ALL`].
    pub fn standard(count: usize) -> Result<Self, GridError>
    {
        if count > Color::ALL.len() {
            return Err(GridError::Configuration(format!(
                "at most {} colors are available, got {count}",
                Color::ALL.len()
            )));
        }
        Self::new(Color::ALL[..count].to_vec())
    }

    pub fn colors(&self) -> &[Color]
    {
        &self.colors
    }

    pub fn len(&self) -> usize
    {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.colors.is_empty()
    }

    fn index_of(&self, color: Color) -> Option<usize>
    {
        self.colors.iter().position(|candidate| *candidate == color)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid
{
    size: usize,
    cells: Vec<Color>,
}

impl Grid
{
    /// Builds a grid from explicit rows. Every row must be `rows.len()` long.
    #[cfg(test)]
    pub fn from_rows(rows: Vec<Vec<Color>>) -> Result<Self, GridError>
    {
        let size = rows.len();
        if size == 0 {
            return Err(GridError::Configuration("grid must have at least one row".to_string()));
        }
        if let Some(bad) = rows.iter().position(|row| row.len() != size) {
            return Err(GridError::Configuration(format!(
                "row {bad} has {} cells, expected {size}",
                rows[bad].len()
            )));
        }
        Ok(Self {
            size,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    pub fn size(&self) -> usize
    {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> Color
    {
        self.cells[self.offset(row, col)]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Color]>
    {
        self.cells.chunks(self.size)
    }

    fn set(&mut self, row: usize, col: usize, color: Color)
    {
        let offset = self.offset(row, col);
        self.cells[offset] = color;
    }

    fn offset(&self, row: usize, col: usize) -> usize
    {
        assert!(
            row < self.size && col < self.size,
            "cell ({row}, {col}) is outside a {0}x{0} grid",
            self.size
        );
        row * self.size + col
    }

    /// Colors of the existing up/down/left/right neighbors.
    fn neighbors(&self, row: usize, col: usize) -> Vec<Color>
    {
        let mut found = Vec::with_capacity(4);
        if row > 0 {
            found.push(self.get(row - 1, col));
        }
        if row + 1 < self.size {
            found.push(self.get(row + 1, col));
        }
        if col > 0 {
            found.push(self.get(row, col - 1));
        }
        if col + 1 < self.size {
            found.push(self.get(row, col + 1));
        }
        found
    }
}

/// Fills a `size`×`size` grid row by row. Each cell only avoids the colors
/// already placed above and to the left of it.
pub fn generate(size: usize, palette: &Palette, rng: &mut impl Rng) -> Result<Grid, GridError>
{
    if size == 0 {
        return Err(GridError::Configuration("grid size must be at least 1".to_string()));
    }
    if palette.len() < 2 {
        return Err(GridError::Configuration(format!(
            "palette needs at least 2 colors, got {}",
            palette.len()
        )));
    }

    let mut cells: Vec<Color> = Vec::with_capacity(size * size);
    for row in 0..size {
        for col in 0..size {
            let up = (row > 0).then(|| cells[(row - 1) * size + col]);
            let left = (col > 0).then(|| cells[row * size + col - 1]);
            let candidates: Vec<Color> = palette
                .colors()
                .iter()
                .copied()
                .filter(|color| Some(*color) != up && Some(*color) != left)
                .collect();
            let chosen = candidates
                .choose(rng)
                .copied()
                .ok_or(GridError::NoCandidate { row, col })?;
            cells.push(chosen);
        }
    }

    log::debug!("generated {size}x{size} grid over {} colors", palette.len());
    Ok(Grid { size, cells })
}

/// Advances `(row, col)` to the next palette color that differs from every
/// neighbor. Returns `false` and leaves the grid alone when none does.
///
/// Panics if `(row, col)` is outside the grid.
pub fn cycle_cell(grid: &mut Grid, row: usize, col: usize, palette: &Palette) -> bool
{
    let current = grid.get(row, col);
    let neighbors = grid.neighbors(row, col);
    let colors = palette.colors();
    let len = colors.len();

    // The scan stops one short of the current index, so the current color is
    // never a candidate.
    let (start, steps) = match palette.index_of(current) {
        Some(idx) => (idx + 1, len.saturating_sub(1)),
        None => (0, len),
    };

    for step in 0..steps {
        let candidate = colors[(start + step) % len];
        if !neighbors.contains(&candidate) {
            grid.set(row, col, candidate);
            log::trace!("cell ({row}, {col}) {} -> {}", current.name(), candidate.name());
            return true;
        }
    }

    log::debug!("cell ({row}, {col}) has no valid color");
    false
}

pub fn matches(a: &Grid, b: &Grid) -> bool
{
    a.size == b.size && a.cells == b.cells
}
