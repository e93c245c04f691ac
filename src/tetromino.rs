//! Piece types and their rotation tables
//!
//! Every piece is described by one base pattern with a single pivot cell.
//! The other three orientations are derived by rotating that pattern 90°
//! at a time, tracking where the pivot lands.

use std::sync::OnceLock;

/// A display color as a 6-digit hex token, e.g. `"fef84c"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor(&'static str);

impl HexColor {
    pub const fn new(hex: &'static str) -> Self {
        Self(hex)
    }

    /// Split into (r, g, b). Returns None for anything that isn't 6 hex digits.
    pub fn rgb(&self) -> Option<(u8, u8, u8)> {
        let hex = self.0;
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        Some((channel(0)?, channel(2)?, channel(4)?))
    }
}

/// The 7 piece types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TetrominoType {
    O,
    I,
    S,
    Z,
    L,
    J,
    T,
}

impl TetrominoType {
    /// All types, in table order
    pub fn all() -> [TetrominoType; 7] {
        [
            TetrominoType::O,
            TetrominoType::I,
            TetrominoType::S,
            TetrominoType::Z,
            TetrominoType::L,
            TetrominoType::J,
            TetrominoType::T,
        ]
    }

    fn index(&self) -> usize {
        match self {
            TetrominoType::O => 0,
            TetrominoType::I => 1,
            TetrominoType::S => 2,
            TetrominoType::Z => 3,
            TetrominoType::L => 4,
            TetrominoType::J => 5,
            TetrominoType::T => 6,
        }
    }

    pub fn color(&self) -> HexColor {
        match self {
            TetrominoType::O => HexColor::new("fef84c"),
            TetrominoType::I => HexColor::new("51e1fc"),
            TetrominoType::S => HexColor::new("e93d1e"),
            TetrominoType::Z => HexColor::new("79ae3d"),
            TetrominoType::L => HexColor::new("f69230"),
            TetrominoType::J => HexColor::new("f16eb9"),
            TetrominoType::T => HexColor::new("943692"),
        }
    }

    /// Base pattern: `O` marks the pivot, `X` a filled cell, `.` an empty one
    fn base_pattern(&self) -> &'static [&'static str] {
        match self {
            TetrominoType::O => &["XO", "XX"],
            TetrominoType::I => &["XOXX"],
            TetrominoType::S => &[".OX", "XX."],
            TetrominoType::Z => &["XO.", ".XX"],
            TetrominoType::L => &["X.", "O.", "XX"],
            TetrominoType::J => &[".X", ".O", "XX"],
            TetrominoType::T => &["XOX", ".X."],
        }
    }

    /// The shared rotation table for this type, built on first use
    pub fn geometry(&self) -> &'static Geometry {
        static TABLE: OnceLock<[Geometry; 7]> = OnceLock::new();
        let table = TABLE.get_or_init(|| TetrominoType::all().map(|kind| Geometry::build(kind.base_pattern())));
        &table[self.index()]
    }
}

/// Rotation state, cycling Top → Left → Bottom → Right → Top
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Top,
    Left,
    Bottom,
    Right,
}

impl Orientation {
    /// Advance by one quarter turn
    pub fn next(&self) -> Orientation {
        match self {
            Orientation::Top => Orientation::Left,
            Orientation::Left => Orientation::Bottom,
            Orientation::Bottom => Orientation::Right,
            Orientation::Right => Orientation::Top,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Orientation::Top => 0,
            Orientation::Left => 1,
            Orientation::Bottom => 2,
            Orientation::Right => 3,
        }
    }
}

/// One cell of a pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Empty,
    Filled,
    Pivot,
}

impl Mark {
    /// Filled and pivot cells both belong to the piece
    pub fn is_solid(&self) -> bool {
        !matches!(self, Mark::Empty)
    }
}

/// A rectangular pattern, indexed `[row][col]`, with its pivot as (row, col)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    cells: Vec<Vec<Mark>>,
    pivot: (usize, usize),
}

impl Pattern {
    /// Parse rows of `O`/`X`/`.` text.
    ///
    /// # Panics
    /// If the rows are empty, ragged, contain an unknown marker, or do not
    /// hold exactly one pivot.
    pub fn parse(rows: &[&str]) -> Self {
        assert!(!rows.is_empty(), "pattern has no rows");
        let width = rows[0].len();
        let mut pivot = None;
        let mut cells = Vec::with_capacity(rows.len());

        for (r, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), width, "pattern row {} is ragged", r);
            let mut marks = Vec::with_capacity(width);
            for (c, ch) in row.chars().enumerate() {
                let mark = match ch {
                    'O' => {
                        assert!(pivot.is_none(), "pattern has more than one pivot");
                        pivot = Some((r, c));
                        Mark::Pivot
                    }
                    'X' => Mark::Filled,
                    '.' | ' ' => Mark::Empty,
                    other => panic!("unknown pattern marker {:?}", other),
                };
                marks.push(mark);
            }
            cells.push(marks);
        }

        let Some(pivot) = pivot else {
            panic!("pattern has no pivot");
        };
        Self { cells, pivot }
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn cols(&self) -> usize {
        self.cells[0].len()
    }

    pub fn mark(&self, row: usize, col: usize) -> Mark {
        self.cells[row][col]
    }

    /// Pivot position as (row, col)
    pub fn pivot(&self) -> (usize, usize) {
        self.pivot
    }

    /// Offsets (dx, dy) of every solid cell relative to the pivot
    pub fn offsets(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let (pr, pc) = self.pivot;
        self.cells.iter().enumerate().flat_map(move |(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, mark)| mark.is_solid())
                .map(move |(c, _)| (c as i32 - pc as i32, r as i32 - pr as i32))
        })
    }

    /// Quarter turn: `rotated[c][rows - 1 - r] = original[r][c]`
    pub fn rotate90(&self) -> Pattern {
        let rows = self.rows();
        let cols = self.cols();
        let mut cells = vec![vec![Mark::Empty; rows]; cols];
        let mut pivot = (0, 0);

        for r in 0..rows {
            for c in 0..cols {
                let mark = self.cells[r][c];
                cells[c][rows - 1 - r] = mark;
                if mark == Mark::Pivot {
                    pivot = (c, rows - 1 - r);
                }
            }
        }

        Pattern { cells, pivot }
    }
}

/// All four orientations of one piece type
#[derive(Debug, Clone)]
pub struct Geometry {
    patterns: [Pattern; 4],
}

impl Geometry {
    /// Build the rotation cycle from a base pattern.
    ///
    /// # Panics
    /// If the base pattern is malformed (see [`Pattern::parse`]).
    pub fn build(base: &[&str]) -> Self {
        let top = Pattern::parse(base);
        let left = top.rotate90();
        let bottom = left.rotate90();
        let right = bottom.rotate90();
        Self {
            patterns: [top, left, bottom, right],
        }
    }

    pub fn pattern(&self, orientation: Orientation) -> &Pattern {
        &self.patterns[orientation.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate90_moves_cells_and_pivot() {
        let pattern = Pattern::parse(&["X.", "O.", "XX"]);
        let rotated = pattern.rotate90();
        assert_eq!(rotated.rows(), 2);
        assert_eq!(rotated.cols(), 3);
        // XOX
        // X..
        assert_eq!(rotated.mark(0, 0), Mark::Filled);
        assert_eq!(rotated.mark(0, 1), Mark::Pivot);
        assert_eq!(rotated.mark(0, 2), Mark::Filled);
        assert_eq!(rotated.mark(1, 0), Mark::Filled);
        assert_eq!(rotated.mark(1, 1), Mark::Empty);
        assert_eq!(rotated.pivot(), (0, 1));
    }

    #[test]
    fn test_four_rotations_return_to_base() {
        for kind in TetrominoType::all() {
            let base = Pattern::parse(kind.base_pattern());
            let full_turn = base.rotate90().rotate90().rotate90().rotate90();
            assert_eq!(full_turn, base, "{:?}", kind);
        }
    }

    #[test]
    fn test_every_orientation_has_four_cells() {
        for kind in TetrominoType::all() {
            for orientation in [Orientation::Top, Orientation::Left, Orientation::Bottom, Orientation::Right] {
                let pattern = kind.geometry().pattern(orientation);
                assert_eq!(pattern.offsets().count(), 4, "{:?} {:?}", kind, orientation);
                assert!(pattern.offsets().any(|offset| offset == (0, 0)));
            }
        }
    }

    #[test]
    fn test_i_piece_is_horizontal_at_spawn() {
        let offsets: Vec<_> = TetrominoType::I.geometry().pattern(Orientation::Top).offsets().collect();
        assert_eq!(offsets, vec![(-1, 0), (0, 0), (1, 0), (2, 0)]);
        let offsets: Vec<_> = TetrominoType::I.geometry().pattern(Orientation::Left).offsets().collect();
        assert_eq!(offsets, vec![(0, -1), (0, 0), (0, 1), (0, 2)]);
    }

    #[test]
    fn test_orientation_cycle() {
        let mut orientation = Orientation::Top;
        for _ in 0..4 {
            orientation = orientation.next();
        }
        assert_eq!(orientation, Orientation::Top);
        assert_eq!(Orientation::Bottom.next(), Orientation::Right);
    }

    #[test]
    fn test_geometry_is_shared() {
        let a = TetrominoType::T.geometry() as *const Geometry;
        let b = TetrominoType::T.geometry() as *const Geometry;
        assert_eq!(a, b);
    }

    #[test]
    #[should_panic(expected = "no pivot")]
    fn test_pattern_without_pivot_is_fatal() {
        Geometry::build(&["XX", "XX"]);
    }

    #[test]
    #[should_panic(expected = "more than one pivot")]
    fn test_pattern_with_two_pivots_is_fatal() {
        Pattern::parse(&["OO"]);
    }

    #[test]
    fn test_hex_color_rgb() {
        assert_eq!(TetrominoType::O.color().rgb(), Some((0xfe, 0xf8, 0x4c)));
        assert_eq!(HexColor::new("fff").rgb(), None);
        assert_eq!(HexColor::new("zzzzzz").rgb(), None);
    }
}
