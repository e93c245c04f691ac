//! Game board representation and row clearing

use crate::tetromino::HexColor;

/// Default board dimensions
pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 24;

/// Accepted range for either dimension
pub const MIN_DIMENSION: usize = 4;
pub const MAX_DIMENSION: usize = 64;

/// A cell on the board - either empty or filled with a color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(HexColor),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }
}

/// The game board
#[derive(Debug, Clone)]
pub struct Board {
    width: usize,
    height: usize,
    /// Grid stored as [row][col], row 0 is the top, row increases downward
    cells: Vec<Vec<Cell>>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BOARD_WIDTH, BOARD_HEIGHT)
    }
}

impl Board {
    /// Create a new empty board.
    ///
    /// # Panics
    /// If either dimension is outside `MIN_DIMENSION..=MAX_DIMENSION`.
    pub fn new(width: usize, height: usize) -> Self {
        assert!(
            (MIN_DIMENSION..=MAX_DIMENSION).contains(&width)
                && (MIN_DIMENSION..=MAX_DIMENSION).contains(&height),
            "board dimensions {}x{} out of range",
            width,
            height
        );
        Self {
            width,
            height,
            cells: vec![vec![Cell::Empty; width]; height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Read the cell at (x, y).
    ///
    /// Anything above the top edge reads as empty so pieces can spawn partly
    /// off screen. Every other out-of-range coordinate returns None, which
    /// collision treats as a wall.
    pub fn read(&self, x: i32, y: i32) -> Option<Cell> {
        if y < 0 {
            return Some(Cell::Empty);
        }
        if x < 0 {
            return None;
        }
        self.cells.get(y as usize)?.get(x as usize).copied()
    }

    /// True if a piece may occupy (x, y)
    pub fn is_vacant(&self, x: i32, y: i32) -> bool {
        self.read(x, y) == Some(Cell::Empty)
    }

    /// Write a cell. Out-of-range writes are ignored.
    pub fn write(&mut self, x: i32, y: i32, cell: Cell) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        self.cells[y as usize][x as usize] = cell;
    }

    /// Remove every full row, shifting the rows above it down.
    /// Returns the number of rows cleared.
    pub fn clear_full_rows(&mut self) -> usize {
        let before = self.cells.len();
        self.cells.retain(|row| !row.iter().all(Cell::is_filled));
        let cleared = before - self.cells.len();

        for _ in 0..cleared {
            self.cells.insert(0, vec![Cell::Empty; self.width]);
        }

        cleared
    }

    /// Check if a row is completely filled
    #[allow(dead_code)]
    pub fn is_row_full(&self, y: usize) -> bool {
        self.cells
            .get(y)
            .is_some_and(|row| row.iter().all(Cell::is_filled))
    }

    /// Check if the board is completely empty
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(Cell::is_empty))
    }

    /// Rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.iter().map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Cell = Cell::Filled(HexColor::new("ff0000"));
    const BLUE: Cell = Cell::Filled(HexColor::new("0000ff"));

    fn fill_row(board: &mut Board, y: i32, cell: Cell) {
        for x in 0..board.width() as i32 {
            board.write(x, y, cell);
        }
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::default();
        assert!(board.is_empty());
        assert_eq!(board.width(), 10);
        assert_eq!(board.height(), 24);
    }

    #[test]
    fn test_write_and_read() {
        let mut board = Board::default();
        board.write(5, 5, RED);
        assert_eq!(board.read(5, 5), Some(RED));
        assert!(!board.is_vacant(5, 5));
    }

    #[test]
    fn test_above_top_reads_empty() {
        let board = Board::default();
        assert_eq!(board.read(3, -1), Some(Cell::Empty));
        assert_eq!(board.read(-7, -3), Some(Cell::Empty));
        assert!(board.is_vacant(4, -2));
    }

    #[test]
    fn test_walls_and_floor_block() {
        let board = Board::default();
        assert_eq!(board.read(-1, 0), None);
        assert_eq!(board.read(10, 0), None);
        assert_eq!(board.read(0, 24), None);
        assert!(!board.is_vacant(-1, 5));
        assert!(!board.is_vacant(10, 5));
        assert!(!board.is_vacant(3, 24));
    }

    #[test]
    fn test_out_of_range_writes_are_ignored() {
        let mut board = Board::default();
        board.write(-1, 0, RED);
        board.write(10, 0, RED);
        board.write(0, -1, RED);
        board.write(0, 24, RED);
        assert!(board.is_empty());
    }

    #[test]
    fn test_clear_single_line() {
        let mut board = Board::default();
        fill_row(&mut board, 23, BLUE);
        board.write(0, 22, RED);

        assert_eq!(board.clear_full_rows(), 1);
        // The block from row 22 drops onto row 23
        assert_eq!(board.read(0, 23), Some(RED));
        assert_eq!(board.read(0, 22), Some(Cell::Empty));
        assert_eq!(board.height(), 24);
    }

    #[test]
    fn test_clear_keeps_partial_rows_in_order() {
        let mut board = Board::default();
        board.write(1, 18, RED);
        fill_row(&mut board, 19, BLUE);
        board.write(2, 20, RED);
        fill_row(&mut board, 21, BLUE);
        fill_row(&mut board, 22, BLUE);
        for x in 0..9 {
            board.write(x, 23, RED);
        }

        assert_eq!(board.clear_full_rows(), 3);
        assert!(!board.is_row_full(23));
        assert_eq!(board.read(0, 23), Some(RED));
        assert_eq!(board.read(9, 23), Some(Cell::Empty));
        assert_eq!(board.read(2, 22), Some(RED));
        assert_eq!(board.read(1, 21), Some(RED));
        for y in 0..21 {
            assert!(board.rows().nth(y).unwrap().iter().all(Cell::is_empty));
        }
    }

    #[test]
    fn test_clear_nothing_when_no_full_rows() {
        let mut board = Board::default();
        for x in 0..9 {
            board.write(x, 23, RED);
        }
        assert_eq!(board.clear_full_rows(), 0);
        assert_eq!(board.read(8, 23), Some(RED));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_tiny_board_is_rejected() {
        Board::new(2, 24);
    }
}
