//! Active falling piece logic
//!
//! The piece is painted into the board while it falls. Every move goes
//! through [`Piece::commit`], which erases the old footprint, checks the
//! target and then paints either the new or the old footprint back.

use crate::board::{Board, Cell};
use crate::tetromino::{HexColor, Orientation, Pattern, TetrominoType};

/// An active falling piece
#[derive(Debug, Clone)]
pub struct Piece {
    piece_type: TetrominoType,
    orientation: Orientation,
    /// Board position of the pivot cell, None until first committed
    anchor: Option<(i32, i32)>,
    color: HexColor,
}

impl Piece {
    /// Create an unplaced piece
    pub fn new(piece_type: TetrominoType) -> Self {
        Self {
            piece_type,
            orientation: Orientation::Top,
            anchor: None,
            color: piece_type.color(),
        }
    }

    pub fn piece_type(&self) -> TetrominoType {
        self.piece_type
    }

    #[allow(dead_code)]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn anchor(&self) -> Option<(i32, i32)> {
        self.anchor
    }

    #[allow(dead_code)]
    pub fn color(&self) -> HexColor {
        self.color
    }

    fn pattern(&self, orientation: Orientation) -> &'static Pattern {
        self.piece_type.geometry().pattern(orientation)
    }

    /// Board cells covered by the piece if its pivot sat at (x, y)
    fn cells_at(&self, x: i32, y: i32, orientation: Orientation) -> impl Iterator<Item = (i32, i32)> + use<> {
        let pattern: &'static Pattern = self.pattern(orientation);
        pattern
            .offsets()
            .map(move |(dx, dy)| (x + dx, y + dy))
    }

    /// Board cells currently painted by this piece
    pub fn footprint(&self) -> Vec<(i32, i32)> {
        match self.anchor {
            Some((x, y)) => self.cells_at(x, y, self.orientation).collect(),
            None => Vec::new(),
        }
    }

    /// Leftmost and rightmost column of the footprint
    pub fn columns(&self) -> Option<(i32, i32)> {
        let footprint = self.footprint();
        let min = footprint.iter().map(|&(x, _)| x).min()?;
        let max = footprint.iter().map(|&(x, _)| x).max()?;
        Some((min, max))
    }

    /// Dry run: could the piece sit at (x, y) in `orientation`?
    ///
    /// Cells painted by this piece count as free, so the answer matches what
    /// [`Piece::commit`] would do on the same board.
    pub fn test_placement(&self, board: &Board, x: i32, y: i32, orientation: Orientation) -> bool {
        let own = self.footprint();
        self.cells_at(x, y, orientation)
            .all(|(cx, cy)| board.is_vacant(cx, cy) || own.contains(&(cx, cy)))
    }

    /// Move the piece to (x, y) in `orientation` if it fits.
    /// Returns false and leaves the board as it was otherwise.
    pub fn commit(&mut self, board: &mut Board, x: i32, y: i32, orientation: Orientation) -> bool {
        self.paint(board, Cell::Empty);

        let fits = self
            .cells_at(x, y, orientation)
            .all(|(cx, cy)| board.is_vacant(cx, cy));

        if fits {
            self.anchor = Some((x, y));
            self.orientation = orientation;
        }
        self.paint(board, Cell::Filled(self.color));
        fits
    }

    fn paint(&self, board: &mut Board, cell: Cell) {
        for (x, y) in self.footprint() {
            board.write(x, y, cell);
        }
    }

    /// Rotate a quarter turn in place. No kicks: if it doesn't fit, it fails.
    pub fn rotate(&mut self, board: &mut Board) -> bool {
        let Some((x, y)) = self.anchor else {
            return false;
        };
        self.commit(board, x, y, self.orientation.next())
    }

    /// Try to move down one row. False means the piece has landed.
    pub fn move_down(&mut self, board: &mut Board) -> bool {
        let Some((x, y)) = self.anchor else {
            return false;
        };
        if !self.check_down(board) {
            return false;
        }
        self.commit(board, x, y + 1, self.orientation)
    }

    /// Try to shift by `dx` columns; negative is toward column 0
    pub fn move_column(&mut self, board: &mut Board, dx: i32) -> bool {
        let Some((x, y)) = self.anchor else {
            return false;
        };
        let clear = match dx {
            -1 => self.check_left(board),
            1 => self.check_right(board),
            _ => true,
        };
        clear && self.commit(board, x + dx, y, self.orientation)
    }

    /// Probe only below the last pattern row. A false answer means the piece
    /// certainly cannot move down; true still needs a full placement test.
    pub fn check_down(&self, board: &Board) -> bool {
        let Some((x, y)) = self.anchor else {
            return false;
        };
        let pattern = self.pattern(self.orientation);
        let (pr, pc) = pattern.pivot();
        let last = pattern.rows() - 1;
        let below = y - pr as i32 + pattern.rows() as i32;

        (0..pattern.cols())
            .filter(|&c| pattern.mark(last, c).is_solid())
            .all(|c| board.is_vacant(x - pc as i32 + c as i32, below))
    }

    /// Probe only left of the first pattern column
    pub fn check_left(&self, board: &Board) -> bool {
        let Some((x, y)) = self.anchor else {
            return false;
        };
        let pattern = self.pattern(self.orientation);
        let (pr, pc) = pattern.pivot();
        let left = x - pc as i32 - 1;

        (0..pattern.rows())
            .filter(|&r| pattern.mark(r, 0).is_solid())
            .all(|r| board.is_vacant(left, y - pr as i32 + r as i32))
    }

    /// Probe only right of the last pattern column
    pub fn check_right(&self, board: &Board) -> bool {
        let Some((x, y)) = self.anchor else {
            return false;
        };
        let pattern = self.pattern(self.orientation);
        let (pr, pc) = pattern.pivot();
        let last = pattern.cols() - 1;
        let right = x - pc as i32 + pattern.cols() as i32;

        (0..pattern.rows())
            .filter(|&r| pattern.mark(r, last).is_solid())
            .all(|r| board.is_vacant(right, y - pr as i32 + r as i32))
    }

    /// Drop until landing, returning the number of rows fallen
    pub fn hard_drop(&mut self, board: &mut Board) -> u32 {
        let mut distance = 0;
        while self.move_down(board) {
            distance += 1;
        }
        distance
    }
}
