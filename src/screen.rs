//! Stores the Chip-8's screen memory
//!
//! The screen is a 64x32 grid of boolean cells. The dispatcher mutates it
//! only through [Screen::clear] and [Screen::flip]; the presentation backend
//! gets a read-only view and consumes the dirty flag.

use std::fmt::{Display, Formatter, Result};

/// Screen width in cells
pub const WIDTH: usize = 64;
/// Screen height in cells
pub const HEIGHT: usize = 32;

/// A monochrome cell grid with a dirty flag
#[derive(Clone, PartialEq, Eq)]
pub struct Screen {
    cells: Box<[bool; WIDTH * HEIGHT]>,
    dirty: bool,
}

impl Screen {
    /// Constructs a new, blank screen
    pub fn new() -> Self {
        Screen {
            cells: Box::new([false; WIDTH * HEIGHT]),
            dirty: false,
        }
    }

    /// Clears every cell and marks the screen dirty
    pub fn clear(&mut self) {
        self.cells.fill(false);
        self.dirty = true;
    }

    /// XORs the cell at (x, y), wrapping out-of-range coordinates.
    ///
    /// Returns `true` if a previously-set cell was turned off (a sprite
    /// collision).
    /// # Examples
    /// ```rust
    /// # use ocho::screen::*;
    /// let mut screen = Screen::new();
    /// assert!(!screen.flip(63, 0)); // off -> on
    /// assert!(screen.flip(127, 0)); // wraps to (63, 0), on -> off
    /// ```
    pub fn flip(&mut self, x: usize, y: usize) -> bool {
        let cell = &mut self.cells[y % HEIGHT * WIDTH + x % WIDTH];
        *cell = !*cell;
        self.dirty = true;
        !*cell
    }

    /// Gets the cell at (x, y), wrapping out-of-range coordinates
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.cells[y % HEIGHT * WIDTH + x % WIDTH]
    }

    /// A row-major view of the whole grid, for the presentation backend
    pub fn cells(&self) -> &[bool] {
        self.cells.as_slice()
    }

    /// Whether the screen changed since it was last presented
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Consumes the dirty flag, returning its prior value
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Screen {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.debug_struct("Screen")
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl Display for Screen {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        for row in self.cells.chunks(WIDTH) {
            for &cell in row {
                write!(f, "{}", if cell { "█" } else { " " })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
