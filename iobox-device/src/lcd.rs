//! 2x16 character LCD text buffer.

/// Number of display lines.
pub const LCD_LINES: usize = 2;
/// Characters per line.
pub const LCD_COLUMNS: usize = 16;

/// Error for cursor positions outside the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutOfRange;

impl core::fmt::Display for OutOfRange {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "cursor out of range")
    }
}

/// Character LCD contents and cursor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharLcd {
    cells: [[u8; LCD_COLUMNS]; LCD_LINES],
    line: usize,
    column: usize,
}

impl CharLcd {
    pub const fn new() -> Self {
        Self {
            cells: [[b' '; LCD_COLUMNS]; LCD_LINES],
            line: 0,
            column: 0,
        }
    }

    /// Blank the display and home the cursor.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    pub fn set_cursor(&mut self, line: u8, column: u8) -> Result<(), OutOfRange> {
        let (line, column) = (usize::from(line), usize::from(column));
        if line >= LCD_LINES || column >= LCD_COLUMNS {
            return Err(OutOfRange);
        }
        self.line = line;
        self.column = column;
        Ok(())
    }

    #[must_use]
    pub fn cursor(&self) -> (u8, u8) {
        (self.line as u8, self.column as u8)
    }

    /// Write at the cursor. Text past the end of the line is dropped.
    pub fn write(&mut self, text: &str) {
        for byte in text.bytes() {
            let Some(cell) = self.cells[self.line].get_mut(self.column) else {
                break;
            };
            *cell = byte;
            self.column += 1;
        }
    }

    /// Contents of one line.
    #[must_use]
    pub fn line(&self, line: usize) -> &str {
        self.cells
            .get(line)
            .and_then(|cells| core::str::from_utf8(cells).ok())
            .unwrap_or("")
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.cells.iter().flatten().all(|&c| c == b' ')
    }
}

impl Default for CharLcd {
    fn default() -> Self {
        Self::new()
    }
}
