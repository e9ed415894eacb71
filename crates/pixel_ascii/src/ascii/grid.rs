use std::fmt;
use std::io::{self, Write};

use super::ramp::GlyphRamp;

/// Rendered rows of glyphs.
///
/// Cells hold ramp indices, row-major, `columns` per row. As text, every row is
/// followed by a newline; a grid with no rows is the empty string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextGrid {
    columns: u32,
    rows: u32,
    ramp: GlyphRamp,
    cells: Vec<usize>,
}

impl TextGrid {
    pub(crate) fn new(columns: u32, rows: u32, ramp: GlyphRamp, cells: Vec<usize>) -> Self {
        assert_eq!(columns as usize * rows as usize, cells.len());
        Self { columns, rows, ramp, cells }
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn height(&self) -> usize {
        self.rows as usize
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn ramp(&self) -> &GlyphRamp {
        &self.ramp
    }

    /// Ramp index of the cell at `(x, y)`.
    pub fn index(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.columns as usize {
            return None;
        }
        self.cells.get(y * self.columns as usize + x).copied()
    }

    pub fn glyph(&self, x: usize, y: usize) -> Option<&str> {
        self.index(x, y).map(|index| self.ramp.glyph(index))
    }

    pub fn glyphs(&self) -> impl Iterator<Item = &str> + '_ {
        self.cells.iter().map(|&index| self.ramp.glyph(index))
    }

    /// Rows without their trailing newline.
    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        self.row_cells().map(|row| row.iter().map(|&index| self.ramp.glyph(index)).collect())
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for row in self.row_cells() {
            for &index in row {
                writer.write_all(self.ramp.glyph(index).as_bytes())?;
            }
            writer.write_all(b"\n")?;
        }
        writer.flush()
    }

    fn row_cells(&self) -> impl Iterator<Item = &[usize]> + '_ {
        self.cells.chunks(self.columns.max(1) as usize)
    }
}

impl fmt::Display for TextGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.row_cells() {
            for &index in row {
                f.write_str(self.ramp.glyph(index))?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> TextGrid {
        let ramp = GlyphRamp::new([" ", "##"]).unwrap();
        TextGrid::new(2, 2, ramp, vec![0, 1, 1, 0])
    }

    #[test]
    fn text_terminates_every_row() {
        assert_eq!(grid().to_string(), " ##\n## \n");
    }

    #[test]
    fn write_to_matches_display() {
        let mut out = Vec::new();
        grid().write_to(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), grid().to_string());
    }

    #[test]
    fn accessors() {
        let grid = grid();
        assert_eq!(grid.columns(), 2);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.index(0, 1), Some(1));
        assert_eq!(grid.glyph(1, 0), Some("##"));
        assert_eq!(grid.glyph(2, 0), None);
        assert_eq!(grid.glyph(0, 2), None);
        assert_eq!(grid.rows().collect::<Vec<_>>(), vec![" ##", "## "]);
        assert_eq!(grid.glyphs().count(), 4);
    }

    #[test]
    fn empty_grid_is_empty_text() {
        let grid = TextGrid::new(5, 0, GlyphRamp::punctuation(), Vec::new());
        assert!(grid.is_empty());
        assert_eq!(grid.rows().count(), 0);
        assert_eq!(grid.to_string(), "");
    }
}
