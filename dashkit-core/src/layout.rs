// dashkit-core/src/layout.rs
use crate::widget::WidgetWidth;
use ratatui::layout::Rect;

/// Columns in one row of an area grid
pub const GRID_COLUMNS: u16 = 12;

/// Widgets packed into grid rows, left to right
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLayout {
    /// Per row, the `(index, start column, columns)` of each widget
    rows: Vec<Vec<(usize, u16, u16)>>,
}

impl GridLayout {
    /// Pack widths in order. A widget that doesn't fit in what's left of the
    /// current row starts a new one.
    pub fn pack(widths: &[WidgetWidth]) -> Self {
        let mut rows: Vec<Vec<(usize, u16, u16)>> = Vec::new();
        let mut used = GRID_COLUMNS;

        for (index, width) in widths.iter().enumerate() {
            let columns = width.columns();
            if used + columns > GRID_COLUMNS {
                rows.push(Vec::new());
                used = 0;
            }
            if let Some(row) = rows.last_mut() {
                row.push((index, used, columns));
            }
            used += columns;
        }

        Self { rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Widget indices of each row
    pub fn rows(&self) -> Vec<Vec<usize>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|(index, _, _)| *index).collect())
            .collect()
    }

    /// One rect per packed widget, in input order. Rows share the height
    /// evenly and the last row takes any rounding remainder.
    pub fn calculate(&self, area: Rect) -> Vec<Rect> {
        let count = self.rows.iter().map(Vec::len).sum();
        let mut rects = vec![Rect::default(); count];
        if self.rows.is_empty() {
            return rects;
        }

        let row_count = self.rows.len() as u16;
        let row_height = area.height / row_count;
        let mut y = area.y;

        for (row_idx, row) in self.rows.iter().enumerate() {
            let height = if row_idx == self.rows.len() - 1 {
                area.height - row_height * (row_count - 1)
            } else {
                row_height
            };

            for &(index, start, columns) in row {
                let left = column_offset(area.width, start);
                let right = column_offset(area.width, start + columns);
                rects[index] = Rect {
                    x: area.x + left,
                    y,
                    width: right - left,
                    height,
                };
            }

            y += height;
        }

        rects
    }
}

fn column_offset(width: u16, column: u16) -> u16 {
    (u32::from(width) * u32::from(column) / u32::from(GRID_COLUMNS)) as u16
}
