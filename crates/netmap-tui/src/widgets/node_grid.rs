//! Terminal layout for topology nodes.
//!
//! The synthesized graph lays every node along one row; a terminal is too
//! narrow for that, so nodes wrap into rows in graph order.

use ratatui::layout::Rect;

pub const CELL_WIDTH: u16 = 22;
pub const CELL_HEIGHT: u16 = 5;

/// Columns that fit in `width`, never fewer than one.
pub fn columns(width: u16) -> u16 {
    (width / CELL_WIDTH).max(1)
}

/// Cell of the `index`-th node, or `None` when it falls below the area
/// after `skip_rows` rows have been scrolled away.
pub fn cell(area: Rect, index: usize, skip_rows: u16) -> Option<Rect> {
    let cols = usize::from(columns(area.width));
    let row = u16::try_from(index / cols).ok()?.checked_sub(skip_rows)?;
    let col = u16::try_from(index % cols).ok()?;

    let y = area.y + row.checked_mul(CELL_HEIGHT)?;
    if y + CELL_HEIGHT > area.y + area.height {
        return None;
    }
    let width = CELL_WIDTH.min(area.width);
    Some(Rect::new(area.x + col * CELL_WIDTH, y, width, CELL_HEIGHT))
}

/// First visible row so that `selected` stays on screen.
pub fn scroll_for(area: Rect, selected: usize) -> u16 {
    let cols = usize::from(columns(area.width));
    let visible_rows = (area.height / CELL_HEIGHT).max(1);
    let row = u16::try_from(selected / cols).unwrap_or(u16::MAX);
    row.saturating_sub(visible_rows - 1)
}
