// powerbar-core/src/layout.rs
use ratatui::layout::Rect;

/// Above this many buttons the row scrolls instead of squeezing.
pub const LAYOUT_SCROLL_BUTTON_THRESHOLD: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// Every button fits in the row
    Flat,
    /// Buttons keep their width and the row scrolls horizontally
    Scrollable,
}

pub fn choose_layout(active_count: usize, threshold: usize) -> LayoutMode {
    if active_count > threshold {
        LayoutMode::Scrollable
    } else {
        LayoutMode::Flat
    }
}

/// Width of one button: the display split into `threshold` equal parts,
/// regardless of how many buttons are active.
pub fn button_width(display_width: u16, threshold: usize) -> u16 {
    let threshold = u16::try_from(threshold.max(1)).unwrap_or(u16::MAX);
    (display_width / threshold).max(1)
}

/// Split `area` horizontally into parts proportional to `weights`, left to
/// right. Rounding leftovers go to the last part.
pub fn split_horizontal(area: Rect, weights: &[u16]) -> Vec<Rect> {
    let total_weight: u32 = weights.iter().map(|w| u32::from(*w)).sum();
    if total_weight == 0 {
        return vec![Rect { width: 0, ..area }; weights.len()];
    }

    let mut widths: Vec<u16> = weights
        .iter()
        .map(|w| {
            let share = u32::from(area.width) * u32::from(*w) / total_weight;
            u16::try_from(share).unwrap_or(area.width)
        })
        .collect();

    let distributed: u16 = widths.iter().sum();
    if let Some(last) = widths.last_mut() {
        *last += area.width - distributed;
    }

    let mut current_x = area.x;
    widths
        .into_iter()
        .map(|width| {
            let rect = Rect {
                x: current_x,
                y: area.y,
                width,
                height: area.height,
            };
            current_x = current_x.saturating_add(width);
            rect
        })
        .collect()
}

/// Placement of the active buttons inside the widget area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowLayout {
    mode: LayoutMode,
    slots: usize,
    button_width: u16,
    scrollbar_enabled: bool,
    scroll_offset: u16,
}

impl RowLayout {
    pub fn new(slots: usize, button_width: u16) -> Self {
        Self {
            mode: choose_layout(slots, LAYOUT_SCROLL_BUTTON_THRESHOLD),
            slots,
            button_width: button_width.max(1),
            scrollbar_enabled: true,
            scroll_offset: 0,
        }
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    pub fn button_width(&self) -> u16 {
        self.button_width
    }

    /// Faded margin hinting that the row scrolls: one button wide.
    pub fn fading_edge(&self) -> Option<u16> {
        match self.mode {
            LayoutMode::Scrollable => Some(self.button_width),
            LayoutMode::Flat => None,
        }
    }

    /// Show or hide the scrollbar. Returns false, changing nothing, when the
    /// row does not scroll.
    pub fn set_scrollbar_enabled(&mut self, enabled: bool) -> bool {
        if self.mode == LayoutMode::Flat {
            return false;
        }
        self.scrollbar_enabled = enabled;
        true
    }

    pub fn scrollbar_visible(&self) -> bool {
        self.mode == LayoutMode::Scrollable && self.scrollbar_enabled
    }

    pub fn scroll_offset(&self) -> u16 {
        self.scroll_offset
    }

    /// Full width of the scrolling content.
    pub fn content_width(&self) -> u32 {
        self.slots as u32 * u32::from(self.button_width)
    }

    /// Scroll by `delta` cells, clamped so the content never leaves the viewport.
    pub fn scroll_by(&mut self, delta: i32, viewport_width: u16) {
        if self.mode == LayoutMode::Flat {
            return;
        }
        let max_offset = self
            .content_width()
            .saturating_sub(u32::from(viewport_width));
        let offset = (i64::from(self.scroll_offset) + i64::from(delta))
            .clamp(0, i64::from(max_offset));
        self.scroll_offset = u16::try_from(offset).unwrap_or(u16::MAX);
    }

    /// Area of each slot in display order; `None` for slots scrolled out of view.
    pub fn areas(&self, area: Rect) -> Vec<Option<Rect>> {
        match self.mode {
            LayoutMode::Flat => {
                split_horizontal(area, &vec![1; self.slots])
                    .into_iter()
                    .map(Some)
                    .collect()
            }
            LayoutMode::Scrollable => {
                let row = self.button_row(area);
                (0..self.slots)
                    .map(|slot| self.scrolled_slot(slot, row))
                    .collect()
            }
        }
    }

    /// Bottom line reserved for the scrollbar, when one is shown.
    pub fn scrollbar_area(&self, area: Rect) -> Option<Rect> {
        if !self.scrollbar_visible() || area.height < 2 {
            return None;
        }
        Some(Rect {
            x: area.x,
            y: area.y + area.height - 1,
            width: area.width,
            height: 1,
        })
    }

    fn button_row(&self, area: Rect) -> Rect {
        match self.scrollbar_area(area) {
            Some(_) => Rect {
                height: area.height - 1,
                ..area
            },
            None => area,
        }
    }

    fn scrolled_slot(&self, slot: usize, row: Rect) -> Option<Rect> {
        let start = slot as i64 * i64::from(self.button_width) - i64::from(self.scroll_offset);
        let end = start + i64::from(self.button_width);
        let visible_start = start.max(0);
        let visible_end = end.min(i64::from(row.width));

        if visible_end <= visible_start {
            return None;
        }

        Some(Rect {
            x: row.x + u16::try_from(visible_start).ok()?,
            y: row.y,
            width: u16::try_from(visible_end - visible_start).ok()?,
            height: row.height,
        })
    }
}
