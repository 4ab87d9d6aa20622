use std::ops::Range;

/// Fixed-height row virtualization. Row offsets depend only on the row index,
/// so appending rows never moves what is already on screen.
///
/// `height` is the whole scroll container; a sticky header of
/// `header_height` covers the top of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub row_height: f64,
    pub header_height: f64,
    pub overscan: usize,
    pub scroll_top: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(row_height: f64, overscan: usize) -> Self {
        Self {
            row_height: row_height.max(1.0),
            header_height: 0.0,
            overscan,
            scroll_top: 0.0,
            height: 0.0,
        }
    }

    pub fn with_header(mut self, header_height: f64) -> Self {
        self.header_height = header_height.max(0.0);
        self
    }

    /// Keeps the scroll offset, for size-only changes such as a window resize.
    pub fn resize(&mut self, height: f64) {
        self.height = height.max(0.0);
    }

    pub fn update(&mut self, scroll_top: f64, height: f64) {
        self.scroll_top = scroll_top.max(0.0);
        self.height = height.max(0.0);
    }

    pub fn total_height(&self, row_count: usize) -> f64 {
        row_count as f64 * self.row_height
    }

    pub fn offset_of(&self, index: usize) -> f64 {
        index as f64 * self.row_height
    }

    fn first_visible(&self) -> usize {
        (self.scroll_top / self.row_height).floor() as usize
    }

    fn body_height(&self) -> f64 {
        (self.height - self.header_height).max(0.0)
    }

    fn visible_count(&self) -> usize {
        (self.body_height() / self.row_height).ceil() as usize + 1
    }

    /// Rows to render, overscan included.
    pub fn visible_range(&self, row_count: usize) -> Range<usize> {
        let first = self.first_visible();
        let start = first.saturating_sub(self.overscan).min(row_count);
        let end = (first + self.visible_count() + self.overscan).min(row_count);
        start..end.max(start)
    }

    /// True once the bottom of the viewport is within `prefetch_rows` of the
    /// loaded tail.
    pub fn should_load_more(&self, row_count: usize, prefetch_rows: usize) -> bool {
        self.first_visible() + self.visible_count() + prefetch_rows >= row_count
    }

    /// Scroll offset that centres `index` in the area below the header,
    /// clamped to the scrollable area.
    pub fn scroll_target(&self, index: usize, row_count: usize) -> f64 {
        let content = self.header_height + self.total_height(row_count);
        let max_scroll = (content - self.height).max(0.0);
        let centred = self.offset_of(index) - (self.body_height() - self.row_height) / 2.0;
        centred.clamp(0.0, max_scroll)
    }
}
