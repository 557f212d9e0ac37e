//! Deciding when a list should ask for its next page.
//!
//! [`ScrollTrigger`] is driven by the presentation layer: it reports the start
//! of a drag gesture and, on every scroll, the visible window plus the
//! channel's loading / error / last-page flags.  The trigger fires at most
//! once per drag.

/// Visible window of a scrolled list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollWindow {
    /// Index of the first visible item; negative when nothing is laid out.
    pub first_visible: i64,
    pub visible_count: usize,
    pub total_count: usize,
}

/// Channel status the trigger needs to know about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageFlags {
    pub is_error: bool,
    pub is_loading: bool,
    pub is_last_page: bool,
}

#[derive(Debug, Clone)]
pub struct ScrollTrigger {
    page_size: usize,
    dragging: bool,
}

impl ScrollTrigger {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size,
            dragging: false,
        }
    }

    /// A new drag gesture started; re-arms the trigger.
    pub fn on_drag_start(&mut self) {
        self.dragging = true;
    }

    pub fn is_armed(&self) -> bool {
        self.dragging
    }

    /// Returns true when the next page should be requested.  Firing disarms
    /// the trigger until the next drag start.
    pub fn on_scroll(&mut self, window: ScrollWindow, flags: PageFlags) -> bool {
        let at_last_item =
            window.first_visible + window.visible_count as i64 >= window.total_count as i64;
        let should_paginate = !flags.is_error
            && !flags.is_loading
            && !flags.is_last_page
            && at_last_item
            && window.first_visible >= 0
            && window.total_count >= self.page_size
            && self.dragging;

        if should_paginate {
            self.dragging = false;
        }
        should_paginate
    }
}

/// Whether `page` is past the last page of `total_results`.
///
/// Kept as `total_results / page_size + 2` compared for equality with the
/// next page to fetch, so the list stops one page after the ceiling count
/// would.  A `page_size` of zero never reports a last page.
pub fn is_last_page(total_results: u32, page: u32, page_size: u32) -> bool {
    match total_results.checked_div(page_size) {
        Some(pages) => page == pages + 2,
        None => false,
    }
}
