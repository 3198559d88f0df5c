//! Shared fonts and colors.
//!
//! Screens import this with `use ensemble_widgets::theme::*;` inside their
//! `live_design!` blocks.

use makepad_widgets::*;

live_design! {
    use link::theme::*;

    // ─── Fonts ─────────────────────────────────────────────────────────────

    pub FONT_REGULAR = <THEME_FONT_REGULAR> {}
    pub FONT_MEDIUM = <THEME_FONT_REGULAR> {}
    pub FONT_SEMIBOLD = <THEME_FONT_BOLD> {}

    // ─── Colors ────────────────────────────────────────────────────────────

    pub WHITE = #ffffff
    pub PAGE_BG = #f5f7fa
    pub PANEL_BG = #ffffff
    pub HOVER_BG = #f1f5f9
    pub DIVIDER = #e5e7eb
    pub OVERLAY_BG = #0f172a80

    pub TEXT_PRIMARY = #1f2937
    pub TEXT_SECONDARY = #374151
    pub TEXT_MUTED = #9ca3af

    pub GRAY_700 = #374151
    pub BLUE_100 = #dbeafe
    pub BLUE_500 = #3b82f6
    pub BLUE_700 = #1d4fd8
    pub RED_500 = #ef4444
    pub RED_600 = #dc2626
    pub GREEN_100 = #dcfce7
    pub AMBER_100 = #fef3c7
}
