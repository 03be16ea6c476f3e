//! Anchor computation for the transient UI.
//!
//! Anchors are page coordinates: the client-space geometry captured at
//! gesture time, offset by the scroll position sampled at the same moment.
//! They are never re-derived afterwards; if the page scrolls while the
//! transient UI is open, closing and reopening is the corrective path.

use crate::shared::types::{Point, Rect, Viewport};

/// Horizontal gap between a double-click point and the floating button.
pub const DOUBLE_CLICK_MARGIN_PX: f64 = 20.0;

/// Vertical gap between the floating button and the popup opened from it.
pub const POPUP_VERTICAL_OFFSET_PX: f64 = 30.0;

/// Button anchor for a pointer selection: the right edge and top of the
/// selection's bounding rectangle.
pub fn selection_anchor(rect: &Rect, viewport: &Viewport) -> Point {
    Point {
        x: rect.right() + viewport.scroll_x,
        y: rect.y + viewport.scroll_y,
    }
}

/// Button anchor for a double-click: the click point, nudged right so the
/// button does not cover the word.
pub fn double_click_anchor(point: &Point, viewport: &Viewport) -> Point {
    Point {
        x: point.x + viewport.scroll_x + DOUBLE_CLICK_MARGIN_PX,
        y: point.y + viewport.scroll_y,
    }
}

/// Popup anchor when a highlight marker is clicked: the click point itself.
pub fn highlight_click_anchor(point: &Point, viewport: &Viewport) -> Point {
    Point {
        x: point.x + viewport.scroll_x,
        y: point.y + viewport.scroll_y,
    }
}

/// Where the popup opens relative to the button that triggered it.
pub fn popup_anchor(button: &Point) -> Point {
    Point {
        x: button.x,
        y: button.y + POPUP_VERTICAL_OFFSET_PX,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_anchor_uses_right_edge_plus_scroll() {
        let rect = Rect {
            x: 100.0,
            y: 40.0,
            width: 60.0,
            height: 18.0,
        };
        let viewport = Viewport {
            scroll_x: 5.0,
            scroll_y: 300.0,
        };
        let anchor = selection_anchor(&rect, &viewport);
        assert_eq!(anchor.x, 165.0);
        assert_eq!(anchor.y, 340.0);
    }

    #[test]
    fn test_double_click_anchor_applies_margin() {
        let point = Point { x: 50.0, y: 20.0 };
        let viewport = Viewport {
            scroll_x: 0.0,
            scroll_y: 100.0,
        };
        let anchor = double_click_anchor(&point, &viewport);
        assert_eq!(anchor.x, 50.0 + DOUBLE_CLICK_MARGIN_PX);
        assert_eq!(anchor.y, 120.0);
    }

    #[test]
    fn test_popup_opens_below_button() {
        let button = Point { x: 10.0, y: 10.0 };
        let popup = popup_anchor(&button);
        assert_eq!(popup.x, 10.0);
        assert_eq!(popup.y, 10.0 + POPUP_VERTICAL_OFFSET_PX);
    }
}
