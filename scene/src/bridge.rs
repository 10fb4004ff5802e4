//! Coordinate bridge: exposes the selected object's screen position as text.
//!
//! An external automation harness polls a single text node and reads either
//! `"-"` (nothing selected) or `"<x>,<y>"` (integer CSS pixels, top-left
//! origin, no spaces). The engine writes through a [`CoordinateSink`] once per
//! frame while something is selected; the sentinel is written only on the
//! transition into "nothing selected". Every write is one fully formatted
//! string, so a reader never observes half an update.

#[cfg(test)]
#[path = "bridge_test.rs"]
mod bridge_test;

use std::cell::RefCell;
use std::rc::Rc;

use crate::camera::ScreenCoord;
use crate::consts::BRIDGE_SENTINEL_TEXT;

/// Write-only destination for bridge text.
pub trait CoordinateSink {
    /// Replace the visible text with `text`.
    fn write(&mut self, text: &str);
}

#[derive(Debug, Default)]
struct SharedTextInner {
    text: String,
    writes: usize,
}

/// In-memory sink. Clones share the same buffer, so one handle can be given
/// to the engine and another kept for reading.
#[derive(Debug, Clone, Default)]
pub struct SharedText {
    inner: Rc<RefCell<SharedTextInner>>,
}

impl SharedText {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text.
    #[must_use]
    pub fn text(&self) -> String {
        self.inner.borrow().text.clone()
    }

    /// Number of writes received.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.inner.borrow().writes
    }
}

impl CoordinateSink for SharedText {
    fn write(&mut self, text: &str) {
        let mut inner = self.inner.borrow_mut();
        text.clone_into(&mut inner.text);
        inner.writes += 1;
    }
}

/// Format a bridge value: `"x,y"`, or `"-"` for `None` and the sentinel pair.
#[must_use]
pub fn format_coord(coord: Option<ScreenCoord>) -> String {
    match coord {
        Some(c) if !c.is_sentinel() => format!("{},{}", c.x, c.y),
        _ => BRIDGE_SENTINEL_TEXT.to_owned(),
    }
}

/// Read a bridge value the way the automation client does.
///
/// Returns `None` for the sentinel, empty text, or anything that is not two
/// comma-separated numbers. Fractional values are truncated toward zero.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn parse_bridge_text(text: &str) -> Option<(i32, i32)> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == BRIDGE_SENTINEL_TEXT {
        return None;
    }
    let (x, y) = trimmed.split_once(',')?;
    let parse = |part: &str| -> Option<i32> {
        let Ok(value) = part.trim().parse::<f64>() else {
            return None;
        };
        if !value.is_finite() || value.abs() > f64::from(i32::MAX) {
            return None;
        }
        Some(value.trunc() as i32)
    };
    Some((parse(x)?, parse(y)?))
}

/// What the bridge last wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Published {
    Nothing,
    Sentinel,
    Coord(ScreenCoord),
}

/// Single-writer publisher in front of a [`CoordinateSink`].
pub struct Bridge {
    sink: Box<dyn CoordinateSink>,
    last: Published,
}

impl Bridge {
    #[must_use]
    pub fn new(sink: Box<dyn CoordinateSink>) -> Self {
        Self { sink, last: Published::Nothing }
    }

    /// Publish this frame's value. A coordinate is written every call; the
    /// sentinel only when the previous write was not already the sentinel.
    /// Returns whether the sink was written.
    pub fn publish(&mut self, coord: Option<ScreenCoord>) -> bool {
        match coord {
            Some(c) if !c.is_sentinel() => {
                self.sink.write(&format_coord(Some(c)));
                self.last = Published::Coord(c);
                true
            }
            _ => {
                if self.last == Published::Sentinel {
                    return false;
                }
                self.sink.write(BRIDGE_SENTINEL_TEXT);
                self.last = Published::Sentinel;
                true
            }
        }
    }

    /// Force the sentinel now (deselection), unless it is already showing.
    pub fn clear(&mut self) -> bool {
        self.publish(None)
    }

    /// Last published coordinate, `None` while showing the sentinel.
    #[must_use]
    pub fn last(&self) -> Option<ScreenCoord> {
        match self.last {
            Published::Coord(c) => Some(c),
            Published::Nothing | Published::Sentinel => None,
        }
    }

    /// Text the sink currently shows, as far as this bridge knows.
    #[must_use]
    pub fn text(&self) -> String {
        format_coord(self.last())
    }
}
