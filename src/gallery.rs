use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::{AnimationConfig, FetchOrdering};
use crate::error::{FetchError, GalleryError};
use crate::events::{ImageRecord, SwipeDirection};
use crate::focus::{FocusChange, FocusDriver, FocusMode};

/// Handle for one in-flight feed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchApplied {
    Replaced { count: usize },
    Stale,
    Failed,
}

/// What the rendering surface draws.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryView {
    pub images: Arc<[ImageRecord]>,
    pub loading: bool,
    pub focused: bool,
    pub page: usize,
    pub animation_value: f32,
    pub toolbar_offset: f32,
    pub corner_radius: f32,
    pub scroll_enabled: bool,
    pub toolbar_visible: bool,
}

impl GalleryView {
    pub fn displayed(&self) -> Option<&ImageRecord> {
        self.images.get(self.page)
    }
}

/// Single source of truth for the image sequence and the view mode.
///
/// Rules:
/// - Starts loading with no images; the first successful fetch clears `loading`.
/// - A successful fetch replaces the sequence wholesale and resets the page to 0.
/// - A failed fetch leaves everything as it was.
/// - Focus toggles never touch the images; swipes are ignored while focused.
#[derive(Debug)]
pub struct Gallery {
    images: Arc<[ImageRecord]>,
    loading: bool,
    page: usize,
    focus: FocusDriver,
    fetch_count: usize,
    ordering: FetchOrdering,
    last_issued: u64,
}

impl Gallery {
    pub fn new(fetch_count: usize, ordering: FetchOrdering, animation: AnimationConfig) -> Self {
        Self {
            images: Arc::from(Vec::new()),
            loading: true,
            page: 0,
            focus: FocusDriver::new(animation),
            fetch_count,
            ordering,
            last_issued: 0,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn images(&self) -> &[ImageRecord] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn focus(&self) -> &FocusDriver {
        &self.focus
    }

    pub fn focus_mut(&mut self) -> &mut FocusDriver {
        &mut self.focus
    }

    /// Record a new request. Requests are never de-duplicated.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.last_issued += 1;
        debug!(
            seq = self.last_issued,
            count = self.fetch_count,
            "requesting image batch"
        );
        FetchTicket {
            seq: self.last_issued,
            count: self.fetch_count,
        }
    }

    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<ImageRecord>, FetchError>,
    ) -> FetchApplied {
        if self.ordering == FetchOrdering::LatestRequest && ticket.seq < self.last_issued {
            debug!(
                seq = ticket.seq,
                latest = self.last_issued,
                "dropping response from superseded request"
            );
            return FetchApplied::Stale;
        }
        match result {
            Ok(images) => {
                let count = images.len();
                self.images = Arc::from(images);
                self.loading = false;
                self.page = 0;
                info!(seq = ticket.seq, count, "image batch loaded");
                FetchApplied::Replaced { count }
            }
            Err(err) => {
                warn!(seq = ticket.seq, error = %err, "image batch request failed");
                FetchApplied::Failed
            }
        }
    }

    pub fn toggle_focus(&mut self) -> FocusChange {
        let change = self.focus.toggle();
        debug!(from = ?change.from, to = ?change.to, "focus toggled");
        change
    }

    pub fn current_image(&self, index: usize) -> Result<&ImageRecord, GalleryError> {
        self.images.get(index).ok_or(GalleryError::IndexOutOfRange {
            index,
            len: self.images.len(),
        })
    }

    /// The record on the visible page.
    pub fn displayed(&self) -> Result<&ImageRecord, GalleryError> {
        self.current_image(self.page)
    }

    /// Move one page. Returns false when scrolling is disabled or at either end.
    pub fn swipe(&mut self, direction: SwipeDirection) -> bool {
        if !self.focus.mode().scroll_enabled() || self.images.is_empty() {
            return false;
        }
        let next = match direction {
            SwipeDirection::Next if self.page + 1 < self.images.len() => self.page + 1,
            SwipeDirection::Previous if self.page > 0 => self.page - 1,
            _ => return false,
        };
        self.page = next;
        true
    }

    pub fn view(&self) -> GalleryView {
        let mode = self.focus.mode();
        GalleryView {
            images: Arc::clone(&self.images),
            loading: self.loading,
            focused: mode == FocusMode::Focused,
            page: self.page,
            animation_value: self.focus.value(),
            toolbar_offset: self.focus.toolbar_offset(),
            corner_radius: self.focus.corner_radius(),
            scroll_enabled: mode.scroll_enabled(),
            toolbar_visible: mode.toolbar_visible(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gallery(ordering: FetchOrdering) -> Gallery {
        Gallery::new(100, ordering, AnimationConfig::default())
    }

    fn records(ids: &[&str]) -> Vec<ImageRecord> {
        ids.iter()
            .map(|id| {
                ImageRecord::new(
                    *id,
                    format!("https://img/{id}/full"),
                    format!("https://img/{id}/regular"),
                )
            })
            .collect()
    }

    #[test]
    fn starts_loading_and_empty() {
        let g = gallery(FetchOrdering::LastArrival);
        assert!(g.is_loading());
        assert!(g.is_empty());
        assert!(g.view().loading);
        assert_eq!(
            g.current_image(0),
            Err(GalleryError::IndexOutOfRange { index: 0, len: 0 })
        );
    }

    #[test]
    fn current_image_rejects_out_of_range() {
        let mut g = gallery(FetchOrdering::LastArrival);
        let t = g.begin_fetch();
        g.complete_fetch(t, Ok(records(&["a", "b", "c"])));
        assert_eq!(g.current_image(2).unwrap().id, "c");
        for index in [3, 4, usize::MAX] {
            assert_eq!(
                g.current_image(index),
                Err(GalleryError::IndexOutOfRange { index, len: 3 })
            );
        }
    }

    #[test]
    fn full_batch_loads_in_order() {
        // a..z, then aa, ab, ..
        let ids: Vec<String> = (0..100u8)
            .map(|i| match i {
                0..26 => char::from(b'a' + i).to_string(),
                _ => format!(
                    "{}{}",
                    char::from(b'a' + (i - 26) / 26),
                    char::from(b'a' + (i - 26) % 26)
                ),
            })
            .collect();
        let ids: Vec<&str> = ids.iter().map(String::as_str).collect();

        let mut g = gallery(FetchOrdering::LastArrival);
        let t = g.begin_fetch();
        assert_eq!(t.count, 100);
        assert_eq!(
            g.complete_fetch(t, Ok(records(&ids))),
            FetchApplied::Replaced { count: 100 }
        );
        assert_eq!(g.len(), 100);
        assert!(!g.is_loading());
        assert_eq!(g.current_image(0).unwrap().id, "a");
        assert_eq!(g.current_image(99).unwrap().id, ids[99]);
    }

    #[test]
    fn failed_fetch_keeps_prior_state() {
        let mut g = gallery(FetchOrdering::LastArrival);
        let t = g.begin_fetch();
        assert_eq!(
            g.complete_fetch(t, Err(FetchError::Other("offline".into()))),
            FetchApplied::Failed
        );
        assert!(g.is_loading());

        let t = g.begin_fetch();
        g.complete_fetch(t, Ok(records(&["a", "b"])));
        g.swipe(SwipeDirection::Next);
        let t = g.begin_fetch();
        g.complete_fetch(t, Err(FetchError::Other("offline".into())));
        assert!(!g.is_loading());
        assert_eq!(g.len(), 2);
        assert_eq!(g.page(), 1);
    }

    #[test]
    fn refresh_replaces_rather_than_appends() {
        let mut g = gallery(FetchOrdering::LastArrival);
        let t = g.begin_fetch();
        g.complete_fetch(t, Ok(records(&["a", "b", "c"])));
        g.swipe(SwipeDirection::Next);
        let t = g.begin_fetch();
        g.complete_fetch(t, Ok(records(&["x", "y"])));
        let ids: Vec<&str> = g.images().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["x", "y"]);
        assert_eq!(g.page(), 0);
    }

    #[test]
    fn last_arrival_wins_by_default() {
        let mut g = gallery(FetchOrdering::LastArrival);
        let first = g.begin_fetch();
        let second = g.begin_fetch();
        g.complete_fetch(second, Ok(records(&["new"])));
        assert_eq!(
            g.complete_fetch(first, Ok(records(&["old"]))),
            FetchApplied::Replaced { count: 1 }
        );
        assert_eq!(g.displayed().unwrap().id, "old");
    }

    #[test]
    fn latest_request_drops_superseded_responses() {
        let mut g = gallery(FetchOrdering::LatestRequest);
        let first = g.begin_fetch();
        let second = g.begin_fetch();
        g.complete_fetch(second, Ok(records(&["new"])));
        assert_eq!(
            g.complete_fetch(first, Ok(records(&["old"]))),
            FetchApplied::Stale
        );
        assert_eq!(g.displayed().unwrap().id, "new");
    }

    #[test]
    fn swipes_are_gated_by_focus_and_bounds() {
        let mut g = gallery(FetchOrdering::LastArrival);
        assert!(!g.swipe(SwipeDirection::Next));
        let t = g.begin_fetch();
        g.complete_fetch(t, Ok(records(&["a", "b"])));

        assert!(!g.swipe(SwipeDirection::Previous));
        assert!(g.swipe(SwipeDirection::Next));
        assert!(!g.swipe(SwipeDirection::Next));
        assert_eq!(g.displayed().unwrap().id, "b");

        g.toggle_focus();
        assert!(!g.view().scroll_enabled);
        assert!(!g.swipe(SwipeDirection::Previous));
        assert_eq!(g.page(), 1);

        g.toggle_focus();
        assert!(g.swipe(SwipeDirection::Previous));
        assert_eq!(g.page(), 0);
    }

    #[test]
    fn toggle_focus_leaves_images_alone() {
        let mut g = gallery(FetchOrdering::LastArrival);
        let t = g.begin_fetch();
        g.complete_fetch(t, Ok(records(&["a", "b"])));
        let before = g.view().images;
        g.toggle_focus();
        let view = g.view();
        assert!(view.focused);
        assert_eq!(view.images, before);
        assert_eq!(g.focus().target(), 0.9);
    }
}
