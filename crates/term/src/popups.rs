//! Floating score callouts driven by session events.
//!
//! A match shows its bonus over the middle of the matched path; every cell a
//! slide crosses shows the penalty that step adds.

use arrayvec::ArrayVec;

use crate::core::SessionEvent;
use crate::types::GridPos;

pub const MAX_POPUPS: usize = 32;
pub const DEFAULT_POPUP_TTL_MS: u32 = 900;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Popup {
    pub pos: GridPos,
    pub points: i32,
    pub age_ms: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupLayer {
    items: ArrayVec<Popup, MAX_POPUPS>,
    ttl_ms: u32,
}

impl PopupLayer {
    pub fn new(ttl_ms: u32) -> Self {
        Self {
            items: ArrayVec::new(),
            ttl_ms,
        }
    }

    pub fn ttl_ms(&self) -> u32 {
        self.ttl_ms
    }

    pub fn iter(&self) -> impl Iterator<Item = &Popup> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// React to one session event
    pub fn observe(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::Matched { path, points, .. } => {
                if let Some(&mid) = path.get(path.len() / 2) {
                    self.push(mid, *points as i32);
                }
            }
            SessionEvent::SlideStep {
                vacated,
                step_index,
                ..
            } => self.push(*vacated, -(*step_index as i32)),
            _ => {}
        }
    }

    /// Age every popup and drop the expired ones
    pub fn tick(&mut self, elapsed_ms: u32) {
        for p in self.items.iter_mut() {
            p.age_ms = p.age_ms.saturating_add(elapsed_ms);
        }
        let ttl = self.ttl_ms;
        self.items.retain(|p| p.age_ms < ttl);
    }

    /// Fraction of its lifetime a popup has used, `0.0..=1.0`
    pub fn progress(&self, popup: &Popup) -> f32 {
        if self.ttl_ms == 0 {
            return 1.0;
        }
        (popup.age_ms as f32 / self.ttl_ms as f32).min(1.0)
    }

    fn push(&mut self, pos: GridPos, points: i32) {
        if self.items.is_full() {
            self.items.remove(0);
        }
        self.items.push(Popup {
            pos,
            points,
            age_ms: 0,
        });
    }
}

impl Default for PopupLayer {
    fn default() -> Self {
        Self::new(DEFAULT_POPUP_TTL_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TileId;

    #[test]
    fn test_match_popup_sits_mid_path() {
        let mut layer = PopupLayer::default();
        layer.observe(&SessionEvent::Matched {
            path: vec![
                GridPos::new(0, 0),
                GridPos::new(0, 1),
                GridPos::new(0, 2),
                GridPos::new(0, 3),
            ],
            numbers: (5, 5),
            points: 6,
        });
        let popup = layer.iter().next().copied().unwrap();
        assert_eq!(popup.pos, GridPos::new(0, 2));
        assert_eq!(popup.points, 6);
    }

    #[test]
    fn test_slide_steps_are_negative() {
        let mut layer = PopupLayer::default();
        for step in 1..=3 {
            layer.observe(&SessionEvent::SlideStep {
                tile: TileId(1),
                vacated: GridPos::new(2, step as i8),
                step_index: step,
            });
        }
        let points: Vec<i32> = layer.iter().map(|p| p.points).collect();
        assert_eq!(points, vec![-1, -2, -3]);
    }

    #[test]
    fn test_expiry_and_capacity() {
        let mut layer = PopupLayer::new(100);
        for i in 0..(MAX_POPUPS as u32 + 5) {
            layer.observe(&SessionEvent::SlideStep {
                tile: TileId(1),
                vacated: GridPos::new(0, 0),
                step_index: i + 1,
            });
        }
        assert_eq!(layer.len(), MAX_POPUPS);
        assert_eq!(layer.iter().next().map(|p| p.points), Some(-6));

        layer.tick(99);
        assert_eq!(layer.len(), MAX_POPUPS);
        layer.tick(1);
        assert!(layer.is_empty());
    }
}
