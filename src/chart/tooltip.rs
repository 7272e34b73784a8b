//! Click-to-pin tooltip for the daily statistics chart.
//!
//! While unlocked the tooltip follows hover. Locking pins it to a data
//! index: the first frame after the lock captures where the chart engine
//! drew it, and every later frame puts it back there if the engine moved
//! it. Frames are driven by the caller through [`TooltipLock::on_frame`].

use chrono::NaiveDate;
use tracing::debug;

use crate::chart::content::TooltipContent;
use crate::models::statistics::DailyStats;
use crate::theme::EffectiveTheme;
use crate::utils::time;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TooltipPosition {
    pub left: f64,
    pub top: f64,
}

/// The rendered tooltip element as seen by the lock.
#[cfg_attr(test, mockall::automock)]
pub trait TooltipSurface {
    /// Current on-screen position, `None` while the element is not rendered.
    fn position(&self) -> Option<TooltipPosition>;
    fn set_position(&mut self, position: TooltipPosition);
    fn set_content(&mut self, html: &str);
    fn set_transitions(&mut self, enabled: bool);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pin {
    /// Waiting for the next frame to capture the position.
    Pending,
    Pinned(TooltipPosition),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LockState {
    Unlocked,
    Locked {
        data_index: usize,
        theme: EffectiveTheme,
        content: TooltipContent,
        pin: Pin,
    },
}

pub struct TooltipLock<S: TooltipSurface> {
    surface: S,
    days: Vec<DailyStats>,
    today: NaiveDate,
    theme: EffectiveTheme,
    state: LockState,
}

impl<S: TooltipSurface> TooltipLock<S> {
    pub fn new(surface: S, days: Vec<DailyStats>, theme: EffectiveTheme) -> Self {
        Self::with_today(surface, days, theme, time::today())
    }

    /// Fixed reference day for the "Auj."/"Hier" labels.
    pub fn with_today(
        surface: S,
        days: Vec<DailyStats>,
        theme: EffectiveTheme,
        today: NaiveDate,
    ) -> Self {
        Self {
            surface,
            days,
            today,
            theme,
            state: LockState::Unlocked,
        }
    }

    pub fn state(&self) -> &LockState {
        &self.state
    }

    pub fn is_locked(&self) -> bool {
        matches!(self.state, LockState::Locked { .. })
    }

    pub fn locked_index(&self) -> Option<usize> {
        match self.state {
            LockState::Locked { data_index, .. } => Some(data_index),
            LockState::Unlocked => None,
        }
    }

    pub fn pinned_position(&self) -> Option<TooltipPosition> {
        match self.state {
            LockState::Locked { pin: Pin::Pinned(position), .. } => Some(position),
            _ => None,
        }
    }

    /// True while frames re-apply a captured position.
    pub fn is_enforcing(&self) -> bool {
        self.pinned_position().is_some()
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    pub fn theme(&self) -> EffectiveTheme {
        self.theme
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Swaps the chart data. A lock on an index that no longer exists is
    /// released.
    pub fn set_days(&mut self, days: Vec<DailyStats>) {
        self.days = days;
        if let Some(index) = self.locked_index() {
            if index >= self.days.len() {
                self.unlock();
            } else {
                self.refresh_locked_content();
            }
        }
    }

    fn content_for(&self, index: usize, locked: bool) -> Option<TooltipContent> {
        self.days
            .get(index)
            .map(|day| TooltipContent::for_day(day, self.today, locked, self.theme))
    }

    /// Hover while unlocked shows the plain tooltip. Ignored while locked.
    pub fn hover(&mut self, index: usize) -> bool {
        if self.is_locked() {
            return false;
        }
        match self.content_for(index, false) {
            Some(content) => {
                self.surface.set_content(&content.render_html());
                true
            }
            None => false,
        }
    }

    /// Pins the tooltip on `index`. Locking while locked replaces the
    /// previous lock. Out-of-range indexes are ignored.
    pub fn lock(&mut self, index: usize) -> bool {
        let Some(content) = self.content_for(index, true) else {
            debug!(index, days = self.days.len(), "Ignoring tooltip lock out of range");
            return false;
        };
        self.surface.set_content(&content.render_html());
        if let Some(previous) = self.locked_index() {
            debug!(previous, index, "Replacing tooltip lock");
        }
        self.state = LockState::Locked {
            data_index: index,
            theme: self.theme,
            content,
            pin: Pin::Pending,
        };
        debug!(index, "Tooltip locked");
        true
    }

    /// Restores hover behavior. Returns whether a lock was released.
    pub fn unlock(&mut self) -> bool {
        let LockState::Locked { data_index, .. } = self.state else {
            return false;
        };
        if let Some(content) = self.content_for(data_index, false) {
            self.surface.set_content(&content.render_html());
        }
        self.state = LockState::Unlocked;
        self.surface.set_transitions(true);
        debug!(index = data_index, "Tooltip unlocked");
        true
    }

    /// Click on a data point. Any click while locked unlocks, whatever the
    /// index.
    pub fn toggle(&mut self, index: usize) -> bool {
        if self.is_locked() {
            self.unlock();
            false
        } else {
            self.lock(index)
        }
    }

    /// One render tick. Captures the position after a lock, then keeps the
    /// tooltip at it. Returns whether the surface was corrected.
    pub fn on_frame(&mut self) -> bool {
        let current = self.surface.position();
        let LockState::Locked { pin, content, .. } = &mut self.state else {
            return false;
        };
        match *pin {
            Pin::Pending => {
                let Some(position) = current else {
                    return false;
                };
                *pin = Pin::Pinned(position);
                let html = content.render_html();
                self.surface.set_transitions(false);
                self.surface.set_position(position);
                self.surface.set_content(&html);
                debug!(left = position.left, top = position.top, "Tooltip position captured");
                true
            }
            Pin::Pinned(position) => {
                if current == Some(position) {
                    return false;
                }
                self.surface.set_transitions(false);
                self.surface.set_position(position);
                true
            }
        }
    }

    /// Re-renders a locked tooltip for the new theme, keeping the lock and
    /// its position.
    pub fn update_theme(&mut self, theme: EffectiveTheme) {
        if self.theme == theme {
            return;
        }
        self.theme = theme;
        self.refresh_locked_content();
    }

    fn refresh_locked_content(&mut self) {
        let Some(index) = self.locked_index() else {
            return;
        };
        let Some(fresh) = self.content_for(index, true) else {
            return;
        };
        self.surface.set_content(&fresh.render_html());
        if let LockState::Locked { theme, content, .. } = &mut self.state {
            *theme = self.theme;
            *content = fresh;
        }
    }

    /// Releases any lock and stops enforcement.
    pub fn destroy(&mut self) {
        self.unlock();
    }
}
