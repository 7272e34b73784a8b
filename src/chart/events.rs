use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use crate::chart::tooltip::{TooltipLock, TooltipSurface};
use crate::theme::EffectiveTheme;

/// Input the chart reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChartEvent {
    /// Click inside the chart, as an x coordinate in data space.
    ChartClick { grid_x: f64 },
    /// Pointer over a data point.
    Hover { grid_x: f64 },
    /// Click anywhere in the document.
    DocumentClick { inside_chart: bool, inside_tooltip: bool },
    ThemeChanged(EffectiveTheme),
}

/// Nearest data index for a data-space x coordinate.
pub fn data_index(grid_x: f64) -> Option<usize> {
    if !grid_x.is_finite() {
        return None;
    }
    let rounded = grid_x.round();
    if rounded < 0.0 {
        None
    } else {
        Some(rounded as usize)
    }
}

/// Routes chart and document events into a [`TooltipLock`]. Events
/// received while detached are dropped.
pub struct ChartEvents<S: TooltipSurface> {
    lock: TooltipLock<S>,
    theme_rx: Option<watch::Receiver<EffectiveTheme>>,
    attached: bool,
}

impl<S: TooltipSurface> ChartEvents<S> {
    pub fn new(lock: TooltipLock<S>) -> Self {
        Self {
            lock,
            theme_rx: None,
            attached: false,
        }
    }

    pub fn lock(&self) -> &TooltipLock<S> {
        &self.lock
    }

    pub fn lock_mut(&mut self) -> &mut TooltipLock<S> {
        &mut self.lock
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Starts listening. Attaching twice is a no-op.
    pub fn attach(&mut self, theme_rx: Option<watch::Receiver<EffectiveTheme>>) -> bool {
        if self.attached {
            return false;
        }
        if let Some(mut rx) = theme_rx {
            rx.mark_unchanged();
            self.theme_rx = Some(rx);
        }
        self.attached = true;
        debug!("Chart listeners attached");
        true
    }

    /// Stops listening and releases any lock. Detaching twice is a no-op.
    pub fn detach(&mut self) -> bool {
        if !self.attached {
            return false;
        }
        self.lock.destroy();
        self.theme_rx = None;
        self.attached = false;
        debug!("Chart listeners detached");
        true
    }

    pub fn handle(&mut self, event: ChartEvent) {
        if !self.attached {
            return;
        }
        match event {
            ChartEvent::ChartClick { grid_x } => match data_index(grid_x) {
                Some(index) if index < self.lock.day_count() => {
                    self.lock.toggle(index);
                }
                _ => debug!(grid_x, "Chart click outside data range"),
            },
            ChartEvent::Hover { grid_x } => {
                if let Some(index) = data_index(grid_x) {
                    self.lock.hover(index);
                }
            }
            ChartEvent::DocumentClick {
                inside_chart,
                inside_tooltip,
            } => {
                if !inside_chart && !inside_tooltip {
                    self.lock.unlock();
                }
            }
            ChartEvent::ThemeChanged(theme) => self.lock.update_theme(theme),
        }
    }

    /// Forwards a pending theme change from the subscribed store, if any.
    pub fn poll_theme(&mut self) -> bool {
        let Some(rx) = self.theme_rx.as_mut() else {
            return false;
        };
        match rx.has_changed() {
            Ok(true) => {
                let theme = *rx.borrow_and_update();
                self.lock.update_theme(theme);
                true
            }
            Ok(false) => false,
            Err(_) => {
                // Theme store dropped.
                self.theme_rx = None;
                false
            }
        }
    }

    /// One frame: theme first, then position enforcement.
    pub fn tick(&mut self) -> bool {
        if !self.attached {
            return false;
        }
        self.poll_theme();
        self.lock.on_frame()
    }

    /// Drives the chart until the event channel closes, ticking every
    /// `frame`. Detaches on exit and hands the lock back.
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<ChartEvent>,
        frame: Duration,
    ) -> TooltipLock<S> {
        if !self.attached {
            self.attach(None);
        }
        let mut interval = tokio::time::interval(frame);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.handle(event),
                    None => break,
                },
                _ = interval.tick() => {
                    self.tick();
                }
            }
        }
        self.detach();
        info!("Chart event loop stopped");
        self.lock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::tooltip::TooltipPosition;
    use crate::models::statistics::DailyStats;
    use chrono::NaiveDate;

    #[derive(Default)]
    struct Surface {
        position: Option<TooltipPosition>,
        content: String,
        writes: usize,
    }

    impl TooltipSurface for Surface {
        fn position(&self) -> Option<TooltipPosition> {
            self.position
        }
        fn set_position(&mut self, position: TooltipPosition) {
            self.position = Some(position);
            self.writes += 1;
        }
        fn set_content(&mut self, html: &str) {
            self.content = html.to_string();
        }
        fn set_transitions(&mut self, _enabled: bool) {}
    }

    fn events() -> ChartEvents<Surface> {
        let days = (1..=4)
            .map(|d| DailyStats::empty(NaiveDate::from_ymd_opt(2024, 2, d).unwrap()))
            .collect();
        let surface = Surface {
            position: Some(TooltipPosition { left: 4.0, top: 8.0 }),
            ..Default::default()
        };
        let today = NaiveDate::from_ymd_opt(2024, 2, 20).unwrap();
        ChartEvents::new(TooltipLock::with_today(surface, days, EffectiveTheme::Light, today))
    }

    #[test]
    fn grid_coordinates_round_to_nearest_index() {
        assert_eq!(data_index(1.4), Some(1));
        assert_eq!(data_index(1.6), Some(2));
        assert_eq!(data_index(-0.4), Some(0));
        assert_eq!(data_index(-0.6), None);
        assert_eq!(data_index(f64::NAN), None);
    }

    #[test]
    fn clicks_toggle_only_within_range() {
        let mut chart = events();
        chart.attach(None);
        chart.handle(ChartEvent::ChartClick { grid_x: 9.0 });
        assert!(!chart.lock().is_locked());

        chart.handle(ChartEvent::ChartClick { grid_x: 2.2 });
        assert_eq!(chart.lock().locked_index(), Some(2));

        chart.handle(ChartEvent::ChartClick { grid_x: 0.0 });
        assert!(!chart.lock().is_locked());
    }

    #[test]
    fn outside_click_unlocks_but_tooltip_click_does_not() {
        let mut chart = events();
        chart.attach(None);
        chart.handle(ChartEvent::ChartClick { grid_x: 1.0 });

        chart.handle(ChartEvent::DocumentClick { inside_chart: false, inside_tooltip: true });
        assert!(chart.lock().is_locked());

        chart.handle(ChartEvent::DocumentClick { inside_chart: false, inside_tooltip: false });
        assert!(!chart.lock().is_locked());
    }

    #[test]
    fn attach_and_detach_are_idempotent() {
        let mut chart = events();
        assert!(chart.attach(None));
        assert!(!chart.attach(None));
        chart.handle(ChartEvent::ChartClick { grid_x: 1.0 });
        chart.tick();
        assert!(chart.lock().is_enforcing());

        assert!(chart.detach());
        assert!(!chart.detach());
        assert!(!chart.lock().is_enforcing());

        chart.handle(ChartEvent::ChartClick { grid_x: 1.0 });
        assert!(!chart.lock().is_locked());
    }

    #[test]
    fn reattach_after_detach_runs_one_enforcement() {
        let mut chart = events();
        chart.attach(None);
        chart.handle(ChartEvent::ChartClick { grid_x: 1.0 });
        chart.tick();
        assert!(chart.detach());

        assert!(chart.attach(None));
        assert!(!chart.lock().is_locked());
        chart.handle(ChartEvent::ChartClick { grid_x: 2.0 });
        chart.tick();
        assert_eq!(chart.lock().locked_index(), Some(2));
        let pinned = chart.lock().pinned_position();
        assert_eq!(pinned, Some(TooltipPosition { left: 4.0, top: 8.0 }));

        chart.lock_mut().surface_mut().position = Some(TooltipPosition { left: 90.0, top: 1.0 });
        let writes = chart.lock().surface().writes;
        assert!(chart.tick());
        assert_eq!(chart.lock().surface().writes, writes + 1);
        assert_eq!(chart.lock().surface().position, pinned);
        assert!(!chart.tick());
        assert_eq!(chart.lock().surface().writes, writes + 1);
    }

    #[test]
    fn theme_store_changes_reach_locked_tooltip() {
        let (tx, rx) = watch::channel(EffectiveTheme::Light);
        let mut chart = events();
        chart.attach(Some(rx));
        chart.handle(ChartEvent::ChartClick { grid_x: 0.0 });
        chart.tick();

        assert!(!chart.poll_theme());
        tx.send(EffectiveTheme::Dark).unwrap();
        chart.tick();
        assert_eq!(chart.lock().theme(), EffectiveTheme::Dark);
        assert!(chart.lock().is_locked());

        drop(tx);
        assert!(!chart.poll_theme());
    }

    #[tokio::test]
    async fn run_loop_pins_and_cleans_up() {
        let (tx, rx) = mpsc::channel(8);
        let chart = events();
        let handle = tokio::spawn(async move {
            let lock = chart.run(rx, Duration::from_millis(5)).await;
            lock.is_locked()
        });

        tx.send(ChartEvent::ChartClick { grid_x: 3.0 }).await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        drop(tx);

        let still_locked = handle.await.unwrap();
        assert!(!still_locked);
    }
}
