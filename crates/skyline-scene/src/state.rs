//! Scene state management.

use fastrand::Rng;
use ratatui::{Frame, layout::Rect};
use skyline_core::{Theme, Viewport};
use tracing::{debug, trace};

use crate::entities::bird::{self, Bird};
use crate::entities::star::{self, Star};
use crate::paint::{self, CellMetrics};
use crate::projector::{self, Primitive};
use crate::scheduler::{Scheduler, TaskGuard, TaskKind};

/// Pool sizes and tick intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneSettings {
    pub star_count: usize,
    pub bird_count: usize,
    pub twinkle_interval_ms: u64,
    pub flight_interval_ms: u64,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            star_count: 100,
            bird_count: 8,
            twinkle_interval_ms: 50,
            flight_interval_ms: 60,
        }
    }
}

/// What a call to [`Scene::on_tick`] did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Star opacities were recomputed.
    pub twinkled: bool,
    /// Birds moved.
    pub flew: bool,
    /// Birds that wrapped back to the left edge.
    pub wrapped: usize,
}

/// The ambient sky: entity pools, their periodic tasks and the projector.
///
/// The host drives it through `mount`/`unmount` and the `on_*` methods. The
/// pools belong to the scene alone; callers get read-only access.
#[derive(Debug)]
pub struct Scene {
    settings: SceneSettings,
    rng: Rng,
    stars: Vec<Star>,
    birds: Vec<Bird>,
    /// Last valid viewport; `None` until one is observed.
    viewport: Option<Viewport>,
    theme: Theme,
    mounted: bool,
    scheduler: Scheduler,
    twinkle_task: Option<TaskGuard>,
    flight_task: Option<TaskGuard>,
}

impl Scene {
    /// Create an unmounted scene seeded from the system time.
    pub fn new(settings: SceneSettings) -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};

        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        Self::with_seed(settings, seed)
    }

    /// Create an unmounted scene with reproducible randomness.
    pub fn with_seed(settings: SceneSettings, seed: u64) -> Self {
        debug!(seed, ?settings, "scene created");
        Self {
            settings,
            rng: Rng::with_seed(seed),
            stars: Vec::new(),
            birds: Vec::new(),
            viewport: None,
            theme: Theme::default(),
            mounted: false,
            scheduler: Scheduler::new(),
            twinkle_task: None,
            flight_task: None,
        }
    }

    /// Attach the scene to a viewport, seeding fresh pools.
    ///
    /// Pools left over from an earlier mount are discarded.
    pub fn mount(&mut self, viewport: Viewport, theme: Theme, now_ms: u64) {
        debug!(?viewport, %theme, "mounting scene");
        self.mounted = true;
        self.theme = theme;
        self.stars.clear();
        self.birds.clear();
        self.viewport = None;
        self.observe_viewport(viewport);
        self.reschedule(now_ms);
    }

    /// Detach the scene. Both periodic tasks stop; pools are kept but inert.
    pub fn unmount(&mut self) {
        debug!("unmounting scene");
        self.mounted = false;
        self.twinkle_task = None;
        self.flight_task = None;
    }

    /// Regenerate the star pool for a new viewport.
    ///
    /// Birds keep flying; the next flight tick wraps them against the new
    /// width. Resizes while unmounted are ignored.
    pub fn on_resize(&mut self, viewport: Viewport, now_ms: u64) {
        if !self.mounted {
            trace!(?viewport, "resize ignored while unmounted");
            return;
        }
        self.observe_viewport(viewport);
        self.reschedule(now_ms);
    }

    /// Switch the active pool. The inactive one stays dormant.
    pub fn on_theme_change(&mut self, theme: Theme, now_ms: u64) {
        if theme == self.theme {
            return;
        }
        debug!(from = %self.theme, to = %theme, "theme changed");
        self.theme = theme;
        self.reschedule(now_ms);
    }

    /// Run every periodic task that is due at `now_ms`.
    ///
    /// All entities updated by one tick see the same timestamp.
    pub fn on_tick(&mut self, now_ms: u64) -> TickReport {
        let mut report = TickReport::default();
        let Some(viewport) = self.viewport else {
            return report;
        };

        for kind in self.scheduler.poll(now_ms) {
            match kind {
                TaskKind::Twinkle => {
                    star::twinkle(&mut self.stars, now_ms);
                    report.twinkled = true;
                }
                TaskKind::Flight => {
                    report.wrapped +=
                        bird::fly(&mut self.birds, now_ms, viewport.width, &mut self.rng);
                    report.flew = true;
                }
            }
        }
        report
    }

    /// Project the visible pool into primitives, back to front.
    ///
    /// Empty while unmounted or before a valid viewport is known.
    pub fn project(&self) -> Vec<Primitive> {
        match self.viewport {
            Some(viewport) if self.mounted => {
                projector::project(self.theme, viewport, &self.stars, &self.birds)
            }
            _ => Vec::new(),
        }
    }

    /// Render the scene to the frame.
    pub fn render(&self, frame: &mut Frame, area: Rect, metrics: CellMetrics, now_ms: u64) {
        let primitives = self.project();
        paint::paint(frame, area, self.theme, &primitives, metrics, now_ms);
    }

    fn observe_viewport(&mut self, viewport: Viewport) {
        if !viewport.is_valid() {
            debug!(?viewport, "viewport not laid out yet, generation skipped");
            self.viewport = None;
            return;
        }

        self.viewport = Some(viewport);
        self.stars = star::generate(self.settings.star_count, viewport, &mut self.rng);
        if self.birds.is_empty() {
            self.birds = bird::generate(self.settings.bird_count, viewport, &mut self.rng);
        }
        debug!(
            stars = self.stars.len(),
            birds = self.birds.len(),
            width = viewport.width,
            height = viewport.height,
            "pools seeded"
        );
    }

    /// Start the task for the active theme and stop the other one.
    fn reschedule(&mut self, now_ms: u64) {
        let live = self.mounted && self.viewport.is_some();
        let twinkle = live && self.theme.is_dark();
        let flight = live && !self.theme.is_dark();

        Self::toggle_task(
            &mut self.scheduler,
            &mut self.twinkle_task,
            twinkle,
            TaskKind::Twinkle,
            self.settings.twinkle_interval_ms,
            now_ms,
        );
        Self::toggle_task(
            &mut self.scheduler,
            &mut self.flight_task,
            flight,
            TaskKind::Flight,
            self.settings.flight_interval_ms,
            now_ms,
        );
    }

    fn toggle_task(
        scheduler: &mut Scheduler,
        slot: &mut Option<TaskGuard>,
        wanted: bool,
        kind: TaskKind,
        interval_ms: u64,
        now_ms: u64,
    ) {
        match (wanted, slot.is_some()) {
            (true, false) => {
                debug!(?kind, interval_ms, "starting task");
                *slot = Some(scheduler.start(kind, interval_ms, now_ms));
            }
            (false, true) => {
                if let Some(guard) = slot.take() {
                    debug!(kind = ?guard.kind(), "stopping task");
                }
            }
            _ => {}
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn birds(&self) -> &[Bird] {
        &self.birds
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Last valid viewport, if any.
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Whether the periodic task of this kind is currently scheduled.
    pub fn is_running(&self, kind: TaskKind) -> bool {
        self.scheduler.is_running(kind)
    }

    pub fn settings(&self) -> SceneSettings {
        self.settings
    }
}
