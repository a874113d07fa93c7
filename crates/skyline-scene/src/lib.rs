//! Ambient sky animation for skyline.
//!
//! A [`Scene`] owns two entity pools (stars for the dark theme, birds for
//! the light one), the periodic tasks that animate them and a pure
//! projector that turns them into drawable [`Primitive`]s. The painter
//! rasterizes those primitives into terminal cells.

mod chars;
mod clouds;
mod color;
mod entities;
mod paint;
mod projector;
mod scheduler;
mod state;

pub use clouds::{Anchor, CLOUDS, CloudDescriptor, CloudSize, Offset};
pub use entities::bird::{self, Bird};
pub use entities::star::{self, Star};
pub use paint::{CellMetrics, paint, rasterize};
pub use projector::{
    FLOCKS, FlockTier, FlockView, Point, Primitive, WingPose, WingStroke, float_offset, project,
    pulse_opacity,
};
pub use scheduler::{Scheduler, TaskGuard, TaskKind};
pub use state::{Scene, SceneSettings, TickReport};
