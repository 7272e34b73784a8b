//! Daily statistics chart: tooltip content, the pin/unpin state machine
//! and the event routing around it.

pub mod content;
pub mod events;
pub mod tooltip;

pub use content::{TooltipContent, SERIES_CONFIG};
pub use events::{ChartEvent, ChartEvents};
pub use tooltip::{LockState, TooltipLock, TooltipPosition, TooltipSurface};
