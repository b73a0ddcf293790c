pub mod chart;
pub mod crosshair;
pub mod layout;
pub mod statusbar;
pub mod ticker;
pub mod tooltip;

pub use chart::ChartState;
pub use crosshair::{CrosshairHandler, PointRef, PointerEvent};
pub use layout::LayoutManager;
pub use statusbar::StatusBar;
pub use ticker::{TickerPanel, TickerView};
