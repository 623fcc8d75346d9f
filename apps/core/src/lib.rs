// Shared by the terminal and web front ends
pub mod atlas;
pub mod config;
pub mod domain;
pub mod geo;
pub mod loader;
pub mod map;
pub mod nearby;
pub mod overlays;
pub mod sidebar;

pub use atlas::Atlas;
pub use config::{AtlasConfig, ConfigError};
pub use domain::{Overlay, OverlayFile, Poi};
pub use geo::{distance, LatLng};
pub use loader::{load_overlays, LoadFailure, LoadedOverlays, OverlaySource, SourceError};
pub use map::{MapView, Marker, MarkerLayer, Popup};
pub use nearby::{compute_nearby, NearbyView};
pub use overlays::{OverlayState, ToggleError, ToggleOutcome};
pub use sidebar::{Panel, SidebarModel};
