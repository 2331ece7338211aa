//! Presentation core for the Sources Vivantes water-source map.
//!
//! Loads the sources document, judges each analysis against the regulatory
//! limits, and renders the detail panel and map pins. The page around it
//! (map tiles, buttons, clipboard) is driven through `app::AppContext` and
//! the `map::MapProvider` seam.

pub mod actions;
pub mod app;
pub mod config;
pub mod conformity;
pub mod geo;
pub mod ingest;
pub mod logging;
pub mod map;
pub mod model;
pub mod panel;
pub mod render;
pub mod store;
pub mod verify;
