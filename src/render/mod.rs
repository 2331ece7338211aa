/// Markup generation for the detail panel and map pins.
///
/// Submodules:
/// - `detail` — the detail panel and the error panel.
/// - `sections` — optional detail sections, each omitted when empty.
/// - `pin` — map pins and their popups.
/// - `markup` — escaping and date/number formatting.
///
/// Rendering does no I/O.

pub mod detail;
pub mod markup;
pub mod pin;
pub mod sections;

pub use detail::{render_detail, render_error_panel, RenderOptions};
pub use pin::{build_pins, render_map_pin, MapPin, PinIcon};
