//! Map pin generation.
//!
//! A pin is everything the map provider needs for one source: position,
//! icon style, hover title and popup markup. Colour is a pure function of
//! the analysis status.

use serde::Serialize;

use crate::conformity::style_for;
use crate::logging::{self, Component};
use crate::model::{Coordinates, SourceRecord, SourcesError};
use crate::render::detail::title;
use crate::render::markup::{attr, format_date, text};

/// Circle marker style handed to the map provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PinIcon {
    pub fill_color: &'static str,
    pub fill_opacity: f64,
    pub stroke_color: &'static str,
    pub stroke_weight: u32,
    pub scale: u32,
}

impl PinIcon {
    fn for_color(fill_color: &'static str) -> Self {
        PinIcon {
            fill_color,
            fill_opacity: 0.8,
            stroke_color: "#ffffff",
            stroke_weight: 2,
            scale: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPin {
    /// Attached to the marker so clicks can be routed back to the record.
    pub source_id: String,
    pub position: Coordinates,
    pub title: String,
    pub icon: PinIcon,
    pub popup_markup: String,
}

/// Builds the pin for one record.
///
/// Fails with `RenderFailure` when the record cannot be placed.
pub fn render_map_pin(record: &SourceRecord) -> Result<MapPin, SourcesError> {
    let position = record.coordinates.ok_or_else(|| SourcesError::RenderFailure {
        id: record.id.clone(),
        message: "missing or non-numeric coordinates".to_string(),
    })?;
    let style = style_for(record.status());

    let place = [record.municipality.as_deref(), record.department.as_deref()]
        .into_iter()
        .flatten()
        .map(text)
        .collect::<Vec<_>>()
        .join(", ");

    let popup_markup = format!(
        r#"<div class="source-popup" style="max-width: 300px; font-family: -apple-system, sans-serif;">
<h3 style="margin: 0 0 0.5rem; color: #0891b2; font-size: 1.1rem;">{name}</h3>
<p style="margin: 0 0 0.5rem; color: #6b7280; font-size: 0.9rem;">{place}</p>
<div style="display: flex; align-items: center; gap: 0.5rem; margin: 0.8rem 0; padding: 0.5rem; background: {color}20; border-radius: 6px;">
<span style="font-size: 1.2rem;">{icon}</span>
<span style="font-weight: 600; color: {color};">{label}</span>
</div>
<p style="margin: 0.5rem 0; font-size: 0.85rem; color: #6b7280;">Analysis of {date}</p>
<div style="margin-top: 1rem; text-align: center;">
<button data-action="open" data-source-id="{id}" style="background: #0891b2; color: white; border: none; padding: 0.5rem 1rem; border-radius: 6px; cursor: pointer; font-weight: 600;">View details</button>
</div>
</div>"#,
        name = text(record.display_name()),
        place = place,
        color = style.color,
        icon = style.icon,
        label = style.label,
        date = format_date(record.last_analysis.date.as_deref()),
        id = attr(&record.id),
    );

    Ok(MapPin {
        source_id: record.id.clone(),
        position,
        title: title(record),
        icon: PinIcon::for_color(style.color),
        popup_markup,
    })
}

/// Builds pins for a batch of records. Records that cannot be placed are
/// skipped and logged; the rest of the batch is unaffected.
pub fn build_pins<'a>(records: impl IntoIterator<Item = &'a SourceRecord>) -> Vec<MapPin> {
    records
        .into_iter()
        .filter_map(|record| match render_map_pin(record) {
            Ok(pin) => Some(pin),
            Err(err) => {
                logging::debug(Component::Map, Some(&record.id), &format!("no pin: {}", err));
                None
            }
        })
        .collect()
}
