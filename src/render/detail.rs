//! Detail panel markup.
//!
//! Layout, top to bottom: status banner, location and access, parameter
//! cards, optional sections (issues, recommendations, media mentions,
//! history, description, heritage), action row, legal notice.

use crate::conformity::{check_parameters, style_for, ParameterCheck, Verdict};
use crate::model::{SourceRecord, SourcesError};
use crate::render::markup::{attr, format_date, quantity, text, text_or_unspecified};
use crate::render::sections;

/// Settings the renderer needs from the site configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Path prefix for photo file names.
    pub photo_base_path: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions { photo_base_path: "images/sources".to_string() }
    }
}

const LEGAL_NOTICE: &str = r#"<div class="legal-notice" style="margin-top: 2rem; padding: 1rem; background: rgba(107, 114, 128, 0.1); border-radius: 8px; font-size: 0.9rem; color: #6b7280; text-align: center;">
<strong>⚖️ For information only</strong><br>
These data are provided for information. Sources Vivantes does not authorise consumption. If in doubt, consult your doctor or the local health authorities.
</div>"#;

/// Panel title, e.g. "Source du Boulou - Tursac".
pub fn title(record: &SourceRecord) -> String {
    match record.municipality.as_deref() {
        Some(m) => format!("{} - {}", record.display_name(), m),
        None => record.display_name().to_string(),
    }
}

/// Renders the full detail panel body for `record`.
///
/// Fails only when the record has no usable coordinates; the caller shows
/// an error panel instead.
pub fn render_detail(record: &SourceRecord, options: &RenderOptions) -> Result<String, SourcesError> {
    let coordinates = record.coordinates.ok_or_else(|| SourcesError::RenderFailure {
        id: record.id.clone(),
        message: "missing or non-numeric coordinates".to_string(),
    })?;

    let analysis = &record.last_analysis;
    let style = style_for(analysis.status);

    let mut html = String::with_capacity(8 * 1024);
    html.push_str(r#"<div class="source-modal-content">"#);

    // Status banner
    html.push_str(&format!(
        r#"<div class="source-status" style="background: {color}20; border-left: 4px solid {color}; padding: 1.5rem; border-radius: 12px; margin-bottom: 2rem;">
<div style="display: flex; align-items: center; gap: 1rem;">
<span style="font-size: 2rem;">{icon}</span>
<div>
<h3 style="color: {color}; margin: 0; font-size: 1.3rem;">{banner}</h3>
<p style="margin: 0.5rem 0 0; color: #6b7280;">Analysis of {date} - {lab}</p>
</div>
</div>
</div>"#,
        color = style.color,
        icon = style.icon,
        banner = style.banner,
        date = format_date(analysis.date.as_deref()),
        lab = text_or_unspecified(analysis.laboratory.as_deref()),
    ));

    // Location and access
    html.push_str(r#"<div class="source-info-grid" style="display: grid; grid-template-columns: 1fr 1fr; gap: 2rem; margin-bottom: 2rem;">"#);
    html.push_str(&format!(
        r#"<div class="info-card">
<h4 style="color: #0891b2; margin-bottom: 1rem;"><span>📍</span> Location</h4>
<p><strong>Municipality:</strong> {}</p>
<p><strong>Department:</strong> {}</p>
<p><strong>Coordinates:</strong> {:.4}, {:.4}</p>
</div>"#,
        text_or_unspecified(record.municipality.as_deref()),
        text_or_unspecified(record.department.as_deref()),
        coordinates.lat,
        coordinates.lng,
    ));
    if !record.access.is_empty() {
        html.push_str(r#"<div class="info-card"><h4 style="color: #0891b2; margin-bottom: 1rem;"><span>🚶</span> Access</h4>"#);
        for (label, value) in [
            ("Attendance", &record.access.attendance),
            ("Access", &record.access.access),
            ("Flow", &record.access.flow),
        ] {
            if let Some(value) = value {
                html.push_str(&format!("<p><strong>{}:</strong> {}</p>", label, text(value)));
            }
        }
        html.push_str("</div>");
    }
    html.push_str("</div>");

    // Parameter cards
    let checks = check_parameters(&analysis.parameters);
    if !checks.is_empty() {
        html.push_str(r#"<div class="analysis-section" style="margin-bottom: 2rem;">
<h4 style="color: #0891b2; margin-bottom: 1rem;"><span>🧪</span> Analysis parameters</h4>
<div class="parameters-grid" style="display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 1rem;">"#);
        for check in &checks {
            html.push_str(&parameter_card(check));
        }
        html.push_str("</div></div>");
    }

    // Optional sections, fixed order
    let optional = [
        sections::issues(&analysis.issues),
        sections::recommendations(&record.recommendations),
        sections::press_mentions(&record.press_mentions),
        sections::history(&record.analysis_history),
        sections::description(record.description.as_deref(), &record.photos, &options.photo_base_path),
        sections::heritage(&record.heritage_notes),
    ];
    for section in optional.into_iter().flatten() {
        html.push_str(&section);
    }

    html.push_str(&action_row(&record.id));
    html.push_str(LEGAL_NOTICE);
    html.push_str("</div>");

    Ok(html)
}

/// One parameter card: icon, name, value, limit (if any), verdict label.
pub fn parameter_card(check: &ParameterCheck) -> String {
    let (color, icon) = match check.evaluation.verdict {
        Verdict::Pass => (crate::conformity::status::GREEN, "✅"),
        Verdict::Fail => (crate::conformity::status::RED, "❌"),
    };
    let unit = check.parameter.unit();
    let limit = check
        .evaluation
        .limit
        .map(|l| {
            let limit = if unit.is_empty() { l.to_string() } else { format!("{} {}", l, unit) };
            format!(r#"<p style="font-size: 0.8rem; color: #6b7280;">Limit: {}</p>"#, limit)
        })
        .unwrap_or_default();

    format!(
        r#"<div class="parameter-card" data-verdict="{verdict}" style="padding: 1rem; background: white; border-radius: 8px; border: 1px solid rgba(8, 145, 178, 0.1); text-align: center;">
<div style="font-size: 1.2rem; margin-bottom: 0.5rem;">{icon}</div>
<h5 style="margin-bottom: 0.5rem; color: #1f2937;">{name}</h5>
<p style="font-size: 1.2rem; font-weight: 600; color: {color}; margin-bottom: 0.5rem;">{value}</p>
{limit}<p class="parameter-status" style="font-size: 0.8rem; color: {color}; font-weight: 500;">{label}</p>
</div>"#,
        verdict = match check.evaluation.verdict {
            Verdict::Pass => "pass",
            Verdict::Fail => "fail",
        },
        icon = icon,
        name = check.parameter.display_name(),
        color = color,
        value = quantity(check.value, unit),
        limit = limit,
        label = check.evaluation.label,
    )
}

fn action_row(id: &str) -> String {
    let id = attr(id);
    format!(
        r#"<div class="source-actions" style="display: flex; gap: 1rem; justify-content: center; margin-top: 2rem; flex-wrap: wrap;">
<button data-action="share" data-source-id="{id}" class="btn btn-secondary"><span>📤</span> Share</button>
<button data-action="show-on-map" data-source-id="{id}" class="btn btn-primary"><span>🗺️</span> Show on map</button>
<button data-action="report-problem" data-source-id="{id}" class="btn btn-secondary"><span>⚠️</span> Report a problem</button>
</div>"#,
        id = id
    )
}

/// Panel body shown when a record cannot be rendered. Names the record and
/// the problem so the user is not left with a blank panel.
pub fn render_error_panel(id: &str, message: &str) -> String {
    format!(
        r#"<div class="source-modal-content source-error" style="padding: 1.5rem; border-left: 4px solid #ef4444; background: rgba(239, 68, 68, 0.05); border-radius: 12px;">
<h3 style="color: #ef4444; margin: 0 0 0.5rem;">❌ This source could not be displayed</h3>
<p><strong>Source:</strong> {}</p>
<p><strong>Error:</strong> {}</p>
</div>"#,
        text(id),
        text(message)
    )
}
