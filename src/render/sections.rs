//! Optional detail-panel sections.
//!
//! Each builder returns `None` when its backing data is empty, so the panel
//! never shows an empty container.

use crate::conformity::style_for;
use crate::model::{AnalysisResult, PressMention};
use crate::render::markup::{attr, format_date, quantity, text};

fn list_items(items: &[String], color: &str) -> String {
    items
        .iter()
        .map(|item| format!(r#"<li style="margin-bottom: 0.5rem; color: {};">{}</li>"#, color, text(item)))
        .collect()
}

/// Problems reported by the laboratory.
pub fn issues(items: &[String]) -> Option<String> {
    if items.is_empty() {
        return None;
    }
    Some(format!(
        r#"<div class="problems-section" style="margin: 2rem 0; padding: 1.5rem; background: rgba(239, 68, 68, 0.05); border-radius: 12px; border-left: 4px solid #ef4444;">
<h4 style="color: #ef4444; margin-bottom: 1rem;"><span>⚠️</span> Identified problems</h4>
<ul style="margin: 0; padding-left: 1.5rem;">{}</ul>
</div>"#,
        list_items(items, "#7f1d1d")
    ))
}

pub fn recommendations(items: &[String]) -> Option<String> {
    if items.is_empty() {
        return None;
    }
    Some(format!(
        r#"<div class="recommendations-section" style="margin: 2rem 0; padding: 1.5rem; background: rgba(245, 158, 11, 0.05); border-radius: 12px; border-left: 4px solid #f59e0b;">
<h4 style="color: #f59e0b; margin-bottom: 1rem;"><span>💡</span> Recommendations</h4>
<ul style="margin: 0; padding-left: 1.5rem;">{}</ul>
</div>"#,
        list_items(items, "#92400e")
    ))
}

pub fn press_mentions(mentions: &[PressMention]) -> Option<String> {
    if mentions.is_empty() {
        return None;
    }
    let items: String = mentions
        .iter()
        .map(|m| {
            let title = match &m.url {
                Some(url) => format!(
                    r#"<a href="{}" target="_blank" rel="noopener">{}</a>"#,
                    attr(url),
                    text(&m.title)
                ),
                None => text(&m.title),
            };
            let meta: Vec<String> = [m.outlet.as_deref().map(text), m.date.as_deref().map(|d| format_date(Some(d)))]
                .into_iter()
                .flatten()
                .collect();
            if meta.is_empty() {
                format!(r#"<li style="margin-bottom: 0.5rem;">{}</li>"#, title)
            } else {
                format!(
                    r#"<li style="margin-bottom: 0.5rem;">{} <span style="color: #6b7280;">({})</span></li>"#,
                    title,
                    meta.join(", ")
                )
            }
        })
        .collect();
    Some(format!(
        r#"<div class="press-section" style="margin: 2rem 0;">
<h4 style="color: #0891b2; margin-bottom: 1rem;"><span>📰</span> In the media</h4>
<ul style="margin: 0; padding-left: 1.5rem;">{}</ul>
</div>"#,
        items
    ))
}

/// Prior analyses, in the order the document lists them.
pub fn history(entries: &[AnalysisResult]) -> Option<String> {
    if entries.is_empty() {
        return None;
    }
    let rows: String = entries
        .iter()
        .map(|entry| {
            let style = style_for(entry.status);
            let nitrates = entry
                .parameters
                .nitrates
                .map(|n| format!(r#"<span style="margin-left: 1rem; color: #6b7280;">Nitrates: {}</span>"#, quantity(n, "mg/L")))
                .unwrap_or_default();
            format!(
                r#"<div class="history-entry" style="display: flex; justify-content: space-between; align-items: center; padding: 0.8rem; margin-bottom: 0.5rem; border-left: 3px solid {color};">
<div><span style="font-weight: 600;">{date}</span>{nitrates}</div>
<span style="color: {color};" title="{label}">{icon}</span>
</div>"#,
                color = style.color,
                date = format_date(entry.date.as_deref()),
                nitrates = nitrates,
                label = style.label,
                icon = style.icon,
            )
        })
        .collect();
    Some(format!(
        r#"<div class="history-section" style="margin: 2rem 0;">
<h4 style="color: #0891b2; margin-bottom: 1rem;"><span>📊</span> Analysis history</h4>
<div class="history-timeline" style="max-height: 200px; overflow-y: auto;">{}</div>
</div>"#,
        rows
    ))
}

/// Narrative description, followed by the photo strip.
pub fn description(description: Option<&str>, photos: &[String], photo_base: &str) -> Option<String> {
    if description.is_none() && photos.is_empty() {
        return None;
    }
    let paragraph = description
        .map(|d| format!("<p>{}</p>", text(d)))
        .unwrap_or_default();
    let gallery = if photos.is_empty() {
        String::new()
    } else {
        let base = photo_base.trim_end_matches('/');
        let images: String = photos
            .iter()
            .map(|photo| {
                let src = if base.is_empty() { photo.clone() } else { format!("{}/{}", base, photo) };
                format!(r#"<img src="{}" alt="" loading="lazy" style="max-width: 48%; border-radius: 8px;">"#, attr(&src))
            })
            .collect();
        format!(r#"<div class="source-photos" style="display: flex; gap: 0.5rem; flex-wrap: wrap; margin-top: 1rem;">{}</div>"#, images)
    };
    Some(format!(
        r#"<div class="source-description" style="margin: 2rem 0; padding: 1.5rem; background: rgba(8, 145, 178, 0.05); border-radius: 12px;">
<h4 style="color: #0891b2; margin-bottom: 1rem;">💧 About this source</h4>
{}{}
</div>"#,
        paragraph, gallery
    ))
}

/// Historical and heritage notes.
pub fn heritage(notes: &[String]) -> Option<String> {
    if notes.is_empty() {
        return None;
    }
    let paragraphs: String = notes.iter().map(|n| format!("<p>{}</p>", text(n))).collect();
    Some(format!(
        r#"<div class="heritage-section" style="margin: 2rem 0; padding: 1.5rem; background: rgba(120, 53, 15, 0.05); border-radius: 12px;">
<h4 style="color: #92400e; margin-bottom: 1rem;"><span>🏛️</span> Heritage</h4>
{}
</div>"#,
        paragraphs
    ))
}
