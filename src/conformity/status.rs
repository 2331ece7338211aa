//! Visual style of an overall analysis status.
//!
//! The badge depends on the declared status only. It can disagree with
//! individual parameter verdicts, e.g. a pending analysis whose nitrate card
//! already shows "exceeded"; both are shown as they are.

use crate::model::AnalysisStatus;

pub const GREEN: &str = "#10b981";
pub const RED: &str = "#ef4444";
pub const AMBER: &str = "#f59e0b";

/// Colour, icon and wording for one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusStyle {
    pub color: &'static str,
    pub icon: &'static str,
    /// Banner heading in the detail panel.
    pub banner: &'static str,
    /// Short label used in map popups and history rows.
    pub label: &'static str,
}

pub fn style_for(status: AnalysisStatus) -> StatusStyle {
    match status {
        AnalysisStatus::Compliant => StatusStyle {
            color: GREEN,
            icon: "✅",
            banner: "Compliant water",
            label: "Compliant",
        },
        AnalysisStatus::NonCompliant => StatusStyle {
            color: RED,
            icon: "❌",
            banner: "Non-compliant water",
            label: "Non-compliant",
        },
        AnalysisStatus::Pending => StatusStyle {
            color: AMBER,
            icon: "🔄",
            banner: "Analysis pending",
            label: "Pending",
        },
    }
}
