/// Outbound actions: sharing a source and reporting a problem by e-mail.
///
/// Both are fire-and-forget. This module only builds the payloads and the
/// confirmation notice; delivering them is the page's job.

use serde::Serialize;

use crate::model::{Notice, SourceRecord};

/// Site name used in share titles and text.
pub const SITE_NAME: &str = "Sources Vivantes";

// ---------------------------------------------------------------------------
// Share
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: String,
}

/// Deep link opening the detail panel of `id`.
pub fn source_url(base_url: &str, id: &str) -> String {
    format!("{}/?source={}", base_url.trim_end_matches('/'), urlencoding::encode(id))
}

pub fn share_payload(record: &SourceRecord, base_url: &str) -> SharePayload {
    let url = source_url(base_url, &record.id);
    let place = match record.municipality.as_deref() {
        Some(m) => format!(" in {}", m),
        None => String::new(),
    };
    SharePayload {
        title: format!("{} - {}", record.display_name(), SITE_NAME),
        text: format!(
            "🌊 Discover the analyses of {}{} on {}: {}",
            record.display_name(),
            place,
            SITE_NAME,
            url
        ),
        url,
    }
}

/// What the browser can do with a share payload, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareCapability {
    NativeShare,
    Clipboard,
    /// Select-and-copy through a temporary text area.
    ManualCopy,
}

/// How the page should deliver a share payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareDelivery {
    /// Hand `payload` to the native share sheet.
    Native(SharePayload),
    /// Copy `text` and show `notice` once the copy went through.
    Copy { text: String, notice: Notice },
}

pub fn share_delivery(payload: SharePayload, capability: ShareCapability) -> ShareDelivery {
    match capability {
        ShareCapability::NativeShare => ShareDelivery::Native(payload),
        ShareCapability::Clipboard => ShareDelivery::Copy {
            text: payload.text,
            notice: Notice::success("Link copied to clipboard!"),
        },
        ShareCapability::ManualCopy => ShareDelivery::Copy {
            text: payload.text,
            notice: Notice::success("Link copied!"),
        },
    }
}

// ---------------------------------------------------------------------------
// Report a problem
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProblemReport {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

impl ProblemReport {
    /// `mailto:` link with percent-encoded subject and body.
    pub fn mailto(&self) -> String {
        format!(
            "mailto:{}?subject={}&body={}",
            self.recipient,
            urlencoding::encode(&self.subject),
            urlencoding::encode(&self.body)
        )
    }
}

pub fn problem_report(record: &SourceRecord, recipient: &str) -> ProblemReport {
    let coordinates = record
        .coordinates
        .map(|c| format!("{}, {}", c.lat, c.lng))
        .unwrap_or_else(|| "unknown".to_string());

    let body = format!(
        "Hello,

I would like to report a problem with the following source:

Source: {name}
Municipality: {municipality}
Coordinates: {coordinates}

Nature of the problem:
[Describe what you observed: doubtful water quality, difficult access, visible pollution, etc.]

Date of the observation:
[When did you observe the problem?]

Additional information:
[Any other useful detail]

Regards",
        name = record.display_name(),
        municipality = record.display_municipality(),
        coordinates = coordinates,
    );

    ProblemReport {
        recipient: recipient.to_string(),
        subject: format!("Report - {} ({})", record.display_name(), record.display_municipality()),
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::demo_record;

    #[test]
    fn test_share_payload_points_at_the_deep_link() {
        let payload = share_payload(&demo_record(), "https://sources-vivantes.fr/");
        assert_eq!(payload.url, "https://sources-vivantes.fr/?source=demo");
        assert_eq!(payload.title, "Source de Démonstration - Sources Vivantes");
        assert!(payload.text.contains("in Exemple-sur-Loire"));
        assert!(payload.text.ends_with(&payload.url));
    }

    #[test]
    fn test_source_url_encodes_the_id() {
        assert_eq!(source_url("https://x.fr", "a b&c"), "https://x.fr/?source=a%20b%26c");
    }

    #[test]
    fn test_clipboard_share_confirms_with_notice() {
        let payload = share_payload(&demo_record(), "https://x.fr");
        match share_delivery(payload.clone(), ShareCapability::Clipboard) {
            ShareDelivery::Copy { text, notice } => {
                assert_eq!(text, payload.text);
                assert_eq!(notice.kind, crate::model::NoticeKind::Success);
            }
            other => panic!("expected copy, got {:?}", other),
        }
        assert_eq!(
            share_delivery(payload.clone(), ShareCapability::NativeShare),
            ShareDelivery::Native(payload)
        );
    }

    #[test]
    fn test_problem_report_names_the_source() {
        let report = problem_report(&demo_record(), "contact@sources-vivantes.fr");
        assert_eq!(report.subject, "Report - Source de Démonstration (Exemple-sur-Loire)");
        assert!(report.body.contains("Coordinates: 44.9759, 1.0344"));

        let link = report.mailto();
        assert!(link.starts_with("mailto:contact@sources-vivantes.fr?subject=Report%20-%20"));
        assert!(!link.contains('\n'), "body must be percent-encoded");
    }
}
