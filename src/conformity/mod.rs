/// Conformity evaluation for water-quality analyses.
///
/// Submodules:
/// - `thresholds` — the fixed per-parameter rule table and `evaluate`.
/// - `status` — colour/icon/wording of an overall analysis status.

pub mod status;
pub mod thresholds;

pub use status::{style_for, StatusStyle};
pub use thresholds::{check_parameters, evaluate, Evaluation, Limit, Parameter, ParameterCheck, Verdict};
