//! Per-parameter conformity checking.
//!
//! The rule table is fixed: each recognized parameter has one comparison and
//! one default limit, used whenever the analysis does not state its own.
//! Parameter verdicts are independent of the analysis' overall status.

use crate::model::Parameters;

/// Default nitrate limit, mg/L.
pub const DEFAULT_NITRATES_LIMIT: f64 = 50.0;
/// Default bacteria limit, CFU/100mL. Any detection fails.
pub const DEFAULT_BACTERIA_LIMIT: f64 = 0.0;
pub const DEFAULT_PH_MIN: f64 = 6.5;
pub const DEFAULT_PH_MAX: f64 = 9.0;

/// Parameters the evaluator knows how to judge, in parameter-card order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter {
    Nitrates,
    Bacteria,
    Ph,
    Conductivity,
}

impl Parameter {
    pub const ALL: [Parameter; 4] = [
        Parameter::Nitrates,
        Parameter::Bacteria,
        Parameter::Ph,
        Parameter::Conductivity,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Parameter::Nitrates => "Nitrates",
            Parameter::Bacteria => "Bacteria",
            Parameter::Ph => "pH",
            Parameter::Conductivity => "Conductivity",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Parameter::Nitrates => "mg/L",
            Parameter::Bacteria => "CFU/100mL",
            Parameter::Ph => "",
            Parameter::Conductivity => "µS/cm",
        }
    }

    /// The limit applied when an analysis does not supply one.
    /// Conductivity is informational and has none.
    pub fn default_limit(&self) -> Option<Limit> {
        match self {
            Parameter::Nitrates => Some(Limit::Max(DEFAULT_NITRATES_LIMIT)),
            Parameter::Bacteria => Some(Limit::Max(DEFAULT_BACTERIA_LIMIT)),
            Parameter::Ph => Some(Limit::Range { min: DEFAULT_PH_MIN, max: DEFAULT_PH_MAX }),
            Parameter::Conductivity => None,
        }
    }

    /// Label shown on a failing card.
    fn fail_label(&self) -> &'static str {
        match self {
            Parameter::Nitrates => "exceeded",
            Parameter::Bacteria => "detected",
            Parameter::Ph => "out of range",
            Parameter::Conductivity => "informational",
        }
    }
}

/// A regulatory threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Limit {
    /// Fails when the value is strictly above.
    Max(f64),
    /// Fails when the value is strictly outside `[min, max]`.
    Range { min: f64, max: f64 },
}

impl std::fmt::Display for Limit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Limit::Max(max) => write!(f, "{}", max),
            Limit::Range { min, max } => write!(f, "{}-{}", min, max),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail,
}

/// Outcome of checking one value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub verdict: Verdict,
    pub label: &'static str,
    /// The limit actually applied, after defaults.
    pub limit: Option<Limit>,
}

/// Judges `value` for `parameter` against `limit`, or the parameter's
/// default limit when `limit` is `None`.
///
/// Comparisons are strict: a value equal to a bound passes.
pub fn evaluate(parameter: Parameter, value: f64, limit: Option<Limit>) -> Evaluation {
    let limit = effective_limit(parameter, limit);

    let failed = match (parameter, limit) {
        (Parameter::Conductivity, _) | (_, None) => false,
        (_, Some(Limit::Max(max))) => value > max,
        (_, Some(Limit::Range { min, max })) => value < min || value > max,
    };

    Evaluation {
        verdict: if failed { Verdict::Fail } else { Verdict::Pass },
        label: match (failed, parameter) {
            (true, p) => p.fail_label(),
            (false, Parameter::Conductivity) => "informational",
            (false, _) => "compliant",
        },
        limit,
    }
}

/// Reconciles a supplied limit with the shape the parameter expects.
/// An upper-bound parameter given a range keeps the range's upper bound;
/// pH given a bare maximum keeps the default minimum.
fn effective_limit(parameter: Parameter, limit: Option<Limit>) -> Option<Limit> {
    match (parameter, limit) {
        (Parameter::Conductivity, _) => None,
        (_, None) => parameter.default_limit(),
        (Parameter::Nitrates | Parameter::Bacteria, Some(Limit::Range { max, .. })) => {
            Some(Limit::Max(max))
        }
        (Parameter::Ph, Some(Limit::Max(max))) => Some(Limit::Range { min: DEFAULT_PH_MIN, max }),
        (_, Some(limit)) => Some(limit),
    }
}

/// Reads the limit an analysis states for `parameter`, if any.
/// A pH analysis stating only one bound keeps the default for the other.
pub fn stated_limit(parameter: Parameter, params: &Parameters) -> Option<Limit> {
    match parameter {
        Parameter::Nitrates => params.nitrates_limit.map(Limit::Max),
        Parameter::Bacteria => params.bacteria_limit.map(Limit::Max),
        Parameter::Ph => match (params.ph_min, params.ph_max) {
            (None, None) => None,
            (min, max) => Some(Limit::Range {
                min: min.unwrap_or(DEFAULT_PH_MIN),
                max: max.unwrap_or(DEFAULT_PH_MAX),
            }),
        },
        Parameter::Conductivity => None,
    }
}

/// Measured value of `parameter`, if the analysis has one.
pub fn measured_value(parameter: Parameter, params: &Parameters) -> Option<f64> {
    match parameter {
        Parameter::Nitrates => params.nitrates,
        Parameter::Bacteria => params.bacteria,
        Parameter::Ph => params.ph,
        Parameter::Conductivity => params.conductivity,
    }
}

/// One parameter card's worth of data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterCheck {
    pub parameter: Parameter,
    pub value: f64,
    pub evaluation: Evaluation,
}

/// Evaluates every measured parameter, in card order. Parameters without a
/// value are left out entirely; they are never reported as failures.
pub fn check_parameters(params: &Parameters) -> Vec<ParameterCheck> {
    Parameter::ALL
        .iter()
        .filter_map(|&parameter| {
            let value = measured_value(parameter, params)?;
            Some(ParameterCheck {
                parameter,
                value,
                evaluation: evaluate(parameter, value, stated_limit(parameter, params)),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
