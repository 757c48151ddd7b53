//! Rule codes and the rule registry (C3).

use std::fmt;

use pyguard_macros::RuleCode;

use crate::ast::Module;
use crate::config::Configuration;
use crate::diagnostic::Diagnostic;

/// Every rule this crate knows about, carrying its stable short code.
///
/// The derive generates `as_code`/`from_code`/`all`/`Display` from the
/// `#[code = "..."]` attributes below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, RuleCode, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RuleCode {
    #[code = "TYP001"]
    Typ001,
    #[code = "TYP002"]
    Typ002,
    #[code = "TYP003"]
    Typ003,
    #[code = "TYP010"]
    Typ010,
    #[code = "KW001"]
    Kw001,
    #[code = "RET001"]
    Ret001,
    #[code = "IMP001"]
    Imp001,
    #[code = "EXP001"]
    Exp001,
    #[code = "EXP002"]
    Exp002,
}

impl TryFrom<String> for RuleCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_code(&value).ok_or_else(|| format!("unknown rule code: {value}"))
    }
}

impl From<RuleCode> for String {
    fn from(code: RuleCode) -> Self {
        code.as_code().to_string()
    }
}

/// Config-level severity. `Off` disables a rule outright; see
/// [`crate::diagnostic::Severity`] for the diagnostic-level counterpart,
/// which structurally excludes `Off`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSeverity {
    Error,
    Warn,
    Off,
}

impl ConfigSeverity {
    pub const fn to_diagnostic_severity(self) -> Option<crate::diagnostic::Severity> {
        match self {
            Self::Error => Some(crate::diagnostic::Severity::Error),
            Self::Warn => Some(crate::diagnostic::Severity::Warn),
            Self::Off => None,
        }
    }
}

/// A single lint rule: a pure function from a parsed module to diagnostics.
///
/// Every rule is self-contained; nothing in `check` mutates shared state,
/// which is what lets the runner fan rules out across a rayon thread pool.
pub trait Rule: Send + Sync {
    fn code(&self) -> RuleCode;

    /// `source` is supplied alongside the parsed `module` so a rule can
    /// attach the offending source line to a [`Diagnostic`] without a
    /// second pass over the file; every rule here is otherwise AST-driven.
    fn check(&self, module: &Module, source: &str, config: &Configuration) -> Vec<Diagnostic>;
}

impl fmt::Debug for dyn Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rule({})", self.code().as_code())
    }
}

/// Builds the full set of known rules and filters them by the active config.
pub fn all_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(crate::rules::typ001::Typ001),
        Box::new(crate::rules::typ002::Typ002),
        Box::new(crate::rules::typ003::Typ003),
        Box::new(crate::rules::typ010::Typ010),
        Box::new(crate::rules::kw001::Kw001),
        Box::new(crate::rules::ret001::Ret001),
        Box::new(crate::rules::imp001::Imp001),
        Box::new(crate::rules::exp001::Exp001),
        Box::new(crate::rules::exp002::Exp002),
    ]
}

/// Rules enabled under `config`, i.e. every rule whose configured severity
/// is not `Off`.
pub fn enabled_rules(config: &Configuration) -> Vec<Box<dyn Rule>> {
    all_rules()
        .into_iter()
        .filter(|rule| config.severity_for(rule.code()).is_some())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_code() {
        for code in RuleCode::all() {
            assert_eq!(RuleCode::from_code(code.as_code()), Some(*code));
        }
    }

    #[test]
    fn unknown_code_is_none() {
        assert_eq!(RuleCode::from_code("NOPE999"), None);
    }

    #[test]
    fn all_rules_have_distinct_codes() {
        let codes: std::collections::HashSet<_> =
            all_rules().iter().map(|r| r.code()).collect();
        assert_eq!(codes.len(), RuleCode::all().len());
    }
}
