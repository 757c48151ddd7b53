//! Configuration loading (C1 ambient concern). Grounded on
//! `original_source/config.py` and `original_source/constants.py`, with the
//! TOML plumbing itself grounded on the teacher's `toml` usage in
//! `fortitude/src/settings.rs`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::registry::{ConfigSeverity, RuleCode};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse {path} as TOML: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid configuration in {path}:\n{}", .errors.join("\n"))]
    Invalid { path: PathBuf, errors: Vec<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
    /// Carried for parity with the original implementation, which defines
    /// this variant but never implements its formatter; see
    /// [`crate::format::Formatter`].
    Github,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Text
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

impl Default for ColorMode {
    fn default() -> Self {
        Self::Auto
    }
}

/// Scopes TYP003 is checked against: module-level, class-body, or local
/// (function-body) assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationScope {
    Module,
    Class,
    Local,
}

#[derive(Debug, Clone)]
pub struct Typ001Options {
    pub exempt_dunder: bool,
    pub exempt_self_cls: bool,
}

impl Default for Typ001Options {
    fn default() -> Self {
        Self {
            exempt_dunder: true,
            exempt_self_cls: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Typ003Options {
    pub scope: std::collections::HashSet<AnnotationScope>,
}

impl Default for Typ003Options {
    fn default() -> Self {
        Self {
            scope: [AnnotationScope::Module, AnnotationScope::Class]
                .into_iter()
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Kw001Options {
    pub min_params: usize,
    pub exempt_dunder: bool,
    pub exempt_private: bool,
    pub exempt_overrides: bool,
}

impl Default for Kw001Options {
    fn default() -> Self {
        Self {
            min_params: 2,
            exempt_dunder: true,
            exempt_private: true,
            exempt_overrides: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RuleConfig {
    pub severities: FxHashMap<RuleCode, ConfigSeverity>,
    pub typ001: Typ001Options,
    pub typ003: Typ003Options,
    pub kw001: Kw001Options,
}

#[derive(Debug, Clone)]
pub struct IgnoreGovernance {
    pub require_reason: bool,
    pub disallow: std::collections::HashSet<RuleCode>,
    pub max_per_file: Option<usize>,
}

impl Default for IgnoreGovernance {
    fn default() -> Self {
        Self {
            require_reason: true,
            disallow: std::collections::HashSet::new(),
            max_per_file: None,
        }
    }
}

fn default_severities() -> FxHashMap<RuleCode, ConfigSeverity> {
    use ConfigSeverity::{Error, Off, Warn};
    use RuleCode::*;
    [
        (Typ001, Error),
        (Typ002, Error),
        (Typ010, Error),
        (Imp001, Error),
        (Typ003, Warn),
        (Kw001, Warn),
        (Ret001, Warn),
        (Exp001, Off),
        (Exp002, Off),
    ]
    .into_iter()
    .collect()
}

#[derive(Debug, Clone)]
pub struct Configuration {
    pub config_path: Option<PathBuf>,
    pub python_version: Option<String>,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub output_format: OutputFormat,
    pub show_source: bool,
    pub color: ColorMode,
    pub rules: RuleConfig,
    pub ignores: IgnoreGovernance,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            config_path: None,
            python_version: None,
            include: vec!["**/*.py".to_string()],
            exclude: crate::scanner::DEFAULT_EXCLUDES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            output_format: OutputFormat::default(),
            show_source: true,
            color: ColorMode::default(),
            rules: RuleConfig {
                severities: default_severities(),
                ..RuleConfig::default()
            },
            ignores: IgnoreGovernance::default(),
        }
    }
}

/// Applies a transformation to a [`Configuration`], letting CLI flags layer
/// overrides on top of the file-resolved configuration without this crate
/// needing to know about `clap`.
pub trait ConfigurationTransformer {
    fn transform(&self, config: Configuration) -> Configuration;
}

impl Configuration {
    pub fn severity_for(&self, code: RuleCode) -> Option<crate::diagnostic::Severity> {
        self.rules
            .severities
            .get(&code)
            .copied()
            .unwrap_or_else(|| {
                *default_severities()
                    .get(&code)
                    .expect("every RuleCode has a default severity")
            })
            .to_diagnostic_severity()
    }

    pub fn is_rule_enabled(&self, code: RuleCode) -> bool {
        self.severity_for(code).is_some()
    }

    /// Ascends from `start` looking for a `pyproject.toml`, mirroring
    /// `ConfigLoader.find_config_file`.
    pub fn find_config_file(start: &Path) -> Option<PathBuf> {
        let mut dir = Some(start);
        while let Some(d) = dir {
            let candidate = d.join("pyproject.toml");
            if candidate.is_file() {
                return Some(candidate);
            }
            dir = d.parent();
        }
        None
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: RawDocument = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_raw(raw.tool.unwrap_or_default().pyguard.unwrap_or_default(), path)
    }

    fn from_raw(raw: RawPyguard, path: &Path) -> Result<Self, ConfigError> {
        let mut errors = Vec::new();
        let mut config = Configuration {
            config_path: Some(path.to_path_buf()),
            ..Configuration::default()
        };

        if let Some(version) = raw.python_version {
            config.python_version = Some(version);
        }
        if let Some(include) = raw.include {
            config.include = include;
        }
        if let Some(exclude) = raw.exclude {
            config.exclude = exclude;
        }
        if let Some(format) = raw.output_format {
            config.output_format = format;
        }
        if let Some(show_source) = raw.show_source {
            config.show_source = show_source;
        }
        if let Some(color) = raw.color {
            config.color = color;
        }

        if let Some(rules) = raw.rules {
            parse_rules(rules, &mut config.rules, &mut errors);
        }
        if let Some(ignores) = raw.ignores {
            parse_ignores(ignores, &mut config.ignores, &mut errors);
        }

        if errors.is_empty() {
            Ok(config)
        } else {
            Err(ConfigError::Invalid {
                path: path.to_path_buf(),
                errors,
            })
        }
    }
}

fn parse_rules(raw: RawRules, rules: &mut RuleConfig, errors: &mut Vec<String>) {
    for (key, value) in raw.severities {
        let Some(code) = RuleCode::from_code(&key) else {
            errors.push(format!("unknown rule code in [tool.pyguard.rules]: {key}"));
            continue;
        };
        let severity = match value.as_severity() {
            Ok(s) => s,
            Err(e) => {
                errors.push(format!("rule {key}: {e}"));
                continue;
            }
        };
        rules.severities.insert(code, severity);
    }

    if let Some(typ001) = raw.typ001 {
        if let Some(v) = typ001.exempt_dunder {
            rules.typ001.exempt_dunder = v;
        }
        if let Some(v) = typ001.exempt_self_cls {
            rules.typ001.exempt_self_cls = v;
        }
    }
    if let Some(typ003) = raw.typ003 {
        if let Some(scope) = typ003.scope {
            rules.typ003.scope = scope.into_iter().collect();
        }
    }
    if let Some(kw001) = raw.kw001 {
        if let Some(v) = kw001.min_params {
            rules.kw001.min_params = v;
        }
        if let Some(v) = kw001.exempt_dunder {
            rules.kw001.exempt_dunder = v;
        }
        if let Some(v) = kw001.exempt_private {
            rules.kw001.exempt_private = v;
        }
        if let Some(v) = kw001.exempt_overrides {
            rules.kw001.exempt_overrides = v;
        }
    }
}

fn parse_ignores(raw: RawIgnores, ignores: &mut IgnoreGovernance, errors: &mut Vec<String>) {
    if let Some(v) = raw.require_reason {
        ignores.require_reason = v;
    }
    if let Some(codes) = raw.disallow {
        for code in codes {
            match RuleCode::from_code(&code) {
                Some(c) => {
                    ignores.disallow.insert(c);
                }
                None => errors.push(format!(
                    "unknown rule code in [tool.pyguard.ignores] disallow: {code}"
                )),
            }
        }
    }
    if let Some(v) = raw.max_per_file {
        ignores.max_per_file = Some(v);
    }
}

#[derive(Debug, Deserialize, Default)]
struct RawDocument {
    tool: Option<RawTool>,
}

#[derive(Debug, Deserialize, Default)]
struct RawTool {
    pyguard: Option<RawPyguard>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
struct RawPyguard {
    python_version: Option<String>,
    include: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
    output_format: Option<OutputFormat>,
    show_source: Option<bool>,
    color: Option<ColorMode>,
    rules: Option<RawRules>,
    ignores: Option<RawIgnores>,
}

#[derive(Debug, Deserialize, Default)]
struct RawRules {
    #[serde(flatten)]
    severities: HashMap<String, RawSeverityValue>,
    #[serde(rename = "TYP001")]
    typ001: Option<RawTyp001>,
    #[serde(rename = "TYP003")]
    typ003: Option<RawTyp003>,
    #[serde(rename = "KW001")]
    kw001: Option<RawKw001>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSeverityValue {
    Plain(String),
    Table { severity: String },
}

impl RawSeverityValue {
    fn as_severity(&self) -> Result<ConfigSeverity, String> {
        let raw = match self {
            Self::Plain(s) => s,
            Self::Table { severity } => severity,
        };
        match raw.to_ascii_lowercase().as_str() {
            "error" => Ok(ConfigSeverity::Error),
            "warn" | "warning" => Ok(ConfigSeverity::Warn),
            "off" => Ok(ConfigSeverity::Off),
            other => Err(format!("invalid severity {other:?}")),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
struct RawTyp001 {
    exempt_dunder: Option<bool>,
    exempt_self_cls: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
struct RawTyp003 {
    scope: Option<Vec<AnnotationScope>>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
struct RawKw001 {
    min_params: Option<usize>,
    exempt_dunder: Option<bool>,
    exempt_private: Option<bool>,
    exempt_overrides: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
struct RawIgnores {
    require_reason: Option<bool>,
    disallow: Option<Vec<String>>,
    max_per_file: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_severities_match_constants() {
        let config = Configuration::default();
        assert_eq!(
            config.severity_for(RuleCode::Typ001),
            Some(crate::diagnostic::Severity::Error)
        );
        assert_eq!(
            config.severity_for(RuleCode::Exp001),
            None,
            "EXP001 defaults to Off"
        );
    }

    #[test]
    fn parses_plain_and_table_severity() {
        let toml_text = r#"
            [tool.pyguard.rules]
            TYP001 = "off"
            RET001 = { severity = "error" }
        "#;
        let raw: RawDocument = toml::from_str(toml_text).unwrap();
        let mut rules = RuleConfig {
            severities: default_severities(),
            ..RuleConfig::default()
        };
        let mut errors = Vec::new();
        parse_rules(
            raw.tool.unwrap().pyguard.unwrap().rules.unwrap(),
            &mut rules,
            &mut errors,
        );
        assert!(errors.is_empty());
        assert_eq!(rules.severities[&RuleCode::Typ001], ConfigSeverity::Off);
        assert_eq!(rules.severities[&RuleCode::Ret001], ConfigSeverity::Error);
    }

    #[test]
    fn unknown_rule_code_is_an_error() {
        let toml_text = r#"
            [tool.pyguard.rules]
            NOPE999 = "error"
        "#;
        let raw: RawDocument = toml::from_str(toml_text).unwrap();
        let mut rules = RuleConfig::default();
        let mut errors = Vec::new();
        parse_rules(
            raw.tool.unwrap().pyguard.unwrap().rules.unwrap(),
            &mut rules,
            &mut errors,
        );
        assert_eq!(errors.len(), 1);
    }
}
