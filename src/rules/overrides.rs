//! Override rule documents
//!
//! An operator-supplied document adds rules to (or replaces rules of) the
//! built-in set. Loading is all-or-nothing: any unreadable file, parse
//! error, unknown service key or bad regex aborts with a [`ConfigLoadError`].
//!
//! ```toml
//! merge = "union"
//!
//! [dangerous_commands]
//! s3 = [{ prefix = "aws s3 cp", description = "Copying objects" }]
//!
//! [safe_patterns]
//! s3 = ["--dryrun"]
//!
//! [[regex_rules.general]]
//! pattern = "--region\\s+cn-"
//! description = "China regions"
//! error_message = "China regions are not in scope"
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{line_of, ConfigLoadError};
use crate::rules::{PatternEntry, RegexRule, RuleConfig, ServiceKey};

/// How override entries combine with the built-in entries of the same key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MergeStrategy {
    /// Append override entries after the built-in ones
    #[default]
    Union,

    /// Override entries replace the built-in list for that key;
    /// keys the document does not mention keep their built-in rules
    Replace,
}

/// A prefix entry: either a bare string or a table with a description
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PatternSpec {
    Bare(String),
    Entry {
        prefix: String,
        #[serde(default)]
        description: Option<String>,
    },
}

impl PatternSpec {
    fn into_entry(self) -> PatternEntry {
        match self {
            PatternSpec::Bare(prefix) => {
                let description = format!("`{}` is restricted for security reasons", prefix);
                PatternEntry::new(prefix, description)
            }
            PatternSpec::Entry {
                prefix,
                description,
            } => {
                let description = description
                    .unwrap_or_else(|| format!("`{}` is restricted for security reasons", prefix));
                PatternEntry::new(prefix, description)
            }
        }
    }
}

/// A regex entry as written in the document
#[derive(Debug, Clone, Deserialize)]
pub struct RegexSpec {
    pub pattern: String,

    #[serde(default)]
    pub description: String,

    /// Defaults to the description
    #[serde(default)]
    pub error_message: Option<String>,
}

/// The override document structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RuleDocument {
    pub merge: MergeStrategy,
    pub dangerous_commands: BTreeMap<String, Vec<PatternSpec>>,
    pub safe_patterns: BTreeMap<String, Vec<PatternSpec>>,
    pub regex_rules: BTreeMap<String, Vec<RegexSpec>>,
}

/// Serialization format of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Toml,
    Yaml,
    Json,
}

impl DocumentFormat {
    /// Pick a format from the file extension, TOML by default
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => DocumentFormat::Yaml,
            Some("json") => DocumentFormat::Json,
            _ => DocumentFormat::Toml,
        }
    }
}

impl RuleDocument {
    /// Read and parse a document
    pub fn from_file(path: &Path) -> Result<Self, ConfigLoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigLoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, DocumentFormat::from_path(path), path)
    }

    /// Parse document text. `origin` names the source in errors.
    pub fn parse(
        content: &str,
        format: DocumentFormat,
        origin: &Path,
    ) -> Result<Self, ConfigLoadError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let parse_error = |line: Option<usize>, message: String| ConfigLoadError::Parse {
            path: origin.to_path_buf(),
            line,
            message,
        };

        match format {
            DocumentFormat::Toml => toml::from_str(content).map_err(|e| {
                parse_error(
                    e.span().map(|span| line_of(content, span.start)),
                    e.message().to_string(),
                )
            }),
            DocumentFormat::Yaml => serde_yaml::from_str(content)
                .map_err(|e| parse_error(e.location().map(|loc| loc.line()), e.to_string())),
            DocumentFormat::Json => serde_json::from_str(content)
                .map_err(|e| parse_error(Some(e.line()), e.to_string())),
        }
    }
}

fn resolve_key(
    key: &str,
    category: &'static str,
    origin: &Path,
) -> Result<ServiceKey, ConfigLoadError> {
    ServiceKey::from_str(key).ok_or_else(|| ConfigLoadError::UnknownService {
        path: origin.to_path_buf(),
        category,
        key: key.to_string(),
    })
}

fn install<T>(slot: &mut Vec<T>, entries: Vec<T>, strategy: MergeStrategy) {
    match strategy {
        MergeStrategy::Union => slot.extend(entries),
        MergeStrategy::Replace => *slot = entries,
    }
}

/// Merge a document over `base`, producing a new rule set
pub fn merge(
    mut base: RuleConfig,
    document: RuleDocument,
    origin: &Path,
) -> Result<RuleConfig, ConfigLoadError> {
    let strategy = document.merge;

    for (key, specs) in document.dangerous_commands {
        let service = match resolve_key(&key, "dangerous_commands", origin)? {
            ServiceKey::Service(service) => service,
            // Dangerous prefixes are always service-scoped
            ServiceKey::General => {
                return Err(ConfigLoadError::UnknownService {
                    path: origin.to_path_buf(),
                    category: "dangerous_commands",
                    key,
                })
            }
        };
        let entries = specs.into_iter().map(PatternSpec::into_entry).collect();
        install(
            base.dangerous_commands.entry(service).or_default(),
            entries,
            strategy,
        );
    }

    for (key, specs) in document.safe_patterns {
        let key = resolve_key(&key, "safe_patterns", origin)?;
        let entries = specs.into_iter().map(PatternSpec::into_entry).collect();
        install(base.safe_patterns.entry(key).or_default(), entries, strategy);
    }

    for (key, specs) in document.regex_rules {
        let key = resolve_key(&key, "regex_rules", origin)?;
        let mut entries = Vec::with_capacity(specs.len());
        for spec in specs {
            let error_message = spec
                .error_message
                .unwrap_or_else(|| spec.description.clone());
            entries.push(RegexRule::new(
                key,
                &spec.pattern,
                spec.description,
                error_message,
            )?);
        }
        install(base.regex_rules.entry(key).or_default(), entries, strategy);
    }

    debug!(origin = %origin.display(), ?strategy, "merged override rules");
    Ok(base)
}

/// Build the effective rule set: built-in rules plus the optional override
/// document at `override_path`
pub fn load_rule_config(override_path: Option<&Path>) -> Result<RuleConfig, ConfigLoadError> {
    let baseline = RuleConfig::baseline()?;

    let Some(path) = override_path else {
        info!(rules = baseline.rule_count(), "loaded built-in rules");
        return Ok(baseline);
    };

    let document = RuleDocument::from_file(path)?;
    let config = merge(baseline, document, path)?;
    info!(
        rules = config.rule_count(),
        overrides = %path.display(),
        "loaded built-in and override rules"
    );
    Ok(config)
}
