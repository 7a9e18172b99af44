//! Engine configuration.
//!
//! Configuration is written in TOML. The built-in defaults (`defaults.toml`)
//! are embedded at compile time; user configuration is deep-merged on top,
//! with tables merging key by key and every other value replaced wholesale.
//!
//! ```toml
//! word-separators = ["_", "-"]
//!
//! [languages.python.scopes.statement]
//! nodes = ["expression_statement", "return_statement"]
//! iteration = ["block", "module"]
//! ```

use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;

/// Embedded built-in defaults.
const DEFAULTS_TOML: &str = include_str!("defaults.toml");

/// Errors raised while loading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
	/// The TOML text could not be parsed or did not match the schema.
	#[error("failed to parse configuration: {0}")]
	Parse(String),

	/// A node pattern in a scope definition is malformed.
	#[error("invalid node pattern `{pattern}` in scope `{scope}`")]
	InvalidPattern { scope: String, pattern: String },
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Top-level engine settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EngineConfig {
	/// Characters that join words into a single identifier token.
	pub word_separators: Vec<String>,
	/// Hat styles available to the allocator, in preference order.
	pub hat_styles: Vec<HatStyleConfig>,
	/// Syntax scope definitions keyed by language id.
	#[serde(default)]
	pub languages: FxHashMap<String, LanguageConfig>,
}

/// A hat style and its allocation penalty.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HatStyleConfig {
	pub name: String,
	#[serde(default)]
	pub penalty: u32,
}

/// Scope definitions for one language.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LanguageConfig {
	/// Other language ids sharing this definition.
	#[serde(default)]
	pub aliases: Vec<String>,
	/// Overrides the global word separators for this language.
	pub word_separators: Option<Vec<String>>,
	/// Node kinds that are string literals; delimiters inside them are not
	/// paired with delimiters outside.
	#[serde(default)]
	pub string_nodes: Vec<String>,
	#[serde(default)]
	pub comment_nodes: Vec<String>,
	/// Scope name to matcher definition.
	#[serde(default)]
	pub scopes: FxHashMap<String, ScopeConfig>,
}

/// How a named syntax scope maps onto tree nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ScopeConfig {
	/// Node patterns: `kind`, `parent.kind`, or `parent.*` for any named child.
	pub nodes: Vec<String>,
	/// Parent kinds that absorb a matched node into their own range.
	#[serde(default)]
	pub wrapping_parents: Vec<String>,
	/// Node kinds whose interiors bound `every` enumeration.
	#[serde(default)]
	pub iteration: Vec<String>,
	/// Text inserted between adjacent scopes by bring and move.
	#[serde(default = "default_delimiter")]
	pub delimiter: String,
}

fn default_delimiter() -> String {
	" ".to_string()
}

impl Default for EngineConfig {
	fn default() -> Self {
		// The embedded file is covered by `test_defaults_parse`.
		Self::from_toml("").unwrap_or_else(|err| {
			tracing::warn!(error = %err, "Built-in configuration failed to load");
			Self {
				word_separators: vec!["_".to_string()],
				hat_styles: vec![HatStyleConfig {
					name: "default".to_string(),
					penalty: 0,
				}],
				languages: FxHashMap::default(),
			}
		})
	}
}

impl EngineConfig {
	/// Loads the built-in defaults with `user` merged on top.
	pub fn from_toml(user: &str) -> Result<Self> {
		let mut merged = parse_table(DEFAULTS_TOML)?;
		merge_tables(&mut merged, parse_table(user)?);
		let config: Self = toml::Value::Table(merged)
			.try_into()
			.map_err(|err: toml::de::Error| ConfigError::Parse(err.to_string()))?;
		config.validate()?;
		tracing::debug!(
			languages = config.languages.len(),
			hat_styles = config.hat_styles.len(),
			"Configuration loaded"
		);
		Ok(config)
	}

	/// Finds the definition for `language_id`, following aliases.
	pub fn language(&self, language_id: &str) -> Option<&LanguageConfig> {
		self.languages.get(language_id).or_else(|| {
			self.languages
				.values()
				.find(|lang| lang.aliases.iter().any(|alias| alias == language_id))
		})
	}

	/// Word separators in effect for `language_id`.
	pub fn word_separators_for(&self, language_id: &str) -> &[String] {
		self.language(language_id)
			.and_then(|lang| lang.word_separators.as_deref())
			.unwrap_or(&self.word_separators)
	}

	fn validate(&self) -> Result<()> {
		for lang in self.languages.values() {
			for (name, scope) in &lang.scopes {
				for pattern in &scope.nodes {
					let valid = !pattern.is_empty()
						&& pattern.split('.').count() <= 2
						&& pattern.split('.').all(|part| !part.is_empty());
					if !valid {
						return Err(ConfigError::InvalidPattern {
							scope: name.clone(),
							pattern: pattern.clone(),
						});
					}
				}
			}
		}
		Ok(())
	}
}

fn parse_table(text: &str) -> Result<toml::Table> {
	text.parse::<toml::Table>()
		.map_err(|err| ConfigError::Parse(err.to_string()))
}

fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
	for (key, value) in overlay {
		match (base.get_mut(&key), value) {
			(Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
				merge_tables(existing, incoming);
			}
			(_, value) => {
				base.insert(key, value);
			}
		}
	}
}
