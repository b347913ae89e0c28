//! Site configuration
//!
//! Values describing the site a document belongs to. The restructuring
//! core treats every field as an opaque string; only entity-link
//! resolution reads `site_url` and `baseurl`.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::markdown::MarkdownOptions;
use crate::widgets::DEFAULT_SITE_URL;

// ─────────────────────────────────────────────────────────────────────────────
// Config Format
// ─────────────────────────────────────────────────────────────────────────────

/// Serialization format of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
    Yaml,
}

impl ConfigFormat {
    /// Detect the format from a file extension, defaulting to JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("toml") => Self::Toml,
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main Config Struct
// ─────────────────────────────────────────────────────────────────────────────

/// Site-wide settings.
///
/// All fields have defaults via `Default` and `#[serde(default)]`, so partial
/// files are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Page title
    pub title: String,

    /// Page description
    pub description: String,

    /// Robots directive
    pub robots: String,

    /// Path prefix the site is served under (e.g. `/essays`)
    pub baseurl: String,

    /// Source repository name
    pub repo: String,

    /// Absolute URL relative anchors are resolved against
    pub site_url: String,

    /// Markdown parsing options
    pub markdown: MarkdownOptions,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            robots: String::new(),
            baseurl: String::new(),
            repo: String::new(),
            site_url: DEFAULT_SITE_URL.to_string(),
            markdown: MarkdownOptions::default(),
        }
    }
}

impl SiteConfig {
    /// Normalize values that may have been written by hand.
    ///
    /// Strings are trimmed, `baseurl` gets a leading `/` and loses any
    /// trailing `/`, and an empty `site_url` falls back to the default.
    pub fn sanitize(&mut self) {
        for field in [
            &mut self.title,
            &mut self.description,
            &mut self.robots,
            &mut self.repo,
            &mut self.site_url,
        ] {
            let trimmed = field.trim();
            if trimmed.len() != field.len() {
                *field = trimmed.to_string();
            }
        }

        let base = self.baseurl.trim().trim_matches('/');
        self.baseurl = if base.is_empty() {
            String::new()
        } else {
            format!("/{}", base)
        };

        if self.site_url.is_empty() {
            self.site_url = DEFAULT_SITE_URL.to_string();
        }
    }

    /// Parse configuration text in the given format and sanitize it.
    pub fn parse_sanitized(contents: &str, format: ConfigFormat) -> Result<Self> {
        let mut config: Self = match format {
            ConfigFormat::Json => serde_json::from_str(contents)?,
            ConfigFormat::Toml => toml::from_str(contents)?,
            ConfigFormat::Yaml => serde_yaml::from_str(contents).map_err(|e| {
                Error::ConfigParse {
                    message: e.to_string(),
                    source: Some(Box::new(e)),
                }
            })?,
        };
        config.sanitize();
        Ok(config)
    }

    /// Serialize in the given format.
    pub fn to_string_in(&self, format: ConfigFormat) -> Result<String> {
        let text = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self).map_err(|e| {
                Error::ConfigParse {
                    message: e.to_string(),
                    source: Some(Box::new(e)),
                }
            })?,
            ConfigFormat::Yaml => serde_yaml::to_string(self).map_err(|e| {
                Error::ConfigParse {
                    message: e.to_string(),
                    source: Some(Box::new(e)),
                }
            })?,
        };
        Ok(text)
    }

    /// Apply the fields present in a front-matter block.
    pub fn apply_front_matter(&mut self, front_matter: &FrontMatter) {
        let overrides = [
            (&mut self.title, &front_matter.title),
            (&mut self.description, &front_matter.description),
            (&mut self.robots, &front_matter.robots),
            (&mut self.baseurl, &front_matter.baseurl),
            (&mut self.repo, &front_matter.repo),
            (&mut self.site_url, &front_matter.site_url),
        ];
        for (field, value) in overrides {
            if let Some(value) = value {
                *field = value.clone();
            }
        }
        self.sanitize();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Front Matter
// ─────────────────────────────────────────────────────────────────────────────

/// Per-document overrides read from YAML front matter.
///
/// Unknown keys are ignored so documents can carry metadata for other tools.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub description: Option<String>,
    pub robots: Option<String>,
    pub baseurl: Option<String>,
    pub repo: Option<String>,
    pub site_url: Option<String>,
}

impl FrontMatter {
    /// Parse a YAML front-matter body (delimiters already stripped).
    pub fn parse(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert!(config.title.is_empty());
        assert!(config.baseurl.is_empty());
        assert_eq!(config.site_url, "http://localhost/");
        assert!(config.markdown.tables);
    }

    #[test]
    fn test_sanitize_baseurl() {
        let mut config = SiteConfig {
            baseurl: "essays/".to_string(),
            ..SiteConfig::default()
        };
        config.sanitize();
        assert_eq!(config.baseurl, "/essays");

        config.baseurl = "/".to_string();
        config.sanitize();
        assert_eq!(config.baseurl, "");
    }

    #[test]
    fn test_sanitize_trims_and_restores_site_url() {
        let mut config = SiteConfig {
            title: "  My Site ".to_string(),
            site_url: "   ".to_string(),
            ..SiteConfig::default()
        };
        config.sanitize();
        assert_eq!(config.title, "My Site");
        assert_eq!(config.site_url, DEFAULT_SITE_URL);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ConfigFormat::from_path(Path::new("site.toml")), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("site.YML")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("site.yaml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("config.json")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("config")), ConfigFormat::Json);
    }

    #[test]
    fn test_parse_partial_json_uses_defaults() {
        let config = SiteConfig::parse_sanitized(r#"{"title": "Essays"}"#, ConfigFormat::Json).unwrap();
        assert_eq!(config.title, "Essays");
        assert_eq!(config.site_url, DEFAULT_SITE_URL);
    }

    #[test]
    fn test_parse_toml_with_markdown_table() {
        let toml = "title = \"Essays\"\nbaseurl = \"/essays/\"\n\n[markdown]\nfootnotes = false\n";
        let config = SiteConfig::parse_sanitized(toml, ConfigFormat::Toml).unwrap();
        assert_eq!(config.baseurl, "/essays");
        assert!(!config.markdown.footnotes);
        assert!(config.markdown.tables);
    }

    #[test]
    fn test_parse_yaml() {
        let config = SiteConfig::parse_sanitized("title: Essays\nrobots: noindex\n", ConfigFormat::Yaml).unwrap();
        assert_eq!(config.robots, "noindex");
    }

    #[test]
    fn test_parse_invalid_is_config_error() {
        let result = SiteConfig::parse_sanitized("{ invalid json }", ConfigFormat::Json);
        assert!(matches!(result, Err(Error::ConfigParse { .. })));
        let result = SiteConfig::parse_sanitized("title: [", ConfigFormat::Yaml);
        assert!(matches!(result, Err(Error::ConfigParse { .. })));
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let config =
            SiteConfig::parse_sanitized(r#"{"title": "x", "future_feature": true}"#, ConfigFormat::Json)
                .unwrap();
        assert_eq!(config.title, "x");
    }

    #[test]
    fn test_front_matter_overrides_present_fields() {
        let mut config = SiteConfig {
            title: "Site".to_string(),
            description: "Site description".to_string(),
            ..SiteConfig::default()
        };
        let front_matter = FrontMatter::parse("title: Essay One\nbaseurl: docs\nlayout: post\n").unwrap();
        config.apply_front_matter(&front_matter);

        assert_eq!(config.title, "Essay One");
        assert_eq!(config.description, "Site description");
        assert_eq!(config.baseurl, "/docs");
    }

    #[test]
    fn test_front_matter_invalid_yaml() {
        let result = FrontMatter::parse("title: [unclosed");
        assert!(matches!(result, Err(Error::FrontMatter { .. })));
    }

    #[test]
    fn test_serialization_roundtrip() {
        let config = SiteConfig {
            title: "Essays".to_string(),
            baseurl: "/essays".to_string(),
            ..SiteConfig::default()
        };
        for format in [ConfigFormat::Json, ConfigFormat::Toml, ConfigFormat::Yaml] {
            let text = config.to_string_in(format).unwrap();
            let parsed = SiteConfig::parse_sanitized(&text, format).unwrap();
            assert_eq!(parsed, config);
        }
    }
}
