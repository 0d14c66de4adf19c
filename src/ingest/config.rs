// src/ingest/config.rs
//! Source allowlist: which providers a collection pass may call.
//!
//! The file format follows the extension (`.toml` or `.json`). Entries are
//! matched case-insensitively against the provider names this build knows;
//! unknown names are reported and dropped. An empty list enables everything.

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_SOURCES_PATH: &str = "INGEST_SOURCES_PATH";

const FALLBACK_PATHS: [&str; 2] = ["config/ingest_sources.toml", "config/ingest_sources.json"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowlistFormat {
    Toml,
    Json,
}

impl AllowlistFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("toml") => Ok(AllowlistFormat::Toml),
            Some("json") => Ok(AllowlistFormat::Json),
            _ => bail!(
                "source allowlist {} must end in .toml or .json",
                path.display()
            ),
        }
    }
}

/// `sources = ["kaggle"]`
#[derive(Deserialize)]
struct TomlAllowlist {
    #[serde(default)]
    sources: Vec<String>,
}

/// `["kaggle"]` or `{"sources": ["kaggle"]}`
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonAllowlist {
    List(Vec<String>),
    Table { sources: Vec<String> },
}

pub fn parse_allowlist(content: &str, format: AllowlistFormat) -> Result<Vec<String>> {
    let names = match format {
        AllowlistFormat::Toml => {
            toml::from_str::<TomlAllowlist>(content)
                .context("parsing toml source allowlist")?
                .sources
        }
        AllowlistFormat::Json => match serde_json::from_str::<JsonAllowlist>(content)
            .context("parsing json source allowlist")?
        {
            JsonAllowlist::List(v) | JsonAllowlist::Table { sources: v } => v,
        },
    };
    Ok(names)
}

/// Map configured names onto `known` provider names.
///
/// Blank entries are ignored. Unknown names are logged and dropped; if
/// every non-blank entry is unknown the allowlist is rejected, since an
/// empty result would otherwise enable all sources.
pub fn resolve_sources(names: Vec<String>, known: &[&str]) -> Result<Vec<String>> {
    let mut resolved = BTreeSet::new();
    let mut unknown = Vec::new();

    for name in names {
        let n = name.trim();
        if n.is_empty() {
            continue;
        }
        match known.iter().find(|k| k.eq_ignore_ascii_case(n)) {
            Some(k) => {
                resolved.insert(k.to_string());
            }
            None => unknown.push(n.to_string()),
        }
    }

    if !unknown.is_empty() {
        tracing::warn!(
            target: "ingest",
            unknown = ?unknown,
            known = ?known,
            "ignoring unknown sources in allowlist"
        );
        if resolved.is_empty() {
            return Err(anyhow!("allowlist names no known source: {unknown:?}"));
        }
    }

    Ok(resolved.into_iter().collect())
}

pub fn load_sources_from(path: &Path, known: &[&str]) -> Result<Vec<String>> {
    let format = AllowlistFormat::from_path(path)?;
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading source allowlist from {}", path.display()))?;
    let names = parse_allowlist(&content, format)?;
    resolve_sources(names, known).with_context(|| format!("in {}", path.display()))
}

/// Resolve the allowlist: `$INGEST_SOURCES_PATH` if set (must exist), else
/// the first of `config/ingest_sources.{toml,json}` present, else empty.
pub fn load_sources_default(known: &[&str]) -> Result<Vec<String>> {
    if let Ok(p) = std::env::var(ENV_SOURCES_PATH) {
        let pb = PathBuf::from(p);
        if !pb.exists() {
            bail!("{ENV_SOURCES_PATH} points to non-existent path {}", pb.display());
        }
        return load_sources_from(&pb, known);
    }
    match FALLBACK_PATHS.iter().map(|p| PathBuf::from(*p)).find(|p| p.exists()) {
        Some(p) => load_sources_from(&p, known),
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KNOWN: &[&str] = &["kaggle", "devpost"];

    #[test]
    fn format_comes_from_extension() {
        assert_eq!(
            AllowlistFormat::from_path(Path::new("a/ingest.TOML")).unwrap(),
            AllowlistFormat::Toml
        );
        assert_eq!(
            AllowlistFormat::from_path(Path::new("ingest.json")).unwrap(),
            AllowlistFormat::Json
        );
        assert!(AllowlistFormat::from_path(Path::new("ingest.yaml")).is_err());
        assert!(AllowlistFormat::from_path(Path::new("ingest")).is_err());
    }

    #[test]
    fn json_accepts_list_or_table() {
        let list = parse_allowlist(r#"["kaggle"]"#, AllowlistFormat::Json).unwrap();
        let table = parse_allowlist(r#"{"sources": ["kaggle"]}"#, AllowlistFormat::Json).unwrap();
        assert_eq!(list, table);
    }

    #[test]
    fn toml_content_is_not_read_as_json() {
        assert!(parse_allowlist(r#"sources = ["kaggle"]"#, AllowlistFormat::Json).is_err());
        assert!(parse_allowlist(r#"["kaggle"]"#, AllowlistFormat::Toml).is_err());
        assert!(parse_allowlist("", AllowlistFormat::Toml).unwrap().is_empty());
    }

    #[test]
    fn resolve_canonicalizes_and_drops_unknown() {
        let names = vec![" Kaggle ".into(), "".into(), "DEVPOST".into(), "mlh".into()];
        assert_eq!(resolve_sources(names, KNOWN).unwrap(), vec!["devpost", "kaggle"]);
    }

    #[test]
    fn resolve_rejects_all_unknown() {
        assert!(resolve_sources(vec!["mlh".into()], KNOWN).is_err());
        assert!(resolve_sources(vec![" ".into()], KNOWN).unwrap().is_empty());
    }
}
