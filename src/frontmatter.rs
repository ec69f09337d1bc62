//! Migrates article front matter from YAML (`---`) to TOML (`+++`).
//!
//! The blog moved to a generator that reads TOML front matter with tags kept
//! under a `[taxonomies]` table. This rewrites articles in place:
//!
//! ```text
//! ---                              +++
//! title: Hello                     title = "Hello"
//! date: 2021-03-04          =>     date = 2021-03-04
//! tags: [rust, web]
//! ---                              [taxonomies]
//!                                  tags = ["rust", "web"]
//!                                  +++
//! ```

use regex::Regex;
use serde_yaml_ng::Value as Yaml;
use std::{
    path::{Path, PathBuf},
    sync::LazyLock,
};
use thiserror::Error;
use toml::{Table, Value as Toml, value::Datetime};

use crate::backup::article::is_markdown;

const YAML_FENCE: &str = "---\n";
const TOML_FENCE: &str = "+++\n";

/// Keys moved under `[taxonomies]`.
const TAXONOMIES: &[&str] = &["tags", "categories"];

#[allow(clippy::expect_used, reason = "pattern is a compile time constant")]
static DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}([Tt ]\d{2}:\d{2}(:\d{2}(\.\d+)?)?([Zz]|[+-]\d{2}:\d{2})?)?$")
        .expect("date regex should be valid")
});

#[allow(missing_docs)]
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("front matter is not valid yaml: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
    #[error("front matter must be a mapping of string keys")]
    NotAMapping,
    #[error("front matter cannot be represented as toml: {0}")]
    Toml(#[from] toml::ser::Error),
    #[error("failed to rewrite `{path}`: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Rewrites the YAML front matter of `markdown` into TOML.
///
/// Returns `None` when the document does not start with a closed `---` block,
/// including when it already uses TOML front matter. The body after the block is
/// kept byte for byte.
///
/// # Errors
///
/// Fails when the block is not a YAML mapping, or holds values TOML cannot
/// express (mixed-type arrays are fine, non-string keys are not).
pub fn convert(markdown: &str) -> Result<Option<String>, FrontMatterError> {
    let Some(rest) = markdown.strip_prefix(YAML_FENCE) else {
        return Ok(None);
    };

    let Some((block, body)) = split_block(rest) else {
        return Ok(None);
    };

    let yaml: Yaml = serde_yaml_ng::from_str(block)?;

    let table = match yaml {
        Yaml::Mapping(_) => match to_toml(yaml)? {
            Some(Toml::Table(table)) => table,
            _ => return Err(FrontMatterError::NotAMapping),
        },
        Yaml::Null => Table::new(),
        _ => return Err(FrontMatterError::NotAMapping),
    };

    let mut front = Table::new();
    let mut taxonomies = Table::new();

    for (key, value) in table {
        if TAXONOMIES.contains(&key.as_str()) {
            taxonomies.insert(key, value);
        } else {
            front.insert(key, value);
        }
    }

    if !taxonomies.is_empty() {
        front.insert("taxonomies".to_owned(), Toml::Table(taxonomies));
    }

    let toml = toml::to_string(&front)?;

    Ok(Some(format!("{TOML_FENCE}{toml}{TOML_FENCE}{body}")))
}

/// Converts every markdown file directly inside `dir` in place.
///
/// Returns the paths that were rewritten; files without YAML front matter are
/// left untouched.
///
/// # Errors
///
/// Stops at the first file that cannot be read, converted, or written.
pub async fn convert_dir(dir: &Path) -> Result<Vec<PathBuf>, FrontMatterError> {
    let io = |path: &Path| {
        let path = path.to_path_buf();
        move |source| FrontMatterError::Io { path, source }
    };

    let mut entries = tokio::fs::read_dir(dir).await.map_err(io(dir))?;
    let mut converted = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(io(dir))? {
        let path = entry.path();

        if !is_markdown(&path) {
            continue;
        }

        tracing::info!(path = %path.display(), "processing");

        let markdown = tokio::fs::read_to_string(&path)
            .await
            .map_err(io(&path))?;

        let Some(rewritten) = convert(&markdown)? else {
            tracing::debug!(path = %path.display(), "no yaml front matter");
            continue;
        };

        tokio::fs::write(&path, rewritten)
            .await
            .map_err(io(&path))?;

        converted.push(path);
    }

    converted.sort();

    Ok(converted)
}

/// Splits the text after the opening fence at the closing fence.
fn split_block(rest: &str) -> Option<(&str, &str)> {
    if let Some(body) = rest.strip_prefix(YAML_FENCE) {
        return Some(("", body));
    }

    let end = rest.find(&format!("\n{YAML_FENCE}"))?;
    let (block, body) = rest.split_at(end + 1);

    Some((block, &body[YAML_FENCE.len()..]))
}

/// Converts a YAML value into TOML. `null`s have no TOML form and are dropped.
fn to_toml(yaml: Yaml) -> Result<Option<Toml>, FrontMatterError> {
    let toml = match yaml {
        Yaml::Null => return Ok(None),
        Yaml::Bool(bool) => Toml::Boolean(bool),
        Yaml::Number(number) => {
            if let Some(int) = number.as_i64() {
                Toml::Integer(int)
            } else if let Some(float) = number.as_f64() {
                Toml::Float(float)
            } else {
                Toml::String(number.to_string())
            }
        }
        Yaml::String(string) => match date(&string) {
            Some(datetime) => Toml::Datetime(datetime),
            None => Toml::String(string),
        },
        Yaml::Sequence(sequence) => {
            let mut array = Vec::with_capacity(sequence.len());
            for item in sequence {
                if let Some(item) = to_toml(item)? {
                    array.push(item);
                }
            }
            Toml::Array(array)
        }
        Yaml::Mapping(mapping) => {
            let mut table = Table::new();
            for (key, value) in mapping {
                let key = match key {
                    Yaml::String(key) => key,
                    Yaml::Bool(_) | Yaml::Number(_) => {
                        serde_yaml_ng::to_string(&key)?.trim_end().to_owned()
                    }
                    _ => return Err(FrontMatterError::NotAMapping),
                };
                if let Some(value) = to_toml(value)? {
                    table.insert(key, value);
                }
            }
            Toml::Table(table)
        }
        Yaml::Tagged(tagged) => return to_toml(tagged.value),
    };

    Ok(Some(toml))
}

/// Parses YAML timestamps, which YAML loaders hand out as dates, into TOML datetimes.
fn date(string: &str) -> Option<Datetime> {
    if !DATE.is_match(string) {
        return None;
    }

    string.replacen(' ', "T", 1).parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Splits converted output into its parsed toml block and body.
    fn parse(converted: &str) -> (Table, &str) {
        let rest = converted.strip_prefix(TOML_FENCE).unwrap();
        let end = rest.find(TOML_FENCE).unwrap();
        let table = toml::from_str(&rest[..end]).unwrap();
        (table, &rest[end + TOML_FENCE.len()..])
    }

    #[test]
    fn should_convert_front_matter_and_keep_body() {
        let markdown = "---\ntitle: Hello, world\ndate: 2021-03-04\ndraft: false\ntags:\n  - rust\n  - web\n---\n# Hello\n\n---\n\nbody\n";

        let converted = convert(markdown).unwrap().unwrap();
        let (table, body) = parse(&converted);

        assert_eq!("# Hello\n\n---\n\nbody\n", body);
        assert_eq!(Some("Hello, world"), table["title"].as_str());
        assert_eq!(Some(false), table["draft"].as_bool());
        assert_eq!(
            "2021-03-04",
            table["date"].as_datetime().unwrap().to_string()
        );
        assert!(!table.contains_key("tags"));
        assert_eq!(
            Toml::Array(vec!["rust".into(), "web".into()]),
            table["taxonomies"]["tags"]
        );
    }

    #[test]
    fn should_keep_key_order() {
        let converted = convert("---\nzeta: 1\nalpha: 2\n---\n").unwrap().unwrap();
        let (table, _) = parse(&converted);
        let keys: Vec<_> = table.keys().map(String::as_str).collect();
        assert_eq!(vec!["zeta", "alpha"], keys);
    }

    #[test]
    fn should_skip_documents_without_yaml() {
        assert!(convert("# Just a title\n").unwrap().is_none());
        assert!(convert("+++\ntitle = \"a\"\n+++\n").unwrap().is_none());
        assert!(convert("---\ntitle: never closed\n").unwrap().is_none());
    }

    #[test]
    fn empty_block_becomes_empty_toml() {
        assert_eq!(Some("+++\n+++\nbody".to_owned()), convert("---\n---\nbody").unwrap());
    }

    #[test]
    fn nulls_are_dropped() {
        let converted = convert("---\ntitle: a\nsummary:\n---\n").unwrap().unwrap();
        let (table, body) = parse(&converted);
        assert_eq!("", body);
        assert_eq!(1, table.len());
        assert_eq!(Some("a"), table["title"].as_str());
    }

    #[test]
    fn should_reject_non_mapping() {
        assert!(matches!(
            convert("---\n- a\n- b\n---\n"),
            Err(FrontMatterError::NotAMapping)
        ));
        assert!(matches!(
            convert("---\ntitle: [unclosed\n---\n"),
            Err(FrontMatterError::Yaml(_))
        ));
    }

    #[test]
    fn should_detect_yaml_timestamps() {
        assert!(date("2021-03-04").is_some());
        assert!(date("2021-03-04 10:20:30").is_some());
        assert!(date("2021-03-04T10:20:30+08:00").is_some());
        assert!(date("2021").is_none());
        assert!(date("March 4th").is_none());
    }

    #[tokio::test]
    async fn convert_dir_rewrites_only_yaml_articles() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("yaml.md"), "---\ntitle: a\n---\nbody").unwrap();
        std::fs::write(dir.path().join("toml.md"), "+++\ntitle = \"b\"\n+++\nbody").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "---\ntitle: c\n---\n").unwrap();

        let converted = convert_dir(dir.path()).await.unwrap();

        assert_eq!(vec![dir.path().join("yaml.md")], converted);
        assert_eq!(
            "+++\ntitle = \"b\"\n+++\nbody",
            std::fs::read_to_string(dir.path().join("toml.md")).unwrap()
        );
        assert_eq!(
            "---\ntitle: c\n---\n",
            std::fs::read_to_string(dir.path().join("notes.txt")).unwrap()
        );
        assert!(
            std::fs::read_to_string(dir.path().join("yaml.md"))
                .unwrap()
                .starts_with(TOML_FENCE)
        );
    }
}
