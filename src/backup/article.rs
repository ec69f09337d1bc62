//! Markdown articles read from the blog's content directory.

use std::path::Path;

/// A blog article as backed up to GitHub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    /// The file name without its `.md` extension.
    pub title: String,
    /// The whole file, front matter included.
    pub content: String,
}

impl Article {
    /// Reads the article at `path`.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be read as UTF-8.
    pub async fn from_path(path: &Path) -> Result<Self, std::io::Error> {
        let content = tokio::fs::read_to_string(path).await?;

        Ok(Self {
            title: title(path),
            content,
        })
    }

    /// Reads every `.md` file directly inside `dir`, sorted by title.
    ///
    /// Subdirectories and other files are skipped.
    ///
    /// # Errors
    ///
    /// Returns the first I/O error hit while listing or reading.
    pub async fn read_dir(dir: &Path) -> Result<Vec<Self>, std::io::Error> {
        let mut entries = tokio::fs::read_dir(dir).await?;
        let mut articles = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();

            if !entry.file_type().await?.is_file() || !is_markdown(&path) {
                tracing::debug!(path = %path.display(), "skipping non-article entry");
                continue;
            }

            articles.push(Self::from_path(&path).await?);
        }

        articles.sort_by(|a, b| a.title.cmp(&b.title));

        Ok(articles)
    }
}

pub(crate) fn is_markdown(path: &Path) -> bool {
    path.extension().is_some_and(|extension| extension == "md")
}

fn title(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();

    name.strip_suffix(".md").unwrap_or(&*name).to_owned()
}
