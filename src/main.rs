//! Load one page by filename convention and print the filled slots as JSON.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use pageweaver::{
    DirectorySource, HttpSource, LoadSummary, PageConfig, PageController, PageOverrides, PageView,
    Slot, SlotContent,
};

#[derive(Debug, Parser)]
#[command(name = "pageweaver", version, about)]
struct Cli {
    /// Location path of the page, e.g. `/guides/river_walk.html`.
    page: String,

    /// Directory assets are read from when no origin is given.
    #[arg(long, default_value = ".", conflicts_with = "origin")]
    root: PathBuf,

    /// HTTP origin assets are requested from instead of a local directory.
    #[arg(long)]
    origin: Option<String>,

    /// Explicit configuration file; otherwise `pageweaver.config.json` is looked up in `--root`.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Markdown body path override.
    #[arg(long = "md")]
    markdown_path: Option<String>,

    /// Hero image path override. Remote URLs need `--origin`; a directory root cannot serve them.
    #[arg(long = "img")]
    image_path: Option<String>,

    /// Title override.
    #[arg(long)]
    title: Option<String>,

    /// Video path override. Remote URLs need `--origin`; a directory root falls back instead.
    #[arg(long = "video")]
    video_path: Option<String>,

    /// Show the fallback images while local images are still being probed.
    #[arg(long)]
    eager_fallback: bool,
}

impl Cli {
    fn load_config(&self) -> Result<PageConfig> {
        let mut config = match &self.config {
            Some(path) => PageConfig::from_path(path)?,
            None => PageConfig::discover(&self.root),
        };

        let flags = PageOverrides {
            markdown_path: self.markdown_path.clone(),
            image_path: self.image_path.clone(),
            title: self.title.clone(),
            video_path: self.video_path.clone(),
        };
        config.overrides = config.overrides.merged_with(flags);
        config.eager_fallback |= self.eager_fallback;
        Ok(config)
    }
}

/// Overrides a directory source can never serve, by flag name.
fn unserved_overrides<'a>(
    source: &DirectorySource,
    overrides: &'a PageOverrides,
) -> Vec<(&'static str, &'a str)> {
    [
        ("md", overrides.markdown_path.as_deref()),
        ("img", overrides.image_path.as_deref()),
        ("video", overrides.video_path.as_deref()),
    ]
    .into_iter()
    .filter_map(|(flag, value)| value.map(|url| (flag, url)))
    .filter(|(_, url)| !source.serves(url))
    .collect()
}

#[derive(Serialize)]
struct Snapshot {
    summary: LoadSummary,
    slots: std::collections::BTreeMap<Slot, SlotContent>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pageweaver=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.load_config()?;
    let page = Arc::new(PageView::full());

    let summary = match &cli.origin {
        Some(origin) => {
            let source = HttpSource::new(origin, config.request_timeout())?;
            let mut controller = PageController::new(source, Arc::clone(&page), config);
            let summary = controller.load(&cli.page).await;
            controller.stop();
            summary
        }
        None => {
            let source = DirectorySource::new(&cli.root);
            for (flag, url) in unserved_overrides(&source, &config.overrides) {
                tracing::warn!(
                    flag,
                    url,
                    root = %source.root().display(),
                    "Override is outside the asset root and will be treated as missing; use --origin"
                );
            }
            let mut controller = PageController::new(source, Arc::clone(&page), config);
            let summary = controller.load(&cli.page).await;
            controller.stop();
            summary
        }
    };

    let snapshot = Snapshot {
        summary,
        slots: page.snapshot(),
    };
    let json = serde_json::to_string_pretty(&snapshot).context("failed to serialise snapshot")?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_remote_overrides_for_directory_roots() {
        let source = DirectorySource::new("/srv/site");
        let overrides = PageOverrides {
            markdown_path: Some("notes/walk.md".into()),
            image_path: Some("https://cdn.example.com/hero.jpg".into()),
            title: Some("https://not-a-path".into()),
            video_path: Some("https://cdn.example.com/clip.mp4".into()),
        };

        assert_eq!(unserved_overrides(&source, &overrides), vec![
            ("img", "https://cdn.example.com/hero.jpg"),
            ("video", "https://cdn.example.com/clip.mp4"),
        ]);
    }

    #[test]
    fn cli_overrides_win_over_config_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(pageweaver::config::DEFAULT_CONFIG_FILE),
            r#"{ "overrides": { "title": "From File", "videoPath": "clip.mp4" } }"#,
        )
        .unwrap();

        let cli = Cli::parse_from([
            "pageweaver",
            "/walk.html",
            "--root",
            dir.path().to_str().unwrap(),
            "--title",
            "From Flag",
        ]);
        let config = cli.load_config().unwrap();
        assert_eq!(config.overrides.title.as_deref(), Some("From Flag"));
        assert_eq!(config.overrides.video_path.as_deref(), Some("clip.mp4"));
    }
}
