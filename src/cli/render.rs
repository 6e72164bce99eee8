//! TUI-less render and export commands

use std::error::Error;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use crate::core::config::Config;
use crate::render::{render_document, render_with_options, RenderOptions};

fn options_from(config: &Config) -> RenderOptions {
    if config.strict_links.unwrap_or(false) {
        RenderOptions::strict_links()
    } else {
        RenderOptions::default()
    }
}

/// Render a Markdown file (or stdin) to an HTML fragment on stdout.
pub fn run_render(file: Option<std::path::PathBuf>, config: &Config) -> Result<(), Box<dyn Error>> {
    let source = match file {
        Some(path) => fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read {}: {e}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let fragment = render_with_options(&source, options_from(config));
    println!("{fragment}");
    Ok(())
}

/// Render a Markdown file into a standalone HTML document on disk.
pub fn run_export(
    file: &Path,
    output: &Path,
    title: Option<&str>,
    config: &Config,
) -> Result<(), Box<dyn Error>> {
    let source = fs::read_to_string(file)
        .map_err(|e| format!("Failed to read {}: {e}", file.display()))?;

    let fallback = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Untitled".to_string());
    let title = title.unwrap_or(&fallback);

    let document = render_document(title, &source, options_from(config));
    fs::write(output, document)
        .map_err(|e| format!("Failed to write {}: {e}", output.display()))?;
    println!("Wrote {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn export_writes_a_complete_document() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("notes.md");
        let output = dir.path().join("notes.html");
        fs::write(&input, "# Title\n\nbody & text").unwrap();

        run_export(&input, &output, None, &Config::default()).unwrap();

        let html = fs::read_to_string(&output).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>notes</title>"));
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("body &amp; text"));
    }

    #[test]
    fn export_honors_strict_links_from_config() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.md");
        let output = dir.path().join("out.html");
        fs::write(&input, "[label](not a url)").unwrap();

        let config = Config {
            strict_links: Some(true),
            ..Config::default()
        };
        run_export(&input, &output, Some("t"), &config).unwrap();

        let html = fs::read_to_string(&output).unwrap();
        assert!(html.contains("link-broken"));
        assert!(!html.contains("<a "));
    }
}
