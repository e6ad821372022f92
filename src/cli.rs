// src/cli.rs

use std::path::{Path, PathBuf};

use clap::Parser;

use rockgen::{AppConfig, ExportError, Session};

#[derive(Parser, Debug)]
#[command(name = "rockgen", version, about = "Seeded rock-shaped polygon generator")]
pub struct Cli {
    /// Share link or bare query string to open, e.g. "sides=7&seed=42".
    pub link: Option<String>,

    /// Write the shape as SVG and exit without opening a window.
    #[arg(long, value_name = "PATH")]
    pub svg: Option<PathBuf>,

    /// Write the shape as PNG and exit without opening a window.
    #[arg(long, value_name = "PATH")]
    pub png: Option<PathBuf>,

    /// Print the share link for the loaded (or freshly rolled) shape and exit.
    #[arg(long)]
    pub print_link: bool,

    /// Page that share links point at.
    #[arg(long, env = "ROCKGEN_BASE_URL")]
    pub base_url: Option<String>,

    /// PNG pixels per canvas unit.
    #[arg(long)]
    pub png_scale: Option<f64>,

    /// Margin around the shape in exported files, in canvas units.
    #[arg(long)]
    pub padding: Option<f64>,
}

impl Cli {
    pub fn app_config(&self) -> AppConfig {
        let mut config = AppConfig::default();
        if let Some(base_url) = &self.base_url {
            config.share_base_url = base_url.clone();
        }
        if let Some(scale) = self.png_scale.filter(|s| s.is_finite() && *s > 0.0) {
            config.export.png_scale = scale;
        }
        if let Some(padding) = self.padding.filter(|p| p.is_finite() && *p >= 0.0) {
            config.export.padding = padding;
        }
        config
    }

    pub fn is_headless(&self) -> bool {
        self.svg.is_some() || self.png.is_some() || self.print_link
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    std::fs::write(path, bytes).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Export and/or print without a window.
pub fn run_headless(cli: &Cli, config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let query = cli.link.as_deref().unwrap_or_default();
    let base_url = config.share_base_url.clone();
    let session = Session::from_query(query, config, &mut rand::thread_rng());

    if let Some(path) = &cli.svg {
        write_file(path, session.export_svg()?.as_bytes())?;
        log::info!("wrote {}", path.display());
    }
    if let Some(path) = &cli.png {
        write_file(path, &session.export_png()?)?;
        log::info!("wrote {}", path.display());
    }
    if cli.print_link {
        println!("{}", session.share_link(&base_url)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_mode_by_default() {
        let cli = Cli::try_parse_from(["rockgen", "sides=5&seed=3"]).unwrap();
        assert_eq!(cli.link.as_deref(), Some("sides=5&seed=3"));
        assert!(!cli.is_headless());
    }

    #[test]
    fn export_flags_switch_to_headless() {
        let cli = Cli::try_parse_from(["rockgen", "--svg", "out.svg", "--png-scale", "2"]).unwrap();
        assert!(cli.is_headless());
        assert_eq!(cli.app_config().export.png_scale, 2.0);
    }

    #[test]
    fn nonsensical_overrides_are_ignored() {
        let cli = Cli::try_parse_from(["rockgen", "--png-scale=-1", "--padding=-3"]).unwrap();
        let config = cli.app_config();
        assert_eq!(config.export.png_scale, 4.0);
        assert_eq!(config.export.padding, 10.0);
    }

    #[test]
    fn headless_export_writes_files() {
        let dir = std::env::temp_dir().join(format!("rockgen-cli-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let svg = dir.join("shape.svg");
        let png = dir.join("shape.png");
        let cli = Cli::try_parse_from([
            "rockgen".to_string(),
            "sides=5&variance=20&roughness=5&seed=9".to_string(),
            "--svg".to_string(),
            svg.display().to_string(),
            "--png".to_string(),
            png.display().to_string(),
        ])
        .unwrap();
        run_headless(&cli, cli.app_config()).unwrap();
        let svg_text = std::fs::read_to_string(&svg).unwrap();
        assert!(svg_text.contains("<polygon"));
        assert!(std::fs::read(&png).unwrap().starts_with(b"\x89PNG"));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
