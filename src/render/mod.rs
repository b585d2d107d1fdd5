//! Summary image: total country count and the top five by estimated GDP.

mod svg;

use crate::db::CountryStore;
use crate::error::CountrydexError;
use chrono::Utc;
use resvg::tiny_skia;
use resvg::usvg::{Options, Tree, fontdb::Database};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

pub use svg::{CANVAS_HEIGHT, CANVAS_WIDTH, SummaryData, summary_svg};

pub const SUMMARY_FILE_NAME: &str = "summary.png";
pub const TOP_COUNTRIES: u32 = 5;

/// Renders `summary.png` into a fixed output directory, replacing the previous image.
#[derive(Clone)]
pub struct SummaryRenderer {
    output_dir: PathBuf,
    fontdb: Arc<Database>,
}

impl SummaryRenderer {
    /// Loads system fonts plus `font_dir` (if given). Fonts are loaded once and shared.
    pub fn new(output_dir: impl AsRef<Path>, font_dir: Option<&Path>) -> Self {
        let mut fontdb = Database::new();
        fontdb.load_system_fonts();
        if let Some(dir) = font_dir {
            fontdb.load_fonts_dir(dir);
        }
        debug!(faces = fontdb.len(), "Loaded font faces for summary rendering");

        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            fontdb: Arc::new(fontdb),
        }
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.output_dir.join(SUMMARY_FILE_NAME)
    }

    /// Path of the last rendered image, if one exists.
    pub async fn existing_artifact(&self) -> Option<PathBuf> {
        let path = self.artifact_path();
        match tokio::fs::try_exists(&path).await {
            Ok(true) => Some(path),
            _ => None,
        }
    }

    /// Reads the current aggregate state, draws it, and overwrites the artifact.
    pub async fn render(&self, store: &CountryStore) -> Result<Vec<u8>, CountrydexError> {
        let data = SummaryData {
            total_countries: store.count().await?,
            top: store
                .top_by_gdp(TOP_COUNTRIES)
                .await?
                .into_iter()
                .map(|c| (c.name, c.estimated_gdp.unwrap_or_default()))
                .collect(),
            rendered_at: Utc::now(),
        };

        let svg = summary_svg(&data);
        let fontdb = Arc::clone(&self.fontdb);
        let png = tokio::task::spawn_blocking(move || rasterize(&svg, fontdb))
            .await
            .map_err(|e| CountrydexError::Render(format!("render task failed: {e}")))??;

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let path = self.artifact_path();
        tokio::fs::write(&path, &png).await?;

        info!(
            path = %path.display(),
            bytes = png.len(),
            total_countries = data.total_countries,
            "Summary image rendered"
        );
        Ok(png)
    }
}

fn rasterize(svg: &str, fontdb: Arc<Database>) -> Result<Vec<u8>, CountrydexError> {
    let mut options = Options::default();
    options.font_family = "DejaVu Sans".to_string();
    options.fontdb = fontdb;

    let tree = Tree::from_str(svg, &options)
        .map_err(|e| CountrydexError::Render(format!("failed to parse SVG: {e}")))?;

    let mut pixmap = tiny_skia::Pixmap::new(CANVAS_WIDTH, CANVAS_HEIGHT)
        .ok_or_else(|| CountrydexError::Render("failed to create pixmap".to_string()))?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| CountrydexError::Render(format!("failed to encode PNG: {e}")))
}
