use crate::error::CasebookError;
use crate::extraction::VisualExtractor;
use crate::model::{AssetKind, VisualAsset};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

/// Resolution used for exhibit page screenshots.
pub const DEFAULT_DPI: u32 = 200;

/// Run a poppler-utils binary and return its stdout.
pub(crate) fn run_tool(tool: &'static str, cmd: &mut Command) -> Result<Vec<u8>, CasebookError> {
    let output = cmd.output().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CasebookError::ToolNotFound { tool }
        } else {
            CasebookError::Extraction(format!("{} failed: {}", tool, e))
        }
    })?;

    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        return Err(CasebookError::ToolFailed { tool, code, stderr });
    }

    Ok(output.stdout)
}

/// Visual-asset backend using `pdfimages` and `pdftoppm` (from poppler-utils).
pub struct PopplerVisualExtractor {
    pub dpi: u32,
}

impl PopplerVisualExtractor {
    pub fn new() -> Self {
        PopplerVisualExtractor { dpi: DEFAULT_DPI }
    }
}

impl Default for PopplerVisualExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl VisualExtractor for PopplerVisualExtractor {
    fn extract_images(
        &self,
        pdf_path: &Path,
        out_dir: &Path,
    ) -> Result<Vec<VisualAsset>, CasebookError> {
        // pdfimages names files after a prefix; stage them, then rename per page.
        let staging = tempfile::tempdir()?;
        let prefix = staging.path().join("img");

        // -j keeps DCT images as JPEG, everything else becomes PNG.
        run_tool(
            "pdfimages",
            Command::new("pdfimages")
                .args(["-j", "-png", "-p"])
                .arg(pdf_path)
                .arg(&prefix),
        )?;

        let mut staged = Vec::new();
        for entry in fs::read_dir(staging.path())? {
            let path = entry?.path();
            match path.file_name().and_then(|n| n.to_str()).and_then(parse_staged_name) {
                Some(name) => staged.push((name, path)),
                None => debug!("ignoring unexpected pdfimages output {}", path.display()),
            }
        }
        staged.sort_by(|(a, _), (b, _)| (a.page, a.index).cmp(&(b.page, b.index)));

        fs::create_dir_all(out_dir)?;
        let mut assets = Vec::new();
        let mut current_page = 0;
        let mut per_page = 0;

        for (name, src) in staged {
            if name.page != current_page {
                current_page = name.page;
                per_page = 0;
            }
            per_page += 1;

            let filename = format!("page{}_img{}.{}", name.page, per_page, name.ext);
            let dest = out_dir.join(&filename);
            match place_image(&src, &dest) {
                Ok((width, height)) => assets.push(VisualAsset {
                    page: name.page,
                    filename,
                    filepath: dest,
                    kind: AssetKind::EmbeddedImage,
                    format: Some(name.ext),
                    width,
                    height,
                }),
                Err(e) => warn!(
                    "could not extract image {} from page {}: {}",
                    per_page, name.page, e
                ),
            }
        }

        Ok(assets)
    }

    fn render_page(
        &self,
        pdf_path: &Path,
        page_number: usize,
        out_dir: &Path,
    ) -> Result<VisualAsset, CasebookError> {
        fs::create_dir_all(out_dir)?;
        let stem = format!("exhibit_page{}", page_number);
        let page = page_number.to_string();

        run_tool(
            "pdftoppm",
            Command::new("pdftoppm")
                .arg("-png")
                .arg("-r")
                .arg(self.dpi.to_string())
                .args(["-f", page.as_str(), "-l", page.as_str(), "-singlefile"])
                .arg(pdf_path)
                .arg(out_dir.join(&stem)),
        )?;

        let filename = format!("{}.png", stem);
        let filepath = out_dir.join(&filename);
        let (width, height) = image_dimensions(&filepath)?;

        Ok(VisualAsset {
            page: page_number,
            filename,
            filepath,
            kind: AssetKind::Screenshot,
            format: Some("png".into()),
            width,
            height,
        })
    }

    fn backend_name(&self) -> &str {
        "poppler"
    }
}

#[derive(Debug, PartialEq)]
struct StagedName {
    page: usize,
    index: usize,
    ext: String,
}

/// Parse `img-<page>-<num>.<ext>` as written by `pdfimages -p`.
fn parse_staged_name(name: &str) -> Option<StagedName> {
    let rest = name.strip_prefix("img-")?;
    let (stem, ext) = rest.rsplit_once('.')?;
    let (page, index) = stem.split_once('-')?;
    Some(StagedName {
        page: page.parse().ok()?,
        index: index.parse().ok()?,
        ext: ext.to_lowercase(),
    })
}

fn place_image(src: &Path, dest: &Path) -> Result<(u32, u32), CasebookError> {
    fs::copy(src, dest)?;
    image_dimensions(dest).inspect_err(|_| {
        let _ = fs::remove_file(dest);
    })
}

fn image_dimensions(path: &Path) -> Result<(u32, u32), CasebookError> {
    image::image_dimensions(path).map_err(|e| CasebookError::Image {
        path: PathBuf::from(path),
        reason: e.to_string(),
    })
}
