//! CLI tool that asks a language model to find inconsistencies across slides.

use anyhow::{Context, Result};
use clap::Parser;
use deck_core::{
    describe_images, find_inconsistencies, merge_content, LanguageModel, SlideContent,
    SlideFlattener,
};
use deck_gemini::{GeminiClient, GeminiConfig};
use deck_pptx::PptxParser;
use glob::{MatchOptions, Pattern};
use std::io::Write;
use std::path::{Path, PathBuf};

/// File pattern for pre-rendered slide images inside the image directory.
const IMAGE_PATTERN: &str = "*.jpeg";

/// Find factual or logical inconsistencies across the slides of a presentation.
#[derive(Parser, Debug)]
#[command(name = "deck-audit")]
#[command(about, long_about = None)]
struct Args {
    /// Presentation file to analyze (.pptx)
    presentation: PathBuf,

    /// Directory containing rendered slide images (*.jpeg)
    image_dir: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load .env before the logger so RUST_LOG can come from it
    let dotenv = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    match dotenv {
        Ok(path) => log::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => log::warn!("Ignoring .env file: {}", e),
    }

    let config = GeminiConfig::from_env()?;
    let client = GeminiClient::new(config);
    log::info!("Using model {}", client.config().model);

    let stdout = std::io::stdout();
    run(&args, &client, &mut stdout.lock())
}

/// Run the whole pipeline and write the report to `out`.
///
/// Nothing is written unless every step succeeds.
fn run(args: &Args, model: &dyn LanguageModel, out: &mut impl Write) -> Result<()> {
    let image_paths = discover_images(&args.image_dir)?;
    log::info!(
        "Found {} slide images in {}",
        image_paths.len(),
        args.image_dir.display()
    );

    let presentation = PptxParser::new()
        .open(&args.presentation)
        .with_context(|| format!("Failed to read presentation {}", args.presentation.display()))?;
    log::info!("Extracted {} slides", presentation.slides.len());

    let document = SlideFlattener::new().flatten_presentation(&presentation);
    let report = audit(document, &image_paths, model)?;

    writeln!(out, "{}", report).context("Failed to write report")?;
    Ok(())
}

/// Describe the images, merge them over the document text, and analyze.
fn audit(document: SlideContent, image_paths: &[PathBuf], model: &dyn LanguageModel) -> Result<String> {
    let images = describe_images(model, image_paths).context("Failed to describe slide images")?;
    let merged = merge_content(document, images);

    find_inconsistencies(model, &merged).context("Inconsistency analysis failed")
}

/// List the `*.jpeg` files directly inside `dir`, sorted by path.
///
/// Hidden files and non-files are skipped. A directory without matches
/// yields an empty list; a missing directory is an error.
fn discover_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let metadata = std::fs::metadata(dir)
        .with_context(|| format!("Cannot access image directory {}", dir.display()))?;
    if !metadata.is_dir() {
        anyhow::bail!("{} is not a directory", dir.display());
    }

    let escaped = Pattern::escape(&dir.to_string_lossy());
    let pattern = Path::new(&escaped).join(IMAGE_PATTERN);
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    };

    let mut paths = Vec::new();
    for entry in glob::glob_with(&pattern.to_string_lossy(), options)
        .with_context(|| format!("Invalid image pattern {}", pattern.display()))?
    {
        let path = entry.context("Failed to list image directory")?;
        if path.is_file() {
            paths.push(path);
        } else {
            log::warn!("Skipping {}: not a regular file", path.display());
        }
    }

    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::{Error, SlideImage};
    use std::cell::RefCell;
    use std::fs;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    /// A 1x1 grayscale PNG.
    const TINY_PNG: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x00, 0x00, 0x00, 0x00, 0x3A,
        0x7E, 0x9B, 0x55, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x60,
        0x00, 0x00, 0x00, 0x02, 0x00, 0x01, 0x48, 0xAF, 0xA4, 0x71, 0x00, 0x00, 0x00, 0x00, 0x49,
        0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ];

    /// Records prompts; answers image requests with a description naming the
    /// file and the analysis request with a fixed report.
    #[derive(Default)]
    struct ScriptedModel {
        fail_images: bool,
        fail_analysis: bool,
        prompts: RefCell<Vec<String>>,
    }

    impl LanguageModel for ScriptedModel {
        fn generate(&self, prompt: &str, image: Option<&SlideImage>) -> deck_core::Result<String> {
            self.prompts.borrow_mut().push(prompt.to_string());
            match image {
                Some(_) if self.fail_images => Err(Error::RemoteError("quota exceeded".into())),
                Some(image) => Ok(format!(
                    "Image of {} shows revenue of $12M",
                    image.path.file_name().unwrap().to_string_lossy()
                )),
                None if self.fail_analysis => Err(Error::RemoteError("deadline exceeded".into())),
                None => Ok("REPORT".to_string()),
            }
        }
    }

    fn write_pptx(path: &Path, slide_texts: &[&str]) {
        let mut writer = ZipWriter::new(fs::File::create(path).unwrap());
        let options = FileOptions::default();

        let ids: String = (1..=slide_texts.len())
            .map(|n| format!("<p:sldId id=\"{}\" r:id=\"rId{}\"/>", 255 + n, n))
            .collect();
        writer.start_file("ppt/presentation.xml", options).unwrap();
        write!(
            writer,
            "<p:presentation xmlns:p=\"p\" xmlns:r=\"r\"><p:sldIdLst>{}</p:sldIdLst></p:presentation>",
            ids
        )
        .unwrap();

        let rels: String = (1..=slide_texts.len())
            .map(|n| {
                format!(
                    "<Relationship Id=\"rId{n}\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide\" Target=\"slides/slide{n}.xml\"/>"
                )
            })
            .collect();
        writer.start_file("ppt/_rels/presentation.xml.rels", options).unwrap();
        write!(writer, "<Relationships>{}</Relationships>", rels).unwrap();

        for (idx, text) in slide_texts.iter().enumerate() {
            writer
                .start_file(format!("ppt/slides/slide{}.xml", idx + 1), options)
                .unwrap();
            write!(
                writer,
                "<p:sld xmlns:p=\"p\" xmlns:a=\"a\"><p:cSld><p:spTree>\
                 <p:sp><p:txBody><a:p><a:r><a:t>{}</a:t></a:r></a:p></p:txBody></p:sp>\
                 </p:spTree></p:cSld></p:sld>",
                text
            )
            .unwrap();
        }

        writer.finish().unwrap();
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        args: Args,
    }

    fn fixture(slide_texts: &[&str], images: &[&str]) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let presentation = dir.path().join("deck.pptx");
        write_pptx(&presentation, slide_texts);

        let image_dir = dir.path().join("images");
        fs::create_dir(&image_dir).unwrap();
        for name in images {
            fs::write(image_dir.join(name), TINY_PNG).unwrap();
        }

        Fixture {
            _dir: dir,
            args: Args {
                presentation,
                image_dir,
            },
        }
    }

    #[test]
    fn test_args_require_both_paths() {
        assert!(Args::try_parse_from(["deck-audit", "deck.pptx", "slides/"]).is_ok());
        assert!(Args::try_parse_from(["deck-audit", "deck.pptx"]).is_err());
    }

    #[test]
    fn test_discover_images_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "slide2.jpeg",
            "slide10.jpeg",
            "slide1.jpeg",
            "notes.txt",
            "slide3.JPEG",
            "slide4.jpg",
            ".hidden.jpeg",
        ] {
            fs::write(dir.path().join(name), TINY_PNG).unwrap();
        }
        fs::create_dir(dir.path().join("folder.jpeg")).unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("slide5.jpeg"), TINY_PNG).unwrap();

        let found = discover_images(dir.path()).unwrap();
        let names: Vec<String> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["slide1.jpeg", "slide10.jpeg", "slide2.jpeg"]);
    }

    #[test]
    fn test_discover_images_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_images(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_discover_images_escapes_directory_name() {
        let dir = tempfile::tempdir().unwrap();
        let odd = dir.path().join("deck [final]*");
        fs::create_dir(&odd).unwrap();
        fs::write(odd.join("slide1.jpeg"), TINY_PNG).unwrap();

        assert_eq!(discover_images(&odd).unwrap(), vec![odd.join("slide1.jpeg")]);
    }

    #[test]
    fn test_discover_images_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_images(&dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_run_prints_report_for_document_only() {
        let fx = fixture(&["Revenue was $10M in Q1", "Revenue was $12M in Q1"], &[]);
        let model = ScriptedModel::default();
        let mut out = Vec::new();

        run(&fx.args, &model, &mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "REPORT\n");
        let prompts = model.prompts.borrow();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("--- Slide 1 ---\nRevenue was $10M in Q1\n\n"));
        assert!(prompts[0].contains("--- Slide 2 ---\nRevenue was $12M in Q1\n\n"));
    }

    #[test]
    fn test_run_image_description_overrides_slide_text() {
        let fx = fixture(&["Revenue was $10M in Q1", "Team of 40"], &["Slide 1.jpeg"]);
        let model = ScriptedModel::default();
        let mut out = Vec::new();

        run(&fx.args, &model, &mut out).unwrap();

        let prompts = model.prompts.borrow();
        assert_eq!(prompts.len(), 2);
        let analysis = &prompts[1];
        assert!(analysis.contains("--- Slide 1 ---\nImage of Slide 1.jpeg shows revenue of $12M\n\n"));
        assert!(!analysis.contains("Revenue was $10M in Q1"));
        assert!(analysis.contains("--- Slide 2 ---\nTeam of 40\n\n"));
    }

    #[test]
    fn test_run_appends_image_only_labels() {
        let fx = fixture(&["Intro"], &["slide2.jpeg", "slide1.jpeg"]);
        let model = ScriptedModel::default();
        let mut out = Vec::new();

        run(&fx.args, &model, &mut out).unwrap();

        let prompts = model.prompts.borrow();
        let analysis = &prompts[2];
        let intro = analysis.find("--- Slide 1 ---").unwrap();
        let first = analysis.find("--- slide1 ---").unwrap();
        let second = analysis.find("--- slide2 ---").unwrap();
        assert!(intro < first && first < second);
    }

    #[test]
    fn test_image_failure_prints_nothing() {
        let fx = fixture(&["Intro"], &["slide1.jpeg"]);
        let model = ScriptedModel {
            fail_images: true,
            ..Default::default()
        };
        let mut out = Vec::new();

        let result = run(&fx.args, &model, &mut out);

        assert!(result.is_err());
        assert!(out.is_empty());
        assert_eq!(model.prompts.borrow().len(), 1);
    }

    #[test]
    fn test_analysis_failure_prints_nothing() {
        let fx = fixture(&["Intro"], &[]);
        let model = ScriptedModel {
            fail_analysis: true,
            ..Default::default()
        };
        let mut out = Vec::new();

        let result = run(&fx.args, &model, &mut out);

        assert!(result.is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn test_missing_presentation_makes_no_calls() {
        let fx = fixture(&["Intro"], &["slide1.jpeg"]);
        let args = Args {
            presentation: fx.args.image_dir.join("missing.pptx"),
            image_dir: fx.args.image_dir.clone(),
        };
        let model = ScriptedModel::default();
        let mut out = Vec::new();

        let result = run(&args, &model, &mut out);

        assert!(result.is_err());
        assert!(out.is_empty());
        assert!(model.prompts.borrow().is_empty());
    }

    #[test]
    fn test_audit_with_no_images_uses_document_text() {
        let document: SlideContent = [("Slide 1", "Only slide")].into_iter().collect();
        let model = ScriptedModel::default();

        let report = audit(document, &[], &model).unwrap();

        assert_eq!(report, "REPORT");
        assert!(model.prompts.borrow()[0].contains("--- Slide 1 ---\nOnly slide\n\n"));
    }
}
