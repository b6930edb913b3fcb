//! Static exports of a plan.
//!
//! Every format is a pure function of the plan and an [`ExportContext`];
//! nothing here reads live widget sizes or touches the filesystem except
//! [`file::write_artifact`].

pub mod canvas;
pub mod csv_export;
pub mod file;
pub mod html_export;
pub mod json_export;
pub mod png_export;
pub mod svg_export;

use chrono::{DateTime, NaiveDate, Utc};
use log::info;

use crate::config::EXPORT_TIMELINE_WIDTH;
use crate::model::calendar::today_utc;
use crate::model::Plan;

/// Base name used when the plan title is blank.
pub const FALLBACK_BASE_NAME: &str = "project-plan";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    Json,
    #[default]
    Csv,
    Tsv,
    /// Print-ready HTML, handed to the browser for "Save as PDF".
    Pdf,
    Svg,
    Png,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 6] = [
        ExportFormat::Json,
        ExportFormat::Csv,
        ExportFormat::Tsv,
        ExportFormat::Pdf,
        ExportFormat::Svg,
        ExportFormat::Png,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Json => "JSON",
            ExportFormat::Csv => "CSV",
            ExportFormat::Tsv => "TSV",
            ExportFormat::Pdf => "PDF (print)",
            ExportFormat::Svg => "SVG",
            ExportFormat::Png => "PNG",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
            ExportFormat::Pdf => "html",
            ExportFormat::Svg => "svg",
            ExportFormat::Png => "png",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
            ExportFormat::Tsv => "text/tab-separated-values",
            ExportFormat::Pdf => "text/html",
            ExportFormat::Svg => "image/svg+xml",
            ExportFormat::Png => "image/png",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("PNG encoding failed: {0}")]
    Png(#[from] image::ImageError),
    #[error("export produced invalid text: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("export font unavailable: {0}")]
    Font(&'static str),
    #[error("cannot rasterize a {width}x{height} canvas")]
    EmptyCanvas { width: u32, height: u32 },
}

/// A finished export, ready to be written or handed to another program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// Inputs of an export besides the plan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportContext {
    /// Anchors the range when the plan has nothing dated.
    pub today: NaiveDate,
    pub exported_at: DateTime<Utc>,
    /// Nominal pixel width of the timeline in SVG and PNG output.
    pub timeline_width: f32,
}

impl ExportContext {
    pub fn now(timeline_width: f32) -> Self {
        Self {
            today: today_utc(),
            exported_at: Utc::now(),
            timeline_width,
        }
    }
}

impl Default for ExportContext {
    fn default() -> Self {
        Self::now(EXPORT_TIMELINE_WIDTH)
    }
}

/// Render `plan` as `format`.
///
/// A plan without tasks has nothing to export and yields `Ok(None)`.
pub fn export(
    plan: &Plan,
    format: ExportFormat,
    ctx: &ExportContext,
) -> Result<Option<ExportArtifact>, ExportError> {
    if plan.tasks.is_empty() {
        info!("nothing to export");
        return Ok(None);
    }

    let bytes = match format {
        ExportFormat::Json => json_export::build_json(plan, ctx.exported_at)?.into_bytes(),
        ExportFormat::Csv => csv_export::build_csv(plan)?.into_bytes(),
        ExportFormat::Tsv => csv_export::build_tsv(plan).into_bytes(),
        ExportFormat::Pdf => html_export::build_print_html(plan, ctx.today).into_bytes(),
        ExportFormat::Svg => svg_export::build_svg(plan, ctx).into_bytes(),
        ExportFormat::Png => png_export::build_png(plan, ctx)?,
    };

    let artifact = ExportArtifact {
        file_name: format!("{}.{}", base_file_name(&plan.title), format.extension()),
        mime: format.mime(),
        bytes,
    };
    info!(
        "exported {} ({} bytes) as {}",
        format.label(),
        artifact.bytes.len(),
        artifact.file_name
    );
    Ok(Some(artifact))
}

/// `"Thesis Plan "` → `"thesis-plan"`; blank titles fall back to
/// [`FALLBACK_BASE_NAME`].
pub fn base_file_name(title: &str) -> String {
    let name = title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase();
    if name.is_empty() {
        FALLBACK_BASE_NAME.to_string()
    } else {
        name
    }
}

/// Escape text for XML and HTML bodies and attributes.
pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
