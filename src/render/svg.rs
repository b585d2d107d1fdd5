use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Write as _;

pub const CANVAS_WIDTH: u32 = 600;
pub const CANVAS_HEIGHT: u32 = 400;

const X_TEXT: u32 = 50;
const Y_TOTAL: u32 = 50;
const Y_HEADING: u32 = 100;
const Y_FIRST_ROW: u32 = 140;
const ROW_HEIGHT: u32 = 30;
const Y_FOOTER: u32 = 340;

/// Everything drawn on the summary canvas.
#[derive(Debug, Clone)]
pub struct SummaryData {
    pub total_countries: i64,
    /// `(name, estimated_gdp)`, already ordered.
    pub top: Vec<(String, f64)>,
    pub rendered_at: DateTime<Utc>,
}

pub fn summary_svg(data: &SummaryData) -> String {
    let mut body = String::new();
    push_line(
        &mut body,
        Y_TOTAL,
        &format!("Total Countries: {}", data.total_countries),
    );
    push_line(&mut body, Y_HEADING, "Top 5 Countries by Estimated GDP:");

    for (i, ((name, gdp), y)) in data
        .top
        .iter()
        .zip((Y_FIRST_ROW..).step_by(ROW_HEIGHT as usize))
        .enumerate()
    {
        push_line(&mut body, y, &format!("{}. {name} - {gdp:.2}", i + 1));
    }

    push_line(
        &mut body,
        Y_FOOTER,
        &format!(
            "Last Refresh: {}",
            data.rendered_at.to_rfc3339_opts(SecondsFormat::Millis, true)
        ),
    );

    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{CANVAS_WIDTH}" height="{CANVAS_HEIGHT}" viewBox="0 0 {CANVAS_WIDTH} {CANVAS_HEIGHT}"><rect width="100%" height="100%" fill="#ffffff"/><g font-family="Arial, DejaVu Sans, Liberation Sans, sans-serif" font-size="20" fill="#000000">{body}</g></svg>"##
    )
}

fn push_line(out: &mut String, y: u32, text: &str) {
    let _ = write!(
        out,
        r#"<text x="{X_TEXT}" y="{y}">{}</text>"#,
        escape_xml(text)
    );
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
