use std::sync::LazyLock;

use jiff::tz::TimeZone;
use regex::Regex;
use serde::Serialize;
use tera::{Context, Tera};

use biodata_core::models::record::BioRecord;

use crate::error::ExportError;
use crate::styles::DocumentStyles;

pub const TEMPLATE_NAME: &str = "biodata.svg";

const TEMPLATE: &str = include_str!("../templates/biodata.svg.tera");

const TITLE: &str = "BIO-DATA";

/// Shown for optional values the user left empty.
const NOT_PROVIDED: &str = "N/A";

/// Average glyph advance as a fraction of font size, used for wrapping.
const GLYPH_ADVANCE: f32 = 0.55;

static LEADING_ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^&#?[0-9A-Za-z]+;").expect("entity pattern is a valid regex")
});

/// Template markup plus the dimensions it was laid out for.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedTemplate {
    pub markup: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Serialize)]
struct TemplateContext<'a> {
    styles: &'a DocumentStyles,
    title: &'static str,
    width: u32,
    height: u32,
    padding: f32,
    value_x: f32,
    title_y: f32,
    rule_y: f32,
    rule_end: f32,
    sections: Vec<Section>,
    footer_y: f32,
    generated_on: String,
}

#[derive(Debug, Serialize)]
struct Section {
    title: &'static str,
    y: f32,
    rows: Vec<Row>,
}

#[derive(Debug, Serialize)]
struct Row {
    label: &'static str,
    y: f32,
    lines: Vec<Line>,
}

#[derive(Debug, Serialize)]
struct Line {
    y: f32,
    text: String,
}

/// Render the record into the fixed-width SVG template.
///
/// Record values are interpolated as-is: they were escaped by the collector,
/// and the template name carries no autoescape extension.
pub fn render_template(
    record: &BioRecord,
    styles: &DocumentStyles,
    time_zone: &TimeZone,
) -> Result<RenderedTemplate, ExportError> {
    let context = layout(record, styles, time_zone);
    let width = context.width;
    let height = context.height;

    let mut tera = Tera::default();
    tera.add_raw_template(TEMPLATE_NAME, TEMPLATE)
        .map_err(|e| ExportError::TemplateParse(e.to_string()))?;

    let value = serde_json::to_value(&context)?;
    let context =
        Context::from_value(value).map_err(|e| ExportError::TemplateRender(e.to_string()))?;

    let markup = tera.render(TEMPLATE_NAME, &context)?;
    tracing::debug!(width, height, bytes = markup.len(), "template rendered");

    Ok(RenderedTemplate {
        markup,
        width,
        height,
    })
}

fn layout<'a>(
    record: &BioRecord,
    styles: &'a DocumentStyles,
    time_zone: &TimeZone,
) -> TemplateContext<'a> {
    let width = styles.template_width;
    let padding = styles.padding;
    let value_x = padding + styles.label_width;
    let value_width = (width as f32 - value_x - padding).max(styles.body_size);
    let max_units = ((value_width / (styles.body_size * GLYPH_ADVANCE)).floor() as usize).max(1);

    let title_y = padding + styles.title_size;
    let rule_y = title_y + 14.0;
    let mut cursor = rule_y + 30.0;

    let mut sections = Vec::new();
    for (title, fields) in section_fields(record) {
        let section_y = cursor + styles.heading_size;
        cursor = section_y + 12.0;

        let mut rows = Vec::new();
        for (label, value) in fields {
            let value = if value.is_empty() { NOT_PROVIDED } else { value.as_str() };
            let row_y = cursor + styles.body_size;
            let lines = wrap(value, max_units)
                .into_iter()
                .map(|text| {
                    let line = Line {
                        y: cursor + styles.body_size,
                        text,
                    };
                    cursor += styles.line_height();
                    line
                })
                .collect();
            rows.push(Row {
                label,
                y: row_y,
                lines,
            });
        }

        sections.push(Section {
            title,
            y: section_y,
            rows,
        });
        cursor += 16.0;
    }

    let footer_y = cursor + 24.0 + styles.footer_size;
    let height = (footer_y + padding).ceil() as u32;

    let generated_on = record
        .captured_at
        .to_zoned(time_zone.clone())
        .strftime("%Y-%m-%d %H:%M:%S %Z")
        .to_string();

    TemplateContext {
        styles,
        title: TITLE,
        width,
        height,
        padding,
        value_x,
        title_y,
        rule_y,
        rule_end: width as f32 - padding,
        sections,
        footer_y,
        generated_on,
    }
}

fn section_fields(record: &BioRecord) -> Vec<(&'static str, Vec<(&'static str, String)>)> {
    let mut sections = vec![(
        "Personal Details",
        vec![
            ("Full Name:", record.full_name()),
            ("Date of Birth:", record.date_of_birth.clone()),
            ("Gender:", record.gender.clone()),
            ("Nationality:", record.nationality.clone()),
        ],
    )];

    if let Some(health) = &record.health {
        sections.push((
            "Health Statistics",
            vec![
                ("Height (cm):", health.height.clone()),
                ("Weight (kg):", health.weight.clone()),
                ("Blood Type:", health.blood_type.clone()),
            ],
        ));
    }

    sections.push((
        "Contact & Address",
        vec![
            ("Email:", record.email.clone()),
            ("Phone:", record.phone.clone()),
            ("Address:", record.address.clone()),
        ],
    ));

    sections
}

/// Greedy word wrap measured in display units, where an escaped entity
/// counts as one unit and is never split.
pub fn wrap(text: &str, max_units: usize) -> Vec<String> {
    let max_units = max_units.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let units = display_units(word);
        // Only the last chunk of a hard-split word can be shorter than a full
        // line, so chunks of one word never share a line.
        for chunk in units.chunks(max_units) {
            let chunk_text = chunk.concat();
            if current_len == 0 {
                current = chunk_text;
                current_len = chunk.len();
            } else if current_len + 1 + chunk.len() <= max_units {
                current.push(' ');
                current.push_str(&chunk_text);
                current_len += 1 + chunk.len();
            } else {
                lines.push(std::mem::replace(&mut current, chunk_text));
                current_len = chunk.len();
            }
        }
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn display_units(word: &str) -> Vec<&str> {
    let mut units = Vec::new();
    let mut rest = word;
    while let Some(c) = rest.chars().next() {
        let len = if c == '&' {
            LEADING_ENTITY.find(rest).map_or(1, |m| m.end())
        } else {
            c.len_utf8()
        };
        units.push(&rest[..len]);
        rest = &rest[len..];
    }
    units
}
