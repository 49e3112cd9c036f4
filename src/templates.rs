use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{Cursor, Read, Write};
use std::ops::Range;
use std::path::{Path, PathBuf};

use askama_escape::{escape, Html};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, error};
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::error::RunError;
use crate::tokens::{Substitution, TokenMap};

#[derive(Debug, PartialEq, Clone)]
pub enum Filled {
    Written(PathBuf),
    /// The template could not be found; nothing was written.
    Skipped,
}

#[derive(Debug, PartialEq, Clone, Copy)]
enum TemplateKind {
    Docx,
    Text,
}

impl TemplateKind {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("docx") => TemplateKind::Docx,
            _ => TemplateKind::Text,
        }
    }
}

/// Copy the template to `output` with every known placeholder replaced.
///
/// A missing template is reported and skipped rather than failing the run.
pub fn fill_template(
    template: &Path,
    output: &Path,
    tokens: &TokenMap,
) -> Result<Filled, RunError> {
    if !template.exists() {
        error!("The file {} was not found.", template.display());
        return Ok(Filled::Skipped);
    }

    let substitution = tokens.substitution();
    match TemplateKind::of(template) {
        TemplateKind::Docx => fill_docx(template, output, &substitution)?,
        TemplateKind::Text => fill_text(template, output, &substitution)?,
    }
    Ok(Filled::Written(output.to_path_buf()))
}

fn fill_text(
    template: &Path,
    output: &Path,
    substitution: &Substitution,
) -> Result<(), RunError> {
    let text = String::from_utf8(fs::read(template)?).map_err(|_| {
        RunError::TemplateEncoding {
            path: template.to_path_buf(),
        }
    })?;
    let filled: String = text
        .split_inclusive('\n')
        .map(|line| {
            substitution
                .apply_plain(line)
                .map_or(Cow::Borrowed(line), Cow::Owned)
        })
        .collect();
    fs::write(output, filled)?;
    Ok(())
}

/// Parts of a Word document that hold paragraphs of visible text.
fn is_text_part(name: &str) -> bool {
    name == "word/document.xml"
        || ((name.starts_with("word/header") || name.starts_with("word/footer"))
            && name.ends_with(".xml"))
}

fn fill_docx(
    template: &Path,
    output: &Path,
    substitution: &Substitution,
) -> Result<(), RunError> {
    let mut archive = ZipArchive::new(File::open(template)?)?;
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if !is_text_part(entry.name()) {
            writer.raw_copy_file(entry)?;
            continue;
        }

        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes)?;
        let xml = String::from_utf8(bytes).map_err(|_| RunError::TemplateEncoding {
            path: template.to_path_buf(),
        })?;
        debug!(part = entry.name(), "Filling placeholders");
        let options =
            SimpleFileOptions::default().compression_method(entry.compression());
        writer.start_file(entry.name(), options)?;
        writer.write_all(fill_paragraphs(&xml, substitution).as_bytes())?;
    }

    // Only a complete archive reaches the output path.
    let filled = writer.finish()?.into_inner();
    fs::write(output, filled)?;
    Ok(())
}

static PARAGRAPH_PARTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?P<open><w:p(?:\s[^>]*)?>)",
        r"|(?P<close></w:p>)",
        r"|(?P<tag><w:t(?:\s[^>]*)?>)(?P<body>[^<]*)</w:t>",
    ))
    .expect("paragraph pattern is valid")
});

struct TextRun<'a> {
    span: Range<usize>,
    tag: &'a str,
    body: &'a str,
}

/// Substitute placeholders paragraph by paragraph in WordprocessingML.
///
/// Word splits text into runs at arbitrary points, so markers are found in
/// the joined text of a paragraph's runs. A value goes into the run where
/// its marker starts, keeping that run's formatting, and the rest of the
/// marker is cut from the runs it crosses. Runs without marker text, and
/// everything between runs, are left exactly as they were.
fn fill_paragraphs<'x>(xml: &'x str, substitution: &Substitution) -> Cow<'x, str> {
    let mut open: Vec<Vec<TextRun>> = Vec::new();
    let mut closed: Vec<Vec<TextRun>> = Vec::new();

    for caps in PARAGRAPH_PARTS.captures_iter(xml) {
        let Some(whole) = caps.get(0) else { continue };
        if let Some(tag) = caps.name("open") {
            if !tag.as_str().ends_with("/>") {
                open.push(Vec::new());
            }
        } else if caps.name("close").is_some() {
            closed.extend(open.pop());
        } else if let (Some(tag), Some(body)) = (caps.name("tag"), caps.name("body")) {
            if let Some(paragraph) = open.last_mut() {
                paragraph.push(TextRun {
                    span: whole.range(),
                    tag: tag.as_str(),
                    body: body.as_str(),
                });
            }
        }
    }

    let mut edits: Vec<(Range<usize>, String)> = closed
        .iter()
        .flat_map(|runs| fill_runs(runs, substitution))
        .collect();

    if edits.is_empty() {
        return Cow::Borrowed(xml);
    }

    edits.sort_by_key(|(span, _)| span.start);
    let mut result = String::with_capacity(xml.len());
    let mut position = 0;
    for (span, replacement) in edits {
        result.push_str(&xml[position..span.start]);
        result.push_str(&replacement);
        position = span.end;
    }
    result.push_str(&xml[position..]);
    Cow::Owned(result)
}

/// Replacement text elements for the runs of one paragraph that hold part
/// of a known marker.
fn fill_runs(runs: &[TextRun], substitution: &Substitution) -> Vec<(Range<usize>, String)> {
    let text: String = runs.iter().map(|run| run.body).collect();
    let markers = substitution.markers(&text);
    if markers.is_empty() {
        return Vec::new();
    }

    let mut edits = Vec::new();
    let mut run_start = 0;
    for run in runs {
        let run_end = run_start + run.body.len();
        let crossing: Vec<_> = markers
            .iter()
            .filter(|(marker, _)| marker.start < run_end && marker.end > run_start)
            .collect();

        if !crossing.is_empty() {
            let mut body = String::new();
            let mut position = run_start;
            for (marker, value) in crossing {
                body.push_str(&text[position..marker.start.max(position)]);
                if marker.start >= run_start {
                    body.push_str(&escape_xml(value));
                }
                position = marker.end.min(run_end);
            }
            body.push_str(&text[position..run_end]);
            edits.push((run.span.clone(), text_element(run.tag, &body)));
        }
        run_start = run_end;
    }
    edits
}

fn escape_xml(value: &str) -> Cow<'_, str> {
    Cow::Owned(escape(value, Html).to_string())
}

fn text_element(tag: &str, body: &str) -> String {
    let padded = body.starts_with(char::is_whitespace)
        || body.ends_with(char::is_whitespace);
    let tag = if padded && !tag.contains("xml:space") {
        r#"<w:t xml:space="preserve">"#
    } else {
        tag
    };
    format!("{}{}</w:t>", tag, body)
}
