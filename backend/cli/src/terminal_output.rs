//! Terminal output utilities: notes, table rendering, progress, rich-text preview.

use eqforge_core::{Progress, ProgressSink, RichText};

// ---------------------------------------------------------------------------
// Styling
// ---------------------------------------------------------------------------

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const MAGENTA: &str = "\x1b[35m";
const CYAN: &str = "\x1b[36m";

/// Color is on unless `NO_COLOR` is set or the terminal is dumb or unknown.
pub fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    std::env::var_os("COLORTERM").is_some()
        || std::env::var("TERM").is_ok_and(|term| term != "dumb")
}

/// Remove CSI escape sequences (`ESC [ ... final-byte`).
pub fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\x1b' {
            out.push(c);
            continue;
        }
        for next in chars.by_ref() {
            if next.is_ascii_alphabetic() {
                break;
            }
        }
    }
    out
}

fn visible_width(s: &str) -> usize {
    strip_ansi(s).chars().count()
}

// ---------------------------------------------------------------------------
// Notes
// ---------------------------------------------------------------------------

#[derive(Clone, Copy)]
enum Note {
    Info,
    Warn,
    Error,
    Success,
}

impl Note {
    /// (color, glyph, plain-text label)
    fn style(self) -> (&'static str, &'static str, &'static str) {
        match self {
            Note::Info => (CYAN, "ℹ", "INFO"),
            Note::Warn => (YELLOW, "⚠", "WARN"),
            Note::Error => (RED, "✗", "ERROR"),
            Note::Success => (GREEN, "✓", "OK"),
        }
    }

    fn format(self, msg: &str, color: bool) -> String {
        let (tint, glyph, label) = self.style();
        if color {
            format!("{tint}{BOLD}{glyph}{RESET} {msg}")
        } else {
            format!("{label}: {msg}")
        }
    }
}

fn note(kind: Note, msg: &str) {
    let line = kind.format(msg, supports_color());
    match kind {
        Note::Error => eprintln!("{line}"),
        _ => println!("{line}"),
    }
}

pub fn note_info(msg: &str) {
    note(Note::Info, msg)
}

pub fn note_warn(msg: &str) {
    note(Note::Warn, msg)
}

/// Printed to stderr.
pub fn note_error(msg: &str) {
    note(Note::Error, msg)
}

pub fn note_success(msg: &str) {
    note(Note::Success, msg)
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Prints each conversion phase as a note.
pub struct TerminalProgress;

impl ProgressSink for TerminalProgress {
    fn report(&self, progress: &Progress) {
        let msg = progress.to_string();
        match progress {
            Progress::Converted { .. } => note_success(&msg),
            Progress::NoEquationsFound => note_warn(&msg),
            Progress::Failed { .. } => note_error(&msg),
            _ => note_info(&msg),
        }
    }
}

// ---------------------------------------------------------------------------
// Rich text
// ---------------------------------------------------------------------------

/// Render runs on one line, equations wrapped in `⟦ ⟧` (colored when supported).
pub fn render_rich_text(runs: &[RichText], color: bool) -> String {
    let mut out = String::new();
    for run in runs {
        match run {
            RichText::Text { content } => out.push_str(&content.replace('\n', "⏎")),
            RichText::Equation { expression } if color => {
                out.push_str(&format!("{MAGENTA}⟦{expression}⟧{RESET}"))
            }
            RichText::Equation { expression } => out.push_str(&format!("⟦{expression}⟧")),
        }
    }
    out
}

/// Cut `s` to at most `max` visible characters, marking the cut with `…`.
pub fn truncate(s: &str, max: usize) -> String {
    if strip_ansi(s).chars().count() <= max {
        return s.to_string();
    }
    // Drop styling rather than risk cutting inside an escape sequence.
    let plain: String = strip_ansi(s).chars().take(max.saturating_sub(1)).collect();
    format!("{plain}…")
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

pub enum Align {
    Left,
    Right,
}

pub struct Column {
    pub header: &'static str,
    pub align: Align,
}

impl Column {
    pub fn left(header: &'static str) -> Self {
        Self { header, align: Align::Left }
    }

    pub fn right(header: &'static str) -> Self {
        Self { header, align: Align::Right }
    }

    fn pad(&self, cell: &str, width: usize) -> String {
        let fill = " ".repeat(width.saturating_sub(visible_width(cell)));
        match self.align {
            Align::Left => format!("{cell}{fill}"),
            Align::Right => format!("{fill}{cell}"),
        }
    }
}

/// Render rows under a header and a dashed rule. Missing cells render empty;
/// cells past the last column are ignored.
pub fn render_table(columns: &[Column], rows: &[Vec<String>], color: bool) -> String {
    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, col)| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|cell| visible_width(cell))
                .fold(visible_width(col.header), usize::max)
        })
        .collect();

    let line = |cells: Vec<String>| format!("  {}\n", cells.join("  ").trim_end());

    let header = line(
        columns
            .iter()
            .zip(&widths)
            .map(|(col, w)| col.pad(col.header, *w))
            .collect(),
    );
    let mut out = if color {
        format!("{BOLD}{}{RESET}\n", header.trim_end_matches('\n'))
    } else {
        header
    };
    out.push_str(&line(widths.iter().map(|w| "-".repeat(*w)).collect()));

    for row in rows {
        out.push_str(&line(
            columns
                .iter()
                .zip(&widths)
                .enumerate()
                .map(|(i, (col, w))| col.pad(row.get(i).map(String::as_str).unwrap_or(""), *w))
                .collect(),
        ));
    }
    out
}
