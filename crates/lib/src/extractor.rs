//! # Completion Extractor
//!
//! Best-effort extraction of the three labelled sections from a free-text
//! completion. The model is asked for a format but never bound to it, so
//! [`extract_analysis`] is total: every input, including the empty string,
//! yields all three sections with either scraped or fallback content.

use crate::types::{AnalysisRequest, Insight, NewAnalysis};
use regex::Regex;
use std::sync::LazyLock;

/// Used as the description when a section is missing or empty.
pub const FALLBACK_DESCRIPTION: &str = "None found.";

const EMOJI_CLASS: &str = r"[\x{2600}-\x{27BF}\x{1F300}-\x{1F6FF}\x{1F900}-\x{1F9FF}\x{1FA70}-\x{1FAFF}]";

// A label, optionally preceded by a list number or markdown emphasis and
// followed by a parenthetical, then a colon.
static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:\d+[.)][ \t]*)?(?:\*{1,2}|#{1,6}[ \t]*)?\b(?P<label>references|curiosities|author(?:(?:'|’)?s)?[ \t]+intention|intention[ \t]+of[ \t]+the[ \t]+author)\b(?:[ \t]*\([^)\n]*\))?[ \t]*(?:\*{1,2})?[ \t]*:(?:\*{1,2})?",
    )
    .expect("label pattern is valid")
});

static TRAILING_EMOJI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?:{EMOJI_CLASS}[\x{{FE0F}}\x{{200D}}]*\s*)+$"))
        .expect("trailing emoji pattern is valid")
});

static EMOJI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"{EMOJI_CLASS}\x{{FE0F}}?")).expect("emoji pattern is valid")
});

/// The three sections asked of the model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    References,
    Curiosities,
    AuthorIntention,
}

impl Section {
    /// The card title used when the section is stored.
    pub fn title(self) -> &'static str {
        match self {
            Section::References => "References",
            Section::Curiosities => "Curiosities",
            Section::AuthorIntention => "Author's intention",
        }
    }

    /// The icon used when no emoji could be scraped.
    pub fn default_icon(self) -> &'static str {
        match self {
            Section::References => "🔗",
            Section::Curiosities => "💡",
            Section::AuthorIntention => "📝",
        }
    }

    fn from_label(label: &str) -> Self {
        let label = label.to_lowercase();
        if label.starts_with("ref") {
            Section::References
        } else if label.starts_with("cur") {
            Section::Curiosities
        } else {
            Section::AuthorIntention
        }
    }
}

/// Tuning knobs for the extractor.
#[derive(Clone, Debug, Default)]
pub struct ExtractorOptions {
    /// Keep only the first N sentences of each description.
    pub max_sentences: Option<usize>,
}

/// One extracted section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractedSection {
    pub description: String,
    pub icon: String,
    /// Whether the label was found with a non-empty description.
    pub found: bool,
}

impl ExtractedSection {
    fn fallback(section: Section) -> Self {
        Self {
            description: FALLBACK_DESCRIPTION.to_string(),
            icon: section.default_icon().to_string(),
            found: false,
        }
    }
}

/// The result of running the extractor over a completion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractedAnalysis {
    pub references: ExtractedSection,
    pub curiosities: ExtractedSection,
    pub intention: ExtractedSection,
}

impl ExtractedAnalysis {
    /// Builds the record fields to store for `request`.
    pub fn into_new_analysis(self, request: AnalysisRequest) -> NewAnalysis {
        NewAnalysis {
            lyrics: request.lyrics,
            song_title: request.song_title,
            artist: request.artist,
            references: vec![Insight {
                title: Section::References.title().to_string(),
                description: self.references.description,
                icon: self.references.icon,
            }],
            curiosities: vec![Insight {
                title: Section::Curiosities.title().to_string(),
                description: self.curiosities.description,
                icon: self.curiosities.icon,
            }],
            author_intention: format!("{} {}", self.intention.icon, self.intention.description),
        }
    }
}

/// Splits a completion into references, curiosities and author intention.
pub fn extract_analysis(text: &str, options: &ExtractorOptions) -> ExtractedAnalysis {
    let labels: Vec<(Section, usize, usize)> = LABEL_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let label = caps.name("label")?;
            if !starts_section(&text[..whole.start()]) {
                return None;
            }
            Some((Section::from_label(label.as_str()), whole.start(), whole.end()))
        })
        .collect();

    let mut references = None;
    let mut curiosities = None;
    let mut intention = None;

    for (i, (section, _, body_start)) in labels.iter().enumerate() {
        let slot = match section {
            Section::References => &mut references,
            Section::Curiosities => &mut curiosities,
            Section::AuthorIntention => &mut intention,
        };
        if slot.is_some() {
            continue;
        }
        let body_end = labels.get(i + 1).map_or(text.len(), |(_, start, _)| *start);
        *slot = Some(parse_section(*section, &text[*body_start..body_end], options));
    }

    ExtractedAnalysis {
        references: references.unwrap_or_else(|| ExtractedSection::fallback(Section::References)),
        curiosities: curiosities
            .unwrap_or_else(|| ExtractedSection::fallback(Section::Curiosities)),
        intention: intention
            .unwrap_or_else(|| ExtractedSection::fallback(Section::AuthorIntention)),
    }
}

/// A label only opens a section at the start of a line, after a list or
/// markdown marker, after a sentence end or after an emoji. Anywhere else it is
/// part of the running description (`Its references: Homer.`).
fn starts_section(before: &str) -> bool {
    let before =
        before.trim_end_matches(|c: char| matches!(c, ' ' | '\t' | '*' | '#' | '-' | '_' | '>'));
    match before.chars().last() {
        None => true,
        Some('\n' | '\r' | '.' | '!' | '?') => true,
        Some(_) => TRAILING_EMOJI_RE.is_match(before),
    }
}

fn parse_section(section: Section, body: &str, options: &ExtractorOptions) -> ExtractedSection {
    let mut description = clean_markup(body);
    let mut icon = None;

    if let Some(run) = TRAILING_EMOJI_RE.find(description) {
        icon = EMOJI_RE.find(run.as_str()).map(|m| m.as_str().to_string());
        description = clean_markup(&description[..run.start()]);
    }

    let description = match options.max_sentences {
        Some(n) => first_sentences(description, n),
        None => description.to_string(),
    };

    if description.is_empty() {
        return ExtractedSection {
            icon: icon.unwrap_or_else(|| section.default_icon().to_string()),
            ..ExtractedSection::fallback(section)
        };
    }

    ExtractedSection {
        description,
        icon: icon.unwrap_or_else(|| section.default_icon().to_string()),
        found: true,
    }
}

fn clean_markup(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || c == '*' || c == '#' || c == '-' || c == '_')
}

/// Collapses whitespace and keeps the first `n` sentences.
fn first_sentences(text: &str, n: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if n == 0 {
        return String::new();
    }

    let mut count = 0;
    let mut chars = collapsed.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') && chars.peek().map_or(true, |(_, next)| *next == ' ') {
            count += 1;
            if count == n {
                return collapsed[..i + c.len_utf8()].to_string();
            }
        }
    }
    collapsed
}
