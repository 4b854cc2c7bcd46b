use crate::report::model::{format_case_id, Section, TestCaseRecord};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static CASE_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:TEST CASE ID:|TC-\d+:|### Test Case)").expect("case boundary pattern"));

static PRIORITY_NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\*+|priority:?").expect("priority pattern"));

static TYPE_NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\*+|type:?").expect("type pattern"));

static LEADING_MARKERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\s\-•▸✓\d\.]+").expect("leading marker pattern"));

/// Splits a generated report into test case records.
///
/// Text before the first case marker is treated as a preamble and dropped.
/// Segments that yield neither a name, steps nor expected results are skipped,
/// and the surviving records are numbered `TC-001`, `TC-002`, ... in order.
pub fn parse_test_cases(content: &str) -> Vec<TestCaseRecord> {
    let mut test_cases = vec![];
    for segment in CASE_BOUNDARY.split(content).skip(1) {
        let mut record = parse_segment(segment);
        if record.has_content() {
            record.id = format_case_id(test_cases.len() + 1);
            test_cases.push(record);
        }
    }
    debug!("parsed {} test cases from {} characters", test_cases.len(), content.len());
    test_cases
}

pub fn count_case_markers(content: &str) -> usize {
    CASE_BOUNDARY.find_iter(content).count()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LineKind {
    Name,
    Priority,
    Type,
    Header(Section),
    Content,
}

struct Line<'a> {
    text: &'a str,
    lower: String,
}

impl<'a> Line<'a> {
    fn new(raw: &'a str) -> Self {
        let text = raw.trim();
        Line {
            text,
            lower: text.to_lowercase(),
        }
    }

    fn mentions(&self, needle: &str) -> bool {
        self.lower.contains(needle)
    }

    fn head_mentions(&self, needle: &str, chars: usize) -> bool {
        self.lower.chars().take(chars).collect::<String>().contains(needle)
    }
}

struct HeaderRule {
    kind: LineKind,
    matches: fn(&Line) -> bool,
}

// First match wins. "type:" must stay ahead of the block headers and behind
// priority, otherwise lines such as "TEST TYPE: ..." change meaning.
const HEADER_RULES: [HeaderRule; 8] = [
    HeaderRule {
        kind: LineKind::Name,
        matches: |line| line.mentions("test case name:") || line.text.starts_with("TC-"),
    },
    HeaderRule {
        kind: LineKind::Priority,
        matches: |line| line.mentions("priority:") || line.lower.starts_with("priority"),
    },
    HeaderRule {
        kind: LineKind::Type,
        matches: |line| line.mentions("type:") && !line.head_mentions("test", 10),
    },
    HeaderRule {
        kind: LineKind::Header(Section::Preconditions),
        matches: |line| line.mentions("precondition"),
    },
    HeaderRule {
        kind: LineKind::Header(Section::Steps),
        matches: |line| line.mentions("test step") || line.mentions("steps:"),
    },
    HeaderRule {
        kind: LineKind::Header(Section::Expected),
        matches: |line| line.mentions("expected result") || line.mentions("expected:"),
    },
    HeaderRule {
        kind: LineKind::Header(Section::TestData),
        matches: |line| line.mentions("test data"),
    },
    HeaderRule {
        kind: LineKind::Header(Section::Automation),
        matches: |line| line.mentions("automation"),
    },
];

fn classify(line: &Line) -> LineKind {
    HEADER_RULES
        .iter()
        .find(|rule| (rule.matches)(line))
        .map(|rule| rule.kind)
        .unwrap_or(LineKind::Content)
}

struct RecordDraft<'a> {
    record: TestCaseRecord,
    current: Option<Section>,
    pending: Vec<&'a str>,
}

impl<'a> RecordDraft<'a> {
    fn new() -> Self {
        RecordDraft {
            record: TestCaseRecord::default(),
            current: None,
            pending: vec![],
        }
    }

    fn open(&mut self, section: Section) {
        self.flush();
        self.current = Some(section);
    }

    fn push(&mut self, line: &Line<'a>) {
        if self.current.is_none() || line.text.is_empty() || is_divider(line.text) {
            return;
        }
        if LEADING_MARKERS.replace(line.text, "").trim().is_empty() {
            return;
        }
        self.pending.push(line.text);
    }

    fn flush(&mut self) {
        if let Some(section) = self.current {
            if !self.pending.is_empty() {
                *self.record.block_mut(section) = self.pending.join("\n").trim().to_string();
            }
        }
        self.pending.clear();
    }

    fn finish(mut self) -> TestCaseRecord {
        self.flush();
        self.record
    }
}

fn parse_segment(segment: &str) -> TestCaseRecord {
    let mut draft = RecordDraft::new();
    for raw in segment.trim().split('\n') {
        let line = Line::new(raw);
        match classify(&line) {
            LineKind::Name => {
                draft.record.name = match line.text.split_once(':') {
                    Some((_, rest)) => rest.trim().to_string(),
                    None => line.text.to_string(),
                };
            }
            LineKind::Priority => {
                draft.record.priority = PRIORITY_NOISE.replace_all(line.text, "").trim().to_string();
            }
            LineKind::Type => {
                draft.record.test_type = TYPE_NOISE.replace_all(line.text, "").trim().to_string();
            }
            LineKind::Header(section) => draft.open(section),
            LineKind::Content => draft.push(&line),
        }
    }
    draft.finish()
}

fn is_divider(text: &str) -> bool {
    text.starts_with('─') || text.starts_with('═')
}
