use crate::generation::model::{GenerationRequest, InputMode};
use crate::report::model::Section;

const MAJOR_DIVIDER: &str = "══════════════════════════════════════════════════════════════════════════════";
const CASE_DIVIDER: &str = "──────────────────────────────────────────────────────────────────────────────";

const IMAGE_CHECKLIST: [&str; 6] = [
    "UI elements (buttons, text fields, lists, dropdowns, etc.)",
    "Navigation patterns and screen flow indicators",
    "User interaction points and touch targets",
    "Visual states and feedback indicators",
    "Relationships between different screens (if multiple images)",
    "Potential edge cases based on visible UI elements",
];

const FORMATTING_RULES: [&str; 8] = [
    "Use ══════ for major section dividers",
    "Use ────── for test case separators",
    "Use ▸ for section headers within test case",
    "Use ✓ for expected results",
    "Use - for list items",
    "Use Step 1:, Step 2: etc for numbered steps",
    "Keep each section clearly labeled and indented",
    "Add blank lines between sections for readability",
];

const COVERAGE: [&str; 6] = [
    "Positive scenarios (happy path)",
    "Negative scenarios (error handling, invalid inputs)",
    "Boundary conditions (min/max values, empty states)",
    "UI/UX validation (layout, responsiveness)",
    "Edge cases (network issues, interruptions)",
    "Security considerations (input validation)",
];

const ANDROID_NOTES: [&str; 4] = [
    "Back button behavior",
    "App lifecycle (background/foreground)",
    "Different screen sizes",
    "Accessibility (TalkBack, font scaling)",
];

/// Builds the instruction text sent along with the attachments.
///
/// The mode block only appears when the inputs that mode relies on are
/// present, so a document-mode request without a document falls back to the
/// generic instructions.
pub fn build_prompt(request: &GenerationRequest) -> String {
    let mut prompt = String::new();
    prompt.push_str("You are an expert Android QA Engineer and Test Automation Specialist.\n");
    prompt.push_str("Your task is to generate comprehensive test cases for an Android mobile application.\n\n");
    prompt.push_str(&format!("**Test Type Requested:** {}\n\n", request.test_type));
    prompt.push_str(&format!("**Application Context:** {}\n\n", request.app_context_or_default()));
    prompt.push_str(&mode_block(request));
    prompt.push_str(&format_block());
    prompt
}

fn mode_block(request: &GenerationRequest) -> String {
    let image_count = request.active_images().len();
    let document = request.active_document();
    match (request.input_mode, image_count > 0, document) {
        (InputMode::Combined, true, Some(document)) => {
            let mut block = String::from("**Input Mode:** COMBINED (Images + Document)\n\n");
            block.push_str("You have been provided with:\n");
            block.push_str(&format!("1. {} screenshot(s)/image(s) of the Android app screens\n", image_count));
            block.push_str("2. A document with additional specifications/requirements\n\n");
            block.push_str(
                "Analyze ALL images and the document content together to generate comprehensive test cases. \
                 The images show the visual UI and user flow while the document provides context, \
                 requirements, and specifications.\n\n",
            );
            block.push_str("**Document Content:**\n");
            block.push_str(&document.content);
            block.push_str("\n\n");
            block
        }
        (InputMode::Image, true, _) => {
            let mut block = format!("**Input Mode:** IMAGE ONLY ({} image(s) provided)\n\n", image_count);
            block.push_str(&format!(
                "Analyze the provided {} screenshot(s)/image(s) to identify:\n",
                image_count
            ));
            for (i, item) in IMAGE_CHECKLIST.iter().enumerate() {
                block.push_str(&format!("{}. {}\n", i + 1, item));
            }
            block.push('\n');
            block
        }
        (InputMode::Document, _, Some(document)) => {
            let mut block = String::from("**Input Mode:** DOCUMENT ONLY\n\n");
            block.push_str("Analyze the provided document containing specifications/requirements:\n\n");
            block.push_str("**Document Content:**\n");
            block.push_str(&document.content);
            block.push_str("\n\n");
            block
        }
        _ => String::new(),
    }
}

fn format_block() -> String {
    let mut block = String::from("\n**Generate Test Cases in this CLEAN, EASY-TO-READ format:**\n\n");
    block.push_str(&format!("{}\n", MAJOR_DIVIDER));
    block.push_str("                         TEST SUITE: [Feature Name]\n");
    block.push_str(&format!("{}\n\n", MAJOR_DIVIDER));
    block.push_str("For EACH test case, use this EXACT format:\n\n");
    block.push_str(&format!("{}\n", CASE_DIVIDER));
    block.push_str("TEST CASE ID:     TC-001\n");
    block.push_str("TEST CASE NAME:   [Clear descriptive title]\n");
    block.push_str(&format!("{}\n\n", CASE_DIVIDER));
    block.push_str("    PRIORITY:       [High / Medium / Low]\n");
    block.push_str("    TYPE:           [Functional / UI / Security / Performance]\n");
    for section in Section::ALL {
        block.push_str(&format!("\n    ▸ {}:\n", section.heading()));
        for line in section_sample(section) {
            block.push_str(&format!("      {}\n", line));
        }
    }
    block.push_str(&format!("\n{}\n\n\n", MAJOR_DIVIDER));

    block.push_str("FORMATTING RULES:\n");
    for (i, rule) in FORMATTING_RULES.iter().enumerate() {
        block.push_str(&format!("{}. {}\n", i + 1, rule));
    }
    block.push_str("\nGenerate 10-15 comprehensive test cases covering:\n");
    for item in COVERAGE {
        block.push_str(&format!("- {}\n", item));
    }
    block.push_str("\nInclude Android-specific considerations:\n");
    for item in ANDROID_NOTES {
        block.push_str(&format!("- {}\n", item));
    }
    block
}

fn section_sample(section: Section) -> &'static [&'static str] {
    match section {
        Section::Preconditions => { &["- Condition 1", "- Condition 2"] }
        Section::Steps => {
            &[
                "Step 1:  [First action to perform]",
                "Step 2:  [Second action to perform]",
                "Step 3:  [Third action to perform]",
            ]
        }
        Section::Expected => { &["✓ Result 1", "✓ Result 2", "✓ Result 3"] }
        Section::TestData => { &["[Any input data, test values, or N/A]"] }
        Section::Automation => { &["[Espresso/Appium hints, element IDs, locators]"] }
    }
}
