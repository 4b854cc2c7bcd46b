use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Eq, PartialEq, Debug, Default)]
pub struct TestCaseRecord {
    pub id: String,
    pub name: String,
    pub priority: String,
    #[serde(rename = "type")]
    pub test_type: String,
    pub preconditions: String,
    pub steps: String,
    pub expected: String,
    pub test_data: String,
    pub automation: String,
}

impl TestCaseRecord {
    /// Only records carrying a name, steps or expected results are worth exporting.
    pub fn has_content(&self) -> bool {
        !self.name.is_empty() || !self.steps.is_empty() || !self.expected.is_empty()
    }

    pub fn block(&self, section: Section) -> &str {
        match section {
            Section::Preconditions => { &self.preconditions }
            Section::Steps => { &self.steps }
            Section::Expected => { &self.expected }
            Section::TestData => { &self.test_data }
            Section::Automation => { &self.automation }
        }
    }

    /// Cell values in export column order.
    pub fn columns(&self) -> [&str; 9] {
        let [preconditions, steps, expected, test_data, automation] = Section::ALL.map(|section| self.block(section));
        [
            self.id.as_str(),
            self.name.as_str(),
            self.priority.as_str(),
            self.test_type.as_str(),
            preconditions,
            steps,
            expected,
            test_data,
            automation,
        ]
    }

    pub fn block_mut(&mut self, section: Section) -> &mut String {
        match section {
            Section::Preconditions => { &mut self.preconditions }
            Section::Steps => { &mut self.steps }
            Section::Expected => { &mut self.expected }
            Section::TestData => { &mut self.test_data }
            Section::Automation => { &mut self.automation }
        }
    }
}

pub fn format_case_id(ordinal: usize) -> String {
    format!("TC-{:03}", ordinal)
}

/// Multi-line fields of a test case. Name, priority and type are single-line
/// and never become the current section.
#[derive(Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub enum Section {
    Preconditions,
    Steps,
    Expected,
    TestData,
    Automation,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Preconditions,
        Section::Steps,
        Section::Expected,
        Section::TestData,
        Section::Automation,
    ];

    pub fn heading(&self) -> &'static str {
        match self {
            Section::Preconditions => { "PRECONDITIONS" }
            Section::Steps => { "TEST STEPS" }
            Section::Expected => { "EXPECTED RESULTS" }
            Section::TestData => { "TEST DATA" }
            Section::Automation => { "AUTOMATION NOTES" }
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Eq, PartialEq, Debug)]
pub struct ParsedReport {
    pub test_cases: Vec<TestCaseRecord>,
    pub test_case_count: usize,
}

impl ParsedReport {
    pub fn new(test_cases: Vec<TestCaseRecord>) -> Self {
        let test_case_count = test_cases.len();
        Self {
            test_cases,
            test_case_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_follow_export_order() {
        let record = TestCaseRecord {
            id: "TC-003".to_string(),
            name: "Rotate screen".to_string(),
            priority: "Low".to_string(),
            test_type: "UI".to_string(),
            preconditions: "App open".to_string(),
            steps: "Step 1: Rotate".to_string(),
            expected: "Layout adapts".to_string(),
            test_data: "N/A".to_string(),
            automation: "UiAutomator".to_string(),
        };
        assert_eq!(
            record.columns(),
            [
                "TC-003",
                "Rotate screen",
                "Low",
                "UI",
                "App open",
                "Step 1: Rotate",
                "Layout adapts",
                "N/A",
                "UiAutomator"
            ]
        );
    }

    #[test]
    fn case_ids_are_zero_padded() {
        assert_eq!(format_case_id(7), "TC-007");
        assert_eq!(format_case_id(1234), "TC-1234");
    }
}
