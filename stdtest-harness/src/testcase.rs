//! Test case definitions and config schema.

use crate::error::ConfigLoadError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A single test case.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TestCase {
    /// Name of the test case; used only for diagnostics.
    pub name: String,

    /// Input to provide via stdin.
    #[serde(default)]
    pub input: String,

    /// Fragments that must each appear in the target's combined output.
    #[serde(default, rename = "output", alias = "expected_fragments")]
    pub expected_fragments: Vec<String>,

    /// Whether the fragments must appear in the order listed.
    #[serde(default, rename = "is_output_ordered", alias = "ordered")]
    pub ordered: bool,

    /// Command-line arguments to append for this case only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,

    /// Whether to skip this test.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub skip: bool,

    /// Timeout for this test in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_in_seconds: Option<u64>,
}

impl TestCase {
    /// Creates a test case with the given name, input and expected fragments.
    pub fn new<I, S>(name: impl Into<String>, input: impl Into<String>, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            input: input.into(),
            expected_fragments: fragments.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Requires the expected fragments to appear in order.
    #[must_use]
    pub const fn ordered(mut self) -> Self {
        self.ordered = true;
        self
    }
}

/// Config file formats understood by [`TestSuite::load`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConfigFormat {
    /// A JSON array of test cases.
    #[default]
    Json,
    /// A YAML sequence of test cases.
    Yaml,
}

impl ConfigFormat {
    /// Picks a format from the file extension; anything not YAML is read as JSON.
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

/// An ordered sequence of test cases, run in declaration order.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct TestSuite {
    /// The test cases in this suite.
    pub cases: Vec<TestCase>,
}

impl TestSuite {
    /// Loads a suite from the file at `path`, choosing the format by extension.
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let file = std::fs::File::open(path).map_err(|source| ConfigLoadError::Read {
            path: path.to_owned(),
            source,
        })?;

        let suite = Self::from_reader(std::io::BufReader::new(file), ConfigFormat::for_path(path))?;

        tracing::debug!(
            target: "runner",
            "loaded {} test case(s) from {}",
            suite.len(),
            path.display()
        );

        Ok(suite)
    }

    /// Deserializes a suite from a byte stream.
    pub fn from_reader(
        reader: impl std::io::Read,
        format: ConfigFormat,
    ) -> Result<Self, ConfigLoadError> {
        let suite = match format {
            ConfigFormat::Json => serde_json::from_reader(reader)?,
            ConfigFormat::Yaml => serde_yaml::from_reader(reader)?,
        };

        Ok(suite)
    }

    /// Returns the number of cases in the suite.
    pub const fn len(&self) -> usize {
        self.cases.len()
    }

    /// Returns whether the suite has no cases.
    pub const fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Iterates over the cases in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, TestCase> {
        self.cases.iter()
    }
}

impl From<Vec<TestCase>> for TestSuite {
    fn from(cases: Vec<TestCase>) -> Self {
        Self { cases }
    }
}

impl<'a> IntoIterator for &'a TestSuite {
    type Item = &'a TestCase;
    type IntoIter = std::slice::Iter<'a, TestCase>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
#[allow(clippy::panic_in_result_fn)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_json_with_ordering_flag() -> anyhow::Result<()> {
        let content = br#"
[{
    "name": "test",
    "input": "1 2 3",
    "output": ["4", "5", "6"],
    "is_output_ordered": true
}]"#;

        let suite = TestSuite::from_reader(&content[..], ConfigFormat::Json)?;

        assert_eq!(
            suite,
            TestSuite::from(vec![TestCase::new("test", "1 2 3", ["4", "5", "6"]).ordered()])
        );

        Ok(())
    }

    #[test]
    fn optional_fields_default() -> anyhow::Result<()> {
        let suite = TestSuite::from_reader(&br#"[{"name": "bare"}]"#[..], ConfigFormat::Json)?;

        let case = &suite.cases[0];
        assert!(case.input.is_empty());
        assert!(case.expected_fragments.is_empty());
        assert!(!case.ordered);
        assert!(!case.skip);
        assert_eq!(case.timeout_in_seconds, None);

        Ok(())
    }

    #[test]
    fn parses_yaml_with_aliases() -> anyhow::Result<()> {
        let content = "
- name: sum
  input: 1 2 3 4 5
  expected_fragments: ['15']
- name: sequence
  ordered: true
  output: [a, b]
  timeout_in_seconds: 3
";

        let suite = TestSuite::from_reader(content.as_bytes(), ConfigFormat::Yaml)?;

        assert_eq!(suite.len(), 2);
        assert_eq!(suite.cases[0].expected_fragments, vec!["15"]);
        assert!(suite.cases[1].ordered);
        assert_eq!(suite.cases[1].timeout_in_seconds, Some(3));

        Ok(())
    }

    #[test]
    fn rejects_truncated_json() {
        let result =
            TestSuite::from_reader(&br#"[{"name": "x", "input": "#[..], ConfigFormat::Json);
        assert!(matches!(result, Err(ConfigLoadError::Json(_))));
    }

    #[test]
    fn rejects_wrong_shape() {
        let result = TestSuite::from_reader(&br#"{"name": "x"}"#[..], ConfigFormat::Json);
        assert!(matches!(result, Err(ConfigLoadError::Json(_))));

        let result = TestSuite::from_reader(
            &br#"[{"name": "x", "output": "15"}]"#[..],
            ConfigFormat::Json,
        );
        assert!(matches!(result, Err(ConfigLoadError::Json(_))));
    }

    #[test]
    fn rejects_unknown_fields() {
        let result =
            TestSuite::from_reader(&br#"[{"name": "x", "ouput": []}]"#[..], ConfigFormat::Json);
        assert!(matches!(result, Err(ConfigLoadError::Json(_))));
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(ConfigFormat::for_path(Path::new("a.json")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::for_path(Path::new("a.YML")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::for_path(Path::new("a.yaml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::for_path(Path::new("config")), ConfigFormat::Json);
    }
}
