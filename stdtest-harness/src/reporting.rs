//! Reporting utilities for test results.

use crate::error::{CaseFailure, Error, FragmentNotFound, ProcessError};
use crate::runner::{CaseOutcome, RunSummary};
use crate::testcase::TestCase;
use colored::Colorize;
use std::io::Write;

const OUTPUT_INDENT: usize = 10;
const SEPARATOR: &str = "---------------------------------------------------------------";

/// Writes a human-readable diagnostic for a failed run.
pub fn write_failure<W: Write>(mut writer: W, error: &Error) -> std::io::Result<()> {
    match error {
        Error::ConfigLoad(err) => {
            writeln!(writer, "{} {err}", "error:".bright_red())?;
        }
        Error::CaseFailed { name, failure, .. } => {
            write_case_header(&mut writer, name)?;
            writeln!(writer, "{}", "FAILED.".bright_red())?;

            match failure {
                CaseFailure::Match(not_found) => write_match_failure(&mut writer, not_found)?,
                CaseFailure::Process(err) => write_process_failure(&mut writer, err)?,
            }
        }
    }

    Ok(())
}

fn write_match_failure<W: Write>(
    writer: &mut W,
    not_found: &FragmentNotFound,
) -> std::io::Result<()> {
    let qualifier = if not_found.ordered { " (in order)" } else { "" };

    writeln!(
        writer,
        "      fragment {} {}{qualifier}",
        format!("{:?}", not_found.fragment).cyan(),
        "not found".bright_red()
    )?;

    write_output(writer, "output", &not_found.output)
}

fn write_process_failure<W: Write>(writer: &mut W, err: &ProcessError) -> std::io::Result<()> {
    writeln!(writer, "      {}", err.to_string().bright_red())?;

    if let ProcessError::ExitStatus { output, .. } = err {
        write_output(writer, "output", output)?;
    }

    Ok(())
}

fn write_output<W: Write>(writer: &mut W, label: &str, output: &str) -> std::io::Result<()> {
    writeln!(writer, "          {}", format!("------ {label} ").cyan())?;

    if output.is_empty() {
        writeln!(
            writer,
            "{}",
            indent::indent_all_by(OUTPUT_INDENT, "(empty)".italic().to_string())
        )?;
    } else {
        write!(writer, "{}", indent::indent_all_by(OUTPUT_INDENT, output))?;
        if !output.ends_with('\n') {
            writeln!(writer)?;
        }
    }

    writeln!(writer, "          {}", SEPARATOR.cyan())
}

/// Writes the results of a completed run; per-case lines only when `verbose`.
pub fn write_summary<W: Write>(
    mut writer: W,
    summary: &RunSummary,
    verbose: bool,
) -> std::io::Result<()> {
    if verbose {
        for result in &summary.results {
            write_case_header(&mut writer, &result.name)?;
            match result.outcome {
                CaseOutcome::Passed { duration } => {
                    writeln!(writer, "{} ({duration:?})", "ok.".bright_green())?;
                }
                CaseOutcome::Skipped => writeln!(writer, "{}", "skipped.".cyan())?,
            }
        }
    }

    let skipped = summary.skipped_count();
    let formatted_skip_count = if skipped > 0 {
        skipped.to_string().cyan()
    } else {
        skipped.to_string().green()
    };

    writeln!(
        writer,
        "{} test case(s) ran: {} succeeded, {} skipped.",
        summary.passed_count(),
        summary.passed_count().to_string().green(),
        formatted_skip_count,
    )?;

    if verbose {
        writeln!(writer, "duration: {:?}", summary.duration)?;
    }

    Ok(())
}

/// Writes the names of the given cases, one per line.
pub fn write_case_list<'a, W: Write>(
    mut writer: W,
    cases: impl IntoIterator<Item = &'a TestCase>,
) -> std::io::Result<()> {
    for case in cases {
        writeln!(writer, "{}: test", case.name)?;
    }

    Ok(())
}

fn write_case_header<W: Write>(writer: &mut W, name: &str) -> std::io::Result<()> {
    let name = if name.is_empty() { "(unnamed)" } else { name };
    write!(writer, "* {}: [{}]... ", "Test case".bright_yellow(), name.italic())
}

#[cfg(test)]
#[allow(clippy::panic_in_result_fn)]
mod tests {
    use super::*;
    use crate::runner::TestCaseResult;
    use std::time::Duration;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> std::io::Result<()>) -> anyhow::Result<String> {
        colored::control::set_override(false);
        let mut buf = vec![];
        f(&mut buf)?;
        Ok(String::from_utf8(buf)?)
    }

    #[test]
    fn match_failure_names_case_fragment_and_output() -> anyhow::Result<()> {
        let error = Error::CaseFailed {
            name: "sum".into(),
            index: 0,
            failure: CaseFailure::Match(FragmentNotFound {
                fragment: "15".into(),
                output: "1 2 3 4 5".into(),
                ordered: false,
            }),
        };

        let text = render(|buf| write_failure(buf, &error))?;

        assert!(text.contains("[sum]... FAILED."));
        assert!(text.contains("fragment \"15\" not found"));
        assert!(text.contains("          1 2 3 4 5\n"));

        Ok(())
    }

    #[test]
    fn timeout_failure_is_reported() -> anyhow::Result<()> {
        let error = Error::CaseFailed {
            name: "hang".into(),
            index: 2,
            failure: CaseFailure::Process(ProcessError::Timeout(Duration::from_secs(1))),
        };

        let text = render(|buf| write_failure(buf, &error))?;

        assert!(text.contains("[hang]... FAILED."));
        assert!(text.contains("timed out"));

        Ok(())
    }

    #[test]
    fn summary_counts() -> anyhow::Result<()> {
        let summary = RunSummary {
            results: vec![
                TestCaseResult {
                    name: "a".into(),
                    outcome: CaseOutcome::Passed {
                        duration: Duration::from_millis(5),
                    },
                },
                TestCaseResult {
                    name: "b".into(),
                    outcome: CaseOutcome::Skipped,
                },
            ],
            duration: Duration::from_millis(5),
        };

        let text = render(|buf| write_summary(buf, &summary, true))?;

        assert!(text.contains("[a]... ok."));
        assert!(text.contains("[b]... skipped."));
        assert!(text.contains("1 test case(s) ran: 1 succeeded, 1 skipped."));

        Ok(())
    }
}
