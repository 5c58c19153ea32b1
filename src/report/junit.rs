use super::types::SuiteResults;
use anyhow::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use std::io::Cursor;
use std::path::Path;

/// Generate JUnit XML report string from SuiteResults
pub fn generate_junit_xml(results: &SuiteResults) -> Result<String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    // Write XML declaration
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let total_tests = results.results.len();
    let failures = results.results.iter().filter(|r| !r.passed).count();
    let total_duration: u64 = results
        .results
        .iter()
        .map(|r| r.duration_ms.unwrap_or(0))
        .sum();

    // <testsuites>
    let mut suites_start = BytesStart::new("testsuites");
    suites_start.push_attribute(("name", "smoke-tester-run"));
    suites_start.push_attribute(("tests", total_tests.to_string().as_str()));
    suites_start.push_attribute(("failures", failures.to_string().as_str()));
    suites_start.push_attribute((
        "time",
        (total_duration as f64 / 1000.0).to_string().as_str(),
    ));
    writer.write_event(Event::Start(suites_start))?;

    // Single <testsuite> for the run; the suite has one fixed case list
    let mut suite_start = BytesStart::new("testsuite");
    suite_start.push_attribute(("name", "default"));
    suite_start.push_attribute(("tests", total_tests.to_string().as_str()));
    suite_start.push_attribute(("failures", failures.to_string().as_str()));
    suite_start.push_attribute(("id", results.session_id.as_str()));
    suite_start.push_attribute((
        "time",
        (total_duration as f64 / 1000.0).to_string().as_str(),
    ));
    suite_start.push_attribute(("timestamp", results.generated_at.as_str()));
    writer.write_event(Event::Start(suite_start))?;

    for result in &results.results {
        write_test_case(&mut writer, result)?;
    }

    writer.write_event(Event::End(BytesEnd::new("testsuite")))?;
    writer.write_event(Event::End(BytesEnd::new("testsuites")))?;

    let result = writer.into_inner().into_inner();
    let xml = String::from_utf8(result)?;
    Ok(xml)
}

fn write_test_case<W: std::io::Write>(
    writer: &mut Writer<W>,
    result: &crate::runner::state::TestResult,
) -> Result<()> {
    let mut case_start = BytesStart::new("testcase");
    let classname = format!(
        "smoke_tester.{}",
        result.name.to_lowercase().replace([' ', '-'], "_")
    );

    case_start.push_attribute(("name", result.name.as_str()));
    case_start.push_attribute(("classname", classname.as_str()));
    case_start.push_attribute((
        "time",
        (result.duration_ms.unwrap_or(0) as f64 / 1000.0)
            .to_string()
            .as_str(),
    ));

    writer.write_event(Event::Start(case_start))?;

    if !result.passed {
        let mut fail_start = BytesStart::new("failure");
        fail_start.push_attribute(("message", result.message.as_str()));
        fail_start.push_attribute(("type", "AssertionError"));
        writer.write_event(Event::Start(fail_start))?;

        writer.write_event(Event::Text(quick_xml::events::BytesText::new(
            &result.message,
        )))?;

        writer.write_event(Event::End(BytesEnd::new("failure")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("testcase")))?;
    Ok(())
}

/// Generate a JUnit report to a file or stdout
pub fn generate(results: &SuiteResults, output: Option<&Path>) -> Result<()> {
    let xml = generate_junit_xml(results)?;

    if let Some(path) = output {
        std::fs::write(path, xml)?;
        println!("JUnit report saved to: {}", path.display());
    } else {
        println!("{}", xml);
    }

    Ok(())
}

/// Write report to the output directory
pub fn write_report(results: &SuiteResults, output_dir: &Path) -> Result<()> {
    let xml = generate_junit_xml(results)?;
    let path = output_dir.join("junit.xml");
    std::fs::write(&path, xml)?;
    println!("    Generated JUnit report: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::state::{SuiteSummary, TestResult};

    #[test]
    fn test_generate_junit_xml() {
        let results = SuiteResults {
            session_id: "test-session".to_string(),
            results: vec![
                TestResult {
                    name: "Basic API Connectivity".to_string(),
                    passed: true,
                    message: "Successfully connected".to_string(),
                    response_data: None,
                    duration_ms: Some(120),
                },
                TestResult {
                    name: "CORS Configuration".to_string(),
                    passed: false,
                    message: "Access-Control-Allow-Origin header missing".to_string(),
                    response_data: None,
                    duration_ms: Some(80),
                },
            ],
            summary: SuiteSummary {
                session_id: "test-session".to_string(),
                total: 2,
                passed: 1,
                failed: 1,
                success_rate: 50.0,
                total_duration_ms: Some(200),
            },
            generated_at: "2024-05-01 12:00:00".to_string(),
        };

        let xml = generate_junit_xml(&results).expect("Failed to generate XML");

        assert!(xml.contains(r#"<testsuites name="smoke-tester-run""#));
        assert!(xml.contains(r#"tests="2""#));
        assert!(xml.contains(r#"failures="1""#));
        assert!(xml.contains(r#"<testcase name="Basic API Connectivity""#));
        assert!(xml.contains(r#"message="Access-Control-Allow-Origin header missing""#));
    }

    #[test]
    fn test_passing_only_run_has_no_failure_elements() {
        let results = SuiteResults {
            session_id: "s".to_string(),
            results: vec![TestResult {
                name: "Get Status Checks".to_string(),
                passed: true,
                message: String::new(),
                response_data: None,
                duration_ms: None,
            }],
            summary: SuiteSummary {
                session_id: "s".to_string(),
                total: 1,
                passed: 1,
                failed: 0,
                success_rate: 100.0,
                total_duration_ms: None,
            },
            generated_at: "2024-05-01 12:00:00".to_string(),
        };

        let xml = generate_junit_xml(&results).unwrap();
        assert!(!xml.contains("<failure"));
        assert!(xml.contains(r#"failures="0""#));
    }
}
