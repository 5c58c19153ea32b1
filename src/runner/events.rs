use super::state::{SuiteSummary, TestResult};
use tokio::sync::broadcast;

/// Suite execution events for coordinated console output
#[derive(Debug, Clone)]
pub enum TestEvent {
    SuiteStarted {
        session_id: String,
        base_url: String,
        case_count: usize,
    },
    CaseStarted {
        name: String,
    },
    CasePassed {
        name: String,
        message: String,
        duration_ms: Option<u64>,
    },
    CaseFailed {
        name: String,
        message: String,
        duration_ms: Option<u64>,
        response_data: Option<serde_json::Value>,
    },
    SuiteFinished {
        summary: SuiteSummary,
        failures: Vec<TestResult>,
    },
}

/// Event emitter for broadcasting suite events
pub struct EventEmitter {
    sender: broadcast::Sender<TestEvent>,
}

impl EventEmitter {
    pub fn new() -> (Self, broadcast::Receiver<TestEvent>) {
        let (sender, receiver) = broadcast::channel(100);
        (Self { sender }, receiver)
    }

    pub fn emit(&self, event: TestEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TestEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }
}

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration as StdDuration;

/// Console event listener for printing real-time updates
pub struct ConsoleEventListener;

impl ConsoleEventListener {
    pub async fn listen(mut receiver: broadcast::Receiver<TestEvent>) {
        use colored::Colorize;
        use indicatif::ProgressDrawTarget;
        use std::io::IsTerminal;

        // Hidden draw target when piped, to keep escape codes out of logs
        let multi = if std::io::stdout().is_terminal() {
            MultiProgress::new()
        } else {
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
        };

        let mut spinner: Option<ProgressBar> = None;

        while let Ok(event) = receiver.recv().await {
            match event {
                TestEvent::SuiteStarted {
                    session_id,
                    base_url,
                    case_count,
                } => {
                    multi
                        .println(format!(
                            "\n{} Suite started: {}",
                            "▶".green().bold(),
                            session_id.cyan()
                        ))
                        .ok();
                    multi
                        .println(format!(
                            "  {} test cases against {}\n",
                            case_count,
                            base_url.cyan()
                        ))
                        .ok();
                }

                TestEvent::CaseStarted { name } => {
                    let pb = multi.add(ProgressBar::new_spinner());
                    let style = ProgressStyle::default_spinner()
                        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
                        .template("  {spinner} {msg}")
                        .unwrap();
                    pb.set_style(style);
                    pb.set_message(format!("{}... ", name.dimmed()));
                    pb.enable_steady_tick(StdDuration::from_millis(100));
                    spinner = Some(pb);
                }

                TestEvent::CasePassed {
                    name,
                    message,
                    duration_ms,
                } => {
                    Self::finish_current(&mut spinner).await;

                    let duration = duration_ms
                        .map(|d| format!(" ({}ms)", d))
                        .unwrap_or_default();
                    println!("  {} {}{}", "✓ PASS:".green().bold(), name, duration.dimmed());
                    if !message.is_empty() {
                        println!("      {}", message.dimmed());
                    }
                }

                TestEvent::CaseFailed {
                    name,
                    message,
                    duration_ms,
                    response_data,
                } => {
                    Self::finish_current(&mut spinner).await;

                    let duration = duration_ms
                        .map(|d| format!(" ({}ms)", d))
                        .unwrap_or_default();
                    println!("  {} {}{}", "✗ FAIL:".red().bold(), name, duration.dimmed());
                    if !message.is_empty() {
                        println!("      {}", message);
                    }
                    if let Some(data) = response_data {
                        println!("      Response: {}", data.to_string().dimmed());
                    }
                }

                TestEvent::SuiteFinished { summary, failures } => {
                    Self::finish_current(&mut spinner).await;

                    // Direct stdout for the summary so MultiProgress can't
                    // overwrite it
                    println!("\n{}", "=".repeat(60));
                    println!("{}", "SUITE SUMMARY".white().bold());
                    println!("{}", "=".repeat(60));
                    println!("  Total tests: {}", summary.total);
                    println!(
                        "  {} passed, {} failed",
                        summary.passed.to_string().green(),
                        summary.failed.to_string().red()
                    );
                    println!("  Success rate: {:.1}%", summary.success_rate);
                    if let Some(duration) = summary.total_duration_ms {
                        println!("  Duration: {}ms", duration);
                    }

                    if !failures.is_empty() {
                        println!("\n{}", "FAILED TESTS:".red().bold());
                        for result in &failures {
                            println!("  - {}: {}", result.name, result.message);
                        }
                    }

                    if summary.failed == 0 {
                        println!("\n{} All tests passed!", "✓".green().bold());
                    } else {
                        println!("\n{} Some tests failed!", "✗".red().bold());
                    }
                }
            }
        }
    }

    async fn finish_current(spinner: &mut Option<ProgressBar>) {
        if let Some(pb) = spinner.take() {
            // Clear the animated line before printing the final one
            pb.finish_and_clear();
            tokio::time::sleep(StdDuration::from_millis(50)).await;
        }
    }
}
