//! Console output formatter for session snapshots

use colored::Colorize;
use shortlist_application::{RunCommandError, SessionView};
use shortlist_domain::{OutputFormat, Phase, Rejection};

/// Formats session snapshots for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Render `view` in the requested format
    pub fn render(view: &SessionView, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => Self::format(view),
            OutputFormat::Summary => Self::format_summary(view),
            OutputFormat::Json => Self::format_json(view),
        }
    }

    /// Format the complete session
    pub fn format(view: &SessionView) -> String {
        let session = &view.session;
        let mut output = String::new();

        output.push_str(&Self::header("Shortlist"));
        output.push('\n');
        output.push_str(&Self::status_lines(view));

        output.push_str(&Self::section_header("Suggestions"));
        if session.submissions.is_empty() {
            output.push_str(&format!("{}\n", "  (none yet)".dimmed()));
        } else {
            for (participant, candidate) in &session.submissions {
                output.push_str(&format!("  {} → {}\n", participant.yellow(), candidate));
            }
            output.push_str(&format!(
                "\n{} {}\n",
                "Candidate pool:".cyan().bold(),
                view.candidate_pool.join(", ")
            ));
        }

        if session.phase == Phase::Voting {
            output.push_str(&Self::section_header("Final Votes"));
            if session.final_votes.is_empty() {
                output.push_str(&format!("{}\n", "  (nobody has voted yet)".dimmed()));
            } else {
                for (participant, choice) in &session.final_votes {
                    output.push_str(&format!("  {} → {}\n", participant.yellow(), choice));
                }
            }
            output.push_str(&Self::section_header("Tally"));
            output.push_str(&Self::tally_lines(view));
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(view: &SessionView) -> String {
        serde_json::to_string_pretty(view).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format phase, finalists and tally only (concise output)
    pub fn format_summary(view: &SessionView) -> String {
        let mut output = Self::status_lines(view);

        match view.session.phase {
            Phase::Closed => {
                output.push_str(&format!(
                    "{}\n",
                    "No round in progress. Start one with `shortlist open`.".dimmed()
                ));
            }
            Phase::Collecting => {
                output.push_str(&format!(
                    "{} {} from {} participant(s)\n",
                    "Candidates:".cyan().bold(),
                    view.candidate_pool.len(),
                    view.session.submissions.len()
                ));
            }
            Phase::Voting => output.push_str(&Self::tally_lines(view)),
        }

        output
    }

    /// Format a failed command
    pub fn format_error(error: &RunCommandError) -> String {
        let label = match error {
            RunCommandError::Rejected(_) => "Rejected".yellow().bold(),
            _ => "Failed".red().bold(),
        };
        let hint = match error.rejection() {
            Some(Rejection::InsufficientCandidates(_)) => {
                "\nAsk more people to suggest something different."
            }
            Some(Rejection::InvalidChoice(_)) => "\nRun `shortlist show` to see the finalists.",
            _ => "",
        };
        format!("{} [{}] {}{}", label, error.kind(), error, hint)
    }

    /// Format a failed command as JSON
    pub fn format_error_json(error: &RunCommandError) -> String {
        serde_json::to_string_pretty(&serde_json::json!({
            "error": {
                "kind": error.kind(),
                "message": error.to_string(),
            }
        }))
        .unwrap_or_else(|_| "{}".to_string())
    }

    fn status_lines(view: &SessionView) -> String {
        let session = &view.session;
        let mut output = format!(
            "{} {}\n",
            "Phase:".cyan().bold(),
            session.phase.display_name()
        );
        if let Some(date) = &session.target_date {
            output.push_str(&format!("{} {}\n", "Date:".cyan().bold(), date));
        }
        output
    }

    fn tally_lines(view: &SessionView) -> String {
        let leaders = view.tally.leaders();
        let mut output = String::new();
        for row in &view.tally.rows {
            let bar = "█".repeat(row.votes);
            let name = if leaders.contains(&row.finalist.as_str()) {
                row.finalist.green().bold()
            } else {
                row.finalist.normal()
            };
            output.push_str(&format!("  {:<24} {:>2} {}\n", name, row.votes, bar.green()));
        }
        output.push_str(&format!(
            "{} {}\n",
            "Total votes:".cyan().bold(),
            view.tally.total_votes
        ));
        output
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}
