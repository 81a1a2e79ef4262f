//! Text output formatter for human-readable display
//!
//! This module provides:
//! - One block per manifest: header, change count, aligned change table
//! - Package version bumps and workspace alignment notices
//! - A closing summary line

use crate::domain::{InputSummary, ManifestReport, UpdateSummary, VersionUpdate};
use crate::output::{OutputFormatter, Verbosity};
use colored::Colorize;
use std::io::Write;

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether this is a dry-run
    dry_run: bool,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity, dry_run: bool) -> Self {
        Self::with_color(verbosity, dry_run, true)
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, dry_run: bool, color: bool) -> Self {
        Self {
            verbosity,
            dry_run,
            color,
        }
    }

    /// Get the dry-run prefix if applicable
    fn dry_run_prefix(&self) -> String {
        if self.dry_run {
            if self.color {
                format!("{} ", "(dry-run)".cyan())
            } else {
                "(dry-run) ".to_string()
            }
        } else {
            String::new()
        }
    }

    fn header(&self, report: &ManifestReport) -> String {
        let package = match &report.name {
            Some(name) => format!("[{} {}]", name, report.version),
            None => format!("[{}]", report.version),
        };
        let path = report.path.display().to_string();
        if self.color {
            format!("Processing {} {}", path.bold(), package.dimmed())
        } else {
            format!("Processing {} {}", path, package)
        }
    }

    fn format_version_update(
        &self,
        update: &VersionUpdate,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let label = update
            .name
            .clone()
            .unwrap_or_else(|| update.path.display().to_string());
        if self.color {
            writeln!(
                writer,
                "Version of {} {} {} {}",
                label.bold(),
                update.from.dimmed(),
                "->".dimmed(),
                update.to.bright_white().bold()
            )
        } else {
            writeln!(
                writer,
                "Version of {} {} -> {}",
                label, update.from, update.to
            )
        }
    }

    fn format_input(&self, input: &InputSummary, writer: &mut dyn Write) -> std::io::Result<()> {
        for report in &input.manifests {
            self.format_manifest(report, writer)?;
        }
        for update in &input.versions {
            self.format_version_update(update, writer)?;
        }
        if let Some(version) = &input.aligned {
            if self.color {
                writeln!(writer, "Workspaces aligned to {}", version.green())?;
            } else {
                writeln!(writer, "Workspaces aligned to {}", version)?;
            }
        }
        Ok(())
    }

    fn format_summary(&self, summary: &UpdateSummary, writer: &mut dyn Write) -> std::io::Result<()> {
        let prefix = self.dry_run_prefix();
        let changes = summary.total_changes();
        let manifests = summary.manifests().filter(|m| m.has_changes()).count();
        let versions: usize = summary.inputs.iter().map(|i| i.versions.len()).sum();

        if !summary.has_changes() {
            return writeln!(writer, "{}No changes", prefix);
        }

        let mut line = format!(
            "{} dependency {} in {} {}",
            changes,
            if changes == 1 { "change" } else { "changes" },
            manifests,
            if manifests == 1 { "manifest" } else { "manifests" }
        );
        if versions > 0 {
            line.push_str(&format!(
                ", {} version {}",
                versions,
                if versions == 1 { "update" } else { "updates" }
            ));
        }

        if self.color {
            writeln!(writer, "{}{}", prefix, line.green())
        } else {
            writeln!(writer, "{}{}", prefix, line)
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, summary: &UpdateSummary, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.verbosity != Verbosity::Quiet {
            for input in &summary.inputs {
                self.format_input(input, writer)?;
            }
        }
        self.format_summary(summary, writer)
    }

    fn format_manifest(
        &self,
        report: &ManifestReport,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        writeln!(writer, "{}", self.header(report))?;

        let count = report.changes.len();
        if count == 0 {
            if self.color {
                return writeln!(writer, "  {}", "no changes".dimmed());
            }
            return writeln!(writer, "  no changes");
        }
        writeln!(
            writer,
            "  {} {}",
            count,
            if count == 1 { "change" } else { "changes" }
        )?;

        let name_width = report.changes.iter().map(|c| c.name.len()).max().unwrap_or(0);
        let declared_width = report
            .changes
            .iter()
            .map(|c| c.declared.len())
            .max()
            .unwrap_or(0);
        let updated_width = report
            .changes
            .iter()
            .map(|c| c.updated.len())
            .max()
            .unwrap_or(0);

        for change in &report.changes {
            let name = format!("{:width$}", change.name, width = name_width);
            let declared = format!("{:width$}", change.declared, width = declared_width);
            let updated = format!("{:width$}", change.updated, width = updated_width);
            if self.color {
                writeln!(
                    writer,
                    "  {} : {} {} {} {}",
                    name,
                    declared.dimmed(),
                    "->".dimmed(),
                    updated.bright_white().bold(),
                    change.kind.label().dimmed()
                )?;
            } else {
                writeln!(
                    writer,
                    "  {} : {} -> {} {}",
                    name,
                    declared,
                    updated,
                    change.kind.label()
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DependencyChange, DependencyKind};
    use std::path::PathBuf;

    fn render(formatter: &TextFormatter, summary: &UpdateSummary) -> String {
        let mut out = Vec::new();
        formatter.format(summary, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn sample_summary(dry_run: bool) -> UpdateSummary {
        let mut report = ManifestReport::new("package.json", Some("app".to_string()), "1.0.0");
        report.changes.push(DependencyChange::new(
            "lodash",
            "^4.0.0",
            "^4.17.21",
            DependencyKind::Main,
        ));
        report.changes.push(DependencyChange::new(
            "ts",
            "~5.0.0",
            "~5.4.5",
            DependencyKind::Dev,
        ));

        let mut input = InputSummary::new("package.json");
        input.manifests.push(report);
        input.versions.push(VersionUpdate {
            path: PathBuf::from("package.json"),
            name: Some("app".to_string()),
            from: "1.0.0".to_string(),
            to: "1.0.1".to_string(),
        });
        input.changed = true;

        let mut summary = UpdateSummary::new(dry_run);
        summary.add_input(input);
        summary
    }

    #[test]
    fn test_format_changes_table() {
        let formatter = TextFormatter::with_color(Verbosity::Normal, false, false);
        let output = render(&formatter, &sample_summary(false));

        assert_eq!(
            output,
            "Processing package.json [app 1.0.0]\n\
             \x20 2 changes\n\
             \x20 lodash : ^4.0.0 -> ^4.17.21 main\n\
             \x20 ts     : ~5.0.0 -> ~5.4.5   dev\n\
             Version of app 1.0.0 -> 1.0.1\n\
             2 dependency changes in 1 manifest, 1 version update\n"
        );
    }

    #[test]
    fn test_format_no_changes() {
        let formatter = TextFormatter::with_color(Verbosity::Normal, false, false);
        let mut input = InputSummary::new("package.json");
        input
            .manifests
            .push(ManifestReport::new("package.json", None, "0.0.0"));
        let mut summary = UpdateSummary::new(false);
        summary.add_input(input);

        let output = render(&formatter, &summary);
        assert_eq!(
            output,
            "Processing package.json [0.0.0]\n  no changes\nNo changes\n"
        );
    }

    #[test]
    fn test_format_alignment() {
        let formatter = TextFormatter::with_color(Verbosity::Normal, false, false);
        let mut input = InputSummary::new("package.json");
        input.aligned = Some("2.0.0".to_string());
        input.changed = true;
        let mut summary = UpdateSummary::new(false);
        summary.add_input(input);

        let output = render(&formatter, &summary);
        assert!(output.contains("Workspaces aligned to 2.0.0"));
    }

    #[test]
    fn test_format_quiet_dry_run() {
        let formatter = TextFormatter::with_color(Verbosity::Quiet, true, false);
        let output = render(&formatter, &sample_summary(true));
        assert_eq!(
            output,
            "(dry-run) 2 dependency changes in 1 manifest, 1 version update\n"
        );
    }

    #[test]
    fn test_format_with_color_keeps_text() {
        let formatter = TextFormatter::new(Verbosity::Normal, false);
        let output = render(&formatter, &sample_summary(false));
        assert!(output.contains("lodash"));
        assert!(output.contains("changes"));
    }
}
