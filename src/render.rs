//! Terminal rendering of checkup reports.

use std::io::{self, Write};

use console::Style;

use crate::checkup::{Catalog, Report, ResourceRecord, Severity};

const INDENT: &str = "    ";

/// `1 occurrence`, `3 occurrences`
pub fn occurrences(n: usize) -> String {
    if n == 1 {
        "1 occurrence".to_string()
    } else {
        format!("{n} occurrences")
    }
}

/// Left column of a resource line, without styling.
fn resource_label(record: &ResourceRecord) -> String {
    if record.detail.is_empty() {
        record.resource_name.clone()
    } else {
        format!("{}:", record.resource_name)
    }
}

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Colour when stdout supports it and `NO_COLOR`/`CLICOLOR` allow it.
    pub fn for_stdout() -> Self {
        Self::new(console::colors_enabled())
    }

    fn style(&self) -> Style {
        Style::new().force_styling(self.color)
    }

    fn bold(&self) -> Style {
        self.style().bold()
    }

    fn severity_style(&self, severity: Severity) -> Style {
        match severity {
            Severity::Error => self.style().red().bright(),
            Severity::Warning => self.style().yellow().bright(),
        }
    }

    /// Progress prefix written before the scan starts.
    pub fn begin<W: Write>(&self, w: &mut W) -> io::Result<()> {
        write!(w, "{}", self.bold().apply_to("Checking for problems ... "))?;
        w.flush()
    }

    /// Completes the progress line and writes the report.
    pub fn render<W: Write>(&self, report: &Report, w: &mut W) -> io::Result<()> {
        writeln!(w, "{}", self.bold().apply_to("done"))?;
        if report.is_clean() {
            writeln!(w, "Everything looks good 🎉")?;
            return Ok(());
        }

        writeln!(w)?;
        writeln!(
            w,
            "{}",
            self.bold()
                .apply_to("⛔️  Problems found (format: namespace/name <problem>):")
        )?;

        let index = report.by_severity();
        for severity in Severity::ALL {
            for group in index.bucket(severity) {
                let Some(problem) = report.problem(group.problem_id) else {
                    continue;
                };

                writeln!(w)?;
                writeln!(
                    w,
                    "{INDENT}{} {}",
                    self.severity_style(severity)
                        .apply_to(format!("{}: {}", problem.id, problem.short_description)),
                    self.bold()
                        .apply_to(format!("[{}]", occurrences(group.records.len()))),
                )?;
                self.write_records(&group.records, w)?;
            }
        }

        writeln!(w)?;
        writeln!(w, "{}", self.bold().apply_to("💡  More information/help:"))?;
        let groups = report.by_problem();
        let width = groups.iter().map(|g| g.problem_id.len() + 1).max().unwrap_or(0);
        for group in &groups {
            let Some(problem) = report.problem(group.problem_id) else {
                continue;
            };
            let label = format!("{}:", problem.id);
            writeln!(
                w,
                "{INDENT}- {}{} {}",
                self.bold().apply_to(&label),
                " ".repeat(width - label.len()),
                self.style().underlined().apply_to(problem.help_url()),
            )?;
        }
        Ok(())
    }

    /// Resource lines with details aligned in one column.
    fn write_records<W: Write>(&self, records: &[&ResourceRecord], w: &mut W) -> io::Result<()> {
        let width = records
            .iter()
            .filter(|r| !r.detail.is_empty())
            .map(|r| resource_label(r).len())
            .max()
            .unwrap_or(0);

        for record in records {
            let mut line = format!("{INDENT}- {}", self.bold().apply_to(&record.resource_name));
            if !record.detail.is_empty() {
                let pad = width - resource_label(record).len();
                line.push_str(&format!(":{} {}", " ".repeat(pad), record.detail));
            }
            if !record.owner.is_empty() {
                line.push_str(&format!(" (owned by {})", record.owner));
            }
            writeln!(w, "{line}")?;
        }
        Ok(())
    }

    /// Table of every problem in `catalog`.
    pub fn render_catalog<W: Write>(&self, catalog: &Catalog, w: &mut W) -> io::Result<()> {
        let width = catalog.iter().map(|p| p.id.len()).max().unwrap_or(0);
        for problem in catalog {
            writeln!(
                w,
                "{}{} {:<4} {}",
                self.bold().apply_to(problem.id),
                " ".repeat(width - problem.id.len()),
                problem.kind(),
                problem.short_description,
            )?;
            writeln!(
                w,
                "{}{}",
                " ".repeat(width + 6),
                self.style().underlined().apply_to(problem.help_url())
            )?;
        }
        Ok(())
    }
}
