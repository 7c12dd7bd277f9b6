//! Plain-text rendering of [`TaskOutput`] for the terminal.

use std::fmt::Write;

use crate::router::{Block, TaskOutput};

/// Widest bar drawn in a breakdown.
const BAR_WIDTH: usize = 30;

pub fn render_text(output: &TaskOutput) -> String {
    let mut out = String::new();
    for block in &output.blocks {
        match block {
            Block::Heading(h) => {
                let _ = writeln!(out, "## {h}\n");
            }
            Block::Preview { title, table } => {
                let _ = writeln!(out, "{title}:");
                let _ = writeln!(out, "{}\n", table.render(table.len()));
            }
            Block::Breakdown { dimension, counts } => {
                let _ = writeln!(out, "Opportunities by {dimension}");
                render_bars(&mut out, counts);
                out.push('\n');
            }
            Block::Fields(fields) => {
                for (label, value) in fields {
                    let _ = writeln!(out, "{label}: {value}");
                }
                out.push('\n');
            }
            Block::Narrative { title, text } => {
                let _ = writeln!(out, "### {title}:\n{text}\n");
            }
            Block::Notice(n) => {
                let _ = writeln!(out, "note: {n}\n");
            }
        }
    }
    let _ = write!(
        out,
        "[{} | invocation {} | {}]",
        output.task,
        output.invocation_id,
        output.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    out
}

fn render_bars(out: &mut String, counts: &[(String, usize)]) {
    let label_width = counts.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
    let max = counts.iter().map(|(_, c)| *c).max().unwrap_or(0);
    for (label, count) in counts {
        let len = if max == 0 { 0 } else { (count * BAR_WIDTH).div_ceil(max) };
        let _ = writeln!(out, "  {label:<label_width$}  {count:>5}  {}", "#".repeat(len));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tests::table;
    use crate::task::TaskId;
    use chrono::Utc;
    use uuid::Uuid;

    fn output(blocks: Vec<Block>) -> TaskOutput {
        TaskOutput { task: TaskId::KpiDashboard, invocation_id: Uuid::nil(), generated_at: Utc::now(), blocks }
    }

    #[test]
    fn renders_every_block_kind() {
        let text = render_text(&output(vec![
            Block::Heading("KPI".into()),
            Block::Preview { title: "Data Preview".into(), table: table(&["Region"], &[&["North"]]) },
            Block::Breakdown { dimension: "Region".into(), counts: vec![("North".into(), 4), ("South".into(), 2)] },
            Block::Fields(vec![("Campaign Name".into(), "Spring".into())]),
            Block::Narrative { title: "KPI Insights".into(), text: "All good.".into() },
            Block::Notice("simulated".into()),
        ]));
        assert!(text.contains("## KPI"));
        assert!(text.contains("Data Preview:"));
        assert!(text.contains("Opportunities by Region"));
        assert!(text.contains("Campaign Name: Spring"));
        assert!(text.contains("### KPI Insights:\nAll good."));
        assert!(text.contains("note: simulated"));
        assert!(text.ends_with(']'));
        assert!(text.contains("KPIDashboard | invocation 00000000-0000-0000-0000-000000000000"));
    }

    #[test]
    fn bars_scale_to_largest_count() {
        let mut out = String::new();
        render_bars(&mut out, &[("North".into(), 4), ("South".into(), 2)]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0].matches('#').count(), BAR_WIDTH);
        assert_eq!(lines[1].matches('#').count(), BAR_WIDTH / 2);
    }
}
