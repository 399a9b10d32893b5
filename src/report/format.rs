//! Formatted terminal output.
//!
//! We keep formatting code in one place so the pipeline stays free of
//! presentation concerns and output changes stay localized.

use chrono::NaiveDate;

use crate::data::SeriesSet;
use crate::domain::{HolidaySummaryRow, TrackedHoliday, YearRange};
use crate::genhol::RegressorTable;

/// Per-year holiday table.
pub fn format_summary(rows: &[HolidaySummaryRow], range: Option<YearRange>) -> String {
    let mut out = String::new();

    out.push_str("=== genhol - ANBIMA holiday summary ===\n");
    if let Some(range) = range {
        out.push_str(&format!("Years: {}..={}\n", range.start_year, range.end_year));
    }
    out.push_str(&format!("Rows: {}\n\n", rows.len()));

    push_line(
        &mut out,
        format!(
            "{:<6} {:>6} {:<12} {:<12} {:<12}",
            "Year",
            "Days",
            TrackedHoliday::Carnival.column_name(),
            TrackedHoliday::Easter.column_name(),
            TrackedHoliday::Corpus.column_name()
        ),
    );
    push_line(&mut out, format!("{:-<6} {:-<6} {:-<12} {:-<12} {:-<12}", "", "", "", "", ""));

    for row in rows {
        push_line(
            &mut out,
            format!(
                "{:<6} {:>6} {:<12} {:<12} {:<12}",
                row.year,
                row.days_in_year,
                fmt_date(row.carnival),
                fmt_date(row.easter),
                fmt_date(row.corpus)
            ),
        );
    }

    out
}

/// Last `tail` rows of the regressor table.
pub fn format_regressors(table: &RegressorTable, tail: usize) -> String {
    let mut out = String::new();
    let shown = table.tail(tail);
    let period_label = if table.frequency == 4 { "Quarter" } else { "Month" };

    out.push_str(&format!(
        "Regressors: {} periods, showing last {}\n",
        table.rows.len(),
        shown.len()
    ));

    let mut header = format!("{:<6} {:>7}", "Year", period_label);
    let mut rule = format!("{:-<6} {:-<7}", "", "");
    for col in &table.columns {
        header.push_str(&format!(" {:>12}", truncate(col, 12)));
        rule.push_str(&format!(" {:-<12}", ""));
    }
    push_line(&mut out, header);
    push_line(&mut out, rule);

    for row in shown {
        let mut line = format!("{:<6} {:>7}", row.year, row.month);
        for v in &row.values {
            line.push_str(&format!(" {v:>12.6}"));
        }
        push_line(&mut out, line);
    }

    out
}

/// Per-variable stats of a SIDRA series set.
pub fn format_series(set: &SeriesSet) -> String {
    let mut out = String::new();

    out.push_str("=== genhol - SIDRA series ===\n");
    push_line(
        &mut out,
        format!(
            "{:<8} {:>5} {:<10} {:<10} {:>10}  {}",
            "code", "n", "first", "last", "last_value", "name"
        ),
    );
    push_line(
        &mut out,
        format!("{:-<8} {:-<5} {:-<10} {:-<10} {:-<10}  {:-<4}", "", "", "", "", "", ""),
    );

    for (code, points) in &set.series {
        let first = points.first().map(|(d, _)| *d);
        let last = points.last();
        push_line(
            &mut out,
            format!(
                "{:<8} {:>5} {:<10} {:<10} {:>10}  {}",
                truncate(code, 8),
                points.len(),
                fmt_date(first),
                fmt_date(last.map(|(d, _)| *d)),
                last.map(|(_, v)| format!("{v:.2}")).unwrap_or_default(),
                set.legends.get(code).map(String::as_str).unwrap_or(""),
            ),
        );
    }

    out
}

fn push_line(out: &mut String, line: String) {
    out.push_str(line.trim_end());
    out.push('\n');
}

fn fmt_date(d: Option<NaiveDate>) -> String {
    d.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
