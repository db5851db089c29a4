//! Rendering of the scoreboard (terminal table, CSV and JSON)

use anyhow::Result;
use scoreboard::{DisplayOpportunity, FetchError, Scoreboard, SortField, ViewState};
use serde::Serialize;
use std::io::Write;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::constants;

/// Snapshot of every getter, for JSON output
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot<'a> {
    #[serde(flatten)]
    view: &'a ViewState,
    total_open_opps: usize,
    average_score: String,
    hot_count: usize,
    warm_count: usize,
    cold_count: usize,
    opportunities: Vec<&'a DisplayOpportunity>,
}

/// Summary lines shown above the table
pub fn summary(board: &Scoreboard) -> String {
    let view = board.view_state();
    format!(
        "OPEN OPPORTUNITIES {}   AVG SCORE {}\n\
         HOT {}   WARM {}   COLD {}\n\
         CATEGORY {}   SORTED BY {} {}",
        board.total_open_opps(),
        board.average_score(),
        board.hot_count(),
        board.warm_count(),
        board.cold_count(),
        view.selected_category,
        view.sort_field.title(),
        board.sort_direction_indicator(),
    )
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Text rendition of the score bar, filled in proportion to the percentage
fn score_bar(percent: f64) -> String {
    let filled = ((percent / 100.0) * constants::SCORE_BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(constants::SCORE_BAR_WIDTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(constants::SCORE_BAR_WIDTH - filled))
}

/// Opportunity table; the active sort column carries the direction glyph
pub fn table(board: &Scoreboard) -> String {
    let mut builder = Builder::default();

    let mut header: Vec<String> = SortField::ALL
        .iter()
        .map(|field| {
            if board.is_sorted_by(*field) {
                format!("{} {}", field.title(), board.sort_direction_indicator())
            } else {
                field.title().to_string()
            }
        })
        .collect();
    header.push("Category".to_string());
    header.push("Link".to_string());
    builder.push_record(header);

    for opp in board.filtered_and_sorted_opportunities() {
        let raw = &opp.raw;
        builder.push_record([
            truncate(raw.name.as_deref().unwrap_or(""), constants::NAME_COLUMN_WIDTH),
            raw.stage_name.clone().unwrap_or_default(),
            opp.formatted_amount.clone(),
            format!("{:>5} {}", opp.score_display, score_bar(raw.score_percent())),
            opp.formatted_close_date.clone(),
            raw.score_category.clone().unwrap_or_default(),
            opp.record_url.clone(),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::sharp());
    table.to_string()
}

/// Print summary and table to stdout
pub fn print_table(board: &Scoreboard) {
    println!("{}\n", summary(board));
    if board.has_opportunities() {
        println!("{}", table(board));
    } else {
        println!("No opportunities to display.");
    }
}

/// Write the visible records as CSV
pub fn write_csv<W: Write>(board: &Scoreboard, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record([
        "Id",
        "Name",
        "Stage",
        "Amount",
        "Close_Date",
        "Score",
        "Category",
        "Record_URL",
    ])?;

    for opp in board.filtered_and_sorted_opportunities() {
        let raw = &opp.raw;
        wtr.write_record([
            raw.id.as_str(),
            raw.name.as_deref().unwrap_or(""),
            raw.stage_name.as_deref().unwrap_or(""),
            &opp.formatted_amount,
            &opp.formatted_close_date,
            &opp.score_display,
            raw.score_category.as_deref().unwrap_or(""),
            &opp.record_url,
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write every getter and the visible records as pretty JSON
pub fn write_json<W: Write>(board: &Scoreboard, mut writer: W) -> Result<()> {
    let snapshot = Snapshot {
        view: board.view_state(),
        total_open_opps: board.total_open_opps(),
        average_score: board.average_score(),
        hot_count: board.hot_count(),
        warm_count: board.warm_count(),
        cold_count: board.cold_count(),
        opportunities: board.filtered_and_sorted_opportunities(),
    };

    serde_json::to_writer_pretty(&mut writer, &snapshot)?;
    writeln!(writer)?;
    Ok(())
}

/// Print a fetch failure for the user
pub fn print_error(error: &FetchError) {
    eprintln!("Unable to load opportunities: {}", error.message);
    if let Some(status) = error.status {
        eprintln!("  Status: {}", status);
    }
    if let Some(details) = &error.details {
        let details = serde_json::to_string_pretty(details).unwrap_or_else(|_| details.to_string());
        eprintln!("  Details: {}", details);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoreboard::{CategoryFilter, RawOpportunity};

    fn board() -> Scoreboard {
        let mut board = Scoreboard::new();
        board.on_data_received(Ok(vec![
            RawOpportunity {
                id: "1".to_string(),
                name: Some("Acme, Inc. Expansion".to_string()),
                stage_name: Some("Proposal".to_string()),
                amount: Some(1234.5),
                score: Some(82.0),
                score_category: Some("Hot".to_string()),
                ..Default::default()
            },
            RawOpportunity {
                id: "2".to_string(),
                name: Some("Globex Pilot".to_string()),
                score: Some(12.0),
                score_category: Some("Cold".to_string()),
                ..Default::default()
            },
        ]));
        board
    }

    #[test]
    fn test_summary() {
        let mut board = board();
        board.set_category(CategoryFilter::Hot);

        let text = summary(&board);
        assert!(text.contains("OPEN OPPORTUNITIES 1"));
        assert!(text.contains("AVG SCORE 82.0"));
        assert!(text.contains("HOT 1   WARM 0   COLD 1"));
        assert!(text.contains("SORTED BY Score ↓"));
    }

    #[test]
    fn test_table_marks_active_column() {
        let text = table(&board());
        assert!(text.contains("Score ↓"));
        assert!(text.contains("$1,234.50"));
        assert!(text.contains("/lightning/r/Opportunity/2/view"));
    }

    #[test]
    fn test_write_csv_quotes_and_orders_rows() {
        let mut out = Vec::new();
        write_csv(&board(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Id,Name,Stage,Amount,Close_Date,Score,Category,Record_URL");
        assert!(lines[1].starts_with("1,\"Acme, Inc. Expansion\",Proposal,\"$1,234.50\",-,82.0,Hot,"));
        assert!(lines[2].starts_with("2,Globex Pilot,,-,-,12.0,Cold,"));
    }

    #[test]
    fn test_write_json_snapshot() {
        let mut out = Vec::new();
        write_json(&board(), &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["sortField"], "Opportunity_Score__c");
        assert_eq!(value["sortDirection"], "desc");
        assert_eq!(value["totalOpenOpps"], 2);
        assert_eq!(value["averageScore"], "47.0");
        assert_eq!(value["opportunities"][0]["Id"], "1");
        assert_eq!(value["opportunities"][1]["categoryBadgeClass"], "slds-badge badge-cold");
    }

    #[test]
    fn test_write_json_follows_view_changes() {
        let mut board = board();
        board.set_category(CategoryFilter::Cold);
        board.toggle_sort(SortField::CloseDate);
        board.toggle_sort(SortField::CloseDate);

        let mut out = Vec::new();
        write_json(&board, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["selectedCategory"], "Cold");
        assert_eq!(value["sortField"], "CloseDate");
        assert_eq!(value["sortDirection"], "asc");
        assert_eq!(value["totalOpenOpps"], 1);
        assert!(value.get("view").is_none());
    }

    #[test]
    fn test_score_bar() {
        assert_eq!(score_bar(0.0), "░░░░░░░░░░");
        assert_eq!(score_bar(82.0), "████████░░");
        assert_eq!(score_bar(100.0), "██████████");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }
}
