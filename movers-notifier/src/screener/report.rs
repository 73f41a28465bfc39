//! Leaderboard report rendering.
//!
//! Produces the fixed-width text block printed to stdout and posted to the
//! webhook. Column padding counts characters, so Hangul names pad the same
//! way as ASCII ones.

use std::fmt;

use movers_common::util::{char_len, format_eok, format_tenths, format_thousands};

use super::engine::{RankedStock, ScreenerResult};
use crate::date::display_date;

/// Width of the `━` separator lines.
pub const SEPARATOR_WIDTH: usize = 50;

/// Finished report: an ordered, immutable list of lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    lines: Vec<String>,
}

impl Report {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Lines joined with `\n`.
    pub fn to_message(&self) -> String {
        self.lines.join("\n")
    }

    /// Length of the joined message in characters.
    pub fn char_len(&self) -> usize {
        let newlines = self.lines.len().saturating_sub(1);
        self.lines.iter().map(|l| char_len(l)).sum::<usize>() + newlines
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_message())
    }
}

fn separator() -> String {
    "━".repeat(SEPARATOR_WIDTH)
}

/// Render the leaderboard for a screening result.
pub fn render(result: &ScreenerResult) -> Report {
    let threshold = format_eok(result.min_trading_value);
    let mut lines = Vec::with_capacity(result.stocks.len() + 6);

    lines.push(format!(
        "🏆 {} '돈 몰린' 급등주 Top {} (거래대금 {}억 이상)",
        display_date(&result.date),
        result.top_n,
        threshold
    ));
    lines.push(separator());
    lines.push(format!(
        "{:<10} | {:>10} | {:>8} | {:>12}",
        "종목명", "종가", "상승률", "거래대금(억원)"
    ));
    lines.push(separator());

    lines.extend(result.stocks.iter().map(format_row));

    lines.push(separator());
    lines.push(format!(
        "✅ 총 {}개 종목이 거래대금 {}억 원을 넘겼습니다.",
        result.qualifying_count, threshold
    ));

    Report::new(lines)
}

/// One data row: name, close, change, turnover.
pub fn format_row(stock: &RankedStock) -> String {
    format!(
        "{:<10} | {:>10}원 | {:>+7.2}% | {:>10}억",
        stock.row.name,
        format_thousands(stock.row.close),
        stock.row.change_pct,
        format_tenths(stock.trading_value_eok_tenths)
    )
}

/// Status line for a non-trading day.
pub fn market_closed_message(date: &str) -> String {
    format!("{}은(는) 휴장일입니다. 스킵합니다.", date)
}

/// Status line when nothing met the turnover threshold.
pub fn no_qualifying_message(date: &str, min_trading_value: u64) -> String {
    format!(
        "{}: 거래대금 {}억 이상 종목이 없습니다.",
        date,
        format_eok(min_trading_value)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MarketRow;

    fn stock(name: &str, close: u64, change_pct: f64, eok_tenths: u64) -> RankedStock {
        RankedStock {
            row: MarketRow {
                ticker: "000000".into(),
                name: name.into(),
                close,
                change_pct,
                trading_value: eok_tenths * 10_000_000,
            },
            trading_value_eok_tenths: eok_tenths,
        }
    }

    fn result(stocks: Vec<RankedStock>, qualifying_count: usize) -> ScreenerResult {
        ScreenerResult {
            date: "20240105".into(),
            total_fetched: 2_700,
            qualifying_count,
            stocks,
            filter_results: Vec::new(),
            min_trading_value: 50_000_000_000,
            top_n: 10,
        }
    }

    #[test]
    fn test_format_row() {
        let line = format_row(&stock("삼성전자", 71_500, 2.14, 10_892));
        assert_eq!(
            line,
            "삼성전자       |     71,500원 |   +2.14% |    1,089.2억"
        );
    }

    #[test]
    fn test_format_row_negative_change() {
        let line = format_row(&stock("ABC", 1_234_567, -3.5, 5_000));
        assert!(line.contains("  -3.50%"));
        assert!(line.contains(" 1,234,567원"));
        assert!(line.ends_with("     500.0억"));
    }

    #[test]
    fn test_render_layout() {
        let report = render(&result(
            vec![stock("에코프로", 600_000, 30.1, 7_000), stock("HLB", 80_000, 12.3, 6_000)],
            7,
        ));
        let lines = report.lines();

        assert_eq!(lines.len(), 8);
        assert_eq!(
            lines[0],
            "🏆 2024-01-05 '돈 몰린' 급등주 Top 10 (거래대금 500억 이상)"
        );
        assert_eq!(lines[1], "━".repeat(50));
        assert_eq!(
            lines[2],
            "종목명        |         종가 |      상승률 |     거래대금(억원)"
        );
        assert_eq!(lines[3], lines[1]);
        assert!(lines[4].starts_with("에코프로"));
        assert!(lines[5].starts_with("HLB"));
        assert_eq!(lines[6], lines[1]);
        assert_eq!(lines[7], "✅ 총 7개 종목이 거래대금 500억 원을 넘겼습니다.");
    }

    #[test]
    fn test_report_char_len_matches_message() {
        let report = render(&result(vec![stock("카카오", 50_000, 1.0, 5_500)], 1));
        assert_eq!(report.char_len(), report.to_message().chars().count());
        assert_eq!(report.to_string(), report.to_message());
    }

    #[test]
    fn test_status_messages() {
        assert_eq!(
            market_closed_message("20240106"),
            "20240106은(는) 휴장일입니다. 스킵합니다."
        );
        assert_eq!(
            no_qualifying_message("20240105", 50_000_000_000),
            "20240105: 거래대금 500억 이상 종목이 없습니다."
        );
    }
}
