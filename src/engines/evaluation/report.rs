/// Fully parsed canonical result line of a pMARS batch report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BattleReport {
    pub wins: u32,
    pub ties: u32,
    pub losses: u32,
}

/// Outcome of parsing one report. Either the canonical line was found and
/// parsed in full, or the report counts for nothing; there is no partial
/// interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportParse {
    Parsed(BattleReport),
    Malformed,
}

/// Scans a report for the contract line `Results: <wins> <ties> <losses>`.
///
/// Any other content before or after the line is ignored. A line that starts
/// like the contract but does not parse as exactly three integers makes the
/// whole report malformed rather than defaulting any field.
pub fn parse_report(text: &str) -> ReportParse {
    for line in text.lines() {
        let Some(rest) = line.trim().strip_prefix("Results:") else {
            continue;
        };

        let fields: Vec<&str> = rest.split_whitespace().collect();
        if fields.len() != 3 {
            return ReportParse::Malformed;
        }

        let parsed: Option<Vec<u32>> = fields.iter().map(|f| f.parse().ok()).collect();
        return match parsed.as_deref() {
            Some([wins, ties, losses]) => ReportParse::Parsed(BattleReport {
                wins: *wins,
                ties: *ties,
                losses: *losses,
            }),
            _ => ReportParse::Malformed,
        };
    }

    ReportParse::Malformed
}
