//! Flat row projection of samples for tabular export.
//!
//! Columns are `index, V, I, P` followed by the scenario's declared extra
//! keys. Missing keys render as empty cells, flags as `true`/`false`.

use crate::scenario::{Sample, ScenarioEntry};

const BASE_COLUMNS: [&str; 4] = ["index", "V", "I", "P"];

/// Column names for a scenario.
pub fn csv_header(entry: &ScenarioEntry) -> Vec<String> {
    BASE_COLUMNS
        .iter()
        .chain(entry.columns.iter())
        .map(|c| c.to_string())
        .collect()
}

/// Cells of one sample, aligned with [`csv_header`].
pub fn csv_row(entry: &ScenarioEntry, sample: &Sample) -> Vec<String> {
    let mut row = vec![
        sample.index.to_string(),
        sample.v.to_string(),
        sample.i.to_string(),
        sample.p.to_string(),
    ];
    row.extend(entry.columns.iter().map(|key| {
        sample
            .extra
            .get(*key)
            .map(|value| value.to_string())
            .unwrap_or_default()
    }));
    row
}

/// Render a header line plus one line per sample.
pub fn to_csv<'a, I>(entry: &ScenarioEntry, samples: I) -> String
where
    I: IntoIterator<Item = &'a Sample>,
{
    let mut out = join_line(&csv_header(entry));
    for sample in samples {
        out.push_str(&join_line(&csv_row(entry, sample)));
    }
    out
}

/// Join cells into one CSV line, quoting where needed.
pub fn join_line(cells: &[String]) -> String {
    let mut line = cells
        .iter()
        .map(|cell| escape(cell))
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}

fn escape(cell: &str) -> String {
    if cell.contains(&[',', '"', '\n'][..]) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Registry;

    #[test]
    fn test_header_is_stable() {
        let registry = Registry::builtin();
        let entry = registry.resolve("ohms_law");
        assert_eq!(csv_header(entry), vec!["index", "V", "I", "P", "R"]);
    }

    #[test]
    fn test_row_alignment() {
        let registry = Registry::builtin();
        let entry = registry.resolve("wheatstone");
        let mut sample = Sample::new(10.0, 0.01, 0.1)
            .with("Ig", 0.0)
            .with("balanced", true);
        sample.index = 7;
        let row = csv_row(entry, &sample);
        assert_eq!(row.len(), csv_header(entry).len());
        assert_eq!(row[0], "7");
        assert_eq!(row[1], "10");
        // Ig, Vab, Rx_balance, balanced
        assert_eq!(&row[4..], &["0", "", "", "true"]);
    }

    #[test]
    fn test_to_csv_lines() {
        let registry = Registry::builtin();
        let entry = registry.resolve("ohms_law");
        let samples = vec![Sample::from_vi(1.0, 2.0).with("R", 0.5)];
        let csv = to_csv(entry, &samples);
        assert_eq!(csv, "index,V,I,P,R\n0,1,2,2,0.5\n");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a,b"), "\"a,b\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape("plain"), "plain");
    }
}
