//! CSV input and output for the sampler
//!
//! Input: one file per realization, a header row of variable names, then one
//! row per observation. Empty or non-numeric fields are kept as NaN so the
//! rows stay aligned; the core masks them. Lines starting with `#` are skipped.
//!
//! Output: one file per realization, a `# <timestamp>` line and a blank line,
//! then `draw,<variable names>` and one row per draw.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use atmi_core::{AtmosphereRealization, BandwidthRule, EmpiricalVariable};
use nalgebra::DMatrix;

/// Parse one field, anything unreadable becomes a masked NaN
fn parse_value(field: &str) -> f64 {
    field.parse().unwrap_or(f64::NAN)
}

/// Load a realization from a CSV file
pub fn read_realization(path: &Path, rule: BandwidthRule) -> Result<AtmosphereRealization> {
    let mut reader = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let headers = reader.headers()?.clone();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record.with_context(|| format!("Failed to parse {}", path.display()))?;
        for (column, field) in columns.iter_mut().zip(record.iter()) {
            column.push(parse_value(field));
        }
    }

    let variables = headers
        .iter()
        .zip(columns)
        .map(|(name, values)| {
            EmpiricalVariable::with_bandwidth(name, values, rule)
                .with_context(|| format!("Variable '{name}' in {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    AtmosphereRealization::new(variables)
        .with_context(|| format!("Invalid realization in {}", path.display()))
}

/// Write one realization's n × K draws
pub fn write_realization(path: &Path, names: &[String], draws: &DMatrix<f64>) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    writeln!(file, "# {}\n", chrono::Local::now())?;

    let mut writer = csv::Writer::from_writer(file);
    let header: Vec<&str> = std::iter::once("draw")
        .chain(names.iter().map(String::as_str))
        .collect();
    writer.write_record(&header)?;

    for (i, row) in draws.row_iter().enumerate() {
        let record: Vec<String> = std::iter::once(i.to_string())
            .chain(row.iter().map(f64::to_string))
            .collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_read_keeps_invalid_fields_aligned() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site0.csv");
        fs::write(
            &path,
            "# extracted series\ntemperature,pwv\n280.5,3.1\n,2.9\n281.0,NaN\n282.5,4.0\n",
        )
        .unwrap();

        let atm = read_realization(&path, BandwidthRule::Scott).unwrap();
        assert_eq!(atm.names(), &["temperature".to_string(), "pwv".to_string()]);
        assert_eq!(atm.observation_count(), 4);
        assert!(atm.values()[(0, 1)].is_nan());
        assert!(atm.values()[(1, 2)].is_nan());
        assert_eq!(atm.variable("pwv").unwrap().valid_count(), 3);
    }

    #[test]
    fn test_read_reports_too_few_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, "t,p\n1.0,\n2.0,\n").unwrap();

        let err = read_realization(&path, BandwidthRule::Scott).unwrap_err();
        assert!(format!("{err:#}").contains("Variable 'p'"));
    }

    #[test]
    fn test_write_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sampling0.csv");
        let draws = DMatrix::from_row_slice(2, 2, &[280.0, 3.5, 281.25, 4.0]);
        write_realization(&path, &["t".to_string(), "pwv".to_string()], &draws).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("# "));
        assert_eq!(lines[1], "");
        assert_eq!(&lines[2..], &["draw,t,pwv", "0,280,3.5", "1,281.25,4"]);
    }
}
