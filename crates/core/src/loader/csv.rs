use csv::{ReaderBuilder, StringRecord, Trim};

use super::LoadError;
use crate::model::Record;

/// How to read the delimited input.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    pub delimiter: u8,
    pub name_column: String,
    pub value_column: String,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            name_column: "name".to_string(),
            value_column: "value".to_string(),
        }
    }
}

/// Parse delimited text into records, in file order.
///
/// Header names are matched case-insensitively; unrelated columns are ignored.
pub fn parse_records(data: &[u8], options: &CsvOptions) -> Result<Vec<Record>, LoadError> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(data);

    let headers = rdr.headers()?.clone();
    let name_ix = column(&headers, &options.name_column)?;
    let value_ix = column(&headers, &options.value_column)?;

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let line = row.position().map_or(0, csv::Position::line);
        let name = row.get(name_ix).unwrap_or_default();
        let raw = row.get(value_ix).unwrap_or_default();
        records.push(Record::parse(line, name, raw)?);
    }
    Ok(records)
}

fn column(headers: &StringRecord, wanted: &str) -> Result<usize, LoadError> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(wanted))
        .ok_or_else(|| LoadError::MissingColumn(wanted.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ValueIssue;

    #[test]
    fn reads_rows_in_order_and_ignores_extra_columns() {
        let input = b"Name,value,note\nA,0.08167,vowel\nB,0.01492,\n";
        let records = parse_records(input, &CsvOptions::default()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], Record::new("A", 0.08167));
        assert_eq!(records[1].name, "B");
    }

    #[test]
    fn custom_delimiter_and_columns() {
        let options = CsvOptions {
            delimiter: b';',
            name_column: "letter".into(),
            value_column: "frequency".into(),
        };
        let records = parse_records(b"letter;frequency\nE;0.12702\n", &options).unwrap();
        assert_eq!(records, vec![Record::new("E", 0.12702)]);
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let err = parse_records(b"name,count\nA,1\n", &CsvOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(ref c) if c == "value"));
    }

    #[test]
    fn bad_value_reports_its_line() {
        let err = parse_records(b"name,value\nA,1\nB,oops\n", &CsvOptions::default()).unwrap_err();
        match err {
            LoadError::Format(e) => {
                assert_eq!(e.row, 3);
                assert_eq!(e.issue, ValueIssue::NotANumber);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn ragged_rows_are_csv_errors() {
        let err = parse_records(b"name,value\nA,1,extra\n", &CsvOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::Csv(_)));
    }
}
