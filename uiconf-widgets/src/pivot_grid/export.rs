// uiconf-widgets/src/pivot_grid/export.rs
use uiconf_core::OperationError;

/// Serializes the rendered table for `export_to_excel`
pub trait Exporter {
    /// Format name reported to `fileSaving`, e.g. `CSV`
    fn format(&self) -> &str;

    fn extension(&self) -> &str;

    fn export(&self, table: &[Vec<String>]) -> Result<Vec<u8>, OperationError>;
}

/// Delimited text with RFC 4180 quoting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimitedExporter {
    delimiter: char,
}

impl Default for DelimitedExporter {
    fn default() -> Self {
        Self { delimiter: ',' }
    }
}

impl DelimitedExporter {
    pub fn new(delimiter: char) -> Self {
        Self { delimiter }
    }

    fn quote(&self, field: &str) -> String {
        let needs_quotes = field.contains(self.delimiter)
            || field.contains('"')
            || field.contains('\n')
            || field.contains('\r');
        if needs_quotes {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }
}

impl Exporter for DelimitedExporter {
    fn format(&self) -> &str {
        if self.delimiter == ',' { "CSV" } else { "TXT" }
    }

    fn extension(&self) -> &str {
        if self.delimiter == ',' { "csv" } else { "txt" }
    }

    fn export(&self, table: &[Vec<String>]) -> Result<Vec<u8>, OperationError> {
        let separator = self.delimiter.to_string();
        let mut out = String::new();
        for row in table {
            let line: Vec<String> = row.iter().map(|field| self.quote(field)).collect();
            out.push_str(&line.join(&separator));
            out.push_str("\r\n");
        }
        Ok(out.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_csv_quoting() {
        let bytes = DelimitedExporter::default()
            .export(&table(&[&["", "2020"], &["Europe, West", "1,250"], &["say \"hi\"", ""]]))
            .unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            ",2020\r\n\"Europe, West\",\"1,250\"\r\n\"say \"\"hi\"\"\",\r\n"
        );
    }

    #[test]
    fn test_tab_delimited() {
        let exporter = DelimitedExporter::new('\t');
        assert_eq!(exporter.format(), "TXT");
        let bytes = exporter.export(&table(&[&["a", "1,5"]])).unwrap();
        assert_eq!(bytes, b"a\t1,5\r\n");
    }
}
