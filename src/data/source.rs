//! Line-oriented test-data files.
//!
//! Each file holds one row per line with comma-separated fields. Blank lines
//! and lines starting with `#` are ignored. Beneficiary and MBI files use the
//! first field only; contract files need `id,month,year`.

use std::{
    fs,
    io::{self, ErrorKind},
    path::Path,
};

use super::{BeneId, ContractData, HashedMbi};

fn rows(text: &str) -> impl Iterator<Item = (usize, Vec<&str>)> {
    text.lines().enumerate().filter_map(|(idx, line)| {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            None
        } else {
            Some((idx + 1, line.split(',').map(str::trim).collect()))
        }
    })
}

fn first_fields(text: &str) -> Vec<String> {
    rows(text)
        .filter_map(|(_, fields)| fields.first().map(|f| (*f).to_owned()))
        .filter(|f| !f.is_empty())
        .collect()
}

/// Parse beneficiary ids from file contents.
#[must_use]
pub fn parse_bene_ids(text: &str) -> Vec<BeneId> {
    first_fields(text).into_iter().map(BeneId::new).collect()
}

/// Parse hashed MBIs from file contents.
#[must_use]
pub fn parse_hashed_mbis(text: &str) -> Vec<HashedMbi> {
    first_fields(text).into_iter().map(HashedMbi::new).collect()
}

/// Parse contract rows from file contents.
///
/// # Errors
///
/// Returns [`ErrorKind::InvalidData`] naming the line of the first row that
/// does not have exactly three fields.
pub fn parse_contracts(text: &str) -> io::Result<Vec<ContractData>> {
    rows(text)
        .map(|(line, fields)| match fields.as_slice() {
            [id, month, year] => Ok(ContractData::new(*id, *month, *year)),
            _ => Err(io::Error::new(
                ErrorKind::InvalidData,
                format!("line {line}: expected id,month,year"),
            )),
        })
        .collect()
}

/// Read and parse beneficiary ids from `path`.
///
/// # Errors
///
/// Propagates any I/O error from reading the file.
pub fn read_bene_ids(path: &Path) -> io::Result<Vec<BeneId>> {
    fs::read_to_string(path).map(|text| parse_bene_ids(&text))
}

/// Read and parse hashed MBIs from `path`.
///
/// # Errors
///
/// Propagates any I/O error from reading the file.
pub fn read_hashed_mbis(path: &Path) -> io::Result<Vec<HashedMbi>> {
    fs::read_to_string(path).map(|text| parse_hashed_mbis(&text))
}

/// Read and parse contract rows from `path`.
///
/// # Errors
///
/// Propagates I/O errors and malformed rows.
pub fn read_contracts(path: &Path) -> io::Result<Vec<ContractData>> {
    parse_contracts(&fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_comments_and_blank_lines() {
        let text = "# bene_id\n-201400001\n\n  -201400002 , extra\n";
        let ids = parse_bene_ids(text);
        assert_eq!(ids, vec![BeneId::new("-201400001"), BeneId::new("-201400002")]);
    }

    #[test]
    fn parses_contract_rows() {
        let rows = parse_contracts("Y9999,01,2020\nZ0012, 12 ,2021\n").expect("valid rows");
        assert_eq!(
            rows,
            vec![
                ContractData::new("Y9999", "01", "2020"),
                ContractData::new("Z0012", "12", "2021"),
            ]
        );
    }

    #[test]
    fn malformed_contract_row_names_line() {
        let err = parse_contracts("Y9999,01,2020\n\nY1234,01\n").expect_err("second row is short");
        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert!(err.to_string().contains("line 3"), "{err}");
    }
}
