//! Roster file decoding and column resolution

use std::collections::HashSet;
use std::path::Path;

use calamine::{Data, Range, Reader, Xls, Xlsx, open_workbook};

use super::{
    CONTRACT_MARKERS, ColumnRef, ContractMapping, ID_NUMBER_MARKERS, NAME_MARKERS, RosterEntry,
    RosterError, Table, canonical_numeric_key, cell_text, is_blank_key,
};

/// Decoders tried in order. The extension picks the order, the content
/// decides: an `.xls` extension sometimes hides xlsx content and the other
/// way around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decoder {
    Xls,
    Xlsx,
}

impl Decoder {
    fn first_sheet(self, path: &Path) -> Result<Range<Data>, calamine::Error> {
        match self {
            Decoder::Xls => {
                let mut workbook: Xls<_> = open_workbook(path)?;
                let sheet_name = workbook
                    .sheet_names()
                    .first()
                    .ok_or(calamine::Error::Msg("workbook has no sheets"))?
                    .clone();
                Ok(workbook.worksheet_range(&sheet_name)?)
            }
            Decoder::Xlsx => {
                let mut workbook: Xlsx<_> = open_workbook(path)?;
                let sheet_name = workbook
                    .sheet_names()
                    .first()
                    .ok_or(calamine::Error::Msg("workbook has no sheets"))?
                    .clone();
                Ok(workbook.worksheet_range(&sheet_name)?)
            }
        }
    }
}

fn decoder_order(path: &Path) -> [Decoder; 2] {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());
    match ext.as_deref() {
        Some("xlsx") | Some("xlsm") => [Decoder::Xlsx, Decoder::Xls],
        _ => [Decoder::Xls, Decoder::Xlsx],
    }
}

fn open_first_sheet(path: &Path) -> Result<Range<Data>, RosterError> {
    let mut last_error = calamine::Error::Msg("no decoder attempted");
    for decoder in decoder_order(path) {
        match decoder.first_sheet(path) {
            Ok(range) => {
                log::debug!("decoded {} with {:?}", path.display(), decoder);
                return Ok(range);
            }
            Err(err) => {
                log::debug!("{:?} decoder failed on {}: {}", decoder, path.display(), err);
                last_error = err;
            }
        }
    }
    Err(RosterError::Unreadable {
        path: path.to_path_buf(),
        source: last_error,
    })
}

/// Load the first worksheet of a roster file. The first row becomes the
/// header row; everything after it is data.
pub fn load_table(path: &Path) -> Result<Table, RosterError> {
    if !path.exists() {
        return Err(RosterError::NotFound(path.to_path_buf()));
    }
    let range = open_first_sheet(path)?;
    let mut rows = range.rows();
    let headers = rows
        .next()
        .map(|row| row.iter().map(cell_text).collect())
        .unwrap_or_default();
    let rows = rows.map(|row| row.to_vec()).collect();
    Ok(Table { headers, rows })
}

/// Resolve a column by substring: the first header containing any marker
/// wins, scanning left to right.
pub fn find_column(headers: &[String], markers: &[&str]) -> Option<ColumnRef> {
    for (index, header) in headers.iter().enumerate() {
        let trimmed = header.trim();
        if markers.iter().any(|marker| trimmed.contains(marker)) {
            return Some(ColumnRef {
                index,
                header: trimmed.to_string(),
            });
        }
    }
    None
}

fn resolve_column(
    headers: &[String],
    markers: &'static [&'static str],
) -> Result<ColumnRef, RosterError> {
    find_column(headers, markers).ok_or_else(|| RosterError::MissingColumn {
        marker: markers[0],
        headers: headers.to_vec(),
    })
}

/// Load the contract-number mapping for a rename run. Rows without a usable
/// contract number are dropped; duplicate contract numbers keep the later
/// row.
pub fn load_contract_mapping(path: &Path) -> Result<ContractMapping, RosterError> {
    let table = load_table(path)?;
    let contract_col = resolve_column(&table.headers, CONTRACT_MARKERS)?;
    let name_col = resolve_column(&table.headers, NAME_MARKERS)?;
    let id_col = resolve_column(&table.headers, ID_NUMBER_MARKERS)?;

    let mut mapping = ContractMapping::new();
    for row in &table.rows {
        let raw_key = row_text(row, contract_col.index);
        let raw_key = raw_key.trim();
        if is_blank_key(raw_key) {
            continue;
        }
        mapping.insert(
            canonical_numeric_key(raw_key),
            RosterEntry {
                name: row_text(row, name_col.index).trim().to_string(),
                id_number: row_text(row, id_col.index).trim().to_string(),
            },
        );
    }
    log::debug!(
        "loaded {} contract rows from {}",
        mapping.len(),
        path.display()
    );
    Ok(mapping)
}

/// Load the roster table along with the resolved key column for one of the
/// membership pipelines.
pub fn load_keyed_table(
    path: &Path,
    markers: &'static [&'static str],
) -> Result<(Table, ColumnRef), RosterError> {
    let table = load_table(path)?;
    let column = resolve_column(&table.headers, markers)?;
    Ok((table, column))
}

/// Every non-blank ID number in the column, canonicalized and uppercased.
pub fn id_number_set(table: &Table, column: usize) -> HashSet<String> {
    table
        .rows
        .iter()
        .filter_map(|row| {
            let raw = row_text(row, column);
            let raw = raw.trim();
            if is_blank_key(raw) {
                None
            } else {
                Some(canonical_numeric_key(raw).to_uppercase())
            }
        })
        .collect()
}

/// Every non-blank employee name in the column, trimmed.
pub fn employee_name_set(table: &Table, column: usize) -> HashSet<String> {
    table
        .rows
        .iter()
        .filter_map(|row| {
            let raw = row_text(row, column);
            let raw = raw.trim();
            if is_blank_key(raw) {
                None
            } else {
                Some(raw.to_string())
            }
        })
        .collect()
}

fn row_text(row: &[Data], col: usize) -> String {
    row.get(col).map(cell_text).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use std::fs;
    use tempfile::tempdir;

    fn write_roster(path: &Path, headers: &[&str], rows: &[Vec<&str>]) {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        for (col, header) in headers.iter().enumerate() {
            worksheet.write_string(0, col as u16, *header).unwrap();
        }
        for (row_idx, row) in rows.iter().enumerate() {
            for (col, value) in row.iter().enumerate() {
                worksheet
                    .write_string((row_idx + 1) as u32, col as u16, *value)
                    .unwrap();
            }
        }
        workbook.save(path).unwrap();
    }

    #[test]
    fn test_find_column_first_match_wins() {
        let headers = vec![
            "序号".to_string(),
            "员工姓名".to_string(),
            "姓名拼音".to_string(),
        ];
        let col = find_column(&headers, &["姓名"]).unwrap();
        assert_eq!(col.index, 1);
        assert_eq!(col.header, "员工姓名");
    }

    #[test]
    fn test_find_column_matches_short_marker() {
        // 身份证 alone still matches when the long form is absent
        let headers = vec!["姓名".to_string(), "身份证".to_string()];
        let col = find_column(&headers, ID_NUMBER_MARKERS).unwrap();
        assert_eq!(col.index, 1);
    }

    #[test]
    fn test_resolve_column_missing_lists_headers() {
        let headers = vec!["序号".to_string(), "部门".to_string()];
        let err = resolve_column(&headers, CONTRACT_MARKERS).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("合同编号"));
        assert!(msg.contains("序号"));
        assert!(msg.contains("部门"));
    }

    #[test]
    fn test_load_table_not_found() {
        let dir = tempdir().unwrap();
        let err = load_table(&dir.path().join("missing.xlsx")).unwrap_err();
        assert!(matches!(err, RosterError::NotFound(_)));
    }

    #[test]
    fn test_load_table_unreadable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("garbage.xlsx");
        fs::write(&path, b"not a spreadsheet at all").unwrap();
        let err = load_table(&path).unwrap_err();
        assert!(matches!(err, RosterError::Unreadable { .. }));
    }

    #[test]
    fn test_load_table_xls_extension_with_xlsx_content() {
        // Rosters exported with the wrong extension fall through to the
        // second decoder in the list.
        let dir = tempdir().unwrap();
        let path = dir.path().join("roster.xls");
        write_roster(&path, &["姓名"], &[vec!["张三"]]);
        let table = load_table(&path).unwrap();
        assert_eq!(table.headers, vec!["姓名"]);
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn test_load_contract_mapping() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("roster.xlsx");
        write_roster(
            &path,
            &["序号", "合同编号", "姓名", "身份证号"],
            &[
                vec!["1", "100000123.0", "张三", "110101199001011234"],
                vec!["2", "", "无键", "220101199001011234"],
                vec!["3", "200000456", " 李四 ", " 33010119900101123x "],
            ],
        );
        let mapping = load_contract_mapping(&path).unwrap();
        assert_eq!(mapping.len(), 2);
        // Float artifact canonicalized away
        assert_eq!(
            mapping.get("100000123"),
            Some(&RosterEntry {
                name: "张三".to_string(),
                id_number: "110101199001011234".to_string(),
            })
        );
        // Payload fields are trimmed but otherwise untouched
        assert_eq!(
            mapping.get("200000456"),
            Some(&RosterEntry {
                name: "李四".to_string(),
                id_number: "33010119900101123x".to_string(),
            })
        );
    }

    #[test]
    fn test_load_contract_mapping_duplicate_keeps_later_row() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("roster.xlsx");
        write_roster(
            &path,
            &["合同编号", "姓名", "身份证号"],
            &[
                vec!["7", "旧行", "110101199001011234"],
                vec!["7", "新行", "110101199001011235"],
            ],
        );
        let mapping = load_contract_mapping(&path).unwrap();
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.get("7").unwrap().name, "新行");
    }

    #[test]
    fn test_id_number_set_uppercases_and_canonicalizes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("roster.xlsx");
        write_roster(
            &path,
            &["姓名", "身份证号"],
            &[
                vec!["甲", "11010119900101123x"],
                vec!["乙", "nan"],
                vec!["丙", "100000123.0"],
            ],
        );
        let (table, col) = load_keyed_table(&path, ID_NUMBER_MARKERS).unwrap();
        assert_eq!(col.header, "身份证号");
        let ids = id_number_set(&table, col.index);
        assert_eq!(ids.len(), 2);
        assert!(ids.contains("11010119900101123X"));
        assert!(ids.contains("100000123"));
    }

    #[test]
    fn test_employee_name_set_trims() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("roster.xlsx");
        write_roster(
            &path,
            &["姓名"],
            &[vec![" 张三 "], vec![""], vec!["李四"], vec!["张三"]],
        );
        let (table, col) = load_keyed_table(&path, NAME_MARKERS).unwrap();
        let names = employee_name_set(&table, col.index);
        assert_eq!(names.len(), 2);
        assert!(names.contains("张三"));
        assert!(names.contains("李四"));
    }
}
