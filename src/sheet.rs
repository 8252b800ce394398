use std::error::Error;
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use simple_error::bail;

use crate::pins::{PinRecord, parse_pin_name, sort_key};

pub const ALT_COLUMNS: usize = 12;

fn cell_is_empty(cell: Option<&Data>) -> bool {
    match cell {
        None | Some(Data::Empty) => true,
        Some(Data::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

fn cell_text(cell: Option<&Data>) -> Option<&str> {
    match cell {
        Some(Data::String(s)) => Some(s.trim()),
        _ => None,
    }
}

fn alt_columns(header: &[Data]) -> Result<[usize; ALT_COLUMNS], Box<dyn Error>> {
    let mut cols = [0; ALT_COLUMNS];
    for (i, col) in cols.iter_mut().enumerate() {
        let name = format!("ALT{i}");
        match header
            .iter()
            .position(|cell| cell_text(Some(cell)) == Some(name.as_str()))
        {
            Some(idx) => *col = idx,
            None => bail!("missing column {}", name),
        }
    }
    Ok(cols)
}

/// One spreadsheet row. Returns `None` for rows with an empty `ALT0` cell
/// (header junk, peripheral-only rows); those are not pins.
fn scan_row(
    row: &[Data],
    cols: &[usize; ALT_COLUMNS],
) -> Result<Option<PinRecord>, Box<dyn Error>> {
    if cell_is_empty(row.get(cols[0])) {
        return Ok(None);
    }
    let Some(token) = cell_text(row.get(cols[0])) else {
        bail!("ALT0 cell {:?} is not a pin name", row.get(cols[0]));
    };
    let (port, pin) = parse_pin_name(token)?;
    let mut alt = vec![];
    for (i, &col) in cols.iter().enumerate() {
        if !cell_is_empty(row.get(col)) {
            alt.push(i as u32);
        }
    }
    Ok(Some(PinRecord { port, pin, alt }))
}

/// Reads the `ALT0..ALT11` table from the first worksheet. Records come back
/// sorted by `sort_key`; a malformed identity token aborts the load.
pub fn load_sheet(path: &Path) -> Result<Vec<PinRecord>, Box<dyn Error>> {
    let mut workbook = open_workbook_auto(path)?;
    let Some(range) = workbook.worksheet_range_at(0) else {
        bail!("{} has no worksheets", path.display());
    };
    let range = range?;
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        bail!("{} has no header row", path.display());
    };
    let cols = alt_columns(header)?;
    let mut records = vec![];
    for row in rows {
        if let Some(rec) = scan_row(row, &cols)? {
            records.push(rec);
        }
    }
    records.sort_by_key(|rec| sort_key(rec.port, rec.pin));
    Ok(records)
}

#[cfg(test)]
fn ident_cols() -> [usize; ALT_COLUMNS] {
    core::array::from_fn(|i| i)
}

#[test]
fn test_alt_columns() {
    let header: Vec<Data> = (0..ALT_COLUMNS)
        .map(|i| Data::String(format!("ALT{i}")))
        .collect();
    assert_eq!(alt_columns(&header).unwrap(), ident_cols());

    // headers may appear in any position
    let mut shuffled = header.clone();
    shuffled.insert(0, Data::String("Pin".to_string()));
    let cols = alt_columns(&shuffled).unwrap();
    assert_eq!(cols[0], 1);
    assert_eq!(cols[11], 12);

    let err = alt_columns(&header[..ALT_COLUMNS - 1]).unwrap_err();
    assert!(err.to_string().contains("ALT11"));
}

#[test]
fn test_scan_row() {
    let cols = ident_cols();

    let mut row = vec![Data::Empty; ALT_COLUMNS];
    row[0] = Data::String("P1_5".to_string());
    row[3] = Data::String("FC3_P1".to_string());
    row[7] = Data::String("CT_INP7".to_string());
    assert_eq!(
        scan_row(&row, &cols).unwrap(),
        Some(PinRecord {
            port: 1,
            pin: 5,
            alt: vec![0, 3, 7],
        })
    );

    let empty = vec![Data::Empty; ALT_COLUMNS];
    assert_eq!(scan_row(&empty, &cols).unwrap(), None);

    let mut blank = vec![Data::Empty; ALT_COLUMNS];
    blank[0] = Data::String("  ".to_string());
    blank[4] = Data::String("FC4_P2".to_string());
    assert_eq!(scan_row(&blank, &cols).unwrap(), None);

    let mut bad = vec![Data::Empty; ALT_COLUMNS];
    bad[0] = Data::String("LPUART0".to_string());
    assert!(scan_row(&bad, &cols).is_err());

    let mut nonstring = vec![Data::Empty; ALT_COLUMNS];
    nonstring[0] = Data::Float(3.0);
    assert!(scan_row(&nonstring, &cols).is_err());
}
