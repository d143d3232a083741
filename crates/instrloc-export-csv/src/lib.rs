use color_eyre::eyre::{eyre, Result};
use instrloc_core::{ExportRecord, ResolvedRow, Sheet, SOURCE_COLUMN, TARGET_COLUMN};
use std::io::Write;

/// Write the localized sheet: the input rows in original order with the
/// resolved target column, canonical columns first, preserved extras after.
pub fn write_localized_sheet<W: Write>(
    writer: W,
    sheet: &Sheet,
    resolved: &[ResolvedRow],
) -> Result<()> {
    if sheet.rows.len() != resolved.len() {
        return Err(eyre!(
            "resolved row count {} does not match sheet row count {}",
            resolved.len(),
            sheet.rows.len()
        ));
    }

    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec![SOURCE_COLUMN, TARGET_COLUMN];
    header.extend(sheet.extra_headers.iter().map(String::as_str));
    wtr.write_record(&header)?;

    for (row, r) in sheet.rows.iter().zip(resolved) {
        let mut record = vec![r.source.as_str(), r.target.as_str()];
        record.extend(row.extras.iter().map(String::as_str));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write the catalog-import file. A UTF-8 byte-order mark goes out before
/// the header so the downstream import tool reads the Arabic column
/// losslessly.
pub fn write_catalog_csv<W: Write>(mut writer: W, records: &[ExportRecord]) -> Result<()> {
    writer.write_all(b"\xEF\xBB\xBF")?;

    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([
        "sku",
        "store_view_code",
        "attribute_set_code",
        "product_type",
        "custom_options",
    ])?;

    for r in records {
        wtr.write_record([
            &r.sku,
            &r.store_view_code,
            &r.attribute_set_code,
            &r.product_type,
            &r.custom_options,
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use instrloc_core::Row;

    #[test]
    fn catalog_csv_starts_with_a_bom() {
        let records = vec![ExportRecord {
            sku: "1001".into(),
            store_view_code: "ar_EG".into(),
            attribute_set_code: "Default".into(),
            product_type: "simple".into(),
            custom_options: "name=Custom Option,type=radio,required=0,price=0,price_type=fixed,sku=,option_title=كرة".into(),
        }];
        let mut buf = Vec::new();
        write_catalog_csv(&mut buf, &records).unwrap();
        assert_eq!(&buf[..3], b"\xEF\xBB\xBF");
        let text = String::from_utf8(buf[3..].to_vec()).unwrap();
        assert!(text.starts_with("sku,store_view_code,attribute_set_code,product_type,custom_options"));
        assert!(text.contains("1001,ar_EG,Default,simple,"));
        assert!(text.contains("كرة"));
    }

    #[test]
    fn localized_sheet_keeps_extras_and_order() {
        let sheet = Sheet {
            extra_headers: vec!["Notes".into()],
            rows: vec![
                Row { source: "1001".into(), target: "".into(), extras: vec!["a".into()] },
                Row { source: "Ball".into(), target: "".into(), extras: vec!["b".into()] },
            ],
        };
        let resolved = vec![
            ResolvedRow { source: "1001".into(), target: "1001".into(), sku: None },
            ResolvedRow { source: "Ball".into(), target: "كرة".into(), sku: Some("1001".into()) },
        ];
        let mut buf = Vec::new();
        write_localized_sheet(&mut buf, &sheet, &resolved).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "English Instructions,Arabic Instructions,Notes");
        assert_eq!(lines[1], "1001,1001,a");
        assert_eq!(lines[2], "Ball,كرة,b");
    }

    #[test]
    fn row_count_mismatch_is_an_error() {
        let sheet = Sheet::default();
        let resolved = vec![ResolvedRow { source: "x".into(), target: "".into(), sku: None }];
        assert!(write_localized_sheet(Vec::new(), &sheet, &resolved).is_err());
    }
}
