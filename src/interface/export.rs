use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::planner::UsageTable;

/// Header row: product, one meal for the group, one column per slot, totals.
fn header_record(table: &UsageTable) -> Vec<String> {
    let mut header = vec![
        "Product".to_string(),
        format!("1 meal for {} people", table.people_count),
    ];
    header.extend(table.slots.iter().map(|s| s.label()));
    header.push("Repetitions".to_string());
    header.push("Total weight to buy".to_string());
    header
}

/// Write the usage table as CSV to any writer.
///
/// Slots a product never uses are left blank; the last row carries the grand
/// total in the final column.
pub fn write_usage_csv<W: Write>(table: &UsageTable, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(header_record(table))?;

    for row in &table.rows {
        let mut record = vec![
            row.product.clone(),
            format!("{}", row.weight_for_people_one_meal),
        ];
        record.extend(row.slot_occurrences.iter().map(|&count| {
            if count > 0 {
                count.to_string()
            } else {
                String::new()
            }
        }));
        record.push(row.total_occurrences.to_string());
        record.push(format!("{}", row.total_weight));
        wtr.write_record(&record)?;
    }

    let mut total = vec!["TOTAL".to_string(), String::new()];
    total.extend(table.slots.iter().map(|_| String::new()));
    total.push(String::new());
    total.push(format!("{}", table.grand_total));
    wtr.write_record(&total)?;

    wtr.flush()?;
    Ok(())
}

/// Write the usage table to a CSV file.
pub fn write_usage_csv_file(table: &UsageTable, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_usage_csv(table, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::{SlotHeader, UsageRow};

    fn sample_table() -> UsageTable {
        UsageTable {
            people_count: 2,
            slots: vec![
                SlotHeader {
                    index: 0,
                    meal_types: vec!["Breakfast".to_string()],
                },
                SlotHeader {
                    index: 1,
                    meal_types: vec![],
                },
            ],
            rows: vec![UsageRow {
                product: "Oats".to_string(),
                weight_for_people_one_meal: 160.0,
                slot_occurrences: vec![2, 0],
                total_occurrences: 2,
                total_weight: 320.0,
            }],
            grand_total: 320.0,
        }
    }

    #[test]
    fn test_csv_layout() {
        let mut out = Vec::new();
        write_usage_csv(&sample_table(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), 6);
        assert_eq!(&headers[2], "Ration 1\nBreakfast");
        assert_eq!(&headers[3], "Ration 2\nRation 2");

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "Oats");
        assert_eq!(&rows[0][2], "2");
        assert_eq!(&rows[0][3], "");
        assert_eq!(&rows[1][0], "TOTAL");
        assert_eq!(&rows[1][5], "320");
    }
}
