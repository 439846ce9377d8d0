//! Выгрузка таблиц в CSV для Excel: разделитель `;`, UTF-8 с BOM.

use anyhow::Result;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Строка, которую можно выгрузить в CSV
pub trait CsvExportable {
    fn headers() -> Vec<&'static str>;
    fn row(&self) -> Vec<String>;
}

pub fn to_csv<T: CsvExportable>(items: &[T]) -> Result<Vec<u8>> {
    let rows: Vec<Vec<String>> = items.iter().map(CsvExportable::row).collect();
    write_csv(&T::headers(), &rows)
}

pub fn write_csv(headers: &[&str], rows: &[Vec<String>]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(UTF8_BOM.to_vec());
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("CSV writer error: {}", e))?;
    Ok(bytes)
}

/// Число для Excel с русской локалью: десятичная запятая
pub fn decimal(value: f64) -> String {
    format!("{:.2}", value).replace('.', ",")
}

pub fn optional<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

pub fn flag(value: bool) -> String {
    if value { "да" } else { "нет" }.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        name: String,
        amount: f64,
    }

    impl CsvExportable for Row {
        fn headers() -> Vec<&'static str> {
            vec!["Наименование", "Сумма"]
        }

        fn row(&self) -> Vec<String> {
            vec![self.name.clone(), decimal(self.amount)]
        }
    }

    #[test]
    fn starts_with_bom_and_uses_semicolon() {
        let bytes = to_csv(&[Row {
            name: "Шины".into(),
            amount: 1500.5,
        }])
        .unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        assert_eq!(text, "Наименование;Сумма\nШины;1500,50\n");
    }

    #[test]
    fn quotes_fields_with_delimiter_and_quotes() {
        let bytes = write_csv(
            &["a", "b"],
            &[vec!["x;y".to_string(), "say \"hi\"".to_string()]],
        )
        .unwrap();
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        assert_eq!(text, "a;b\n\"x;y\";\"say \"\"hi\"\"\"\n");
    }

    #[test]
    fn helpers() {
        assert_eq!(optional(&Some(5)), "5");
        assert_eq!(optional::<String>(&None), "");
        assert_eq!(flag(true), "да");
    }
}
