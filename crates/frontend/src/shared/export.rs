/// Экспорт данных в CSV (Excel) и печать
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use crate::shared::api_utils;

/// Trait для типов, которые могут быть экспортированы в Excel
pub trait ExcelExportable {
    /// Возвращает массив заголовков колонок
    fn headers() -> Vec<&'static str>;

    /// Преобразует объект в массив значений для CSV
    fn to_csv_row(&self) -> Vec<String>;
}

/// CSV с BOM и разделителем `;`, как его ждёт Excel
pub fn csv_document<T: ExcelExportable>(data: &[T]) -> String {
    let mut csv_content = String::new();

    // UTF-8 BOM для кириллицы в Excel
    csv_content.push('\u{FEFF}');
    csv_content.push_str(&T::headers().join(";"));
    csv_content.push('\n');

    for item in data {
        let escaped_row: Vec<String> = item
            .to_csv_row()
            .iter()
            .map(|cell| escape_csv_cell(cell))
            .collect();
        csv_content.push_str(&escaped_row.join(";"));
        csv_content.push('\n');
    }
    csv_content
}

/// Экспортирует отображаемые строки в CSV файл и инициирует скачивание
pub fn export_to_excel<T: ExcelExportable>(data: &[T], filename: &str) -> Result<(), String> {
    if data.is_empty() {
        return Err("Нет данных для экспорта".to_string());
    }
    let blob = create_csv_blob(&csv_document(data))?;
    download_blob(&blob, filename)
}

/// Полная выгрузка коллекции с сервера (`/api/export/:collection`)
pub async fn download_server_export(collection: &str) -> Result<(), String> {
    let content = api_utils::get_text(&format!("/api/export/{}", collection)).await?;
    let blob = create_csv_blob(&content)?;
    let filename = format!(
        "{}_{}.csv",
        collection,
        chrono::Local::now().format("%Y%m%d_%H%M")
    );
    download_blob(&blob, &filename)
}

/// Печать текущей страницы (браузер предлагает сохранить в PDF)
pub fn print_page() -> Result<(), String> {
    web_sys::window()
        .ok_or("No window object")?
        .print()
        .map_err(|e| format!("Failed to print: {:?}", e))
}

/// Экранирует CSV ячейку если необходимо
fn escape_csv_cell(cell: &str) -> String {
    if cell.contains(';') || cell.contains('"') || cell.contains('\n') || cell.contains('\r') {
        let escaped = cell.replace('"', "\"\"");
        format!("\"{}\"", escaped)
    } else {
        cell.to_string()
    }
}

/// Число для CSV: десятичная запятая
pub fn csv_number(value: f64) -> String {
    format!("{:.2}", value).replace('.', ",")
}

fn create_csv_blob(content: &str) -> Result<Blob, String> {
    let array = js_sys::Array::new();
    array.push(&wasm_bindgen::JsValue::from_str(content));

    let properties = BlobPropertyBag::new();
    properties.set_type("text/csv;charset=utf-8;");

    Blob::new_with_str_sequence_and_options(&array, &properties)
        .map_err(|e| format!("Failed to create blob: {:?}", e))
}

/// Инициирует скачивание Blob через браузер
fn download_blob(blob: &Blob, filename: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("No window object")?;
    let document = window.document().ok_or("No document object")?;

    let url = Url::create_object_url_with_blob(blob)
        .map_err(|e| format!("Failed to create object URL: {:?}", e))?;

    let anchor = document
        .create_element("a")
        .map_err(|e| format!("Failed to create anchor: {:?}", e))?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|e| format!("Failed to cast to anchor: {:?}", e))?;

    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor
        .style()
        .set_property("display", "none")
        .map_err(|e| format!("Failed to set style: {:?}", e))?;

    let body = document.body().ok_or("No body element")?;
    body.append_child(&anchor)
        .map_err(|e| format!("Failed to append anchor: {:?}", e))?;
    anchor.click();
    body.remove_child(&anchor)
        .map_err(|e| format!("Failed to remove anchor: {:?}", e))?;

    Url::revoke_object_url(&url).map_err(|e| format!("Failed to revoke URL: {:?}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Line {
        name: &'static str,
        amount: f64,
    }

    impl ExcelExportable for Line {
        fn headers() -> Vec<&'static str> {
            vec!["Название", "Сумма"]
        }

        fn to_csv_row(&self) -> Vec<String> {
            vec![self.name.to_string(), csv_number(self.amount)]
        }
    }

    #[test]
    fn document_has_bom_header_and_escaped_cells() {
        let rows = [
            Line { name: "Шины; зимние", amount: 1200.5 },
            Line { name: "Масло \"5W-30\"", amount: 0.0 },
        ];
        let csv = csv_document(&rows);
        assert!(csv.starts_with('\u{FEFF}'));
        let lines: Vec<&str> = csv.trim_start_matches('\u{FEFF}').lines().collect();
        assert_eq!(lines[0], "Название;Сумма");
        assert_eq!(lines[1], "\"Шины; зимние\";1200,50");
        assert_eq!(lines[2], "\"Масло \"\"5W-30\"\"\";0,00");
    }

    #[test]
    fn plain_cells_are_not_quoted() {
        assert_eq!(escape_csv_cell("А123ВС77"), "А123ВС77");
        assert_eq!(escape_csv_cell("строка\nдве"), "\"строка\nдве\"");
    }
}
