//! Column specifications from configuration.
//!
//! A `[[columns]]` entry names a dotted field path into each JSON row and how to
//! format it. Specs become [`ColumnDescriptor`]s with accessor closures.

use super::loader::ConfigError;
use crate::model::{AccessorError, Align, CellValue, ColumnDescriptor, JsonRow};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::fmt::Write as _;

/// Currency prefix when a currency column does not set one.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "R$ ";

/// `chrono` strftime format when a date column does not set one.
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";

/// How a column turns a JSON value into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellFormat {
    /// Strings as-is, numbers and booleans in their JSON form.
    #[default]
    Text,
    /// Number with two decimals behind a currency symbol.
    Currency,
    /// Timestamp rendered as a UTC calendar date.
    Date,
}

/// One `[[columns]]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnSpec {
    /// Header label.
    pub label: String,
    /// Dotted path into the row (`user.name`).
    pub field: String,
    /// Width in terminal columns.
    pub width: u16,
    /// Alignment of header and cells.
    #[serde(default)]
    pub align: Align,
    /// How the field value is displayed.
    #[serde(default)]
    pub format: CellFormat,
    /// Prefix for `currency` columns (default `R$ `).
    #[serde(default)]
    pub currency_symbol: Option<String>,
    /// strftime pattern for `date` columns (default `%d/%m/%Y`).
    #[serde(default)]
    pub date_format: Option<String>,
}

impl ColumnSpec {
    /// Left-aligned text column.
    pub fn text(label: &str, field: &str, width: u16) -> Self {
        Self {
            label: label.to_string(),
            field: field.to_string(),
            width,
            align: Align::Left,
            format: CellFormat::Text,
            currency_symbol: None,
            date_format: None,
        }
    }

    /// Set the alignment.
    pub fn aligned(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// Set the display format.
    pub fn formatted(mut self, format: CellFormat) -> Self {
        self.format = format;
        self
    }

    /// Build the column descriptor for JSON rows.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidColumn`] for an unusable date format.
    pub fn to_descriptor(&self) -> Result<ColumnDescriptor<JsonRow>, ConfigError> {
        let field = self.field.clone();
        let descriptor = match self.format {
            CellFormat::Text => {
                ColumnDescriptor::new(&self.label, self.width, move |row: &JsonRow| {
                    text_value(row, &field)
                })
            }
            CellFormat::Currency => {
                let symbol = self
                    .currency_symbol
                    .clone()
                    .unwrap_or_else(|| DEFAULT_CURRENCY_SYMBOL.to_string());
                ColumnDescriptor::new(&self.label, self.width, move |row: &JsonRow| {
                    currency_value(row, &field, &symbol)
                })
            }
            CellFormat::Date => {
                let format = self
                    .date_format
                    .clone()
                    .unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string());
                if StrftimeItems::new(&format).any(|item| matches!(item, Item::Error)) {
                    return Err(ConfigError::InvalidColumn {
                        label: self.label.clone(),
                        reason: format!("invalid date format '{format}'"),
                    });
                }
                ColumnDescriptor::new(&self.label, self.width, move |row: &JsonRow| {
                    date_value(row, &field, &format)
                })
            }
        };
        Ok(descriptor.with_align(self.align))
    }
}

/// Product listing columns used when the configuration defines none.
pub fn default_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::text("ID", "id", 8).aligned(Align::Right),
        ColumnSpec::text("Produto", "name", 15),
        ColumnSpec::text("Descrição", "description", 25),
        ColumnSpec::text("Preço", "price", 10)
            .aligned(Align::Right)
            .formatted(CellFormat::Currency),
        ColumnSpec::text("Método Pagamento", "paymentMethod", 15),
        ColumnSpec::text("Data Criação", "date", 15).formatted(CellFormat::Date),
        ColumnSpec::text("Usuário", "user.name", 15),
    ]
}

/// Build descriptors for every spec, in order.
///
/// # Errors
///
/// Returns the first [`ConfigError`] encountered.
pub fn build_columns(specs: &[ColumnSpec]) -> Result<Vec<ColumnDescriptor<JsonRow>>, ConfigError> {
    specs.iter().map(ColumnSpec::to_descriptor).collect()
}

fn field<'a>(row: &'a JsonRow, path: &str) -> Result<&'a Value, AccessorError> {
    row.field(path)
        .ok_or_else(|| AccessorError::MissingField(path.to_string()))
}

fn text_value(row: &JsonRow, path: &str) -> Result<CellValue, AccessorError> {
    match field(row, path)? {
        Value::String(s) => Ok(CellValue::Text(s.clone())),
        Value::Number(n) => Ok(match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => CellValue::Integer(i),
            (None, Some(x)) => CellValue::Decimal(x),
            (None, None) => CellValue::Text(n.to_string()),
        }),
        Value::Bool(b) => Ok(CellValue::Text(b.to_string())),
        _ => Err(AccessorError::UnexpectedType {
            field: path.to_string(),
            expected: "string, number or boolean",
        }),
    }
}

fn currency_value(row: &JsonRow, path: &str, symbol: &str) -> Result<CellValue, AccessorError> {
    let amount = match field(row, path)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| AccessorError::UnexpectedType {
        field: path.to_string(),
        expected: "number",
    })?;

    if !amount.is_finite() {
        return Err(AccessorError::InvalidValue(amount.to_string()));
    }
    Ok(CellValue::Text(format!("{symbol}{amount:.2}")))
}

fn date_value(row: &JsonRow, path: &str, format: &str) -> Result<CellValue, AccessorError> {
    let timestamp = match field(row, path)? {
        Value::String(s) => parse_timestamp(s)?,
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .ok_or_else(|| AccessorError::Format {
                raw: n.to_string(),
                reason: "not a millisecond timestamp".to_string(),
            })?,
        _ => {
            return Err(AccessorError::UnexpectedType {
                field: path.to_string(),
                expected: "date string or epoch milliseconds",
            })
        }
    };

    let mut text = String::new();
    write!(text, "{}", timestamp.format(format)).map_err(|_| AccessorError::Format {
        raw: timestamp.to_rfc3339(),
        reason: format!("cannot apply format '{format}'"),
    })?;
    Ok(CellValue::Text(text))
}

/// Parse RFC 3339, a naive ISO date-time (taken as UTC) or a bare ISO date.
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, AccessorError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN).and_utc());
    }
    Err(AccessorError::Format {
        raw: raw.to_string(),
        reason: "unrecognized date".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ColumnModel, PLACEHOLDER};
    use serde_json::json;

    fn row(value: Value) -> JsonRow {
        JsonRow::new(value, "id", 1)
    }

    fn render(spec: ColumnSpec, value: Value) -> String {
        let model = ColumnModel::new(vec![spec.to_descriptor().unwrap()]).unwrap();
        model.render(0, &row(value)).text
    }

    #[test]
    fn text_column_shows_strings_and_numbers() {
        assert_eq!(render(ColumnSpec::text("Name", "name", 10), json!({"name": "Lamp"})), "Lamp");
        assert_eq!(render(ColumnSpec::text("ID", "id", 10), json!({"id": 42})), "42");
        assert_eq!(render(ColumnSpec::text("Ok", "ok", 10), json!({"ok": true})), "true");
    }

    #[test]
    fn nested_field_is_followed() {
        let spec = ColumnSpec::text("User", "user.name", 10);
        assert_eq!(render(spec, json!({"user": {"name": "Ana"}})), "Ana");
    }

    #[test]
    fn missing_nested_field_renders_placeholder() {
        let spec = ColumnSpec::text("User", "user.name", 10);
        assert_eq!(render(spec.clone(), json!({"user": null})), PLACEHOLDER);
        assert_eq!(render(spec, json!({})), PLACEHOLDER);
    }

    #[test]
    fn object_value_in_text_column_renders_placeholder() {
        let spec = ColumnSpec::text("User", "user", 10);
        assert_eq!(render(spec, json!({"user": {"name": "Ana"}})), PLACEHOLDER);
    }

    #[test]
    fn currency_has_two_decimals_and_symbol() {
        let spec = ColumnSpec::text("Preço", "price", 10).formatted(CellFormat::Currency);
        assert_eq!(render(spec.clone(), json!({"price": 19.9})), "R$ 19.90");
        assert_eq!(render(spec.clone(), json!({"price": 5})), "R$ 5.00");
        assert_eq!(render(spec, json!({"price": "7.5"})), "R$ 7.50");
    }

    #[test]
    fn currency_symbol_is_configurable() {
        let mut spec = ColumnSpec::text("Price", "price", 10).formatted(CellFormat::Currency);
        spec.currency_symbol = Some("$".to_string());
        assert_eq!(render(spec, json!({"price": 3.5})), "$3.50");
    }

    #[test]
    fn non_numeric_price_renders_placeholder() {
        let spec = ColumnSpec::text("Preço", "price", 10).formatted(CellFormat::Currency);
        assert_eq!(render(spec, json!({"price": "free"})), PLACEHOLDER);
    }

    #[test]
    fn date_is_formatted_in_utc() {
        let spec = ColumnSpec::text("Data", "date", 12).formatted(CellFormat::Date);
        assert_eq!(
            render(spec.clone(), json!({"date": "2024-03-01T01:30:00-03:00"})),
            "01/03/2024"
        );
        // 23:30 at -03:00 is already the next day in UTC
        assert_eq!(
            render(spec.clone(), json!({"date": "2024-02-29T23:30:00-03:00"})),
            "01/03/2024"
        );
        assert_eq!(render(spec.clone(), json!({"date": "2024-12-25"})), "25/12/2024");
        assert_eq!(
            render(spec, json!({"date": "2024-12-25T10:00:00.123"})),
            "25/12/2024"
        );
    }

    #[test]
    fn epoch_millis_are_dates() {
        let spec = ColumnSpec::text("Data", "date", 12).formatted(CellFormat::Date);
        assert_eq!(render(spec, json!({"date": 0})), "01/01/1970");
    }

    #[test]
    fn unparseable_date_renders_placeholder() {
        let spec = ColumnSpec::text("Data", "date", 12).formatted(CellFormat::Date);
        assert_eq!(render(spec, json!({"date": "yesterday"})), PLACEHOLDER);
    }

    #[test]
    fn invalid_date_format_is_a_config_error() {
        let mut spec = ColumnSpec::text("Data", "date", 12).formatted(CellFormat::Date);
        spec.date_format = Some("%Q".to_string());
        assert!(matches!(
            spec.to_descriptor(),
            Err(ConfigError::InvalidColumn { .. })
        ));
    }

    #[test]
    fn default_columns_follow_product_listing() {
        let specs = default_columns();
        let labels: Vec<_> = specs.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "ID",
                "Produto",
                "Descrição",
                "Preço",
                "Método Pagamento",
                "Data Criação",
                "Usuário"
            ]
        );
        let widths: Vec<_> = specs.iter().map(|s| s.width).collect();
        assert_eq!(widths, vec![8, 15, 25, 10, 15, 15, 15]);
        assert!(build_columns(&specs).is_ok());
    }

    #[test]
    fn column_spec_deserializes_from_toml() {
        let spec: ColumnSpec = toml::from_str(
            r#"
label = "Total"
field = "amount"
width = 12
align = "right"
format = "currency"
currency_symbol = "€ "
"#,
        )
        .unwrap();
        assert_eq!(spec.align, Align::Right);
        assert_eq!(spec.format, CellFormat::Currency);
        assert_eq!(spec.currency_symbol.as_deref(), Some("€ "));
    }
}
