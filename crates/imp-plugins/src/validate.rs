//! Generic row checks driven by field validation hints.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use imp_model::{FieldCatalog, FieldType, RowValidation, TargetField};
use regex::Regex;
use serde_json::Value;

use crate::row::{Row, split_list};

/// Checks `row` against every field of `catalog`.
///
/// Required fields must be non-blank. Non-blank values are checked against
/// the field's pattern, length or numeric bounds, enum options and type.
/// Array fields are split on commas and each item is checked on its own.
/// A pattern that fails to compile yields a warning, not an error.
pub fn validate_against_catalog(catalog: &FieldCatalog, row: &Row) -> RowValidation {
    let mut result = RowValidation::from_errors(Vec::new());
    for field in catalog.iter() {
        result = result.merge(check_field(field, row.get(&field.key)));
    }
    result
}

fn check_field(field: &TargetField, value: Option<&Value>) -> RowValidation {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let items = values_of(field, value);
    if items.is_empty() {
        if field.required {
            errors.push(format!("{} is required", field.label));
        }
        return RowValidation {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        };
    }

    let regex = match field.validation.as_ref().and_then(|v| v.pattern.as_deref()) {
        Some(pattern) => match Regex::new(pattern) {
            Ok(re) => Some(re),
            Err(e) => {
                warnings.push(format!("{}: pattern not checked ({e})", field.label));
                None
            }
        },
        None => None,
    };

    for item in &items {
        if let Some(re) = &regex
            && !re.is_match(item)
        {
            errors.push(format!("{}: invalid format: {item}", field.label));
        }
        check_bounds(field, item, &mut errors);
        check_options(field, item, &mut errors);
        check_type(field, item, &mut errors);
    }

    RowValidation {
        is_valid: errors.is_empty(),
        errors,
        warnings,
    }
}

fn values_of(field: &TargetField, value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) if field.value_type == FieldType::Array => split_list(s),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Vec::new()
            } else {
                vec![trimmed.to_string()]
            }
        }
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| match v {
                Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Some(Value::Number(n)) => vec![n.to_string()],
        Some(Value::Bool(b)) => vec![b.to_string()],
        _ => Vec::new(),
    }
}

fn check_bounds(field: &TargetField, item: &str, errors: &mut Vec<String>) {
    let Some(validation) = &field.validation else {
        return;
    };
    if validation.min.is_none() && validation.max.is_none() {
        return;
    }

    if field.value_type == FieldType::Number {
        let Ok(number) = item.parse::<f64>() else {
            return;
        };
        if validation.min.is_some_and(|min| number < min) {
            errors.push(format!("{} must be at least {}", field.label, fmt_bound(validation.min)));
        }
        if validation.max.is_some_and(|max| number > max) {
            errors.push(format!("{} must be at most {}", field.label, fmt_bound(validation.max)));
        }
        return;
    }

    let length = item.chars().count() as f64;
    if validation.min.is_some_and(|min| length < min) {
        errors.push(format!(
            "{} must be at least {} characters",
            field.label,
            fmt_bound(validation.min)
        ));
    }
    if validation.max.is_some_and(|max| length > max) {
        errors.push(format!(
            "{} must be at most {} characters",
            field.label,
            fmt_bound(validation.max)
        ));
    }
}

fn fmt_bound(bound: Option<f64>) -> String {
    bound.map(|b| b.to_string()).unwrap_or_default()
}

fn check_options(field: &TargetField, item: &str, errors: &mut Vec<String>) {
    let Some(validation) = &field.validation else {
        return;
    };
    if validation.enum_options.is_empty() {
        return;
    }
    if !validation
        .enum_options
        .iter()
        .any(|option| option.eq_ignore_ascii_case(item))
    {
        errors.push(format!(
            "{}: invalid value {item}. Allowed values: {}",
            field.label,
            validation.enum_options.join(", ")
        ));
    }
}

fn check_type(field: &TargetField, item: &str, errors: &mut Vec<String>) {
    match field.value_type {
        FieldType::Number if item.parse::<f64>().is_err() => {
            errors.push(format!("{}: not a number: {item}", field.label));
        }
        FieldType::Date if parse_datetime(item).is_none() => {
            errors.push(format!("{}: not a date: {item}", field.label));
        }
        _ => {}
    }
}

/// Parses RFC 3339, `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD HH:MM:SS` or
/// `YYYY-MM-DD` (local forms are taken as UTC).
pub(crate) fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
