//! Typed filter expressions built from query-string keys.
//!
//! `price[gte]=10` becomes `Compare { field: "price", op: Gte, value: 10.0 }`;
//! `color=red` becomes `Eq`, and a repeated plain key becomes `In`.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use mongodb::bson::{Bson, Document};
use strum::EnumString;
use uuid::Uuid;

use crate::error::{QueryError, QueryResult};
use crate::params::QueryParams;
use crate::schema::{FieldKind, QuerySchema};

/// Comparison operators accepted in `field[op]` keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ComparisonOp {
    Gte,
    Gt,
    Lte,
    Lt,
}

impl ComparisonOp {
    /// MongoDB operator name, e.g. `$gte`.
    pub fn operator(&self) -> &'static str {
        match self {
            Self::Gte => "$gte",
            Self::Gt => "$gt",
            Self::Lte => "$lte",
            Self::Lt => "$lt",
        }
    }
}

/// One condition on one field.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpr {
    Eq { field: String, value: Bson },
    In { field: String, values: Vec<Bson> },
    Compare {
        field: String,
        op: ComparisonOp,
        value: Bson,
    },
}

impl FilterExpr {
    pub fn field(&self) -> &str {
        match self {
            Self::Eq { field, .. } | Self::In { field, .. } | Self::Compare { field, .. } => field,
        }
    }
}

/// Split `price[gte]` into `("price", Some(Gte))` and `color` into `("color", None)`.
pub fn parse_key(key: &str) -> QueryResult<(&str, Option<ComparisonOp>)> {
    let Some((field, rest)) = key.split_once('[') else {
        if key.contains(']') || key.is_empty() {
            return Err(QueryError::MalformedKey(key.to_string()));
        }
        return Ok((key, None));
    };

    let op = rest
        .strip_suffix(']')
        .filter(|op| !field.is_empty() && !op.contains(['[', ']']))
        .ok_or_else(|| QueryError::MalformedKey(key.to_string()))?;

    let op = op
        .parse::<ComparisonOp>()
        .map_err(|_| QueryError::UnknownOperator {
            field: field.to_string(),
            op: op.to_string(),
        })?;

    Ok((field, Some(op)))
}

/// Convert a raw string into the BSON value stored for `kind`.
pub fn coerce(field: &str, raw: &str, kind: FieldKind) -> QueryResult<Bson> {
    let invalid = |expected: &'static str| QueryError::InvalidValue {
        field: field.to_string(),
        value: raw.to_string(),
        expected,
    };

    let value = raw.trim();
    match kind {
        FieldKind::String => Ok(Bson::String(raw.to_string())),
        FieldKind::Integer => value
            .parse::<i64>()
            .map(Bson::Int64)
            .map_err(|_| invalid("an integer")),
        FieldKind::Float => value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Bson::Double)
            .ok_or_else(|| invalid("a number")),
        FieldKind::Bool => match value {
            "true" => Ok(Bson::Boolean(true)),
            "false" => Ok(Bson::Boolean(false)),
            _ => Err(invalid("true or false")),
        },
        FieldKind::Uuid => Uuid::parse_str(value)
            .map(|id| Bson::String(id.to_string()))
            .map_err(|_| invalid("a UUID")),
        FieldKind::DateTime => parse_datetime(value)
            .map(|dt| Bson::String(dt.to_rfc3339_opts(SecondsFormat::Millis, true)))
            .ok_or_else(|| invalid("an RFC 3339 timestamp or YYYY-MM-DD date")),
    }
}

fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Turn the non-reserved parameters into filter expressions.
///
/// Operators are validated before the field is looked up, so `x[regex]=1`
/// fails even for a field the schema does not know. Unknown fields are
/// otherwise skipped.
pub fn parse_filters(params: &QueryParams, schema: &QuerySchema) -> QueryResult<Vec<FilterExpr>> {
    let mut exprs = Vec::new();

    for (key, values) in params.filter_entries() {
        let (field, op) = parse_key(key)?;

        let Some(kind) = schema.kind_of(field) else {
            tracing::debug!(field, "Ignoring filter on unknown field");
            continue;
        };

        let expr = match (op, values) {
            (_, []) => continue,
            // Repeated `field[op]` keys: the last one wins
            (Some(op), [.., raw]) => FilterExpr::Compare {
                field: field.to_string(),
                op,
                value: coerce(field, raw, kind)?,
            },
            (None, [raw]) => FilterExpr::Eq {
                field: field.to_string(),
                value: coerce(field, raw, kind)?,
            },
            (None, values) => FilterExpr::In {
                field: field.to_string(),
                values: values
                    .iter()
                    .map(|raw| coerce(field, raw, kind))
                    .collect::<QueryResult<_>>()?,
            },
        };
        exprs.push(expr);
    }

    Ok(exprs)
}

/// Fold expressions into one MongoDB filter document.
///
/// Conditions on the same field share one operator document, so
/// `price[gte]=10&price[lte]=50` yields `{ price: { $gte: 10, $lte: 50 } }`.
pub fn to_document(exprs: Vec<FilterExpr>) -> Document {
    let mut filter = Document::new();

    for expr in exprs {
        let (field, operator, value) = match expr {
            FilterExpr::Eq { field, value } => (field, "$eq", value),
            FilterExpr::In { field, values } => (field, "$in", Bson::Array(values)),
            FilterExpr::Compare { field, op, value } => (field, op.operator(), value),
        };

        match filter.remove(&field) {
            Some(Bson::Document(mut ops)) => {
                ops.insert(operator, value);
                filter.insert(field, ops);
            }
            Some(existing) => {
                // `existing` is a plain equality value
                let mut ops = Document::new();
                ops.insert("$eq", existing);
                ops.insert(operator, value);
                filter.insert(field, ops);
            }
            None if operator == "$eq" => {
                filter.insert(field, value);
            }
            None => {
                let mut ops = Document::new();
                ops.insert(operator, value);
                filter.insert(field, ops);
            }
        }
    }

    filter
}
