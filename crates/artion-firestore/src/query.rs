//! `runQuery` request and response types.

use serde::{Deserialize, Serialize};

use artion_core::query::{Direction, FilterOp};
use artion_core::{Filter, Query, StoreUrl};

use crate::value::{WireDocument, WireValue};

/// Pseudo-field naming the document itself, used as an ordering tie-break.
const NAME_FIELD: &str = "__name__";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RunQueryRequest {
    pub structured_query: StructuredQuery,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StructuredQuery {
    pub from: Vec<CollectionSelector>,
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    pub filter: Option<WireFilter>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<WireOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<WireCursor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CollectionSelector {
    pub collection_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) enum WireFilter {
    FieldFilter(FieldFilter),
    CompositeFilter(CompositeFilter),
}

#[derive(Debug, Serialize)]
pub(crate) struct FieldFilter {
    pub field: FieldReference,
    pub op: &'static str,
    pub value: WireValue,
}

#[derive(Debug, Serialize)]
pub(crate) struct CompositeFilter {
    pub op: &'static str,
    pub filters: Vec<WireFilter>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FieldReference {
    pub field_path: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct WireOrder {
    pub field: FieldReference,
    pub direction: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct WireCursor {
    pub values: Vec<WireValue>,
    pub before: bool,
}

/// One element of the streamed `runQuery` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RunQueryResponseItem {
    pub document: Option<WireDocument>,
    #[allow(dead_code)]
    pub read_time: Option<String>,
}

impl RunQueryRequest {
    /// Translate a query into a structured query against `base`.
    ///
    /// Every ordering gets an explicit `__name__` tie-break in the same
    /// direction, so cursors can resume strictly after the last document.
    pub fn new(base: &StoreUrl, query: &Query) -> Self {
        let mut filters: Vec<WireFilter> = query.filters().iter().map(field_filter).collect();
        let filter = match filters.len() {
            0 => None,
            1 => filters.pop(),
            _ => Some(WireFilter::CompositeFilter(CompositeFilter {
                op: "AND",
                filters,
            })),
        };

        let direction = query.order().map(|o| o.direction).unwrap_or_default();
        let mut order_by = Vec::new();
        if let Some(order) = query.order() {
            order_by.push(WireOrder::new(&order.field, direction));
        }
        if query.order().is_some() || query.cursor().is_some() {
            order_by.push(WireOrder {
                field: FieldReference {
                    field_path: NAME_FIELD.to_string(),
                },
                direction: direction_name(direction),
            });
        }

        let start_at = query.cursor().map(|cursor| {
            let mut values = Vec::new();
            if query.order().is_some() {
                values.push(
                    cursor
                        .order_value()
                        .map(WireValue::from)
                        .unwrap_or(WireValue::NullValue(())),
                );
            }
            values.push(WireValue::ReferenceValue(
                base.document_name(query.collection(), cursor.document_id()),
            ));
            WireCursor {
                values,
                before: false,
            }
        });

        Self {
            structured_query: StructuredQuery {
                from: vec![CollectionSelector {
                    collection_id: query.collection().to_string(),
                }],
                filter,
                order_by,
                start_at,
                limit: query.limit_value(),
            },
        }
    }
}

impl WireOrder {
    fn new(field: &str, direction: Direction) -> Self {
        Self {
            field: FieldReference {
                field_path: field_path(field),
            },
            direction: direction_name(direction),
        }
    }
}

fn field_filter(filter: &Filter) -> WireFilter {
    WireFilter::FieldFilter(FieldFilter {
        field: FieldReference {
            field_path: field_path(&filter.field),
        },
        op: op_name(filter.op),
        value: WireValue::from(&filter.value),
    })
}

fn op_name(op: FilterOp) -> &'static str {
    match op {
        FilterOp::Equal => "EQUAL",
        FilterOp::LessThan => "LESS_THAN",
        FilterOp::LessThanOrEqual => "LESS_THAN_OR_EQUAL",
        FilterOp::GreaterThan => "GREATER_THAN",
        FilterOp::GreaterThanOrEqual => "GREATER_THAN_OR_EQUAL",
    }
}

fn direction_name(direction: Direction) -> &'static str {
    match direction {
        Direction::Ascending => "ASCENDING",
        Direction::Descending => "DESCENDING",
    }
}

/// Quote a top-level field name unless it is a simple identifier.
pub(crate) fn field_path(name: &str) -> String {
    let mut chars = name.chars();
    let simple = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if simple {
        name.to_string()
    } else {
        format!("`{}`", name.replace('\\', "\\\\").replace('`', "\\`"))
    }
}
