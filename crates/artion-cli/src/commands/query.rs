//! Query command implementation.

use anyhow::{Context, Result, bail};
use clap::Args;

use artion_core::{Direction, FieldValue, Filter, FilterOp, OrderBy};

use crate::cli::StoreOpts;
use crate::{output, store};

/// Filters and ordering shared by `query` and `page`.
#[derive(Args, Debug, Default)]
pub struct ShapeArgs {
    /// Filter as field<op>value with op one of =, <, <=, >, >= (repeatable).
    /// Values are read as JSON when possible, otherwise as strings.
    #[arg(long = "where", value_name = "FILTER")]
    pub filters: Vec<String>,

    /// Field to order by
    #[arg(long)]
    pub order_by: Option<String>,

    /// Order largest first
    #[arg(long, requires = "order_by")]
    pub desc: bool,
}

impl ShapeArgs {
    pub fn filters(&self) -> Result<Vec<Filter>> {
        self.filters.iter().map(|raw| parse_where(raw)).collect()
    }

    pub fn order(&self) -> Option<OrderBy> {
        let direction = if self.desc {
            Direction::Descending
        } else {
            Direction::Ascending
        };
        self.order_by
            .as_ref()
            .map(|field| OrderBy::new(field.as_str(), direction))
    }
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Collection name
    pub collection: String,

    #[command(flatten)]
    pub shape: ShapeArgs,

    /// Maximum number of documents
    #[arg(long)]
    pub limit: Option<u32>,

    /// Pretty-print each document
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: QueryArgs, opts: &StoreOpts) -> Result<()> {
    let db = store::open(opts)?;
    let collection = db.collection(&args.collection).context("Invalid collection")?;

    let mut query = collection
        .query()
        .filters_from(args.shape.filters()?)
        .with_order(args.shape.order());
    if let Some(limit) = args.limit {
        query = query.limit(limit);
    }

    let docs = collection.execute(&query).await.context("Query failed")?;
    output::records(&docs, args.pretty)
}

/// Parse `field<op>value`.
pub fn parse_where(raw: &str) -> Result<Filter> {
    let Some(pos) = raw.find(['<', '>', '=']) else {
        bail!("Filter '{}' has no operator (expected =, <, <=, > or >=)", raw);
    };
    let (field, rest) = raw.split_at(pos);
    let field = field.trim();
    if field.is_empty() {
        bail!("Filter '{}' has no field name", raw);
    }

    let (op, value) = if let Some(v) = rest.strip_prefix(">=") {
        (FilterOp::GreaterThanOrEqual, v)
    } else if let Some(v) = rest.strip_prefix("<=") {
        (FilterOp::LessThanOrEqual, v)
    } else if let Some(v) = rest.strip_prefix('=') {
        (FilterOp::Equal, v)
    } else if let Some(v) = rest.strip_prefix('>') {
        (FilterOp::GreaterThan, v)
    } else if let Some(v) = rest.strip_prefix('<') {
        (FilterOp::LessThan, v)
    } else {
        bail!("Filter '{}' has an unknown operator", raw);
    };

    Ok(Filter::new(field, op, parse_value(value)))
}

fn parse_value(raw: &str) -> FieldValue {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value) => FieldValue::from(value),
        Err(_) => FieldValue::from(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_where_operators() {
        let f = parse_where("viewCount>=10").unwrap();
        assert_eq!(f.field, "viewCount");
        assert_eq!(f.op, FilterOp::GreaterThanOrEqual);
        assert_eq!(f.value, FieldValue::Integer(10));

        assert_eq!(parse_where("rating<4.5").unwrap().op, FilterOp::LessThan);
        assert_eq!(parse_where("rating<=4.5").unwrap().op, FilterOp::LessThanOrEqual);
        assert_eq!(parse_where("rating>4").unwrap().op, FilterOp::GreaterThan);
    }

    #[test]
    fn test_parse_where_string_values() {
        let f = parse_where("category=painting").unwrap();
        assert_eq!(f.op, FilterOp::Equal);
        assert_eq!(f.value, FieldValue::String("painting".into()));

        let f = parse_where(r#"title="10""#).unwrap();
        assert_eq!(f.value, FieldValue::String("10".into()));

        let f = parse_where("startDate=2023/07/01").unwrap();
        assert_eq!(f.value, FieldValue::String("2023/07/01".into()));
    }

    #[test]
    fn test_parse_where_rejects_malformed() {
        assert!(parse_where("viewCount").is_err());
        assert!(parse_where("=10").is_err());
    }
}
