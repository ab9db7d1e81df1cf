use dbtable_core::{
    data::DataValue,
    err::Result,
    framework::{AttributeValue, Filter},
};

use crate::{mapping::SqlParam, query::FilterWhereBuilder, DatabaseTableConfig, SchemaCache};

/// A filter translated into a where clause
#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    pub r#where: FilterWhereBuilder,
    /// False when the clause matches a superset of the filter,
    /// the results must then be filtered locally
    pub exact: bool,
}

/// Translates search filters into where clauses over the table columns.
///
/// Negations are pushed down to the leaves. Conjunctions keep whichever side
/// can be translated, disjunctions require both sides. Filters on binary
/// columns, secrets and multi-valued attributes are not translated.
pub struct DatabaseTableFilterTranslator<'a> {
    conf: &'a DatabaseTableConfig,
    cache: &'a SchemaCache,
}

impl<'a> DatabaseTableFilterTranslator<'a> {
    pub fn new(conf: &'a DatabaseTableConfig, cache: &'a SchemaCache) -> Self {
        Self { conf, cache }
    }

    /// Translates the filter, returning none if no part of it can be expressed in sql
    pub fn translate(&self, filter: &Filter) -> Result<Option<Translation>> {
        self.translate_filter(filter, false)
    }

    fn translate_filter(&self, filter: &Filter, not: bool) -> Result<Option<Translation>> {
        match filter {
            Filter::Not(inner) => self.translate_filter(inner, !not),
            // NOT (a OR b) is NOT a AND NOT b
            Filter::And(l, r) if !not => self.translate_and(l, r, not),
            Filter::Or(l, r) if not => self.translate_and(l, r, not),
            // NOT (a AND b) is NOT a OR NOT b
            Filter::Or(l, r) | Filter::And(l, r) => self.translate_or(l, r, not),
            leaf => self.translate_leaf(leaf, not),
        }
    }

    fn translate_and(&self, l: &Filter, r: &Filter, not: bool) -> Result<Option<Translation>> {
        let l = self.translate_filter(l, not)?;
        let r = self.translate_filter(r, not)?;

        Ok(match (l, r) {
            (Some(l), Some(r)) => Some(Translation {
                exact: l.exact && r.exact,
                r#where: FilterWhereBuilder::join("AND", l.r#where, r.r#where),
            }),
            (Some(t), None) | (None, Some(t)) => Some(Translation { exact: false, ..t }),
            (None, None) => None,
        })
    }

    fn translate_or(&self, l: &Filter, r: &Filter, not: bool) -> Result<Option<Translation>> {
        let l = self.translate_filter(l, not)?;
        let r = self.translate_filter(r, not)?;

        Ok(match (l, r) {
            (Some(l), Some(r)) => Some(Translation {
                exact: l.exact && r.exact,
                r#where: FilterWhereBuilder::join("OR", l.r#where, r.r#where),
            }),
            _ => None,
        })
    }

    fn translate_leaf(&self, filter: &Filter, not: bool) -> Result<Option<Translation>> {
        let attr = match filter.attribute() {
            Some(attr) if attr.values.len() <= 1 => attr,
            _ => return Ok(None),
        };

        let column = match self.conf.column_name(&attr.name) {
            Some(column) if self.cache.column(column).is_some() => column,
            _ => return Ok(None),
        };

        let sql_type = self.cache.column_type(column);
        if sql_type.is_binary() {
            return Ok(None);
        }

        let value = match attr.values.first() {
            Some(AttributeValue::Data(val)) => val.clone(),
            Some(AttributeValue::Secret(_)) => return Ok(None),
            None => DataValue::Null,
        };

        let quoted = self.conf.quote_name(column)?;
        let mut w = FilterWhereBuilder::new();
        let mut exact = true;

        let comparison = |op: &str, negated: &str| if not { negated.to_string() } else { op.to_string() };

        match filter {
            Filter::Equals(_) => {
                if not {
                    w.negate();
                }

                if value.is_null() {
                    w.add_null(&quoted);
                } else {
                    w.add_bind(&quoted, "=", SqlParam::new(column, value, sql_type));
                }
            }
            Filter::GreaterThan(_)
            | Filter::GreaterThanOrEqual(_)
            | Filter::LessThan(_)
            | Filter::LessThanOrEqual(_)
                if !value.is_null() =>
            {
                let op = match filter {
                    Filter::GreaterThan(_) => comparison(">", "<="),
                    Filter::GreaterThanOrEqual(_) => comparison(">=", "<"),
                    Filter::LessThan(_) => comparison("<", ">="),
                    _ => comparison("<=", ">"),
                };

                w.add_bind(&quoted, &op, SqlParam::new(column, value, sql_type));
            }
            Filter::StartsWith(_) | Filter::EndsWith(_) | Filter::Contains(_) => {
                let text = match value {
                    DataValue::Utf8String(text) => text,
                    _ => return Ok(None),
                };

                // wildcards in the value widen the match
                if text.contains(['%', '_']) {
                    if not {
                        return Ok(None);
                    }
                    exact = false;
                }

                let pattern = match filter {
                    Filter::StartsWith(_) => format!("{}%", text),
                    Filter::EndsWith(_) => format!("%{}", text),
                    _ => format!("%{}%", text),
                };

                if not {
                    w.negate();
                }

                w.add_bind(&quoted, "LIKE", SqlParam::new(column, pattern, sql_type));
            }
            _ => return Ok(None),
        }

        Ok(Some(Translation { r#where: w, exact }))
    }
}
