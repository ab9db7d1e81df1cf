use crate::mapping::SqlParam;

/// Accumulates a where clause and the values bound to its placeholders
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FilterWhereBuilder {
    clause: String,
    params: Vec<SqlParam>,
    /// Set once the clause is a compound expression
    compound: bool,
}

impl FilterWhereBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Joins the two clauses with the logical operator.
    /// Compound operands are wrapped in parentheses.
    pub fn join(operator: &str, left: FilterWhereBuilder, right: FilterWhereBuilder) -> Self {
        let mut joined = Self {
            clause: String::new(),
            params: Vec::with_capacity(left.params.len() + right.params.len()),
            compound: true,
        };

        joined.append_operand(left);
        joined.clause.push_str(&format!(" {} ", operator));
        joined.append_operand(right);

        joined
    }

    fn append_operand(&mut self, operand: FilterWhereBuilder) {
        if operand.compound {
            self.clause.push_str(&format!("( {} )", operand.clause));
        } else {
            self.clause.push_str(&operand.clause);
        }

        self.params.extend(operand.params);
    }

    /// Prefixes the next condition with `NOT`
    pub fn negate(&mut self) -> &mut Self {
        self.clause.push_str("NOT ");
        self
    }

    /// Adds a `col op ?` condition
    pub fn add_bind(&mut self, column: &str, operator: &str, param: SqlParam) -> &mut Self {
        self.clause.push_str(&format!("{} {} ?", column, operator));
        self.params.push(param);
        self
    }

    /// Adds a `col IS NULL` condition
    pub fn add_null(&mut self, column: &str) -> &mut Self {
        self.clause.push_str(&format!("{} IS NULL", column));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.clause.is_empty()
    }

    pub fn clause(&self) -> &str {
        &self.clause
    }

    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }

    pub fn into_params(self) -> Vec<SqlParam> {
        self.params
    }
}
