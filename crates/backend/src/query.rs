use std::fmt::{self, Display};

use itertools::Itertools;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

/// A read against one table of the row store, rendered to the REST query
/// parameters understood by the backend.
///
/// ```text
/// Query::table("race_results")
///     .select("*,races!inner(id,name,date)")
///     .eq("pilot_id", 5)
///     .order_embedded("races", "date", Order::Asc)
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    table: &'static str,
    select: String,
    filters: Vec<(String, String)>,
    order: Vec<String>,
    limit: Option<usize>,
    single: bool,
}

impl Query {
    pub fn table(table: &'static str) -> Self {
        Self {
            table,
            select: "*".to_owned(),
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
            single: false,
        }
    }

    pub fn table_name(&self) -> &'static str {
        self.table
    }

    /// Column selection, including nested expansion like
    /// `*,races(id,name)`.
    pub fn select(mut self, columns: &str) -> Self {
        self.select = columns.to_owned();
        self
    }

    fn filter(mut self, column: &str, operator: &str, value: impl Display) -> Self {
        self.filters
            .push((column.to_owned(), format!("{operator}.{value}")));
        self
    }

    pub fn eq(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "eq", value)
    }

    pub fn gte(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "gte", value)
    }

    pub fn lte(self, column: &str, value: impl Display) -> Self {
        self.filter(column, "lte", value)
    }

    pub fn is_in<I>(self, column: &str, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        let values = values.into_iter().join(",");
        self.filter(column, "in", format!("({values})"))
    }

    pub fn order(mut self, column: &str, order: Order) -> Self {
        self.order.push(format!("{column}.{order}"));
        self
    }

    /// Orders by a column of an embedded relation, e.g. the date of the
    /// race a result belongs to.
    pub fn order_embedded(mut self, relation: &str, column: &str, order: Order) -> Self {
        self.order.push(format!("{relation}({column}).{order}"));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Exactly one row is expected; zero rows are reported as an error by
    /// the backend.
    pub fn single(mut self) -> Self {
        self.single = true;
        self
    }

    pub fn is_single(&self) -> bool {
        self.single
    }

    pub fn params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_owned(), self.select.clone())];
        params.extend(self.filters.iter().cloned());
        if !self.order.is_empty() {
            params.push(("order".to_owned(), self.order.join(",")));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_owned(), limit.to_string()));
        }
        params
    }
}

impl Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let params = self
            .params()
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .join("&");
        write!(f, "{}?{}", self.table, params)
    }
}
