use uuid::Uuid;

/// Comparison operators understood by the SQL renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    ILike,
}

/// A typed bind parameter
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Uuid(Uuid),
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<Uuid> for FilterValue {
    fn from(value: Uuid) -> Self {
        FilterValue::Uuid(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterWhereInfo {
    pub column: String,
    pub operator: FilterOp,
    pub data: FilterValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterOrderInfo {
    pub column: String,
    pub sort: SortDirection,
}

/// Declarative description of a single-table query: conditions (AND-ed),
/// ordering and skip/take pagination.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterData {
    pub where_clause: Vec<FilterWhereInfo>,
    pub order: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl FilterData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_eq(mut self, column: &str, value: impl Into<FilterValue>) -> Self {
        self.where_clause.push(FilterWhereInfo {
            column: column.to_string(),
            operator: FilterOp::Eq,
            data: value.into(),
        });
        self
    }

    /// Case-insensitive substring match; LIKE wildcards in `needle` match literally.
    pub fn where_contains(mut self, column: &str, needle: &str) -> Self {
        self.where_clause.push(FilterWhereInfo {
            column: column.to_string(),
            operator: FilterOp::ILike,
            data: FilterValue::Text(format!("%{}%", escape_like(needle))),
        });
        self
    }

    /// Order spec such as `"created_at desc"` or `"created_at desc, id asc"`.
    pub fn order(mut self, spec: &str) -> Self {
        self.order = Some(spec.to_string());
        self
    }

    pub fn limit(mut self, limit: i64, offset: Option<i64>) -> Self {
        self.limit = Some(limit);
        self.offset = offset;
        self
    }
}

/// Escape `\`, `%` and `_` so user input is matched literally by LIKE/ILIKE.
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<FilterValue>,
}
