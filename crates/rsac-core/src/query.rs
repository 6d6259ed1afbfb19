//! Parameterized SQL construction for report listing, counting, summation and
//! grouped aggregation.
//!
//! Safety model: identifiers (table and column names) only ever come from the
//! static [`crate::registry`]; anything that originates in a request travels
//! as a bound parameter. The builders here return [`SqlQuery`] values that the
//! store executes verbatim, which also makes every query shape assertable in
//! unit tests without a database.

use crate::alias;
use crate::registry::Capabilities;

/// Upper bound on district chart buckets in the no-district view.
pub const TOP_DISTRICTS: i64 = 15;

/// A bound query parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Int(i64),
}

/// SQL text plus its bound parameters, in `$1..$n` order.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

/// Incremental writer that keeps SQL text and parameter numbering in sync.
struct SqlWriter {
    sql: String,
    params: Vec<SqlParam>,
}

impl SqlWriter {
    fn new() -> Self {
        Self {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push(&mut self, fragment: &str) {
        self.sql.push_str(fragment);
    }

    /// Register a parameter and return its `$n` placeholder.
    fn bind(&mut self, param: SqlParam) -> String {
        self.params.push(param);
        format!("${}", self.params.len())
    }

    fn finish(self) -> SqlQuery {
        SqlQuery {
            sql: self.sql,
            params: self.params,
        }
    }
}

/// District filter resolved from request input.
///
/// A spelling of the merged district widens into the normalized alias
/// IN-list; any other value becomes a case-insensitive equality match.
#[derive(Debug, Clone, PartialEq)]
pub enum DistrictFilter {
    Exact(String),
    AliasSet { keys: Vec<String> },
}

/// Build the district filter for a request, if any.
///
/// Datasets without a district column ignore the parameter entirely, matching
/// the behavior of the capability-driven column list.
pub fn district_filter(input: Option<&str>, caps: &Capabilities) -> Option<DistrictFilter> {
    let value = input?.trim();
    if value.is_empty() || !caps.district {
        return None;
    }
    if alias::is_merged(value) {
        Some(DistrictFilter::AliasSet {
            keys: alias::merged_normalized_keys(),
        })
    } else {
        Some(DistrictFilter::Exact(value.to_string()))
    }
}

impl DistrictFilter {
    /// Append this filter's predicate (without the WHERE/AND keyword).
    fn write_predicate(&self, w: &mut SqlWriter) {
        match self {
            DistrictFilter::Exact(value) => {
                let p = w.bind(SqlParam::Text(value.clone()));
                w.push(&format!("LOWER(district) = LOWER({p})"));
            }
            DistrictFilter::AliasSet { keys } => {
                let placeholders: Vec<String> = keys
                    .iter()
                    .map(|k| w.bind(SqlParam::Text(k.clone())))
                    .collect();
                w.push(&format!(
                    "LOWER(REPLACE(district, ' ', '')) IN ({})",
                    placeholders.join(", ")
                ));
            }
        }
    }
}

fn write_where(w: &mut SqlWriter, filter: Option<&DistrictFilter>) {
    if let Some(filter) = filter {
        w.push(" WHERE ");
        filter.write_predicate(w);
    }
}

/// Opt-in pagination window. Construction fails (returns `None`) for
/// non-positive values, which keeps fetch-all a distinct mode rather than a
/// page=1 fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    page: u32,
    per_page: u32,
}

impl PageWindow {
    pub fn new(page: u32, per_page: u32) -> Option<Self> {
        if page >= 1 && per_page >= 1 {
            Some(Self { page, per_page })
        } else {
            None
        }
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.per_page)
    }
}

/// Grouping key for chart aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    District,
    Site,
    Habitat,
}

impl GroupKey {
    pub fn column(&self) -> &'static str {
        match self {
            GroupKey::District => "district",
            GroupKey::Site => "site",
            GroupKey::Habitat => "habitat",
        }
    }
}

/// One selected column: physical name plus optional output alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub alias: Option<&'static str>,
    /// Optional columns are verified against the physical schema by the
    /// column resolver before the select runs; required ones are guaranteed
    /// by the registry.
    pub optional: bool,
}

impl ColumnSpec {
    const fn required(name: &'static str) -> Self {
        Self {
            name,
            alias: None,
            optional: false,
        }
    }

    const fn optional(name: &'static str) -> Self {
        Self {
            name,
            alias: None,
            optional: true,
        }
    }

    /// Name the column carries in the result set.
    pub fn output_name(&self) -> &'static str {
        self.alias.unwrap_or(self.name)
    }

    fn select_expr(&self) -> String {
        match self.alias {
            Some(alias) => format!("{} AS {}", self.name, alias),
            None => self.name.to_string(),
        }
    }
}

/// Deterministic report column list for a capability set.
///
/// Order is fixed: district first when present, then the base census columns,
/// then the optional attributes in a stable sequence. Consumers (export
/// headers in particular) rely on this order being reproducible.
pub fn report_columns(caps: &Capabilities) -> Vec<ColumnSpec> {
    let mut columns = Vec::new();

    if caps.district {
        columns.push(ColumnSpec::required("district"));
    }

    columns.push(ColumnSpec::required("gid"));
    columns.push(ColumnSpec::required("latitude"));
    columns.push(ColumnSpec::required("longitude"));
    columns.push(ColumnSpec::required("habitat"));
    columns.push(ColumnSpec {
        name: "sarus_coun",
        alias: Some("sarus_count"),
        optional: false,
    });

    if caps.site {
        columns.push(ColumnSpec::optional("site"));
    }
    if caps.range_forest {
        columns.push(ColumnSpec::optional("range_fore"));
    }
    if caps.colony {
        columns.push(ColumnSpec::optional("name_of_co"));
    }
    if caps.adults {
        columns.push(ColumnSpec::optional("adults"));
    }
    if caps.juvenile {
        columns.push(ColumnSpec::optional("juvenile"));
    }
    if caps.nests {
        columns.push(ColumnSpec::optional("nests"));
    }
    if caps.threats {
        columns.push(ColumnSpec::optional("threats"));
    }

    // Observation date exists in most but not all historical snapshots; the
    // column resolver drops it where the physical table lacks it.
    columns.push(ColumnSpec::optional("date"));

    columns
}

/// Paged (or full, when `window` is `None`) row select, ordered by `gid`.
pub fn select_page(
    table: &str,
    columns: &[ColumnSpec],
    filter: Option<&DistrictFilter>,
    window: Option<PageWindow>,
) -> SqlQuery {
    let mut w = SqlWriter::new();
    let select_list: Vec<String> = columns.iter().map(|c| c.select_expr()).collect();
    w.push(&format!("SELECT {} FROM {}", select_list.join(", "), table));
    write_where(&mut w, filter);
    w.push(" ORDER BY gid");
    if let Some(window) = window {
        let limit = w.bind(SqlParam::Int(window.limit()));
        let offset = w.bind(SqlParam::Int(window.offset()));
        w.push(&format!(" LIMIT {limit} OFFSET {offset}"));
    }
    w.finish()
}

/// Total filtered row count.
pub fn count_rows(table: &str, filter: Option<&DistrictFilter>) -> SqlQuery {
    let mut w = SqlWriter::new();
    w.push(&format!("SELECT COUNT(*) FROM {table}"));
    write_where(&mut w, filter);
    w.finish()
}

/// Total filtered sum of the primary count metric.
pub fn sum_metric(table: &str, filter: Option<&DistrictFilter>) -> SqlQuery {
    let mut w = SqlWriter::new();
    w.push(&format!(
        "SELECT COALESCE(SUM(sarus_coun), 0)::float8 FROM {table}"
    ));
    write_where(&mut w, filter);
    w.finish()
}

/// Grouped sum of the count metric, keyed by district, site or habitat.
///
/// The district key applies the same alias normalization as the filter path,
/// so merged spellings land in one bucket. District buckets are ranked by
/// total and truncated to [`TOP_DISTRICTS`]; site/habitat buckets come back
/// alphabetical.
pub fn group_totals(
    table: &str,
    key: GroupKey,
    filter: Option<&DistrictFilter>,
) -> SqlQuery {
    let mut w = SqlWriter::new();
    w.push("SELECT ");
    match key {
        GroupKey::District => {
            let placeholders: Vec<String> = alias::merged_normalized_keys()
                .into_iter()
                .map(|k| w.bind(SqlParam::Text(k)))
                .collect();
            let canonical = w.bind(SqlParam::Text(alias::RAEBARELI.to_string()));
            w.push(&format!(
                "CASE WHEN LOWER(REPLACE(district, ' ', '')) IN ({}) THEN {} ELSE district END AS label",
                placeholders.join(", "),
                canonical
            ));
        }
        GroupKey::Site | GroupKey::Habitat => {
            w.push(&format!("{} AS label", key.column()));
        }
    }
    w.push(&format!(
        ", COALESCE(SUM(sarus_coun), 0)::float8 AS total FROM {table}"
    ));
    w.push(&format!(" WHERE {} IS NOT NULL", key.column()));
    if let Some(filter) = filter {
        w.push(" AND ");
        filter.write_predicate(&mut w);
    }
    w.push(" GROUP BY 1");
    match key {
        GroupKey::District => {
            let limit = w.bind(SqlParam::Int(TOP_DISTRICTS));
            w.push(&format!(" ORDER BY total DESC LIMIT {limit}"));
        }
        GroupKey::Site | GroupKey::Habitat => w.push(" ORDER BY label"),
    }
    w.finish()
}

/// Distinct raw district values for the dropdown; canonicalization happens in
/// the caller via [`alias::canonical_list`].
pub fn distinct_districts(table: &str) -> SqlQuery {
    SqlQuery {
        sql: format!(
            "SELECT DISTINCT district FROM {table} WHERE district IS NOT NULL ORDER BY district"
        ),
        params: Vec::new(),
    }
}

/// Population sums (adults/juvenile/nests) across the whole table, per
/// capabilities. `None` when the dataset has no population columns.
pub fn population_summary(table: &str, caps: &Capabilities) -> Option<SqlQuery> {
    let mut parts = Vec::new();
    if caps.adults {
        parts.push("COALESCE(SUM(adults), 0)::float8 AS adults");
    }
    if caps.juvenile {
        parts.push("COALESCE(SUM(juvenile), 0)::float8 AS juvenile");
    }
    if caps.nests {
        parts.push("COALESCE(SUM(nests), 0)::float8 AS nests");
    }
    if parts.is_empty() {
        return None;
    }
    Some(SqlQuery {
        sql: format!("SELECT {} FROM {table}", parts.join(", ")),
        params: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry;

    fn caps(key: &str) -> Capabilities {
        registry::dataset(key).unwrap().capabilities
    }

    #[test]
    fn test_exact_filter_binds_value() {
        let c = caps("sarus_2_09_2020");
        let filter = district_filter(Some("Lucknow"), &c).unwrap();
        let q = count_rows("t", Some(&filter));
        assert_eq!(q.sql, "SELECT COUNT(*) FROM t WHERE LOWER(district) = LOWER($1)");
        assert_eq!(q.params, vec![SqlParam::Text("Lucknow".to_string())]);
    }

    #[test]
    fn test_alias_filter_uses_normalized_in_list() {
        let c = caps("sarus_2_09_2020");
        for spelling in crate::alias::RAEBARELI_VARIANTS {
            let filter = district_filter(Some(spelling), &c).unwrap();
            let q = count_rows("t", Some(&filter));
            assert_eq!(
                q.sql,
                "SELECT COUNT(*) FROM t WHERE LOWER(REPLACE(district, ' ', '')) IN ($1, $2)"
            );
            assert_eq!(
                q.params,
                vec![
                    SqlParam::Text("raebareli".to_string()),
                    SqlParam::Text("raibareli".to_string()),
                ]
            );
        }
    }

    #[test]
    fn test_filter_ignored_without_district_capability() {
        let c = caps("sarus_lucknow_population");
        assert!(district_filter(Some("Lucknow"), &c).is_none());
    }

    #[test]
    fn test_blank_district_is_no_filter() {
        let c = caps("sarus_2_09_2020");
        assert!(district_filter(Some("   "), &c).is_none());
        assert!(district_filter(None, &c).is_none());
    }

    #[test]
    fn test_user_value_never_lands_in_sql_text() {
        let c = caps("sarus_2_09_2020");
        let hostile = "x'; DROP TABLE students; --";
        let filter = district_filter(Some(hostile), &c).unwrap();
        for q in [
            count_rows("t", Some(&filter)),
            sum_metric("t", Some(&filter)),
            select_page("t", &report_columns(&c), Some(&filter), None),
            group_totals("t", GroupKey::Site, Some(&filter)),
        ] {
            assert!(!q.sql.contains("DROP"), "sql leaked user input: {}", q.sql);
            assert!(q.params.contains(&SqlParam::Text(hostile.to_string())));
        }
    }

    #[test]
    fn test_column_order_is_deterministic() {
        let c = caps("sarus_2_09_2020");
        let a: Vec<&str> = report_columns(&c).iter().map(|s| s.output_name()).collect();
        let b: Vec<&str> = report_columns(&c).iter().map(|s| s.output_name()).collect();
        assert_eq!(a, b);
        assert_eq!(
            a,
            vec![
                "district",
                "gid",
                "latitude",
                "longitude",
                "habitat",
                "sarus_count",
                "site",
                "adults",
                "juvenile",
                "nests",
                "threats",
                "date",
            ]
        );
    }

    #[test]
    fn test_lucknow_columns_swap_district_for_colony_fields() {
        let c = caps("sarus_lucknow_population");
        let names: Vec<&str> = report_columns(&c).iter().map(|s| s.output_name()).collect();
        assert_eq!(
            names,
            vec![
                "gid",
                "latitude",
                "longitude",
                "habitat",
                "sarus_count",
                "range_fore",
                "name_of_co",
                "adults",
                "juvenile",
                "nests",
                "date",
            ]
        );
    }

    #[test]
    fn test_pagination_is_opt_in() {
        let c = caps("sarus_2_09_2020");
        let cols = report_columns(&c);
        let all = select_page("t", &cols, None, None);
        assert!(!all.sql.contains("LIMIT"));
        assert!(all.params.is_empty());

        let window = PageWindow::new(3, 25).unwrap();
        let paged = select_page("t", &cols, None, Some(window));
        assert!(paged.sql.ends_with(" ORDER BY gid LIMIT $1 OFFSET $2"));
        assert_eq!(paged.params, vec![SqlParam::Int(25), SqlParam::Int(50)]);
    }

    #[test]
    fn test_window_rejects_non_positive_values() {
        assert!(PageWindow::new(0, 25).is_none());
        assert!(PageWindow::new(1, 0).is_none());
        assert!(PageWindow::new(1, 1).is_some());
    }

    #[test]
    fn test_district_grouping_merges_aliases_and_ranks() {
        let q = group_totals("t", GroupKey::District, None);
        assert_eq!(
            q.sql,
            "SELECT CASE WHEN LOWER(REPLACE(district, ' ', '')) IN ($1, $2) THEN $3 ELSE district END AS label, \
             COALESCE(SUM(sarus_coun), 0)::float8 AS total FROM t \
             WHERE district IS NOT NULL GROUP BY 1 ORDER BY total DESC LIMIT $4"
        );
        assert_eq!(
            q.params,
            vec![
                SqlParam::Text("raebareli".to_string()),
                SqlParam::Text("raibareli".to_string()),
                SqlParam::Text("Raebareli".to_string()),
                SqlParam::Int(TOP_DISTRICTS),
            ]
        );
    }

    #[test]
    fn test_site_grouping_scopes_to_filter() {
        let c = caps("sarus_2_09_2020");
        let filter = district_filter(Some("Rae Bareli"), &c).unwrap();
        let q = group_totals("t", GroupKey::Site, Some(&filter));
        assert_eq!(
            q.sql,
            "SELECT site AS label, COALESCE(SUM(sarus_coun), 0)::float8 AS total FROM t \
             WHERE site IS NOT NULL AND LOWER(REPLACE(district, ' ', '')) IN ($1, $2) \
             GROUP BY 1 ORDER BY label"
        );
    }

    #[test]
    fn test_population_summary_follows_capabilities() {
        let q = population_summary("t", &caps("sarus_27_09_2021")).unwrap();
        assert_eq!(
            q.sql,
            "SELECT COALESCE(SUM(juvenile), 0)::float8 AS juvenile, \
             COALESCE(SUM(nests), 0)::float8 AS nests FROM t"
        );

        let none = Capabilities {
            district: true,
            site: false,
            range_forest: false,
            colony: false,
            adults: false,
            juvenile: false,
            nests: false,
            threats: false,
        };
        assert!(population_summary("t", &none).is_none());
    }
}
