use serde::Serialize;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A single cell value as produced by a Loader.
///
/// Numbers and text are kept distinct so the comparison view can canonicalize
/// them; `Null` covers absent and empty cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Number(f64),
    Null,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Render the raw value for display. Integral numbers drop the
    /// fractional part so `10.0` prints as `10`; `Null` prints empty.
    pub fn display(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
            Self::Null => String::new(),
        }
    }
}

/// Which side of the reconciliation a record or column came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    Input,
    Output,
}

impl Side {
    /// Column suffix used in the reconciled table headers.
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Input => "_Input",
            Self::Output => "_Output",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input => write!(f, "Input"),
            Self::Output => write!(f, "Output"),
        }
    }
}

/// One row from either source: an insertion-ordered field to value mapping.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Record {
    fields: Vec<String>,
    values: Vec<Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, value: Value) {
        self.fields.push(field.into());
        self.values.push(value);
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        let mut record = Self::new();
        for (field, value) in pairs {
            record.push(field, value);
        }
        record
    }

    /// First value under `field`, if present.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields
            .iter()
            .position(|f| f == field)
            .map(|i| &self.values[i])
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Per-field comparison
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchStatus {
    Matched,
    #[serde(rename = "Not Matched")]
    NotMatched,
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Matched => write!(f, "Matched"),
            Self::NotMatched => write!(f, "Not Matched"),
        }
    }
}

/// The per-row comparison unit for one base field: both raw values plus the
/// status computed from the normalized view. `note` carries the diagnostic
/// when a coercion failure was downgraded to `NotMatched`.
#[derive(Debug, Clone, Serialize)]
pub struct FieldPair {
    pub base: String,
    pub input: Value,
    pub output: Value,
    pub status: MatchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

// ---------------------------------------------------------------------------
// Reconciled table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RowResult {
    Pass,
    Fail,
}

impl std::fmt::Display for RowResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => write!(f, "Pass"),
            Self::Fail => write!(f, "Fail"),
        }
    }
}

/// Where a reconciled row's key was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowOrigin {
    Both,
    InputOnly,
    OutputOnly,
}

/// A pass-through column that exists on one side only. Never compared.
#[derive(Debug, Clone, Serialize)]
pub struct JoinColumn {
    pub name: String,
    pub side: Side,
}

/// Final column order of the reconciled table: pass-through columns first,
/// then one `_Input`/`_Output`/`_Status` triple per base field, then
/// `Result`, then `Not Matched Count`.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnLayout {
    pub join_only: Vec<JoinColumn>,
    pub bases: Vec<String>,
    /// Base name of the key field; writers label mismatch keys with it.
    pub key_base: String,
}

impl ColumnLayout {
    pub fn headers(&self) -> Vec<String> {
        let mut headers: Vec<String> =
            self.join_only.iter().map(|c| c.name.clone()).collect();
        for base in &self.bases {
            headers.push(format!("{base}_Input"));
            headers.push(format!("{base}_Output"));
            headers.push(format!("{base}_Status"));
        }
        headers.push("Result".into());
        headers.push("Not Matched Count".into());
        headers
    }
}

/// One merged row plus its field pairs and the derived row verdict.
#[derive(Debug, Clone, Serialize)]
pub struct ReconciledRow {
    pub origin: RowOrigin,
    /// Values for the layout's pass-through columns, in layout order.
    pub join_values: Vec<Value>,
    /// One pair per base field, in layout order.
    pub pairs: Vec<FieldPair>,
    pub result: RowResult,
    pub not_matched_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconciledTable {
    pub layout: ColumnLayout,
    pub rows: Vec<ReconciledRow>,
}

// ---------------------------------------------------------------------------
// Summary + mismatches
// ---------------------------------------------------------------------------

/// Per-field match totals over the whole reconciled table.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryStat {
    pub field: String,
    pub matched: usize,
    pub not_matched: usize,
    pub error_percentage: f64,
}

impl SummaryStat {
    /// Two-decimal percent rendering, e.g. `33.33%`.
    pub fn percent_display(&self) -> String {
        format!("{:.2}%", self.error_percentage)
    }
}

/// Summary stats keyed by base field, iterated in stable field order.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryTable {
    pub stats: Vec<SummaryStat>,
}

impl SummaryTable {
    pub fn get(&self, field: &str) -> Option<&SummaryStat> {
        self.stats.iter().find(|s| s.field == field)
    }
}

/// One row with at least one mismatched field.
#[derive(Debug, Clone, Serialize)]
pub struct MismatchEntry {
    /// 1-based position in the reconciled table.
    pub row_number: usize,
    /// Key value from the input side, falling back to the output side.
    pub key: Value,
    /// Offending base field names, in stable field order.
    pub fields: Vec<String>,
}

// ---------------------------------------------------------------------------
// Run output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct RunMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
}

/// Counts the caller always gets, including whether any field ran degraded
/// (a coercion failure recovered as `NotMatched`).
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub rows: usize,
    pub passed: usize,
    pub failed: usize,
    pub degraded_fields: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconcileOutput {
    pub meta: RunMeta,
    pub reconciled: ReconciledTable,
    pub mismatches: Vec<MismatchEntry>,
    pub summary: SummaryTable,
    pub report: RunReport,
}
