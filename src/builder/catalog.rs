//! Static option catalogs offered by the wizard steps
//!
//! Every choice a step can present (model types, data sources, filter operators,
//! algorithms, preparation variables, ...) is a closed enum here. The `id` of an
//! entry is its stable machine name, accepted on the command line. The `label`
//! is what the wizard displays. In JSON, model types, data sources, condition
//! requirements and algorithms appear as their lowercase id; the other catalogs
//! appear as their label (e.g. "Not Equal", "Leave As Is").

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Error returned when a string does not name any entry of a catalog
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct UnknownOption {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

/// Common behaviour of every catalog enum
pub trait CatalogEntry: Copy + Sized + 'static {
    /// Human readable name of the catalog, used in error messages
    const KIND: &'static str;
    /// All entries in display order
    const ALL: &'static [Self];

    /// Stable machine identifier
    fn id(&self) -> &'static str;

    /// Display label
    fn label(&self) -> &'static str;

    /// Position of this entry in [`CatalogEntry::ALL`]
    fn index(&self) -> usize
    where
        Self: PartialEq,
    {
        Self::ALL.iter().position(|e| e == self).unwrap_or(0)
    }

    /// Neighbouring entry in display order, wrapping around at both ends
    fn cycled(&self, forward: bool) -> Self
    where
        Self: PartialEq,
    {
        let len = Self::ALL.len();
        let step = if forward { 1 } else { len - 1 };
        Self::ALL[(self.index() + step) % len]
    }
}

/// Lowercase and drop everything that is not alphanumeric, so that
/// "Not Equal", "not-equal" and "NOT_EQUAL" all compare equal.
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Parse a catalog entry by id or label, ignoring case and punctuation
pub fn parse_entry<T: CatalogEntry>(value: &str) -> Result<T, UnknownOption> {
    let wanted = normalize(value);
    T::ALL
        .iter()
        .copied()
        .find(|e| normalize(e.id()) == wanted || normalize(e.label()) == wanted)
        .ok_or_else(|| UnknownOption {
            kind: T::KIND,
            value: value.to_string(),
            expected: T::ALL
                .iter()
                .map(|e| e.id())
                .collect::<Vec<_>>()
                .join(", "),
        })
}

macro_rules! catalog_traits {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownOption;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_entry(s)
            }
        }
    };
}

// ============================================================================
// Step 1: model types
// ============================================================================

/// Kind of model the user wants to build or connect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    Scratch,
    #[serde(rename = "sagemaker")]
    SageMaker,
    Vertex,
    Databricks,
}

impl CatalogEntry for ModelType {
    const KIND: &'static str = "model type";
    const ALL: &'static [Self] = &[
        ModelType::Scratch,
        ModelType::SageMaker,
        ModelType::Vertex,
        ModelType::Databricks,
    ];

    fn id(&self) -> &'static str {
        match self {
            ModelType::Scratch => "scratch",
            ModelType::SageMaker => "sagemaker",
            ModelType::Vertex => "vertex",
            ModelType::Databricks => "databricks",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ModelType::Scratch => "Create a model from scratch",
            ModelType::SageMaker => "Connect an Amazon SageMaker model",
            ModelType::Vertex => "Connect a Google Cloud Vertex AI model",
            ModelType::Databricks => "Connect a Databricks model",
        }
    }
}

impl ModelType {
    pub fn description(&self) -> &'static str {
        match self {
            ModelType::Scratch => "Build and customize your own model with clicks, not code.",
            ModelType::SageMaker => {
                "Bring your SageMaker model output in to quickly operationalize its predictions."
            }
            ModelType::Vertex => {
                "Bring your Vertex AI model output in to quickly operationalize its predictions."
            }
            ModelType::Databricks => {
                "Bring your Databricks model output in to quickly operationalize its predictions."
            }
        }
    }
}

catalog_traits!(ModelType);

// ============================================================================
// Step 2: data sources
// ============================================================================

/// Where the training data comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Csv,
    Database,
    Cloud,
}

impl CatalogEntry for DataSource {
    const KIND: &'static str = "data source";
    const ALL: &'static [Self] = &[DataSource::Csv, DataSource::Database, DataSource::Cloud];

    fn id(&self) -> &'static str {
        match self {
            DataSource::Csv => "csv",
            DataSource::Database => "database",
            DataSource::Cloud => "cloud",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            DataSource::Csv => "CSV File",
            DataSource::Database => "Database Connection",
            DataSource::Cloud => "Cloud Storage",
        }
    }
}

impl DataSource {
    pub fn description(&self) -> &'static str {
        match self {
            DataSource::Csv => "Upload CSV files with your data",
            DataSource::Database => "Connect to your existing database",
            DataSource::Cloud => "Import from cloud storage services",
        }
    }
}

catalog_traits!(DataSource);

// ============================================================================
// Step 3: training data filters
// ============================================================================

/// Comparison applied by a filter condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub enum FilterOperator {
    #[default]
    Contains,
    Equals,
    #[serde(rename = "Not Equal")]
    NotEqual,
    #[serde(rename = "Starts With")]
    StartsWith,
    #[serde(rename = "Ends With")]
    EndsWith,
}

impl CatalogEntry for FilterOperator {
    const KIND: &'static str = "filter operator";
    const ALL: &'static [Self] = &[
        FilterOperator::Contains,
        FilterOperator::Equals,
        FilterOperator::NotEqual,
        FilterOperator::StartsWith,
        FilterOperator::EndsWith,
    ];

    fn id(&self) -> &'static str {
        match self {
            FilterOperator::Contains => "contains",
            FilterOperator::Equals => "equals",
            FilterOperator::NotEqual => "not-equal",
            FilterOperator::StartsWith => "starts-with",
            FilterOperator::EndsWith => "ends-with",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            FilterOperator::Contains => "Contains",
            FilterOperator::Equals => "Equals",
            FilterOperator::NotEqual => "Not Equal",
            FilterOperator::StartsWith => "Starts With",
            FilterOperator::EndsWith => "Ends With",
        }
    }
}

catalog_traits!(FilterOperator);

/// How multiple filter conditions combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConditionMatch {
    #[default]
    All,
    Any,
}

impl CatalogEntry for ConditionMatch {
    const KIND: &'static str = "condition requirement";
    const ALL: &'static [Self] = &[ConditionMatch::All, ConditionMatch::Any];

    fn id(&self) -> &'static str {
        match self {
            ConditionMatch::All => "all",
            ConditionMatch::Any => "any",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ConditionMatch::All => "All Conditions Are Met",
            ConditionMatch::Any => "Any Condition Is Met",
        }
    }
}

catalog_traits!(ConditionMatch);

/// Fields a training-data filter can test
pub const FILTER_FIELDS: &[&str] = &["Lead Source", "Company", "Status", "Email", "Phone"];

// ============================================================================
// Step 4: goal
// ============================================================================

/// Whether the model should push the predicted outcome up or down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub enum Objective {
    #[default]
    Maximize,
    Minimize,
}

impl CatalogEntry for Objective {
    const KIND: &'static str = "objective";
    const ALL: &'static [Self] = &[Objective::Maximize, Objective::Minimize];

    fn id(&self) -> &'static str {
        match self {
            Objective::Maximize => "maximize",
            Objective::Minimize => "minimize",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Objective::Maximize => "Maximize",
            Objective::Minimize => "Minimize",
        }
    }
}

catalog_traits!(Objective);

/// Fields the model can be asked to predict
pub const PREDICT_FIELDS: &[&str] = &[
    "Opportunity Type",
    "Lead Status",
    "Deal Size",
    "Conversion Rate",
    "Revenue",
    "Customer Lifetime Value",
];

/// Outcome values offered for the predicted field
pub const TARGET_VALUES: &[&str] = &["New Business", "Existing Business"];

/// Output type inferred from a two-valued predicted field
pub const BINARY_CLASSIFICATION: &str = "Binary Classification";

// ============================================================================
// Step 5: data preparation
// ============================================================================

/// Handling of missing values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub enum Transformation {
    #[default]
    #[serde(rename = "Replace Missing Values")]
    ReplaceMissingValues,
    #[serde(rename = "Remove Missing Values")]
    RemoveMissingValues,
    #[serde(rename = "Leave As Is")]
    LeaveAsIs,
}

impl CatalogEntry for Transformation {
    const KIND: &'static str = "transformation";
    const ALL: &'static [Self] = &[
        Transformation::ReplaceMissingValues,
        Transformation::RemoveMissingValues,
        Transformation::LeaveAsIs,
    ];

    fn id(&self) -> &'static str {
        match self {
            Transformation::ReplaceMissingValues => "replace-missing",
            Transformation::RemoveMissingValues => "remove-missing",
            Transformation::LeaveAsIs => "leave-as-is",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Transformation::ReplaceMissingValues => "Replace Missing Values",
            Transformation::RemoveMissingValues => "Remove Missing Values",
            Transformation::LeaveAsIs => "Leave As Is",
        }
    }
}

catalog_traits!(Transformation);

/// Statistic used to fill missing values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub enum ReplaceWith {
    #[default]
    Average,
    Median,
    Mode,
    Zero,
}

impl CatalogEntry for ReplaceWith {
    const KIND: &'static str = "replacement";
    const ALL: &'static [Self] = &[
        ReplaceWith::Average,
        ReplaceWith::Median,
        ReplaceWith::Mode,
        ReplaceWith::Zero,
    ];

    fn id(&self) -> &'static str {
        match self {
            ReplaceWith::Average => "average",
            ReplaceWith::Median => "median",
            ReplaceWith::Mode => "mode",
            ReplaceWith::Zero => "zero",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ReplaceWith::Average => "Average",
            ReplaceWith::Median => "Median",
            ReplaceWith::Mode => "Mode",
            ReplaceWith::Zero => "Zero",
        }
    }
}

catalog_traits!(ReplaceWith);

/// Grouping applied before computing replacement values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub enum GroupBy {
    #[default]
    Product,
    #[serde(rename = "Case Type")]
    CaseType,
    #[serde(rename = "Data Source")]
    DataSource,
    #[serde(rename = "None")]
    Ungrouped,
}

impl CatalogEntry for GroupBy {
    const KIND: &'static str = "grouping";
    const ALL: &'static [Self] = &[
        GroupBy::Product,
        GroupBy::CaseType,
        GroupBy::DataSource,
        GroupBy::Ungrouped,
    ];

    fn id(&self) -> &'static str {
        match self {
            GroupBy::Product => "product",
            GroupBy::CaseType => "case-type",
            GroupBy::DataSource => "data-source",
            GroupBy::Ungrouped => "none",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            GroupBy::Product => "Product",
            GroupBy::CaseType => "Case Type",
            GroupBy::DataSource => "Data Source",
            GroupBy::Ungrouped => "None",
        }
    }
}

catalog_traits!(GroupBy);

/// Bucket count bounds for numeric binning
pub const MIN_BUCKETS: u32 = 10;
pub const MAX_BUCKETS: u32 = 100;
pub const DEFAULT_BUCKETS: u32 = 30;

/// Data type of a preparation variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum VariableType {
    Boolean,
    Number,
    Date,
    Text,
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VariableType::Boolean => "Boolean",
            VariableType::Number => "Number",
            VariableType::Date => "Date",
            VariableType::Text => "Text",
        };
        f.write_str(s)
    }
}

/// Per-variable preparation applied on top of the global settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum VariableTransform {
    #[serde(rename = "Replace Missing Values")]
    ReplaceMissingValues,
    #[serde(rename = "Group by Month")]
    GroupByMonth,
    #[serde(rename = "Text Clustering")]
    TextClustering,
}

impl fmt::Display for VariableTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VariableTransform::ReplaceMissingValues => "Replace Missing Values",
            VariableTransform::GroupByMonth => "Group by Month",
            VariableTransform::TextClustering => "Text Clustering",
        };
        f.write_str(s)
    }
}

/// A candidate input variable for the model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variable {
    pub name: &'static str,
    pub kind: VariableType,
    pub has_alert: bool,
    pub transform: Option<VariableTransform>,
}

const fn var(name: &'static str, kind: VariableType) -> Variable {
    Variable {
        name,
        kind,
        has_alert: false,
        transform: None,
    }
}

/// All variables available for preparation, in display order
pub const VARIABLES: &[Variable] = &[
    var("Escalated", VariableType::Boolean),
    var("Duration", VariableType::Number),
    Variable {
        transform: Some(VariableTransform::ReplaceMissingValues),
        ..var("Number of Comments", VariableType::Number)
    },
    Variable {
        transform: Some(VariableTransform::GroupByMonth),
        ..var("Last Modified Date", VariableType::Date)
    },
    Variable {
        transform: Some(VariableTransform::GroupByMonth),
        ..var("Created Date", VariableType::Date)
    },
    var("Case Type", VariableType::Text),
    var("Product", VariableType::Text),
    var("Name", VariableType::Text),
    var("Closed When Created", VariableType::Boolean),
    var("Data Source Object", VariableType::Text),
    var("Case Id", VariableType::Text),
    var("Case Number", VariableType::Text),
    var("Closed", VariableType::Boolean),
    Variable {
        has_alert: true,
        transform: Some(VariableTransform::TextClustering),
        ..var("Description", VariableType::Text)
    },
    var("Subject", VariableType::Text),
    var("Data Source", VariableType::Text),
];

/// Variables selected before the user touches the preparation step
pub const DEFAULT_VARIABLES: &[&str] = &["Escalated", "Duration", "Number of Comments"];

/// Look up a variable by exact name
pub fn find_variable(name: &str) -> Option<&'static Variable> {
    VARIABLES.iter().find(|v| v.name == name)
}

/// Indices into [`VARIABLES`] whose name contains `search`, case-insensitively
pub fn search_variables(search: &str) -> Vec<usize> {
    let needle = search.to_lowercase();
    VARIABLES
        .iter()
        .enumerate()
        .filter(|(_, v)| v.name.to_lowercase().contains(&needle))
        .map(|(i, _)| i)
        .collect()
}

// ============================================================================
// Step 6: algorithms
// ============================================================================

/// Learning algorithm used for training
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    #[default]
    Glm,
    Gbm,
    #[serde(rename = "xgboost")]
    XgBoost,
}

impl CatalogEntry for Algorithm {
    const KIND: &'static str = "algorithm";
    const ALL: &'static [Self] = &[Algorithm::Glm, Algorithm::Gbm, Algorithm::XgBoost];

    fn id(&self) -> &'static str {
        match self {
            Algorithm::Glm => "glm",
            Algorithm::Gbm => "gbm",
            Algorithm::XgBoost => "xgboost",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Algorithm::Glm => "General Linear Model (GLM)",
            Algorithm::Gbm => "Gradient Boosting Machines (GBM)",
            Algorithm::XgBoost => "Extreme Gradient Boosting (XGBoost)",
        }
    }
}

impl Algorithm {
    /// Algorithm pinned when automatic selection is enabled
    pub const AUTOMATIC: Algorithm = Algorithm::Glm;

    pub fn is_recommended(&self) -> bool {
        matches!(self, Algorithm::Glm)
    }

    pub fn description(&self) -> &'static str {
        match self {
            Algorithm::Glm => {
                "Fast equation-based algorithm. Works best when the relationship between \
                 the variables and the outcome is relatively simple."
            }
            Algorithm::Gbm => {
                "Tree-based algorithm whose decision trees are built sequentially to better \
                 fit the data. Handles complex relationships better than GLM."
            }
            Algorithm::XgBoost => {
                "Extension of GBM optimized for efficiency. Builds groups of trees sequentially \
                 while avoiding overfitting."
            }
        }
    }
}

catalog_traits!(Algorithm);
