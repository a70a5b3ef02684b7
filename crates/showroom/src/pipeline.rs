//! Aggregation pipeline: ordered stages folded over an in-memory document sequence.

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::{
    comparison::values_equal,
    filtering::matches,
    sort::sort_documents,
    Document,
    Filter,
    Result,
    SortSpec,
    StoreError,
    FIELD_REFERENCE_PREFIX,
    GROUP_ALL_KEY,
    GROUP_COUNT_FIELD,
    GROUP_ITEMS_FIELD,
    ID_FIELD,
};

/// Stage keys in the order they are looked up in a stage object.
const STAGE_PRECEDENCE: [&str; 5] = ["$match", "$sort", "$limit", "$skip", "$group"];

/// What a `$group` stage partitions by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupKey {
    /// Group by the value of a field; an absent field groups under `null`
    Field(String),
    /// One group holding every document, keyed `"all"`
    All,
}

impl GroupKey {
    /// Interprets the `_id` of a `$group` stage.
    ///
    /// `"$brand"` groups by `brand`; anything else, including a missing `_id`, puts
    /// every document in one group.
    pub fn from_value(id: Option<&Value>) -> Self {
        match id {
            Some(Value::String(reference)) if reference.starts_with(FIELD_REFERENCE_PREFIX) => {
                Self::Field(reference[FIELD_REFERENCE_PREFIX.len_utf8() ..].to_owned())
            },
            _ => Self::All,
        }
    }

    fn key_of(&self, doc: &Document) -> Value {
        match *self {
            Self::Field(ref field) => doc.get(field).cloned().unwrap_or(Value::Null),
            Self::All => Value::String(GROUP_ALL_KEY.to_owned()),
        }
    }
}

/// A single pipeline stage.
#[derive(Debug, Clone)]
pub enum Stage {
    /// Keep documents matching the filter
    Match(Filter),
    /// Order documents
    Sort(SortSpec),
    /// Keep the first `n` documents
    Limit(usize),
    /// Drop the first `n` documents
    Skip(usize),
    /// Partition documents into `{_id, count, items}` summaries
    Group(GroupKey),
    /// A stage with no recognized key; documents pass through
    PassThrough,
}

impl Stage {
    /// Parses one stage object.
    ///
    /// Only the first recognized key, in the order `$match`, `$sort`, `$limit`,
    /// `$skip`, `$group`, is applied. A stage without any of them passes documents
    /// through unchanged.
    pub fn from_value(value: &Value) -> Result<Self> {
        let map = value.as_object().ok_or_else(|| {
            StoreError::InvalidPipeline {
                reason: format!("stage must be a JSON object, got {}", value),
            }
        })?;
        let Some((key, operand)) = STAGE_PRECEDENCE
            .iter()
            .find_map(|key| map.get(*key).map(|operand| (*key, operand)))
        else {
            debug!("Stage {} has no recognized key, passing documents through", value);
            return Ok(Self::PassThrough);
        };

        let stage = match key {
            "$match" => Self::Match(Filter::from_value(operand)?),
            "$sort" => Self::Sort(SortSpec::from_value(operand)?),
            "$limit" => Self::Limit(parse_count(key, operand)?),
            "$skip" => Self::Skip(parse_count(key, operand)?),
            _ => {
                let spec = operand.as_object().ok_or_else(|| {
                    StoreError::InvalidPipeline {
                        reason: format!("$group expects an object, got {}", operand),
                    }
                })?;
                Self::Group(GroupKey::from_value(spec.get(ID_FIELD)))
            },
        };
        Ok(stage)
    }

    fn apply(&self, docs: Vec<Document>) -> Vec<Document> {
        match *self {
            Self::Match(ref filter) => docs.into_iter().filter(|doc| matches(doc, filter)).collect(),
            Self::Sort(ref spec) => {
                let mut docs = docs;
                sort_documents(&mut docs, spec);
                docs
            },
            Self::Limit(n) => docs.into_iter().take(n).collect(),
            Self::Skip(n) => docs.into_iter().skip(n).collect(),
            Self::Group(ref key) => group(docs, key),
            Self::PassThrough => docs,
        }
    }
}

fn parse_count(key: &str, operand: &Value) -> Result<usize> {
    operand
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| {
            StoreError::InvalidPipeline {
                reason: format!("{} expects a non-negative integer, got {}", key, operand),
            }
        })
}

fn group(docs: Vec<Document>, key: &GroupKey) -> Vec<Document> {
    let mut groups: Vec<(Value, Vec<Value>)> = Vec::new();
    for doc in docs {
        let value = key.key_of(&doc);
        match groups.iter_mut().find(|(existing, _)| values_equal(existing, &value)) {
            Some((_, items)) => items.push(doc.into()),
            None => groups.push((value, vec![doc.into()])),
        }
    }
    groups
        .into_iter()
        .map(|(id, items)| {
            let mut summary = Map::with_capacity(3);
            summary.insert(ID_FIELD.to_owned(), id);
            summary.insert(GROUP_COUNT_FIELD.to_owned(), Value::from(items.len()));
            summary.insert(GROUP_ITEMS_FIELD.to_owned(), Value::Array(items));
            Document::from(summary)
        })
        .collect()
}

/// An ordered list of stages applied left to right.
///
/// ```rust
/// use serde_json::json;
/// use showroom_store::Pipeline;
///
/// let pipeline = Pipeline::from_value(&json!([
///     {"$match": {"brand": "BMW"}},
///     {"$sort": {"price": -1}},
///     {"$limit": 3}
/// ]))
/// .unwrap();
/// assert_eq!(pipeline.stages().len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    /// Creates an empty pipeline, which returns its input unchanged.
    pub const fn new() -> Self {
        Self {
            stages: Vec::new(),
        }
    }

    /// Parses a JSON array of stage objects.
    pub fn from_value(value: &Value) -> Result<Self> {
        let stages = value.as_array().ok_or_else(|| {
            StoreError::InvalidPipeline {
                reason: "pipeline must be a JSON array of stages".to_owned(),
            }
        })?;
        Ok(Self {
            stages: stages.iter().map(Stage::from_value).collect::<Result<_>>()?,
        })
    }

    /// Appends a stage.
    #[must_use]
    pub fn stage(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    /// Appends a `$match` stage.
    #[must_use]
    pub fn match_(self, filter: Filter) -> Self { self.stage(Stage::Match(filter)) }

    /// Appends a `$sort` stage.
    #[must_use]
    pub fn sort(self, spec: SortSpec) -> Self { self.stage(Stage::Sort(spec)) }

    /// Appends a `$limit` stage.
    #[must_use]
    pub fn limit(self, n: usize) -> Self { self.stage(Stage::Limit(n)) }

    /// Appends a `$skip` stage.
    #[must_use]
    pub fn skip(self, n: usize) -> Self { self.stage(Stage::Skip(n)) }

    /// Appends a `$group` stage.
    #[must_use]
    pub fn group(self, key: GroupKey) -> Self { self.stage(Stage::Group(key)) }

    /// Returns the stages in execution order.
    pub fn stages(&self) -> &[Stage] { &self.stages }

    /// Runs every stage over `docs`.
    pub fn execute(&self, docs: Vec<Document>) -> Vec<Document> {
        trace!(
            "Executing pipeline of {} stages over {} documents",
            self.stages.len(),
            docs.len()
        );
        self.stages
            .iter()
            .fold(docs, |docs, stage| stage.apply(docs))
    }
}

impl TryFrom<&Value> for Pipeline {
    type Error = StoreError;

    fn try_from(value: &Value) -> Result<Self> { Self::from_value(value) }
}
