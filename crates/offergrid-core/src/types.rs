//! Shared types used across offergrid crates.
//!
//! These mirror the shapes a cluster manager advertises (offers with
//! resource line items and typed attributes) and the shapes a scheduler
//! submits (task demands and per-task filters). All types serialize to
//! and from JSON so collaborators can hand them over unchanged.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Resource name for CPU shares.
pub const CPUS: &str = "cpus";
/// Resource name for memory (MB).
pub const MEM: &str = "mem";
/// Resource name for a disk descriptor.
pub const DISK: &str = "disk";

/// Opaque identifier of an offer, used for accept/decline calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfferId(pub String);

impl fmt::Display for OfferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of the agent that advertised an offer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct AgentId(pub String);

// ── Offer ─────────────────────────────────────────────────────────

/// A bundle of resources advertised by the cluster manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub id: OfferId,
    #[serde(default)]
    pub agent_id: AgentId,
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl Offer {
    /// An offer with no resources or attributes.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: OfferId(id.into()),
            agent_id: AgentId::default(),
            hostname: String::new(),
            resources: Vec::new(),
            attributes: Vec::new(),
        }
    }

    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resources.push(resource);
        self
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }
}

/// A named resource line item, either a scalar amount or a disk descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scalar: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk: Option<DiskInfo>,
}

impl Resource {
    pub fn scalar(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            scalar: Some(value),
            disk: None,
        }
    }

    pub fn cpus(value: f64) -> Self {
        Self::scalar(CPUS, value)
    }

    pub fn mem(value: f64) -> Self {
        Self::scalar(MEM, value)
    }

    pub fn disk(info: DiskInfo) -> Self {
        Self {
            name: DISK.to_string(),
            scalar: None,
            disk: Some(info),
        }
    }

    /// Scalar amount, zero when the line item carries none.
    pub fn scalar_value(&self) -> f64 {
        self.scalar.unwrap_or(0.0)
    }
}

/// Disk descriptor attached to a `disk` resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DiskInfo {
    /// Persistent volume id, if the disk is a persistent volume.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistence_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal: Option<String>,
    /// Mount point inside the container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_path: Option<String>,
}

// ── Attributes ────────────────────────────────────────────────────

/// A typed, non-consumable property of an offer, used only for filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    #[serde(flatten)]
    pub value: AttributeValue,
}

impl Attribute {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: AttributeValue::Text(value.into()),
        }
    }

    pub fn scalar(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value: AttributeValue::Scalar(value),
        }
    }

    pub fn set<I, S>(name: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            value: AttributeValue::Set(items.into_iter().map(Into::into).collect()),
        }
    }

    pub fn ranges(name: impl Into<String>, ranges: Vec<ValueRange>) -> Self {
        Self {
            name: name.into(),
            value: AttributeValue::Ranges(ranges),
        }
    }
}

/// Attribute payload, tagged by value type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AttributeValue {
    Scalar(f64),
    Text(String),
    Set(Vec<String>),
    Ranges(Vec<ValueRange>),
}

impl AttributeValue {
    /// The filter kind that inspects this attribute.
    pub fn kind(&self) -> FilterKind {
        match self {
            AttributeValue::Scalar(_) => FilterKind::Scalar,
            AttributeValue::Text(_) => FilterKind::Text,
            AttributeValue::Set(_) => FilterKind::Set,
            AttributeValue::Ranges(_) => FilterKind::Ranges,
        }
    }
}

/// Inclusive integer range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRange {
    pub begin: u64,
    pub end: u64,
}

impl ValueRange {
    pub fn contains(&self, value: u64) -> bool {
        self.begin <= value && value <= self.end
    }
}

// ── Tasks ─────────────────────────────────────────────────────────

/// A task's resource demand. `name` keys the constraint registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskInfo {
    pub name: String,
    #[serde(default)]
    pub task_id: String,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

impl TaskInfo {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            task_id: name.clone(),
            name,
            resources: Vec::new(),
        }
    }

    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resources.push(resource);
        self
    }
}

// ── Filters ───────────────────────────────────────────────────────

/// A raw filter as submitted with a task description.
///
/// `kind` is one of `scalar`, `text`, `set`, `ranges` or `strategy`
/// (case-insensitive). It is validated by the constraint registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    #[serde(alias = "type")]
    pub kind: String,
    #[serde(alias = "value", default)]
    pub values: Vec<String>,
}

impl Filter {
    pub fn new<I, S>(kind: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: kind.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// Attribute filter kinds. Follows the value types of offer attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    Scalar,
    Text,
    Set,
    Ranges,
}

impl FilterKind {
    /// Parse a kind name, ignoring case. `strategy` is not an attribute kind.
    pub fn parse(kind: &str) -> Option<Self> {
        match kind.to_ascii_lowercase().as_str() {
            "scalar" => Some(FilterKind::Scalar),
            "text" => Some(FilterKind::Text),
            "set" => Some(FilterKind::Set),
            "ranges" => Some(FilterKind::Ranges),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKind::Scalar => "scalar",
            FilterKind::Text => "text",
            FilterKind::Set => "set",
            FilterKind::Ranges => "ranges",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Retention policy for an offer once a task has consumed part of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Remove the offer after its first match.
    #[default]
    NonMux,
    /// Keep the offer in the pool until a scalar axis is exhausted.
    Mux,
}

impl Strategy {
    /// `mux` in any case selects [`Strategy::Mux`]; anything else is non-mux.
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("mux") {
            Strategy::Mux
        } else {
            Strategy::NonMux
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::NonMux => "non-mux",
            Strategy::Mux => "mux",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
