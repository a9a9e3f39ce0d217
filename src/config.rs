//! Application-wide JSON settings.
//!
//! Two phases, two types:
//!
//! ```text
//! JsonSettings   ← mutable, lives inside the Router while routes are added
//!      ↓ freeze()   (consumes the settings; called by Router::into_app)
//! ConfigStore    ← immutable, shared as Arc<ConfigStore> by every request
//! ```
//!
//! Nothing can reach a `&mut` to a frozen store, so requests never observe a
//! half-configured allow-list and no lock is needed on the hot path.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::error::{BoxError, Error};

// ── Shape ─────────────────────────────────────────────────────────────────────

/// A runtime shape a handler value can have.
///
/// Built-in shapes match on the [`Value`] variant. Custom shapes carry a
/// predicate and are identified by name: two custom shapes with the same name
/// are the same shape as far as de-duplication is concerned.
#[derive(Clone)]
pub enum Shape {
    Array,
    Object,
    Custom(CustomShape),
}

/// An application-registered shape. Obtain via [`Shape::custom`].
#[derive(Clone)]
pub struct CustomShape {
    name: Cow<'static, str>,
    predicate: Arc<dyn Fn(&Value) -> bool + Send + Sync + 'static>,
}

impl Shape {
    /// Registers a named predicate as a shape.
    ///
    /// ```rust
    /// use tsu_json::Shape;
    ///
    /// let envelope = Shape::custom("envelope", |v| v.get("data").is_some());
    /// assert!(envelope.matches(&serde_json::json!({ "data": 1 })));
    /// ```
    pub fn custom<F>(name: impl Into<Cow<'static, str>>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self::Custom(CustomShape { name: name.into(), predicate: Arc::new(predicate) })
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Array     => "array",
            Self::Object    => "object",
            Self::Custom(c) => &c.name,
        }
    }

    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::Array     => value.is_array(),
            Self::Object    => value.is_object(),
            Self::Custom(c) => (c.predicate)(value),
        }
    }
}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Array, Self::Array) | (Self::Object, Self::Object) => true,
            (Self::Custom(a), Self::Custom(b)) => a.name == b.name,
            _ => false,
        }
    }
}

impl Eq for Shape {}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Array     => f.write_str("Array"),
            Self::Object    => f.write_str("Object"),
            Self::Custom(c) => write!(f, "Custom({:?})", c.name),
        }
    }
}

// ── EligibleTypes ─────────────────────────────────────────────────────────────

/// Ordered, duplicate-free set of [`Shape`]s eligible for JSON serialization.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EligibleTypes {
    shapes: Vec<Shape>,
}

impl EligibleTypes {
    /// Set union: appends shapes not already present, in first-seen order.
    fn merge(&mut self, shapes: impl IntoIterator<Item = Shape>) {
        for shape in shapes {
            if !self.shapes.contains(&shape) {
                self.shapes.push(shape);
            }
        }
    }

    /// The first configured shape `value` matches, if any.
    pub fn classify(&self, value: &Value) -> Option<&Shape> {
        self.shapes.iter().find(|shape| shape.matches(value))
    }

    pub fn contains(&self, shape: &Shape) -> bool {
        self.shapes.contains(shape)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Shape> {
        self.shapes.iter()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl<'a> IntoIterator for &'a EligibleTypes {
    type Item = &'a Shape;
    type IntoIter = std::slice::Iter<'a, Shape>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ── Serializer ────────────────────────────────────────────────────────────────

/// The ambient JSON conversion: compact `serde_json` output.
///
/// Custom strategies can call this to decorate the default text.
pub fn default_json(value: &Value) -> Result<String, BoxError> {
    Ok(serde_json::to_string(value)?)
}

/// The strategy that turns a matched value into JSON text.
#[derive(Clone)]
pub struct Serializer(Arc<dyn Fn(&Value) -> Result<String, BoxError> + Send + Sync + 'static>);

impl Serializer {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Result<String, BoxError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    fn call(&self, value: &Value) -> Result<String, BoxError> {
        (self.0)(value)
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new(default_json)
    }
}

impl fmt::Debug for Serializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Serializer(..)")
    }
}

// ── JsonOptions ───────────────────────────────────────────────────────────────

/// One round of configuration, passed to [`Router::json`](crate::Router::json).
///
/// ```rust
/// use tsu_json::{JsonOptions, Shape};
///
/// let opts = JsonOptions::new()
///     .classes([Shape::Array])
///     .serializer(|v| Ok(serde_json::to_string_pretty(v)?));
/// ```
#[derive(Clone, Debug, Default)]
pub struct JsonOptions {
    classes: Option<Vec<Shape>>,
    serializer: Option<Serializer>,
}

impl JsonOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shapes to add to the allow-list. Unset means `[Array, Object]`.
    pub fn classes(mut self, shapes: impl IntoIterator<Item = Shape>) -> Self {
        self.classes = Some(shapes.into_iter().collect());
        self
    }

    /// Strategy replacing the active one. Unset means [`default_json`].
    pub fn serializer<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Result<String, BoxError> + Send + Sync + 'static,
    {
        self.serializer = Some(Serializer::new(f));
        self
    }
}

// ── JsonSettings (setup phase) ────────────────────────────────────────────────

/// Mutable settings, only reachable while the application is being built.
#[derive(Debug, Default)]
pub struct JsonSettings {
    classes: EligibleTypes,
    serializer: Serializer,
}

impl JsonSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges `options.classes` into the allow-list and replaces the
    /// serializer. Safe to call repeatedly; shapes already present are kept
    /// where they are.
    pub fn configure(&mut self, options: JsonOptions) {
        let classes = options.classes.unwrap_or_else(|| vec![Shape::Array, Shape::Object]);
        self.classes.merge(classes);
        self.serializer = options.serializer.unwrap_or_default();
        debug!(classes = ?self.classes, "json classes configured");
    }

    pub fn eligible_types(&self) -> &EligibleTypes {
        &self.classes
    }

    /// Ends the setup phase.
    pub fn freeze(self) -> ConfigStore {
        debug!(classes = self.classes.len(), "json settings frozen");
        ConfigStore { classes: self.classes, serializer: self.serializer }
    }
}

// ── ConfigStore (serving phase) ───────────────────────────────────────────────

/// Frozen JSON settings, shared read-only across all requests.
#[derive(Debug)]
pub struct ConfigStore {
    classes: EligibleTypes,
    serializer: Serializer,
}

impl ConfigStore {
    pub fn eligible_types(&self) -> &EligibleTypes {
        &self.classes
    }

    /// Runs the active strategy. Its error is passed through untouched as
    /// the source of [`Error::Serialize`].
    pub fn serialize(&self, value: &Value) -> Result<String, Error> {
        self.serializer.call(value).map_err(Error::Serialize)
    }
}
