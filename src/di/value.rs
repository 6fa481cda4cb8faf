//! Values produced by the container: built instances and resolved parameters.

use anyhow::{anyhow, bail, Result};
use serde_yaml::Value;
use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

/// A type-erased object built by the container.
///
/// Clones share the underlying allocation, so two handles to the same cached
/// object compare equal under [`Instance::ptr_eq`].
#[derive(Clone)]
pub struct Instance {
    type_name: &'static str,
    inner: Arc<dyn Any + Send + Sync>,
}

impl Instance {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            type_name: type_name::<T>(),
            inner: Arc::new(value),
        }
    }

    /// Rust type name of the wrapped value.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Typed handle to the wrapped value, `None` when it is another type.
    #[must_use]
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.inner).downcast::<T>().ok()
    }

    /// Whether both handles point at the same object.
    #[must_use]
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// A parameter value after reference resolution.
///
/// Plain configuration values stay as [`Value`]; `@name` references become
/// [`Arg::Object`] (or a plain value for the sentinel names), and non-empty
/// sequences and mappings are rebuilt element by element.
#[derive(Debug, Clone)]
pub enum Arg {
    Value(Value),
    Object(Instance),
    Seq(Vec<Arg>),
    Map(Vec<(Value, Arg)>),
}

impl Arg {
    #[must_use]
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Arg::Value(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.as_value().and_then(Value::as_str)
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.as_value().and_then(Value::as_i64)
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        self.as_value().and_then(Value::as_bool)
    }

    #[must_use]
    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Arg::Object(instance) => Some(instance),
            _ => None,
        }
    }

    /// Typed handle when this argument is a built object of type `T`.
    #[must_use]
    pub fn as_object<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.as_instance().and_then(Instance::downcast::<T>)
    }

    /// Look up a key when this argument is a mapping.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Arg> {
        match self {
            Arg::Map(entries) => entries
                .iter()
                .find(|(k, _)| k.as_str() == Some(key))
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// Convert back into a plain value tree. Fails when an object is
    /// embedded anywhere inside.
    pub fn into_value(self) -> Result<Value> {
        match self {
            Arg::Value(value) => Ok(value),
            Arg::Object(instance) => bail!(
                "argument holds an object of type {} and has no plain value",
                instance.type_name()
            ),
            Arg::Seq(items) => items
                .into_iter()
                .map(Arg::into_value)
                .collect::<Result<Vec<_>>>()
                .map(Value::Sequence),
            Arg::Map(entries) => {
                let mut mapping = serde_yaml::Mapping::with_capacity(entries.len());
                for (key, arg) in entries {
                    mapping.insert(key, arg.into_value()?);
                }
                Ok(Value::Mapping(mapping))
            }
        }
    }

    /// Deserialize the plain value tree into `T`.
    pub fn deserialize<T: serde::de::DeserializeOwned>(self) -> Result<T> {
        Ok(serde_yaml::from_value(self.into_value()?)?)
    }
}

/// Ordered constructor arguments handed to a service factory.
#[derive(Debug, Clone, Default)]
pub struct Args {
    items: Vec<Arg>,
}

impl Args {
    #[must_use]
    pub fn new(items: Vec<Arg>) -> Self {
        Self { items }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Arg> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arg> {
        self.items.iter()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Arg> {
        self.items
    }

    /// Required argument at `index`.
    pub fn arg(&self, index: usize) -> Result<&Arg> {
        self.items
            .get(index)
            .ok_or_else(|| anyhow!("missing argument #{index} ({} given)", self.items.len()))
    }

    /// Required string argument at `index`.
    pub fn string(&self, index: usize) -> Result<String> {
        self.arg(index)?
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| anyhow!("argument #{index} is not a string"))
    }

    /// Required integer argument at `index`.
    pub fn int(&self, index: usize) -> Result<i64> {
        self.arg(index)?
            .as_i64()
            .ok_or_else(|| anyhow!("argument #{index} is not an integer"))
    }

    /// Required object argument of type `T` at `index`.
    pub fn object<T: Any + Send + Sync>(&self, index: usize) -> Result<Arc<T>> {
        let arg = self.arg(index)?;
        arg.as_object::<T>().ok_or_else(|| {
            anyhow!(
                "argument #{index} is not an object of type {}",
                type_name::<T>()
            )
        })
    }
}

impl IntoIterator for Args {
    type Item = Arg;
    type IntoIter = std::vec::IntoIter<Arg>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Whether a configuration value is "empty" and must be passed through
/// without being read as a reference.
pub(crate) fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Sequence(items) => items.is_empty(),
        Value::Mapping(entries) => entries.is_empty(),
        Value::Tagged(_) => false,
    }
}
