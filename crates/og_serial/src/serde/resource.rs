use alloc::format;
use alloc::string::String;
use core::fmt;

use og_utils::hash::HashMap;

use crate::value::{ObjectRef, Value};

/// Field naming the pool of a resource reference.
pub const RESOURCE_KEY: &str = "resource";
/// Field naming the entry of a resource reference.
pub const UUID_KEY: &str = "uuid";

// -----------------------------------------------------------------------------
// ResourceRef

/// A `{ "resource": pool, "uuid": id }` reference found in wire data.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceRef {
    pool: String,
    uuid: String,
}

impl ResourceRef {
    #[inline]
    pub fn new(pool: impl Into<String>, uuid: impl Into<String>) -> Self {
        Self {
            pool: pool.into(),
            uuid: uuid.into(),
        }
    }

    /// Recognizes a resource reference.
    ///
    /// The data must be a plain structure with a non-empty string
    /// `resource` and a truthy `uuid`. Numeric uuids are read as their
    /// decimal form.
    ///
    /// # Examples
    ///
    /// ```
    /// use og_serial::serde::ResourceRef;
    /// use og_serial::value::Value;
    ///
    /// let data = Value::object([("resource", Value::from("tex")), ("uuid", Value::from(7))]);
    /// assert_eq!(ResourceRef::parse(&data), Some(ResourceRef::new("tex", "7")));
    ///
    /// let data = Value::object([("resource", Value::from("tex")), ("uuid", Value::from(""))]);
    /// assert_eq!(ResourceRef::parse(&data), None);
    /// ```
    pub fn parse(data: &Value) -> Option<Self> {
        let Value::Object(object) = data else {
            return None;
        };
        let object = object.borrow();
        if !object.is_plain() {
            return None;
        }

        let pool = match object.field(RESOURCE_KEY)?.value() {
            Value::String(pool) if !pool.is_empty() => pool.clone(),
            _ => return None,
        };
        let uuid = object.field(UUID_KEY)?.value();
        if !uuid.is_truthy() {
            return None;
        }
        let uuid = match uuid {
            Value::String(uuid) => uuid.clone(),
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 9.007_199_254_740_992e15 => {
                format!("{}", *n as i64)
            }
            Value::Number(n) => format!("{n}"),
            Value::Bool(_) => String::from("true"),
            _ => return None,
        };
        Some(Self { pool, uuid })
    }

    #[inline]
    pub fn pool(&self) -> &str {
        &self.pool
    }

    #[inline]
    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    /// The wire form of this reference.
    pub fn to_value(&self) -> Value {
        Value::Object(ObjectRef::from_fields([
            (RESOURCE_KEY, Value::from(self.pool.as_str())),
            (UUID_KEY, Value::from(self.uuid.as_str())),
        ]))
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.pool, self.uuid)
    }
}

// -----------------------------------------------------------------------------
// ResourceMeta

/// Named pools of already reconstructed values, keyed by uuid.
///
/// Passed to a deserialization run so resource references resolve to
/// shared instances instead of copies.
///
/// # Examples
///
/// ```
/// use og_serial::serde::ResourceMeta;
/// use og_serial::value::{ObjectRef, Value};
///
/// let texture = Value::Object(ObjectRef::plain());
/// let mut meta = ResourceMeta::new();
/// meta.insert("textures", "a1", texture.clone());
///
/// assert!(meta.get("textures", "a1").is_some_and(|v| v.same(&texture)));
/// assert!(meta.get("textures", "b2").is_none());
/// assert!(meta.contains_pool("textures"));
/// ```
#[derive(Default, Clone)]
pub struct ResourceMeta {
    pools: HashMap<String, HashMap<String, Value>>,
}

impl ResourceMeta {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the pool named `name`, creating it if absent.
    pub fn add_pool(&mut self, name: impl Into<String>) -> &mut HashMap<String, Value> {
        self.pools.entry(name.into()).or_default()
    }

    /// Stores `value` under `uuid` in the pool `pool`, returning the value
    /// it replaced.
    pub fn insert(
        &mut self,
        pool: impl Into<String>,
        uuid: impl Into<String>,
        value: Value,
    ) -> Option<Value> {
        self.add_pool(pool).insert(uuid.into(), value)
    }

    #[inline]
    pub fn pool(&self, name: &str) -> Option<&HashMap<String, Value>> {
        self.pools.get(name)
    }

    #[inline]
    pub fn contains_pool(&self, name: &str) -> bool {
        self.pools.contains_key(name)
    }

    #[inline]
    pub fn get(&self, pool: &str, uuid: &str) -> Option<&Value> {
        self.pools.get(pool)?.get(uuid)
    }

    #[inline]
    pub fn remove_pool(&mut self, name: &str) -> Option<HashMap<String, Value>> {
        self.pools.remove(name)
    }

    /// Pool names in arbitrary order.
    pub fn pool_names(&self) -> impl ExactSizeIterator<Item = &str> {
        self.pools.keys().map(String::as_str)
    }
}

impl fmt::Debug for ResourceMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.pools.iter().map(|(name, pool)| (name, pool.len())))
            .finish()
    }
}
