// uiconf-core/src/schema.rs
use crate::ConfigError;
use serde_json::{Map, Value};

/// Accepted shape of a single option value
#[derive(Debug, Clone)]
pub enum OptionType {
    /// Anything, including null (opaque collaborator references)
    Any,
    Bool,
    Integer {
        min: Option<i64>,
        max: Option<i64>,
    },
    Number {
        min: Option<f64>,
        max: Option<f64>,
    },
    String,
    /// One of a fixed set of string literals
    Enum(&'static [&'static str]),
    /// RFC 3339 / `YYYY-MM-DD` string or epoch milliseconds
    Date,
    Array(Box<OptionType>),
    /// Free-form map, keys are not checked
    Object,
    /// Nested option group, validated recursively
    Group(OptionSchema),
    /// Union of alternatives, first match wins
    OneOf(Vec<OptionType>),
    /// Event handler slot: null or the name of a host-bound handler
    Handler,
    /// Template slot: null or a template name
    Template,
}

impl OptionType {
    pub fn integer() -> Self {
        Self::Integer {
            min: None,
            max: None,
        }
    }

    pub fn int_range(min: i64, max: i64) -> Self {
        Self::Integer {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn number() -> Self {
        Self::Number {
            min: None,
            max: None,
        }
    }

    pub fn non_negative() -> Self {
        Self::Number {
            min: Some(0.0),
            max: None,
        }
    }

    pub fn array(item: OptionType) -> Self {
        Self::Array(Box::new(item))
    }

    pub fn one_of(alternatives: Vec<OptionType>) -> Self {
        Self::OneOf(alternatives)
    }

    /// `number | string`, the usual shape of width/height options
    pub fn dimension() -> Self {
        Self::OneOf(vec![Self::non_negative(), Self::String])
    }

    /// Human-readable name used in error messages
    pub fn describe(&self) -> String {
        match self {
            Self::Any => "any value".to_string(),
            Self::Bool => "boolean".to_string(),
            Self::Integer {
                min: Some(min),
                max: Some(max),
            } => format!("integer in [{}, {}]", min, max),
            Self::Integer { .. } => "integer".to_string(),
            Self::Number { min: Some(min), .. } if *min == 0.0 => {
                "non-negative number".to_string()
            }
            Self::Number { .. } => "number".to_string(),
            Self::String => "string".to_string(),
            Self::Enum(values) => format!("one of {}", quote_list(values)),
            Self::Date => "date".to_string(),
            Self::Array(item) => format!("array of {}", item.describe()),
            Self::Object => "object".to_string(),
            Self::Group(_) => "option group".to_string(),
            Self::OneOf(alts) => alts
                .iter()
                .map(|alt| alt.describe())
                .collect::<Vec<_>>()
                .join(" | "),
            Self::Handler => "handler name or null".to_string(),
            Self::Template => "template name or null".to_string(),
        }
    }

    /// Whether a value of this JSON kind could possibly match
    fn accepts_kind(&self, value: &Value) -> bool {
        match self {
            Self::Any => true,
            Self::Bool => value.is_boolean(),
            Self::Integer { .. } | Self::Number { .. } => value.is_number(),
            Self::String | Self::Enum(_) => value.is_string(),
            Self::Date => value.is_string() || value.is_number(),
            Self::Array(_) => value.is_array(),
            Self::Object | Self::Group(_) => value.is_object(),
            Self::OneOf(alts) => alts.iter().any(|alt| alt.accepts_kind(value)),
            Self::Handler | Self::Template => value.is_string() || value.is_null(),
        }
    }

    fn accepts_null(&self) -> bool {
        matches!(self, Self::Any | Self::Handler | Self::Template)
    }

    fn normalize(
        &self,
        path: &str,
        value: &Value,
        nullable: bool,
        unknown: &mut Vec<String>,
    ) -> Result<Value, ConfigError> {
        if value.is_null() && (nullable || self.accepts_null()) {
            return Ok(Value::Null);
        }

        match self {
            Self::Any => Ok(value.clone()),
            Self::Bool | Self::String | Self::Object | Self::Handler | Self::Template => {
                if self.accepts_kind(value) {
                    Ok(value.clone())
                } else {
                    Err(mismatch(path, self, value))
                }
            }
            Self::Integer { min, max } => {
                let n = value
                    .as_i64()
                    .or_else(|| {
                        value
                            .as_f64()
                            .filter(|f| f.fract() == 0.0)
                            .map(|f| f as i64)
                    })
                    .ok_or_else(|| mismatch(path, self, value))?;
                if min.is_some_and(|min| n < min) || max.is_some_and(|max| n > max) {
                    return Err(ConfigError::OutOfRange {
                        key: path.to_string(),
                        detail: format!("{} is not an {}", n, self.describe()),
                    });
                }
                Ok(Value::from(n))
            }
            Self::Number { min, max } => {
                let n = value.as_f64().ok_or_else(|| mismatch(path, self, value))?;
                if min.is_some_and(|min| n < min) || max.is_some_and(|max| n > max) {
                    return Err(ConfigError::OutOfRange {
                        key: path.to_string(),
                        detail: format!("{} is outside [{:?}, {:?}]", n, min, max),
                    });
                }
                Ok(value.clone())
            }
            Self::Enum(allowed) => match value.as_str() {
                Some(s) if allowed.contains(&s) => Ok(value.clone()),
                Some(s) => Err(ConfigError::NotInEnum {
                    key: path.to_string(),
                    found: s.to_string(),
                    allowed: quote_list(allowed),
                }),
                None => Err(mismatch(path, self, value)),
            },
            // accepted exactly when `date_from_value` can read it back
            Self::Date => match (value, crate::date_from_value(value)) {
                (_, Some(_)) => Ok(value.clone()),
                (Value::Number(n), None) if n.is_i64() || n.is_u64() => {
                    Err(ConfigError::OutOfRange {
                        key: path.to_string(),
                        detail: format!("{} ms is outside the supported dates", n),
                    })
                }
                _ => Err(mismatch(path, self, value)),
            },
            Self::Array(item) => {
                let items = value.as_array().ok_or_else(|| mismatch(path, self, value))?;
                items
                    .iter()
                    .enumerate()
                    .map(|(i, v)| item.normalize(&format!("{}[{}]", path, i), v, false, unknown))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array)
            }
            Self::Group(schema) => {
                let map = value.as_object().ok_or_else(|| mismatch(path, self, value))?;
                schema.normalize_map(path, map, unknown).map(Value::Object)
            }
            Self::OneOf(alts) => {
                let candidates: Vec<&OptionType> =
                    alts.iter().filter(|alt| alt.accepts_kind(value)).collect();
                match candidates.as_slice() {
                    [] => Err(mismatch(path, self, value)),
                    [only] => only.normalize(path, value, false, unknown),
                    many => {
                        let mut last_err = None;
                        for alt in many {
                            let mut scratch = Vec::new();
                            match alt.normalize(path, value, false, &mut scratch) {
                                Ok(v) => {
                                    unknown.extend(scratch);
                                    return Ok(v);
                                }
                                Err(e) => last_err = Some(e),
                            }
                        }
                        Err(last_err.unwrap_or_else(|| mismatch(path, self, value)))
                    }
                }
            }
        }
    }
}

/// How the default of an omitted option is produced
#[derive(Debug, Clone)]
pub enum DefaultValue {
    Value(Value),
    /// Evaluated at validation time (e.g. "now")
    Computed(fn() -> Value),
    /// Defaults of the nested group
    Group,
}

#[derive(Debug, Clone)]
pub struct OptionSpec {
    pub name: &'static str,
    pub ty: OptionType,
    pub default: DefaultValue,
    pub read_only: bool,
    pub deprecated: Option<&'static str>,
}

impl OptionSpec {
    pub fn default_value(&self) -> Value {
        match (&self.default, &self.ty) {
            (DefaultValue::Value(v), _) => v.clone(),
            (DefaultValue::Computed(f), _) => f(),
            (DefaultValue::Group, OptionType::Group(schema)) => Value::Object(schema.defaults()),
            (DefaultValue::Group, _) => Value::Null,
        }
    }

    fn nullable(&self) -> bool {
        matches!(&self.default, DefaultValue::Value(Value::Null))
    }

    /// Nested schema if this option is (or may be) an option group
    pub fn group(&self) -> Option<&OptionSchema> {
        match &self.ty {
            OptionType::Group(schema) => Some(schema),
            OptionType::OneOf(alts) => alts.iter().find_map(|alt| match alt {
                OptionType::Group(schema) => Some(schema),
                _ => None,
            }),
            _ => None,
        }
    }

    pub(crate) fn normalize_value(
        &self,
        path: &str,
        value: &Value,
        unknown: &mut Vec<String>,
    ) -> Result<Value, ConfigError> {
        if let Some(note) = self.deprecated {
            log::warn!("option '{}' is deprecated: {}", path, note);
        }
        self.ty.normalize(path, value, self.nullable(), unknown)
    }
}

/// Result of validating a configuration object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Validated {
    /// Every recognized option, defaults applied
    pub options: Map<String, Value>,
    /// Dotted paths of keys the schema does not recognize
    pub unknown: Vec<String>,
}

/// Declared options of a widget: names, types and defaults
#[derive(Debug, Clone, Default)]
pub struct OptionSchema {
    specs: Vec<OptionSpec>,
}

impl OptionSchema {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, spec: OptionSpec) -> Self {
        if let Some(existing) = self.specs.iter_mut().find(|s| s.name == spec.name) {
            *existing = spec;
        } else {
            self.specs.push(spec);
        }
        self
    }

    pub fn option(self, name: &'static str, ty: OptionType, default: Value) -> Self {
        self.push(OptionSpec {
            name,
            ty,
            default: DefaultValue::Value(default),
            read_only: false,
            deprecated: None,
        })
    }

    pub fn computed(self, name: &'static str, ty: OptionType, default: fn() -> Value) -> Self {
        self.push(OptionSpec {
            name,
            ty,
            default: DefaultValue::Computed(default),
            read_only: false,
            deprecated: None,
        })
    }

    pub fn group(self, name: &'static str, schema: OptionSchema) -> Self {
        self.push(OptionSpec {
            name,
            ty: OptionType::Group(schema),
            default: DefaultValue::Group,
            read_only: false,
            deprecated: None,
        })
    }

    pub fn handlers(mut self, names: &[&'static str]) -> Self {
        for &name in names {
            self = self.option(name, OptionType::Handler, Value::Null);
        }
        self
    }

    /// Mark the most recently added option read-only
    pub fn read_only(mut self) -> Self {
        if let Some(last) = self.specs.last_mut() {
            last.read_only = true;
        }
        self
    }

    /// Mark the most recently added option deprecated
    pub fn deprecated(mut self, note: &'static str) -> Self {
        if let Some(last) = self.specs.last_mut() {
            last.deprecated = Some(note);
        }
        self
    }

    /// Merge `other` into this schema, its specs replacing same-named ones
    pub fn extend(mut self, other: OptionSchema) -> Self {
        for spec in other.specs {
            self = self.push(spec);
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&OptionSpec> {
        self.specs.iter().find(|s| s.name == name)
    }

    pub fn specs(&self) -> &[OptionSpec] {
        &self.specs
    }

    /// Resolve a dotted path (`upload.chunkSize`) through nested groups
    pub fn lookup(&self, path: &str) -> Option<&OptionSpec> {
        let mut segments = path.split('.');
        let mut spec = self.get(segments.next()?)?;
        for segment in segments {
            spec = spec.group()?.get(segment)?;
        }
        Some(spec)
    }

    pub fn defaults(&self) -> Map<String, Value> {
        self.specs
            .iter()
            .map(|spec| (spec.name.to_string(), spec.default_value()))
            .collect()
    }

    /// Validate a configuration object and apply defaults
    pub fn validate(&self, config: &Value) -> Result<Validated, ConfigError> {
        let empty = Map::new();
        let map = match config {
            Value::Null => &empty,
            Value::Object(map) => map,
            other => {
                return Err(ConfigError::TypeMismatch {
                    key: "<root>".to_string(),
                    expected: "object".to_string(),
                    found: kind_of(other).to_string(),
                });
            }
        };

        let mut unknown = Vec::new();
        let options = self.normalize_map("", map, &mut unknown)?;
        unknown.sort();
        for key in &unknown {
            log::warn!("unknown option '{}' ignored", key);
        }
        Ok(Validated { options, unknown })
    }

    fn normalize_map(
        &self,
        prefix: &str,
        map: &Map<String, Value>,
        unknown: &mut Vec<String>,
    ) -> Result<Map<String, Value>, ConfigError> {
        let mut out = Map::new();
        for spec in &self.specs {
            let path = join_path(prefix, spec.name);
            let value = match map.get(spec.name) {
                Some(value) => spec.normalize_value(&path, value, unknown)?,
                None => spec.default_value(),
            };
            out.insert(spec.name.to_string(), value);
        }

        let mut extra: Vec<String> = map
            .keys()
            .filter(|key| self.get(key).is_none())
            .map(|key| join_path(prefix, key))
            .collect();
        extra.sort();
        unknown.extend(extra);

        Ok(out)
    }
}

pub(crate) fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(path: &str, ty: &OptionType, value: &Value) -> ConfigError {
    ConfigError::TypeMismatch {
        key: path.to_string(),
        expected: ty.describe(),
        found: kind_of(value).to_string(),
    }
}

fn quote_list(values: &[&str]) -> String {
    values
        .iter()
        .map(|v| format!("'{}'", v))
        .collect::<Vec<_>>()
        .join(", ")
}
