// uiconf-core/src/options.rs
use crate::{ConfigError, OptionSchema, OptionSpec};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Record of a single option change, mirrored by the `optionChanged` event
#[derive(Debug, Clone, PartialEq)]
pub struct OptionChange {
    /// Top-level option name (`upload` for `upload.chunkSize`)
    pub name: String,
    /// Full dotted path
    pub full_name: String,
    pub value: Value,
    pub previous_value: Value,
}

/// Normalized option values of one widget instance
#[derive(Debug, Clone)]
pub struct Options {
    schema: OptionSchema,
    values: Map<String, Value>,
    unknown: Vec<String>,
}

impl Options {
    /// Validate `config` against `schema` and apply defaults
    pub fn new(schema: OptionSchema, config: &Value) -> Result<Self, ConfigError> {
        let validated = schema.validate(config)?;
        Ok(Self {
            schema,
            values: validated.options,
            unknown: validated.unknown,
        })
    }

    pub fn schema(&self) -> &OptionSchema {
        &self.schema
    }

    /// Keys from the construction config the schema did not recognize
    pub fn unknown(&self) -> &[String] {
        &self.unknown
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.values.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    pub fn get_as<T: DeserializeOwned>(&self, path: &str) -> Result<T, ConfigError> {
        let value = self
            .get(path)
            .ok_or_else(|| ConfigError::UnknownOption(path.to_string()))?;
        Ok(serde_json::from_value(value.clone())?)
    }

    /// Deserialize the whole option set into a typed struct
    pub fn typed<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        Ok(serde_json::from_value(Value::Object(self.values.clone()))?)
    }

    /// Change an option the way a host application would
    pub fn set(&mut self, path: &str, value: Value) -> Result<OptionChange, ConfigError> {
        self.write(path, value, false)
    }

    /// Change an option on behalf of the widget itself (read-only allowed)
    pub fn set_internal(&mut self, path: &str, value: Value) -> Result<OptionChange, ConfigError> {
        self.write(path, value, true)
    }

    fn write(
        &mut self,
        path: &str,
        value: Value,
        internal: bool,
    ) -> Result<OptionChange, ConfigError> {
        let spec = self
            .schema
            .lookup(path)
            .ok_or_else(|| ConfigError::UnknownOption(path.to_string()))?;
        if spec.read_only && !internal {
            return Err(ConfigError::ReadOnly(path.to_string()));
        }

        let mut unknown = Vec::new();
        let normalized = spec.normalize_value(path, &value, &mut unknown)?;
        for key in &unknown {
            log::warn!("unknown option '{}' ignored", key);
        }

        let previous_value = self.get(path).cloned().unwrap_or(Value::Null);
        let segments: Vec<&str> = path.split('.').collect();
        let (last, parents) = segments
            .split_last()
            .ok_or_else(|| ConfigError::UnknownOption(path.to_string()))?;

        let schema = &self.schema;
        let mut cursor = &mut self.values;
        for (i, segment) in parents.iter().enumerate() {
            let prefix = segments[..=i].join(".");
            let entry = cursor.entry(segment.to_string()).or_insert(Value::Null);
            if !entry.is_object() {
                // `editing: true` style values become a full group first
                let defaults = schema
                    .lookup(&prefix)
                    .and_then(OptionSpec::group)
                    .map(OptionSchema::defaults)
                    .unwrap_or_default();
                *entry = Value::Object(defaults);
            }
            cursor = match entry {
                Value::Object(map) => map,
                _ => return Err(ConfigError::UnknownOption(path.to_string())),
            };
        }
        cursor.insert(last.to_string(), normalized.clone());

        log::debug!("option '{}' changed", path);
        Ok(OptionChange {
            name: segments[0].to_string(),
            full_name: path.to_string(),
            value: normalized,
            previous_value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OptionType;
    use serde::Deserialize;
    use serde_json::json;

    fn schema() -> OptionSchema {
        OptionSchema::new()
            .option("rootFolderName", OptionType::String, json!("Files"))
            .option("selectedCellData", OptionType::array(OptionType::Any), json!([]))
            .read_only()
            .option(
                "editing",
                OptionType::one_of(vec![
                    OptionType::Bool,
                    OptionType::Group(
                        OptionSchema::new()
                            .option("allowAdding", OptionType::Bool, json!(true))
                            .option("allowDeleting", OptionType::Bool, json!(true)),
                    ),
                ]),
                json!(true),
            )
    }

    #[test]
    fn test_set_reports_previous_value() {
        let mut options = Options::new(schema(), &json!({})).unwrap();
        let change = options.set("rootFolderName", json!("Docs")).unwrap();
        assert_eq!(change.previous_value, json!("Files"));
        assert_eq!(change.value, json!("Docs"));
        assert_eq!(options.get("rootFolderName"), Some(&json!("Docs")));
    }

    #[test]
    fn test_set_validates_type() {
        let mut options = Options::new(schema(), &json!({})).unwrap();
        let err = options.set("rootFolderName", json!(5)).unwrap_err();
        assert!(matches!(err, ConfigError::TypeMismatch { .. }));
        assert_eq!(options.get("rootFolderName"), Some(&json!("Files")));
    }

    #[test]
    fn test_read_only_rejected_for_host() {
        let mut options = Options::new(schema(), &json!({})).unwrap();
        let err = options.set("selectedCellData", json!([1])).unwrap_err();
        assert!(matches!(err, ConfigError::ReadOnly(_)));
        options.set_internal("selectedCellData", json!([1])).unwrap();
        assert_eq!(options.get("selectedCellData"), Some(&json!([1])));
    }

    #[test]
    fn test_nested_set_expands_boolean_union() {
        let mut options = Options::new(schema(), &json!({})).unwrap();
        let change = options.set("editing.allowAdding", json!(false)).unwrap();
        assert_eq!(change.name, "editing");
        assert_eq!(change.full_name, "editing.allowAdding");
        assert_eq!(
            options.get("editing"),
            Some(&json!({ "allowAdding": false, "allowDeleting": true }))
        );
    }

    #[test]
    fn test_unknown_path_rejected() {
        let mut options = Options::new(schema(), &json!({})).unwrap();
        let err = options.set("nope", json!(1)).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownOption(key) if key == "nope"));
    }

    #[test]
    fn test_typed_view() {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct View {
            root_folder_name: String,
        }
        let options = Options::new(schema(), &json!({ "rootFolderName": "Home" })).unwrap();
        let view: View = options.typed().unwrap();
        assert_eq!(view.root_folder_name, "Home");
    }
}
