// uiconf-widgets/src/scheduler/store.rs
use async_trait::async_trait;
use serde_json::Value;
use uiconf_core::{ConfigError, ErrorCode, OperationError};

use super::appointment::Appointment;

/// Backing store of a scheduler's appointments
#[async_trait(?Send)]
pub trait AppointmentStore {
    /// Every stored appointment; the scheduler filters by view range
    async fn load(&self) -> Result<Vec<Appointment>, OperationError>;

    async fn insert(&mut self, appointment: &Appointment) -> Result<Appointment, OperationError>;

    /// Replace `target` with `appointment`
    async fn update(
        &mut self,
        target: &Appointment,
        appointment: &Appointment,
    ) -> Result<Appointment, OperationError>;

    async fn remove(&mut self, appointment: &Appointment) -> Result<(), OperationError>;
}

fn not_found() -> OperationError {
    OperationError::new(ErrorCode::Unspecified, "Appointment not found.")
}

/// Array-backed store
///
/// With a key expression, appointments are matched by that field;
/// otherwise by value.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAppointmentStore {
    items: Vec<Appointment>,
    key: Option<String>,
}

impl InMemoryAppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Seed from an array-valued `dataSource` option
    pub fn from_json(value: &Value) -> Result<Self, ConfigError> {
        let items = value.as_array().ok_or_else(|| ConfigError::TypeMismatch {
            key: "dataSource".to_string(),
            expected: "array of appointments".to_string(),
            found: "non-array".to_string(),
        })?;
        if let Some(index) = items.iter().position(|item| !item.is_object()) {
            return Err(ConfigError::TypeMismatch {
                key: format!("dataSource[{}]", index),
                expected: "object".to_string(),
                found: "non-object".to_string(),
            });
        }
        Ok(Self {
            items: items.clone(),
            key: None,
        })
    }

    pub fn items(&self) -> &[Appointment] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn key_of<'a>(&self, data: &'a Appointment) -> Option<&'a Value> {
        let key = self.key.as_deref()?;
        data.get(key).filter(|k| !k.is_null())
    }

    fn position(&self, target: &Appointment) -> Option<usize> {
        match self.key_of(target) {
            Some(key) => self
                .items
                .iter()
                .position(|item| self.key_of(item) == Some(key)),
            None => self.items.iter().position(|item| item == target),
        }
    }
}

#[async_trait(?Send)]
impl AppointmentStore for InMemoryAppointmentStore {
    async fn load(&self) -> Result<Vec<Appointment>, OperationError> {
        Ok(self.items.clone())
    }

    async fn insert(&mut self, appointment: &Appointment) -> Result<Appointment, OperationError> {
        if self.key_of(appointment).is_some() && self.position(appointment).is_some() {
            return Err(OperationError::new(
                ErrorCode::Unspecified,
                "An appointment with the same key already exists.",
            ));
        }
        self.items.push(appointment.clone());
        Ok(appointment.clone())
    }

    async fn update(
        &mut self,
        target: &Appointment,
        appointment: &Appointment,
    ) -> Result<Appointment, OperationError> {
        let index = self.position(target).ok_or_else(not_found)?;
        self.items[index] = appointment.clone();
        Ok(appointment.clone())
    }

    async fn remove(&mut self, appointment: &Appointment) -> Result<(), OperationError> {
        let index = self.position(appointment).ok_or_else(not_found)?;
        self.items.remove(index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use serde_json::json;

    #[test]
    fn test_from_json_rejects_non_objects() {
        assert!(InMemoryAppointmentStore::from_json(&json!([{ "text": "a" }])).is_ok());
        assert!(matches!(
            InMemoryAppointmentStore::from_json(&json!([{ "text": "a" }, 3])),
            Err(ConfigError::TypeMismatch { key, .. }) if key == "dataSource[1]"
        ));
        assert!(InMemoryAppointmentStore::from_json(&json!("url")).is_err());
    }

    #[test]
    fn test_value_matching_without_key() {
        let mut store = InMemoryAppointmentStore::new();
        let a = json!({ "text": "a" });
        block_on(store.insert(&a)).unwrap();
        block_on(store.update(&a, &json!({ "text": "b" }))).unwrap();
        assert_eq!(store.items(), [json!({ "text": "b" })]);

        let err = block_on(store.remove(&a)).unwrap_err();
        assert_eq!(err.text, "Appointment not found.");
        block_on(store.remove(&json!({ "text": "b" }))).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_key_matching() {
        let mut store = InMemoryAppointmentStore::new().with_key("id");
        block_on(store.insert(&json!({ "id": 1, "text": "a" }))).unwrap();
        assert!(block_on(store.insert(&json!({ "id": 1, "text": "dup" }))).is_err());

        block_on(store.update(&json!({ "id": 1 }), &json!({ "id": 1, "text": "renamed" })))
            .unwrap();
        assert_eq!(store.items()[0]["text"], "renamed");
        block_on(store.remove(&json!({ "id": 1 }))).unwrap();
        assert_eq!(store.len(), 0);
    }
}
