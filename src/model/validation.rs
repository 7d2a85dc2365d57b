//! Completeness checks before a device type is accepted

use thiserror::Error;

use super::{DeviceType, Service};

/// A required field is missing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("service {service:?} is missing its {field}")]
    IncompleteService { service: String, field: &'static str },
}

pub type ValidationResult<T> = Result<T, ValidationError>;

impl Service {
    /// A service needs a protocol (by name or id), a url, a name and a
    /// description
    pub fn validate(&self) -> ValidationResult<()> {
        let missing = if self.protocol.name.is_empty() && self.protocol.id.is_empty() {
            Some("protocol")
        } else if self.url.is_empty() {
            Some("url")
        } else if self.name.is_empty() {
            Some("name")
        } else if self.description.is_empty() {
            Some("description")
        } else {
            None
        };
        match missing {
            Some(field) => Err(ValidationError::IncompleteService {
                service: self.name.clone(),
                field,
            }),
            None => Ok(()),
        }
    }
}

impl DeviceType {
    pub fn validate(&self) -> ValidationResult<()> {
        self.services.iter().try_for_each(Service::validate)
    }
}
