//! Uniform success/error wrapper returned by every operation

use serde::{Serialize, Serializer};

use crate::utils::errors::{InspectError, Result};

/// `{"success": true, ...payload}` or `{"success": false, "error": "..."}`.
///
/// The failure side keeps the typed error so callers can still ask it for
/// suggestions; only its message is serialized.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<T> {
    Success(T),
    Failure(InspectError),
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success(_))
    }

    pub fn payload(&self) -> Option<&T> {
        match self {
            Envelope::Success(payload) => Some(payload),
            Envelope::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&InspectError> {
        match self {
            Envelope::Success(_) => None,
            Envelope::Failure(err) => Some(err),
        }
    }

    /// The `error` field as serialized
    pub fn error_message(&self) -> Option<String> {
        self.error().map(ToString::to_string)
    }

    pub fn into_result(self) -> Result<T> {
        match self {
            Envelope::Success(payload) => Ok(payload),
            Envelope::Failure(err) => Err(err),
        }
    }
}

impl<T> From<Result<T>> for Envelope<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(payload) => Envelope::Success(payload),
            Err(err) => {
                tracing::debug!(error = %err, "operation failed");
                Envelope::Failure(err)
            }
        }
    }
}

impl<T> From<InspectError> for Envelope<T> {
    fn from(err: InspectError) -> Self {
        Envelope::from(Err::<T, _>(err))
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum Repr<'a, T> {
    Success {
        success: bool,
        #[serde(flatten)]
        payload: &'a T,
    },
    Failure {
        success: bool,
        error: String,
    },
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let repr = match self {
            Envelope::Success(payload) => Repr::Success {
                success: true,
                payload,
            },
            Envelope::Failure(err) => Repr::Failure {
                success: false,
                error: err.to_string(),
            },
        };
        repr.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Names {
        names: Vec<&'static str>,
    }

    #[test]
    fn test_success_flattens_payload() {
        let envelope: Envelope<Names> = Ok(Names { names: vec!["a", "b"] }).into();
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value, json!({"success": true, "names": ["a", "b"]}));
    }

    #[test]
    fn test_failure_has_only_error() {
        let envelope: Envelope<Names> = InspectError::invalid("namespace is required").into();
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            value,
            json!({"success": false, "error": "invalid request: namespace is required"})
        );
    }

    #[test]
    fn test_exactly_one_side() {
        let ok: Envelope<u8> = Envelope::Success(1);
        assert!(ok.payload().is_some() && ok.error().is_none());

        let err: Envelope<u8> = Envelope::Failure(InspectError::execution("boom"));
        assert!(err.payload().is_none() && err.error().is_some());
        assert_eq!(err.error_message().as_deref(), Some("boom"));
        assert_eq!(err.into_result(), Err(InspectError::execution("boom")));
    }
}
