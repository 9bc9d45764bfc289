//! Invocation result types.

use crate::error::{DispatchError, NoApplicableMethodError};

/// Outcome of invoking a generic function.
///
/// "No applicable method" is an ordinary outcome, so callers can probe
/// dispatchability without going through error handling.
#[derive(Debug, Clone, PartialEq)]
pub enum InvokeResult<V> {
    /// The effective method ran; carries the primary result, if any.
    Returned(Option<V>),
    /// No method in any role applies to the arguments.
    NoApplicableMethod(NoApplicableMethodError),
}

impl<V> InvokeResult<V> {
    pub fn is_no_applicable_method(&self) -> bool {
        matches!(self, InvokeResult::NoApplicableMethod(_))
    }

    /// The returned value, if a method ran and produced one.
    pub fn value(&self) -> Option<&V> {
        match self {
            InvokeResult::Returned(value) => value.as_ref(),
            InvokeResult::NoApplicableMethod(_) => None,
        }
    }

    /// Convert to a plain result, treating "no applicable method" as an error.
    pub fn into_result(self) -> Result<Option<V>, DispatchError> {
        match self {
            InvokeResult::Returned(value) => Ok(value),
            InvokeResult::NoApplicableMethod(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_applicable_method_into_error() {
        let result: InvokeResult<i32> = InvokeResult::NoApplicableMethod(NoApplicableMethodError {
            generic: "append".to_string(),
            arguments: vec!["1".to_string(), "2".to_string()],
            candidates: 3,
        });
        assert!(result.is_no_applicable_method());
        assert_eq!(result.value(), None);

        let err = result.into_result().unwrap_err();
        assert_eq!(
            err.to_string(),
            "no applicable method for `append` with arguments (1, 2)"
        );
    }

    #[test]
    fn test_returned_value() {
        let result = InvokeResult::Returned(Some(7));
        assert_eq!(result.value(), Some(&7));
        assert_eq!(result.into_result().unwrap(), Some(7));
        assert_eq!(InvokeResult::<i32>::Returned(None).value(), None);
    }
}
