//! Response node helpers

use error_stack::Report;
use serde_json::Value;

use crate::constants::{FAILURE_DESCRIPTION, OUTCOME, RESULT, STEP_PREFIX, SUCCESS};
use crate::error::{Error, Result};

/// Check a response node's outcome and take its `result`
///
/// A successful operation without a result yields `Value::Null`.
pub fn into_result(mut response: Value, action: &str) -> Result<Value> {
    let outcome = response
        .get(OUTCOME)
        .and_then(Value::as_str)
        .map(str::to_string);
    match outcome.as_deref() {
        Some(SUCCESS) => Ok(response
            .get_mut(RESULT)
            .map(Value::take)
            .unwrap_or(Value::Null)),
        Some(outcome) => {
            let failure = response
                .get(FAILURE_DESCRIPTION)
                .map_or_else(|| "no failure description".to_string(), describe_failure);
            Err(Report::new(Error::transport_failed(action, failure))
                .attach(format!("Outcome: {outcome}")))
        }
        None => Err(Report::new(Error::missing("outcome")).attach(format!("Action: {action}"))),
    }
}

/// The response node of composite step `index` (1-based)
pub fn step_result(composite_result: &Value, index: usize) -> Option<&Value> {
    composite_result.get(format!("{STEP_PREFIX}{index}"))
}

fn describe_failure(failure: &Value) -> String {
    failure
        .as_str()
        .map_or_else(|| failure.to_string(), str::to_string)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_success_takes_result() {
        let response = json!({"outcome": "success", "result": ["console-handler"]});
        let result = into_result(response, "read children").ok();
        assert_eq!(result, Some(json!(["console-handler"])));
    }

    #[test]
    fn test_success_without_result_is_null() {
        let result = into_result(json!({"outcome": "success"}), "add").ok();
        assert_eq!(result, Some(Value::Null));
    }

    #[test]
    fn test_failed_outcome_is_transport_error() {
        let response = json!({
            "outcome": "failed",
            "failure-description": "WFLYCTL0216: Management resource not found"
        });
        let err = into_result(response, "describe").err();

        match err.as_ref().map(Report::current_context) {
            Some(Error::Transport(message)) => {
                assert!(message.contains("WFLYCTL0216"), "{message}");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_missing_outcome() {
        let err = into_result(json!({"result": 1}), "describe").err();
        assert!(matches!(
            err.as_ref().map(Report::current_context),
            Some(Error::Transport(_))
        ));
    }

    #[test]
    fn test_step_result() {
        let result = json!({"step-1": {"outcome": "success"}, "step-2": {"outcome": "failed"}});
        assert_eq!(
            step_result(&result, 2).and_then(|step| step.get("outcome")),
            Some(&json!("failed"))
        );
        assert!(step_result(&result, 3).is_none());
    }
}
