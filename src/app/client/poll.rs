//! Waiting for a resource to reach a terminal provisioning state

use std::time::Duration;

use serde_json::Value;
use tokio::time::{sleep, Instant};
use tracing::debug;

use super::ResourceApi;
use crate::app::models::{ProvisioningState, ResourceTarget};
use crate::constants::polling;
use crate::errors::{ServiceError, ServiceResult};

/// How often and for how long to poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: polling::DEFAULT_POLL_INTERVAL,
            timeout: polling::DEFAULT_TIMEOUT,
        }
    }
}

/// Poll until the resource has succeeded, failed or been canceled
///
/// `initial` is the representation the create call returned. It is checked
/// first so an already-succeeded resource costs no further requests. A
/// missing state counts as still in progress. `on_poll` sees every state read.
pub async fn wait_for_provisioning<A: ResourceApi>(
    api: &A,
    target: &ResourceTarget,
    policy: &PollPolicy,
    initial: Value,
    mut on_poll: impl FnMut(Option<&ProvisioningState>),
) -> ServiceResult<Value> {
    // A timeout too large to represent means no deadline at all
    let deadline = Instant::now().checked_add(policy.timeout);
    let mut resource = initial;

    loop {
        let state = ProvisioningState::of(&resource);
        on_poll(state.as_ref());

        match state {
            Some(ProvisioningState::Succeeded) => return Ok(resource),
            Some(state) if state.is_terminal() => {
                return Err(ServiceError::ProvisioningFailed {
                    resource_id: target.resource_id(),
                    state: state.to_string(),
                })
            }
            Some(state) => debug!("{} is {}", target, state),
            None => debug!("{} reported no provisioning state yet", target),
        }

        let pause = match deadline {
            Some(deadline) => {
                let now = Instant::now();
                if now >= deadline {
                    return Err(ServiceError::ProvisioningTimeout {
                        resource_id: target.resource_id(),
                        seconds: policy.timeout.as_secs(),
                    });
                }
                policy.interval.min(deadline - now)
            }
            None => policy.interval,
        };
        sleep(pause).await;

        resource = api.show(target).await?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::manifest::ManifestDocument;
    use serde_json::json;
    use std::sync::Mutex;

    /// Returns queued states from `show`, repeating the last one
    struct ScriptedApi {
        states: Mutex<Vec<&'static str>>,
        shows: Mutex<usize>,
    }

    impl ScriptedApi {
        fn new(states: &[&'static str]) -> Self {
            Self {
                states: Mutex::new(states.iter().rev().copied().collect()),
                shows: Mutex::new(0),
            }
        }

        fn shows(&self) -> usize {
            *self.shows.lock().unwrap()
        }
    }

    impl ResourceApi for ScriptedApi {
        async fn create_or_update(
            &self,
            _target: &ResourceTarget,
            document: &ManifestDocument,
        ) -> ServiceResult<Value> {
            Ok(document.as_value().clone())
        }

        async fn show(&self, _target: &ResourceTarget) -> ServiceResult<Value> {
            *self.shows.lock().unwrap() += 1;
            let mut states = self.states.lock().unwrap();
            let state = if states.len() > 1 {
                states.pop().unwrap_or_default()
            } else {
                states.last().copied().unwrap_or_default()
            };
            Ok(json!({"properties": {"provisioningState": state}}))
        }
    }

    fn target() -> ResourceTarget {
        ResourceTarget::new("sub", "rg", "app").unwrap()
    }

    fn fast() -> PollPolicy {
        PollPolicy {
            interval: Duration::from_millis(5),
            timeout: Duration::from_secs(5),
        }
    }

    fn state(s: &str) -> Value {
        json!({"properties": {"provisioningState": s}})
    }

    #[tokio::test]
    async fn test_already_succeeded_needs_no_poll() {
        let api = ScriptedApi::new(&["Failed"]);
        let resource = wait_for_provisioning(&api, &target(), &fast(), state("Succeeded"), |_| {})
            .await
            .unwrap();
        assert_eq!(resource, state("Succeeded"));
        assert_eq!(api.shows(), 0);
    }

    #[tokio::test]
    async fn test_polls_until_succeeded() {
        let api = ScriptedApi::new(&["InProgress", "InProgress", "Succeeded"]);
        let mut seen = Vec::new();
        let resource = wait_for_provisioning(&api, &target(), &fast(), json!({}), |s| {
            seen.push(s.map(|s| s.to_string()))
        })
        .await
        .unwrap();

        assert_eq!(resource, state("Succeeded"));
        assert_eq!(api.shows(), 3);
        assert_eq!(seen[0], None);
        assert_eq!(seen.last().unwrap().as_deref(), Some("Succeeded"));
    }

    #[tokio::test]
    async fn test_failed_state_is_an_error() {
        let api = ScriptedApi::new(&["InProgress", "Failed"]);
        let err = wait_for_provisioning(&api, &target(), &fast(), state("InProgress"), |_| {})
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::ProvisioningFailed { ref state, .. } if state == "Failed"
        ));
    }

    #[tokio::test]
    async fn test_times_out() {
        let api = ScriptedApi::new(&["InProgress"]);
        let policy = PollPolicy {
            interval: Duration::from_millis(5),
            timeout: Duration::from_millis(30),
        };
        let err = wait_for_provisioning(&api, &target(), &policy, state("InProgress"), |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::ProvisioningTimeout { .. }));
        assert!(api.shows() >= 1);
    }

    #[tokio::test]
    async fn test_unrepresentable_timeout_waits_without_deadline() {
        let api = ScriptedApi::new(&["InProgress", "Succeeded"]);
        let policy = PollPolicy {
            interval: Duration::from_millis(5),
            timeout: Duration::MAX,
        };
        let resource =
            wait_for_provisioning(&api, &target(), &policy, state("InProgress"), |_| {})
                .await
                .unwrap();
        assert_eq!(resource, state("Succeeded"));
        assert_eq!(api.shows(), 2);
    }
}
