use std::sync::{Mutex, MutexGuard, OnceLock};

pub const NETWORK_POLICY_ENV: &str = "BOUNTY_NETWORK_POLICY";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NetworkPolicy {
    Allow,
    Deny(String),
}

#[derive(Debug)]
struct NetworkState {
    policy: NetworkPolicy,
}

fn state() -> MutexGuard<'static, NetworkState> {
    static STATE: OnceLock<Mutex<NetworkState>> = OnceLock::new();
    STATE
        .get_or_init(|| {
            Mutex::new(NetworkState {
                policy: NetworkPolicy::Allow,
            })
        })
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Scoped override of the process-wide outbound policy; the previous policy
/// is restored on drop.
pub struct NetworkPolicyGuard {
    previous: NetworkPolicy,
}

impl NetworkPolicyGuard {
    pub fn set(policy: NetworkPolicy) -> Self {
        let mut s = state();
        let previous = std::mem::replace(&mut s.policy, policy);
        Self { previous }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self::set(NetworkPolicy::Deny(reason.into()))
    }
}

impl Drop for NetworkPolicyGuard {
    fn drop(&mut self) {
        state().policy = self.previous.clone();
    }
}

/// Gate every outbound request (oracle and content fetch) on the current policy.
pub fn check_outbound(target: &str) -> anyhow::Result<()> {
    match effective_policy() {
        NetworkPolicy::Allow => Ok(()),
        NetworkPolicy::Deny(reason) => anyhow::bail!(
            "outbound network blocked by policy (target={}): {}",
            target,
            reason
        ),
    }
}

fn effective_policy() -> NetworkPolicy {
    if let Ok(raw) = std::env::var(NETWORK_POLICY_ENV) {
        if raw.trim().eq_ignore_ascii_case("deny") {
            return NetworkPolicy::Deny(format!("{}=deny", NETWORK_POLICY_ENV));
        }
    }
    state().policy.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial(network_policy)]
    fn scoped_deny_blocks_and_restores() {
        std::env::remove_var(NETWORK_POLICY_ENV);
        let guard = NetworkPolicyGuard::deny("test deny");
        let err = check_outbound("test-target").unwrap_err().to_string();
        assert!(err.contains("outbound network blocked by policy"));
        assert!(err.contains("test-target"));
        drop(guard);
        check_outbound("test-target").unwrap();
    }

    #[test]
    #[serial(network_policy)]
    fn env_deny_overrides_scoped_allow() {
        let previous = std::env::var(NETWORK_POLICY_ENV).ok();
        let _guard = NetworkPolicyGuard::set(NetworkPolicy::Allow);
        std::env::set_var(NETWORK_POLICY_ENV, "DENY");
        let err = check_outbound("env-target").unwrap_err().to_string();
        assert!(err.contains("BOUNTY_NETWORK_POLICY=deny"));
        match previous {
            Some(v) => std::env::set_var(NETWORK_POLICY_ENV, v),
            None => std::env::remove_var(NETWORK_POLICY_ENV),
        }
    }
}
