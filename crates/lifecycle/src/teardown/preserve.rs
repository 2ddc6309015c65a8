//! Keys exempt from the sign-out clear

use client_lifecycle_core::{NetworkState, keys};

/// Ordered set of store keys kept across a sign-out clear
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreservedKeySet {
    keys: Vec<&'static str>,
}

impl PreservedKeySet {
    /// Keys to keep when signing out.
    ///
    /// Locale, the active client registry and the device id always survive.
    /// The connectivity record survives only when the client is offline on
    /// its own; a user-forced offline state is reset along with the session.
    pub fn for_sign_out(network: Option<&NetworkState>) -> Self {
        let mut keys = keys::ALWAYS_PRESERVED.to_vec();
        if network.is_some_and(NetworkState::is_organically_offline) {
            keys.push(keys::NETWORK);
        }
        Self { keys }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|preserved| *preserved == key)
    }

    pub fn as_slice(&self) -> &[&'static str] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network(is_offline: bool, should_force_offline: bool) -> NetworkState {
        NetworkState {
            is_offline,
            should_force_offline,
            ..Default::default()
        }
    }

    #[test]
    fn test_always_preserved_keys() {
        let set = PreservedKeySet::for_sign_out(None);
        assert_eq!(
            set.as_slice(),
            &[keys::NVP_PREFERRED_LOCALE, keys::ACTIVE_CLIENTS, keys::DEVICE_ID]
        );
        assert!(!set.contains(keys::NETWORK));
    }

    #[test]
    fn test_organic_offline_keeps_network() {
        let set = PreservedKeySet::for_sign_out(Some(&network(true, false)));
        assert!(set.contains(keys::NETWORK));
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn test_forced_offline_drops_network() {
        let set = PreservedKeySet::for_sign_out(Some(&network(true, true)));
        assert!(!set.contains(keys::NETWORK));
    }

    #[test]
    fn test_online_drops_network() {
        let set = PreservedKeySet::for_sign_out(Some(&network(false, false)));
        assert!(!set.contains(keys::NETWORK));
        assert!(!set.contains(keys::SESSION));
    }
}
