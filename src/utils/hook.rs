use std::sync::Arc;

use indexmap::IndexMap;

crate::utils::ids::id_gen!(subscription_id);

/// Unique token identifying a registered subscription
///
/// Cancelling the token through [`Subscriptions::cancel`] releases the subscription.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct SubscriptionToken(Arc<InnerId>);

#[derive(Debug, Eq, PartialEq, Hash)]
struct InnerId(u32);

impl InnerId {
    fn new() -> Self {
        Self(subscription_id::next())
    }
}

impl Drop for InnerId {
    fn drop(&mut self) {
        subscription_id::remove(self.0);
    }
}

/// Registry of listeners keyed by the object they observe
#[derive(Debug)]
pub struct Subscriptions<K, T> {
    entries: IndexMap<SubscriptionToken, (K, T)>,
}

impl<K, T> Default for Subscriptions<K, T> {
    fn default() -> Self {
        Subscriptions {
            entries: IndexMap::new(),
        }
    }
}

impl<K: PartialEq, T> Subscriptions<K, T> {
    /// Register `value` as a listener of `key`
    pub fn subscribe(&mut self, key: K, value: T) -> SubscriptionToken {
        let token = SubscriptionToken(Arc::new(InnerId::new()));
        self.entries.insert(token.clone(), (key, value));
        token
    }

    /// Release a subscription, returning the listener if it was still registered
    pub fn cancel(&mut self, token: &SubscriptionToken) -> Option<T> {
        self.entries.shift_remove(token).map(|(_, value)| value)
    }

    /// Listeners of `key`, in registration order
    pub fn subscribers<'a>(&'a self, key: &'a K) -> impl Iterator<Item = &'a T> + 'a {
        self.entries
            .values()
            .filter(move |(k, _)| k == key)
            .map(|(_, value)| value)
    }

    /// Drop every listener of `key`
    pub fn cancel_all(&mut self, key: &K) {
        self.entries.retain(|_, (k, _)| k != key);
    }

    /// Number of live subscriptions
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no subscription is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::Subscriptions;

    #[test]
    fn cancel_releases_only_that_listener() {
        let mut subs = Subscriptions::default();
        let first = subs.subscribe("DP-1", 1);
        let _second = subs.subscribe("DP-1", 2);
        let _other = subs.subscribe("HDMI-A-1", 3);

        assert_eq!(Some(1), subs.cancel(&first));
        assert_eq!(None, subs.cancel(&first));
        assert_eq!(vec![&2], subs.subscribers(&"DP-1").collect::<Vec<_>>());
        assert_eq!(2, subs.len());
    }
}
