use hickory_proto::op::Message;
use phantom_dns_domain::CacheKey;

/// Application-layer port for the response cache.
///
/// All methods are synchronous: the cache is an in-memory structure and is
/// never consulted while holding any other lock, so readers stay concurrent
/// with upstream exchanges.
pub trait ResponseCachePort: Send + Sync {
    /// Fetch a stored answer. Returns `None` both when the key is absent and
    /// when the stored entry has expired.
    fn get(&self, key: &CacheKey) -> Option<Message>;

    /// Store an answer. The entry TTL is derived from the message's own
    /// record TTLs; `cost_hint` is the admission weight counted against the
    /// configured capacity. Concurrent puts for the same key are
    /// last-writer-wins.
    fn put(&self, key: CacheKey, response: &Message, cost_hint: usize);

    /// Drop expired entries eagerly. Returns the number removed.
    fn purge_expired(&self) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
