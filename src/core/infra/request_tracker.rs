//! 异步请求的过期丢弃
//!
//! 同一类请求只认最新的 req_id；慢一步回来的旧响应直接丢掉，
//! 例如用户连按两次刷新，或者生成任务已被放弃后才到达的轮询结果。

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug)]
pub struct RequestTracker<K> {
    pending: HashMap<K, u64>,
}

impl<K: Eq + Hash> Default for RequestTracker<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash> RequestTracker<K> {
    pub fn new() -> Self {
        Self {
            pending: HashMap::new(),
        }
    }

    /// 发起新请求并登记为该 key 的最新请求
    pub fn issue(&mut self, key: K, next_id_fn: impl FnOnce() -> u64) -> u64 {
        let id = next_id_fn();
        self.pending.insert(key, id);
        id
    }

    /// 响应是否仍然有效；有效时顺带清掉 pending
    pub fn accept(&mut self, key: &K, req_id: u64) -> bool {
        match self.pending.get(key) {
            Some(&pending_id) if pending_id == req_id => {
                self.pending.remove(key);
                true
            }
            _ => false,
        }
    }

    /// 放弃该 key 的在途请求，之后到达的响应都会被丢弃
    pub fn clear(&mut self, key: &K) {
        self.pending.remove(key);
    }

    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.contains_key(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKey {
    Words,
    SubmitWord,
    RemoveWord,
    ClearWords,
    Generate,
    TaskStatus,
    Health,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter() -> impl FnMut() -> u64 {
        let mut next = 0u64;
        move || {
            next += 1;
            next
        }
    }

    #[test]
    fn only_latest_words_refresh_is_accepted() {
        let mut tracker = RequestTracker::new();
        let mut ids = counter();

        let first = tracker.issue(RequestKey::Words, &mut ids);
        let second = tracker.issue(RequestKey::Words, &mut ids);

        assert!(!tracker.accept(&RequestKey::Words, first));
        assert!(tracker.is_pending(&RequestKey::Words));
        assert!(tracker.accept(&RequestKey::Words, second));
        assert!(!tracker.is_pending(&RequestKey::Words));
    }

    #[test]
    fn cleared_task_poll_drops_late_response() {
        let mut tracker = RequestTracker::new();
        let mut ids = counter();

        let poll = tracker.issue(RequestKey::TaskStatus, &mut ids);
        tracker.clear(&RequestKey::TaskStatus);
        assert!(!tracker.accept(&RequestKey::TaskStatus, poll));
    }

    #[test]
    fn keys_are_independent() {
        let mut tracker = RequestTracker::new();
        let mut ids = counter();

        let words = tracker.issue(RequestKey::Words, &mut ids);
        let generate = tracker.issue(RequestKey::Generate, &mut ids);

        assert!(tracker.accept(&RequestKey::Generate, generate));
        assert!(tracker.accept(&RequestKey::Words, words));
        assert!(!tracker.accept(&RequestKey::SubmitWord, words));
    }
}
