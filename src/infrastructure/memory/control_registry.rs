//! In-Memory Control Registry Implementation

use dashmap::DashMap;

use crate::application::ports::{ControlBinding, ControlId, ControlRegistryPort, ControlState};

/// 内存控件注册表
pub struct InMemoryControlRegistry {
    /// control_id -> 绑定的台词
    bindings: DashMap<ControlId, ControlBinding>,
    /// control_id -> 非空闲状态（空闲控件不保存）
    states: DashMap<ControlId, ControlState>,
}

impl InMemoryControlRegistry {
    pub fn new() -> Self {
        Self {
            bindings: DashMap::new(),
            states: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for InMemoryControlRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlRegistryPort for InMemoryControlRegistry {
    fn bind(&self, id: ControlId, binding: ControlBinding) {
        tracing::trace!(control_id = %id, speaker = %binding.speaker, "Control bound");
        self.bindings.insert(id, binding);
    }

    fn binding(&self, id: &ControlId) -> Option<ControlBinding> {
        self.bindings.get(id).map(|b| b.clone())
    }

    fn unbind(&self, id: &ControlId) {
        self.bindings.remove(id);
    }

    fn try_begin(&self, id: &ControlId) -> bool {
        // entry 持有分片锁，检查与写入是原子的
        let mut state = self.states.entry(id.clone()).or_default();
        if *state != ControlState::Idle {
            return false;
        }
        *state = ControlState::Loading;
        true
    }

    fn set_state(&self, id: &ControlId, state: ControlState) {
        if state == ControlState::Idle {
            self.states.remove(id);
        } else {
            self.states.insert(id.clone(), state);
        }
    }

    fn state(&self, id: &ControlId) -> ControlState {
        self.states.get(id).map(|s| *s).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MessageId;
    use std::sync::Arc;

    fn binding() -> ControlBinding {
        ControlBinding {
            message_id: MessageId::new("m1"),
            index: 0,
            speaker: "Alice".to_string(),
            text: "Hi".to_string(),
        }
    }

    #[test]
    fn test_bind_and_unbind() {
        let registry = InMemoryControlRegistry::new();
        let id = ControlId::new("c1");
        registry.bind(id.clone(), binding());
        assert_eq!(registry.binding(&id), Some(binding()));
        registry.unbind(&id);
        assert!(registry.binding(&id).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_try_begin_is_exclusive_until_idle() {
        let registry = InMemoryControlRegistry::new();
        let id = ControlId::new("c1");

        assert!(registry.try_begin(&id));
        assert_eq!(registry.state(&id), ControlState::Loading);
        assert!(!registry.try_begin(&id));

        registry.set_state(&id, ControlState::Error);
        assert!(!registry.try_begin(&id));

        registry.set_state(&id, ControlState::Idle);
        assert!(registry.try_begin(&id));
    }

    #[test]
    fn test_concurrent_try_begin_single_winner() {
        let registry = Arc::new(InMemoryControlRegistry::new());
        let id = ControlId::new("c1");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                let id = id.clone();
                std::thread::spawn(move || registry.try_begin(&id))
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
    }
}
