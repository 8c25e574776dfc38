//! Voice Query Handlers

use serde::Serialize;
use std::sync::Arc;

use crate::application::queries::ListVoices;
use crate::domain::{VoiceCatalog, VoiceId};

/// 音色目录响应
#[derive(Debug, Clone, Serialize)]
pub struct VoiceListResponse {
    pub voices: Vec<VoiceId>,
    /// 未分配时使用的兜底音色
    pub fallback: VoiceId,
}

/// ListVoices Handler
pub struct ListVoicesHandler {
    catalog: Arc<VoiceCatalog>,
}

impl ListVoicesHandler {
    pub fn new(catalog: Arc<VoiceCatalog>) -> Self {
        Self { catalog }
    }

    pub fn handle(&self, _query: ListVoices) -> VoiceListResponse {
        VoiceListResponse {
            voices: self.catalog.list_voices().to_vec(),
            fallback: self.catalog.fallback().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_keeps_catalog_order() {
        let catalog = Arc::new(VoiceCatalog::new(["b", "a"]).unwrap());
        let response = ListVoicesHandler::new(catalog).handle(ListVoices);
        let ids: Vec<&str> = response.voices.iter().map(|v| v.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(response.fallback.as_str(), "b");
    }
}
