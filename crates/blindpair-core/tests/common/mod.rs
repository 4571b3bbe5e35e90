#![allow(dead_code)]

use blindpair_core::model::{ContextKey, TextInstance};
use blindpair_core::storage::Store;

pub fn instance(id: &str, variant: &str, key: &ContextKey) -> TextInstance {
    TextInstance {
        id: id.to_string(),
        context: key.clone(),
        level: Some("moderate".to_string()),
        variant_id: variant.to_string(),
        text: format!("interpretation {id}"),
        model: Some("gpt-4o".to_string()),
    }
}

pub fn memory_store(instances: &[TextInstance]) -> Store {
    let store = Store::memory().unwrap();
    store.init_schema().unwrap();
    store.insert_instances(instances).unwrap();
    store
}

pub fn phq(score: i64, profile: i64) -> ContextKey {
    ContextKey::new("PHQ-9", score, profile)
}
