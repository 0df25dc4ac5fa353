//! Test Fixtures

use async_trait::async_trait;
use shadcn_term::error::{Error, Result};
use shadcn_term::models::RawComponent;
use shadcn_term::registry::source::parse_index;
use shadcn_term::registry::RegistrySource;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// A trimmed copy of the public component index
pub fn registry_payload() -> &'static str {
    r#"[
        {"name": "accordion", "type": "registry:ui", "dependencies": ["@radix-ui/react-accordion"], "files": ["ui/accordion.tsx"]},
        {"name": "button", "type": "registry:ui", "dependencies": ["@radix-ui/react-slot"], "files": ["ui/button.tsx"]},
        {"name": "card", "type": "registry:ui", "files": ["ui/card.tsx"]},
        {"name": "form", "type": "registry:ui", "dependencies": ["@radix-ui/react-label", "react-hook-form", "zod"], "registryDependencies": ["button", "label"]}
    ]"#
}

/// In-memory registry source counting its fetches
pub struct StaticSource {
    payload: Mutex<String>,
    fetches: AtomicUsize,
    failing: AtomicBool,
}

impl StaticSource {
    pub fn new(payload: &str) -> Self {
        Self {
            payload: Mutex::new(payload.to_string()),
            fetches: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_payload(&self, payload: &str) {
        *self.payload.lock().unwrap() = payload.to_string();
    }
}

#[async_trait]
impl RegistrySource for StaticSource {
    fn location(&self) -> &str {
        "memory://registry"
    }

    async fn fetch(&self) -> Result<Vec<RawComponent>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::FetchFailed {
                url: self.location().to_string(),
                reason: "HTTP 503 Service Unavailable".to_string(),
            });
        }

        let payload = self.payload.lock().unwrap().clone();
        parse_index(payload.as_bytes()).map_err(|e| Error::FetchFailed {
            url: self.location().to_string(),
            reason: e.to_string(),
        })
    }
}
