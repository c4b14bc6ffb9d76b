use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::cache::{ContentCache, NAMESPACES};

/// Drop cached responses, either one namespace or everything
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClearCacheCommand {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearCacheResponse {
    /// `None` when every namespace was cleared
    pub namespace: Option<String>,
    pub removed: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ClearCacheError {
    #[error("Unknown cache namespace '{0}'. Must be one of: {names}", names = NAMESPACES.join(", "))]
    UnknownNamespace(String),
}

impl Request<Result<ClearCacheResponse, ClearCacheError>> for ClearCacheCommand {}

impl crate::cqrs::middleware::Command for ClearCacheCommand {}

impl ClearCacheCommand {
    /// The namespace to clear, or `None` for all of them
    pub fn validate(&self) -> Result<Option<&str>, ClearCacheError> {
        match self.namespace.as_deref().map(str::trim).filter(|ns| !ns.is_empty()) {
            None => Ok(None),
            Some(ns) if NAMESPACES.contains(&ns) => Ok(Some(ns)),
            Some(ns) => Err(ClearCacheError::UnknownNamespace(ns.to_string())),
        }
    }
}

#[tracing::instrument(skip(cache))]
pub async fn handle(
    cache: ContentCache,
    command: ClearCacheCommand,
) -> Result<ClearCacheResponse, ClearCacheError> {
    let namespace = command.validate()?;

    let removed = match namespace {
        Some(ns) => cache.clear_namespace(ns),
        None => cache.clear(),
    };

    tracing::info!(namespace = ?namespace, removed, "Cache cleared");

    Ok(ClearCacheResponse {
        namespace: namespace.map(str::to_string),
        removed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{DATA_SET_FILES_NAMESPACE, THEMES_NAMESPACE};
    use crate::config::CacheConfig;

    fn populated_cache() -> ContentCache {
        let cache = ContentCache::new(CacheConfig::default());
        cache.insert(ContentCache::key(THEMES_NAMESPACE, &1).unwrap(), &"themes");
        cache.insert(ContentCache::key(DATA_SET_FILES_NAMESPACE, &1).unwrap(), &"a");
        cache.insert(ContentCache::key(DATA_SET_FILES_NAMESPACE, &2).unwrap(), &"b");
        cache
    }

    #[tokio::test]
    async fn test_clear_namespace() {
        let cache = populated_cache();
        let command = ClearCacheCommand {
            namespace: Some(" data-set-files ".to_string()),
        };

        let response = handle(cache.clone(), command).await.unwrap();

        assert_eq!(response.namespace.as_deref(), Some(DATA_SET_FILES_NAMESPACE));
        assert_eq!(response.removed, 2);
        assert_eq!(cache.stats().total_entries, 1);
    }

    #[tokio::test]
    async fn test_clear_everything() {
        let cache = populated_cache();
        let response = handle(cache.clone(), ClearCacheCommand::default()).await.unwrap();
        assert_eq!(response.namespace, None);
        assert_eq!(response.removed, 3);
        assert_eq!(cache.stats().total_entries, 0);
    }

    #[tokio::test]
    async fn test_unknown_namespace_rejected() {
        let cache = populated_cache();
        let command = ClearCacheCommand {
            namespace: Some("feedback".to_string()),
        };

        let err = handle(cache.clone(), command).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown cache namespace 'feedback'. Must be one of: themes, publications, data-set-files"
        );
        assert_eq!(cache.stats().total_entries, 3);
    }
}
