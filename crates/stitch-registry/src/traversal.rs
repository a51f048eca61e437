//! 依存グラフの幅優先走査

use crate::error::Result;
use crate::registry::ServiceRegistry;
use crate::source::SpecSource;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use stitch_core::{ResolvedSpec, ServiceReference, strip_mock_suffix};
use tracing::debug;

/// 走査で訪問したサービス
#[derive(Debug, Clone)]
pub struct Visit {
    /// 解決名（モックなら `<name>-mocks`）
    pub name: String,
    pub spec: Arc<ResolvedSpec>,
}

/// `ServiceRegistry::walk` が返す走査状態
///
/// `next().await` ごとに1サービスを解決して返す。
/// 呼び出し側の処理が終わるまで次のノードは解決されない。
pub struct Traversal<'a, S> {
    registry: &'a mut ServiceRegistry<S>,
    real_services: HashSet<String>,
    queue: VecDeque<ServiceReference>,
    visited: HashSet<String>,
}

impl<'a, S: SpecSource> Traversal<'a, S> {
    pub(crate) fn new(registry: &'a mut ServiceRegistry<S>, requested: &[ServiceReference]) -> Self {
        Self {
            registry,
            real_services: requested.iter().map(|r| r.name.clone()).collect(),
            queue: requested.iter().cloned().collect(),
            visited: HashSet::new(),
        }
    }

    /// 次のサービスを解決して返す。キューが空なら `None`
    pub async fn next(&mut self) -> Result<Option<Visit>> {
        while let Some(reference) = self.queue.pop_front() {
            // `svc` と `svc-mocks` は同じ論理サービス
            let logical = strip_mock_suffix(&reference.name).unwrap_or(reference.name.as_str());
            if !self.visited.insert(logical.to_string()) {
                continue;
            }

            let spec = self
                .registry
                .resolve(
                    &reference.name,
                    &self.real_services,
                    reference.ref_override.as_deref(),
                )
                .await?;
            let name = ServiceRegistry::<S>::effective_name(&reference.name, &self.real_services);

            debug!(service = %name, dependencies = ?spec.dependencies, "Visiting");
            self.queue.extend(
                spec.dependencies
                    .iter()
                    .map(|dep| ServiceReference::bare(dep.as_str())),
            );

            return Ok(Some(Visit { name, spec }));
        }

        Ok(None)
    }
}
