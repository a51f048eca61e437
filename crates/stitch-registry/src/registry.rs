//! ServiceRegistry: 論理サービス名から解決済み仕様への遅延解決

use crate::error::{RegistryError, Result};
use crate::model::RegistryEntry;
use crate::source::SpecSource;
use crate::traversal::Traversal;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use stitch_core::{
    MOCK_SUFFIX, ResolvedSpec, ServiceReference, SpecError, load_spec, mock_name,
    strip_mock_suffix, validate_registry_document,
};
use tracing::{debug, info};

/// マイクロサービス Registry
///
/// 各エントリの仕様は初回の `resolve` で取得・検証され、以降はキャッシュを返す。
pub struct ServiceRegistry<S> {
    entries: BTreeMap<String, RegistryEntry>,
    source: S,
}

impl<S: SpecSource> ServiceRegistry<S> {
    /// Registry ドキュメントから構築
    ///
    /// `mocks` を持つエントリには `<name>-mocks` エントリを合成する。
    pub fn new(document: &serde_json::Value, source: S) -> Result<Self> {
        validate_registry_document(document)?;

        let base: BTreeMap<String, RegistryEntry> = serde_json::from_value(document.clone())
            .map_err(|e| SpecError::RegistryMalformed(e.to_string()))?;

        let mut entries = BTreeMap::new();
        for (name, entry) in base {
            if let Some(mock) = entry.synthesize_mock() {
                entries.insert(mock_name(&name), mock);
            }
            entries.insert(name, entry);
        }

        debug!(services = entries.len(), "Registry loaded");
        Ok(Self { entries, source })
    }

    pub fn exists(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn entry(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.get(name)
    }

    /// 登録済みの名前（合成されたモックを含む）
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// 実サービスとして扱う名前ならそのまま、それ以外はモック名
    pub fn effective_name(logical_name: &str, real_services: &HashSet<String>) -> String {
        if real_services.contains(logical_name) || logical_name.ends_with(MOCK_SUFFIX) {
            logical_name.to_string()
        } else {
            mock_name(logical_name)
        }
    }

    /// 論理サービス名を解決済み仕様に解決する
    ///
    /// `real_services` に含まれない名前はモックに置き換えられる。
    /// 一度解決した仕様はキャッシュされ、同じ `Arc` を返す。
    #[tracing::instrument(skip(self, real_services))]
    pub async fn resolve(
        &mut self,
        logical_name: &str,
        real_services: &HashSet<String>,
        ref_override: Option<&str>,
    ) -> Result<Arc<ResolvedSpec>> {
        let name = Self::effective_name(logical_name, real_services);

        let Some(entry) = self.entries.get(&name) else {
            return Err(match strip_mock_suffix(&name) {
                Some(base) => RegistryError::MocksNotConfigured(base.to_string()),
                None => RegistryError::UnknownService(name.clone()),
            });
        };

        if let Some(spec) = &entry.cached_spec {
            debug!(service = %name, "Using cached spec");
            return Ok(Arc::clone(spec));
        }

        let root = match (&entry.path_override, &entry.source_url) {
            (Some(path), _) => path.clone(),
            (None, Some(url)) => {
                let branch = ref_override.unwrap_or(&entry.default_branch);
                let checkout = self.source.checkout(&name, url, branch).await?;
                match &entry.root_subpath {
                    Some(subpath) => checkout.join(subpath),
                    None => checkout,
                }
            }
            (None, None) => return Err(RegistryError::NoSourceConfigured(name)),
        };

        let spec = Arc::new(load_spec(&root, &|dep| self.exists(dep))?);

        if let Some(entry) = self.entries.get_mut(&name) {
            entry.cached_spec = Some(Arc::clone(&spec));
        }

        info!(service = %name, root = %root.display(), "Resolved service");
        Ok(spec)
    }

    /// ローカルディレクトリをサービスのチェックアウトとして使う
    ///
    /// 仕様の `namespace` が Registry のどのエントリかを決める。
    pub fn link(&mut self, local_path: &Path) -> Result<String> {
        if !local_path.is_dir() {
            return Err(RegistryError::InvalidLinkPath(local_path.to_path_buf()));
        }

        let spec = load_spec(local_path, &|dep| self.exists(dep))?;
        let name = spec.namespace;

        let entry = self
            .entries
            .get_mut(&name)
            .ok_or_else(|| RegistryError::UnknownService(name.clone()))?;
        entry.path_override = Some(local_path.to_path_buf());
        entry.cached_spec = None;

        debug!(service = %name, path = %local_path.display(), "Linked service");
        Ok(name)
    }

    /// 依存グラフを幅優先で辿るイテレータを返す
    ///
    /// `requested` の名前が実サービス、それ以外の依存はモックになる。
    pub fn walk(&mut self, requested: &[ServiceReference]) -> Traversal<'_, S> {
        Traversal::new(self, requested)
    }

    /// 依存グラフを幅優先で辿り、各サービスについて `visitor(spec, 解決名)` を呼ぶ
    ///
    /// 各論理サービスは一度だけ訪問する。循環はエラーにならない。
    pub async fn traverse<F, E>(
        &mut self,
        requested: &[ServiceReference],
        mut visitor: F,
    ) -> std::result::Result<(), E>
    where
        F: FnMut(&ResolvedSpec, &str) -> std::result::Result<(), E>,
        E: From<RegistryError>,
    {
        let mut traversal = self.walk(requested);
        while let Some(visit) = traversal.next().await? {
            visitor(&visit.spec, &visit.name)?;
        }
        Ok(())
    }
}
