//! 解決済みサービス仕様から docker-compose 記述子を組み立てる

use crate::descriptor::{NetworkConfig, TopologyDescriptor};
use crate::error::{ComposeError, Result};
use serde_yaml::Value;
use std::path::{Path, PathBuf};
use stitch_core::{ContainerDef, ResolvedSpec, ServiceReference, VolumeMount};
use stitch_registry::{ServiceRegistry, SpecSource};
use tracing::debug;

/// 公開コンテナに割り当てる最初のホストポート
pub const DEFAULT_BASE_PORT: u16 = 3000;

/// 全サービス共有のネットワーク
pub const DEFAULT_NETWORK: &str = "default";

/// サービスごとのプライベートネットワーク名
pub fn private_network_name(namespace: &str) -> String {
    format!("{}_net", namespace)
}

/// コンテナの名前空間付きの名前
///
/// 公開コンテナは名前空間そのもの（小文字化）、それ以外は `<namespace>_<container>`。
pub fn namespaced_name(spec: &ResolvedSpec, container: &str) -> String {
    if spec.is_public(container) {
        spec.namespace.to_lowercase()
    } else {
        format!("{}_{}", spec.namespace, container)
    }
}

/// トポロジー生成器
#[derive(Debug, Clone)]
pub struct TopologyGenerator {
    /// 相対パスのボリュームの最終的な基準ディレクトリ
    working_dir: PathBuf,
    base_port: u16,
}

impl TopologyGenerator {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            base_port: DEFAULT_BASE_PORT,
        }
    }

    pub fn with_base_port(mut self, base_port: u16) -> Self {
        self.base_port = base_port;
        self
    }

    /// 起動サービスと実サービス群から記述子を生成
    ///
    /// 依存グラフを走査し、各サービスのコンテナを名前空間付きでマージする。
    /// ホストポートは走査全体で通し番号になる。
    #[tracing::instrument(skip_all, fields(launching = %launching))]
    pub async fn generate<S: SpecSource>(
        &self,
        registry: &mut ServiceRegistry<S>,
        launching: &ServiceReference,
        real: &[ServiceReference],
    ) -> Result<TopologyDescriptor> {
        let mut requested = Vec::with_capacity(real.len() + 1);
        requested.push(launching.clone());
        requested.extend(real.iter().cloned());

        let mut descriptor = TopologyDescriptor::default();
        let mut next_port = u32::from(self.base_port);

        registry
            .traverse(&requested, |spec, name| {
                debug!(service = %name, namespace = %spec.namespace, "Adding service to topology");
                self.add_service(&mut descriptor, &mut next_port, spec)
            })
            .await?;

        Ok(descriptor)
    }

    /// 1サービス分のネットワークとコンテナを記述子に追加
    pub(crate) fn add_service(
        &self,
        descriptor: &mut TopologyDescriptor,
        next_port: &mut u32,
        spec: &ResolvedSpec,
    ) -> Result<()> {
        let private_network = private_network_name(&spec.namespace);
        descriptor
            .networks
            .insert(private_network.clone(), NetworkConfig::default());

        for (container_name, def) in &spec.containers {
            let name = namespaced_name(spec, container_name);
            let mut container = def.clone();

            match &spec.public_exposure {
                Some(exposure) if exposure.container == *container_name => {
                    let host_port = u16::try_from(*next_port).map_err(|_| {
                        ComposeError::PortRangeExhausted {
                            service: name.clone(),
                        }
                    })?;
                    *next_port += 1;

                    container.networks = vec![DEFAULT_NETWORK.to_string(), private_network.clone()];
                    container.ports = vec![Value::String(format!(
                        "{}:{}",
                        host_port, exposure.port
                    ))];
                }
                _ => {
                    container.networks = vec![private_network.clone()];
                    container.ports = def.ports.iter().map(strip_host_mapping).collect();
                }
            }

            let dependencies = std::mem::take(&mut container.depends_on);
            container.links = dependencies
                .iter()
                .map(|dep| format!("{}:{}", namespaced_name(spec, dep), dep))
                .collect();
            container.depends_on = dependencies
                .iter()
                .map(|dep| namespaced_name(spec, dep))
                .collect();

            container.volumes = def
                .volumes
                .iter()
                .map(|volume| self.rewrite_volume(volume, &spec.root_directory_path))
                .collect();

            descriptor.services.insert(name, container);
        }

        Ok(())
    }

    /// ホスト側の相対パスをサービスのルート、次に作業ディレクトリ基準で解決
    fn rewrite_volume(&self, volume: &str, root_directory_path: &Path) -> String {
        match VolumeMount::parse(volume) {
            Some(mount) => {
                let host = mount.resolve_host(&[root_directory_path, &self.working_dir]);
                format!("{}:{}", host, mount.rest)
            }
            None => volume.to_string(),
        }
    }
}

/// 非公開コンテナのホストポート割り当てを外す（`"8000:8000"` → `"8000"`）
fn strip_host_mapping(port: &Value) -> Value {
    match port.as_str() {
        Some(mapping) => match mapping.rsplit_once(':') {
            Some((_, container_port)) => Value::String(container_port.to_string()),
            None => port.clone(),
        },
        None => port.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::fs;
    use stitch_core::PublicExposure;
    use stitch_registry::RegistryError;

    /// `<base>/<url>` をチェックアウトとして返す
    struct DirSource {
        base: PathBuf,
    }

    impl SpecSource for DirSource {
        async fn checkout(
            &self,
            _name: &str,
            url: &str,
            _branch: &str,
        ) -> stitch_registry::Result<PathBuf> {
            Ok(self.base.join(url))
        }
    }

    fn write(dir: &Path, content: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join("stitch.yml"), content).unwrap();
    }

    fn spec(namespace: &str, public: Option<(&str, u16)>, containers: &str) -> ResolvedSpec {
        ResolvedSpec {
            namespace: namespace.to_string(),
            public_exposure: public.map(|(container, port)| PublicExposure {
                container: container.to_string(),
                port,
            }),
            containers: serde_yaml::from_str::<BTreeMap<String, ContainerDef>>(containers).unwrap(),
            dependencies: Vec::new(),
            setup_steps: Vec::new(),
            root_directory_path: PathBuf::from("/svc/root"),
        }
    }

    fn port_strings(def: &ContainerDef) -> Vec<String> {
        def.ports
            .iter()
            .map(|p| match p {
                Value::String(s) => s.clone(),
                other => serde_yaml::to_string(other).unwrap().trim().to_string(),
            })
            .collect()
    }

    #[test]
    fn test_add_service_namespaces_containers() {
        let generator = TopologyGenerator::new("/cwd");
        let spec = spec(
            "CDS",
            Some(("web", 1337)),
            r#"
web:
  image: node:4
  command: [npm, start]
  ports: ["1337:1337"]
  depends_on: [redis, dynamodb]
redis:
  image: redis
  ports: ["6379"]
dynamodb:
  image: peopleperhour/dynamodb
  ports: ["8000:8000", 9000]
"#,
        );

        let mut descriptor = TopologyDescriptor::default();
        let mut next_port = 3000;
        generator
            .add_service(&mut descriptor, &mut next_port, &spec)
            .unwrap();

        assert_eq!(next_port, 3001);
        assert!(descriptor.networks.contains_key("CDS_net"));
        assert_eq!(
            descriptor.services.keys().collect::<Vec<_>>(),
            vec!["CDS_dynamodb", "CDS_redis", "cds"]
        );

        let web = &descriptor.services["cds"];
        assert_eq!(web.networks, vec!["default", "CDS_net"]);
        assert_eq!(port_strings(web), vec!["3000:1337"]);
        assert_eq!(web.depends_on, vec!["CDS_redis", "CDS_dynamodb"]);
        assert_eq!(web.links, vec!["CDS_redis:redis", "CDS_dynamodb:dynamodb"]);
        assert_eq!(web.field_str("image"), Some("node:4"));
        assert!(web.extra.contains_key("command"));

        let redis = &descriptor.services["CDS_redis"];
        assert_eq!(redis.networks, vec!["CDS_net"]);
        assert_eq!(port_strings(redis), vec!["6379"]);

        let dynamodb = &descriptor.services["CDS_dynamodb"];
        assert_eq!(port_strings(dynamodb), vec!["8000", "9000"]);
    }

    #[test]
    fn test_dependency_on_public_container_uses_namespace() {
        let generator = TopologyGenerator::new("/cwd");
        let spec = spec(
            "api",
            Some(("web", 80)),
            r#"
web:
  image: nginx
worker:
  image: busybox
  depends_on: [web]
"#,
        );

        let mut descriptor = TopologyDescriptor::default();
        let mut next_port = 3000;
        generator
            .add_service(&mut descriptor, &mut next_port, &spec)
            .unwrap();

        let worker = &descriptor.services["api_worker"];
        assert_eq!(worker.depends_on, vec!["api"]);
        assert_eq!(worker.links, vec!["api:web"]);
    }

    #[test]
    fn test_add_service_without_public_container() {
        let generator = TopologyGenerator::new("/cwd");
        let spec = spec("jobs", None, "runner:\n  image: busybox\n  ports: ['80:80']\n");

        let mut descriptor = TopologyDescriptor::default();
        let mut next_port = 3000;
        generator
            .add_service(&mut descriptor, &mut next_port, &spec)
            .unwrap();

        assert_eq!(next_port, 3000);
        let runner = &descriptor.services["jobs_runner"];
        assert_eq!(runner.networks, vec!["jobs_net"]);
        assert_eq!(port_strings(runner), vec!["80"]);
    }

    #[test]
    fn test_volume_rewriting() {
        let generator = TopologyGenerator::new("/cwd");
        let mut spec = spec(
            "ns",
            None,
            r#"
app:
  image: node
  volumes:
    - ./data:/data
    - /abs:/abs:ro
    - ~/x:/x
    - ../shared/./cfg:/cfg
    - /anonymous
"#,
        );

        let mut descriptor = TopologyDescriptor::default();
        let mut next_port = 3000;
        generator
            .add_service(&mut descriptor, &mut next_port, &spec)
            .unwrap();
        assert_eq!(
            descriptor.services["ns_app"].volumes,
            vec![
                "/svc/root/data:/data",
                "/abs:/abs:ro",
                "~/x:/x",
                "/svc/shared/cfg:/cfg",
                "/anonymous",
            ]
        );

        // ルートが相対パスなら作業ディレクトリ基準
        spec.root_directory_path = PathBuf::from("checkouts/svc");
        spec.containers
            .get_mut("app")
            .unwrap()
            .volumes = vec!["rel:/rel".to_string()];
        generator
            .add_service(&mut descriptor, &mut next_port, &spec)
            .unwrap();
        assert_eq!(
            descriptor.services["ns_app"].volumes,
            vec!["/cwd/checkouts/svc/rel:/rel"]
        );
    }

    #[test]
    fn test_port_range_exhausted() {
        let generator = TopologyGenerator::new("/cwd");
        let spec = spec("ns", Some(("web", 80)), "web:\n  image: nginx\n");

        let mut descriptor = TopologyDescriptor::default();
        let mut next_port = u32::from(u16::MAX) + 1;
        let err = generator
            .add_service(&mut descriptor, &mut next_port, &spec)
            .unwrap_err();
        assert!(matches!(err, ComposeError::PortRangeExhausted { service } if service == "ns"));
    }

    #[tokio::test]
    async fn test_generate_allocates_ports_in_visit_order() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(
            &temp_dir.path().join("a"),
            "namespace: a\npublic: web:80\nservices:\n  db:\n    image: postgres\n  web:\n    image: nginx\ndependencies: [b, c]\n",
        );
        write(
            &temp_dir.path().join("b"),
            "namespace: b\npublic: api:8080\nservices:\n  api:\n    image: b\n  cache:\n    image: redis\n",
        );
        write(
            &temp_dir.path().join("c"),
            "namespace: c\npublic: app:9000\nservices:\n  app:\n    image: c\n",
        );

        let document = json!({
            "a": {"git": "a"},
            "b": {"git": "b", "mocks": {"git": "b"}},
            "c": {"git": "c"}
        });
        let mut registry = ServiceRegistry::new(
            &document,
            DirSource {
                base: temp_dir.path().to_path_buf(),
            },
        )
        .unwrap();

        let descriptor = TopologyGenerator::new(temp_dir.path())
            .generate(
                &mut registry,
                &ServiceReference::parse("a"),
                &[ServiceReference::parse("c")],
            )
            .await
            .unwrap();

        // 訪問順は a, c, b-mocks
        assert_eq!(port_strings(&descriptor.services["a"]), vec!["3000:80"]);
        assert_eq!(port_strings(&descriptor.services["c"]), vec!["3001:9000"]);
        assert_eq!(port_strings(&descriptor.services["b"]), vec!["3002:8080"]);
        assert_eq!(
            descriptor.networks.keys().collect::<Vec<_>>(),
            vec!["a_net", "b_net", "c_net"]
        );
        assert!(descriptor.services.contains_key("a_db"));
        assert!(descriptor.services.contains_key("b_cache"));
    }

    #[tokio::test]
    async fn test_generate_with_custom_base_port() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(
            &temp_dir.path().join("a"),
            "namespace: a\npublic: web:80\nservices:\n  web:\n    image: nginx\n",
        );

        let mut registry = ServiceRegistry::new(
            &json!({"a": {"git": "a"}}),
            DirSource {
                base: temp_dir.path().to_path_buf(),
            },
        )
        .unwrap();

        let descriptor = TopologyGenerator::new(temp_dir.path())
            .with_base_port(8000)
            .generate(&mut registry, &ServiceReference::parse("a"), &[])
            .await
            .unwrap();

        assert_eq!(port_strings(&descriptor.services["a"]), vec!["8000:80"]);
    }

    #[tokio::test]
    async fn test_generate_propagates_resolution_errors() {
        let temp_dir = tempfile::tempdir().unwrap();
        write(
            &temp_dir.path().join("a"),
            "namespace: a\nservices:\n  web:\n    image: nginx\ndependencies: [b]\n",
        );

        let mut registry = ServiceRegistry::new(
            &json!({"a": {"git": "a"}, "b": {"git": "b"}}),
            DirSource {
                base: temp_dir.path().to_path_buf(),
            },
        )
        .unwrap();

        let err = TopologyGenerator::new(temp_dir.path())
            .generate(&mut registry, &ServiceReference::parse("a"), &[])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ComposeError::Registry(RegistryError::MocksNotConfigured(name)) if name == "b"
        ));
    }
}
