//! 公開コンテナ定義

/// 外部から到達可能なコンテナ（`container:port`）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicExposure {
    pub container: String,
    pub port: u16,
}

impl PublicExposure {
    /// `container:port` をパース
    ///
    /// ポートが欠けている、または数値でない場合は `None`。
    pub fn parse(s: &str) -> Option<Self> {
        let (container, port) = s.split_once(':')?;
        let port = port.trim().parse::<u16>().ok()?;
        Some(Self {
            container: container.trim().to_string(),
            port,
        })
    }
}
