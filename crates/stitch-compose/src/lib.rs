//! stitch compose: 解決済みのサービス群を docker-compose 記述子にまとめる
//!
//! 各サービスのコンテナに名前空間を付け、サービスごとのプライベートネットワークと
//! 共有の `default` ネットワークへ振り分け、公開コンテナにホストポートを割り当てます。

pub mod descriptor;
pub mod error;
pub mod generator;

pub use descriptor::*;
pub use error::*;
pub use generator::*;
