//! Service Registry: マイクロサービスの解決と依存グラフの走査
//!
//! Registry ドキュメント（サービス名 → git リポジトリ等）をもとに、
//! 各サービスのチェックアウトから仕様を遅延ロードします。
//!
//! # 概要
//!
//! - **解決**: 論理サービス名 → チェックアウト → 検証済み仕様（キャッシュ）
//! - **モック置換**: 実サービスとして指定されていない依存は `<name>-mocks` に解決
//! - **リンク**: ローカルディレクトリをチェックアウトの代わりに使う

pub mod document;
pub mod error;
pub mod model;
pub mod registry;
pub mod source;
pub mod traversal;

pub use document::*;
pub use error::*;
pub use model::*;
pub use registry::*;
pub use source::*;
pub use traversal::*;
