//! モデル定義
//!
//! stitchで使用されるデータモデルを定義します。
//! 各モデルは機能ごとにモジュールに分離されています。

mod container;
mod public;
mod reference;
mod spec;
mod volume;

// Re-exports
pub use container::*;
pub use public::*;
pub use reference::*;
pub use spec::*;
pub use volume::*;

/// モックエントリ用に予約されたサフィックス
pub const MOCK_SUFFIX: &str = "-mocks";

/// 論理サービス名からモックエントリ名を生成
pub fn mock_name(name: &str) -> String {
    format!("{}{}", name, MOCK_SUFFIX)
}

/// モックエントリ名なら元の論理サービス名を返す
pub fn strip_mock_suffix(name: &str) -> Option<&str> {
    name.strip_suffix(MOCK_SUFFIX)
}
