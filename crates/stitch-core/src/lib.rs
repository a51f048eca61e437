//! stitch core: データモデル、サービス仕様のロードとバリデーション

pub mod discovery;
pub mod error;
pub mod loader;
pub mod model;
pub mod validator;

pub use discovery::*;
pub use error::*;
pub use loader::*;
pub use model::*;
pub use validator::*;
