//! レジストリ・サービス仕様のバリデーション
//!
//! 最初に違反した制約でエラーを返す。デシリアライズ前の生の
//! ドキュメントに対して実行し、型付けで失われる情報（型の不一致、
//! 予約サフィックスなど）を利用者向けのメッセージに変換する。

use crate::error::{Result, SpecError};
use crate::model::{MOCK_SUFFIX, PublicExposure};
use regex::Regex;
use serde_json::Value as JsonValue;
use serde_yaml::Value as YamlValue;

/// namespace に許可される文字
pub const NAMESPACE_PATTERN: &str = r"^[a-zA-Z_0-9-]+$";

/// レジストリドキュメントを検証
pub fn validate_registry_document(doc: &JsonValue) -> Result<()> {
    let services = doc.as_object().ok_or_else(|| {
        SpecError::RegistryMalformed("registry must be an object.".to_string())
    })?;

    for (name, entry) in services {
        validate_registry_entry(name, entry)?;
    }

    Ok(())
}

fn validate_registry_entry(name: &str, entry: &JsonValue) -> Result<()> {
    if name.ends_with(MOCK_SUFFIX) {
        return Err(SpecError::invalid_section(
            name,
            format!(
                "cannot have name that ends with '{}', this suffix is reserved.",
                MOCK_SUFFIX
            ),
        ));
    }

    let entry = entry
        .as_object()
        .ok_or_else(|| SpecError::invalid_section(name, "must be an object."))?;

    for key in ["git", "root", "branch"] {
        if let Some(value) = entry.get(key)
            && !value.is_string()
        {
            return Err(SpecError::invalid_section(
                name,
                format!("has invalid '{}' property; it must be a string.", key),
            ));
        }
    }

    if let Some(mocks) = entry.get("mocks") {
        validate_mocks_section(name, mocks)?;
    }

    if let Some(environments) = entry.get("environments") {
        validate_environments_section(name, environments)?;
    }

    Ok(())
}

fn validate_mocks_section(name: &str, mocks: &JsonValue) -> Result<()> {
    let mocks = mocks.as_object().ok_or_else(|| {
        SpecError::invalid_section(name, "has invalid 'mocks' property; it must be an object.")
    })?;

    if !mocks.contains_key("git") && !mocks.contains_key("root") {
        return Err(SpecError::invalid_section(
            name,
            "must contain 'mocks' property with 'git' or 'root' properties.",
        ));
    }

    for key in ["git", "root", "branch"] {
        if let Some(value) = mocks.get(key)
            && !value.is_string()
        {
            return Err(SpecError::invalid_section(
                name,
                format!("has invalid 'mocks.{}' property; it must be a string.", key),
            ));
        }
    }

    Ok(())
}

fn validate_environments_section(name: &str, environments: &JsonValue) -> Result<()> {
    let environments = environments.as_object().ok_or_else(|| {
        SpecError::invalid_section(
            name,
            "has invalid 'environments' property; it must be an object.",
        )
    })?;

    for (env_name, endpoint) in environments {
        let endpoint = endpoint.as_str().ok_or_else(|| {
            SpecError::invalid_section(
                name,
                format!("has invalid 'environments' entry; {} must be a string.", env_name),
            )
        })?;

        if url::Url::parse(endpoint).is_err() {
            return Err(SpecError::invalid_section(
                name,
                format!("has invalid 'environments' entry; {} must be a URL.", env_name),
            ));
        }
    }

    Ok(())
}

/// サービス仕様ドキュメントを検証
///
/// `exists` は dependencies に列挙されたサービスがレジストリに
/// 登録されているかを判定する。
pub fn validate_service_spec(doc: &YamlValue, exists: &dyn Fn(&str) -> bool) -> Result<()> {
    let doc = doc
        .as_mapping()
        .ok_or_else(|| SpecError::SpecMalformed("document must be an object.".to_string()))?;
    let get = |key: &str| doc.get(key).filter(|v| !v.is_null());

    // services
    let services = get("services").ok_or_else(|| SpecError::invalid_spec("services", "must exist."))?;
    let services = services
        .as_mapping()
        .ok_or_else(|| SpecError::invalid_spec("services", "must be an object."))?;
    if services.is_empty() {
        return Err(SpecError::invalid_spec(
            "services",
            "must expose at least one container.",
        ));
    }

    // namespace
    let namespace = get("namespace")
        .ok_or_else(|| SpecError::invalid_spec("namespace", "must exist."))?
        .as_str()
        .ok_or_else(|| SpecError::invalid_spec("namespace", "must be a string."))?;
    let namespace_re = Regex::new(NAMESPACE_PATTERN)
        .map_err(|e| SpecError::SpecMalformed(format!("正規表現のコンパイルエラー: {}", e)))?;
    if !namespace_re.is_match(namespace) {
        return Err(SpecError::invalid_spec(
            "namespace",
            format!("must match regex '/{}/'.", NAMESPACE_PATTERN),
        ));
    }

    // public（省略可。指定する場合はちょうど1つ）
    if let Some(public) = get("public") {
        let entry = match public {
            YamlValue::String(s) => s.as_str(),
            YamlValue::Sequence(list) => match list.as_slice() {
                [] => {
                    return Err(SpecError::invalid_spec(
                        "public",
                        "must expose at least one public container.",
                    ));
                }
                [single] => single
                    .as_str()
                    .ok_or_else(|| SpecError::invalid_spec("public", "must be a string."))?,
                _ => {
                    return Err(SpecError::invalid_spec(
                        "public",
                        "must expose exactly one public container.",
                    ));
                }
            },
            _ => return Err(SpecError::invalid_spec("public", "must be a string.")),
        };
        validate_public_entry(entry, services)?;
    }

    // dependencies
    if let Some(dependencies) = get("dependencies") {
        let dependencies = dependencies
            .as_sequence()
            .ok_or_else(|| SpecError::invalid_spec("dependencies", "must be an array."))?;
        for (index, dependency) in dependencies.iter().enumerate() {
            let name = dependency.as_str().ok_or_else(|| {
                SpecError::invalid_spec(
                    "dependencies",
                    format!("contains invalid entry at index {}.", index),
                )
            })?;
            if name.ends_with(MOCK_SUFFIX) {
                return Err(SpecError::invalid_spec(
                    "dependencies",
                    format!(
                        "has invalid microservice '{}', the '{}' suffix is reserved.",
                        name, MOCK_SUFFIX
                    ),
                ));
            }
            if !exists(name) {
                return Err(SpecError::invalid_spec(
                    "dependencies",
                    format!(
                        "has unknown microservice '{}', make sure it is in the registry.",
                        name
                    ),
                ));
            }
        }
    }

    // setup
    if let Some(setup) = get("setup") {
        let setup = setup
            .as_sequence()
            .ok_or_else(|| SpecError::invalid_spec("setup", "must be an array."))?;
        if let Some(index) = setup.iter().position(|cmd| !cmd.is_string()) {
            return Err(SpecError::invalid_spec(
                "setup",
                format!("contains invalid entry at index {}.", index),
            ));
        }
    }

    // root
    if let Some(root) = get("root")
        && !root.is_string()
    {
        return Err(SpecError::invalid_spec("root", "must be a string."));
    }

    Ok(())
}

fn validate_public_entry(entry: &str, services: &serde_yaml::Mapping) -> Result<()> {
    let (container, port) = entry.split_once(':').unwrap_or((entry, ""));

    if !services.contains_key(container) {
        return Err(SpecError::invalid_spec(
            "public",
            format!("exposes unknown service '{}'.", container),
        ));
    }

    if port.trim().is_empty() {
        return Err(SpecError::invalid_spec(
            "public",
            format!("does not specify port to expose for service {}.", container),
        ));
    }

    if PublicExposure::parse(entry).is_none() {
        return Err(SpecError::invalid_spec(
            "public",
            format!("has invalid port '{}' for service {}.", port, container),
        ));
    }

    Ok(())
}
