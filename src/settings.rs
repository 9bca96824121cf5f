//! 设置文件读写
//!
//! 生成配置以 JSON 形式保存；文件不存在时使用默认配置，
//! 读取后的配置一律经过 `GeneratorConfig::validate`。

use std::fs;
use std::path::Path;

use crate::error::AppError;
use crate::generator::GeneratorConfig;

/// 读取设置文件，不存在时返回默认配置。
pub fn load_config(path: &Path) -> Result<GeneratorConfig, AppError> {
    if !path.exists() {
        log::info!("⚙️ 设置文件不存在，使用默认配置: {}", path.display());
        return Ok(GeneratorConfig::default());
    }

    let content = fs::read_to_string(path)?;
    let config = serde_json::from_str::<GeneratorConfig>(&content)
        .map_err(|e| AppError::Config(format!("解析设置文件失败: {}", e)))?;
    config.validate()?;

    log::info!("⚙️ 已加载设置文件: {}", path.display());
    Ok(config)
}

/// 校验后写入设置文件，必要时创建父目录。
pub fn save_config(path: &Path, config: &GeneratorConfig) -> Result<(), AppError> {
    config.validate()?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::Storage(format!("创建设置目录失败: {}", e)))?;
    }

    let content = serde_json::to_string_pretty(config)
        .map_err(|e| AppError::Config(format!("序列化设置失败: {}", e)))?;

    fs::write(path, content)?;
    Ok(())
}
