//! # 路径工具函数
//!
//! 提供本地数据目录相关的工具函数：
//! - 获取 Rankify 数据目录路径（`~/.rankify/`）
//! - 将记录键映射为数据目录下的 JSON 文件路径

use std::path::{Path, PathBuf};

/// 获取 Rankify 数据目录的绝对路径
///
/// 额度、会话等本地记录独立存放在用户主目录下的 `.rankify` 文件夹中，
/// 使用 `dirs` crate 获取跨平台的主目录路径。
///
/// # 错误
/// 如果无法确定用户主目录（如无 HOME 环境变量），返回错误信息。
///
/// # 示例
/// - Windows: `C:\Users\username\.rankify`
/// - Linux/macOS: `/home/username/.rankify`
pub fn get_data_dir() -> Result<PathBuf, String> {
    let home = dirs::home_dir().ok_or_else(|| "Não foi possível localizar o diretório do usuário".to_string())?;
    Ok(home.join(".rankify"))
}

/// 将记录键映射为文件路径
///
/// 键中除字母、数字、`_`、`-` 以外的字符一律替换为 `_`，
/// 避免键名逃逸出数据目录。
///
/// # 示例
/// ```ignore
/// record_file(Path::new("/data"), "rankify_credits"); // "/data/rankify_credits.json"
/// ```
pub fn record_file(dir: &Path, key: &str) -> PathBuf {
    let safe: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    dir.join(format!("{}.json", safe))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_file_plain_key() {
        let path = record_file(Path::new("data"), "rankify_credits");
        assert_eq!(path, Path::new("data").join("rankify_credits.json"));
    }

    #[test]
    fn test_record_file_sanitizes_separators() {
        let path = record_file(Path::new("data"), "../etc/passwd");
        assert_eq!(path, Path::new("data").join("___etc_passwd.json"));
    }
}
