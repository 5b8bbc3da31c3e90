//! # 本地记录存储服务
//!
//! 桌面端对应浏览器 localStorage 的键值存储：每个键一个 JSON 文件。
//!
//! ## 可替换的存储后端
//! 业务层只依赖 `RecordStore` trait：
//! - `FileStore` - 数据目录下的 JSON 文件（生产环境）
//! - `MemoryStore` - 进程内存（测试替身；数据目录不可用时的降级方案）
//!
//! ## 损坏记录
//! 记录无法解析时视为不存在，由调用方回退到默认值，并输出 warn 日志。
//!
//! ## 写入语义
//! 每次调用同步完成，无事务保证。文件写入先写临时文件再重命名，
//! 进程在写入中途崩溃时旧记录保持完整。

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::utils::path;

/// 键值记录存储
///
/// 值为原始 JSON 文本，类型化读写见 `load_record` / `save_record`。
pub trait RecordStore: Send + Sync {
    /// 读取记录；键不存在时返回 `Ok(None)`
    fn read(&self, key: &str) -> Result<Option<String>, String>;

    /// 写入（覆盖）记录
    fn write(&self, key: &str, value: &str) -> Result<(), String>;

    /// 删除记录；键不存在时视为成功
    fn remove(&self, key: &str) -> Result<(), String>;
}

/// 文件存储：`<dir>/<key>.json`
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// 打开（必要时创建）数据目录
    ///
    /// # 错误
    /// 目录创建失败时返回错误
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, String> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .map_err(|e| format!("Falha ao criar diretório de dados {}: {}", dir.display(), e))?;
        Ok(Self { dir })
    }
}

impl RecordStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, String> {
        let file = path::record_file(&self.dir, key);
        match std::fs::read_to_string(&file) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(format!("Falha ao ler {}: {}", file.display(), e)),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), String> {
        let file = path::record_file(&self.dir, key);
        let tmp = file.with_extension("json.tmp");

        std::fs::write(&tmp, value).map_err(|e| format!("Falha ao gravar {}: {}", tmp.display(), e))?;
        std::fs::rename(&tmp, &file).map_err(|e| format!("Falha ao gravar {}: {}", file.display(), e))
    }

    fn remove(&self, key: &str) -> Result<(), String> {
        let file = path::record_file(&self.dir, key);
        match std::fs::remove_file(&file) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(format!("Falha ao remover {}: {}", file.display(), e)),
        }
    }
}

/// 内存存储
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, String> {
        let entries = self.entries.read().map_err(|_| "Armazenamento em memória indisponível".to_string())?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), String> {
        let mut entries = self.entries.write().map_err(|_| "Armazenamento em memória indisponível".to_string())?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), String> {
        let mut entries = self.entries.write().map_err(|_| "Armazenamento em memória indisponível".to_string())?;
        entries.remove(key);
        Ok(())
    }
}

/// 读取并解析类型化记录
///
/// # 返回值
/// - `Some(record)` - 记录存在且解析成功
/// - `None` - 记录不存在、读取失败或内容损坏（后两种情况记录 warn 日志）
pub fn load_record<T: DeserializeOwned>(store: &dyn RecordStore, key: &str) -> Option<T> {
    let raw = match store.read(key) {
        Ok(raw) => raw?,
        Err(e) => {
            log::warn!("读取本地记录 {} 失败，按不存在处理: {}", key, e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(record) => Some(record),
        Err(e) => {
            log::warn!("本地记录 {} 已损坏，按不存在处理: {}", key, e);
            None
        }
    }
}

/// 序列化并写入类型化记录
///
/// # 错误
/// 序列化失败或底层写入失败时返回错误
pub fn save_record<T: Serialize>(store: &dyn RecordStore, key: &str, record: &T) -> Result<(), String> {
    let content =
        serde_json::to_string(record).map_err(|e| format!("Falha ao serializar {}: {}", key, e))?;
    store.write(key, &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::account::Entitlement;

    #[test]
    fn test_file_store_round_trip_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("nested")).unwrap();

        assert_eq!(store.read("rankify_credits").unwrap(), None);
        store.write("rankify_credits", "{\"a\":1}").unwrap();
        assert_eq!(store.read("rankify_credits").unwrap().as_deref(), Some("{\"a\":1}"));

        store.remove("rankify_credits").unwrap();
        store.remove("rankify_credits").unwrap();
        assert_eq!(store.read("rankify_credits").unwrap(), None);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let record = Entitlement {
            remaining: 1,
            ..Entitlement::default()
        };
        save_record(&FileStore::open(dir.path()).unwrap(), "rankify_credits", &record).unwrap();

        let reopened = FileStore::open(dir.path()).unwrap();
        assert_eq!(load_record::<Entitlement>(&reopened, "rankify_credits"), Some(record));
    }

    #[test]
    fn test_corrupted_record_loads_as_absent() {
        let store = MemoryStore::new();
        store.write("rankify_credits", "{not json").unwrap();
        assert_eq!(load_record::<Entitlement>(&store, "rankify_credits"), None);
    }
}
