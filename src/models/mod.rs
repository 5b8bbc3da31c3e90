//! # 数据模型模块
//!
//! 定义了与前端 TypeScript 类型一一对应的 Rust 数据结构。
//! 所有结构体均派生 `Serialize` 和 `Deserialize`，用于 Tauri IPC 传输和 JSON 文件读写。
//! - `strategy` - AI 生成的 SEO 策略结果
//! - `account` - 额度记录与登录会话
//! - `branding` - 白标品牌配置
//! - `settings` - 从环境变量解析的运行配置

pub mod account;
pub mod branding;
pub mod settings;
pub mod strategy;
