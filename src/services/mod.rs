//! # 业务逻辑服务模块
//!
//! 包含核心业务逻辑的实现，与 Tauri command 层解耦：
//! - `store` - 键值记录存储（文件 / 内存），额度和会话的持久化基础
//! - `entitlement` - 生成额度的读取、扣减与 Pro 授予
//! - `session` - 邮箱登录、身份分级与登出恢复
//! - `upgrade` - 模拟付费升级状态机与支付回跳识别
//! - `prompt` - 提示词与结构化输出 schema
//! - `strategy_client` - 策略请求客户端与错误分类
//! - `gemini` - Gemini generateContent HTTP 后端
//! - `audit` - 标题 / Meta 描述长度审计
//! - `branding` - 白标配置校验
//! - `export` - 剪贴板文本、CSV、Markdown 报告导出
//! - `state` - 应用全局状态，串联以上服务

pub mod audit;
pub mod branding;
pub mod entitlement;
pub mod export;
pub mod gemini;
pub mod prompt;
pub mod session;
pub mod state;
pub mod store;
pub mod strategy_client;
pub mod upgrade;
