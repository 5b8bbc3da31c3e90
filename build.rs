//! # Rankify - Tauri Cargo 构建脚本
//!
//! 在 `cargo build` 编译主项目之前由 Cargo 自动执行。
//! Tauri 利用此脚本生成运行时所需的资源绑定代码，并处理应用图标、权限清单等静态资源。

/// 构建脚本入口函数
///
/// 调用 `tauri_build::build()`，根据 `tauri.conf.json` 与 `capabilities/`
/// 生成相应的编译产物。
fn main() {
  tauri_build::build()
}
