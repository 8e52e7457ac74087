// ==========================================
// 啤酒厂运营系统 - Tauri 命令（按域拆分）
// ==========================================
// 职责: Tauri 命令定义,连接前端与后端 API
// ==========================================

#![cfg(feature = "tauri-app")]

mod common;
mod config;
mod dashboard;
mod inventory;
mod maintenance;
mod production;
mod recipe;

pub use config::*;
pub use dashboard::*;
pub use inventory::*;
pub use maintenance::*;
pub use production::*;
pub use recipe::*;
