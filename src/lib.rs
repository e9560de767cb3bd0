//! EvalHub - 作业评测平台后端服务
//!
//! 基于 Actix Web 构建，负责作业提交、AI 辅助评分、人工评分与成绩发布。
//!
//! # 架构
//! - `ai`: 大模型调用（文本提取、评分、测评生成）
//! - `blob`: 对象存储
//! - `cache`: 缓存层（Moka）
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: 速率限制中间件
//! - `models`: 数据模型定义
//! - `pipeline`: 评测流水线
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod ai;
pub mod blob;
pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod pipeline;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
