// 設定モジュール

pub mod environment;

pub use environment::{get_environment, Environment, EnvironmentConfig, UploadConfig};
