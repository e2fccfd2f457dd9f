// 画像最適化機能モジュール

pub mod service;

pub use service::ImageOptimizer;
