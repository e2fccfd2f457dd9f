/// 共有モジュール
///
/// アプリケーション全体で使用される横断的な機能を提供します：
/// - エラー型（errors）
/// - 環境・アップロード設定（config）
pub mod config;
pub mod errors;
