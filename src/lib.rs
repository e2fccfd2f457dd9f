pub mod features;
pub mod models;
pub mod shared;

use log::{info, warn};
use shared::config::EnvironmentConfig;

pub use features::acquisition::{
    CameraSession, DropHost, MediaDevices, ReceiptAcquisition, StreamConstraints, VideoStream,
};
pub use features::auth::{can_access, MockSessionProvider, Route, SessionProvider};
pub use features::expenses::{
    project, ExpenseFormController, ExpenseRepository, FilterCriteria, FormState,
    InMemoryExpenseRepository, SortKey, SortSpec,
};
pub use features::optimizer::ImageOptimizer;
pub use models::{ExpenseCategory, ExpenseClaim, ExpenseStatus, ReceiptImage, User, UserRole};
pub use shared::config::UploadConfig;
pub use shared::errors::{AppError, AppResult, CameraError};

/// ログシステムを初期化する
///
/// `.env` があれば読み込み、環境設定に応じたログレベルで
/// env_logger をセットアップします。プロセス内で1回だけ
/// 呼び出してください。
pub fn init_logging() {
    // .envファイルがない場合は無視（本番環境では環境変数が直接設定される）
    if dotenv::dotenv().is_err() {
        warn!(".envファイルが見つかりません。環境変数が直接設定されていることを確認してください。");
    }

    // 環境設定を取得
    let env_config = EnvironmentConfig::from_env();

    // ログレベルを設定
    let log_level = match env_config.log_level.to_lowercase().as_str() {
        "error" => log::LevelFilter::Error,
        "warn" => log::LevelFilter::Warn,
        "info" => log::LevelFilter::Info,
        "debug" => log::LevelFilter::Debug,
        "trace" => log::LevelFilter::Trace,
        _ => log::LevelFilter::Info,
    };

    // env_loggerを初期化
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp_secs()
        .format_module_path(false)
        .format_target(false)
        .init();

    info!(
        "ログシステムを初期化しました: level={}, environment={}",
        env_config.log_level, env_config.environment
    );
}
