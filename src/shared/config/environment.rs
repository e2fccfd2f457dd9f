use crate::shared::errors::{AppError, AppResult};

/// アプリケーションの実行環境を表す列挙型
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    /// 開発環境
    Development,
    /// プロダクション環境
    Production,
}

/// 環境設定を管理する構造体
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    /// 実行環境
    pub environment: String,
    /// デバッグモードの有効/無効
    pub debug_mode: bool,
    /// ログレベル
    pub log_level: String,
}

impl EnvironmentConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Self {
        let environment = get_environment();
        let debug_mode = environment == Environment::Development;
        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| {
            if debug_mode {
                "debug".to_string()
            } else {
                "info".to_string()
            }
        });

        Self {
            environment: format!("{environment:?}").to_lowercase(),
            debug_mode,
            log_level,
        }
    }

    /// プロダクション環境かどうかを判定
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 開発環境かどうかを判定
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

/// 現在の実行環境を判定する
///
/// # 判定ロジック
/// 1. コンパイル時埋め込み環境変数を最優先
/// 2. 実行時環境変数 ENVIRONMENT を確認
/// 3. デバッグビルドの場合は Development
/// 4. リリースビルドの場合は Production
pub fn get_environment() -> Environment {
    // コンパイル時埋め込み環境変数を最優先
    if let Some(embedded_env) = option_env!("EMBEDDED_ENVIRONMENT") {
        let env = match embedded_env {
            "production" => Environment::Production,
            _ => Environment::Development,
        };
        log::debug!("環境判定: コンパイル時埋め込み値を使用 -> {embedded_env} -> {env:?}");
        return env;
    }

    // 実行時環境変数を確認
    if let Ok(env_var) = std::env::var("ENVIRONMENT") {
        let env = match env_var.as_str() {
            "production" => Environment::Production,
            _ => Environment::Development,
        };
        log::debug!("環境判定: 実行時環境変数を使用 -> {env_var} -> {env:?}");
        return env;
    }

    // フォールバック: ビルド設定に基づく判定
    if cfg!(debug_assertions) {
        Environment::Development
    } else {
        Environment::Production
    }
}

/// アップロード・画像最適化の設定
///
/// 既定値は領収書アップロードの制約に合わせています：
/// 最大10MB、長辺1200px、JPEG品質80%。
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// 受け付ける最大ファイルサイズ（バイト）
    pub max_file_size_bytes: u64,
    /// 最適化後の長辺の上限（ピクセル）
    pub max_edge_px: u32,
    /// JPEG再エンコードの品質（1〜100）
    pub jpeg_quality: u8,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: 10 * 1024 * 1024,
            max_edge_px: 1200,
            jpeg_quality: 80,
        }
    }
}

impl UploadConfig {
    /// 環境変数から設定を読み込む（未設定の項目は既定値）
    ///
    /// 対応する環境変数：
    /// * `UPLOAD_MAX_FILE_SIZE_MB` - 最大ファイルサイズ（MB）
    /// * `OPTIMIZER_MAX_EDGE_PX` - 長辺の上限（ピクセル）
    /// * `OPTIMIZER_JPEG_QUALITY` - JPEG品質（1〜100）
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let max_file_size_bytes = std::env::var("UPLOAD_MAX_FILE_SIZE_MB")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(|mb| mb * 1024 * 1024)
            .unwrap_or(defaults.max_file_size_bytes);

        let max_edge_px = std::env::var("OPTIMIZER_MAX_EDGE_PX")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(defaults.max_edge_px);

        let jpeg_quality = std::env::var("OPTIMIZER_JPEG_QUALITY")
            .ok()
            .and_then(|v| v.parse::<u8>().ok())
            .unwrap_or(defaults.jpeg_quality);

        Self {
            max_file_size_bytes,
            max_edge_px,
            jpeg_quality,
        }
    }

    /// 設定値を検証する
    pub fn validate(&self) -> AppResult<()> {
        if self.max_file_size_bytes == 0 {
            return Err(AppError::configuration(
                "最大ファイルサイズは0より大きい値を指定してください",
            ));
        }
        if self.max_edge_px == 0 {
            return Err(AppError::configuration(
                "長辺の上限は0より大きい値を指定してください",
            ));
        }
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(AppError::configuration(
                "JPEG品質は1〜100の範囲で指定してください",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_config_defaults() {
        // 既定値のテスト
        let config = UploadConfig::default();
        assert_eq!(config.max_file_size_bytes, 10 * 1024 * 1024);
        assert_eq!(config.max_edge_px, 1200);
        assert_eq!(config.jpeg_quality, 80);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_upload_config_validation() {
        // 不正な設定値のテスト
        let mut config = UploadConfig::default();
        config.jpeg_quality = 0;
        assert!(config.validate().is_err());

        config.jpeg_quality = 101;
        assert!(config.validate().is_err());

        let mut config = UploadConfig::default();
        config.max_edge_px = 0;
        assert!(config.validate().is_err());

        let mut config = UploadConfig::default();
        config.max_file_size_bytes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_environment_config() {
        // 環境設定の読み込みテスト
        let config = EnvironmentConfig::from_env();
        assert!(config.is_development() || config.is_production());
        assert!(!config.log_level.is_empty());
    }
}
