use thiserror::Error;

/// カメラデバイス取得時のエラー分類
///
/// ブラウザの getUserMedia 相当の失敗を種別ごとに分類します。
/// いずれも致命的ではなく、取得コンポーネントはアイドル状態に戻り、
/// ユーザーは再試行できます。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CameraError {
    /// カメラへのアクセスが拒否された
    #[error("カメラへのアクセスが許可されていません")]
    PermissionDenied,

    /// カメラデバイスが存在しない
    #[error("カメラデバイスが見つかりません")]
    NotFound,

    /// 他のプロセスがカメラを使用中
    #[error("カメラが他のアプリケーションで使用中です")]
    InUse,

    /// その他の失敗
    #[error("カメラの起動に失敗しました: {0}")]
    Other(String),
}

impl CameraError {
    /// ユーザーに表示する対処手順つきメッセージを取得
    pub fn user_message(&self) -> &str {
        match self {
            CameraError::PermissionDenied => {
                "カメラへのアクセスが許可されていません。ブラウザの設定を確認し、他のアプリケーション（Zoom等）を終了してから再度お試しください"
            }
            CameraError::NotFound => {
                "カメラが見つかりません。PCにカメラが接続されているか確認してください"
            }
            CameraError::InUse => {
                "カメラにアクセスできません。カメラを使用する他のアプリケーションを終了してから再度お試しください"
            }
            CameraError::Other(_) => "カメラの起動に失敗しました。再度お試しください",
        }
    }
}

/// アプリケーション全体で使用される統一エラー型
#[derive(Debug, Error)]
pub enum AppError {
    /// バリデーション関連のエラー
    #[error("バリデーションエラー: {0}")]
    Validation(String),

    /// 許可されていないファイル形式
    #[error("対応していないファイル形式です: {0}")]
    UnsupportedMediaType(String),

    /// ファイルサイズ上限超過
    #[error("ファイルサイズが上限を超えています: {size}バイト（上限{max}バイト）")]
    PayloadTooLarge { size: u64, max: u64 },

    /// カメラデバイス取得のエラー
    #[error("カメラエラー: {0}")]
    Media(#[from] CameraError),

    /// 画像デコードのエラー
    #[error("画像の読み込みに失敗しました: {0}")]
    Decode(String),

    /// 画像エンコードのエラー
    #[error("画像の最適化に失敗しました: {0}")]
    Encode(String),

    /// 永続化サービス連携でのエラー
    #[error("永続化エラー: {0}")]
    Persistence(String),

    /// リソースが見つからない場合のエラー
    #[error("リソースが見つかりません: {0}")]
    NotFound(String),

    /// 並行処理関連のエラー
    #[error("並行処理エラー: {0}")]
    Concurrency(String),

    /// 設定関連のエラー
    #[error("設定エラー: {0}")]
    Configuration(String),

    /// I/O関連のエラー
    #[error("I/Oエラー: {0}")]
    Io(#[from] std::io::Error),

    /// JSON解析エラー
    #[error("JSON解析エラー: {0}")]
    Json(#[from] serde_json::Error),
}

/// エラーの重要度を表す列挙型
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ErrorSeverity {
    /// 低重要度（ユーザー入力エラーなど）
    Low,
    /// 中重要度（画像パイプラインや外部サービスの一時的エラーなど）
    Medium,
    /// 高重要度（設定・並行処理エラーなど）
    High,
}

impl AppError {
    /// ユーザーに表示するためのフレンドリーなメッセージを取得
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::UnsupportedMediaType(_) => "画像ファイルのみアップロード可能です".to_string(),
            AppError::PayloadTooLarge { .. } => {
                "ファイルサイズは10MB以下にしてください".to_string()
            }
            AppError::Media(e) => e.user_message().to_string(),
            AppError::Decode(_) => "画像の読み込みに失敗しました".to_string(),
            AppError::Encode(_) => "画像の最適化に失敗しました".to_string(),
            AppError::Persistence(_) => "申請の送信に失敗しました。再度お試しください".to_string(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Concurrency(_) => "処理が混み合っています。しばらくお待ちください".to_string(),
            AppError::Configuration(_) => "設定エラーが発生しました".to_string(),
            AppError::Io(_) => "ファイル操作でエラーが発生しました".to_string(),
            AppError::Json(_) => "データ形式の解析でエラーが発生しました".to_string(),
        }
    }

    /// エラーの詳細情報を取得（ログ出力用）
    pub fn details(&self) -> String {
        format!("{self}")
    }

    /// エラーの重要度を取得
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::Validation(_) => ErrorSeverity::Low,
            AppError::UnsupportedMediaType(_) => ErrorSeverity::Low,
            AppError::PayloadTooLarge { .. } => ErrorSeverity::Low,
            AppError::Media(_) => ErrorSeverity::Medium,
            AppError::Decode(_) => ErrorSeverity::Medium,
            AppError::Encode(_) => ErrorSeverity::Medium,
            AppError::Persistence(_) => ErrorSeverity::Medium,
            AppError::NotFound(_) => ErrorSeverity::Low,
            AppError::Concurrency(_) => ErrorSeverity::High,
            AppError::Configuration(_) => ErrorSeverity::High,
            AppError::Io(_) => ErrorSeverity::Medium,
            AppError::Json(_) => ErrorSeverity::Medium,
        }
    }

    /// バリデーションエラーを作成するヘルパー関数
    pub fn validation<S: Into<String>>(message: S) -> Self {
        AppError::Validation(message.into())
    }

    /// リソース未発見エラーを作成するヘルパー関数
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        AppError::NotFound(format!("{}が見つかりません", resource.into()))
    }

    /// 永続化エラーを作成するヘルパー関数
    pub fn persistence<S: Into<String>>(message: S) -> Self {
        AppError::Persistence(message.into())
    }

    /// 並行処理エラーを作成するヘルパー関数
    pub fn concurrency<S: Into<String>>(message: S) -> Self {
        AppError::Concurrency(message.into())
    }

    /// 設定エラーを作成するヘルパー関数
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }
}

/// AppErrorからStringへの変換（UI境界での使用のため）
impl From<AppError> for String {
    fn from(error: AppError) -> Self {
        error.user_message()
    }
}

/// Result型のエイリアス（アプリケーション全体で使用）
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_severity() {
        // 各エラータイプの重要度をテスト
        assert_eq!(
            AppError::validation("テスト").severity(),
            ErrorSeverity::Low
        );
        assert_eq!(
            AppError::Media(CameraError::PermissionDenied).severity(),
            ErrorSeverity::Medium
        );
        assert_eq!(
            AppError::persistence("送信失敗").severity(),
            ErrorSeverity::Medium
        );
        assert_eq!(
            AppError::concurrency("二重送信").severity(),
            ErrorSeverity::High
        );
        assert_eq!(
            AppError::configuration("設定不正").severity(),
            ErrorSeverity::High
        );
    }

    #[test]
    fn test_user_message() {
        // ユーザーメッセージのテスト
        let validation_error = AppError::validation("金額を入力してください");
        assert_eq!(validation_error.user_message(), "金額を入力してください");

        let not_found_error = AppError::not_found("経費");
        assert_eq!(not_found_error.user_message(), "経費が見つかりません");

        let too_large = AppError::PayloadTooLarge {
            size: 11 * 1024 * 1024,
            max: 10 * 1024 * 1024,
        };
        assert_eq!(
            too_large.user_message(),
            "ファイルサイズは10MB以下にしてください"
        );
    }

    #[test]
    fn test_camera_error_classification() {
        // カメラエラー分類のテスト
        let denied: AppError = CameraError::PermissionDenied.into();
        assert!(matches!(
            denied,
            AppError::Media(CameraError::PermissionDenied)
        ));
        assert!(denied.user_message().contains("許可されていません"));

        let in_use = CameraError::InUse;
        assert!(in_use.user_message().contains("他のアプリケーション"));
    }

    #[test]
    fn test_string_conversion() {
        // String変換のテスト
        let error = AppError::validation("テストエラー");
        let error_string: String = error.into();
        assert_eq!(error_string, "テストエラー");
    }

    #[test]
    fn test_error_details() {
        // エラー詳細のテスト
        let error = AppError::Decode("不正なバイト列".to_string());
        assert!(error.details().contains("不正なバイト列"));
    }
}
