/// 領収書画像取り込み機能モジュール
///
/// このモジュールは領収書画像の取得に関連するすべての機能を提供します：
/// - ファイル選択・ドラッグ＆ドロップによる取り込みと検証
/// - カメラデバイスのネゴシエーションと撮影
/// - プレビュー参照の生成と無効化
// サブモジュールの宣言
pub mod device;
pub mod service;

// 公開インターフェース

// デバイス境界
pub use device::{CapturedFrame, MediaDevices, StreamConstraints, VideoDeviceInfo, VideoStream};

// サービス
pub use service::{CameraSession, DropHost, DropSuppression, ReceiptAcquisition};
