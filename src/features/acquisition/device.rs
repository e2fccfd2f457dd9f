// カメラデバイス境界の抽象化
//
// ブラウザの MediaDevices API（enumerateDevices / getUserMedia /
// MediaStreamTrack.stop）に相当する操作をトレイトとして切り出します。
// コアはこの境界の実装を所有せず、テストではモック実装を差し込みます。

use crate::shared::errors::{AppResult, CameraError};
use async_trait::async_trait;

/// ストリーム取得時の制約
#[derive(Debug, Clone)]
pub struct StreamConstraints {
    /// 希望する幅（ideal指定に相当）
    pub ideal_width: u32,
    /// 希望する高さ（ideal指定に相当）
    pub ideal_height: u32,
    /// 音声トラックを要求するか
    pub audio: bool,
}

impl Default for StreamConstraints {
    fn default() -> Self {
        // 領収書撮影にはシンプルな設定で十分
        Self {
            ideal_width: 1280,
            ideal_height: 720,
            audio: false,
        }
    }
}

/// 列挙されたビデオ入力デバイスの情報
#[derive(Debug, Clone)]
pub struct VideoDeviceInfo {
    pub device_id: String,
    pub label: String,
}

/// 撮影された静止画フレーム（JPEGエンコード済み）
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// 取得済みのビデオストリーム
///
/// デバイスリソースは排他的です。`stop` の呼び出しでトラックを停止し、
/// リソースを解放します。解放漏れはリソースリークであり設計上禁止です。
pub trait VideoStream: Send {
    /// 現在のビデオフレームを静止画として取り出す
    fn capture_frame(&mut self) -> AppResult<CapturedFrame>;

    /// すべてのトラックを停止してデバイスを解放する（冪等）
    fn stop(&mut self);

    /// ストリームが生きているかどうか
    fn is_live(&self) -> bool;
}

/// デバイスメディアAPI
#[async_trait]
pub trait MediaDevices: Send + Sync {
    /// 利用可能なビデオ入力デバイスを列挙する
    async fn enumerate_video_devices(&self) -> AppResult<Vec<VideoDeviceInfo>>;

    /// ストリーム取得をネゴシエーションする
    ///
    /// 失敗は種別（権限拒否・デバイスなし・使用中・その他）に分類されます。
    async fn acquire_stream(
        &self,
        constraints: &StreamConstraints,
    ) -> Result<Box<dyn VideoStream>, CameraError>;
}
