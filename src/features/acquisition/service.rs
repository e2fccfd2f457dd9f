// 領収書画像の取り込みサービス
//
// ファイル選択・ドラッグ＆ドロップ・カメラ撮影の3経路から
// ReceiptImage を生成します。経路間で所有権の共有はなく、
// 取得成功のたびに前の画像を丸ごと置き換えます。

use super::device::{MediaDevices, StreamConstraints, VideoStream};
use crate::models::receipt::{ImageMimeType, ReceiptImage};
use crate::shared::config::UploadConfig;
use crate::shared::errors::{AppError, AppResult, CameraError};
use log::{debug, info, warn};
use std::sync::Arc;

/// ページ既定のドロップ動作（ファイルへのナビゲーション）を抑止するホスト
///
/// 抑止はコンポーネントのマウント期間にスコープされ、外側に漏れては
/// いけません。実装側は install / remove を対で呼ばれることを前提に
/// できます。
pub trait DropHost: Send + Sync {
    /// ページ全体のドラッグ＆ドロップ既定動作を抑止する
    fn suppress_default_drop(&self);

    /// 抑止を解除して既定動作を復元する
    fn restore_default_drop(&self);
}

/// ドロップ抑止のRAIIガード
///
/// 生成時に抑止を開始し、破棄時に必ず復元します。
pub struct DropSuppression {
    host: Arc<dyn DropHost>,
}

impl DropSuppression {
    pub fn new(host: Arc<dyn DropHost>) -> Self {
        host.suppress_default_drop();
        Self { host }
    }
}

impl Drop for DropSuppression {
    fn drop(&mut self) {
        self.host.restore_default_drop();
    }
}

/// カメラセッションの状態機械
///
/// デバイスハンドルは唯一の排他的共有リソースです。新規取得の前、
/// 撮影完了時、キャンセル時、セッション破棄時のすべての経路で
/// 必ず解放されます。
pub struct CameraSession {
    devices: Arc<dyn MediaDevices>,
    constraints: StreamConstraints,
    stream: Option<Box<dyn VideoStream>>,
}

impl CameraSession {
    pub fn new(devices: Arc<dyn MediaDevices>) -> Self {
        Self {
            devices,
            constraints: StreamConstraints::default(),
            stream: None,
        }
    }

    /// カメラを起動する
    ///
    /// 既存のストリームを保持している場合は、新しいネゴシエーションを
    /// 始める前に必ず解放します（同時に生存するストリームは最大1本）。
    /// 失敗は分類されたCameraErrorとして返り、セッションはアイドルに
    /// 戻ります。ユーザーは任意の経路で再試行できます。
    pub async fn start(&mut self) -> Result<(), CameraError> {
        debug!("カメラ起動処理を開始します");

        // 既存のストリームを確実に停止してから新規取得する
        self.release();

        let devices = self
            .devices
            .enumerate_video_devices()
            .await
            .map_err(|e| CameraError::Other(e.details()))?;
        debug!("利用可能なカメラデバイス数: {}", devices.len());

        if devices.is_empty() {
            warn!("カメラデバイスが見つかりません");
            return Err(CameraError::NotFound);
        }

        let stream = self.devices.acquire_stream(&self.constraints).await?;
        self.stream = Some(stream);
        info!("カメラストリームを取得しました");
        Ok(())
    }

    /// 現在のフレームを静止画として撮影し、デバイスを解放する
    ///
    /// 成功時はJPEG形式のReceiptImageを返します。プレビューは撮影
    /// データからその場で解決されます。
    pub fn capture(&mut self) -> AppResult<ReceiptImage> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| AppError::from(CameraError::Other("カメラが起動していません".to_string())))?;

        let frame = stream.capture_frame()?;
        info!(
            "写真を撮影しました: {}x{}, {}バイト",
            frame.width,
            frame.height,
            frame.data.len()
        );

        // 撮影完了でデバイスを解放する
        self.release();

        let mut image = ReceiptImage::new("camera-capture.jpg", ImageMimeType::Jpeg, frame.data);
        image.preview_uri = Some(image.data_uri());
        Ok(image)
    }

    /// 画像を生成せずにデバイスを解放する
    pub fn cancel(&mut self) {
        debug!("カメラセッションをキャンセルします");
        self.release();
    }

    /// セッションがアクティブ（ストリーム保持中）かどうか
    pub fn is_active(&self) -> bool {
        self.stream.as_ref().is_some_and(|s| s.is_live())
    }

    /// 保持中のストリームを停止して手放す（冪等）
    fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            debug!("カメラストリームを解放しました");
        }
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        // コンポーネント破棄時の解放漏れを防ぐ
        self.release();
    }
}

/// 領収書画像の取り込みコントローラ
///
/// 保持する画像は高々1枚。取り込み失敗時は既存の画像に一切触れません。
pub struct ReceiptAcquisition {
    config: UploadConfig,
    camera: CameraSession,
    current: Option<ReceiptImage>,
    zoomed: bool,
    _drop_suppression: DropSuppression,
}

impl ReceiptAcquisition {
    pub fn new(
        config: UploadConfig,
        devices: Arc<dyn MediaDevices>,
        drop_host: Arc<dyn DropHost>,
    ) -> Self {
        Self {
            config,
            camera: CameraSession::new(devices),
            current: None,
            zoomed: false,
            _drop_suppression: DropSuppression::new(drop_host),
        }
    }

    /// 現在保持している領収書画像
    pub fn current(&self) -> Option<&ReceiptImage> {
        self.current.as_ref()
    }

    /// ファイル選択による取り込み
    ///
    /// MIMEタイプとサイズを検証し、受理した場合はプレビューを
    /// 非同期に解決してから画像を丸ごと置き換えます。拒否時は
    /// 既存の画像を変更しません。
    pub async fn intake_file(
        &mut self,
        file_name: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> AppResult<&ReceiptImage> {
        let mime_type = self.validate(mime, bytes.len() as u64)?;

        let mut image = ReceiptImage::new(file_name, mime_type, bytes);
        resolve_preview(&mut image).await;
        info!(
            "領収書画像を取り込みました: {} ({}, {}バイト)",
            image.file_name,
            mime_type.as_str(),
            image.size_bytes
        );

        self.zoomed = false;
        Ok(self.current.insert(image))
    }

    /// ドラッグ＆ドロップによる取り込み（検証はファイル選択と同一）
    pub async fn intake_drop(
        &mut self,
        file_name: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> AppResult<&ReceiptImage> {
        self.intake_file(file_name, mime, bytes).await
    }

    /// カメラを起動してアクティブ状態にする
    pub async fn start_camera(&mut self) -> Result<(), CameraError> {
        self.camera.start().await
    }

    /// アクティブなカメラから撮影し、現在の画像を置き換える
    pub fn capture_photo(&mut self) -> AppResult<&ReceiptImage> {
        let image = self.camera.capture()?;
        self.zoomed = false;
        Ok(self.current.insert(image))
    }

    /// 画像を生成せずにカメラを停止する
    pub fn stop_camera(&mut self) {
        self.camera.cancel();
    }

    /// カメラがアクティブかどうか
    pub fn is_camera_active(&self) -> bool {
        self.camera.is_active()
    }

    /// 現在の画像を破棄し、プレビュー参照も無効化する
    pub fn clear(&mut self) {
        self.current = None;
        self.zoomed = false;
    }

    /// プレビューのズーム表示を切り替える
    pub fn toggle_zoom(&mut self) -> bool {
        self.zoomed = !self.zoomed;
        self.zoomed
    }

    /// 取り込み前の検証（MIME許可リストとサイズ上限）
    fn validate(&self, mime: &str, size_bytes: u64) -> AppResult<ImageMimeType> {
        let mime_type = ImageMimeType::from_mime(mime).ok_or_else(|| {
            warn!("許可されていないファイル形式を拒否しました: {mime}");
            AppError::UnsupportedMediaType(mime.to_string())
        })?;

        if size_bytes > self.config.max_file_size_bytes {
            warn!(
                "サイズ上限を超えるファイルを拒否しました: {size_bytes}バイト（上限{}バイト）",
                self.config.max_file_size_bytes
            );
            return Err(AppError::PayloadTooLarge {
                size: size_bytes,
                max: self.config.max_file_size_bytes,
            });
        }

        Ok(mime_type)
    }
}

/// プレビュー参照をデコード1サイクル分の非同期処理として解決する
///
/// 呼び出し側はrawを先に受け取り、プレビューは解決完了後に
/// 参照可能になります。
async fn resolve_preview(image: &mut ReceiptImage) {
    image.preview_uri = Some(image.data_uri());
}
