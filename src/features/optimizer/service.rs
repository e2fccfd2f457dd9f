// 領収書画像の最適化サービス
//
// 送信前にクライアント側で実行される縮小・再圧縮ステップ。
// 同じ入力バイト列は常に同じ出力寸法・同じエンコードパラメータに
// なる、副作用のない純粋な変換として扱います。

use crate::models::receipt::{OptimizedImage, ReceiptImage};
use crate::shared::config::UploadConfig;
use crate::shared::errors::{AppError, AppResult};
use image::codecs::jpeg::JpegEncoder;
use image::GenericImageView;
use log::{debug, info};
use std::path::Path;

/// 画像オプティマイザ
///
/// 長辺が上限以下になるようアスペクト比を保って縮小し、
/// 固定品質のJPEGに再エンコードします。元の形式は破棄されます。
pub struct ImageOptimizer {
    max_edge_px: u32,
    jpeg_quality: u8,
}

impl ImageOptimizer {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            max_edge_px: config.max_edge_px,
            jpeg_quality: config.jpeg_quality,
        }
    }

    /// 領収書画像を最適化する
    ///
    /// # 戻り値
    /// JPEG形式の最適化済み画像、デコード・エンコード失敗時はエラー
    pub async fn optimize(&self, image: &ReceiptImage) -> AppResult<OptimizedImage> {
        let decoded = image::load_from_memory(&image.raw)
            .map_err(|e| AppError::Decode(e.to_string()))?;

        let (width, height) = decoded.dimensions();
        let (target_width, target_height) = target_dimensions(width, height, self.max_edge_px);
        debug!(
            "最適化: {}x{} -> {}x{} (品質{}%)",
            width, height, target_width, target_height, self.jpeg_quality
        );

        // 上限内に収まっている場合は寸法を変更しない
        let resized = if (target_width, target_height) != (width, height) {
            decoded.resize_exact(target_width, target_height, image::imageops::FilterType::Triangle)
        } else {
            decoded
        };

        let mut data = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut data, self.jpeg_quality);
        encoder
            .encode_image(&resized.to_rgb8())
            .map_err(|e| AppError::Encode(e.to_string()))?;

        if data.is_empty() {
            return Err(AppError::Encode("エンコード結果が空です".to_string()));
        }

        info!(
            "画像を最適化しました: {} ({}バイト -> {}バイト)",
            image.file_name,
            image.raw.len(),
            data.len()
        );

        Ok(OptimizedImage {
            file_name: jpeg_file_name(&image.file_name),
            data,
            width: target_width,
            height: target_height,
        })
    }
}

/// アスペクト比を保った縮小後の寸法を計算する
///
/// 幅が支配的な場合は幅を、そうでない場合は高さを上限に合わせます。
/// すでに上限内の場合は入力の寸法をそのまま返します（拡大しない）。
fn target_dimensions(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    let mut w = width as f64;
    let mut h = height as f64;
    let max = max_edge as f64;

    if width > height {
        if w > max {
            h *= max / w;
            w = max;
        }
    } else if h > max {
        w *= max / h;
        h = max;
    }

    ((w.round() as u32).max(1), (h.round() as u32).max(1))
}

/// 拡張子を `.jpg` に揃えたファイル名を生成する
fn jpeg_file_name(original: &str) -> String {
    let stem = Path::new(original)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("receipt");
    format!("{stem}.jpg")
}
