use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// 受け付ける画像のMIMEタイプ（許可リスト）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageMimeType {
    Jpeg,
    Png,
    Gif,
}

impl ImageMimeType {
    /// MIMEタイプ文字列から変換する
    ///
    /// 許可リスト（image/jpeg, image/png, image/gif）以外はNoneを返します。
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "image/jpeg" => Some(ImageMimeType::Jpeg),
            "image/png" => Some(ImageMimeType::Png),
            "image/gif" => Some(ImageMimeType::Gif),
            _ => None,
        }
    }

    /// MIMEタイプ文字列を取得
    pub fn as_str(&self) -> &str {
        match self {
            ImageMimeType::Jpeg => "image/jpeg",
            ImageMimeType::Png => "image/png",
            ImageMimeType::Gif => "image/gif",
        }
    }
}

/// 領収書画像（取り込み直後の未最適化データ）
///
/// 取得元（ファイル選択・ドラッグ＆ドロップ・カメラ撮影）を問わず、
/// 1回の取得成功ごとに前の画像を丸ごと置き換えます。
/// 不変条件：存在する場合は raw・mime_type・size_bytes が常に整合します。
/// preview_uri はデコード1サイクル分だけ raw に遅れて解決されることが
/// あります（UI側はその遅延を許容します）。永続化はされません。
#[derive(Debug, Clone)]
pub struct ReceiptImage {
    /// 元のファイル名
    pub file_name: String,
    /// 画像のバイナリデータ（取り込み時のまま）
    pub raw: Vec<u8>,
    pub mime_type: ImageMimeType,
    pub size_bytes: u64,
    /// 表示用のプレビュー参照（データURI）。raw更新のたびに再生成されます。
    pub preview_uri: Option<String>,
}

impl ReceiptImage {
    /// 取り込んだバイト列から領収書画像を構築する（プレビューは未解決）
    pub fn new(file_name: impl Into<String>, mime_type: ImageMimeType, raw: Vec<u8>) -> Self {
        let size_bytes = raw.len() as u64;
        Self {
            file_name: file_name.into(),
            raw,
            mime_type,
            size_bytes,
            preview_uri: None,
        }
    }

    /// rawバイト列からデータURIを生成する
    pub fn data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type.as_str(),
            BASE64_STANDARD.encode(&self.raw)
        )
    }

    /// プレビューが解決済みかどうか
    pub fn has_preview(&self) -> bool {
        self.preview_uri.is_some()
    }
}

/// 最適化済みの領収書画像
///
/// 元の形式にかかわらずJPEGに統一されます。
#[derive(Debug, Clone)]
pub struct OptimizedImage {
    /// `.jpg` 拡張子に揃えたファイル名
    pub file_name: String,
    /// JPEGエンコード済みデータ
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_allow_list() {
        // 許可リスト内のMIMEタイプ
        assert_eq!(
            ImageMimeType::from_mime("image/jpeg"),
            Some(ImageMimeType::Jpeg)
        );
        assert_eq!(
            ImageMimeType::from_mime("image/png"),
            Some(ImageMimeType::Png)
        );
        assert_eq!(
            ImageMimeType::from_mime("image/gif"),
            Some(ImageMimeType::Gif)
        );

        // 許可リスト外は拒否
        assert_eq!(ImageMimeType::from_mime("application/pdf"), None);
        assert_eq!(ImageMimeType::from_mime("image/webp"), None);
        assert_eq!(ImageMimeType::from_mime(""), None);
    }

    #[test]
    fn test_receipt_image_construction() {
        let image = ReceiptImage::new("receipt.png", ImageMimeType::Png, vec![1, 2, 3]);
        assert_eq!(image.size_bytes, 3);
        assert!(!image.has_preview());
    }

    #[test]
    fn test_data_uri_format() {
        let image = ReceiptImage::new("receipt.jpg", ImageMimeType::Jpeg, vec![0xFF, 0xD8]);
        let uri = image.data_uri();
        assert!(uri.starts_with("data:image/jpeg;base64,"));
        assert!(uri.len() > "data:image/jpeg;base64,".len());
    }
}
