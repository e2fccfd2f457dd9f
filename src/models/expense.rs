use serde::{Deserialize, Serialize};

/// 経費申請のステータス
///
/// `Draft` は旧データモデルに存在した状態で、現行のフローからは
/// どの遷移でも到達しません（互換性のため型には残しています）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseStatus {
    /// 下書き（未使用の到達不能状態）
    Draft,
    /// 承認待ち
    Pending,
    /// 承認済み
    Approved,
    /// 否認
    Rejected,
}

impl ExpenseStatus {
    /// シリアライズ形式と同じ識別子を取得
    pub fn as_str(&self) -> &str {
        match self {
            ExpenseStatus::Draft => "draft",
            ExpenseStatus::Pending => "pending",
            ExpenseStatus::Approved => "approved",
            ExpenseStatus::Rejected => "rejected",
        }
    }

    /// 日本語の表示名を取得
    pub fn label_ja(&self) -> &str {
        match self {
            ExpenseStatus::Draft => "下書き",
            ExpenseStatus::Pending => "承認待ち",
            ExpenseStatus::Approved => "承認済み",
            ExpenseStatus::Rejected => "否認",
        }
    }

    /// 終端状態（以降の遷移なし）かどうかを判定
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExpenseStatus::Approved | ExpenseStatus::Rejected)
    }
}

/// 経費カテゴリ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    /// 交通費
    Transportation,
    /// 飲食費
    Meals,
    /// 宿泊費
    Accommodation,
    /// 備品費
    Supplies,
    /// 接待費
    Entertainment,
    /// その他
    Other,
}

impl Default for ExpenseCategory {
    fn default() -> Self {
        ExpenseCategory::Other
    }
}

impl ExpenseCategory {
    /// 全カテゴリの一覧（選択肢の表示順）
    pub const ALL: [ExpenseCategory; 6] = [
        ExpenseCategory::Transportation,
        ExpenseCategory::Meals,
        ExpenseCategory::Accommodation,
        ExpenseCategory::Supplies,
        ExpenseCategory::Entertainment,
        ExpenseCategory::Other,
    ];

    /// 日本語の表示名を取得
    pub fn label_ja(&self) -> &str {
        match self {
            ExpenseCategory::Transportation => "交通費",
            ExpenseCategory::Meals => "飲食費",
            ExpenseCategory::Accommodation => "宿泊費",
            ExpenseCategory::Supplies => "備品費",
            ExpenseCategory::Entertainment => "接待費",
            ExpenseCategory::Other => "その他",
        }
    }
}

/// 経費申請データモデル
///
/// `id`・`status`・`created_at`・`updated_at` は永続化サービスが
/// 採番・設定します。クライアント側で値を割り当てることはありません。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseClaim {
    pub id: String,
    pub user_id: String,
    /// 金額（円単位の整数）
    pub amount: u64,
    /// 経費発生日（YYYY-MM-DD形式）
    pub date: String,
    pub category: ExpenseCategory,
    pub store_name: String,
    pub items: String,
    pub comments: String,
    /// 最適化済み領収書画像への参照
    pub image_url: String,
    pub status: ExpenseStatus,
    pub created_at: String,
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&ExpenseStatus::Pending).unwrap();
        assert_eq!(json, "\"pending\"");

        let status: ExpenseStatus = serde_json::from_str("\"rejected\"").unwrap();
        assert_eq!(status, ExpenseStatus::Rejected);
    }

    #[test]
    fn test_terminal_statuses() {
        // 承認済み・否認は終端、承認待ち・下書きは非終端
        assert!(ExpenseStatus::Approved.is_terminal());
        assert!(ExpenseStatus::Rejected.is_terminal());
        assert!(!ExpenseStatus::Pending.is_terminal());
        assert!(!ExpenseStatus::Draft.is_terminal());
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(ExpenseCategory::Transportation.label_ja(), "交通費");
        assert_eq!(ExpenseCategory::Other.label_ja(), "その他");
        assert_eq!(ExpenseCategory::ALL.len(), 6);
    }

    #[test]
    fn test_claim_roundtrip() {
        let claim = ExpenseClaim {
            id: "e-1".to_string(),
            user_id: "u-1".to_string(),
            amount: 1200,
            date: "2025-02-16".to_string(),
            category: ExpenseCategory::Supplies,
            store_name: "株式会社文具堂".to_string(),
            items: "ノート、ボールペン".to_string(),
            comments: String::new(),
            image_url: "receipts/abc.jpg".to_string(),
            status: ExpenseStatus::Pending,
            created_at: "2025-02-16T10:00:00+09:00".to_string(),
            updated_at: "2025-02-16T10:00:00+09:00".to_string(),
        };

        let json = serde_json::to_string(&claim).unwrap();
        let back: ExpenseClaim = serde_json::from_str(&json).unwrap();
        assert_eq!(back.amount, 1200);
        assert_eq!(back.status, ExpenseStatus::Pending);
        assert_eq!(back.category, ExpenseCategory::Supplies);
    }
}
