// 経費申請フォームのコントローラ
//
// 状態機械: Editing → Submitting → { Submitted | Editing(エラーあり) }
// 下書きは送信までローカルに保持され、どのフィールドも送信前に
// 永続化されることはありません。

use super::repository::{CreateExpenseInput, ExpenseRepository};
use crate::features::optimizer::ImageOptimizer;
use crate::models::expense::{ExpenseCategory, ExpenseClaim};
use crate::models::receipt::ReceiptImage;
use crate::shared::config::UploadConfig;
use crate::shared::errors::{AppError, AppResult};
use chrono::Utc;
use chrono_tz::Asia::Tokyo;
use log::{error, info};
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

/// フォームの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    /// 編集中（下書きを自由に変更できる）
    Editing,
    /// 送信処理中（再送信は拒否される）
    Submitting,
    /// 送信完了（この下書きの終端状態）
    Submitted,
}

/// バリデーション対象のフィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FormField {
    Image,
    Amount,
    Date,
    StoreName,
    Items,
}

/// フィールドごとのエラーメッセージ
pub type ValidationErrors = BTreeMap<FormField, String>;

/// 経費申請の下書き
///
/// フォームコントローラが1つの下書きの間だけ排他的に所有します。
#[derive(Debug, Clone, Default)]
pub struct ExpenseDraft {
    /// 金額（円単位の整数）
    pub amount: u64,
    /// 経費発生日（YYYY-MM-DD形式）
    pub date: String,
    pub category: ExpenseCategory,
    pub store_name: String,
    pub items: String,
    pub comments: String,
    /// 取り込み済みの領収書画像（未最適化）
    pub receipt: Option<ReceiptImage>,
}

impl ExpenseDraft {
    /// 今日の日付（JST）とカテゴリ「その他」で初期化した下書きを作る
    pub fn new() -> Self {
        Self {
            date: Utc::now().with_timezone(&Tokyo).format("%Y-%m-%d").to_string(),
            ..Self::default()
        }
    }

    /// 必須項目のバリデーション（送信試行時にのみ実行される）
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        if self.amount == 0 {
            errors.insert(FormField::Amount, "金額を入力してください".to_string());
        }
        if self.date.is_empty() {
            errors.insert(FormField::Date, "日付を選択してください".to_string());
        }
        if self.store_name.trim().is_empty() {
            errors.insert(FormField::StoreName, "店舗名を入力してください".to_string());
        }
        if self.items.trim().is_empty() {
            errors.insert(FormField::Items, "購入品目を入力してください".to_string());
        }
        if self.receipt.is_none() {
            errors.insert(
                FormField::Image,
                "領収書画像をアップロードしてください".to_string(),
            );
        }

        errors
    }
}

/// 経費申請フォームのコントローラ
pub struct ExpenseFormController {
    repository: Arc<dyn ExpenseRepository>,
    optimizer: ImageOptimizer,
    state: FormState,
    draft: ExpenseDraft,
    errors: ValidationErrors,
}

impl ExpenseFormController {
    pub fn new(repository: Arc<dyn ExpenseRepository>, config: &UploadConfig) -> Self {
        Self {
            repository,
            optimizer: ImageOptimizer::new(config),
            state: FormState::Editing,
            draft: ExpenseDraft::new(),
            errors: ValidationErrors::new(),
        }
    }

    /// 現在の状態
    pub fn state(&self) -> FormState {
        self.state
    }

    /// 直近の送信試行で発生したフィールド別エラー
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// 下書きの参照
    pub fn draft(&self) -> &ExpenseDraft {
        &self.draft
    }

    /// 下書きの可変参照（編集中のみ取得できる）
    pub fn draft_mut(&mut self) -> Option<&mut ExpenseDraft> {
        if self.state == FormState::Editing {
            Some(&mut self.draft)
        } else {
            None
        }
    }

    /// 下書きを送信する
    ///
    /// バリデーション失敗時はEditingにとどまり、エラーマップを
    /// 埋めて返します。永続化の失敗時もEditingに戻り、入力値は
    /// 一切失われません（原因はログに記録し、ユーザーには汎用
    /// メッセージを返します）。送信中の再送信は拒否され、並行
    /// 実行は起こりません。
    pub async fn submit(&mut self, user_id: &str) -> AppResult<ExpenseClaim> {
        match self.state {
            FormState::Submitting => {
                return Err(AppError::concurrency("送信処理が進行中です"));
            }
            FormState::Submitted => {
                return Err(AppError::validation("この申請はすでに送信済みです"));
            }
            FormState::Editing => {}
        }

        self.errors = self.draft.validate();
        if !self.errors.is_empty() {
            return Err(AppError::validation("入力内容を確認してください"));
        }

        self.state = FormState::Submitting;

        // validateで存在を確認済みだが、状態を壊さないよう明示的に扱う
        let Some(receipt) = self.draft.receipt.as_ref() else {
            self.state = FormState::Editing;
            return Err(AppError::validation(
                "領収書画像をアップロードしてください",
            ));
        };

        // 送信する画像は必ず最適化済みの形にする
        let optimized = match self.optimizer.optimize(receipt).await {
            Ok(optimized) => optimized,
            Err(e) => {
                error!("画像の最適化に失敗しました: {}", e.details());
                self.state = FormState::Editing;
                return Err(e);
            }
        };

        // 最適化済み画像への参照キーを採番する
        let image_url = format!("receipts/{}-{}", Uuid::new_v4(), optimized.file_name);
        info!(
            "最適化済み画像を添付します: {} ({}x{}, {}バイト)",
            image_url,
            optimized.width,
            optimized.height,
            optimized.data.len()
        );

        let input = CreateExpenseInput {
            user_id: user_id.to_string(),
            amount: self.draft.amount,
            date: self.draft.date.clone(),
            category: self.draft.category,
            store_name: self.draft.store_name.clone(),
            items: self.draft.items.clone(),
            comments: if self.draft.comments.is_empty() {
                None
            } else {
                Some(self.draft.comments.clone())
            },
            image_url: Some(image_url),
        };

        match self.repository.create_claim(input).await {
            Ok(claim) => {
                info!("経費申請を送信しました: id={}", claim.id);
                self.state = FormState::Submitted;
                Ok(claim)
            }
            Err(e) => {
                // 下書きは保持したまま編集状態へ戻す
                error!("経費申請の送信に失敗しました: {}", e.details());
                self.state = FormState::Editing;
                Err(AppError::persistence("経費申請の送信に失敗しました"))
            }
        }
    }

    /// 下書きを無条件に破棄する（編集中のみ）
    pub fn cancel(&mut self) -> AppResult<()> {
        if self.state != FormState::Editing {
            return Err(AppError::validation("編集中のフォームのみキャンセルできます"));
        }
        self.draft = ExpenseDraft::new();
        self.errors.clear();
        Ok(())
    }
}
