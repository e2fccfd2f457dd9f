// 経費申請の永続化サービス境界
//
// 申請コレクションの所有者は永続化サービスであり、コアは
// このトレイト越しにしか触れません。実データストアへの差し替えは
// 実装の交換だけで済みます。

use crate::models::expense::{ExpenseCategory, ExpenseClaim, ExpenseStatus};
use crate::shared::errors::{AppError, AppResult};
use async_trait::async_trait;
use chrono::Utc;
use chrono_tz::Asia::Tokyo;
use log::info;
use serde::Deserialize;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// 画像参照が未指定の場合に使用する既定の領収書画像URL
pub const DEFAULT_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1450101499163-c8848c66ca85";

/// JSTの現在時刻をRFC3339形式で取得する
fn now_jst() -> String {
    Utc::now().with_timezone(&Tokyo).to_rfc3339()
}

/// 経費申請作成用DTO
#[derive(Debug, Clone, Deserialize)]
pub struct CreateExpenseInput {
    pub user_id: String,
    pub amount: u64,
    pub date: String,
    pub category: ExpenseCategory,
    pub store_name: String,
    pub items: String,
    pub comments: Option<String>,
    pub image_url: Option<String>,
}

/// 経費申請更新用DTO
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateExpensePatch {
    pub amount: Option<u64>,
    pub date: Option<String>,
    pub category: Option<ExpenseCategory>,
    pub store_name: Option<String>,
    pub items: Option<String>,
    pub comments: Option<String>,
    pub image_url: Option<String>,
    pub status: Option<ExpenseStatus>,
}

/// 経費申請リポジトリ
///
/// `id`・`status`・タイムスタンプの採番と更新はすべてこの境界の
/// 責務です。クライアントが割り当てることはありません。
#[async_trait]
pub trait ExpenseRepository: Send + Sync {
    /// 経費申請を作成する（ステータスは承認待ちで開始）
    async fn create_claim(&self, input: CreateExpenseInput) -> AppResult<ExpenseClaim>;

    /// 経費申請の一覧を取得する
    async fn list_claims(&self) -> AppResult<Vec<ExpenseClaim>>;

    /// IDで経費申請を取得する
    async fn find_claim(&self, id: &str) -> AppResult<Option<ExpenseClaim>>;

    /// 経費申請を更新する（未知のIDはNotFound）
    async fn update_claim(&self, id: &str, patch: UpdateExpensePatch) -> AppResult<ExpenseClaim>;

    /// 経費申請を削除する（未知のIDはNotFound）
    async fn delete_claim(&self, id: &str) -> AppResult<()>;

    /// 申請を承認する（承認者操作）
    async fn approve(&self, id: &str, comments: Option<String>) -> AppResult<ExpenseClaim> {
        self.update_claim(
            id,
            UpdateExpensePatch {
                status: Some(ExpenseStatus::Approved),
                comments,
                ..UpdateExpensePatch::default()
            },
        )
        .await
    }

    /// 申請を否認する（承認者操作、理由は必須）
    async fn reject(&self, id: &str, comments: String) -> AppResult<ExpenseClaim> {
        self.update_claim(
            id,
            UpdateExpensePatch {
                status: Some(ExpenseStatus::Rejected),
                comments: Some(comments),
                ..UpdateExpensePatch::default()
            },
        )
        .await
    }
}

/// インメモリ実装
///
/// モジュールレベルの可変リストの置き換え。開発・テスト用で、
/// RwLockで保護したコレクションを単一所有します。
#[derive(Clone, Default)]
pub struct InMemoryExpenseRepository {
    claims: Arc<RwLock<Vec<ExpenseClaim>>>,
}

impl InMemoryExpenseRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 初期データ入りで構築する
    pub fn with_claims(claims: Vec<ExpenseClaim>) -> Self {
        Self {
            claims: Arc::new(RwLock::new(claims)),
        }
    }
}

#[async_trait]
impl ExpenseRepository for InMemoryExpenseRepository {
    async fn create_claim(&self, input: CreateExpenseInput) -> AppResult<ExpenseClaim> {
        let now = now_jst();
        let claim = ExpenseClaim {
            id: Uuid::new_v4().to_string(),
            user_id: input.user_id,
            amount: input.amount,
            date: input.date,
            category: input.category,
            store_name: input.store_name,
            items: input.items,
            comments: input.comments.unwrap_or_default(),
            image_url: input.image_url.unwrap_or_else(|| DEFAULT_IMAGE_URL.to_string()),
            status: ExpenseStatus::Pending,
            created_at: now.clone(),
            updated_at: now,
        };

        let mut claims = self
            .claims
            .write()
            .map_err(|e| AppError::concurrency(format!("書き込みロックの取得に失敗: {e}")))?;
        claims.push(claim.clone());

        info!("経費申請を作成しました: id={}", claim.id);
        Ok(claim)
    }

    async fn list_claims(&self) -> AppResult<Vec<ExpenseClaim>> {
        let claims = self
            .claims
            .read()
            .map_err(|e| AppError::concurrency(format!("読み取りロックの取得に失敗: {e}")))?;
        Ok(claims.clone())
    }

    async fn find_claim(&self, id: &str) -> AppResult<Option<ExpenseClaim>> {
        let claims = self
            .claims
            .read()
            .map_err(|e| AppError::concurrency(format!("読み取りロックの取得に失敗: {e}")))?;
        Ok(claims.iter().find(|c| c.id == id).cloned())
    }

    async fn update_claim(&self, id: &str, patch: UpdateExpensePatch) -> AppResult<ExpenseClaim> {
        let mut claims = self
            .claims
            .write()
            .map_err(|e| AppError::concurrency(format!("書き込みロックの取得に失敗: {e}")))?;

        let claim = claims
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::not_found("経費"))?;

        // 終端ステータスからの再遷移は許可しない
        if let Some(next_status) = patch.status {
            if claim.status.is_terminal() && next_status != claim.status {
                return Err(AppError::validation(
                    "承認済みまたは否認済みの申請は変更できません",
                ));
            }
        }

        if let Some(amount) = patch.amount {
            claim.amount = amount;
        }
        if let Some(date) = patch.date {
            claim.date = date;
        }
        if let Some(category) = patch.category {
            claim.category = category;
        }
        if let Some(store_name) = patch.store_name {
            claim.store_name = store_name;
        }
        if let Some(items) = patch.items {
            claim.items = items;
        }
        if let Some(comments) = patch.comments {
            claim.comments = comments;
        }
        if let Some(image_url) = patch.image_url {
            claim.image_url = image_url;
        }
        if let Some(status) = patch.status {
            claim.status = status;
        }
        claim.updated_at = now_jst();

        Ok(claim.clone())
    }

    async fn delete_claim(&self, id: &str) -> AppResult<()> {
        let mut claims = self
            .claims
            .write()
            .map_err(|e| AppError::concurrency(format!("書き込みロックの取得に失敗: {e}")))?;

        let before = claims.len();
        claims.retain(|c| c.id != id);
        if claims.len() == before {
            return Err(AppError::not_found("経費"));
        }
        Ok(())
    }
}
