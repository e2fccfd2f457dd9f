/// 経費機能モジュール
///
/// このモジュールは経費申請に関連するすべての機能を提供します：
/// - 申請フォームの状態管理とバリデーション（form）
/// - 一覧の複合フィルタ・安定ソート射影（list）
/// - 永続化サービス境界とインメモリ実装（repository）
// サブモジュールの宣言
pub mod form;
pub mod list;
pub mod repository;

// 公開インターフェース

// フォームコントローラ
pub use form::{ExpenseDraft, ExpenseFormController, FormField, FormState, ValidationErrors};

// 一覧エンジン
pub use list::{
    claims_by_status, project, search_claims, FilterCriteria, SortDirection, SortKey, SortSpec,
};

// リポジトリ（永続化サービス境界）
pub use repository::{
    CreateExpenseInput, ExpenseRepository, InMemoryExpenseRepository, UpdateExpensePatch,
};
