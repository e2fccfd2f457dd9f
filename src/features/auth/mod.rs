// 認証・権限機能モジュール
//
// ロールによる分岐を1か所に集約します。ルーティング側は
// can_access だけを使い、ロールのリテラルをコアの他の場所に
// 散らばらせません。

use crate::models::user::{User, UserRole};
use once_cell::sync::Lazy;

/// アプリケーション内のルート
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// ダッシュボード
    Dashboard,
    /// 経費一覧
    ExpenseList,
    /// 新規申請
    NewExpense,
    /// 承認待ち一覧
    Approvals,
    /// 管理者設定
    Admin,
}

/// ロールがルートにアクセスできるかを判定する
///
/// ルーティングシェルが一律に使う唯一の権限チェック関数です。
pub fn can_access(role: UserRole, route: Route) -> bool {
    match route {
        Route::Dashboard | Route::ExpenseList | Route::NewExpense => true,
        Route::Approvals => matches!(role, UserRole::Approver | UserRole::Admin),
        Route::Admin => matches!(role, UserRole::Admin),
    }
}

/// セッション・認証プロバイダ
///
/// 認証の正しさはコアの責務外で、この境界の外側で担保されます。
pub trait SessionProvider: Send + Sync {
    /// 現在のログインユーザー（未ログインならNone）
    fn current_user(&self) -> Option<User>;
}

/// テスト・開発用のユーザー一覧
static MOCK_USERS: Lazy<Vec<User>> = Lazy::new(|| {
    vec![
        User {
            id: "u-1".to_string(),
            email: "yamada@example.com".to_string(),
            role: UserRole::User,
        },
        User {
            id: "u-2".to_string(),
            email: "suzuki@example.com".to_string(),
            role: UserRole::Approver,
        },
        User {
            id: "u-3".to_string(),
            email: "tanaka@example.com".to_string(),
            role: UserRole::Admin,
        },
    ]
});

/// モックのセッションプロバイダ（開発・テスト用）
#[derive(Default)]
pub struct MockSessionProvider {
    user: Option<User>,
}

impl MockSessionProvider {
    /// 未ログイン状態で構築する
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定ユーザーでログイン済みの状態で構築する
    pub fn signed_in(user: User) -> Self {
        Self { user: Some(user) }
    }

    /// メールアドレスからモックユーザーでログインする
    pub fn sign_in_as(email: &str) -> Option<Self> {
        MOCK_USERS
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .map(Self::signed_in)
    }
}

impl SessionProvider for MockSessionProvider {
    fn current_user(&self) -> Option<User> {
        self.user.clone()
    }
}
