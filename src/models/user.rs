use serde::{Deserialize, Serialize};

/// ユーザーの権限ロール
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// 一般ユーザー（申請のみ）
    User,
    /// 承認者（申請の承認・否認が可能）
    Approver,
    /// 管理者（ユーザー管理を含むすべての操作が可能）
    Admin,
}

impl UserRole {
    /// 日本語の表示名を取得
    pub fn label_ja(&self) -> &str {
        match self {
            UserRole::User => "ユーザー",
            UserRole::Approver => "承認者",
            UserRole::Admin => "管理者",
        }
    }
}

/// ユーザーデータモデル
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub role: UserRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        // ロールが小文字でシリアライズされることを確認
        let json = serde_json::to_string(&UserRole::Approver).unwrap();
        assert_eq!(json, "\"approver\"");

        let role: UserRole = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, UserRole::Admin);
    }

    #[test]
    fn test_role_labels() {
        assert_eq!(UserRole::User.label_ja(), "ユーザー");
        assert_eq!(UserRole::Approver.label_ja(), "承認者");
        assert_eq!(UserRole::Admin.label_ja(), "管理者");
    }
}
