// 経費一覧エンジン
//
// 申請コレクションに複合フィルタと安定ソートを適用した表示用の
// 射影を導出します。入力コレクションは一切変更しません。

use crate::models::expense::{ExpenseClaim, ExpenseStatus};
use chrono::NaiveDate;
use std::cmp::Ordering;

/// 一覧のフィルタ条件
///
/// 各条件は独立した述語で、すべて満たすもの（AND）が残ります。
/// 空文字・Noneの境界は開区間として扱われ、その条件はスキップ
/// されます。ステータス集合が空の場合はすべてに一致します。
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    /// 店舗名または購入品目に対する部分一致検索（大文字小文字を区別しない）
    pub search: String,
    /// 期間の開始日（YYYY-MM-DD、両端を含む）
    pub date_from: Option<String>,
    /// 期間の終了日（YYYY-MM-DD、両端を含む）
    pub date_to: Option<String>,
    /// 金額の下限（両端を含む）
    pub amount_min: Option<u64>,
    /// 金額の上限（両端を含む）
    pub amount_max: Option<u64>,
    /// 表示するステータスの集合（空ならすべて）
    pub statuses: Vec<ExpenseStatus>,
}

/// ソート対象の属性
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Date,
    StoreName,
    Amount,
    Status,
}

/// ソートの方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// アクティブなソート指定（単一キー）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortSpec {
    /// ヘッダークリックによるソート指定の切り替え
    ///
    /// 同じキーを再選択すると方向が反転し、別のキーを選択すると
    /// 昇順にリセットされます。
    pub fn toggle(current: Option<SortSpec>, key: SortKey) -> SortSpec {
        match current {
            Some(spec) if spec.key == key && spec.direction == SortDirection::Ascending => {
                SortSpec {
                    key,
                    direction: SortDirection::Descending,
                }
            }
            _ => SortSpec {
                key,
                direction: SortDirection::Ascending,
            },
        }
    }
}

/// フィルタとソートを適用した表示用の射影を導出する
///
/// 純粋関数：入力を変更せず、同じ入力には同じ出力を返します。
/// ソートキー未選択の場合はフィルタ後の相対順序をそのまま保ちます。
/// エラー状態はなく、結果が空なら空のシーケンスを返します。
pub fn project(
    claims: &[ExpenseClaim],
    criteria: &FilterCriteria,
    sort: Option<SortSpec>,
) -> Vec<ExpenseClaim> {
    let mut result: Vec<ExpenseClaim> = claims
        .iter()
        .filter(|claim| matches(claim, criteria))
        .cloned()
        .collect();

    if let Some(spec) = sort {
        // Vec::sort_by は安定ソート
        result.sort_by(|a, b| {
            let ordering = compare_by_key(a, b, spec.key);
            match spec.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }

    result
}

/// 店舗名・コメントに対する簡易検索（サービス互換の補助射影）
pub fn search_claims(claims: &[ExpenseClaim], query: &str) -> Vec<ExpenseClaim> {
    let query = query.to_lowercase();
    claims
        .iter()
        .filter(|c| {
            c.store_name.to_lowercase().contains(&query)
                || c.comments.to_lowercase().contains(&query)
        })
        .cloned()
        .collect()
}

/// ステータス別の補助射影
pub fn claims_by_status(claims: &[ExpenseClaim], status: ExpenseStatus) -> Vec<ExpenseClaim> {
    claims
        .iter()
        .filter(|c| c.status == status)
        .cloned()
        .collect()
}

/// すべての述語を満たすかどうか（AND結合）
fn matches(claim: &ExpenseClaim, criteria: &FilterCriteria) -> bool {
    let query = criteria.search.to_lowercase();
    let matches_search = claim.store_name.to_lowercase().contains(&query)
        || claim.items.to_lowercase().contains(&query);

    let matches_date = in_date_range(
        &claim.date,
        criteria.date_from.as_deref(),
        criteria.date_to.as_deref(),
    );

    let matches_amount = criteria.amount_min.map_or(true, |min| claim.amount >= min)
        && criteria.amount_max.map_or(true, |max| claim.amount <= max);

    let matches_status =
        criteria.statuses.is_empty() || criteria.statuses.contains(&claim.status);

    matches_search && matches_date && matches_amount && matches_status
}

/// 日付範囲の判定（両端を含む）
///
/// 空・未指定・解釈不能な境界は開区間として扱います。境界が
/// 有効なときに申請側の日付が解釈できない場合は一致しません。
fn in_date_range(date: &str, from: Option<&str>, to: Option<&str>) -> bool {
    let from = from.filter(|s| !s.is_empty()).and_then(parse_date);
    let to = to.filter(|s| !s.is_empty()).and_then(parse_date);

    if from.is_none() && to.is_none() {
        return true;
    }

    let Some(date) = parse_date(date) else {
        return false;
    };

    from.map_or(true, |f| date >= f) && to.map_or(true, |t| date <= t)
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// 指定キーでの比較（文字列はロケール相当の大小無視比較、数値は数値比較）
fn compare_by_key(a: &ExpenseClaim, b: &ExpenseClaim, key: SortKey) -> Ordering {
    match key {
        SortKey::Date => compare_text(&a.date, &b.date),
        SortKey::StoreName => compare_text(&a.store_name, &b.store_name),
        SortKey::Amount => a.amount.cmp(&b.amount),
        SortKey::Status => compare_text(a.status.as_str(), b.status.as_str()),
    }
}

/// 大文字小文字を無視したUnicode順の比較（同値は原文で安定化）
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::expense::ExpenseCategory;
    use quickcheck_macros::quickcheck;

    fn claim(id: &str, amount: u64, date: &str, store: &str, items: &str) -> ExpenseClaim {
        ExpenseClaim {
            id: id.to_string(),
            user_id: "u-1".to_string(),
            amount,
            date: date.to_string(),
            category: ExpenseCategory::Other,
            store_name: store.to_string(),
            items: items.to_string(),
            comments: String::new(),
            image_url: String::new(),
            status: ExpenseStatus::Pending,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn with_status(mut c: ExpenseClaim, status: ExpenseStatus) -> ExpenseClaim {
        c.status = status;
        c
    }

    fn amounts(claims: &[ExpenseClaim]) -> Vec<u64> {
        claims.iter().map(|c| c.amount).collect()
    }

    #[test]
    fn test_amount_range_filter() {
        let claims = vec![
            claim("a", 100, "2025-02-01", "A", "x"),
            claim("b", 500, "2025-02-02", "B", "y"),
            claim("c", 1000, "2025-02-03", "C", "z"),
        ];
        let criteria = FilterCriteria {
            amount_min: Some(200),
            amount_max: Some(800),
            ..FilterCriteria::default()
        };

        let result = project(&claims, &criteria, None);
        assert_eq!(amounts(&result), vec![500]);
    }

    #[test]
    fn test_amount_range_bounds_inclusive() {
        let claims = vec![
            claim("a", 200, "2025-02-01", "A", "x"),
            claim("b", 800, "2025-02-02", "B", "y"),
        ];
        let criteria = FilterCriteria {
            amount_min: Some(200),
            amount_max: Some(800),
            ..FilterCriteria::default()
        };
        assert_eq!(project(&claims, &criteria, None).len(), 2);
    }

    #[test]
    fn test_text_search_store_or_items_case_insensitive() {
        let claims = vec![
            claim("a", 100, "2025-02-01", "株式会社文具堂", "ノート"),
            claim("b", 200, "2025-02-02", "Cafe Aoyama", "コーヒー"),
            claim("c", 300, "2025-02-03", "書店", "cafe本"),
        ];
        let criteria = FilterCriteria {
            search: "CAFE".to_string(),
            ..FilterCriteria::default()
        };

        // 店舗名または品目のどちらかに一致すれば残る
        let result = project(&claims, &criteria, None);
        let ids: Vec<&str> = result.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn test_date_range_inclusive_and_open_ended() {
        let claims = vec![
            claim("a", 100, "2025-01-31", "A", "x"),
            claim("b", 200, "2025-02-01", "B", "y"),
            claim("c", 300, "2025-02-15", "C", "z"),
        ];

        // 開始日のみ（終端は開区間）
        let criteria = FilterCriteria {
            date_from: Some("2025-02-01".to_string()),
            ..FilterCriteria::default()
        };
        assert_eq!(project(&claims, &criteria, None).len(), 2);

        // 両端を含む
        let criteria = FilterCriteria {
            date_from: Some("2025-02-01".to_string()),
            date_to: Some("2025-02-15".to_string()),
            ..FilterCriteria::default()
        };
        let result = project(&claims, &criteria, None);
        let ids: Vec<&str> = result.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);

        // 空文字の境界はスキップされる
        let criteria = FilterCriteria {
            date_from: Some(String::new()),
            date_to: Some(String::new()),
            ..FilterCriteria::default()
        };
        assert_eq!(project(&claims, &criteria, None).len(), 3);
    }

    #[test]
    fn test_status_set_empty_matches_all() {
        let claims = vec![
            with_status(claim("a", 100, "2025-02-01", "A", "x"), ExpenseStatus::Pending),
            with_status(claim("b", 200, "2025-02-02", "B", "y"), ExpenseStatus::Approved),
            with_status(claim("c", 300, "2025-02-03", "C", "z"), ExpenseStatus::Rejected),
        ];

        let criteria = FilterCriteria::default();
        assert_eq!(project(&claims, &criteria, None).len(), 3);

        let criteria = FilterCriteria {
            statuses: vec![ExpenseStatus::Approved, ExpenseStatus::Rejected],
            ..FilterCriteria::default()
        };
        let result = project(&claims, &criteria, None);
        let ids: Vec<&str> = result.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn test_empty_criteria_no_sort_preserves_original_order() {
        let claims = vec![
            claim("c", 300, "2025-02-03", "C", "z"),
            claim("a", 100, "2025-02-01", "A", "x"),
            claim("b", 200, "2025-02-02", "B", "y"),
        ];

        let result = project(&claims, &FilterCriteria::default(), None);
        let ids: Vec<&str> = result.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_sort_toggle_reverses_order() {
        let claims = vec![
            claim("a", 500, "2025-02-01", "A", "x"),
            claim("b", 100, "2025-02-02", "B", "y"),
            claim("c", 1000, "2025-02-03", "C", "z"),
        ];
        let criteria = FilterCriteria::default();

        let asc = SortSpec::toggle(None, SortKey::Amount);
        let ascending = project(&claims, &criteria, Some(asc));
        assert_eq!(amounts(&ascending), vec![100, 500, 1000]);

        // 同じキーの再選択で方向が反転し、完全な逆順になる
        let desc = SortSpec::toggle(Some(asc), SortKey::Amount);
        assert_eq!(desc.direction, SortDirection::Descending);
        let descending = project(&claims, &criteria, Some(desc));
        let mut reversed = ascending.clone();
        reversed.reverse();
        assert_eq!(amounts(&descending), amounts(&reversed));
    }

    #[test]
    fn test_selecting_new_key_resets_to_ascending() {
        let descending = SortSpec {
            key: SortKey::Amount,
            direction: SortDirection::Descending,
        };

        // 別キーの選択は前の方向にかかわらず昇順
        let spec = SortSpec::toggle(Some(descending), SortKey::Date);
        assert_eq!(spec.key, SortKey::Date);
        assert_eq!(spec.direction, SortDirection::Ascending);

        // 降順からの同一キー再選択は昇順に戻る
        let spec = SortSpec::toggle(Some(descending), SortKey::Amount);
        assert_eq!(spec.direction, SortDirection::Ascending);
    }

    #[test]
    fn test_sort_by_store_name_ignores_case() {
        let claims = vec![
            claim("a", 100, "2025-02-01", "beta", "x"),
            claim("b", 200, "2025-02-02", "Alpha", "y"),
        ];
        let sorted = project(
            &claims,
            &FilterCriteria::default(),
            Some(SortSpec {
                key: SortKey::StoreName,
                direction: SortDirection::Ascending,
            }),
        );
        let stores: Vec<&str> = sorted.iter().map(|c| c.store_name.as_str()).collect();
        assert_eq!(stores, vec!["Alpha", "beta"]);
    }

    #[test]
    fn test_sort_is_stable_on_equal_keys() {
        let claims = vec![
            claim("first", 100, "2025-02-01", "同じ店", "x"),
            claim("second", 100, "2025-02-01", "同じ店", "y"),
            claim("third", 100, "2025-02-01", "同じ店", "z"),
        ];
        let sorted = project(
            &claims,
            &FilterCriteria::default(),
            Some(SortSpec {
                key: SortKey::Amount,
                direction: SortDirection::Ascending,
            }),
        );
        let ids: Vec<&str> = sorted.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_projection_never_mutates_source() {
        let claims = vec![
            claim("b", 200, "2025-02-02", "B", "y"),
            claim("a", 100, "2025-02-01", "A", "x"),
        ];
        let snapshot = amounts(&claims);

        let _ = project(
            &claims,
            &FilterCriteria::default(),
            Some(SortSpec {
                key: SortKey::Amount,
                direction: SortDirection::Ascending,
            }),
        );

        assert_eq!(amounts(&claims), snapshot);
    }

    #[test]
    fn test_search_claims_and_by_status_helpers() {
        let mut a = claim("a", 100, "2025-02-01", "文具堂", "x");
        a.comments = "オフィス用品".to_string();
        let b = with_status(claim("b", 200, "2025-02-02", "書店", "y"), ExpenseStatus::Approved);
        let claims = vec![a, b];

        assert_eq!(search_claims(&claims, "オフィス").len(), 1);
        assert_eq!(claims_by_status(&claims, ExpenseStatus::Approved).len(), 1);
    }

    #[quickcheck]
    fn prop_filter_never_grows_collection(amounts_in: Vec<u32>, min: u32, max: u32) -> bool {
        let claims: Vec<ExpenseClaim> = amounts_in
            .iter()
            .enumerate()
            .map(|(i, amount)| claim(&format!("c{i}"), u64::from(*amount), "2025-02-01", "店", "品"))
            .collect();
        let criteria = FilterCriteria {
            amount_min: Some(u64::from(min)),
            amount_max: Some(u64::from(max)),
            ..FilterCriteria::default()
        };

        let result = project(&claims, &criteria, None);
        result.len() <= claims.len()
            && result
                .iter()
                .all(|c| c.amount >= u64::from(min) && c.amount <= u64::from(max))
    }

    #[quickcheck]
    fn prop_sort_ascending_is_non_decreasing(amounts_in: Vec<u32>) -> bool {
        let claims: Vec<ExpenseClaim> = amounts_in
            .iter()
            .enumerate()
            .map(|(i, amount)| claim(&format!("c{i}"), u64::from(*amount), "2025-02-01", "店", "品"))
            .collect();

        let sorted = project(
            &claims,
            &FilterCriteria::default(),
            Some(SortSpec {
                key: SortKey::Amount,
                direction: SortDirection::Ascending,
            }),
        );
        sorted.windows(2).all(|w| w[0].amount <= w[1].amount)
    }

    #[quickcheck]
    fn prop_toggle_twice_returns_to_ascending(start_descending: bool) -> bool {
        let start = SortSpec {
            key: SortKey::Date,
            direction: if start_descending {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            },
        };
        let once = SortSpec::toggle(Some(start), SortKey::Date);
        let twice = SortSpec::toggle(Some(once), SortKey::Date);
        // 同一キーの連続トグルで昇順⇄降順を往復する
        once.direction != start.direction && twice.direction == start.direction
    }
}
