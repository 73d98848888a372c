//! # ページネーション
//!
//! 記事一覧のページ計算を行う。CMS がメタ情報を返した場合はそれを採用し、
//! 返さなかった場合やメモリ上の配列を切り出す場合はここで計算する。
//!
//! ## 不変条件
//!
//! - `page_count` は常に 1 以上（0 件でも 1 ページとして扱う）
//! - 表示ページは `[1, page_count]` にクランプされる

use serde::{Deserialize, Serialize};

/// 記事 Explorer の 1 ページあたりの件数
pub const DEFAULT_PAGE_SIZE: u32 = 6;

/// ページネーション情報
///
/// CMS の `meta.pagination` と同じ形で JSON に出力する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page:       u32,
    pub page_size:  u32,
    pub page_count: u32,
    pub total:      u32,
}

impl Pagination {
    /// 総件数から計算する
    ///
    /// `page` は計算後の総ページ数でクランプされる。
    pub fn from_total(page: u32, page_size: u32, total: u32) -> Self {
        let page_size = page_size.max(1);
        let page_count = page_count(total, page_size);
        Self {
            page: clamp_page(page, page_count),
            page_size,
            page_count,
            total,
        }
    }

    /// 前のページが存在するか
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// 次のページが存在するか
    pub fn has_next(&self) -> bool {
        self.page < self.page_count
    }
}

/// 総ページ数を計算する（最低 1）
pub fn page_count(total: u32, page_size: u32) -> u32 {
    let page_size = page_size.max(1);
    total.div_ceil(page_size).max(1)
}

/// ページ番号を `[1, page_count]` に収める
pub fn clamp_page(page: u32, page_count: u32) -> u32 {
    page.max(1).min(page_count.max(1))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0, 6, 1)]
    #[case(1, 6, 1)]
    #[case(6, 6, 1)]
    #[case(7, 6, 2)]
    #[case(13, 6, 3)]
    #[case(5, 0, 5)]
    fn test_総ページ数は切り上げで最低1(
        #[case] total: u32,
        #[case] page_size: u32,
        #[case] expected: u32,
    ) {
        assert_eq!(page_count(total, page_size), expected);
    }

    #[rstest]
    #[case(0, 3, 1)]
    #[case(2, 3, 2)]
    #[case(9, 3, 3)]
    #[case(4, 0, 1)]
    fn test_ページ番号は範囲内に収まる(
        #[case] page: u32,
        #[case] count: u32,
        #[case] expected: u32,
    ) {
        assert_eq!(clamp_page(page, count), expected);
    }

    #[test]
    fn test_from_total_は範囲外のページをクランプする() {
        let pagination = Pagination::from_total(10, 6, 13);

        assert_eq!(
            pagination,
            Pagination {
                page:       3,
                page_size:  6,
                page_count: 3,
                total:      13,
            }
        );
        assert!(pagination.has_previous());
        assert!(!pagination.has_next());
    }

    #[test]
    fn test_0件は1ページで前後とも無効() {
        let pagination = Pagination::from_total(1, 6, 0);

        assert_eq!(pagination.page_count, 1);
        assert!(!pagination.has_previous());
        assert!(!pagination.has_next());
    }

    #[test]
    fn test_camel_caseでシリアライズされる() {
        let json = serde_json::to_value(Pagination::from_total(2, 6, 20)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"page": 2, "pageSize": 6, "pageCount": 4, "total": 20})
        );
    }
}
