//! # おすすめ記事
//!
//! トップページに表示する記事を、最近の記事の中からランダムに選ぶ。

use rand::{Rng, seq::SliceRandom};

/// おすすめ記事の候補として取得する最近の記事数
pub const FEATURED_POOL_SIZE: u32 = 40;

/// おすすめ記事として表示する件数
pub const FEATURED_COUNT: usize = 5;

/// `items` から最大 `count` 件をランダムに選ぶ
///
/// 件数が `count` 以下なら元の順序のまま全件返す。
/// それ以上なら全体をシャッフルして先頭 `count` 件を返すため、重複は生じない。
pub fn pick_random_items<T, R>(mut items: Vec<T>, count: usize, rng: &mut R) -> Vec<T>
where
    R: Rng + ?Sized,
{
    if items.len() <= count {
        return items;
    }

    items.shuffle(rng);
    items.truncate(count);
    items
}
