//! 二分查找结果
//!
//! 查找失败时用 `-i - 1` 编码插入位置，`SearchResult` 是它的显式形式。

/// 查找结果：命中下标，或保持有序的插入下标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchResult {
    Found(usize),
    InsertAt(usize),
}

impl SearchResult {
    /// 命中为 `i`，未命中为 `-i - 1`
    #[inline]
    pub fn encode(self) -> isize {
        match self {
            SearchResult::Found(i) => i as isize,
            SearchResult::InsertAt(i) => -(i as isize) - 1,
        }
    }

    #[inline]
    pub fn decode(raw: isize) -> Self {
        if raw >= 0 {
            SearchResult::Found(raw as usize)
        } else {
            SearchResult::InsertAt((-raw - 1) as usize)
        }
    }

    #[inline]
    pub fn found(self) -> Option<usize> {
        match self {
            SearchResult::Found(i) => Some(i),
            SearchResult::InsertAt(_) => None,
        }
    }

    #[inline]
    pub fn insertion_point(self) -> Option<usize> {
        match self {
            SearchResult::Found(_) => None,
            SearchResult::InsertAt(i) => Some(i),
        }
    }
}

/// 两级查找结果：帧组，然后帧组内的关键帧
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeepSearch {
    pub frameset: SearchResult,
    /// 未找到帧组时为 `None`；`Some(InsertAt(_))` 表示补间帧
    pub keyframe: Option<SearchResult>,
}

impl DeepSearch {
    /// 精确命中的关键帧下标 (帧组, 关键帧)
    pub fn keyframe_indices(&self) -> Option<(usize, usize)> {
        let set = self.frameset.found()?;
        let key = self.keyframe?.found()?;
        Some((set, key))
    }
}

/// 在有序区间序列上查找包含 `position` 的区间
///
/// 区间之间可以有空隙；`range` 返回第 i 个区间的闭区间端点。
pub(crate) fn search_ranges<F>(len: usize, position: i32, range: F) -> SearchResult
where
    F: Fn(usize) -> (i32, i32),
{
    let mut bottom = 0usize;
    let mut top = len;

    while bottom < top {
        let middle = bottom + (top - bottom) / 2;
        let (low, high) = range(middle);

        if low > position {
            top = middle;
        } else if high < position {
            bottom = middle + 1;
        } else {
            return SearchResult::Found(middle);
        }
    }

    SearchResult::InsertAt(bottom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode() {
        assert_eq!(SearchResult::Found(3).encode(), 3);
        assert_eq!(SearchResult::InsertAt(0).encode(), -1);
        assert_eq!(SearchResult::InsertAt(4).encode(), -5);

        for raw in -6..6 {
            assert_eq!(SearchResult::decode(raw).encode(), raw);
        }
    }

    #[test]
    fn test_search_ranges_gapped() {
        let ranges = [(0, 4), (10, 12), (20, 20)];
        let lookup = |i: usize| ranges[i];

        assert_eq!(search_ranges(3, 0, lookup), SearchResult::Found(0));
        assert_eq!(search_ranges(3, 4, lookup), SearchResult::Found(0));
        assert_eq!(search_ranges(3, 5, lookup), SearchResult::InsertAt(1));
        assert_eq!(search_ranges(3, 11, lookup), SearchResult::Found(1));
        assert_eq!(search_ranges(3, 15, lookup), SearchResult::InsertAt(2));
        assert_eq!(search_ranges(3, 20, lookup), SearchResult::Found(2));
        assert_eq!(search_ranges(3, 99, lookup), SearchResult::InsertAt(3));
    }

    #[test]
    fn test_search_ranges_empty() {
        assert_eq!(search_ranges(0, 7, |_| (0, 0)), SearchResult::InsertAt(0));
    }

    #[test]
    fn test_deep_indices() {
        let deep = DeepSearch {
            frameset: SearchResult::Found(1),
            keyframe: Some(SearchResult::InsertAt(2)),
        };
        assert_eq!(deep.keyframe_indices(), None);

        let deep = DeepSearch {
            frameset: SearchResult::Found(1),
            keyframe: Some(SearchResult::Found(0)),
        };
        assert_eq!(deep.keyframe_indices(), Some((1, 0)));
    }
}
