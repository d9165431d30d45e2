use crate::dashboard::model::trade::Trade;

/// 已平仓列表的默认页大小
pub const PAGE_SIZE: usize = 10;

/// 一页数据与翻页可用性。
/// has_prev/has_next为false时调用方不渲染对应控件（不是置灰，是不出现）
#[derive(Debug, Clone, PartialEq)]
pub struct PageView<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

/// 无状态切片：取 [page*size, page*size+size)，越界自动夹到集合边界
pub fn page_view<T: Clone>(items: &[T], page: usize, size: usize) -> PageView<T> {
    let start = page.saturating_mul(size).min(items.len());
    let end = start.saturating_add(size).min(items.len());
    PageView {
        items: items[start..end].to_vec(),
        page,
        has_prev: page > 0,
        has_next: (page + 1).saturating_mul(size) < items.len(),
    }
}

/// 已平仓交易的浏览游标。
///
/// 周期刷新替换底层集合时页码保持不变（用户翻到哪就停在哪），
/// 只有显式整体重载才回到首页——这个不对称是有意保留的
#[derive(Debug, Clone)]
pub struct TradeBrowser {
    page: usize,
    page_size: usize,
}

impl TradeBrowser {
    pub fn new(page_size: usize) -> Self {
        TradeBrowser { page: 0, page_size }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current(&self, items: &[Trade]) -> PageView<Trade> {
        page_view(items, self.page, self.page_size)
    }

    /// 存在下一页才前进，否则不动（调用方此时本就不该给出控件）
    pub fn next(&mut self, total: usize) -> bool {
        if (self.page + 1).saturating_mul(self.page_size) < total {
            self.page += 1;
            true
        } else {
            false
        }
    }

    pub fn prev(&mut self) -> bool {
        if self.page > 0 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// 显式整体重载：回到首页。周期刷新不要调这个
    pub fn reload(&mut self) {
        self.page = 0;
    }
}

impl Default for TradeBrowser {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}
