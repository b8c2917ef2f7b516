/// A page of a listing, `page` counted from 1
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    /// A request is usable only if both page and size are at least 1
    pub fn is_valid(self) -> bool {
        1 <= self.page && 1 <= self.size
    }

    /// Number of items preceding this page
    pub fn skip(self) -> usize {
        let skip = u64::from(self.page.saturating_sub(1)) * u64::from(self.size);
        usize::try_from(skip).unwrap_or(usize::MAX)
    }

    pub fn limit(self) -> usize {
        usize::try_from(self.size).unwrap_or(usize::MAX)
    }
}

/// Number of pages needed to show `total` items, `size` items per page
pub fn total_pages(total: u64, size: u32) -> u64 {
    if size == 0 {
        return 0;
    }
    total.div_ceil(u64::from(size))
}

#[cfg_attr(feature = "serde", derive(::serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total: u64,
    pub total_pages: u64,
}
