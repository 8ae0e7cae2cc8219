use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;

/// 部分编号，只允许 2..=7
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SectionId(u8);

impl SectionId {
    pub const FIRST: u8 = 2;
    pub const LAST: u8 = 7;

    /// 超出范围的编号返回 None
    pub fn new(number: u32) -> Option<Self> {
        u8::try_from(number)
            .ok()
            .filter(|n| Self::domain().contains(n))
            .map(SectionId)
    }

    pub fn number(self) -> u8 {
        self.0
    }

    /// 部分编号的取值范围
    pub fn domain() -> RangeInclusive<u8> {
        Self::FIRST..=Self::LAST
    }

    /// 范围内的全部部分
    pub fn all() -> impl Iterator<Item = SectionId> {
        Self::domain().map(SectionId)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 每个部分的题目列（已按题号排序）
pub type SectionColumns = BTreeMap<SectionId, Vec<String>>;
