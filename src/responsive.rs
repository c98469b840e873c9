//! Width classes for building viewport breakpoint conditions.
//!
//! A [`ScreenSize`] is a set of classes (XS through XXL). [`GridBreakpoints`]
//! maps a viewport width onto exactly one class, and
//! [`Viewport::when`](crate::viewport::Viewport::when) turns a set into a
//! breakpoint condition.

use std::ops::{BitOr, RangeBounds};

use bitflags::bitflags;

bitflags! {
  #[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd)]
  #[must_use]
  pub struct SizeFlags: u16 {
    const XS = 1;
    const SM = 2;
    const MD = 4;
    const LG = 8;
    const XL = 16;
    const XXL = 32;
  }
}

/// Width thresholds in pixels.
///
/// Each threshold is the first width that belongs to that class, so the
/// classes never overlap and never leave a gap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridBreakpoints {
    sm: f64,
    md: f64,
    lg: f64,
    xl: f64,
    xxl: f64,
}

impl Default for GridBreakpoints {
    fn default() -> Self {
        Self {
            sm: 576.0,
            md: 768.0,
            lg: 992.0,
            xl: 1200.0,
            xxl: 1400.0,
        }
    }
}

impl GridBreakpoints {
    /// Custom thresholds. They are sorted so a misordered list still yields
    /// contiguous classes.
    pub fn new(sm: f64, md: f64, lg: f64, xl: f64, xxl: f64) -> Self {
        let mut t = [sm, md, lg, xl, xxl];
        t.sort_by(f64::total_cmp);
        Self {
            sm: t[0],
            md: t[1],
            lg: t[2],
            xl: t[3],
            xxl: t[4],
        }
    }

    /// The single class `width` falls into. NaN is treated as XS.
    pub fn screen_size(&self, width: f64) -> ScreenSize {
        if width >= self.xxl {
            ScreenSize::XXL
        } else if width >= self.xl {
            ScreenSize::XL
        } else if width >= self.lg {
            ScreenSize::LG
        } else if width >= self.md {
            ScreenSize::MD
        } else if width >= self.sm {
            ScreenSize::SM
        } else {
            ScreenSize::XS
        }
    }
}

fn next(size: ScreenSize) -> ScreenSize {
    ScreenSize {
        flags: SizeFlags::from_bits_truncate(size.flags.bits() * 2),
    }
}

fn prev(size: ScreenSize) -> ScreenSize {
    ScreenSize {
        flags: SizeFlags::from_bits_truncate(size.flags.bits() / 2),
    }
}

/// Every class between the bounds of `range`.
///
/// Multi-class bounds are allowed: the lowest class of the start and the
/// highest class of the end are used. An empty range yields an empty set.
pub fn range<R: RangeBounds<ScreenSize>>(range: R) -> ScreenSize {
    let start = match range.start_bound() {
        std::ops::Bound::Included(i) => *i,
        std::ops::Bound::Excluded(e) => next(*e),
        std::ops::Bound::Unbounded => ScreenSize::XS,
    };
    let end = match range.end_bound() {
        std::ops::Bound::Included(s) => *s,
        std::ops::Bound::Excluded(e) => prev(*e),
        std::ops::Bound::Unbounded => ScreenSize::XXL,
    };
    let (Some(lowest_start), Some(highest_end)) =
        (start.flags.iter().next(), end.flags.iter().last())
    else {
        return ScreenSize::NONE;
    };
    if lowest_start.bits() > highest_end.bits() {
        return ScreenSize::NONE;
    }

    // All bits from the lowest start up to and including the highest end.
    let mask = (highest_end.bits() << 1) - lowest_start.bits();
    ScreenSize::new(SizeFlags::from_bits_truncate(mask))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenSize {
    flags: SizeFlags,
}

impl ScreenSize {
    pub const NONE: ScreenSize = ScreenSize::new(SizeFlags::empty());
    pub const XS: ScreenSize = ScreenSize::new(SizeFlags::XS);
    pub const SM: ScreenSize = ScreenSize::new(SizeFlags::SM);
    pub const MD: ScreenSize = ScreenSize::new(SizeFlags::MD);
    pub const LG: ScreenSize = ScreenSize::new(SizeFlags::LG);
    pub const XL: ScreenSize = ScreenSize::new(SizeFlags::XL);
    pub const XXL: ScreenSize = ScreenSize::new(SizeFlags::XXL);
    pub const ALL: ScreenSize = ScreenSize::new(SizeFlags::all());

    const fn new(flags: SizeFlags) -> Self {
        Self { flags }
    }

    pub const fn not(size: ScreenSize) -> Self {
        let flags = SizeFlags::all().difference(size.flags);
        Self { flags }
    }

    /// Whether every class in `other` is also in `self`.
    pub const fn contains(&self, other: ScreenSize) -> bool {
        self.flags.contains(other.flags)
    }

    pub const fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub const fn flags(&self) -> SizeFlags {
        self.flags
    }
}

impl BitOr for ScreenSize {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::new(self.flags | rhs.flags)
    }
}
