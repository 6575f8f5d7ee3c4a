//! Interaction states and their priority.

use css_selectors::PseudoClass;

/// One interaction state a widget can be in.
///
/// Variants are declared in bit order; later variants take priority when
/// several are set at once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum StateFlag {
    #[default]
    Normal,
    Focus,
    Selected,
    Hover,
    Pressed,
    SelectedHover,
    SelectedPressed,
    Disabled,
}

impl StateFlag {
    /// Every flag, highest priority first.
    pub const ALL: [Self; 8] = [
        Self::Disabled,
        Self::SelectedPressed,
        Self::Pressed,
        Self::SelectedHover,
        Self::Hover,
        Self::Selected,
        Self::Focus,
        Self::Normal,
    ];

    #[inline]
    pub const fn bit(self) -> u32 {
        1 << self as u32
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Focus => "focus",
            Self::Selected => "selected",
            Self::Hover => "hover",
            Self::Pressed => "pressed",
            Self::SelectedHover => "selectedhover",
            Self::SelectedPressed => "selectedpressed",
            Self::Disabled => "disabled",
        }
    }
}

/// The raw state bitmask a widget reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct StateFlags(u32);

impl StateFlags {
    pub const NONE: Self = Self(0);

    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn contains(self, flag: StateFlag) -> bool {
        self.0 & flag.bit() != 0
    }

    #[inline]
    pub const fn with(self, flag: StateFlag) -> Self {
        Self(self.0 | flag.bit())
    }

    #[inline]
    pub const fn without(self, flag: StateFlag) -> Self {
        Self(self.0 & !flag.bit())
    }

    pub const fn insert(&mut self, flag: StateFlag) {
        self.0 |= flag.bit();
    }

    pub const fn remove(&mut self, flag: StateFlag) {
        self.0 &= !flag.bit();
    }

    /// Highest-priority flag that is set and accepted by `exists`, or `Normal`.
    pub fn dominant(self, mut exists: impl FnMut(StateFlag) -> bool) -> StateFlag {
        StateFlag::ALL
            .into_iter()
            .find(|flag| self.contains(*flag) && exists(*flag))
            .unwrap_or(StateFlag::Normal)
    }

    /// Whether an interaction pseudo-class holds for this bitmask.
    ///
    /// Combined states count towards both of their halves, so a widget that
    /// is `SelectedHover` matches `:hover` and `:checked`. Structural and
    /// unknown pseudo-classes never match here.
    pub fn matches_pseudo_class(self, pseudo: &PseudoClass) -> bool {
        match pseudo {
            PseudoClass::Hover => {
                self.contains(StateFlag::Hover) || self.contains(StateFlag::SelectedHover)
            }
            PseudoClass::Focus => self.contains(StateFlag::Focus),
            PseudoClass::Active => {
                self.contains(StateFlag::Pressed) || self.contains(StateFlag::SelectedPressed)
            }
            PseudoClass::Checked => {
                self.contains(StateFlag::Selected)
                    || self.contains(StateFlag::SelectedHover)
                    || self.contains(StateFlag::SelectedPressed)
            }
            PseudoClass::Disabled => self.contains(StateFlag::Disabled),
            PseudoClass::Enabled => !self.contains(StateFlag::Disabled),
            PseudoClass::FirstChild
            | PseudoClass::LastChild
            | PseudoClass::OnlyChild
            | PseudoClass::Custom(_) => false,
        }
    }
}

impl FromIterator<StateFlag> for StateFlags {
    fn from_iter<I: IntoIterator<Item = StateFlag>>(iter: I) -> Self {
        iter.into_iter().fold(Self::NONE, Self::with)
    }
}
