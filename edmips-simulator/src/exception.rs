use std::fmt;
use std::fmt::{Debug, Formatter};
use std::ops::{BitOr, BitOrAssign};

/// The set of exception conditions raised while executing one instruction.
/// Exceptions are reported, never thrown; the caller decides policy.
#[derive(Copy, Clone, Default, PartialEq, Eq)]
pub struct Exceptions(u32);

impl Exceptions {
    pub const NONE: Self = Self(0);
    pub const INVALID_INST: Self = Self(1);
    pub const INT_OVERFLOW: Self = Self(2);
    pub const PC_ALIGN: Self = Self(4);
    pub const DATA_ALIGN: Self = Self(8);
    /// Part of the taxonomy for compatibility; this simulator has no delay
    /// slots, so it is never raised.
    pub const BRANCH_IN_DELAY_SLOT: Self = Self(16);
    pub const BREAK: Self = Self(32);
    /// Part of the taxonomy for compatibility; never raised.
    pub const PC_LIMIT: Self = Self(64);
    pub const SYSCALL: Self = Self(128);

    /// The raw OR'd bit pattern
    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_clear(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Exceptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Exceptions {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl Debug for Exceptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_clear() {
            return f.write_str("NONE");
        }

        let names = [
            (Self::INVALID_INST, "INVALID_INST"),
            (Self::INT_OVERFLOW, "INT_OVERFLOW"),
            (Self::PC_ALIGN, "PC_ALIGN"),
            (Self::DATA_ALIGN, "DATA_ALIGN"),
            (Self::BRANCH_IN_DELAY_SLOT, "BRANCH_IN_DELAY_SLOT"),
            (Self::BREAK, "BREAK"),
            (Self::PC_LIMIT, "PC_LIMIT"),
            (Self::SYSCALL, "SYSCALL"),
        ];

        let mut first = true;
        for (bit, name) in names {
            if self.contains(bit) {
                if !first {
                    f.write_str(" | ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_values_are_stable() {
        assert_eq!(Exceptions::NONE.bits(), 0);
        assert_eq!(Exceptions::INVALID_INST.bits(), 1);
        assert_eq!(Exceptions::INT_OVERFLOW.bits(), 2);
        assert_eq!(Exceptions::PC_ALIGN.bits(), 4);
        assert_eq!(Exceptions::DATA_ALIGN.bits(), 8);
        assert_eq!(Exceptions::BRANCH_IN_DELAY_SLOT.bits(), 16);
        assert_eq!(Exceptions::BREAK.bits(), 32);
        assert_eq!(Exceptions::PC_LIMIT.bits(), 64);
        assert_eq!(Exceptions::SYSCALL.bits(), 128);
    }

    #[test]
    fn masks_combine() {
        let mut mask = Exceptions::NONE;
        mask |= Exceptions::INT_OVERFLOW;
        mask |= Exceptions::SYSCALL;
        assert_eq!(mask.bits(), 130);
        assert!(mask.contains(Exceptions::INT_OVERFLOW));
        assert!(!mask.contains(Exceptions::BREAK));
        assert_eq!(format!("{:?}", mask), "INT_OVERFLOW | SYSCALL");
    }
}
