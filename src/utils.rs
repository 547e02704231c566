//! Common tools

/// The state of a bit,
/// It's either [`BitState::Clear`] to represent a 0
/// or [`BitState::Set`] to represent a 1
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BitState {
    /// Bit is 0
    Clear,
    /// Bit is 1
    Set,
}

/// Simple bit ops on a register image
///
/// Positions above 7 are masked into range, a register image never grows past one byte.
pub trait BitOps {
    #[allow(missing_docs)]
    fn set_bit(&mut self, pos: u8) -> Self;
    #[allow(missing_docs)]
    fn clear_bit(&mut self, pos: u8) -> Self;
    #[allow(missing_docs)]
    fn check_bit(&self, pos: u8) -> BitState;
    /// Set the bit when `state` is [`BitState::Set`], clear it otherwise
    fn write_bit(&mut self, pos: u8, state: BitState) -> Self;
    /// Set every bit of `mask`
    fn set_mask(&mut self, mask: Self) -> Self;
    /// Clear every bit of `mask`
    fn clear_mask(&mut self, mask: Self) -> Self;
}

impl BitOps for u8 {
    fn set_bit(&mut self, pos: u8) -> Self {
        *self |= 1u8 << (pos & 0b111);
        *self
    }

    fn clear_bit(&mut self, pos: u8) -> Self {
        *self &= !(1u8 << (pos & 0b111));
        *self
    }

    fn check_bit(&self, pos: u8) -> BitState {
        match (*self >> (pos & 0b111)) & 1 == 1 {
            true => BitState::Set,
            false => BitState::Clear,
        }
    }

    fn write_bit(&mut self, pos: u8, state: BitState) -> Self {
        match state {
            BitState::Set => self.set_bit(pos),
            BitState::Clear => self.clear_bit(pos),
        }
    }

    fn set_mask(&mut self, mask: Self) -> Self {
        *self |= mask;
        *self
    }

    fn clear_mask(&mut self, mask: Self) -> Self {
        *self &= !mask;
        *self
    }
}
