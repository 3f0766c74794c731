use num_traits::{AsPrimitive, NumCast, PrimInt};

/// Trait for types which can act as indices within an array (or an array-like structure), such as
/// the elements of an index buffer.
pub trait ArrayIndex: PrimInt + AsPrimitive<usize> + std::fmt::Debug + 'static {
    /// Convert a 32-bit index into `Self`, if it is representable.
    #[inline]
    fn narrow_from(index: u32) -> Option<Self> {
        <Self as NumCast>::from(index)
    }
}
impl<P> ArrayIndex for P where P: PrimInt + AsPrimitive<usize> + std::fmt::Debug + 'static {}
