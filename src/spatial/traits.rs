/// Trait for floating-point types, so that volumes can be generic over {f32, f64}.
pub trait Float:
    num_traits::Float
    + nalgebra::Scalar
    + nalgebra::SimdPartialOrd
    + std::ops::AddAssign
    + std::ops::SubAssign
    + Copy
    + Send
    + Sync
{
    const TWO: Self;
}

macro_rules! impl_float {
    ($($Real:ty),+) => {
        $(impl Float for $Real {
            const TWO: Self = 2.0;
        })+
    };
}

impl_float!(f32, f64);
