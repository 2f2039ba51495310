// Runtime -> compile-time dispatch for precision and rank.

/// Bind `$T` to the scalar type of a [`fftcheck_layout::Precision`] and evaluate `$body`.
macro_rules! with_scalar {
    ($precision:expr, $T:ident => $body:expr) => {
        match $precision {
            fftcheck_layout::Precision::Single => {
                type $T = f32;
                $body
            }
            fftcheck_layout::Precision::Double => {
                type $T = f64;
                $body
            }
        }
    };
}

/// Bind the const `$N` to a rank of 1, 2 or 3 and evaluate `$body`.
///
/// Any other rank is `UnsupportedDimension`.
macro_rules! with_rank {
    ($dim:expr, $N:ident => $body:expr) => {
        match $dim {
            1 => {
                const $N: usize = 1;
                $body
            }
            2 => {
                const $N: usize = 2;
                $body
            }
            3 => {
                const $N: usize = 3;
                $body
            }
            d => Err(fftcheck_layout::FftLayoutError::UnsupportedDimension(d)),
        }
    };
}
