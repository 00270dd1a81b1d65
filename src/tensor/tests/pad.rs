use crate::errors::TensorError;
use crate::tensor::{PadMode, Tensor};

#[rustfmt::skip]
const X_3X3: &[f32] = &[
    1., 2., 3.,
    4., 5., 6.,
    7., 8., 9.,
];

#[test]
fn test_zero_pad() {
    let x = Tensor::new(X_3X3, &[1, 1, 3, 3]);
    let padded = x.pad(&[1, 1, 1, 1], PadMode::Zeros).unwrap();
    assert_eq!(padded.shape(), &[1, 1, 5, 5]);
    #[rustfmt::skip]
    let expected = Tensor::new(&[
        0., 0., 0., 0., 0.,
        0., 1., 2., 3., 0.,
        0., 4., 5., 6., 0.,
        0., 7., 8., 9., 0.,
        0., 0., 0., 0., 0.,
    ], &[1, 1, 5, 5]);
    assert_eq!(padded, expected);
}

#[test]
fn test_circular_pad_asymmetric() {
    let x = Tensor::new(X_3X3, &[1, 1, 3, 3]);
    // 宽度：左1右0；高度：上1下0
    let padded = x.pad(&[1, 0, 1, 0], PadMode::Circular).unwrap();
    assert_eq!(padded.shape(), &[1, 1, 4, 4]);
    #[rustfmt::skip]
    let expected = Tensor::new(&[
        9., 7., 8., 9.,
        3., 1., 2., 3.,
        6., 4., 5., 6.,
        9., 7., 8., 9.,
    ], &[1, 1, 4, 4]);
    assert_eq!(padded, expected);
}

#[test]
fn test_circular_pad_only_last_dim() {
    let x = Tensor::new(&[1., 2., 3., 4.], &[1, 4]);
    let padded = x.pad(&[2, 1], PadMode::Circular).unwrap();
    assert_eq!(padded, Tensor::new(&[3., 4., 1., 2., 3., 4., 1.], &[1, 7]));
}

#[test]
fn test_invalid_pad() {
    let x = Tensor::new(X_3X3, &[3, 3]);
    assert_eq!(
        x.pad(&[1, 1, 1], PadMode::Zeros),
        Err(TensorError::InvalidPadding {
            shape: vec![3, 3],
            pad: vec![1, 1, 1],
        })
    );
    assert_eq!(
        x.pad(&[1, 1, 1, 1, 1, 1], PadMode::Zeros),
        Err(TensorError::InvalidPadding {
            shape: vec![3, 3],
            pad: vec![1, 1, 1, 1, 1, 1],
        })
    );
    assert_eq!(
        x.pad(&[4, 0], PadMode::Circular),
        Err(TensorError::CircularPaddingTooLarge { dim_len: 3, pad: 4 })
    );
}
