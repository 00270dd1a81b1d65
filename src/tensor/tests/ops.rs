use crate::assert_panic;
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;

#[test]
fn test_add_and_mul_with_or_without_ownership() {
    let tensor1 = Tensor::new(&[1., 2., 3.], &[3]);
    let tensor2 = Tensor::new(&[4., 5., 6.], &[3]);

    assert_eq!(&tensor1 + 5., Tensor::new(&[6., 7., 8.], &[3]));
    assert_eq!(tensor1.clone() + 5., Tensor::new(&[6., 7., 8.], &[3]));
    assert_eq!(&tensor1 + &tensor2, Tensor::new(&[5., 7., 9.], &[3]));
    assert_eq!(tensor1.clone() + tensor2.clone(), Tensor::new(&[5., 7., 9.], &[3]));
    assert_eq!(tensor1.clone() + &tensor2, Tensor::new(&[5., 7., 9.], &[3]));
    assert_eq!(&tensor1 + tensor2.clone(), Tensor::new(&[5., 7., 9.], &[3]));

    assert_eq!(&tensor1 * 2., Tensor::new(&[2., 4., 6.], &[3]));
    assert_eq!(tensor1.clone() * 2., Tensor::new(&[2., 4., 6.], &[3]));
    assert_eq!(&tensor1 * &tensor2, Tensor::new(&[4., 10., 18.], &[3]));
    assert_eq!(tensor1.clone() * tensor2.clone(), Tensor::new(&[4., 10., 18.], &[3]));
    assert_eq!(tensor1.clone() * &tensor2, Tensor::new(&[4., 10., 18.], &[3]));
    assert_eq!(&tensor1 * tensor2, Tensor::new(&[4., 10., 18.], &[3]));
}

#[test]
fn test_ops_with_inconsistent_shape() {
    let tensor1 = Tensor::new(&[1., 2., 3.], &[3]);
    let tensor2 = Tensor::new(&[1., 2., 3.], &[1, 3]);
    assert_panic!(
        &tensor1 + &tensor2,
        "形状不一致，故无法相加：第一个张量的形状为[3]，第二个张量的形状为[1, 3]"
    );
    assert_panic!(
        &tensor1 * &tensor2,
        "形状不一致，故无法相乘：第一个张量的形状为[3]，第二个张量的形状为[1, 3]"
    );
}

#[test]
fn test_exp_fill_sum() {
    let tensor = Tensor::new(&[0., 1., -1.], &[3]);
    assert_abs_diff_eq!(
        tensor.exp(),
        Tensor::new(&[1., std::f32::consts::E, 1. / std::f32::consts::E], &[3]),
        epsilon = 1e-6
    );

    // exp(-inf) == 0，用于让对数标准差退化为确定性
    let neg_inf = Tensor::full(f32::NEG_INFINITY, &[2]);
    assert_eq!(neg_inf.exp(), Tensor::zeros(&[2]));

    let mut tensor = Tensor::zeros(&[2, 2]);
    tensor.fill(-3.);
    assert_eq!(tensor.sum(), -12.);
    assert_eq!(tensor.map(|x| x * x), Tensor::full(9., &[2, 2]));
}

#[test]
fn test_abs_diff_eq_respects_shape() {
    let a = Tensor::new(&[1., 2.], &[2]);
    let b = Tensor::new(&[1., 2.], &[1, 2]);
    assert!(!approx::abs_diff_eq!(a, b));
    assert!(approx::abs_diff_eq!(a, Tensor::new(&[1.0000001, 2.], &[2]), epsilon = 1e-5));
}

#[test]
fn test_relative_eq() {
    let a = Tensor::new(&[1000., 2000.], &[2]);
    assert!(approx::relative_eq!(a, Tensor::new(&[1000.01, 2000.], &[2]), max_relative = 1e-4));
    assert!(!approx::relative_eq!(a, Tensor::new(&[1001., 2000.], &[2]), max_relative = 1e-4));
}
