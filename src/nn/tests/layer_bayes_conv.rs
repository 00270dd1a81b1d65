use crate::assert_err;
use crate::distribution::Generator;
use crate::nn::{
    BayesConv2dConfig, BayesConvCore, BayesConvError, Bias, Gaussian, LayerConfig,
    circular_pad_amounts, weight_shape,
};
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;

fn conv2d_config(in_channels: usize, out_channels: usize, groups: usize) -> LayerConfig {
    BayesConv2dConfig::new(0.0, -3.0, in_channels, out_channels, 3)
        .with_groups(groups)
        .layer_config()
        .unwrap()
}

#[test]
fn test_gaussian_new() {
    let gaussian = Gaussian::new(Tensor::zeros(&[2, 3]), Tensor::full(-1.0, &[2, 3])).unwrap();
    assert_eq!(gaussian.shape(), &[2, 3]);
    assert_abs_diff_eq!(gaussian.sigma(), Tensor::full((-1.0f32).exp(), &[2, 3]));

    assert_err!(
        Gaussian::new(Tensor::zeros(&[2, 3]), Tensor::zeros(&[3, 2])),
        BayesConvError::ShapeMismatch([2, 3], [3, 2], "log_sigma与mu的形状须一致")
    );
}

#[test]
fn test_gaussian_sample_with_noise() {
    let gaussian = Gaussian::new(
        Tensor::new(&[1.0, -2.0], &[2]),
        Tensor::new(&[0.0, 2.0f32.ln()], &[2]),
    )
    .unwrap();
    let sample = gaussian.sample_with_noise(&Tensor::new(&[0.5, -1.0], &[2]));
    assert_abs_diff_eq!(sample, Tensor::new(&[1.5, -4.0], &[2]), epsilon = 1e-6);

    // sigma 为 0 时采样结果就是均值
    let degenerate = Gaussian::new(
        Tensor::new(&[1.0, -2.0], &[2]),
        Tensor::full(f32::NEG_INFINITY, &[2]),
    )
    .unwrap();
    assert_eq!(
        degenerate.sample_with_noise(&Tensor::new(&[3.0, -7.0], &[2])),
        Tensor::new(&[1.0, -2.0], &[2])
    );
}

#[test]
fn test_weight_shape() {
    assert_eq!(weight_shape(&conv2d_config(4, 6, 2)), vec![6, 2, 3, 3]);

    let mut transposed = conv2d_config(4, 6, 2);
    transposed.transposed = true;
    assert_eq!(weight_shape(&transposed), vec![4, 3, 3, 3]);

    let mut conv1d = conv2d_config(2, 8, 1);
    conv1d.kernel_size = vec![5];
    assert_eq!(weight_shape(&conv1d), vec![8, 2, 5]);

    let mut conv3d = conv2d_config(2, 8, 1);
    conv3d.kernel_size = vec![3, 2, 1];
    assert_eq!(weight_shape(&conv3d), vec![8, 2, 3, 2, 1]);
}

#[test]
fn test_circular_pad_amounts() {
    assert_eq!(circular_pad_amounts(&[1, 1]), vec![1, 0, 1, 0]);
    assert_eq!(circular_pad_amounts(&[0, 0]), vec![0, 0, 0, 0]);
    // 从最后一个空间维度开始：先 W 再 H
    assert_eq!(circular_pad_amounts(&[3, 2]), vec![1, 1, 2, 1]);
    assert_eq!(circular_pad_amounts(&[4]), vec![2, 2]);
}

#[test]
fn test_core_construction() {
    let generator = Generator::with_seed(0);
    let core = BayesConvCore::new(conv2d_config(4, 6, 2), &generator).unwrap();
    assert_eq!(core.weight().shape(), &[6, 2, 3, 3]);
    assert_eq!(core.weight().log_sigma(), &Tensor::full(-3.0, &[6, 2, 3, 3]));

    let bias = core.bias().as_gaussian().unwrap();
    assert_eq!(bias.shape(), &[6]);
    assert_eq!(bias.log_sigma(), &Tensor::full(-3.0, &[6]));
    // fan_in = 2 * 3 * 3
    let bound = 1.0 / 18.0f32.sqrt();
    assert!(bias.mu().to_vec().iter().all(|x| x.abs() <= bound + 1e-6));

    let mut config = conv2d_config(4, 6, 1);
    config.has_bias = false;
    let core = BayesConvCore::new(config, &generator).unwrap();
    assert_eq!(core.bias(), &Bias::Absent);
    assert!(!core.bias().is_present());
}

#[test]
fn test_core_construction_validates_config() {
    let mut config = conv2d_config(4, 6, 1);
    config.groups = 4;
    assert_err!(
        BayesConvCore::new(config, &Generator::with_seed(0)),
        BayesConvError::InvalidConfiguration("out_channels(6)必须能被groups(4)整除")
    );
}

#[test]
fn test_core_construction_reproducible() {
    let a = BayesConvCore::new(conv2d_config(2, 4, 1), &Generator::with_seed(42)).unwrap();
    let b = BayesConvCore::new(conv2d_config(2, 4, 1), &Generator::with_seed(42)).unwrap();
    let c = BayesConvCore::new(conv2d_config(2, 4, 1), &Generator::with_seed(43)).unwrap();
    assert_eq!(a, b);
    assert_ne!(a.weight().mu(), c.weight().mu());
}

#[test]
fn test_core_sample_draw_order() {
    let core = BayesConvCore::new(conv2d_config(2, 4, 1), &Generator::with_seed(0)).unwrap();

    let (weight, bias) = core.sample(&Generator::with_seed(7)).unwrap();

    // 先抽权重噪声，再抽偏置噪声
    let manual = Generator::with_seed(7);
    let weight_noise = manual.standard_normal(&[4, 2, 3, 3]);
    let bias_noise = manual.standard_normal(&[4]);
    let bias_gaussian = core.bias().as_gaussian().unwrap();

    assert_abs_diff_eq!(
        weight,
        core.weight().sample_with_noise(&weight_noise),
        epsilon = 1e-6
    );
    assert_abs_diff_eq!(
        bias.unwrap(),
        bias_gaussian.sample_with_noise(&bias_noise),
        epsilon = 1e-6
    );
}

#[test]
fn test_core_sample_without_bias() {
    let mut config = conv2d_config(2, 4, 1);
    config.has_bias = false;
    let core = BayesConvCore::new(config, &Generator::with_seed(0)).unwrap();
    let (weight, bias) = core.sample(&Generator::with_seed(1)).unwrap();
    assert_eq!(weight.shape(), &[4, 2, 3, 3]);
    assert!(bias.is_none());
}

#[test]
fn test_core_samples_differ() {
    let generator = Generator::with_seed(3);
    let core = BayesConvCore::new(conv2d_config(2, 4, 1), &generator).unwrap();
    let (first, _) = core.sample(&generator).unwrap();
    let (second, _) = core.sample(&generator).unwrap();
    assert_eq!(first.shape(), second.shape());
    assert_ne!(first, second);
}

#[test]
fn test_core_reset_parameters() {
    let generator = Generator::with_seed(0);
    let mut core = BayesConvCore::new(conv2d_config(2, 4, 1), &generator).unwrap();
    let original = core.clone();

    for (_, tensor) in core.named_tensors_mut() {
        tensor.fill(9.0);
    }
    core.reset_parameters(&generator).unwrap();

    // 生成器已前进，均值重新抽取，而对数标准差回到先验
    assert_ne!(core.weight().mu(), original.weight().mu());
    assert_eq!(core.weight().log_sigma(), original.weight().log_sigma());
    assert!(core.weight().mu().to_vec().iter().all(|x| x.abs() <= 1.0 / 18.0f32.sqrt()));
    assert_eq!(
        core.bias().as_gaussian().unwrap().log_sigma(),
        &Tensor::full(-3.0, &[4])
    );
}

#[test]
fn test_core_named_tensors() {
    let core = BayesConvCore::new(conv2d_config(2, 4, 1), &Generator::with_seed(0)).unwrap();
    let names: Vec<&str> = core.named_tensors().into_iter().map(|(name, _)| name).collect();
    assert_eq!(
        names,
        ["weight_mu", "weight_log_sigma", "bias_mu", "bias_log_sigma"]
    );
}
