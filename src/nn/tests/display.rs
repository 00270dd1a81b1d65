use crate::nn::{BayesConv2dConfig, PaddingMode};

#[test]
fn test_display_defaults_omitted() {
    let conv = BayesConv2dConfig::new(0.0, -3.0, 1, 1, 3)
        .with_padding(1)
        .with_bias(false)
        .init_seeded(0)
        .unwrap();
    assert_eq!(
        conv.to_string(),
        "BayesConv2d(0, -3, 1, 1, kernel_size=(3, 3), stride=(1, 1), padding=(1, 1), bias=False)"
    );
}

#[test]
fn test_display_non_default_fields() {
    let conv = BayesConv2dConfig::new(0.1, -2.5, 4, 8, (3, 5))
        .with_stride(2)
        .with_dilation(2)
        .with_groups(2)
        .with_padding_mode(PaddingMode::Circular)
        .init_seeded(0)
        .unwrap();
    assert_eq!(
        conv.to_string(),
        "BayesConv2d(0.1, -2.5, 4, 8, kernel_size=(3, 5), stride=(2, 2), dilation=(2, 2), groups=2)"
    );
}

#[test]
fn test_extra_repr_single_element_tuple() {
    let mut config = BayesConv2dConfig::new(0.0, -1.0, 2, 2, 3).layer_config().unwrap();
    config.kernel_size = vec![3];
    config.stride = vec![1];
    config.padding = vec![0];
    config.dilation = vec![1];
    config.output_padding = vec![1];
    config.transposed = true;
    assert_eq!(
        config.extra_repr(),
        "0, -1, 2, 2, kernel_size=(3,), stride=(1,), output_padding=(1,)"
    );
}
