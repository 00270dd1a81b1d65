use crate::nn::BayesConvError;
use crate::{assert_err, assert_panic};

#[test]
fn test_assert_panic_macro() {
    assert_panic!(panic!("test panic"));
    assert_panic!(panic!("custom test panic msg"), "custom test panic msg");
}

#[test]
fn test_assert_err_macro() {
    let invalid: Result<(), BayesConvError> =
        Err(BayesConvError::InvalidConfiguration("groups须大于0".to_string()));
    assert_err!(invalid);
    assert_err!(invalid, BayesConvError::InvalidConfiguration("groups须大于0"));
    assert_err!(invalid, BayesConvError::InvalidConfiguration(msg) if msg.contains("groups"));

    let mismatch: Result<(), BayesConvError> = Err(BayesConvError::ShapeMismatch {
        expected: vec![4],
        got: vec![3],
        message: "偏置形状须为 [C_out]".to_string(),
    });
    assert_err!(mismatch, BayesConvError::ShapeMismatch([4], [3], "偏置形状须为 [C_out]"));
    assert_err!(mismatch, BayesConvError::ShapeMismatch { .. });
}

#[test]
fn test_assert_err_macro_bias_presence() {
    let mismatch: Result<(), BayesConvError> = Err(BayesConvError::BiasPresenceMismatch {
        layer_has_bias: true,
        checkpoint_has_bias: false,
    });
    assert_err!(mismatch, BayesConvError::BiasPresenceMismatch(true, false));
    assert_err!(mismatch, BayesConvError::BiasPresenceMismatch { layer_has_bias: true, .. });
}
