mod display;
mod layer_bayes_conv;
