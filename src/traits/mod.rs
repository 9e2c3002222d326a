mod to_tensor;

pub use to_tensor::ToTensor;
