use burn::{
    prelude::*,
    tensor::{BasicOps, Element},
};

/// A trait for converting items to tensors
///
/// Environment states implement this to cross the seam into the value model.
/// Provided for `Vec<E>` and `[E; N]` of any tensor element type.
pub trait ToTensor<B: Backend, const D: usize, K: BasicOps<B>> {
    fn to_tensor(self, device: &B::Device) -> Tensor<B, D, K>;
}

impl<B, E, K> ToTensor<B, 1, K> for Vec<E>
where
    B: Backend,
    E: Element,
    K: BasicOps<B, Elem = E>,
{
    fn to_tensor(self, device: &B::Device) -> Tensor<B, 1, K> {
        let len = self.len();
        Tensor::from_data(Data::new(self, [len].into()), device)
    }
}

impl<B, E, K, const N: usize> ToTensor<B, 1, K> for [E; N]
where
    B: Backend,
    E: Element,
    K: BasicOps<B, Elem = E>,
{
    fn to_tensor(self, device: &B::Device) -> Tensor<B, 1, K> {
        Tensor::from_data(Data::new(self.to_vec(), [N].into()), device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::{ndarray::NdArrayDevice, NdArray};

    #[test]
    fn vec_and_array_to_tensor() {
        let device = NdArrayDevice::Cpu;
        let t: Tensor<NdArray, 1> = vec![1.0f32, 2.0, 3.0].to_tensor(&device);
        assert_eq!(t.dims(), [3]);

        let t: Tensor<NdArray, 1> = [4.0f32, 5.0].to_tensor(&device);
        assert_eq!(t.into_data().value, vec![4.0, 5.0]);
    }
}
