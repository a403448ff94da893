// ============================================================
// Layer 5 — CBOW Model (negative sampling)
// ============================================================
// Continuous bag of words with negative sampling:
//
//   h     = mean of the input vectors of the context words
//   score = h · output vector, for the target and k noise words
//   loss  = -log σ(score_target) - Σ log σ(-score_noise)
//
// The model is built over a batch's rows only (see CbowBatcher),
// so both matrices are [rows, vector_size] rather than the full
// vocabulary. The loss is summed over the batch, so a learning
// rate means the same thing as in per-sample word2vec SGD.

use burn::{
    module::Param,
    nn::{Embedding, EmbeddingConfig},
    prelude::*,
    tensor::activation::log_sigmoid,
};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct CbowConfig {
    /// Embedding rows held by this model
    pub rows:        usize,
    pub vector_size: usize,
}

impl CbowConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> CbowModel<B> {
        let input  = EmbeddingConfig::new(self.rows, self.vector_size).init(device);
        let output = EmbeddingConfig::new(self.rows, self.vector_size).init(device);
        CbowModel { input, output, vector_size: self.vector_size }
    }

    /// Build the model from caller-owned weights (row-major,
    /// rows × vector_size each), so the starting point never
    /// depends on the backend's RNG.
    pub fn init_with<B: Backend>(
        &self,
        input_weights:  Vec<f32>,
        output_weights: Vec<f32>,
        device:         &B::Device,
    ) -> CbowModel<B> {
        let mut model = self.init(device);
        let shape     = [self.rows, self.vector_size];

        model.input.weight = Param::from_tensor(Tensor::<B, 2>::from_data(
            TensorData::new(input_weights, shape), device,
        ));
        model.output.weight = Param::from_tensor(Tensor::<B, 2>::from_data(
            TensorData::new(output_weights, shape), device,
        ));
        model
    }
}

#[derive(Module, Debug)]
pub struct CbowModel<B: Backend> {
    /// Word vectors (what the trainer hands back)
    pub input:       Embedding<B>,
    /// Context vectors used only for scoring
    pub output:      Embedding<B>,
    pub vector_size: usize,
}

impl<B: Backend> CbowModel<B> {
    /// context: [batch, width] ids, mask: [batch, width],
    /// candidates: [batch, 1 + k] ids → scores [batch, 1 + k]
    pub fn forward(
        &self,
        context:    Tensor<B, 2, Int>,
        mask:       Tensor<B, 2>,
        candidates: Tensor<B, 2, Int>,
    ) -> Tensor<B, 2> {
        let [batch_size, width] = context.dims();
        let [_, span]           = candidates.dims();

        let embedded = self.input.forward(context); // [batch, width, dim]
        let slots    = mask.clone().reshape([batch_size, width, 1]);
        let summed   = (embedded * slots).sum_dim(1); // [batch, 1, dim]

        // Mean over real slots only; clamp guards an all-padding row.
        let counts = mask.sum_dim(1).clamp_min(1.0).reshape([batch_size, 1, 1]);
        let hidden = summed / counts;

        let scored = self.output.forward(candidates); // [batch, span, dim]
        (scored * hidden).sum_dim(2).reshape([batch_size, span])
    }

    /// Summed negative-sampling loss over the batch
    pub fn forward_loss(
        &self,
        context:    Tensor<B, 2, Int>,
        mask:       Tensor<B, 2>,
        candidates: Tensor<B, 2, Int>,
        labels:     Tensor<B, 2>,
        weights:    Tensor<B, 2>,
    ) -> Tensor<B, 1> {
        let scores = self.forward(context, mask, candidates);
        (log_sigmoid(scores * labels) * weights).sum().neg()
    }
}
