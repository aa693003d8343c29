//! Candle-backed sequence classification models
//!
//! Supports BERT, DistilBERT and RoBERTa checkpoints laid out the Hugging Face
//! way (`config.json`, a tokenizer, `model.safetensors` or `pytorch_model.bin`),
//! either from a local directory or downloaded through `hf-hub`.

use crate::config::{DeviceSpec, LearnedModelConfig};
use crate::learned::{SentimentModel, SentimentPrediction};
use candle_core::{DType, Device, IndexOp, Tensor, D};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use candle_transformers::models::distilbert::{Config as DistilBertConfig, DistilBertModel};
use candle_transformers::models::xlm_roberta::{
    Config as RobertaConfig, XLMRobertaForSequenceClassification,
};
use commentscope_core::{Error, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info, warn};

/// Architecture family, read from `model_type` in `config.json`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Architecture {
    Bert,
    DistilBert,
    Roberta,
}

impl Architecture {
    pub fn from_model_type(model_type: &str) -> Option<Self> {
        match model_type.to_ascii_lowercase().as_str() {
            "bert" => Some(Self::Bert),
            "distilbert" => Some(Self::DistilBert),
            "roberta" | "xlm-roberta" => Some(Self::Roberta),
            _ => None,
        }
    }
}

enum Backbone {
    Bert {
        model: BertModel,
        classifier: Linear,
    },
    DistilBert {
        model: DistilBertModel,
        pre_classifier: Option<Linear>,
        classifier: Linear,
    },
    Roberta(XLMRobertaForSequenceClassification),
}

/// A loaded sequence classifier with its tokenizer and label vocabulary
pub struct TransformerSentimentModel {
    name: String,
    tokenizer: Tokenizer,
    backbone: Backbone,
    device: Device,
    labels: Vec<String>,
}

impl TransformerSentimentModel {
    /// Load from `model_dir` if configured, otherwise try each Hub candidate in
    /// order and keep the first that loads.
    pub fn load(config: &LearnedModelConfig) -> Result<Self> {
        let device = get_device(config.device)?;

        if let Some(dir) = &config.model_dir {
            let name = dir.display().to_string();
            return Self::load_from_dir(name, dir, &device, config.max_length);
        }

        let mut errors = Vec::new();
        for repo in &config.candidates {
            let attempt = download_from_huggingface(repo)
                .and_then(|dir| Self::load_from_dir(repo.clone(), &dir, &device, config.max_length));
            match attempt {
                Ok(model) => return Ok(model),
                Err(e) => {
                    warn!(model = %repo, error = %e, "Sentiment model candidate failed to load");
                    errors.push(format!("{}: {}", repo, e));
                }
            }
        }

        Err(Error::model(format!(
            "no sentiment model could be loaded [{}]",
            errors.join(" | ")
        )))
    }

    /// Load a model from a directory in Hugging Face layout
    pub fn load_from_dir(
        name: String,
        model_path: &Path,
        device: &Device,
        max_length: usize,
    ) -> Result<Self> {
        let config_path = model_path.join("config.json");
        let config_json: serde_json::Value = parse_json_config(&config_path)?;

        let model_type = config_json
            .get("model_type")
            .and_then(|v| v.as_str())
            .unwrap_or("bert");
        let architecture = Architecture::from_model_type(model_type).ok_or_else(|| {
            Error::model(format!("unsupported model_type '{}'", model_type))
        })?;

        let labels = read_id2label(&config_json);
        let num_labels = labels.len();
        let mut tokenizer = load_tokenizer(model_path, architecture)?;
        configure_truncation(&mut tokenizer, max_length)?;
        let vb = load_var_builder(model_path, device)?;

        let backbone = match architecture {
            Architecture::Bert => {
                let bert_config: BertConfig = parse_json_config(&config_path)?;
                let model = load_bert_backbone(&vb, &bert_config)?;
                let classifier =
                    candle_nn::linear(bert_config.hidden_size, num_labels, vb.pp("classifier"))
                        .map_err(|e| {
                            Error::model(format!("Failed to load classification head: {}", e))
                        })?;
                Backbone::Bert { model, classifier }
            }
            Architecture::DistilBert => {
                let distil_config: DistilBertConfig = parse_json_config(&config_path)?;
                let hidden_size = config_json
                    .get("dim")
                    .or_else(|| config_json.get("hidden_size"))
                    .and_then(|v| v.as_u64())
                    .unwrap_or(768) as usize;
                let model = DistilBertModel::load(vb.pp("distilbert"), &distil_config)
                    .map_err(|e| Error::model(format!("Failed to load DistilBERT model: {}", e)))?;
                let pre_classifier =
                    candle_nn::linear(hidden_size, hidden_size, vb.pp("pre_classifier")).ok();
                let classifier = candle_nn::linear(hidden_size, num_labels, vb.pp("classifier"))
                    .map_err(|e| {
                        Error::model(format!("Failed to load classification head: {}", e))
                    })?;
                Backbone::DistilBert {
                    model,
                    pre_classifier,
                    classifier,
                }
            }
            Architecture::Roberta => {
                let roberta_config: RobertaConfig = parse_json_config(&config_path)?;
                let model =
                    XLMRobertaForSequenceClassification::new(num_labels, &roberta_config, vb)
                        .map_err(|e| {
                            Error::model(format!("Failed to load RoBERTa model: {}", e))
                        })?;
                Backbone::Roberta(model)
            }
        };

        info!(
            model = %name,
            ?architecture,
            ?labels,
            "Loaded sequence classifier"
        );

        Ok(Self {
            name,
            tokenizer,
            backbone,
            device: device.clone(),
            labels,
        })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    fn logits(&self, text: &str) -> Result<Tensor> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| Error::model(format!("Tokenization failed: {}", e)))?;

        match &self.backbone {
            Backbone::Bert { model, classifier } => {
                let input_ids = row_tensor(encoding.get_ids(), &self.device)?;
                let token_type_ids = row_tensor(encoding.get_type_ids(), &self.device)?;
                let hidden = model
                    .forward(&input_ids, &token_type_ids, None)
                    .map_err(candle_err("Model forward pass failed"))?;
                let cls = cls_embedding(&hidden)?;
                classifier
                    .forward(&cls)
                    .map_err(candle_err("Classification head failed"))
            }
            Backbone::DistilBert {
                model,
                pre_classifier,
                classifier,
            } => {
                let ids: Vec<i64> = encoding.get_ids().iter().map(|&x| x as i64).collect();
                let input_ids = row_tensor(ids.as_slice(), &self.device)?;
                // DistilBERT masks positions where the mask is 1
                let inverted: Vec<u8> = encoding
                    .get_attention_mask()
                    .iter()
                    .map(|&x| u8::from(x == 0))
                    .collect();
                let mask = row_tensor(inverted.as_slice(), &self.device)?;
                let hidden = model
                    .forward(&input_ids, &mask)
                    .map_err(candle_err("Model forward pass failed"))?;
                let mut pooled = cls_embedding(&hidden)?;
                if let Some(pre) = pre_classifier {
                    pooled = pre
                        .forward(&pooled)
                        .and_then(|t| t.relu())
                        .map_err(candle_err("Pre-classifier failed"))?;
                }
                classifier
                    .forward(&pooled)
                    .map_err(candle_err("Classification head failed"))
            }
            Backbone::Roberta(model) => {
                let input_ids = row_tensor(encoding.get_ids(), &self.device)?;
                let attention_mask = row_tensor(encoding.get_attention_mask(), &self.device)?;
                let token_type_ids = row_tensor(encoding.get_type_ids(), &self.device)?;
                model
                    .forward(&input_ids, &attention_mask, &token_type_ids)
                    .map_err(candle_err("Model forward pass failed"))
            }
        }
    }
}

impl SentimentModel for TransformerSentimentModel {
    fn predict(&self, text: &str) -> Result<SentimentPrediction> {
        let logits = self.logits(text)?;
        let probs = to_probabilities(&logits)?;

        let (index, score) = probs
            .iter()
            .copied()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .ok_or_else(|| Error::model("model produced no logits"))?;

        let label = self
            .labels
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("LABEL_{}", index));

        debug!(model = %self.name, %label, score, "Sequence classification");
        Ok(SentimentPrediction {
            label,
            score: f64::from(score),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn candle_err(context: &'static str) -> impl Fn(candle_core::Error) -> Error {
    move |e| Error::model(format!("{}: {}", context, e))
}

fn get_device(spec: DeviceSpec) -> Result<Device> {
    match spec {
        DeviceSpec::Cpu => Ok(Device::Cpu),
        DeviceSpec::Cuda { index } => Device::new_cuda(index.unwrap_or(0))
            .map_err(|e| Error::model(format!("Failed to initialize CUDA: {}", e))),
        DeviceSpec::Metal { index } => Device::new_metal(index.unwrap_or(0))
            .map_err(|e| Error::model(format!("Failed to initialize Metal: {}", e))),
    }
}

fn parse_json_config<T: DeserializeOwned>(config_path: &Path) -> Result<T> {
    let config_str = std::fs::read_to_string(config_path).map_err(|e| {
        Error::model(format!(
            "Failed to read config {}: {}",
            config_path.display(),
            e
        ))
    })?;

    serde_json::from_str(&config_str).map_err(|e| {
        Error::model(format!(
            "Failed to parse config {}: {}",
            config_path.display(),
            e
        ))
    })
}

/// Labels ordered by class index. Falls back to the binary LABEL_0/LABEL_1
/// vocabulary when `id2label` is absent.
fn read_id2label(config_json: &serde_json::Value) -> Vec<String> {
    let mut pairs: Vec<(usize, String)> = config_json
        .get("id2label")
        .and_then(|v| v.as_object())
        .map(|map| {
            map.iter()
                .filter_map(|(k, v)| Some((k.parse().ok()?, v.as_str()?.to_string())))
                .collect()
        })
        .unwrap_or_default();

    if pairs.is_empty() {
        return vec!["LABEL_0".to_string(), "LABEL_1".to_string()];
    }

    pairs.sort_by_key(|(idx, _)| *idx);
    pairs.into_iter().map(|(_, label)| label).collect()
}

fn download_from_huggingface(repo: &str) -> Result<PathBuf> {
    info!("Downloading model from HuggingFace: {}", repo);

    let api = hf_hub::api::sync::Api::new()
        .map_err(|e| Error::model(format!("Failed to initialize HuggingFace API: {}", e)))?;
    let repo_obj = api.repo(hf_hub::Repo::model(repo.to_string()));

    let config_path = repo_obj
        .get("config.json")
        .map_err(|e| Error::model(format!("Failed to download config.json: {}", e)))?;

    let found_weights = ["model.safetensors", "pytorch_model.bin"]
        .iter()
        .any(|file| repo_obj.get(file).is_ok());
    if !found_weights {
        return Err(Error::model(
            "No model weights found (tried model.safetensors, pytorch_model.bin)",
        ));
    }

    let mut found_tokenizer = false;
    for file in ["tokenizer.json", "vocab.txt", "vocab.json", "merges.txt"] {
        match repo_obj.get(file) {
            Ok(_) => {
                debug!("Found tokenizer file: {}", file);
                found_tokenizer = true;
            }
            Err(_) => debug!("File not found: {}", file),
        }
    }
    if !found_tokenizer {
        return Err(Error::model("No tokenizer files found"));
    }

    let model_dir = config_path
        .parent()
        .ok_or_else(|| Error::model("Invalid cache path"))?;
    Ok(model_dir.to_path_buf())
}

fn load_var_builder(model_path: &Path, device: &Device) -> Result<VarBuilder<'static>> {
    let safetensors = model_path.join("model.safetensors");
    if safetensors.exists() {
        // SAFETY: the file is memory-mapped read-only and not modified while loaded
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[safetensors], DType::F32, device)
                .map_err(|e| Error::model(format!("Failed to load weights: {}", e)))?
        };
        return Ok(vb);
    }

    let pth = model_path.join("pytorch_model.bin");
    if pth.exists() {
        return VarBuilder::from_pth(&pth, DType::F32, device)
            .map_err(|e| Error::model(format!("Failed to load PyTorch weights: {}", e)));
    }

    Err(Error::model(format!(
        "no model weights in {}",
        model_path.display()
    )))
}

fn load_bert_backbone(vb: &VarBuilder, config: &BertConfig) -> Result<BertModel> {
    let mut errors = Vec::new();

    for prefix in ["bert", ""] {
        let vb_prefix = if prefix.is_empty() {
            vb.clone()
        } else {
            vb.pp(prefix)
        };

        match BertModel::load(vb_prefix, config) {
            Ok(model) => return Ok(model),
            Err(e) => errors.push(format!(
                "{}: {}",
                if prefix.is_empty() { "<root>" } else { prefix },
                e
            )),
        }
    }

    Err(Error::model(format!(
        "Failed to load BERT backbone with tried prefixes [{}]",
        errors.join(" | ")
    )))
}

fn load_tokenizer(model_path: &Path, architecture: Architecture) -> Result<Tokenizer> {
    let tokenizer_json = model_path.join("tokenizer.json");
    if tokenizer_json.exists() {
        return Tokenizer::from_file(&tokenizer_json)
            .map_err(|e| Error::model(format!("Failed to load tokenizer.json: {}", e)));
    }

    let vocab_txt = model_path.join("vocab.txt");
    if architecture != Architecture::Roberta && vocab_txt.exists() {
        use tokenizers::models::wordpiece::WordPiece;
        use tokenizers::normalizers::BertNormalizer;
        use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
        use tokenizers::processors::bert::BertProcessing;

        let wordpiece = WordPiece::from_file(vocab_txt.to_string_lossy().as_ref())
            .unk_token("[UNK]".to_string())
            .build()
            .map_err(|e| Error::model(format!("Failed to build WordPiece model: {}", e)))?;

        let mut tokenizer = Tokenizer::new(wordpiece);
        tokenizer.with_normalizer(Some(BertNormalizer::default()));
        tokenizer.with_pre_tokenizer(Some(BertPreTokenizer));
        tokenizer.with_post_processor(Some(BertProcessing::new(
            ("[SEP]".to_string(), 102),
            ("[CLS]".to_string(), 101),
        )));
        return Ok(tokenizer);
    }

    let vocab_json = model_path.join("vocab.json");
    let merges = model_path.join("merges.txt");
    if vocab_json.exists() && merges.exists() {
        use tokenizers::models::bpe::BPE;
        use tokenizers::pre_tokenizers::byte_level::ByteLevel;
        use tokenizers::processors::roberta::RobertaProcessing;

        let bpe = BPE::from_file(
            vocab_json.to_string_lossy().as_ref(),
            merges.to_string_lossy().as_ref(),
        )
        .build()
        .map_err(|e| Error::model(format!("Failed to build BPE model: {}", e)))?;

        let mut tokenizer = Tokenizer::new(bpe);
        tokenizer.with_pre_tokenizer(Some(ByteLevel::default()));
        tokenizer.with_post_processor(Some(RobertaProcessing::new(
            ("</s>".to_string(), 2),
            ("<s>".to_string(), 0),
        )));
        return Ok(tokenizer);
    }

    Err(Error::model(format!(
        "No tokenizer found in {}",
        model_path.display()
    )))
}

/// Truncate inside the tokenizer so the special tokens survive long inputs
fn configure_truncation(tokenizer: &mut Tokenizer, max_length: usize) -> Result<()> {
    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length,
            ..Default::default()
        }))
        .map_err(|e| Error::model(format!("Failed to configure truncation: {}", e)))?;
    Ok(())
}

fn row_tensor<T: candle_core::WithDType>(values: &[T], device: &Device) -> Result<Tensor> {
    Tensor::new(values, device)
        .and_then(|t| t.unsqueeze(0))
        .map_err(candle_err("Failed to create input tensor"))
}

fn cls_embedding(hidden_states: &Tensor) -> Result<Tensor> {
    hidden_states
        .i((0, 0, ..))
        .and_then(|t| t.unsqueeze(0))
        .map_err(candle_err("Failed to get CLS token"))
}

fn to_probabilities(logits: &Tensor) -> Result<Vec<f32>> {
    candle_nn::ops::softmax(logits, D::Minus1)
        .and_then(|t| t.squeeze(0))
        .and_then(|t| t.to_vec1())
        .map_err(candle_err("Softmax failed"))
}
