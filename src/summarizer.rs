//! Abstractive summarization with a T5-family model via candle.
//!
//! The document is cut to a word budget first, then the tokenizer enforces the
//! model's token ceiling. Decoding is greedy with a minimum and maximum
//! summary length.

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::generation::LogitsProcessor;
use candle_transformers::models::t5::{Config, T5ForConditionalGeneration};
use hf_hub::{api::sync::Api, Repo, RepoType};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tokenizers::{Tokenizer, TruncationParams};

use crate::error::{Error, Result};
use crate::settings::Settings;
use crate::utils::truncate_words;
use crate::{elog, log};

/// Greedy decoding never samples, the seed is only required by the API
const SEED: u64 = 299792458;

/// Anything that turns document text into a summary
pub trait Summarize {
    fn summarize(&mut self, text: &str) -> Result<String>;
}

/// Apply the word budget, then summarize.
///
/// Oversized input is cut silently; the cut is only recorded in the log file.
pub fn summarize_document<S: Summarize + ?Sized>(
    summarizer: &mut S,
    text: &str,
    max_input_words: usize,
) -> Result<String> {
    let input = truncate_words(text, max_input_words);
    if let Cow::Owned(_) = input {
        log!(
            "[Summarizer] Input truncated to the first {} of {} words",
            max_input_words,
            text.split_whitespace().count()
        );
    }
    summarizer.summarize(&input)
}

/// Decoding parameters taken from settings
#[derive(Debug, Clone)]
struct GenerationParams {
    task_prefix: String,
    min_tokens: usize,
    max_tokens: usize,
    repeat_penalty: f32,
}

/// Model files on local disk
struct ModelFiles {
    config: PathBuf,
    tokenizer: PathBuf,
    weights: PathBuf,
}

/// Loaded T5 encoder-decoder plus tokenizer
pub struct T5Summarizer {
    model: T5ForConditionalGeneration,
    tokenizer: Tokenizer,
    config: Config,
    device: Device,
    params: GenerationParams,
}

fn select_device(use_gpu: bool) -> Device {
    // Try CUDA if feature enabled, otherwise CPU only
    #[cfg(feature = "cuda")]
    let device = if use_gpu && candle_core::utils::cuda_is_available() {
        match Device::new_cuda(0) {
            Ok(dev) => {
                log!("[Summarizer] Using CUDA device (GPU)");
                dev
            }
            Err(e) => {
                log!("[Summarizer] CUDA device creation failed: {}, falling back to CPU", e);
                Device::Cpu
            }
        }
    } else {
        log!("[Summarizer] CUDA not available or disabled, using CPU");
        Device::Cpu
    };

    #[cfg(not(feature = "cuda"))]
    let device = {
        let _ = use_gpu;
        log!("[Summarizer] Using CPU (cuda feature not enabled)");
        Device::Cpu
    };

    device
}

fn local_model_files(dir: &Path) -> Result<ModelFiles> {
    let files = ModelFiles {
        config: dir.join("config.json"),
        tokenizer: dir.join("tokenizer.json"),
        weights: dir.join("model.safetensors"),
    };
    for path in [&files.config, &files.tokenizer, &files.weights] {
        if !path.exists() {
            return Err(Error::Model(format!("Missing model file {}", path.display())));
        }
    }
    Ok(files)
}

/// Download model files from HF Hub (cached after the first run)
fn hub_model_files(model_id: &str, revision: &str) -> Result<ModelFiles> {
    let api = Api::new().map_err(|e| Error::Model(format!("Failed to create HF API: {}", e)))?;
    let repo = api.repo(Repo::with_revision(
        model_id.to_string(),
        RepoType::Model,
        revision.to_string(),
    ));

    let config = repo
        .get("config.json")
        .map_err(|e| Error::Model(format!("Failed to download config: {}", e)))?;
    let tokenizer = repo
        .get("tokenizer.json")
        .map_err(|e| Error::Model(format!("Failed to download tokenizer: {}", e)))?;
    let weights = repo
        .get("model.safetensors")
        .map_err(|e| Error::Model(format!("Failed to download weights: {}", e)))?;

    Ok(ModelFiles { config, tokenizer, weights })
}

impl T5Summarizer {
    /// Load the configured model (local directory or Hub)
    pub fn load(settings: &Settings) -> Result<Self> {
        let device = select_device(settings.use_gpu);

        let (files, source) = match &settings.model_dir {
            Some(dir) => (local_model_files(Path::new(dir))?, dir.clone()),
            None => {
                let model_id = settings.effective_model_id();
                (hub_model_files(&model_id, &settings.revision)?, model_id)
            }
        };

        let config_str = std::fs::read_to_string(&files.config)
            .map_err(|e| Error::Model(format!("Failed to read config: {}", e)))?;
        let mut config: Config = serde_json::from_str(&config_str)
            .map_err(|e| Error::Model(format!("Failed to parse config: {}", e)))?;
        config.use_cache = true;

        let mut tokenizer = Tokenizer::from_file(&files.tokenizer)
            .map_err(|e| Error::Model(format!("Failed to load tokenizer: {}", e)))?;
        let truncation = TruncationParams {
            max_length: settings.max_input_tokens,
            ..Default::default()
        };
        tokenizer
            .with_truncation(Some(truncation))
            .map_err(|e| Error::Model(format!("Failed to set truncation: {}", e)))?;

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[files.weights], DType::F32, &device)?
        };
        let model = T5ForConditionalGeneration::load(vb, &config)?;

        log!("[Summarizer] Model loaded: {}", source);

        Ok(Self {
            model,
            tokenizer,
            config,
            device,
            params: GenerationParams {
                task_prefix: settings.task_prefix.clone(),
                min_tokens: settings.min_summary_tokens,
                max_tokens: settings.max_summary_tokens.max(settings.min_summary_tokens),
                repeat_penalty: settings.repeat_penalty,
            },
        })
    }

    fn generate(&mut self, text: &str) -> Result<String> {
        let prompt = format!("{}{}", self.params.task_prefix, text);
        let encoding = self
            .tokenizer
            .encode(prompt, true)
            .map_err(|e| Error::Model(format!("Tokenization failed: {}", e)))?;

        let input_ids = Tensor::new(encoding.get_ids(), &self.device)?.unsqueeze(0)?;

        self.model.clear_kv_cache();
        let encoder_output = self.model.encode(&input_ids)?;

        let start_token = self
            .config
            .decoder_start_token_id
            .unwrap_or(self.config.pad_token_id) as u32;
        let mut output_ids = vec![start_token];
        let mut logits_processor = LogitsProcessor::new(SEED, None, None);

        for index in 0..self.params.max_tokens {
            let decoder_ids = if index == 0 || !self.config.use_cache {
                Tensor::new(output_ids.as_slice(), &self.device)?.unsqueeze(0)?
            } else {
                let last = output_ids[output_ids.len() - 1];
                Tensor::new(&[last], &self.device)?.unsqueeze(0)?
            };

            let logits = self
                .model
                .decode(&decoder_ids, &encoder_output)?
                .squeeze(0)?
                .to_dtype(DType::F32)?;

            let logits = if self.params.repeat_penalty == 1.0 {
                logits
            } else {
                candle_transformers::utils::apply_repeat_penalty(
                    &logits,
                    self.params.repeat_penalty,
                    &output_ids[1..],
                )?
            };

            // No end-of-sequence until the minimum length is reached
            let logits = if output_ids.len() - 1 < self.params.min_tokens {
                suppress_token(&logits, self.config.eos_token_id)?
            } else {
                logits
            };

            let next = logits_processor.sample(&logits)?;
            if next as usize == self.config.eos_token_id {
                break;
            }
            output_ids.push(next);
        }

        let summary = self
            .tokenizer
            .decode(&output_ids[1..], true)
            .map_err(|e| Error::Model(format!("Detokenization failed: {}", e)))?;

        log!(
            "[Summarizer] {} input tokens -> {} summary tokens",
            encoding.get_ids().len(),
            output_ids.len() - 1
        );

        Ok(summary.trim().to_string())
    }
}

impl Summarize for T5Summarizer {
    fn summarize(&mut self, text: &str) -> Result<String> {
        self.generate(text)
    }
}

fn suppress_token(logits: &Tensor, token: usize) -> Result<Tensor> {
    let mut values = logits.to_vec1::<f32>()?;
    if let Some(value) = values.get_mut(token) {
        *value = f32::NEG_INFINITY;
    }
    Ok(Tensor::new(values.as_slice(), logits.device())?)
}

/// Loads the model on first use, then reuses it for the session
pub struct LazySummarizer {
    settings: Settings,
    model: Option<T5Summarizer>,
}

impl LazySummarizer {
    pub fn new(settings: Settings) -> Self {
        Self { settings, model: None }
    }

    #[cfg(test)]
    fn is_loaded(&self) -> bool {
        self.model.is_some()
    }
}

impl Summarize for LazySummarizer {
    fn summarize(&mut self, text: &str) -> Result<String> {
        if self.model.is_none() {
            match T5Summarizer::load(&self.settings) {
                Ok(model) => self.model = Some(model),
                Err(e) => {
                    elog!("[Summarizer] {}", e);
                    return Err(e);
                }
            }
        }
        match self.model.as_mut() {
            Some(model) => model.summarize(text),
            None => Err(Error::Model("Model not loaded".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records what it was asked to summarize
    #[derive(Default)]
    struct Recorder {
        inputs: Vec<String>,
    }

    impl Summarize for Recorder {
        fn summarize(&mut self, text: &str) -> Result<String> {
            self.inputs.push(text.to_string());
            Ok("summary".to_string())
        }
    }

    #[test]
    fn test_short_document_passed_through_unchanged() {
        let text = "Methods\nWe did X.\n\nResults\nWe found Y.\n";
        let mut recorder = Recorder::default();
        let summary = summarize_document(&mut recorder, text, 1300).unwrap();
        assert_eq!(summary, "summary");
        assert_eq!(recorder.inputs, vec![text.to_string()]);
    }

    #[test]
    fn test_long_document_cut_to_word_budget() {
        let words: Vec<String> = (0..2000).map(|i| format!("word{}", i)).collect();
        let text = words.join("  \n");
        let mut recorder = Recorder::default();

        summarize_document(&mut recorder, &text, 1300).unwrap();
        assert_eq!(recorder.inputs[0], words[..1300].join(" "));
    }

    #[test]
    fn test_exactly_at_budget_is_not_rewritten() {
        let text = "a\nb\nc";
        let mut recorder = Recorder::default();
        summarize_document(&mut recorder, text, 3).unwrap();
        assert_eq!(recorder.inputs[0], text);
    }

    #[test]
    fn test_suppress_token_masks_eos() {
        let logits = Tensor::new(&[0.1f32, 5.0, 0.3], &Device::Cpu).unwrap();
        let masked = suppress_token(&logits, 1).unwrap().to_vec1::<f32>().unwrap();
        assert_eq!(masked[0], 0.1);
        assert!(masked[1].is_infinite() && masked[1] < 0.0);
    }

    #[test]
    fn test_missing_local_model_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(matches!(local_model_files(dir.path()), Err(Error::Model(_))));
    }

    #[test]
    #[ignore = "downloads model weights from the Hugging Face Hub"]
    fn test_t5_summary_respects_length_bounds() {
        let settings = Settings {
            min_summary_tokens: 5,
            max_summary_tokens: 40,
            ..Settings::default()
        };
        let mut summarizer = LazySummarizer::new(settings);
        let text = "The study measured the effect of sleep on memory in 120 adults. \
                    Participants who slept eight hours recalled more words than those who slept four hours.";
        let summary = summarizer.summarize(text).unwrap();
        assert!(summarizer.is_loaded());
        assert!(!summary.is_empty());
    }
}
