pub mod image2text;
pub mod upload;

pub use image2text::{recognize, OcrClient, OcrConfig, OcrEngine, RecognizeError, TesseractEngine};
