mod ocr;
pub use ocr::{recognize, OcrClient, OcrConfig, OcrEngine, RecognizeError, TesseractEngine};
