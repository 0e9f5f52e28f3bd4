use anyhow::Result;
use rusty_tesseract::{Args, Image};
use std::collections::HashMap;

use super::{OcrClient, OcrConfig, OcrEngine};
use crate::upload::bytes_to_image;

pub struct TesseractEngine {
    config: OcrConfig,
}

impl TesseractEngine {
    pub fn new(config: OcrConfig) -> Self {
        log::info!(
            "Tesseract engine configured: lang={}, dpi={}, psm={}, oem={}",
            config.lang,
            config.dpi(),
            config.psm(),
            config.oem()
        );
        Self { config }
    }

    fn args(&self) -> Args {
        Args {
            lang: self.config.lang.clone(),
            config_variables: HashMap::new(),
            dpi: Some(self.config.dpi() as i32),
            psm: Some(self.config.psm() as i32),
            oem: Some(self.config.oem() as i32),
        }
    }
}

impl OcrEngine for TesseractEngine {
    fn new_client(&self) -> Result<Box<dyn OcrClient>> {
        Ok(Box::new(TesseractClient {
            args: self.args(),
            image: None,
        }))
    }
}

struct TesseractClient {
    args: Args,
    image: Option<Image>,
}

impl OcrClient for TesseractClient {
    fn set_image_from_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let decoded = bytes_to_image(bytes)?;
        let image = Image::from_dynamic_image(&decoded)
            .map_err(|e| anyhow::anyhow!("Failed to hand image to tesseract: {}", e))?;
        self.image = Some(image);
        Ok(())
    }

    fn text(&mut self) -> Result<String> {
        let image = self
            .image
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("no image set on OCR client"))?;

        rusty_tesseract::image_to_string(image, &self.args)
            .map_err(|e| anyhow::anyhow!("tesseract failed: {}", e))
    }
}

impl Drop for TesseractClient {
    fn drop(&mut self) {
        self.image.take();
        log::debug!("Tesseract client released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_follow_config() {
        let engine = TesseractEngine::new(OcrConfig::new(Some(300), Some(6), Some(1)));
        let args = engine.args();
        assert_eq!(args.lang, "eng");
        assert_eq!(args.dpi, Some(300));
        assert_eq!(args.psm, Some(6));
        assert_eq!(args.oem, Some(1));
    }

    #[test]
    fn undecodable_bytes_fail_before_tesseract_runs() {
        let engine = TesseractEngine::new(OcrConfig::default());
        let mut client = engine.new_client().unwrap();
        let err = client.set_image_from_bytes(b"GIF89a-but-not-really").unwrap_err();
        assert!(err.to_string().contains("decode") || err.to_string().contains("format"));
    }

    #[test]
    fn text_without_image_is_an_error() {
        let engine = TesseractEngine::new(OcrConfig::default());
        let mut client = engine.new_client().unwrap();
        let err = client.text().unwrap_err();
        assert_eq!(err.to_string(), "no image set on OCR client");
    }
}
