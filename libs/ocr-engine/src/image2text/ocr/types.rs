use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OcrConfig {
    pub lang: String,
    pub dpi: Option<u32>, // dots per inch
    pub psm: Option<u32>, // Page segmentation mode
    pub oem: Option<u32>, // OCR Engine Mode
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            lang: Self::get_default_lang(),
            dpi: None,
            psm: None,
            oem: None,
        }
    }
}

impl OcrConfig {
    pub fn new(dpi: Option<u32>, psm: Option<u32>, oem: Option<u32>) -> Self {
        Self {
            lang: Self::get_default_lang(),
            dpi,
            psm,
            oem,
        }
    }

    pub fn get_default_lang() -> String {
        "eng".to_string()
    }

    pub fn get_default_dpi() -> u32 {
        150
    }

    // fully automatic page segmentation, no OSD
    pub fn get_default_psm() -> u32 {
        3
    }

    pub fn get_default_oem() -> u32 {
        3
    }

    pub fn dpi(&self) -> u32 {
        self.dpi.unwrap_or(Self::get_default_dpi())
    }

    pub fn psm(&self) -> u32 {
        self.psm.unwrap_or(Self::get_default_psm())
    }

    pub fn oem(&self) -> u32 {
        self.oem.unwrap_or(Self::get_default_oem())
    }
}
