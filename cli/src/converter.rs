//! Word-to-PDF conversion through a Gotenberg-compatible HTTP service.

use std::time::Duration;

use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;

use sarpdf::{Error, WordConverter};

const CONVERT_PATH: &str = "/forms/libreoffice/convert";

pub struct HttpWordConverter {
    client: Client,
    endpoint: String,
}

impl HttpWordConverter {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, Box<dyn std::error::Error>> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint(base_url),
        })
    }
}

fn endpoint(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), CONVERT_PATH)
}

impl WordConverter for HttpWordConverter {
    fn convert(&self, bytes: &[u8], filename: &str) -> sarpdf::Result<Vec<u8>> {
        let part = Part::bytes(bytes.to_vec()).file_name(filename.to_string());
        let form = Form::new().part("files", part);

        log::debug!("POST {} ({}, {} bytes)", self.endpoint, filename, bytes.len());
        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::Conversion(format!("{}: {}", filename, e)))?;

        let pdf = response
            .bytes()
            .map_err(|e| Error::Conversion(format!("{}: {}", filename, e)))?;
        Ok(pdf.to_vec())
    }
}
