//! Report manifests: a JSON file describing one request, with attachment
//! files stored alongside it.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use sarpdf::{
    Attachment, AttachmentInfo, AttachmentStore, ContentNode, Error, ReportRequest,
    ServiceSection, SubjectDetails,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub subject: SubjectDetails,
    #[serde(default)]
    pub services: Vec<ServiceEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEntry {
    pub service_name: String,
    pub business_label: Option<String>,
    #[serde(default)]
    pub content: Option<ContentNode>,
    #[serde(default)]
    pub attachments: Vec<AttachmentEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentEntry {
    #[serde(flatten)]
    pub info: AttachmentInfo,
    /// Relative to the manifest's directory
    pub path: PathBuf,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let file = File::open(path)?;
        let manifest = serde_json::from_reader(BufReader::new(file))?;
        Ok(manifest)
    }
}

/// Attachment store backed by files listed in a manifest.
pub struct FsAttachmentStore {
    base_dir: PathBuf,
    by_service: HashMap<String, Vec<(AttachmentInfo, PathBuf)>>,
}

impl FsAttachmentStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            by_service: HashMap::new(),
        }
    }

    pub fn add(&mut self, service_name: &str, info: AttachmentInfo, path: PathBuf) {
        self.by_service
            .entry(service_name.to_string())
            .or_default()
            .push((info, path));
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

impl AttachmentStore for FsAttachmentStore {
    fn list_attachments(&self, service_name: &str) -> sarpdf::Result<Vec<AttachmentInfo>> {
        Ok(self
            .by_service
            .get(service_name)
            .map(|items| items.iter().map(|(info, _)| info.clone()).collect())
            .unwrap_or_default())
    }

    fn get_attachment(&self, service_name: &str, info: &AttachmentInfo) -> sarpdf::Result<Attachment> {
        let (_, path) = self
            .by_service
            .get(service_name)
            .and_then(|items| items.iter().find(|(i, _)| i == info))
            .ok_or_else(|| {
                Error::Other(format!(
                    "attachment {} not listed for service {}",
                    info.attachment_number, service_name
                ))
            })?;

        let path = self.resolve(path);
        // fail early on missing files without holding a descriptor
        std::fs::metadata(&path)?;
        Ok(Attachment::new(info.clone(), LazyFile::new(path)))
    }
}

/// A file that is opened on its first read and closed once drained.
///
/// A batch can hold many requests at once; their attachments only take a
/// file descriptor while they are being rendered.
pub struct LazyFile {
    path: PathBuf,
    state: LazyState,
}

enum LazyState {
    Pending,
    Open(BufReader<File>),
    Drained,
}

impl LazyFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: LazyState::Pending,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, LazyState::Open(_))
    }
}

impl Read for LazyFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            match &mut self.state {
                LazyState::Pending => {
                    self.state = LazyState::Open(BufReader::new(File::open(&self.path)?));
                }
                LazyState::Open(reader) => {
                    let n = reader.read(buf)?;
                    if n == 0 && !buf.is_empty() {
                        self.state = LazyState::Drained;
                    }
                    return Ok(n);
                }
                LazyState::Drained => return Ok(0),
            }
        }
    }
}

/// Turn a manifest into a report request, opening attachments from disk.
pub fn build_request(manifest: Manifest, base_dir: &Path) -> sarpdf::Result<ReportRequest> {
    let mut store = FsAttachmentStore::new(base_dir);
    let mut sections = Vec::with_capacity(manifest.services.len());

    for service in manifest.services {
        for entry in service.attachments {
            store.add(&service.service_name, entry.info, entry.path);
        }
        let label = service
            .business_label
            .unwrap_or_else(|| service.service_name.clone());
        let mut section = ServiceSection::new(&service.service_name, label);
        section.content = service.content;
        section.attachments = store.fetch_all(&service.service_name)?;
        sections.push(section);
    }

    Ok(ReportRequest {
        subject: manifest.subject,
        sections,
    })
}
