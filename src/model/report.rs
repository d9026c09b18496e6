//! Report requests: the subject and their per-service sections.

use super::{Attachment, ContentNode};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identity of the person the report is about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubjectDetails {
    pub name: String,
    pub nomis_id: Option<String>,
    pub ndelius_id: Option<String>,
    pub sar_case_reference: String,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl SubjectDetails {
    pub fn new(name: impl Into<String>, sar_case_reference: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sar_case_reference: sar_case_reference.into(),
            ..Default::default()
        }
    }

    pub fn with_nomis_id(mut self, id: impl Into<String>) -> Self {
        self.nomis_id = Some(id.into());
        self
    }

    pub fn with_ndelius_id(mut self, id: impl Into<String>) -> Self {
        self.ndelius_id = Some(id.into());
        self
    }

    pub fn with_date_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }
}

/// One service's contribution to the report.
#[derive(Debug)]
pub struct ServiceSection {
    /// Key used to look up a dedicated template
    pub service_name: String,

    /// Heading shown in the report and the contents page
    pub business_label: String,

    /// Raw response data; `None` when the service returned nothing
    pub content: Option<ContentNode>,

    pub attachments: Vec<Attachment>,
}

impl ServiceSection {
    pub fn new(service_name: impl Into<String>, business_label: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            business_label: business_label.into(),
            content: None,
            attachments: Vec::new(),
        }
    }

    pub fn with_content(mut self, content: ContentNode) -> Self {
        self.content = Some(content);
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

/// Everything needed to assemble one report.
#[derive(Debug)]
pub struct ReportRequest {
    pub subject: SubjectDetails,
    /// Sections in the order they appear in the report
    pub sections: Vec<ServiceSection>,
}

impl ReportRequest {
    pub fn new(subject: SubjectDetails) -> Self {
        Self {
            subject,
            sections: Vec::new(),
        }
    }

    pub fn with_section(mut self, section: ServiceSection) -> Self {
        self.sections.push(section);
        self
    }
}
